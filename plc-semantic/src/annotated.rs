//! The annotated AST artifact handed from semantic analysis to code
//! generation.
//!
//! Besides the per-statement annotations, each statement block embeds the
//! full encoding of its subtree under `Tree:`, so the next stage rebuilds the
//! exact program rather than guessing it from the annotations.

use std::collections::BTreeSet;
use std::io::{self, Write};

use plc_core::Line;
use plc_syntax::encode::{Encoded, INDENT, Name, boolean_keyword};
use plc_syntax::{AstNode, AstVisitor, DecodeError, Decoder, Program};
use thiserror::Error;

use crate::analyzer::SemanticInfo;
use crate::symbol_table::SymbolType;

#[derive(Debug, Error)]
pub enum AnnotatedError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("annotated AST has no {0} section")]
    MissingSection(&'static str),
    #[error("line {line}: {section} has no '{field}' field")]
    MissingField {
        line: usize,
        section: &'static str,
        field: &'static str,
    },
    #[error("line {line}: invalid value '{value}' for '{field}'")]
    InvalidField {
        line: usize,
        field: &'static str,
        value: String,
    },
    #[error("line {line}: unexpected line '{text}'")]
    UnexpectedLine { line: usize, text: String },
    #[error("annotated AST declares {declared} statements but contains {found}")]
    StatementCountMismatch { declared: usize, found: usize },
}

/// What the code generation stage needs from the annotated artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedProgram {
    pub program: Program,
    pub analysis_passed: bool,
    pub errors_found: usize,
}

/// Lines and referenced names of one statement.
#[derive(Debug, Default)]
struct StatementFacts {
    lines: BTreeSet<Line>,
    names: BTreeSet<String>,
}

impl AstVisitor for StatementFacts {
    fn visit_identifier(&mut self, ident: &plc_syntax::Identifier) {
        self.lines.insert(ident.line);
        self.names.insert(ident.name.clone());
    }

    fn visit_boolean(&mut self, literal: &plc_syntax::BooleanLiteral) {
        self.lines.insert(literal.line);
    }

    fn visit_assignment(&mut self, assignment: &plc_syntax::Assignment) {
        self.lines.insert(assignment.line);
        self.names.insert(assignment.variable.clone());
    }

    fn visit_binary(&mut self, binary: &plc_syntax::Binary) {
        self.lines.insert(binary.line);
    }

    fn visit_not(&mut self, unary: &plc_syntax::Unary) {
        self.lines.insert(unary.line);
    }

    fn visit_quantifier(&mut self, quantifier: &plc_syntax::Quantifier) {
        self.lines.insert(quantifier.line);
    }

    fn visit_expression_stmt(&mut self, stmt: &plc_syntax::ExpressionStmt) {
        self.lines.insert(stmt.line);
    }
}

/// A statement fails when an error names a symbol it references, or, for
/// errors about no symbol in particular, falls on one of its lines.
fn statement_passed(statement: &AstNode, info: &SemanticInfo) -> bool {
    let mut facts = StatementFacts::default();
    statement.accept(&mut facts);

    !info
        .diagnostics
        .iter()
        .filter(|d| d.is_error())
        .any(|d| match &d.symbol {
            Some(symbol) => facts.names.contains(symbol),
            None => facts.lines.contains(&d.line),
        })
}

fn pass_fail(passed: bool) -> &'static str {
    match passed {
        true => "PASSED",
        false => "FAILED",
    }
}

fn yes_no(flag: bool) -> &'static str {
    match flag {
        true => "YES",
        false => "NO",
    }
}

pub fn write_annotated<W>(writer: &mut W, root: &AstNode, info: &SemanticInfo) -> io::Result<()>
where
    W: Write + ?Sized,
{
    let statements = match root {
        AstNode::Program(program) => program.statements.iter().collect::<Vec<_>>(),
        other => vec![other],
    };
    let success = info.is_success();

    writeln!(writer, "# Semantically Annotated Abstract Syntax Tree")?;
    writeln!(writer, "# Generated by the semantic analysis stage")?;
    writeln!(writer, "#")?;
    writeln!(writer)?;

    writeln!(writer, "ANNOTATED_PROGRAM:")?;
    writeln!(writer, "Node_Type: PROGRAM")?;
    writeln!(writer, "Semantic_Type: PROGRAM_BLOCK")?;
    writeln!(writer, "Line: {}", root.line())?;
    writeln!(writer, "Statements: {}", statements.len())?;
    writeln!(
        writer,
        "Analysis_Status: {}",
        if success { "VALIDATED" } else { "FAILED" }
    )?;
    writeln!(writer)?;

    for (index, statement) in statements.iter().enumerate() {
        let semantic_type = info
            .statement_types
            .get(index)
            .copied()
            .unwrap_or(SymbolType::Unknown);

        writeln!(writer, "Statement_{}:", index + 1)?;
        writeln!(writer, "Node_Type: {}", statement.kind())?;
        writeln!(writer, "Line: {}", statement.line())?;
        writeln!(writer, "Semantic_Type: {semantic_type}")?;

        match statement {
            AstNode::Assignment(assignment) => {
                writeln!(writer, "Operation: VARIABLE_ASSIGNMENT")?;
                writeln!(writer, "Target: {}", Name(&assignment.variable))?;
            }
            AstNode::ExpressionStmt(stmt) => {
                writeln!(writer, "Operation: EXPRESSION_EVALUATION")?;
                writeln!(writer, "Expression: {}", stmt.expr.kind())?;
            }
            other => {
                writeln!(writer, "Operation: EXPRESSION_EVALUATION")?;
                writeln!(writer, "Expression: {}", other.kind())?;
            }
        }

        writeln!(
            writer,
            "Validation: {}",
            pass_fail(statement_passed(statement, info))
        )?;
        writeln!(writer, "Tree:")?;
        write!(writer, "{}", Encoded::at_depth(statement, 1))?;
        writeln!(writer)?;
    }

    writeln!(writer, "SEMANTIC_SUMMARY:")?;
    writeln!(writer, "Symbols_Processed: {}", info.symbol_table.len())?;
    writeln!(writer, "Errors_Found: {}", info.error_count())?;
    writeln!(writer, "Warnings_Issued: {}", info.warning_count())?;
    writeln!(
        writer,
        "Type_Safety: {}",
        if success { "GUARANTEED" } else { "VIOLATED" }
    )?;
    writeln!(
        writer,
        "Analysis_Result: {}",
        if success { "SUCCESS" } else { "FAILED" }
    )?;
    writeln!(writer)?;

    writeln!(writer, "SYMBOL_REFERENCES:")?;
    for entry in info.symbol_table.iter() {
        writeln!(writer, "{}:", Name(&entry.name))?;
        writeln!(writer, "Type: {}", entry.symbol_type)?;
        writeln!(writer, "Defined: {}", yes_no(entry.defined))?;
        writeln!(writer, "Used: {}", yes_no(entry.used))?;
        writeln!(writer, "Declaration_Line: {}", entry.declared_line)?;
        if let Some(line) = entry.used_line {
            writeln!(writer, "Usage_Line: {line}")?;
        }
        if let (Some(value), true) = (entry.value, entry.defined) {
            writeln!(writer, "Value: {}", boolean_keyword(value))?;
        }
        writeln!(writer)?;
    }

    writeln!(writer, "# End of Semantically Annotated AST")
}

type Field<'src> = (usize, &'src str, &'src str);

struct Lines<'src> {
    lines: Vec<(usize, &'src str)>,
    position: usize,
}

impl<'src> Lines<'src> {
    fn new(input: &'src str) -> Self {
        Self {
            lines: input
                .lines()
                .enumerate()
                .map(|(index, line)| (index + 1, line.trim_end()))
                .collect(),
            position: 0,
        }
    }

    fn peek(&self) -> Option<(usize, &'src str)> {
        self.lines.get(self.position).copied()
    }

    fn next(&mut self) -> Option<(usize, &'src str)> {
        let line = self.peek()?;
        self.position += 1;
        Some(line)
    }

    /// `Key: value` lines up to the next blank line (or `stop`).
    fn fields(&mut self, stop: Option<&str>) -> Vec<Field<'src>> {
        let mut fields = Vec::new();
        while let Some((number, text)) = self.peek() {
            if text.is_empty() || Some(text) == stop {
                break;
            }
            self.position += 1;
            if let Some((key, value)) = text.split_once(": ") {
                fields.push((number, key, value));
            }
        }
        fields
    }

    /// Consecutive indented lines, de-indented by one level.
    fn indented_block(&mut self) -> (usize, String) {
        let first = self.peek().map_or(0, |(number, _)| number);
        let mut block = String::new();

        while let Some((_, text)) = self.peek() {
            let Some(stripped) = text.strip_prefix(INDENT) else {
                break;
            };
            self.position += 1;
            block.push_str(stripped);
            block.push('\n');
        }

        (first, block)
    }
}

fn field<'src>(
    fields: &[Field<'src>],
    header_line: usize,
    section: &'static str,
    name: &'static str,
) -> Result<(usize, &'src str), AnnotatedError> {
    fields
        .iter()
        .find(|(_, key, _)| *key == name)
        .map(|(number, _, value)| (*number, *value))
        .ok_or(AnnotatedError::MissingField {
            line: header_line,
            section,
            field: name,
        })
}

fn parse_field<T: std::str::FromStr>(
    (line, value): (usize, &str),
    name: &'static str,
) -> Result<T, AnnotatedError> {
    value.parse().map_err(|_| AnnotatedError::InvalidField {
        line,
        field: name,
        value: value.to_string(),
    })
}

/// Rebuilds the program and the analysis verdict from an annotated artifact.
pub fn read_annotated(input: &str) -> Result<AnnotatedProgram, AnnotatedError> {
    let mut lines = Lines::new(input);
    let mut header: Option<(Line, usize)> = None;
    let mut verdict: Option<(bool, usize)> = None;
    let mut statements = Vec::new();

    while let Some((number, text)) = lines.next() {
        if text.is_empty() || text.starts_with('#') {
            continue;
        }

        match text {
            "ANNOTATED_PROGRAM:" => {
                let fields = lines.fields(None);
                let line = parse_field::<Line>(
                    field(&fields, number, "ANNOTATED_PROGRAM", "Line")?,
                    "Line",
                )?;
                let declared = parse_field::<usize>(
                    field(&fields, number, "ANNOTATED_PROGRAM", "Statements")?,
                    "Statements",
                )?;
                header = Some((line, declared));
            }
            "SEMANTIC_SUMMARY:" => {
                let fields = lines.fields(None);
                let result = field(&fields, number, "SEMANTIC_SUMMARY", "Analysis_Result")?;
                let passed = match result.1 {
                    "SUCCESS" => true,
                    "FAILED" => false,
                    other => {
                        return Err(AnnotatedError::InvalidField {
                            line: result.0,
                            field: "Analysis_Result",
                            value: other.to_string(),
                        });
                    }
                };
                let errors = parse_field::<usize>(
                    field(&fields, number, "SEMANTIC_SUMMARY", "Errors_Found")?,
                    "Errors_Found",
                )?;
                verdict = Some((passed, errors));
            }
            // symbol references are informational only
            "SYMBOL_REFERENCES:" => break,
            label if label.starts_with("Statement_") && label.ends_with(':') => {
                let expected = format!("Statement_{}:", statements.len() + 1);
                if label != expected {
                    return Err(AnnotatedError::UnexpectedLine {
                        line: number,
                        text: label.to_string(),
                    });
                }

                lines.fields(Some("Tree:"));
                match lines.next() {
                    Some((_, "Tree:")) => {}
                    _ => {
                        return Err(AnnotatedError::MissingField {
                            line: number,
                            section: "Statement",
                            field: "Tree",
                        });
                    }
                }

                let (first_line, block) = lines.indented_block();
                let mut decoder = Decoder::with_first_line(&block, first_line)?;
                let statement = decoder.decode_node(0)?;
                decoder.finish()?;
                statements.push(statement);
            }
            other => {
                return Err(AnnotatedError::UnexpectedLine {
                    line: number,
                    text: other.to_string(),
                });
            }
        }
    }

    let (line, declared) = header.ok_or(AnnotatedError::MissingSection("ANNOTATED_PROGRAM"))?;
    let (analysis_passed, errors_found) =
        verdict.ok_or(AnnotatedError::MissingSection("SEMANTIC_SUMMARY"))?;

    if statements.len() != declared {
        return Err(AnnotatedError::StatementCountMismatch {
            declared,
            found: statements.len(),
        });
    }

    Ok(AnnotatedProgram {
        program: Program { statements, line },
        analysis_passed,
        errors_found,
    })
}
