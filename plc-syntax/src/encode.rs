//! Text encoding of a tree.
//!
//! Each node is written pre-order as a header line `KIND (line N)` (with a
//! `: payload` after the kind for identifiers and literals), followed by its
//! children under role labels. Every level is indented by two spaces:
//!
//! ```text
//! PROGRAM (line 1) - 1 statements
//!   Statement 1:
//!     ASSIGNMENT (line 1)
//!       Variable: B
//!       Value:
//!         BOOLEAN: TRUE (line 1)
//! ```
//!
//! Names outside the identifier class `[A-Za-z_][A-Za-z0-9_]*` are written
//! double-quoted with escapes, see [`Name`].

use std::fmt::{self, Write as _};
use std::io::{self, Write};

use crate::ast::AstNode;

pub const INDENT: &str = "  ";

/// Writes the encoding of `node` into `writer`.
pub fn encode<W>(node: &AstNode, writer: &mut W) -> io::Result<()>
where
    W: Write + ?Sized,
{
    write!(writer, "{}", Encoded::new(node))
}

pub fn encode_to_string(node: &AstNode) -> String {
    Encoded::new(node).to_string()
}

/// Writes a complete AST dump artifact: header comments, the tree, and a
/// closing comment.
pub fn write_ast_dump<W>(writer: &mut W, root: &AstNode) -> io::Result<()>
where
    W: Write + ?Sized,
{
    writeln!(writer, "# Abstract Syntax Tree (AST)")?;
    writeln!(writer, "# Generated by the syntax analysis stage")?;
    writeln!(writer, "#")?;
    writeln!(writer)?;
    encode(root, writer)?;
    writeln!(writer)?;
    writeln!(writer, "# End of AST")
}

pub fn boolean_keyword(value: bool) -> &'static str {
    match value {
        true => "TRUE",
        false => "FALSE",
    }
}

/// Whether `name` can be written without quotes.
pub fn is_bare_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// [`fmt::Display`] adapter for a variable or identifier name.
///
/// Bare names are written as is. Any other name is quoted, escaping `"`,
/// `\`, `\n`, `\r`, `\t` and other control characters (as `\u{hex}`).
#[derive(Debug, Clone, Copy)]
pub struct Name<'a>(pub &'a str);

impl fmt::Display for Name<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if is_bare_name(self.0) {
            return f.write_str(self.0);
        }

        f.write_char('"')?;
        for c in self.0.chars() {
            match c {
                '"' => f.write_str("\\\"")?,
                '\\' => f.write_str("\\\\")?,
                '\n' => f.write_str("\\n")?,
                '\r' => f.write_str("\\r")?,
                '\t' => f.write_str("\\t")?,
                c if c.is_control() => write!(f, "\\u{{{:x}}}", u32::from(c))?,
                c => f.write_char(c)?,
            }
        }
        f.write_char('"')
    }
}

/// [`fmt::Display`] adapter producing the encoding of a node at some depth.
#[derive(Debug, Clone, Copy)]
pub struct Encoded<'ast> {
    node: &'ast AstNode,
    depth: usize,
}

impl<'ast> Encoded<'ast> {
    pub fn new(node: &'ast AstNode) -> Self {
        Self { node, depth: 0 }
    }

    pub fn at_depth(node: &'ast AstNode, depth: usize) -> Self {
        Self { node, depth }
    }

    fn child(&self, node: &'ast AstNode) -> Self {
        Self::at_depth(node, self.depth + 2)
    }
}

fn indent(f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        f.write_str(INDENT)?;
    }
    Ok(())
}

fn role(f: &mut fmt::Formatter<'_>, depth: usize, label: fmt::Arguments<'_>) -> fmt::Result {
    indent(f, depth)?;
    writeln!(f, "{label}")
}

impl fmt::Display for Encoded<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let depth = self.depth;
        let kind = self.node.kind();
        indent(f, depth)?;

        match self.node {
            AstNode::Identifier(ident) => {
                writeln!(f, "{kind}: {} (line {})", Name(&ident.name), ident.line)
            }
            AstNode::Boolean(literal) => writeln!(
                f,
                "{kind}: {} (line {})",
                boolean_keyword(literal.value),
                literal.line
            ),
            AstNode::Assignment(assignment) => {
                writeln!(f, "{kind} (line {})", assignment.line)?;
                role(f, depth + 1, format_args!("Variable: {}", Name(&assignment.variable)))?;
                role(f, depth + 1, format_args!("Value:"))?;
                write!(f, "{}", self.child(&assignment.value))
            }
            AstNode::Binary(binary) => {
                writeln!(f, "{kind} (line {})", binary.line)?;
                role(f, depth + 1, format_args!("Left:"))?;
                write!(f, "{}", self.child(&binary.lhs))?;
                role(f, depth + 1, format_args!("Right:"))?;
                write!(f, "{}", self.child(&binary.rhs))
            }
            AstNode::Not(unary) => {
                writeln!(f, "{kind} (line {})", unary.line)?;
                role(f, depth + 1, format_args!("Operand:"))?;
                write!(f, "{}", self.child(&unary.operand))
            }
            AstNode::Quantifier(quantifier) => {
                writeln!(f, "{kind} (line {})", quantifier.line)?;
                role(f, depth + 1, format_args!("Variable: {}", Name(&quantifier.variable)))?;
                role(f, depth + 1, format_args!("Expression:"))?;
                write!(f, "{}", self.child(&quantifier.body))
            }
            AstNode::Program(program) => {
                writeln!(
                    f,
                    "{kind} (line {}) - {} statements",
                    program.line,
                    program.len()
                )?;
                for (index, statement) in program.statements.iter().enumerate() {
                    role(f, depth + 1, format_args!("Statement {}:", index + 1))?;
                    write!(f, "{}", self.child(statement))?;
                }
                Ok(())
            }
            AstNode::ExpressionStmt(stmt) => {
                writeln!(f, "{kind} (line {})", stmt.line)?;
                role(f, depth + 1, format_args!("Expression:"))?;
                write!(f, "{}", self.child(&stmt.expr))
            }
        }
    }
}
