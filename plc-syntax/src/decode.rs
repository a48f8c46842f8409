//! Rebuilds a tree from the text produced by [`crate::encode`].
//!
//! Decoding is strict: every header is split into an exact kind keyword, an
//! optional payload and a `(line N)` marker, and every child has to appear
//! under the role label and at the depth its parent dictates. Comment lines
//! (`#`) and blank lines are skipped, which lets the decoder read whole
//! artifacts and not only bare trees.

use plc_core::Line;

use crate::ast::{AstNode, NodeKind, Program, UnknownKind};
use crate::encode::INDENT;
use crate::error::{DecodeError, Result};

/// Decodes a single tree spanning the whole input.
pub fn decode(input: &str) -> Result<AstNode> {
    let mut decoder = Decoder::new(input)?;
    let root = decoder.decode_node(0)?;
    decoder.finish()?;
    Ok(root)
}

#[derive(Debug, Clone, Copy)]
struct Record<'src> {
    number: usize,
    depth: usize,
    text: &'src str,
}

#[derive(Debug)]
struct Header<'src> {
    kind: NodeKind,
    payload: Option<&'src str>,
    line: Line,
    tail: &'src str,
}

impl<'src> Header<'src> {
    fn parse(record: Record<'src>) -> Result<Self> {
        let number = record.number;
        let invalid_marker = || DecodeError::InvalidLineMarker { line: number };

        let (head, rest) = record.text.rsplit_once(" (line ").ok_or_else(invalid_marker)?;
        let (digits, tail) = rest.split_once(')').ok_or_else(invalid_marker)?;
        let line = digits.parse::<u32>().map(Line).map_err(|_| invalid_marker())?;

        let (keyword, payload) = match head.split_once(": ") {
            Some((keyword, payload)) => (keyword, Some(payload)),
            None => (head, None),
        };

        let kind = keyword
            .parse::<NodeKind>()
            .map_err(|UnknownKind(keyword)| DecodeError::UnknownKind {
                line: number,
                keyword,
            })?;

        match (kind.has_payload(), payload) {
            (true, None) | (true, Some("")) => {
                return Err(DecodeError::MissingPayload {
                    line: number,
                    kind: kind.keyword(),
                });
            }
            (false, Some(_)) => {
                return Err(DecodeError::UnexpectedPayload {
                    line: number,
                    kind: kind.keyword(),
                });
            }
            _ => {}
        }

        if kind != NodeKind::Program && !tail.is_empty() {
            return Err(DecodeError::MalformedHeader {
                line: number,
                text: record.text.to_string(),
            });
        }

        Ok(Self {
            kind,
            payload,
            line,
            tail,
        })
    }
}

#[derive(Debug)]
pub struct Decoder<'src> {
    records: Vec<Record<'src>>,
    position: usize,
}

impl<'src> Decoder<'src> {
    pub fn new(input: &'src str) -> Result<Self> {
        Self::with_first_line(input, 1)
    }

    /// Like [`Decoder::new`], for input that starts at `first_line` of a
    /// larger artifact. Only affects the line numbers reported in errors.
    pub fn with_first_line(input: &'src str, first_line: usize) -> Result<Self> {
        let mut records = Vec::new();

        for (index, raw) in input.lines().enumerate() {
            let number = first_line + index;
            let trimmed = raw.trim_end();
            let text = trimmed.trim_start_matches(' ');

            if text.is_empty() || text.starts_with('#') {
                continue;
            }

            let spaces = trimmed.len() - text.len();
            if spaces % INDENT.len() != 0 {
                return Err(DecodeError::MalformedIndent { line: number });
            }

            records.push(Record {
                number,
                depth: spaces / INDENT.len(),
                text,
            });
        }

        Ok(Self {
            records,
            position: 0,
        })
    }

    /// Decodes the node whose header is the next record, at `depth`.
    pub fn decode_node(&mut self, depth: usize) -> Result<AstNode> {
        let record = self.next_record(depth, "a node header")?;
        let header = Header::parse(record)?;
        let line = header.line;
        let roles = depth + 1;
        let child = depth + 2;

        let node = match header.kind {
            NodeKind::Identifier => {
                let payload = header.payload.unwrap_or_default();
                let name = unquote_name(payload).ok_or_else(|| DecodeError::InvalidName {
                    line: record.number,
                    text: payload.to_string(),
                })?;
                AstNode::identifier(name, line)
            }
            NodeKind::Boolean => {
                let value = match header.payload.unwrap_or_default() {
                    "TRUE" => true,
                    "FALSE" => false,
                    other => {
                        return Err(DecodeError::InvalidBoolean {
                            line: record.number,
                            value: other.to_string(),
                        });
                    }
                };
                AstNode::boolean(value, line)
            }
            NodeKind::Assignment => {
                let variable = self.expect_name(roles, "Variable")?;
                self.expect_role(roles, "Value:")?;
                let value = self.decode_node(child)?;
                AstNode::assignment(variable, value, line)
            }
            NodeKind::Binary(op) => {
                self.expect_role(roles, "Left:")?;
                let lhs = self.decode_node(child)?;
                self.expect_role(roles, "Right:")?;
                let rhs = self.decode_node(child)?;
                AstNode::binary(op, lhs, rhs, line)
            }
            NodeKind::Not => {
                self.expect_role(roles, "Operand:")?;
                let operand = self.decode_node(child)?;
                AstNode::not(operand, line)
            }
            NodeKind::Quantifier(kind) => {
                let variable = self.expect_name(roles, "Variable")?;
                self.expect_role(roles, "Expression:")?;
                let body = self.decode_node(child)?;
                AstNode::quantifier(kind, variable, body, line)
            }
            NodeKind::ExpressionStmt => {
                self.expect_role(roles, "Expression:")?;
                let expr = self.decode_node(child)?;
                AstNode::expression_stmt(expr, line)
            }
            NodeKind::Program => {
                let declared = parse_statement_count(header.tail).ok_or_else(|| {
                    DecodeError::MalformedHeader {
                        line: record.number,
                        text: record.text.to_string(),
                    }
                })?;

                let mut program = Program::new(line);
                while self.next_is_statement(roles) {
                    let label = format!("Statement {}:", program.len() + 1);
                    self.expect_role(roles, &label)?;
                    program.push(self.decode_node(child)?);
                }

                if program.len() != declared {
                    return Err(DecodeError::StatementCountMismatch {
                        line: record.number,
                        declared,
                        found: program.len(),
                    });
                }

                AstNode::Program(program)
            }
        };

        Ok(node)
    }

    /// Fails if any record is left after the decoded tree.
    pub fn finish(&self) -> Result<()> {
        match self.records.get(self.position) {
            Some(record) => Err(DecodeError::TrailingContent {
                line: record.number,
            }),
            None => Ok(()),
        }
    }

    fn next_is_statement(&self, depth: usize) -> bool {
        self.records
            .get(self.position)
            .is_some_and(|record| record.depth == depth && record.text.starts_with("Statement "))
    }

    fn next_record(&mut self, depth: usize, expected: &str) -> Result<Record<'src>> {
        let record = self.records.get(self.position).copied().ok_or_else(|| {
            DecodeError::UnexpectedEof {
                expected: expected.to_string(),
            }
        })?;

        if record.depth != depth {
            return Err(DecodeError::UnexpectedIndent {
                line: record.number,
                expected: depth,
                found: record.depth,
            });
        }

        self.position += 1;
        Ok(record)
    }

    fn expect_role(&mut self, depth: usize, label: &str) -> Result<()> {
        let record = self.next_record(depth, label)?;
        if record.text != label {
            return Err(DecodeError::UnexpectedRole {
                line: record.number,
                expected: label.to_string(),
                found: record.text.to_string(),
            });
        }
        Ok(())
    }

    fn expect_name(&mut self, depth: usize, field: &str) -> Result<String> {
        let record = self.next_record(depth, field)?;
        let value = record
            .text
            .strip_prefix(field)
            .and_then(|rest| rest.strip_prefix(": "))
            .filter(|value| !value.is_empty())
            .ok_or_else(|| DecodeError::UnexpectedRole {
                line: record.number,
                expected: format!("{field}: <name>"),
                found: record.text.to_string(),
            })?;

        unquote_name(value).ok_or_else(|| DecodeError::InvalidName {
            line: record.number,
            text: value.to_string(),
        })
    }
}

/// Reverses [`crate::encode::Name`]. Unquoted text is taken verbatim.
fn unquote_name(text: &str) -> Option<String> {
    let Some(quoted) = text.strip_prefix('"') else {
        return (!text.is_empty()).then(|| text.to_string());
    };

    let inner = quoted.strip_suffix('"')?;
    let mut name = String::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(c) = chars.next() {
        let c = match c {
            '"' => return None,
            '\\' => match chars.next()? {
                '"' => '"',
                '\\' => '\\',
                'n' => '\n',
                'r' => '\r',
                't' => '\t',
                'u' => {
                    if chars.next()? != '{' {
                        return None;
                    }
                    let hex = chars.by_ref().take_while(|c| *c != '}').collect::<String>();
                    char::from_u32(u32::from_str_radix(&hex, 16).ok()?)?
                }
                _ => return None,
            },
            c => c,
        };
        name.push(c);
    }

    Some(name)
}

fn parse_statement_count(tail: &str) -> Option<usize> {
    tail.strip_prefix(" - ")?
        .strip_suffix(" statements")?
        .parse()
        .ok()
}
