pub mod ast;
pub mod decode;
pub mod encode;
pub mod error;

#[cfg(test)]
mod tests;

pub use ast::{
    Assignment, AstNode, AstVisitor, Binary, BooleanLiteral, Connective, ExpressionStmt,
    Identifier, NodeKind, Program, Quantifier, QuantifierKind, Unary,
};
pub use decode::{Decoder, decode};
pub use encode::{Encoded, encode, encode_to_string, write_ast_dump};
pub use error::{DecodeError, Result};
