use thiserror::Error;

pub type Result<T, E = DecodeError> = std::result::Result<T, E>;

/// Failure to rebuild a tree from its interchange text.
///
/// `line` is the 1-based line of the artifact the problem was found on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("line {line}: unknown node kind '{keyword}'")]
    UnknownKind { line: usize, keyword: String },
    #[error("line {line}: malformed node header '{text}'")]
    MalformedHeader { line: usize, text: String },
    #[error("line {line}: missing or invalid '(line N)' marker")]
    InvalidLineMarker { line: usize },
    #[error("line {line}: indentation must be a multiple of two spaces")]
    MalformedIndent { line: usize },
    #[error("line {line}: expected depth {expected}, found depth {found}")]
    UnexpectedIndent {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("line {line}: expected '{expected}', found '{found}'")]
    UnexpectedRole {
        line: usize,
        expected: String,
        found: String,
    },
    #[error("line {line}: {kind} node requires a payload")]
    MissingPayload { line: usize, kind: &'static str },
    #[error("line {line}: {kind} node does not take a payload")]
    UnexpectedPayload { line: usize, kind: &'static str },
    #[error("line {line}: invalid boolean literal '{value}'")]
    InvalidBoolean { line: usize, value: String },
    #[error("line {line}: invalid name {text}")]
    InvalidName { line: usize, text: String },
    #[error("line {line}: program declares {declared} statements but contains {found}")]
    StatementCountMismatch {
        line: usize,
        declared: usize,
        found: usize,
    },
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: String },
    #[error("line {line}: unexpected content after the root node")]
    TrailingContent { line: usize },
}
