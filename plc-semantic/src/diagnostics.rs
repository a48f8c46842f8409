use std::fmt;

use plc_core::{Diagnostic, Line, Severity};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SemanticErrorKind {
    UndefinedVariable,
    TypeMismatch,
    UnusedVariable,
    Redefinition,
    InvalidOperation,
}

impl SemanticErrorKind {
    pub fn code(self) -> &'static str {
        match self {
            SemanticErrorKind::UndefinedVariable => "UNDEFINED_VARIABLE",
            SemanticErrorKind::TypeMismatch => "TYPE_MISMATCH",
            SemanticErrorKind::UnusedVariable => "UNUSED_VARIABLE",
            SemanticErrorKind::Redefinition => "REDEFINITION",
            SemanticErrorKind::InvalidOperation => "INVALID_OPERATION",
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            SemanticErrorKind::UnusedVariable => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for SemanticErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SemanticDiagnostic {
    pub kind: SemanticErrorKind,
    pub line: Line,
    pub symbol: Option<String>,
    pub message: String,
    pub severity: Severity,
}

impl SemanticDiagnostic {
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl From<&SemanticDiagnostic> for Diagnostic {
    fn from(diagnostic: &SemanticDiagnostic) -> Self {
        Diagnostic {
            line: diagnostic.line,
            severity: diagnostic.severity,
            message: diagnostic.message.clone(),
            code: Some(diagnostic.kind.code().to_string()),
        }
    }
}

/// Collects every diagnostic of a run; analysis never stops at the first one.
#[derive(Debug, Default)]
pub struct Diagnostics(Vec<SemanticDiagnostic>);

impl Diagnostics {
    pub fn items(self) -> Vec<SemanticDiagnostic> {
        self.0
    }

    pub fn add_diagnostic(
        &mut self,
        kind: SemanticErrorKind,
        line: Line,
        symbol: Option<&str>,
        message: impl Into<String>,
    ) {
        self.0.push(SemanticDiagnostic {
            kind,
            line,
            symbol: symbol.map(str::to_string),
            message: message.into(),
            severity: kind.severity(),
        });
    }

    pub fn undefined_variable(&mut self, name: &str, line: Line) {
        self.add_diagnostic(
            SemanticErrorKind::UndefinedVariable,
            line,
            Some(name),
            format!("variable '{name}' is used but never defined"),
        );
    }

    pub fn unused_variable(&mut self, name: &str, line: Line) {
        self.add_diagnostic(
            SemanticErrorKind::UnusedVariable,
            line,
            Some(name),
            format!("variable '{name}' is defined but never used"),
        );
    }

    /// Orders diagnostics by line, keeping discovery order within a line.
    pub fn sort(&mut self) {
        self.0.sort_by_key(|d| d.line);
    }
}
