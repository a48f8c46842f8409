use std::fmt;

use serde::Serialize;

use crate::Line;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Diagnostic {
    pub line: Line,
    pub severity: Severity,
    pub message: String,
    pub code: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.severity)?;
        if let Some(code) = &self.code {
            write!(f, "[{code}]")?;
        }
        if self.line.is_known() {
            write!(f, " (line {})", self.line)?;
        }
        write!(f, ": {}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_diagnostic() {
        let diagnostic = Diagnostic {
            line: Line(3),
            severity: Severity::Error,
            message: "variable 'X' is used but never defined".into(),
            code: Some("UNDEFINED_VARIABLE".into()),
        };
        assert_eq!(
            diagnostic.to_string(),
            "error[UNDEFINED_VARIABLE] (line 3): variable 'X' is used but never defined"
        );

        let diagnostic = Diagnostic {
            line: Line::UNKNOWN,
            severity: Severity::Warning,
            message: "nothing to do".into(),
            code: None,
        };
        assert_eq!(diagnostic.to_string(), "warning: nothing to do");
    }
}
