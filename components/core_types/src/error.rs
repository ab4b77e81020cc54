//! Diagnostic types shared by the parser and the semantic analyzer.

use crate::SourcePosition;
use serde::Serialize;
use std::fmt;

/// The category of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed syntax recorded by the parser
    SyntaxError,
    /// A reference no declaration could be found for
    UnresolvedReference,
    /// Failure reading the source text
    IoError,
}

/// A problem report with an optional source location.
///
/// Diagnostics never abort processing; producers accumulate them and the
/// caller decides whether they are fatal.
///
/// # Examples
///
/// ```
/// use core_types::{Diagnostic, ErrorKind};
///
/// let diagnostic = Diagnostic::new(ErrorKind::UnresolvedReference, "Undefined class 'Foo' at line 3", None);
/// assert_eq!(diagnostic.to_string(), "Undefined class 'Foo' at line 3");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// The category of the problem
    pub kind: ErrorKind,
    /// Human-readable message
    pub message: String,
    /// Where the problem was detected, if known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_position: Option<SourcePosition>,
}

impl Diagnostic {
    /// Create a diagnostic
    pub fn new(
        kind: ErrorKind,
        message: impl Into<String>,
        source_position: Option<SourcePosition>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source_position,
        }
    }

    /// Create a syntax diagnostic at a position
    pub fn syntax(message: impl Into<String>, position: SourcePosition) -> Self {
        Self::new(ErrorKind::SyntaxError, message, Some(position))
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, self.source_position) {
            (ErrorKind::SyntaxError, Some(pos)) => write!(
                f,
                "Parse error at line {}, column {}: {}",
                pos.line, pos.column, self.message
            ),
            _ => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for Diagnostic {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_diagnostic_display() {
        let d = Diagnostic::syntax("boom", SourcePosition::new(2, 4, 9));
        assert_eq!(d.to_string(), "Parse error at line 2, column 4: boom");
    }

    #[test]
    fn test_unpositioned_diagnostic_display() {
        let d = Diagnostic::new(ErrorKind::SyntaxError, "boom", None);
        assert_eq!(d.to_string(), "boom");
    }
}
