//! Parser error types and helpers

use crate::token::TokenKind;
use core_types::{Diagnostic, ErrorKind, SourcePosition};
use thiserror::Error;

/// A non-fatal error recorded while parsing
///
/// The parser keeps going after recording one of these; the full list is
/// available from [`crate::Parser::errors`] once parsing finishes.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// The token after the current one was not what the grammar requires
    #[error("expected next token to be {expected}, got {found} instead")]
    UnexpectedToken {
        /// Required token kind
        expected: TokenKind,
        /// Token kind actually seen
        found: TokenKind,
        /// Position of the offending token
        position: SourcePosition,
    },

    /// No expression can start with this token
    #[error("no prefix parse function for {kind} found")]
    NoPrefixParser {
        /// Token kind with no prefix handler
        kind: TokenKind,
        /// Position of the offending token
        position: SourcePosition,
    },

    /// Integer literal out of range
    #[error("could not parse {literal:?} as integer")]
    InvalidInteger {
        /// Raw literal text
        literal: String,
        /// Position of the literal
        position: SourcePosition,
    },

    /// Float literal that does not parse
    #[error("could not parse {literal:?} as float")]
    InvalidFloat {
        /// Raw literal text
        literal: String,
        /// Position of the literal
        position: SourcePosition,
    },

    /// `=` with something other than a variable on its left
    #[error("left side of assignment must be a variable")]
    InvalidAssignmentTarget {
        /// Position of the `=` token
        position: SourcePosition,
    },

    /// `foreach (... as KEY => ...)` where KEY is not a variable
    #[error("foreach key must be a variable")]
    InvalidForeachKey {
        /// Position of the offending token
        position: SourcePosition,
    },

    /// `foreach (... as VALUE)` where VALUE is not a variable
    #[error("foreach value must be a variable")]
    InvalidForeachValue {
        /// Position of the offending token
        position: SourcePosition,
    },

    /// `catch (Type X)` where X is not a variable
    #[error("expected variable in catch clause")]
    MissingCatchVariable {
        /// Position of the offending token
        position: SourcePosition,
    },
}

impl ParseError {
    /// Position of the token that triggered the error
    pub fn position(&self) -> SourcePosition {
        match self {
            ParseError::UnexpectedToken { position, .. }
            | ParseError::NoPrefixParser { position, .. }
            | ParseError::InvalidInteger { position, .. }
            | ParseError::InvalidFloat { position, .. }
            | ParseError::InvalidAssignmentTarget { position }
            | ParseError::InvalidForeachKey { position }
            | ParseError::InvalidForeachValue { position }
            | ParseError::MissingCatchVariable { position } => *position,
        }
    }

    /// Convert into a positioned syntax diagnostic
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::new(ErrorKind::SyntaxError, self.to_string(), Some(self.position()))
    }
}

impl serde::Serialize for ParseError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_token_message() {
        let err = ParseError::UnexpectedToken {
            expected: TokenKind::RParen,
            found: TokenKind::Semicolon,
            position: SourcePosition::new(1, 5, 4),
        };
        assert_eq!(
            err.to_string(),
            "expected next token to be RPAREN, got SEMICOLON instead"
        );
    }

    #[test]
    fn test_no_prefix_message() {
        let err = ParseError::NoPrefixParser {
            kind: TokenKind::Illegal,
            position: SourcePosition::start(),
        };
        assert_eq!(err.to_string(), "no prefix parse function for ILLEGAL found");
    }

    #[test]
    fn test_invalid_integer_quotes_literal() {
        let err = ParseError::InvalidInteger {
            literal: "99999999999999999999".to_string(),
            position: SourcePosition::start(),
        };
        assert_eq!(
            err.to_string(),
            "could not parse \"99999999999999999999\" as integer"
        );
    }

    #[test]
    fn test_to_diagnostic_keeps_position() {
        let err = ParseError::InvalidAssignmentTarget {
            position: SourcePosition::new(3, 7, 20),
        };
        let diagnostic = err.to_diagnostic();
        assert!(matches!(diagnostic.kind, ErrorKind::SyntaxError));
        assert_eq!(diagnostic.source_position, Some(SourcePosition::new(3, 7, 20)));
        assert_eq!(
            diagnostic.to_string(),
            "Parse error at line 3, column 7: left side of assignment must be a variable"
        );
    }

    #[test]
    fn test_serializes_as_message() {
        let err = ParseError::MissingCatchVariable {
            position: SourcePosition::start(),
        };
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, "\"expected variable in catch clause\"");
    }
}
