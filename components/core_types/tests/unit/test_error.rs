//! Unit tests for Diagnostic and ErrorKind

use core_types::{Diagnostic, ErrorKind, SourcePosition};

#[cfg(test)]
mod error_kind_tests {
    use super::*;

    #[test]
    fn test_error_kind_serializes_snake_case() {
        let json = serde_json::to_value(ErrorKind::UnresolvedReference).unwrap();
        assert_eq!(json, "unresolved_reference");
    }

    #[test]
    fn test_error_kind_copy() {
        let kind1 = ErrorKind::SyntaxError;
        let kind2 = kind1;
        assert_eq!(kind1, kind2);
    }
}

#[cfg(test)]
mod diagnostic_tests {
    use super::*;

    #[test]
    fn test_syntax_diagnostic_carries_position() {
        let diagnostic = Diagnostic::syntax("no prefix parse function for ILLEGAL found", SourcePosition::new(1, 7, 6));

        assert_eq!(diagnostic.kind, ErrorKind::SyntaxError);
        assert_eq!(diagnostic.source_position, Some(SourcePosition::new(1, 7, 6)));
        assert_eq!(
            diagnostic.to_string(),
            "Parse error at line 1, column 7: no prefix parse function for ILLEGAL found"
        );
    }

    #[test]
    fn test_unresolved_diagnostic_renders_message_only() {
        let diagnostic = Diagnostic::new(
            ErrorKind::UnresolvedReference,
            "Undefined function 'missing' at line 4",
            Some(SourcePosition::new(4, 1, 30)),
        );
        assert_eq!(diagnostic.to_string(), "Undefined function 'missing' at line 4");
    }

    #[test]
    fn test_diagnostic_json_omits_missing_position() {
        let diagnostic = Diagnostic::new(ErrorKind::IoError, "gone", None);
        let json = serde_json::to_value(&diagnostic).unwrap();
        assert_eq!(json["kind"], "io_error");
        assert_eq!(json["message"], "gone");
        assert!(json.get("source_position").is_none());
    }
}
