//! Contract compliance tests for core_types
//!
//! These tests pin the public surface the parser and CLI depend on.

use core_types::{Diagnostic, ErrorKind, SourcePosition};

#[cfg(test)]
mod position_contract_tests {
    use super::*;

    /// Contract: positions are plain values usable as map keys
    #[test]
    fn test_source_position_is_hashable() {
        let mut seen = std::collections::HashSet::new();
        seen.insert(SourcePosition::new(1, 1, 0));
        seen.insert(SourcePosition::new(1, 1, 0));
        assert_eq!(seen.len(), 1);
    }

    /// Contract: Display renders "line:column"
    #[test]
    fn test_source_position_display_contract() {
        assert_eq!(format!("{}", SourcePosition::new(12, 3, 99)), "12:3");
    }
}

#[cfg(test)]
mod diagnostic_contract_tests {
    use super::*;

    /// Contract: every ErrorKind variant exists
    #[test]
    fn test_error_kind_variants() {
        let _ = ErrorKind::SyntaxError;
        let _ = ErrorKind::UnresolvedReference;
        let _ = ErrorKind::IoError;
    }

    /// Contract: Diagnostic implements std::error::Error
    #[test]
    fn test_diagnostic_is_error() {
        let boxed: Box<dyn std::error::Error> =
            Box::new(Diagnostic::new(ErrorKind::IoError, "unreadable", None));
        assert_eq!(boxed.to_string(), "unreadable");
    }
}
