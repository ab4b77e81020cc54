//! Unit tests for SourcePosition

use core_types::SourcePosition;

#[cfg(test)]
mod source_position_tests {
    use super::*;

    #[test]
    fn test_source_position_creation() {
        let pos = SourcePosition {
            line: 10,
            column: 5,
            offset: 150,
        };

        assert_eq!(pos.line, 10);
        assert_eq!(pos.column, 5);
        assert_eq!(pos.offset, 150);
    }

    #[test]
    fn test_source_position_large_values() {
        let pos = SourcePosition::new(u32::MAX, u32::MAX, usize::MAX);

        assert_eq!(pos.line, u32::MAX);
        assert_eq!(pos.column, u32::MAX);
        assert_eq!(pos.offset, usize::MAX);
    }

    #[test]
    fn test_source_position_is_copy() {
        let pos = SourcePosition::new(3, 4, 20);
        let copied = pos;
        assert_eq!(pos, copied);
    }

    #[test]
    fn test_source_position_start() {
        let pos = SourcePosition::start();
        assert_eq!((pos.line, pos.column, pos.offset), (1, 1, 0));
    }

    #[test]
    fn test_source_position_serializes_all_fields() {
        let json = serde_json::to_value(SourcePosition::new(2, 8, 17)).unwrap();
        assert_eq!(json["line"], 2);
        assert_eq!(json["column"], 8);
        assert_eq!(json["offset"], 17);
    }
}
