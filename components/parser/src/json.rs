//! JSON rendering of a parsed [`Program`]
//!
//! Every node becomes an object with a `"type"` field naming the node kind.
//! Absent optional children are left out rather than written as `null`.

use crate::ast::Program;
use serde_json::Value;

/// Compact single-line JSON
pub fn to_json(program: &Program) -> serde_json::Result<String> {
    serde_json::to_string(program)
}

/// Two-space indented JSON
pub fn to_json_pretty(program: &Program) -> serde_json::Result<String> {
    serde_json::to_string_pretty(program)
}

/// JSON document as a [`Value`] tree
pub fn to_value(program: &Program) -> serde_json::Result<Value> {
    serde_json::to_value(program)
}
