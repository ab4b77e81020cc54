//! End-to-End CLI Integration Tests
//!
//! Drives real files through the `php_cli` driver, the highest level below
//! the binary itself.

use php_cli::{Cli, CliError, Driver, OutputMode};
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

fn run(source: &str, mode: OutputMode) -> Result<Value, CliError> {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("input.php");
    fs::write(&path, source).unwrap();
    let output = Driver::new(mode).process_file(&path)?;
    Ok(serde_json::from_str(&output).unwrap())
}

/// Test: function declaration to AST document
#[test]
fn test_e2e_function_declaration() {
    let doc = run("<?php function add($a, $b) { return $a + $b; }", OutputMode::Ast).unwrap();
    let function = &doc["statements"][0];
    assert_eq!(function["type"], "FunctionDeclaration");
    assert_eq!(function["name"]["value"], "add");
    assert_eq!(function["parameters"].as_array().map(Vec::len), Some(2));
    assert_eq!(function["body"]["statements"][0]["return_value"]["operator"], "+");
}

/// Test: empty file is an empty program
#[test]
fn test_e2e_empty_file() {
    let doc = run("", OutputMode::Ast).unwrap();
    assert_eq!(doc, serde_json::json!({"type": "Program", "statements": []}));
}

/// Test: import resolution through the semantic document
#[test]
fn test_e2e_semantic_import_resolution() {
    let source = r"<?php
namespace HR;
class User { }
namespace Payroll;
use HR\User;
class User { }
$u = new User();
";
    let doc = run(source, OutputMode::Semantic).unwrap();
    let reference = &doc["semantic_analysis"]["references"]["all_references"][0];
    assert_eq!(reference["name"], "User");
    assert_eq!(reference["kind"], "class");
    assert_eq!(reference["line"], 7);
    assert_eq!(reference["resolved_symbol"]["fully_qualified"], r"HR\User");
}

/// Test: report over a file with unresolved calls
#[test]
fn test_e2e_report_counts() {
    let doc = run("<?php helper(); strlen('x');", OutputMode::Report).unwrap();
    assert_eq!(doc["summary"]["total_references"], 2);
    assert_eq!(doc["summary"]["resolution_rate"], 0.0);
    assert_eq!(doc["by_symbol_type"]["function"]["referenced"], 0);
}

/// Test: syntax errors come back as CliError::Parse
#[test]
fn test_e2e_syntax_error() {
    let err = run("<?php $x = ;\n$y = ;", OutputMode::Ast).unwrap_err();
    let CliError::Parse { errors, .. } = err else {
        panic!("expected parse error");
    };
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[1].position().line, 2);
}

/// Test: the Cli type drives the driver configuration
#[test]
fn test_e2e_cli_configuration() {
    let mut cli = Cli::with_file("unused.php");
    cli.tokens = true;
    cli.compact = true;
    let driver = Driver::new(cli.output_mode()).with_pretty(!cli.compact);
    assert_eq!(driver.mode(), OutputMode::Tokens);

    let out = driver.process_source("<?php 1 & 2;", "inline.php").unwrap();
    assert!(!out.contains('\n'));
    let doc: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(doc["error_counts"]["missing_prefix_function"], 1);
}
