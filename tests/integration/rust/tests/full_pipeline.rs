//! Full Pipeline Integration Tests
//!
//! Tests the complete flow: Source -> Lexer -> Parser -> AST -> JSON -> Semantic document

use core_types::ErrorKind;
use parser::{analyze, parse, to_json, Lexer, Parser, TokenKind};
use serde_json::{json, Value};

/// Parse `source` and return its JSON document
fn pipeline(source: &str) -> Result<Value, String> {
    let mut parser = Parser::new(Lexer::new(source));
    let program = parser.parse_program();
    if !parser.errors().is_empty() {
        return Err(format!("Parse errors: {:?}", parser.errors()));
    }
    let json = to_json(&program).map_err(|e| format!("JSON error: {}", e))?;
    serde_json::from_str(&json).map_err(|e| format!("Reparse error: {}", e))
}

/// Test: full document for an arithmetic assignment
#[test]
fn test_full_pipeline_assignment_document() {
    let doc = pipeline("<?php $x = 5 + 3 * 2; ?>").expect("pipeline failed");
    assert_eq!(
        doc,
        json!({
            "type": "Program",
            "statements": [{
                "type": "ExpressionStatement",
                "expression": {
                    "type": "AssignmentExpression",
                    "name": {"type": "Variable", "name": "x"},
                    "value": {
                        "type": "InfixExpression",
                        "left": {"type": "IntegerLiteral", "value": 5},
                        "operator": "+",
                        "right": {
                            "type": "InfixExpression",
                            "left": {"type": "IntegerLiteral", "value": 3},
                            "operator": "*",
                            "right": {"type": "IntegerLiteral", "value": 2}
                        }
                    }
                }
            }]
        })
    );
}

/// Test: token stream and AST agree on the program
#[test]
fn test_full_pipeline_tokens_feed_parser() {
    let source = "<?php echo \"Hello $name!\"; ?>";
    let kinds: Vec<TokenKind> = Lexer::new(source).tokenize().iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::PhpOpen,
            TokenKind::Echo,
            TokenKind::String,
            TokenKind::Semicolon,
            TokenKind::PhpClose,
            TokenKind::Eof,
        ]
    );

    let doc = pipeline(source).expect("pipeline failed");
    let parts = &doc["statements"][0]["values"][0]["parts"];
    assert_eq!(parts[1], json!({"type": "Variable", "name": "name"}));
}

/// Test: a class-based program all the way to the semantic document
#[test]
fn test_full_pipeline_semantic_document() {
    let source = r#"<?php
namespace Shop;

use Billing\Invoice;

interface Priced {
    public function price();
}

class Item implements Priced {
    const TAX = 20;
    private $amount = 0;

    public function price() {
        return $this->amount * (100 + self::TAX) / 100;
    }
}

function checkout($items) {
    $total = 0;
    foreach ($items as $item) {
        $total = $total + $item->price();
    }
    return new Invoice($total);
}
"#;
    let outcome = parse(source);
    assert!(outcome.errors.is_empty(), "{:?}", outcome.errors);

    let semantic = analyze(outcome.program, "shop.php");
    let doc = semantic.to_value().expect("semantic JSON");

    assert_eq!(doc["type"], "SemanticProgram");
    assert_eq!(doc["program"]["statements"][0]["type"], "NamespaceDeclaration");

    let table = &doc["semantic_analysis"]["symbol_table"];
    assert_eq!(table["all_symbols"][r"Shop\Item"]["type"], "class");
    assert_eq!(table["all_symbols"][r"Shop\Priced"]["type"], "interface");
    assert_eq!(table["all_symbols"][r"Shop\TAX"]["type"], "constant");
    assert_eq!(table["class_hierarchy"][r"Shop\Item"], json!(["Priced"]));

    let references = &doc["semantic_analysis"]["references"];
    assert_eq!(references["total_references"], 1);
    assert_eq!(references["unresolved_count"], 1);
    assert_eq!(references["unresolved_references"][0]["name"], "Invoice");
    assert_eq!(semantic.errors, vec!["Undefined class 'Invoice' at line 24"]);

    let stats = &doc["semantic_analysis"]["statistics"];
    assert_eq!(stats["total_classes"], 1);
    assert_eq!(stats["total_interfaces"], 1);
    assert_eq!(stats["total_functions"], 2);
    assert_eq!(stats["total_namespaces"], 1);
}

/// Test: parser errors surface as positioned diagnostics
#[test]
fn test_full_pipeline_errors_become_diagnostics() {
    let mut parser = Parser::new(Lexer::new("<?php\nfunction ("));
    parser.parse_program();
    let diagnostics = parser.diagnostics();
    assert!(!diagnostics.is_empty());
    assert!(matches!(diagnostics[0].kind, ErrorKind::SyntaxError));
    assert!(diagnostics[0]
        .to_string()
        .starts_with("Parse error at line 2, column 10:"));
}

/// Test: pipeline rejects broken input
#[test]
fn test_full_pipeline_rejects_errors() {
    let result = pipeline("$a = 1 +;");
    assert!(result.is_err());
}
