//! Semantic analysis over multi-declaration sources

use parser::scope::ScopeKind;
use parser::{analyze, analyze_source, parse, SemanticProgram, SymbolKind};

const PAYROLL: &str = r#"<?php
namespace HR;

class User {
    public $department = "HR";
}

namespace Payroll;

use HR\User;

class PayrollService {
    public function processUser() {
        $user = new User();
        return $user;
    }
}

class PayrollUser {
    public function getName() {
        return "test";
    }
}

function calculateTax($amount) {
    return $amount;
}
?>"#;

fn payroll() -> SemanticProgram {
    analyze_source(PAYROLL, "payroll.php").unwrap()
}

#[test]
fn test_declarations_are_namespaced() {
    let semantic = payroll();
    let service = semantic.symbol(r"Payroll\PayrollService").unwrap();
    assert_eq!(service.namespace, "Payroll");
    assert_eq!(service.kind, SymbolKind::Class);
    assert_eq!(service.line, 12);

    let tax = semantic.symbol(r"Payroll\calculateTax").unwrap();
    assert_eq!(tax.kind, SymbolKind::Function);
    assert!(semantic.symbol(r"HR\User").is_some());
}

#[test]
fn test_import_alias_resolves_instantiation() {
    let semantic = payroll();
    let resolved = semantic.resolve_class_instantiation("User", 14).unwrap();
    assert_eq!(resolved.fully_qualified, r"HR\User");
    assert_eq!(semantic.class_references(r"HR\User").len(), 1);
    assert_eq!(semantic.class_references("User").len(), 1);
}

#[test]
fn test_payroll_has_no_unresolved_references() {
    let semantic = payroll();
    assert!(semantic.errors.is_empty(), "{:?}", semantic.errors);
    assert!(semantic.unresolved_references().is_empty());
}

#[test]
fn test_aliased_import_and_absolute_name() {
    let source = r"<?php
namespace HR;
class User { }
namespace Payroll;
use HR\User as HRUser;
class User { }
$hr = new HRUser();
$local = new User();
$absolute = new \HR\User();
$missing = new \User();
";
    let semantic = analyze_source(source, "multi.php").unwrap();
    let fqn = |name: &str, line: u32| {
        semantic
            .resolve_class_instantiation(name, line)
            .map(|s| s.fully_qualified.clone())
    };
    assert_eq!(fqn("HRUser", 7), Some(r"HR\User".to_string()));
    assert_eq!(fqn("User", 8), Some(r"Payroll\User".to_string()));
    assert_eq!(fqn(r"\HR\User", 9), Some(r"HR\User".to_string()));
    assert_eq!(fqn(r"\User", 10), None);
    assert_eq!(semantic.errors, vec![r"Undefined class '\User' at line 10"]);
}

#[test]
fn test_import_wins_over_same_named_local_class() {
    let source = r"<?php
namespace HR;
class User { }
namespace Payroll;
use HR\User;
class User { }
$employee = new User();
";
    let semantic = analyze_source(source, "payroll.php").unwrap();
    assert!(semantic.symbol(r"Payroll\User").is_some());
    let resolved = semantic
        .resolve_class_instantiation("User", 7)
        .map(|s| s.fully_qualified.clone());
    assert_eq!(resolved, Some(r"HR\User".to_string()));
    assert!(semantic.errors.is_empty(), "{:?}", semantic.errors);
}

#[test]
fn test_class_hierarchy_is_recorded_verbatim() {
    let source = "<?php namespace Shop; class Order extends Model implements Payable, \\Countable { }";
    let semantic = analyze_source(source, "shop.php").unwrap();
    assert_eq!(
        semantic.class_hierarchy_of(r"Shop\Order"),
        Some(&["Model".to_string(), r"\Countable".to_string()][..])
    );
}

#[test]
fn test_scopes_form_a_tree() {
    let semantic = payroll();
    let scopes = semantic.symbol_table.scopes();
    assert!(matches!(scopes[0].kind, ScopeKind::Global));
    let kinds: Vec<ScopeKind> = scopes.iter().skip(1).map(|s| s.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ScopeKind::Class,
            ScopeKind::Class,
            ScopeKind::Method,
            ScopeKind::Class,
            ScopeKind::Method,
            ScopeKind::Function,
        ]
    );
    for scope in scopes.iter().skip(1) {
        let parent = scope.parent.unwrap();
        assert!(scopes[parent].children.contains(&scope.id));
    }
}

#[test]
fn test_method_scope_holds_local_variables() {
    let semantic = payroll();
    let method = semantic
        .symbol_table
        .scopes()
        .iter()
        .find(|s| s.name == "processUser")
        .unwrap();
    assert_eq!(method.namespace, "Payroll");
    assert!(method.symbols.contains_key("user"));
    assert_eq!(method.imports.get("User"), Some(&r"HR\User".to_string()));
}

#[test]
fn test_wrong_kind_is_not_a_match() {
    let semantic = analyze_source("interface Logger { } new Logger();", "k.php").unwrap();
    assert_eq!(semantic.errors, vec!["Undefined class 'Logger' at line 1"]);
}

#[test]
fn test_statistics_and_report() {
    let semantic = payroll();
    let stats = semantic.statistics();
    assert_eq!(stats.total_classes, 3);
    assert_eq!(stats.total_functions, 3);
    assert_eq!(stats.total_namespaces, 2);

    let report = semantic.reference_report();
    assert_eq!(report.summary.total_references, 1);
    assert_eq!(report.summary.resolution_rate, 100.0);
    assert_eq!(report.by_symbol_type["class"].declared, 3);
    assert_eq!(report.by_symbol_type["class"].referenced, 1);
    assert_eq!(report.by_symbol_type["trait"].declared, 0);
    assert!(report.by_namespace.contains_key("HR"));
}

#[test]
fn test_unused_symbols() {
    let semantic = payroll();
    let unused: Vec<&str> = semantic
        .unused_symbols()
        .iter()
        .map(|s| s.fully_qualified.as_str())
        .collect();
    assert!(unused.contains(&r"Payroll\calculateTax"));
    assert!(!unused.contains(&r"HR\User"));
}

#[test]
fn test_semantic_document_round_trips_through_serde() {
    let semantic = payroll();
    let json = semantic.to_json().unwrap();
    let doc: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(doc["type"], "SemanticProgram");
    let table = &doc["semantic_analysis"]["symbol_table"];
    assert_eq!(table["all_symbols"][r"HR\User"]["type"], "class");
    assert_eq!(table["class_hierarchy"][r"Payroll\PayrollService"], serde_json::json!([]));
    assert_eq!(table["namespace_symbols"]["HR"][0]["name"], "User");
    assert_eq!(doc["semantic_analysis"]["references"]["unresolved_count"], 0);
}

#[test]
fn test_analyze_accepts_partial_program() {
    let outcome = parse("function ok() { } $x = ; ok();");
    assert!(!outcome.errors.is_empty());
    let semantic = analyze(outcome.program, "partial.php");
    assert_eq!(semantic.function_references("ok").len(), 1);
}
