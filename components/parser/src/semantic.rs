//! Single-file symbol resolution over a parsed [`Program`]
//!
//! # Overview
//!
//! [`SemanticAnalyzer`] walks the tree once. Declarations go into a
//! [`SymbolTable`]; every use of a class, function, constant or closure
//! variable is recorded as a [`SymbolReference`] and resolved on the spot.
//! Unresolved references are not errors: they are collected and can be
//! rendered with [`SemanticProgram::errors`].
//!
//! # Example
//!
//! ```
//! use parser::analyze_source;
//!
//! let source = "<?php function greet() {} greet();";
//! let semantic = analyze_source(source, "greet.php").unwrap();
//! assert_eq!(semantic.function_references("greet").len(), 1);
//! assert!(semantic.errors.is_empty());
//! ```

use crate::ast::*;
use crate::error::ParseError;
use crate::parser::parse;
use crate::scope::{ScopeKind, Symbol, SymbolKind, SymbolReference, SymbolTable};
use core_types::Diagnostic;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, info};

/// Names that refer to the enclosing class rather than a declaration
const CLASS_SELF_REFERENCES: [&str; 2] = ["self", "parent"];

/// Number of entries in each most-used list
const MOST_USED_LIMIT: usize = 10;

/// Failure to produce a [`SemanticProgram`]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SemanticError {
    /// The source did not parse cleanly
    #[error("parsing errors: {}", join_errors(.0))]
    Parse(Vec<ParseError>),
}

fn join_errors(errors: &[ParseError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Tree walker that fills a [`SymbolTable`]
pub struct SemanticAnalyzer {
    table: SymbolTable,
    file: String,
}

impl SemanticAnalyzer {
    /// Analyzer for declarations coming from `file`
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            table: SymbolTable::new(),
            file: file.into(),
        }
    }

    /// Walk every top-level statement
    pub fn analyze_program(&mut self, program: &Program) {
        for statement in &program.statements {
            self.visit_statement(statement);
        }
        debug!(
            file = %self.file,
            symbols = self.table.all_symbols().len(),
            references = self.table.references().len(),
            "semantic pass finished"
        );
    }

    /// One message per unresolved reference
    pub fn validate_references(&self) -> Vec<String> {
        self.table
            .unresolved_references()
            .map(SymbolReference::undefined_message)
            .collect()
    }

    /// Table built so far
    pub fn symbol_table(&self) -> &SymbolTable {
        &self.table
    }

    /// Give up the table
    pub fn into_symbol_table(self) -> SymbolTable {
        self.table
    }

    fn declare(&mut self, name: &str, kind: SymbolKind, line: u32) {
        let symbol = self.table.declare(name, kind, &self.file, line);
        debug!(fqn = %symbol.fully_qualified, kind = %kind, line, "declared");
    }

    fn reference(&mut self, name: &str, kind: SymbolKind, position: core_types::SourcePosition) -> bool {
        self.table
            .add_reference(name, kind, position.line, position.column)
            .is_resolved()
    }

    fn declare_parameters(&mut self, parameters: &[Variable]) {
        for parameter in parameters {
            self.declare(&parameter.name, SymbolKind::Variable, parameter.position.line);
        }
    }

    fn visit_block(&mut self, block: &BlockStatement) {
        for statement in &block.statements {
            self.visit_statement(statement);
        }
    }

    fn visit_statement(&mut self, statement: &Statement) {
        match statement {
            Statement::Expression(stmt) => self.visit_expression(&stmt.expression),
            Statement::Block(block) => self.visit_block(block),
            Statement::Function(func) => {
                self.declare(&func.name.value, SymbolKind::Function, func.position.line);
                self.table.enter_scope(ScopeKind::Function, &func.name.value);
                self.declare_parameters(&func.parameters);
                self.visit_block(&func.body);
                self.table.exit_scope();
            }
            Statement::Return(stmt) => {
                if let Some(value) = &stmt.return_value {
                    self.visit_expression(value);
                }
            }
            Statement::If(stmt) => {
                self.visit_expression(&stmt.condition);
                self.visit_block(&stmt.consequence);
                if let Some(alternative) = &stmt.alternative {
                    self.visit_block(alternative);
                }
            }
            Statement::For(stmt) => {
                self.visit_expression(&stmt.init);
                self.visit_expression(&stmt.condition);
                self.visit_expression(&stmt.update);
                self.visit_block(&stmt.body);
            }
            Statement::While(stmt) => {
                self.visit_expression(&stmt.condition);
                self.visit_block(&stmt.body);
            }
            Statement::Foreach(stmt) => {
                self.visit_expression(&stmt.array);
                if let Some(key) = &stmt.key {
                    self.declare(&key.name, SymbolKind::Variable, key.position.line);
                }
                self.declare(&stmt.value.name, SymbolKind::Variable, stmt.value.position.line);
                self.visit_block(&stmt.body);
            }
            Statement::Break(_) | Statement::Continue(_) => {}
            Statement::Echo(stmt) => {
                for value in &stmt.values {
                    self.visit_expression(value);
                }
            }
            Statement::Class(class) => self.visit_class(class),
            Statement::Interface(interface) => {
                let name = &interface.name.value;
                self.declare(name, SymbolKind::Interface, interface.position.line);
                self.table.enter_scope(ScopeKind::Interface, name);
                for method in &interface.methods {
                    self.declare(&method.name.value, SymbolKind::Function, method.position.line);
                }
                self.table.exit_scope();
            }
            Statement::Trait(declaration) => {
                let name = &declaration.name.value;
                self.declare(name, SymbolKind::Trait, declaration.position.line);
                self.table.enter_scope(ScopeKind::Trait, name);
                for property in &declaration.properties {
                    self.visit_property(property);
                }
                for method in &declaration.methods {
                    self.visit_method(method);
                }
                self.table.exit_scope();
            }
            Statement::Constant(constant) => self.visit_constant(constant),
            Statement::Namespace(namespace) => self.table.set_namespace(&namespace.name.value),
            Statement::Use(stmt) => self.table.add_import(
                &stmt.namespace.value,
                stmt.alias.as_ref().map(|alias| alias.value.as_str()),
            ),
            Statement::Try(stmt) => {
                self.visit_block(&stmt.body);
                for catch in &stmt.catches {
                    if let Some(exception_type) = &catch.exception_type {
                        self.reference(&exception_type.value, SymbolKind::Class, exception_type.position);
                    }
                    self.declare(&catch.variable.name, SymbolKind::Variable, catch.variable.position.line);
                    self.visit_block(&catch.body);
                }
                if let Some(finally) = &stmt.finally {
                    self.visit_block(finally);
                }
            }
            Statement::Throw(stmt) => self.visit_expression(&stmt.expression),
        }
    }

    fn visit_class(&mut self, class: &ClassDeclaration) {
        let name = &class.name.value;
        self.declare(name, SymbolKind::Class, class.position.line);

        let fully_qualified = self.table.fully_qualified(name);
        self.table.add_class_hierarchy(
            &fully_qualified,
            class.super_class.as_ref().map(|parent| parent.value.as_str()),
            class.interfaces.iter().map(|interface| interface.value.clone()),
        );

        self.table.enter_scope(ScopeKind::Class, name);
        for constant in &class.constants {
            self.visit_constant(constant);
        }
        for property in &class.properties {
            self.visit_property(property);
        }
        for method in &class.methods {
            self.visit_method(method);
        }
        self.table.exit_scope();
    }

    fn visit_constant(&mut self, constant: &ConstantDeclaration) {
        self.declare(&constant.name.value, SymbolKind::Constant, constant.position.line);
        self.visit_expression(&constant.value);
    }

    fn visit_property(&mut self, property: &PropertyDeclaration) {
        self.declare(&property.name.name, SymbolKind::Variable, property.position.line);
        if let Some(value) = &property.value {
            self.visit_expression(value);
        }
    }

    fn visit_method(&mut self, method: &MethodDeclaration) {
        self.declare(&method.name.value, SymbolKind::Function, method.position.line);
        self.table.enter_scope(ScopeKind::Method, &method.name.value);
        self.declare_parameters(&method.parameters);
        self.visit_block(&method.body);
        self.table.exit_scope();
    }

    fn visit_expression(&mut self, expression: &Expression) {
        match expression {
            Expression::Identifier(ident) => self.visit_bare_name(&ident.value, ident.position),
            Expression::NamespacedIdentifier(ident) => {
                self.visit_bare_name(&ident.qualified_name(), ident.position)
            }
            Expression::New(new) => {
                self.reference(&new.class_name.value, SymbolKind::Class, new.class_name.position);
                self.visit_expressions(&new.arguments);
            }
            Expression::Call(call) => {
                match call.function.as_ref() {
                    Expression::Identifier(ident) => {
                        self.reference(&ident.value, SymbolKind::Function, ident.position);
                    }
                    Expression::NamespacedIdentifier(ident) => {
                        self.reference(&ident.qualified_name(), SymbolKind::Function, ident.position);
                    }
                    callee => self.visit_expression(callee),
                }
                self.visit_expressions(&call.arguments);
            }
            Expression::ObjectAccess(access) => {
                self.visit_expression(&access.object);
                self.visit_member(&access.property);
            }
            Expression::StaticAccess(access) => {
                match access.class.as_ref() {
                    Expression::Identifier(ident) => self.visit_class_name(&ident.value, ident.position),
                    Expression::NamespacedIdentifier(ident) => {
                        self.visit_class_name(&ident.qualified_name(), ident.position)
                    }
                    class => self.visit_expression(class),
                }
                self.visit_member(&access.property);
            }
            Expression::Assignment(assignment) => {
                let target = &assignment.name;
                self.declare(&target.name, SymbolKind::Variable, target.position.line);
                self.visit_expression(&assignment.value);
            }
            Expression::Infix(infix) => {
                self.visit_expression(&infix.left);
                self.visit_expression(&infix.right);
            }
            Expression::Prefix(prefix) => self.visit_expression(&prefix.right),
            Expression::Postfix(postfix) => self.visit_expression(&postfix.left),
            Expression::Ternary(ternary) => {
                self.visit_expression(&ternary.condition);
                self.visit_expression(&ternary.true_value);
                self.visit_expression(&ternary.false_value);
            }
            Expression::Array(array) => self.visit_expressions(&array.elements),
            Expression::AssociativeArray(array) => {
                for pair in &array.pairs {
                    self.visit_expression(&pair.key);
                    self.visit_expression(&pair.value);
                }
            }
            Expression::Index(index) => {
                self.visit_expression(&index.left);
                self.visit_expression(&index.index);
            }
            Expression::AnonymousFunction(closure) => {
                self.table.enter_scope(ScopeKind::Function, "anonymous");
                self.declare_parameters(&closure.parameters);
                for captured in &closure.use_clause {
                    self.reference(&captured.name, SymbolKind::Variable, captured.position);
                }
                self.visit_block(&closure.body);
                self.table.exit_scope();
            }
            Expression::Yield(expr) => {
                if let Some(key) = &expr.key {
                    self.visit_expression(key);
                }
                if let Some(value) = &expr.value {
                    self.visit_expression(value);
                }
            }
            Expression::InterpolatedString(_)
            | Expression::Variable(_)
            | Expression::IntegerLiteral(_)
            | Expression::FloatLiteral(_)
            | Expression::StringLiteral(_)
            | Expression::BooleanLiteral(_)
            | Expression::NullLiteral(_) => {}
        }
    }

    fn visit_expressions(&mut self, expressions: &[Expression]) {
        for expression in expressions {
            self.visit_expression(expression);
        }
    }

    /// A bare name is a function first, then a constant
    fn visit_bare_name(&mut self, name: &str, position: core_types::SourcePosition) {
        if !self.reference(name, SymbolKind::Function, position) {
            self.reference(name, SymbolKind::Constant, position);
        }
    }

    fn visit_class_name(&mut self, name: &str, position: core_types::SourcePosition) {
        if !CLASS_SELF_REFERENCES.contains(&name) {
            self.reference(name, SymbolKind::Class, position);
        }
    }

    // Member names after `->` and `::` are not references.
    fn visit_member(&mut self, member: &Expression) {
        match member {
            Expression::Identifier(_)
            | Expression::NamespacedIdentifier(_)
            | Expression::Variable(_) => {}
            other => self.visit_expression(other),
        }
    }
}

/// Aggregate symbol counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Statistics {
    /// Entries in the global table
    pub total_symbols: usize,
    /// Distinct namespaces with at least one declaration
    pub total_namespaces: usize,
    /// Class symbols
    pub total_classes: usize,
    /// Function and method symbols
    pub total_functions: usize,
    /// Interface symbols
    pub total_interfaces: usize,
    /// Trait symbols
    pub total_traits: usize,
}

/// Headline numbers of a [`ReferenceReport`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    /// Entries in the global table
    pub total_symbols: usize,
    /// Recorded references
    pub total_references: usize,
    /// References with no declaration
    pub unresolved_references: usize,
    /// Percentage of references that resolved
    pub resolution_rate: f64,
}

/// Declared and referenced counts for one symbol kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KindCounts {
    /// Symbols of this kind in the global table
    pub declared: usize,
    /// References that resolved to this kind
    pub referenced: usize,
}

/// Resolution summary broken down by kind and namespace
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceReport {
    /// Headline numbers
    pub summary: ReportSummary,
    /// Counts per symbol kind, every kind present
    pub by_symbol_type: BTreeMap<&'static str, KindCounts>,
    /// Declarations per namespace
    pub by_namespace: BTreeMap<String, usize>,
    /// References with no declaration
    pub unresolved: Vec<SymbolReference>,
}

/// A symbol with its reference count
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymbolUsage {
    /// The referenced symbol
    pub symbol: Symbol,
    /// Resolved references to it
    pub usage_count: usize,
}

/// Most and least used declarations
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageStatistics {
    /// Classes by descending reference count
    pub most_used_classes: Vec<SymbolUsage>,
    /// Functions by descending reference count
    pub most_used_functions: Vec<SymbolUsage>,
    /// Declarations nothing resolved to
    pub unused_symbols: Vec<Symbol>,
}

/// A parsed program together with its symbol table
#[derive(Debug, Clone)]
pub struct SemanticProgram {
    /// The analysed tree
    pub program: Program,
    /// Declarations, scopes and references
    pub symbol_table: SymbolTable,
    /// `Undefined <kind> '<name>' at line <n>` for each unresolved reference
    pub errors: Vec<String>,
}

impl SemanticProgram {
    /// Every reference in visit order
    pub fn references(&self) -> &[SymbolReference] {
        self.symbol_table.references()
    }

    /// References with no matching declaration
    pub fn unresolved_references(&self) -> Vec<&SymbolReference> {
        self.symbol_table.unresolved_references().collect()
    }

    /// One diagnostic per unresolved reference, in visit order
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.symbol_table
            .unresolved_references()
            .map(SymbolReference::to_diagnostic)
            .collect()
    }

    /// All symbols by fully-qualified name
    pub fn all_symbols(&self) -> &BTreeMap<String, Symbol> {
        self.symbol_table.all_symbols()
    }

    /// Symbols grouped by namespace
    pub fn namespace_symbols(&self) -> &BTreeMap<String, Vec<Symbol>> {
        self.symbol_table.namespace_symbols()
    }

    /// Class to `[extends, implements...]`
    pub fn class_hierarchy(&self) -> &BTreeMap<String, Vec<String>> {
        self.symbol_table.class_hierarchy()
    }

    /// Resolved references to a class, matched by short or qualified name
    pub fn class_references(&self, name: &str) -> Vec<&SymbolReference> {
        self.references_to(name, SymbolKind::Class)
    }

    /// Resolved references to a function, matched by short or qualified name
    pub fn function_references(&self, name: &str) -> Vec<&SymbolReference> {
        self.references_to(name, SymbolKind::Function)
    }

    fn references_to(&self, name: &str, kind: SymbolKind) -> Vec<&SymbolReference> {
        self.references()
            .iter()
            .filter(|reference| {
                reference.resolved_symbol.as_ref().is_some_and(|symbol| {
                    symbol.kind == kind
                        && (symbol.name == name || symbol.fully_qualified == name)
                })
            })
            .collect()
    }

    /// Symbol by fully-qualified name
    pub fn symbol(&self, fully_qualified: &str) -> Option<&Symbol> {
        self.symbol_table.lookup(fully_qualified)
    }

    /// Symbols declared in `namespace`, empty for unknown namespaces
    pub fn symbols_in_namespace(&self, namespace: &str) -> &[Symbol] {
        self.namespace_symbols()
            .get(namespace)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// `[extends, implements...]` recorded for a class
    pub fn class_hierarchy_of(&self, fully_qualified: &str) -> Option<&[String]> {
        self.class_hierarchy()
            .get(fully_qualified)
            .map(Vec::as_slice)
    }

    /// Class a name written on `line` resolved to
    pub fn resolve_class_instantiation(&self, name: &str, line: u32) -> Option<&Symbol> {
        self.resolved_at(name, line, SymbolKind::Class)
    }

    /// Function a call written on `line` resolved to
    pub fn resolve_function_call(&self, name: &str, line: u32) -> Option<&Symbol> {
        self.resolved_at(name, line, SymbolKind::Function)
    }

    fn resolved_at(&self, name: &str, line: u32, kind: SymbolKind) -> Option<&Symbol> {
        self.references()
            .iter()
            .filter(|reference| reference.name == name && reference.line == line)
            .filter_map(|reference| reference.resolved_symbol.as_ref())
            .find(|symbol| symbol.kind == kind)
    }

    /// Declarations no reference resolved to, in fully-qualified order
    pub fn unused_symbols(&self) -> Vec<&Symbol> {
        let used = self.usage_counts();
        self.all_symbols()
            .values()
            .filter(|symbol| !used.contains_key(symbol.fully_qualified.as_str()))
            .collect()
    }

    fn usage_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for symbol in self.references().iter().filter_map(|r| r.resolved_symbol.as_ref()) {
            *counts.entry(symbol.fully_qualified.as_str()).or_insert(0) += 1;
        }
        counts
    }

    fn most_used(&self, kind: SymbolKind) -> Vec<SymbolUsage> {
        let mut usages: Vec<SymbolUsage> = self
            .usage_counts()
            .into_iter()
            .filter_map(|(fqn, usage_count)| {
                self.all_symbols()
                    .get(fqn)
                    .filter(|symbol| symbol.kind == kind)
                    .map(|symbol| SymbolUsage {
                        symbol: symbol.clone(),
                        usage_count,
                    })
            })
            .collect();
        usages.sort_by(|a, b| {
            b.usage_count
                .cmp(&a.usage_count)
                .then_with(|| a.symbol.fully_qualified.cmp(&b.symbol.fully_qualified))
        });
        usages.truncate(MOST_USED_LIMIT);
        usages
    }

    /// Most used classes and functions plus unused declarations
    pub fn usage_statistics(&self) -> UsageStatistics {
        UsageStatistics {
            most_used_classes: self.most_used(SymbolKind::Class),
            most_used_functions: self.most_used(SymbolKind::Function),
            unused_symbols: self.unused_symbols().into_iter().cloned().collect(),
        }
    }

    fn count_kind(&self, kind: SymbolKind) -> usize {
        self.all_symbols().values().filter(|s| s.kind == kind).count()
    }

    /// Aggregate symbol counts
    pub fn statistics(&self) -> Statistics {
        Statistics {
            total_symbols: self.all_symbols().len(),
            total_namespaces: self.namespace_symbols().len(),
            total_classes: self.count_kind(SymbolKind::Class),
            total_functions: self.count_kind(SymbolKind::Function),
            total_interfaces: self.count_kind(SymbolKind::Interface),
            total_traits: self.count_kind(SymbolKind::Trait),
        }
    }

    /// Resolution summary broken down by kind and namespace
    pub fn reference_report(&self) -> ReferenceReport {
        let total_references = self.references().len();
        let unresolved: Vec<SymbolReference> = self
            .symbol_table
            .unresolved_references()
            .cloned()
            .collect();
        let resolution_rate = if total_references == 0 {
            100.0
        } else {
            (total_references - unresolved.len()) as f64 / total_references as f64 * 100.0
        };

        let mut by_symbol_type: BTreeMap<&'static str, KindCounts> = SymbolKind::ALL
            .iter()
            .map(|kind| (kind.as_str(), KindCounts::default()))
            .collect();
        for symbol in self.all_symbols().values() {
            if let Some(counts) = by_symbol_type.get_mut(symbol.kind.as_str()) {
                counts.declared += 1;
            }
        }
        for symbol in self.references().iter().filter_map(|r| r.resolved_symbol.as_ref()) {
            if let Some(counts) = by_symbol_type.get_mut(symbol.kind.as_str()) {
                counts.referenced += 1;
            }
        }

        ReferenceReport {
            summary: ReportSummary {
                total_symbols: self.all_symbols().len(),
                total_references,
                unresolved_references: unresolved.len(),
                resolution_rate,
            },
            by_symbol_type,
            by_namespace: self
                .namespace_symbols()
                .iter()
                .map(|(namespace, symbols)| (namespace.clone(), symbols.len()))
                .collect(),
            unresolved,
        }
    }

    /// The semantic document as a [`serde_json::Value`]
    pub fn to_value(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self.document())
    }

    /// The semantic document, two-space indented
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.document())
    }

    /// The semantic document on one line
    pub fn to_json_compact(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.document())
    }

    fn document(&self) -> SemanticDocument<'_> {
        let unresolved_references = self.unresolved_references();
        SemanticDocument {
            kind: "SemanticProgram",
            program: &self.program,
            semantic_analysis: SemanticAnalysis {
                symbol_table: SymbolTableSection {
                    all_symbols: self.all_symbols(),
                    namespace_symbols: self.namespace_symbols(),
                    class_hierarchy: self.class_hierarchy(),
                },
                references: ReferencesSection {
                    all_references: self.references(),
                    total_references: self.references().len(),
                    unresolved_count: unresolved_references.len(),
                    unresolved_references,
                },
                statistics: self.statistics(),
            },
        }
    }
}

#[derive(Serialize)]
struct SemanticDocument<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    program: &'a Program,
    semantic_analysis: SemanticAnalysis<'a>,
}

#[derive(Serialize)]
struct SemanticAnalysis<'a> {
    symbol_table: SymbolTableSection<'a>,
    references: ReferencesSection<'a>,
    statistics: Statistics,
}

#[derive(Serialize)]
struct SymbolTableSection<'a> {
    all_symbols: &'a BTreeMap<String, Symbol>,
    namespace_symbols: &'a BTreeMap<String, Vec<Symbol>>,
    class_hierarchy: &'a BTreeMap<String, Vec<String>>,
}

#[derive(Serialize)]
struct ReferencesSection<'a> {
    all_references: &'a [SymbolReference],
    unresolved_references: Vec<&'a SymbolReference>,
    total_references: usize,
    unresolved_count: usize,
}

/// Analyse an already parsed program
pub fn analyze(program: Program, file: &str) -> SemanticProgram {
    let mut analyzer = SemanticAnalyzer::new(file);
    analyzer.analyze_program(&program);
    let errors = analyzer.validate_references();
    info!(
        file,
        symbols = analyzer.symbol_table().all_symbols().len(),
        unresolved = errors.len(),
        "semantic analysis complete"
    );
    SemanticProgram {
        program,
        symbol_table: analyzer.into_symbol_table(),
        errors,
    }
}

/// Parse and analyse `source`
///
/// # Errors
///
/// Returns [`SemanticError::Parse`] with every parse error when the source
/// does not parse cleanly.
pub fn analyze_source(source: &str, file: &str) -> Result<SemanticProgram, SemanticError> {
    let outcome = parse(source);
    if !outcome.errors.is_empty() {
        return Err(SemanticError::Parse(outcome.errors));
    }
    Ok(analyze(outcome.program, file))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyzed(source: &str) -> SemanticProgram {
        analyze_source(source, "test.php").unwrap()
    }

    #[test]
    fn test_function_declaration_and_call() {
        let semantic = analyzed("<?php function add($a, $b) { return $a + $b; } add(1, 2);");
        let symbol = semantic.symbol("add").unwrap();
        assert_eq!(symbol.kind, SymbolKind::Function);
        assert_eq!(symbol.file, "test.php");
        assert_eq!(semantic.function_references("add").len(), 1);
        assert!(semantic.errors.is_empty());
    }

    #[test]
    fn test_parameters_are_scoped_variables() {
        let semantic = analyzed("function f($x) { }");
        let function_scope = &semantic.symbol_table.scopes()[1];
        assert!(matches!(function_scope.kind, ScopeKind::Function));
        assert!(function_scope.symbols.contains_key("x"));
    }

    #[test]
    fn test_unresolved_call_reports_function_then_constant() {
        let semantic = analyzed("missing;");
        let kinds: Vec<SymbolKind> = semantic.references().iter().map(|r| r.kind).collect();
        assert_eq!(kinds, vec![SymbolKind::Function, SymbolKind::Constant]);
        assert_eq!(
            semantic.errors,
            vec![
                "Undefined function 'missing' at line 1".to_string(),
                "Undefined constant 'missing' at line 1".to_string(),
            ]
        );
    }

    #[test]
    fn test_unresolved_references_become_diagnostics() {
        let semantic = analyzed("function f() { } f(); g();");
        let diagnostics = semantic.diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, core_types::ErrorKind::UnresolvedReference);
        assert_eq!(diagnostics[0].to_string(), "Undefined function 'g' at line 1");
        assert!(diagnostics[0].source_position.is_none());
    }

    #[test]
    fn test_constant_resolves_as_bare_name() {
        let semantic = analyzed("const LIMIT = 10; echo LIMIT;");
        let last = semantic.references().last().unwrap();
        assert_eq!(last.kind, SymbolKind::Constant);
        assert!(last.is_resolved());
    }

    #[test]
    fn test_member_names_are_not_references() {
        let semantic = analyzed("$obj = 1; $obj->run(); $obj->name;");
        assert!(semantic.references().is_empty());
    }

    #[test]
    fn test_static_access_records_class() {
        let semantic = analyzed("class Config { const A = 1; } Config::A; self::A;");
        assert_eq!(semantic.class_references("Config").len(), 1);
        assert_eq!(semantic.references().len(), 1);
    }

    #[test]
    fn test_catch_records_class_and_variable() {
        let semantic = analyzed("try { } catch (Failure $e) { }");
        assert_eq!(semantic.errors, vec!["Undefined class 'Failure' at line 1"]);
        assert!(semantic.symbol("e").is_some());
    }

    #[test]
    fn test_closure_use_variables_resolve_outward() {
        let semantic = analyzed("$rate = 2; $f = function($x) use ($rate) { return $x * $rate; };");
        let captured = &semantic.references()[0];
        assert_eq!(captured.kind, SymbolKind::Variable);
        assert!(captured.is_resolved());
    }

    #[test]
    fn test_class_members_and_hierarchy() {
        let semantic = analyzed(
            "namespace App; class Admin extends User implements Auditable { const ROLE = 'admin'; private $level = 1; public function promote($to) { } }",
        );
        assert_eq!(
            semantic.class_hierarchy_of("App\\Admin"),
            Some(&["User".to_string(), "Auditable".to_string()][..])
        );
        let names: Vec<(&str, SymbolKind)> = semantic
            .symbols_in_namespace("App")
            .iter()
            .map(|s| (s.name.as_str(), s.kind))
            .collect();
        assert_eq!(
            names,
            vec![
                ("Admin", SymbolKind::Class),
                ("ROLE", SymbolKind::Constant),
                ("level", SymbolKind::Variable),
                ("promote", SymbolKind::Function),
                ("to", SymbolKind::Variable),
            ]
        );
    }

    #[test]
    fn test_interface_and_trait() {
        let semantic = analyzed("interface Shape { public function area(); } trait Named { public function name() { } }");
        assert_eq!(semantic.symbol("Shape").map(|s| s.kind), Some(SymbolKind::Interface));
        assert_eq!(semantic.symbol("Named").map(|s| s.kind), Some(SymbolKind::Trait));
        let stats = semantic.statistics();
        assert_eq!(stats.total_interfaces, 1);
        assert_eq!(stats.total_traits, 1);
    }

    #[test]
    fn test_import_wins_over_namespace() {
        let source = "<?php
namespace HR;
class User { }
namespace Payroll;
use HR\\User;
class User { }
class Service {
    public function run() {
        return new User();
    }
}
";
        let semantic = analyzed(source);
        let resolved = semantic.resolve_class_instantiation("User", 9).unwrap();
        assert_eq!(resolved.fully_qualified, "HR\\User");
    }

    #[test]
    fn test_unused_symbols_and_usage() {
        let semantic = analyzed("function used() { } function idle() { } used(); used();");
        let unused: Vec<&str> = semantic
            .unused_symbols()
            .iter()
            .map(|s| s.fully_qualified.as_str())
            .collect();
        assert_eq!(unused, vec!["idle"]);

        let usage = semantic.usage_statistics();
        assert_eq!(usage.most_used_functions.len(), 1);
        assert_eq!(usage.most_used_functions[0].usage_count, 2);
    }

    #[test]
    fn test_reference_report() {
        let semantic = analyzed("function f() { } f(); g(); UNKNOWN;");
        let report = semantic.reference_report();
        assert_eq!(report.summary.total_references, 4);
        assert_eq!(report.summary.unresolved_references, 3);
        assert_eq!(report.summary.resolution_rate, 25.0);
        assert_eq!(report.by_symbol_type.len(), 6);
        assert_eq!(report.by_symbol_type["function"], KindCounts { declared: 1, referenced: 1 });
        assert_eq!(report.by_namespace[""], 1);
    }

    #[test]
    fn test_report_without_references() {
        let report = analyzed("$x = 1;").reference_report();
        assert_eq!(report.summary.resolution_rate, 100.0);
    }

    #[test]
    fn test_parse_errors_abort_analysis() {
        let err = analyze_source("$x = ;", "bad.php").unwrap_err();
        let SemanticError::Parse(errors) = &err;
        assert!(!errors.is_empty());
        assert!(err.to_string().starts_with("parsing errors: "));
    }

    #[test]
    fn test_document_layout() {
        let semantic = analyzed("class A { } new A();");
        let doc = semantic.to_value().unwrap();
        assert_eq!(doc["type"], "SemanticProgram");
        assert_eq!(doc["program"]["type"], "Program");
        let analysis = &doc["semantic_analysis"];
        assert_eq!(analysis["symbol_table"]["all_symbols"]["A"]["type"], "class");
        assert_eq!(analysis["references"]["total_references"], 1);
        assert_eq!(analysis["references"]["unresolved_count"], 0);
        assert_eq!(
            analysis["references"]["all_references"][0]["resolved_symbol"]["fully_qualified"],
            "A"
        );
        assert_eq!(analysis["statistics"]["total_classes"], 1);
    }
}
