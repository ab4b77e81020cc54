//! Scope arena and symbol table for the semantic pass
//!
//! Scopes live in a flat `Vec` and refer to their parent by index, so the
//! resolver can walk outward without any owning back-references.

use core_types::{Diagnostic, ErrorKind};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Namespace separator inside qualified names
pub const NAMESPACE_SEPARATOR: char = '\\';

/// Index of a scope inside a [`SymbolTable`]
pub type ScopeId = usize;

/// What a declared name denotes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    /// `class Foo`
    Class,
    /// Functions and methods
    Function,
    /// Assigned variables, parameters and properties
    Variable,
    /// `const` declarations
    Constant,
    /// `interface Foo`
    Interface,
    /// `trait Foo`
    Trait,
}

impl SymbolKind {
    /// Every kind in report order
    pub const ALL: [SymbolKind; 6] = [
        SymbolKind::Class,
        SymbolKind::Function,
        SymbolKind::Variable,
        SymbolKind::Constant,
        SymbolKind::Interface,
        SymbolKind::Trait,
    ];

    /// Lower-case name
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Class => "class",
            SymbolKind::Function => "function",
            SymbolKind::Variable => "variable",
            SymbolKind::Constant => "constant",
            SymbolKind::Interface => "interface",
            SymbolKind::Trait => "trait",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of lexical region a scope covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeKind {
    /// File-level scope
    Global,
    /// Class body
    Class,
    /// Interface body
    Interface,
    /// Trait body
    Trait,
    /// Named function or closure body
    Function,
    /// Method body
    Method,
}

/// A declared name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Symbol {
    /// Name as written at the declaration
    pub name: String,
    /// Namespace-prefixed name, the key in the global table
    pub fully_qualified: String,
    /// What the name denotes
    #[serde(rename = "type")]
    pub kind: SymbolKind,
    /// Namespace active at the declaration, empty for global
    pub namespace: String,
    /// File the declaration came from
    pub file: String,
    /// 1-based declaration line
    pub line: u32,
}

/// A use of a name together with its resolution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymbolReference {
    /// Name as written at the use site
    pub name: String,
    /// Kind the use site expects
    pub kind: SymbolKind,
    /// Declaration the name resolved to
    pub resolved_symbol: Option<Symbol>,
    /// 1-based line of the use site
    pub line: u32,
    /// 1-based column of the use site
    pub column: u32,
}

impl SymbolReference {
    /// True when a declaration was found
    pub fn is_resolved(&self) -> bool {
        self.resolved_symbol.is_some()
    }

    /// `Undefined <kind> '<name>' at line <n>`
    pub fn undefined_message(&self) -> String {
        format!(
            "Undefined {} '{}' at line {}",
            self.kind, self.name, self.line
        )
    }

    /// Unresolved-reference diagnostic carrying [`Self::undefined_message`]
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::new(ErrorKind::UnresolvedReference, self.undefined_message(), None)
    }
}

/// One lexical region
#[derive(Debug, Clone, Serialize)]
pub struct Scope {
    /// Index in the arena
    pub id: ScopeId,
    /// Region kind
    pub kind: ScopeKind,
    /// Name of the declaration that opened the scope
    pub name: String,
    /// Enclosing scope, `None` for the global scope
    #[serde(skip)]
    pub parent: Option<ScopeId>,
    /// Symbols declared directly in this scope, by short name
    pub symbols: BTreeMap<String, Symbol>,
    /// Scopes opened inside this one
    pub children: Vec<ScopeId>,
    /// Active namespace
    pub namespace: String,
    /// Import aliases to fully-qualified names
    pub imports: BTreeMap<String, String>,
}

impl Scope {
    fn new(id: ScopeId, kind: ScopeKind, name: &str, parent: Option<ScopeId>) -> Self {
        Self {
            id,
            kind,
            name: name.to_string(),
            parent,
            symbols: BTreeMap::new(),
            children: Vec::new(),
            namespace: String::new(),
            imports: BTreeMap::new(),
        }
    }
}

/// Symbols, scopes and references for one analysed file
#[derive(Debug, Clone)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
    current: ScopeId,
    all_symbols: BTreeMap<String, Symbol>,
    namespaces: BTreeMap<String, Vec<Symbol>>,
    references: Vec<SymbolReference>,
    class_hierarchy: BTreeMap<String, Vec<String>>,
}

impl SymbolTable {
    /// Table with only the global scope
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::new(0, ScopeKind::Global, "global", None)],
            current: 0,
            all_symbols: BTreeMap::new(),
            namespaces: BTreeMap::new(),
            references: Vec::new(),
            class_hierarchy: BTreeMap::new(),
        }
    }

    /// Open a child of the current scope and make it current
    ///
    /// The child starts with a copy of the parent's namespace and imports.
    pub fn enter_scope(&mut self, kind: ScopeKind, name: &str) -> ScopeId {
        let id = self.scopes.len();
        let parent = &self.scopes[self.current];
        let mut scope = Scope::new(id, kind, name, Some(self.current));
        scope.namespace = parent.namespace.clone();
        scope.imports = parent.imports.clone();

        self.scopes[self.current].children.push(id);
        self.scopes.push(scope);
        self.current = id;
        id
    }

    /// Return to the parent scope; the global scope is never left
    pub fn exit_scope(&mut self) {
        if let Some(parent) = self.scopes[self.current].parent {
            self.current = parent;
        }
    }

    /// Set the namespace of the current scope
    pub fn set_namespace(&mut self, namespace: &str) {
        self.scopes[self.current].namespace = strip_absolute(namespace).to_string();
    }

    /// Active namespace
    pub fn current_namespace(&self) -> &str {
        &self.scopes[self.current].namespace
    }

    /// Register `use <fully_qualified> [as <alias>]` in the current scope
    ///
    /// Without an alias the last path segment is used.
    pub fn add_import(&mut self, fully_qualified: &str, alias: Option<&str>) {
        let target = strip_absolute(fully_qualified);
        let alias = match alias {
            Some(alias) => alias,
            None => target
                .rsplit(NAMESPACE_SEPARATOR)
                .next()
                .unwrap_or(target),
        };
        self.scopes[self.current]
            .imports
            .insert(alias.to_string(), target.to_string());
    }

    /// Namespace-prefixed form of `name` in the current namespace
    pub fn fully_qualified(&self, name: &str) -> String {
        if let Some(absolute) = name.strip_prefix(NAMESPACE_SEPARATOR) {
            return absolute.to_string();
        }
        let namespace = self.current_namespace();
        if namespace.is_empty() {
            name.to_string()
        } else {
            format!("{}{}{}", namespace, NAMESPACE_SEPARATOR, name)
        }
    }

    /// Declare `name` in the current scope
    ///
    /// A later declaration of the same fully-qualified name replaces the
    /// earlier one in the global table.
    pub fn declare(&mut self, name: &str, kind: SymbolKind, file: &str, line: u32) -> Symbol {
        let symbol = Symbol {
            name: name.to_string(),
            fully_qualified: self.fully_qualified(name),
            kind,
            namespace: self.current_namespace().to_string(),
            file: file.to_string(),
            line,
        };

        self.scopes[self.current]
            .symbols
            .insert(name.to_string(), symbol.clone());
        self.all_symbols
            .insert(symbol.fully_qualified.clone(), symbol.clone());
        self.namespaces
            .entry(symbol.namespace.clone())
            .or_default()
            .push(symbol.clone());
        symbol
    }

    /// Resolve `name` to a symbol of the given kind
    ///
    /// Tried in order: absolute name, import alias, enclosing scopes from
    /// the innermost out, current namespace, global table.
    pub fn resolve(&self, name: &str, kind: SymbolKind) -> Option<&Symbol> {
        let of_kind = |symbol: &&Symbol| symbol.kind == kind;

        if let Some(absolute) = name.strip_prefix(NAMESPACE_SEPARATOR) {
            return self.all_symbols.get(absolute).filter(of_kind);
        }

        let scope = &self.scopes[self.current];
        if let Some(target) = scope.imports.get(name) {
            if let Some(symbol) = self.all_symbols.get(target).filter(of_kind) {
                return Some(symbol);
            }
        }

        let mut cursor = Some(self.current);
        while let Some(id) = cursor {
            let scope = &self.scopes[id];
            if let Some(symbol) = scope.symbols.get(name).filter(of_kind) {
                return Some(symbol);
            }
            cursor = scope.parent;
        }

        if !scope.namespace.is_empty() {
            let qualified = format!("{}{}{}", scope.namespace, NAMESPACE_SEPARATOR, name);
            if let Some(symbol) = self.all_symbols.get(&qualified).filter(of_kind) {
                return Some(symbol);
            }
        }

        self.all_symbols.get(name).filter(of_kind)
    }

    /// Record a use of `name` and resolve it immediately
    pub fn add_reference(
        &mut self,
        name: &str,
        kind: SymbolKind,
        line: u32,
        column: u32,
    ) -> &SymbolReference {
        let resolved_symbol = self.resolve(name, kind).cloned();
        let index = self.references.len();
        self.references.push(SymbolReference {
            name: name.to_string(),
            kind,
            resolved_symbol,
            line,
            column,
        });
        &self.references[index]
    }

    /// Record `[extends, implements...]` for a class, names kept verbatim
    pub fn add_class_hierarchy(
        &mut self,
        class: &str,
        extends: Option<&str>,
        implements: impl IntoIterator<Item = String>,
    ) {
        let mut parents: Vec<String> = extends.map(str::to_string).into_iter().collect();
        parents.extend(implements);
        self.class_hierarchy.insert(class.to_string(), parents);
    }

    /// Symbol by fully-qualified name
    pub fn lookup(&self, fully_qualified: &str) -> Option<&Symbol> {
        self.all_symbols.get(strip_absolute(fully_qualified))
    }

    /// All symbols keyed by fully-qualified name
    pub fn all_symbols(&self) -> &BTreeMap<String, Symbol> {
        &self.all_symbols
    }

    /// Symbols grouped by declaring namespace
    pub fn namespace_symbols(&self) -> &BTreeMap<String, Vec<Symbol>> {
        &self.namespaces
    }

    /// Every recorded reference in visit order
    pub fn references(&self) -> &[SymbolReference] {
        &self.references
    }

    /// References with no matching declaration
    pub fn unresolved_references(&self) -> impl Iterator<Item = &SymbolReference> {
        self.references.iter().filter(|r| !r.is_resolved())
    }

    /// Class to `[extends, implements...]`
    pub fn class_hierarchy(&self) -> &BTreeMap<String, Vec<String>> {
        &self.class_hierarchy
    }

    /// The scope arena, global scope first
    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    /// Scope by id
    pub fn scope(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes.get(id)
    }

    /// Id of the current scope
    pub fn current_scope(&self) -> ScopeId {
        self.current
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

fn strip_absolute(name: &str) -> &str {
    name.strip_prefix(NAMESPACE_SEPARATOR).unwrap_or(name)
}
