//! PHP Parser Component
//!
//! Provides the lexer, Pratt parser, AST, JSON rendering and single-file
//! semantic analysis for a PHP-like scripting language.
//!
//! # Overview
//!
//! - [`Lexer`] - Turns source text into [`Token`]s, never fails
//! - [`Parser`] - Recursive descent over statements, precedence climbing over expressions
//! - [`Program`] - Root of the AST; every node serializes with a `"type"` tag
//! - [`TokenDump`] - Token stream and error summary for inputs that fail to parse
//! - [`SymbolTable`] - Scope arena with namespace-aware name resolution
//! - [`SemanticProgram`] - A program plus its symbols, references and reports
//!
//! # Example
//!
//! ```
//! use parser::{parse, to_json, Statement};
//!
//! let outcome = parse("<?php $x = 5 + 3 * 2; ?>");
//! assert!(outcome.errors.is_empty());
//! assert!(matches!(outcome.program.statements[0], Statement::Expression(_)));
//!
//! let json = to_json(&outcome.program).unwrap();
//! assert!(json.starts_with(r#"{"type":"Program""#));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ast;
pub mod debug;
pub mod error;
pub mod json;
pub mod lexer;
pub mod parser;
pub mod scope;
pub mod semantic;
pub mod token;

pub use ast::{Expression, Program, Statement};
pub use debug::TokenDump;
pub use error::ParseError;
pub use json::{to_json, to_json_pretty};
pub use lexer::Lexer;
pub use parser::{parse, ParseOutcome, Parser, Precedence};
pub use scope::{Scope, ScopeKind, Symbol, SymbolKind, SymbolReference, SymbolTable};
pub use semantic::{
    analyze, analyze_source, ReferenceReport, SemanticAnalyzer, SemanticError, SemanticProgram,
};
pub use token::{Token, TokenKind};
