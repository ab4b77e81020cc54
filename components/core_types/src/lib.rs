//! Core types shared by the PHP front-end components.
//!
//! This crate provides the foundational types used across the lexer, parser,
//! semantic analyzer and CLI: source locations and diagnostics.
//!
//! # Overview
//!
//! - [`SourcePosition`] - Line/column/offset of a token in the source text
//! - [`Diagnostic`] - A positioned, human-readable problem report
//! - [`ErrorKind`] - Category of a diagnostic
//!
//! # Examples
//!
//! ```
//! use core_types::{Diagnostic, ErrorKind, SourcePosition};
//!
//! let diagnostic = Diagnostic {
//!     kind: ErrorKind::SyntaxError,
//!     message: "expected next token to be IDENT, got LPAREN instead".to_string(),
//!     source_position: Some(SourcePosition::new(3, 10, 42)),
//! };
//!
//! assert_eq!(
//!     diagnostic.to_string(),
//!     "Parse error at line 3, column 10: expected next token to be IDENT, got LPAREN instead"
//! );
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod error;
mod source;

pub use error::{Diagnostic, ErrorKind};
pub use source::SourcePosition;
