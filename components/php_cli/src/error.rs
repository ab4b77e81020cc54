//! Error types for the CLI

use core_types::{Diagnostic, ErrorKind};
use parser::ParseError;
use std::io;
use thiserror::Error;

/// CLI-specific errors
#[derive(Debug, Error)]
pub enum CliError {
    /// The input path does not exist
    #[error("File '{0}' does not exist")]
    FileNotFound(String),

    /// The input exists but could not be read
    #[error("Error reading file '{path}': {source}")]
    Read {
        /// Path that failed
        path: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The source has syntax errors
    #[error("Parser errors for file '{path}':\n{}", join_lines(.errors))]
    Parse {
        /// Path of the parsed file
        path: String,
        /// Every error the parser recorded
        errors: Vec<ParseError>,
    },

    /// A document could not be encoded
    #[error("Error converting AST to JSON: {0}")]
    Json(#[from] serde_json::Error),
}

fn join_lines(errors: &[ParseError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

impl CliError {
    /// Diagnostics for this failure
    ///
    /// I/O failures map to a single [`ErrorKind::IoError`]; syntax failures
    /// yield one positioned diagnostic per parser error. Encoding failures
    /// have no source diagnostic.
    pub fn to_diagnostics(&self) -> Vec<Diagnostic> {
        match self {
            CliError::FileNotFound(_) | CliError::Read { .. } => {
                vec![Diagnostic::new(ErrorKind::IoError, self.to_string(), None)]
            }
            CliError::Parse { errors, .. } => {
                errors.iter().map(ParseError::to_diagnostic).collect()
            }
            CliError::Json(_) => Vec::new(),
        }
    }
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;
