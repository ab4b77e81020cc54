//! Command-line argument definition

use crate::driver::OutputMode;
use clap::{ArgAction, Parser as ClapParser};

/// Parse a PHP file and print its syntax tree as JSON
#[derive(Debug, Clone, ClapParser)]
#[command(name = "php-parser", version)]
pub struct Cli {
    /// PHP source file to parse
    pub file: String,

    /// Print the semantic document (symbols, references, hierarchy) instead of the plain AST
    #[arg(short, long, conflicts_with_all = ["report", "tokens"])]
    pub semantic: bool,

    /// Print the reference-resolution report
    #[arg(short, long, conflicts_with = "tokens")]
    pub report: bool,

    /// Print the token dump and parse errors without requiring a clean parse
    #[arg(short, long)]
    pub tokens: bool,

    /// Print single-line JSON
    #[arg(short, long)]
    pub compact: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Arguments for parsing `file` with every option at its default
    pub fn with_file(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            semantic: false,
            report: false,
            tokens: false,
            compact: false,
            verbose: 0,
        }
    }

    /// Document selected by the flags
    pub fn output_mode(&self) -> OutputMode {
        if self.semantic {
            OutputMode::Semantic
        } else if self.report {
            OutputMode::Report
        } else if self.tokens {
            OutputMode::Tokens
        } else {
            OutputMode::Ast
        }
    }
}

/// Log filter used when `RUST_LOG` is not set
pub fn directive_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "php_cli=warn,parser=warn",
        1 => "php_cli=info,parser=info",
        2 => "php_cli=debug,parser=debug",
        _ => "php_cli=trace,parser=trace",
    }
}
