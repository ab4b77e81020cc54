//! Token dump for diagnosing inputs that fail to parse

use crate::error::ParseError;
use crate::lexer::Lexer;
use crate::parser::parse;
use crate::token::{Token, TokenKind};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::trace;

const REPORT_TOKEN_LIMIT: usize = 20;
const REPORT_ERROR_LIMIT: usize = 10;

/// Full token stream plus the parse errors it produces
#[derive(Debug, Clone, Serialize)]
pub struct TokenDump {
    /// Source text
    pub input: String,
    /// Every token up to and including EOF
    pub tokens: Vec<Token>,
    /// Tokens the lexer could not classify
    pub illegal_tokens: Vec<Token>,
    /// Errors from a full parse of the same input
    pub parse_errors: Vec<ParseError>,
    /// Token kinds that appeared where an expression was expected
    pub missing_prefix_functions: BTreeSet<TokenKind>,
    /// Error counts by category
    pub error_counts: BTreeMap<&'static str, usize>,
}

impl TokenDump {
    /// Tokenize and parse `source`
    pub fn from_source(source: &str) -> Self {
        let tokens = Lexer::new(source).tokenize();
        for token in &tokens {
            trace!(kind = %token.kind, literal = %token.literal, line = token.line, column = token.column, "token");
        }

        let illegal_tokens = tokens
            .iter()
            .filter(|t| t.is(TokenKind::Illegal))
            .cloned()
            .collect();

        let parse_errors = parse(source).errors;

        let mut missing_prefix_functions = BTreeSet::new();
        let mut error_counts = BTreeMap::new();
        for error in &parse_errors {
            let category = match error {
                ParseError::NoPrefixParser { kind, .. } => {
                    missing_prefix_functions.insert(*kind);
                    "missing_prefix_function"
                }
                ParseError::UnexpectedToken { .. } => "unexpected_token",
                _ => "other",
            };
            *error_counts.entry(category).or_insert(0) += 1;
        }

        Self {
            input: source.to_string(),
            tokens,
            illegal_tokens,
            parse_errors,
            missing_prefix_functions,
            error_counts,
        }
    }

    /// True when the input lexes and parses cleanly
    pub fn is_clean(&self) -> bool {
        self.illegal_tokens.is_empty() && self.parse_errors.is_empty()
    }
}

/// Human-readable summary
impl fmt::Display for TokenDump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Token Dump ===")?;
        writeln!(f, "Input length: {} bytes", self.input.len())?;
        writeln!(f, "Total tokens: {}", self.tokens.len())?;
        writeln!(f, "Parse errors: {}", self.parse_errors.len())?;
        writeln!(f, "Illegal tokens: {}", self.illegal_tokens.len())?;

        if !self.illegal_tokens.is_empty() {
            writeln!(f, "\n--- Illegal Tokens ---")?;
            for token in &self.illegal_tokens {
                writeln!(f, "  Line {}:{} - {:?}", token.line, token.column, token.literal)?;
            }
        }

        if !self.missing_prefix_functions.is_empty() {
            writeln!(f, "\n--- Missing Prefix Parse Functions ---")?;
            for kind in &self.missing_prefix_functions {
                writeln!(f, "  - {}", kind)?;
            }
        }

        if !self.parse_errors.is_empty() {
            writeln!(f, "\n--- Parse Errors ---")?;
            for (i, error) in self.parse_errors.iter().take(REPORT_ERROR_LIMIT).enumerate() {
                writeln!(f, "  {}. {}", i + 1, error)?;
            }
            if self.parse_errors.len() > REPORT_ERROR_LIMIT {
                writeln!(
                    f,
                    "  ... and {} more errors",
                    self.parse_errors.len() - REPORT_ERROR_LIMIT
                )?;
            }
        }

        writeln!(f, "\n--- Token Stream ---")?;
        for (i, token) in self.tokens.iter().take(REPORT_TOKEN_LIMIT).enumerate() {
            writeln!(f, "  {:2}. {:<24} {:?}", i + 1, token.kind.name(), token.literal)?;
        }
        if self.tokens.len() > REPORT_TOKEN_LIMIT {
            writeln!(
                f,
                "  ... and {} more tokens",
                self.tokens.len() - REPORT_TOKEN_LIMIT
            )?;
        }
        Ok(())
    }
}
