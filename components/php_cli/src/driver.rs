//! File driver: read, parse, analyse and render one source file

use crate::error::{CliError, CliResult};
use parser::{analyze, parse, to_json, to_json_pretty, Program, TokenDump};
use serde::Serialize;
use serde_json::to_string_pretty;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Which document the driver renders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// The plain AST
    #[default]
    Ast,
    /// AST plus symbol table, references and statistics
    Semantic,
    /// Reference-resolution report
    Report,
    /// Token stream with illegal tokens and parse errors
    Tokens,
}

/// Turns a source file into a JSON document
#[derive(Debug, Clone)]
pub struct Driver {
    mode: OutputMode,
    pretty: bool,
}

impl Driver {
    /// Driver rendering `mode`, pretty-printed by default
    pub fn new(mode: OutputMode) -> Self {
        Self { mode, pretty: true }
    }

    /// Choose between two-space indented and single-line output
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Selected document
    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Read `path` and render the selected document
    ///
    /// # Errors
    ///
    /// Returns [`CliError::FileNotFound`] or [`CliError::Read`] when the
    /// file is unavailable, and [`CliError::Parse`] when it has syntax
    /// errors (except in token mode, which reports them in the dump).
    pub fn process_file(&self, path: impl AsRef<Path>) -> CliResult<String> {
        let path = path.as_ref();
        let display = path.display().to_string();

        if !path.exists() {
            return Err(CliError::FileNotFound(display));
        }
        let source = fs::read_to_string(path).map_err(|source| CliError::Read {
            path: display.clone(),
            source,
        })?;
        info!(path = %path.display(), bytes = source.len(), "read source");

        self.process_source(&source, &display)
    }

    /// Render the selected document for in-memory `source`
    ///
    /// `file_name` is recorded on every declared symbol.
    pub fn process_source(&self, source: &str, file_name: &str) -> CliResult<String> {
        match self.mode {
            OutputMode::Ast => {
                let program = parse_clean(source, file_name)?;
                if self.pretty {
                    Ok(to_json_pretty(&program)?)
                } else {
                    Ok(to_json(&program)?)
                }
            }
            OutputMode::Semantic => {
                let semantic = analyze(parse_clean(source, file_name)?, file_name);
                if self.pretty {
                    Ok(semantic.to_json()?)
                } else {
                    Ok(semantic.to_json_compact()?)
                }
            }
            OutputMode::Report => {
                let semantic = analyze(parse_clean(source, file_name)?, file_name);
                self.render(&semantic.reference_report())
            }
            OutputMode::Tokens => {
                let dump = TokenDump::from_source(source);
                debug!(tokens = dump.tokens.len(), errors = dump.parse_errors.len(), "token dump");
                self.render(&dump)
            }
        }
    }

    fn render<T: Serialize>(&self, value: &T) -> CliResult<String> {
        if self.pretty {
            Ok(to_string_pretty(value)?)
        } else {
            Ok(serde_json::to_string(value)?)
        }
    }
}

fn parse_clean(source: &str, file_name: &str) -> CliResult<Program> {
    let outcome = parse(source);
    debug!(
        statements = outcome.program.len(),
        errors = outcome.errors.len(),
        "parsed"
    );
    outcome.into_result().map_err(|errors| CliError::Parse {
        path: file_name.to_string(),
        errors,
    })
}

impl Default for Driver {
    fn default() -> Self {
        Self::new(OutputMode::default())
    }
}
