//! PHP Parser CLI Library
//!
//! Provides the argument definition, the file driver and the error type
//! behind the `php-parser` binary.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cli;
pub mod driver;
pub mod error;

pub use cli::{directive_for_verbosity, Cli};
pub use driver::{Driver, OutputMode};
pub use error::{CliError, CliResult};
