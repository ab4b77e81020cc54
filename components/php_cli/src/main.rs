//! PHP Parser CLI
//!
//! Entry point for `php-parser`. Parses CLI arguments, runs the driver
//! over the given file and prints the resulting JSON document.

use clap::Parser as ClapParser;
use php_cli::{directive_for_verbosity, Cli, CliError, Driver};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(directive_for_verbosity(cli.verbose))),
        )
        .with_writer(std::io::stderr)
        .init();

    let driver = Driver::new(cli.output_mode()).with_pretty(!cli.compact);

    match driver.process_file(&cli.file) {
        Ok(document) => {
            println!("{}", document);
            ExitCode::SUCCESS
        }
        Err(CliError::Parse { errors, .. }) => {
            eprintln!("Parser errors:");
            for error in &errors {
                eprintln!("  - {}", error);
            }
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
