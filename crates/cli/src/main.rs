//! HPP command-line calculator

use std::process::ExitCode;

use crate::config::Config;

mod cli;
mod config;
mod observability;
mod report;

/// HPP CLI entry point
pub fn main() -> ExitCode {
    // Prints help, version or the parse error and exits
    let config = Config::load().unwrap_or_else(|error| error.exit());

    if let Err(error) = observability::init(&config.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized, must use eprintln"
        )]
        {
            eprintln!("{error}");
        }

        return ExitCode::FAILURE;
    }

    if let Err(error) = config.run() {
        #[expect(clippy::print_stderr, reason = "errors are reported on stderr")]
        {
            eprintln!("error: {error}");
        }

        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
