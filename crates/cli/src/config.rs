//! CLI configuration

use std::path::PathBuf;

use clap::{Args, Parser, ValueEnum};

use crate::cli::Commands;

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub(crate) struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn", global = true)]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(
        long,
        env = "HPP_LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Compact,
        global = true
    )]
    pub log_format: LogFormat,
}

/// HPP calculator configuration and command
#[derive(Debug, Parser)]
#[command(name = "hpp", about = "HPP production cost calculator", long_about = None)]
pub(crate) struct Config {
    /// Directory saved calculations are kept in
    #[arg(long, env = "HPP_DATA_DIR", default_value = ".hpp", global = true)]
    pub data_dir: PathBuf,

    #[command(flatten)]
    pub logging: LoggingConfig,

    #[command(subcommand)]
    pub command: Commands,
}

impl Config {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub(crate) fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Run the configured command.
    pub(crate) fn run(self) -> Result<(), String> {
        self.command.run(&self.data_dir)
    }
}
