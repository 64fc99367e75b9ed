use std::{
    io::{self, Write},
    path::Path,
};

use clap::Subcommand;
use hpp::prelude::{FileStore, HistoryStore, KeyValueStore};

mod compute;
mod history;

#[derive(Debug, Subcommand)]
pub(crate) enum Commands {
    /// Compute HPP from a form file
    Compute(compute::ComputeArgs),

    /// Browse and manage saved calculations
    History(history::HistoryCommand),
}

impl Commands {
    /// Run the command against the history kept in `data_dir`.
    pub(crate) fn run(self, data_dir: &Path) -> Result<(), String> {
        let mut store = HistoryStore::new(FileStore::new(data_dir));

        self.execute(&mut store, &mut io::stdout().lock())
    }

    fn execute<S: KeyValueStore>(
        self,
        store: &mut HistoryStore<S>,
        out: &mut impl Write,
    ) -> Result<(), String> {
        match self {
            Commands::Compute(args) => compute::run(args, store, out),
            Commands::History(command) => history::run(command, store, out),
        }
    }
}

fn write_line(out: &mut impl Write, line: &str) -> Result<(), String> {
    writeln!(out, "{line}").map_err(|error| format!("failed to write output: {error}"))
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use hpp::prelude::MemoryStore;
    use testresult::TestResult;

    use super::*;

    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(subcommand)]
        command: Commands,
    }

    /// Helper result whose errors are returned rather than panicking, so
    /// callers can assert on failures.
    type HelperResult<T> = Result<T, Box<dyn std::error::Error>>;

    /// Run a command, returning its outcome and everything it wrote.
    pub(super) fn execute_captured<const N: usize>(
        store: &mut HistoryStore<MemoryStore>,
        args: [&str; N],
    ) -> HelperResult<(Result<(), String>, String)> {
        let cli = TestCli::try_parse_from(std::iter::once("hpp").chain(args))?;
        let mut out = Vec::new();

        let outcome = cli.command.execute(store, &mut out);

        Ok((outcome, String::from_utf8(out)?))
    }

    pub(super) fn execute<const N: usize>(
        store: &mut HistoryStore<MemoryStore>,
        args: [&str; N],
    ) -> HelperResult<String> {
        let (outcome, output) = execute_captured(store, args)?;
        outcome.map_err(io::Error::other)?;

        Ok(output)
    }

    #[test]
    fn unknown_subcommand_is_rejected() {
        assert!(TestCli::try_parse_from(["hpp", "export"]).is_err());
    }

    #[test]
    fn empty_history_lists_nothing() -> TestResult {
        let mut store = HistoryStore::new(MemoryStore::new());

        let output = execute(&mut store, ["history", "list"])?;

        assert_eq!(output.trim(), "no saved calculations");

        Ok(())
    }
}
