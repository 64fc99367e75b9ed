use std::io::Write;

use clap::{Args, Subcommand};
use hpp::prelude::{HistoryStore, KeyValueStore};

mod delete;
mod edit;
mod list;
mod show;

#[derive(Debug, Args)]
pub(crate) struct HistoryCommand {
    #[command(subcommand)]
    command: HistorySubcommand,
}

#[derive(Debug, Subcommand)]
enum HistorySubcommand {
    /// List saved calculations, most recent first
    List,

    /// Show one saved calculation
    Show(show::ShowRecordArgs),

    /// Write a saved calculation out as a form and remove it from history
    Edit(edit::EditRecordArgs),

    /// Delete a saved calculation
    Delete(delete::DeleteRecordArgs),
}

pub(crate) fn run<S: KeyValueStore>(
    command: HistoryCommand,
    store: &mut HistoryStore<S>,
    out: &mut impl Write,
) -> Result<(), String> {
    match command.command {
        HistorySubcommand::List => list::run(store, out),
        HistorySubcommand::Show(args) => show::run(&args, store, out),
        HistorySubcommand::Edit(args) => edit::run(&args, store, out),
        HistorySubcommand::Delete(args) => delete::run(&args, store, out),
    }
}
