use std::io::Write;

use clap::Args;
use hpp::prelude::{HistoryStore, KeyValueStore, RecordId};

use crate::cli::write_line;

#[derive(Debug, Args)]
pub(crate) struct DeleteRecordArgs {
    /// Record ID, as shown by `history list`
    id: RecordId,
}

pub(crate) fn run<S: KeyValueStore>(
    args: &DeleteRecordArgs,
    store: &mut HistoryStore<S>,
    out: &mut impl Write,
) -> Result<(), String> {
    let deleted = store
        .delete(args.id)
        .map_err(|error| format!("failed to delete record {}: {error}", args.id))?;

    if deleted {
        write_line(out, &format!("deleted record {}", args.id))
    } else {
        write_line(out, &format!("no saved calculation with id {}", args.id))
    }
}
