use std::io::Write;

use clap::Args;
use hpp::prelude::{HistoryStore, KeyValueStore, RecordId};

use crate::{cli::write_line, report};

#[derive(Debug, Args)]
pub(crate) struct ShowRecordArgs {
    /// Record ID, as shown by `history list`
    id: RecordId,
}

pub(crate) fn run<S: KeyValueStore>(
    args: &ShowRecordArgs,
    store: &HistoryStore<S>,
    out: &mut impl Write,
) -> Result<(), String> {
    let Some(record) = store.find(args.id) else {
        return write_line(out, &format!("no saved calculation with id {}", args.id));
    };

    write_line(out, &format!("record {} saved {}", record.id, record.saved_at))?;

    report::write_result(out, &record.calculation).map_err(|error| error.to_string())
}
