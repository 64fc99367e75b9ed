use std::{fs, io::Write, path::PathBuf};

use clap::Args;
use hpp::prelude::{CostingForm, HistoryStore, KeyValueStore, RecordId};
use tracing::info;

use crate::cli::write_line;

#[derive(Debug, Args)]
pub(crate) struct EditRecordArgs {
    /// Record ID, as shown by `history list`
    id: RecordId,

    /// File to write the form to; printed when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub(crate) fn run<S: KeyValueStore>(
    args: &EditRecordArgs,
    store: &mut HistoryStore<S>,
    out: &mut impl Write,
) -> Result<(), String> {
    let Some(record) = store.find(args.id) else {
        return write_line(out, &format!("no saved calculation with id {}", args.id));
    };

    let form = CostingForm::from(&record.calculation);
    let yaml = serde_norway::to_string(&form)
        .map_err(|error| format!("failed to encode form: {error}"))?;
    let document = format!(
        "# Record {} was removed from history; run `hpp compute --save` to keep the edit.\n{yaml}",
        args.id
    );

    // Write the form before deleting so a failed write loses nothing
    match &args.output {
        Some(path) => fs::write(path, document)
            .map_err(|error| format!("failed to write {}: {error}", path.display()))?,
        None => write!(out, "{document}")
            .map_err(|error| format!("failed to write output: {error}"))?,
    }

    store
        .delete(args.id)
        .map_err(|error| format!("failed to remove record {}: {error}", args.id))?;

    info!(id = %args.id, "record taken for editing");

    if let Some(path) = &args.output {
        write_line(
            out,
            &format!(
                "record {} written to {} and removed from history",
                args.id,
                path.display()
            ),
        )?;
    }

    Ok(())
}
