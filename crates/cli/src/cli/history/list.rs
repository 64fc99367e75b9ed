use std::io::Write;

use hpp::prelude::{HistoryStore, KeyValueStore};

use crate::{cli::write_line, report};

pub(crate) fn run<S: KeyValueStore>(
    store: &HistoryStore<S>,
    out: &mut impl Write,
) -> Result<(), String> {
    let records = store.list();

    if records.is_empty() {
        return write_line(out, "no saved calculations");
    }

    report::write_history(out, &records).map_err(|error| error.to_string())
}
