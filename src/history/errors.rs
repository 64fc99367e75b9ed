//! History errors.

use thiserror::Error;

use crate::history::{records::FORMAT_VERSION, storage::StorageError};

/// Errors raised while changing the history.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// Storage could not be read or written.
    #[error("history storage unavailable")]
    Storage(#[from] StorageError),

    /// The stored document is not valid history.
    #[error("history document is corrupt")]
    Corrupt(#[source] serde_json::Error),

    /// The history could not be serialised.
    #[error("failed to encode history")]
    Encode(#[source] serde_json::Error),

    /// The stored document was written by a newer version and won't be overwritten.
    #[error(
        "history format version {0} is newer than supported version {supported}",
        supported = FORMAT_VERSION
    )]
    UnsupportedVersion(u32),
}
