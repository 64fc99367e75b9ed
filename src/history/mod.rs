//! History
//!
//! Saved calculations, most recent first, kept under a single key in a
//! [`KeyValueStore`].

pub mod errors;
pub mod records;
mod service;
pub mod storage;

pub use errors::HistoryError;
pub use records::{HistoryRecord, RecordId};
pub use service::*;
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError, StoreLock};
