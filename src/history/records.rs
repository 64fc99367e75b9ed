//! History Records

use std::{fmt, num::ParseIntError, str::FromStr};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::costing::CostingResult;

/// Version written into every stored history document.
pub const FORMAT_VERSION: u32 = 1;

/// Identifier of a saved calculation.
///
/// Derived from the save time in milliseconds, bumped past every id handed out
/// before, so saves within the same millisecond stay distinct and a deleted
/// record's id is never reused.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(i64);

impl RecordId {
    /// Wrap a raw id.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// The raw id.
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Next id for a save at `saved_at`, given the newest id ever issued.
    pub(crate) fn next(saved_at: Timestamp, newest: Option<RecordId>) -> Self {
        let now = saved_at.as_millisecond();

        match newest {
            Some(RecordId(newest)) => Self(now.max(newest.saturating_add(1))),
            None => Self(now),
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for RecordId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// A calculation saved to history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    /// Record identifier
    pub id: RecordId,

    /// When the record was saved
    pub saved_at: Timestamp,

    /// The saved calculation
    pub calculation: CostingResult,
}

/// Serialised form of the whole history collection.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct HistoryDocument {
    pub(crate) version: u32,

    /// Newest id ever issued, kept after that record is deleted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) last_id: Option<RecordId>,

    pub(crate) records: Vec<HistoryRecord>,
}

impl HistoryDocument {
    /// Newest id issued so far, including ids of deleted records.
    pub(crate) fn newest_id(&self) -> Option<RecordId> {
        let stored = self.records.iter().map(|record| record.id).max();

        self.last_id.max(stored)
    }
}

/// Just the version of a stored document, read before the records.
#[derive(Debug, Deserialize)]
pub(crate) struct DocumentHeader {
    pub(crate) version: u32,
}
