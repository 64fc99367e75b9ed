//! History service.

use jiff::Timestamp;
use tracing::{debug, warn};

use crate::{
    costing::CostingResult,
    form::CostingForm,
    history::{
        errors::HistoryError,
        records::{DocumentHeader, FORMAT_VERSION, HistoryDocument, HistoryRecord, RecordId},
        storage::KeyValueStore,
    },
};

/// Key the history collection is stored under.
pub const HISTORY_KEY: &str = "hpp-history";

/// Saved calculations, backed by a [`KeyValueStore`].
///
/// Every change reads the whole collection, applies the change and writes the
/// whole collection back, holding the storage lock for the key throughout.
#[derive(Debug)]
pub struct HistoryStore<S> {
    storage: S,
}

impl<S: KeyValueStore> HistoryStore<S> {
    /// Create a history over `storage`.
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// The underlying storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Save a calculation as the most recent record.
    ///
    /// # Errors
    ///
    /// Returns a [`HistoryError`] if the history can't be written, or if the stored
    /// document comes from a newer format version.
    pub fn save(&mut self, calculation: CostingResult) -> Result<HistoryRecord, HistoryError> {
        self.save_at(calculation, Timestamp::now())
    }

    /// Save a calculation with an explicit save time.
    ///
    /// # Errors
    ///
    /// Returns a [`HistoryError`] if the history can't be written, or if the stored
    /// document comes from a newer format version.
    pub fn save_at(
        &mut self,
        calculation: CostingResult,
        saved_at: Timestamp,
    ) -> Result<HistoryRecord, HistoryError> {
        let _lock = self.storage.lock(HISTORY_KEY)?;
        let mut document = self.load_for_write()?;

        let record = HistoryRecord {
            id: RecordId::next(saved_at, document.newest_id()),
            saved_at,
            calculation,
        };

        document.last_id = Some(record.id);
        document.records.insert(0, record.clone());
        self.write(document)?;

        debug!(
            id = %record.id,
            product = %record.calculation.input.product_name,
            "saved calculation"
        );

        Ok(record)
    }

    /// All saved records, most recent first.
    ///
    /// Missing or unreadable history reads as empty.
    pub fn list(&self) -> Vec<HistoryRecord> {
        self.load().map_or_else(
            |error| {
                warn!(%error, "history unreadable, treating as empty");

                Vec::new()
            },
            |document| document.records,
        )
    }

    /// The record with the given id.
    pub fn find(&self, id: RecordId) -> Option<HistoryRecord> {
        self.list().into_iter().find(|record| record.id == id)
    }

    /// Delete the record with the given id.
    ///
    /// Returns `false` without writing if no such record exists.
    ///
    /// # Errors
    ///
    /// Returns a [`HistoryError`] if the history can't be written.
    pub fn delete(&mut self, id: RecordId) -> Result<bool, HistoryError> {
        Ok(self.remove(id)?.is_some())
    }

    /// Load a record into an editable form and delete it.
    ///
    /// The record only comes back if the edited calculation is saved again.
    ///
    /// # Errors
    ///
    /// Returns a [`HistoryError`] if the history can't be written.
    pub fn take_for_edit(&mut self, id: RecordId) -> Result<Option<CostingForm>, HistoryError> {
        let form = self
            .remove(id)?
            .map(|record| CostingForm::from(&record.calculation));

        Ok(form)
    }

    fn remove(&mut self, id: RecordId) -> Result<Option<HistoryRecord>, HistoryError> {
        let _lock = self.storage.lock(HISTORY_KEY)?;
        let mut document = self.load_for_write()?;

        let Some(index) = document.records.iter().position(|record| record.id == id) else {
            debug!(%id, "no record to delete");

            return Ok(None);
        };

        // Remember the id so it is never issued again
        document.last_id = document.newest_id();
        let removed = document.records.remove(index);
        self.write(document)?;

        debug!(%id, "deleted record");

        Ok(Some(removed))
    }

    fn load(&self) -> Result<HistoryDocument, HistoryError> {
        let Some(raw) = self.storage.get(HISTORY_KEY)? else {
            return Ok(HistoryDocument::default());
        };

        let header: DocumentHeader = serde_json::from_str(&raw).map_err(HistoryError::Corrupt)?;
        if header.version > FORMAT_VERSION {
            return Err(HistoryError::UnsupportedVersion(header.version));
        }

        serde_json::from_str(&raw).map_err(HistoryError::Corrupt)
    }

    /// Corrupt history is replaced on the next write; anything else is surfaced.
    fn load_for_write(&self) -> Result<HistoryDocument, HistoryError> {
        match self.load() {
            Err(HistoryError::Corrupt(error)) => {
                warn!(%error, "replacing corrupt history");

                Ok(HistoryDocument::default())
            }
            loaded => loaded,
        }
    }

    fn write(&mut self, mut document: HistoryDocument) -> Result<(), HistoryError> {
        document.version = FORMAT_VERSION;

        let raw = serde_json::to_string_pretty(&document).map_err(HistoryError::Encode)?;
        self.storage.set(HISTORY_KEY, &raw)?;

        Ok(())
    }
}
