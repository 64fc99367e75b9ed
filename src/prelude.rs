//! HPP prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    composition::Composition,
    costing::{ComputeError, CostingInput, CostingResult, ItemKind, compute, compute_at},
    form::{CostingForm, FieldError, LineItemForm, ValidationErrors},
    history::{
        FileStore, HistoryError, HistoryRecord, HistoryStore, KeyValueStore, MemoryStore,
        RecordId, StorageError, StoreLock,
    },
    items::{LineItem, LineItems},
    pricing::{MarginPolicy, PricingError, price_from_margin},
};
