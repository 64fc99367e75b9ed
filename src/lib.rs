//! HPP
//!
//! Cost of goods manufactured (HPP) for small-batch production: production cost
//! and per-unit cost from itemised costs, a suggested selling price from a margin,
//! and a saved history of calculations.

pub mod composition;
pub mod costing;
pub mod form;
pub mod history;
pub mod items;
pub mod prelude;
pub mod pricing;
