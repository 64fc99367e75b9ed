//! Items

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Ordered list of cost line items.
pub type LineItems = SmallVec<[LineItem; 4]>;

/// A single raw material or overhead cost entry
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    name: String,
    cost: Decimal,
}

impl LineItem {
    /// Creates a new line item with the given name and cost
    pub fn new(name: impl Into<String>, cost: Decimal) -> Self {
        Self {
            name: name.into(),
            cost,
        }
    }

    /// Returns the name of the item
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the cost of the item
    pub fn cost(&self) -> Decimal {
        self.cost
    }
}

/// Sums the cost of a list of items, in order.
///
/// Returns `None` if the sum overflows.
pub fn total_cost(items: &[LineItem]) -> Option<Decimal> {
    items
        .iter()
        .try_fold(Decimal::ZERO, |acc, item| acc.checked_add(item.cost))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_cost() {
        let items = [
            LineItem::new("Tepung", Decimal::from(5000)),
            LineItem::new("Gula", Decimal::from(2000)),
        ];

        assert_eq!(total_cost(&items), Some(Decimal::from(7000)));
    }

    #[test]
    fn test_total_cost_empty_is_zero() {
        assert_eq!(total_cost(&[]), Some(Decimal::ZERO));
    }

    #[test]
    fn test_total_cost_overflow() {
        let items = [
            LineItem::new("a", Decimal::MAX),
            LineItem::new("b", Decimal::ONE),
        ];

        assert_eq!(total_cost(&items), None);
    }
}
