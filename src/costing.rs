//! Costing

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::{
    composition::Composition,
    items::{LineItem, LineItems, total_cost},
    pricing::{PricingError, price_from_margin},
};

/// Which list a line item belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ItemKind {
    /// Raw materials (BB)
    Material,

    /// Manufacturing overhead (BOP)
    Overhead,
}

impl ItemKind {
    /// Field identifier prefix for items of this kind.
    pub fn field(self) -> &'static str {
        match self {
            ItemKind::Material => "materialItems",
            ItemKind::Overhead => "overheadItems",
        }
    }
}

/// Errors raised when [`compute`] is called with input that was never validated.
#[derive(Debug, Error, PartialEq)]
pub enum ComputeError {
    /// Product name is empty.
    #[error("product name is empty")]
    EmptyProductName,

    /// Unit count is zero.
    #[error("unit count must be at least 1")]
    NoUnits,

    /// A line item has an empty name (list, index).
    #[error("{list}[{index}] has an empty name", list = .0.field(), index = .1)]
    EmptyItemName(ItemKind, usize),

    /// A line item has a negative cost (list, index).
    #[error("{list}[{index}] has a negative cost", list = .0.field(), index = .1)]
    NegativeItemCost(ItemKind, usize),

    /// Labor cost is negative.
    #[error("labor cost is negative")]
    NegativeLaborCost,

    /// Totals could not be represented.
    #[error("production cost overflowed")]
    Overflow,
}

/// Everything needed to cost one production batch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostingInput {
    /// Product being manufactured
    pub product_name: String,

    /// Units produced by the batch
    pub unit_count: u32,

    /// Raw material costs (BB)
    pub material_items: LineItems,

    /// Direct labor cost (BTKL)
    pub labor_cost: Decimal,

    /// Overhead costs (BOP)
    pub overhead_items: LineItems,

    /// Requested profit margin
    #[serde(default)]
    pub margin_percent: Decimal,
}

impl CostingInput {
    /// Create an input with no line items, no labor cost and no margin.
    pub fn new(product_name: impl Into<String>, unit_count: u32) -> Self {
        Self {
            product_name: product_name.into(),
            unit_count,
            material_items: LineItems::new(),
            labor_cost: Decimal::ZERO,
            overhead_items: LineItems::new(),
            margin_percent: Decimal::ZERO,
        }
    }

    /// Add a raw material cost.
    #[must_use]
    pub fn with_material(mut self, name: impl Into<String>, cost: Decimal) -> Self {
        self.material_items.push(LineItem::new(name, cost));
        self
    }

    /// Add an overhead cost.
    #[must_use]
    pub fn with_overhead(mut self, name: impl Into<String>, cost: Decimal) -> Self {
        self.overhead_items.push(LineItem::new(name, cost));
        self
    }

    /// Set the direct labor cost.
    #[must_use]
    pub fn with_labor_cost(mut self, labor_cost: Decimal) -> Self {
        self.labor_cost = labor_cost;
        self
    }

    /// Set the requested margin.
    #[must_use]
    pub fn with_margin(mut self, margin_percent: Decimal) -> Self {
        self.margin_percent = margin_percent;
        self
    }

    fn check(&self) -> Result<(), ComputeError> {
        if self.product_name.trim().is_empty() {
            return Err(ComputeError::EmptyProductName);
        }

        if self.unit_count == 0 {
            return Err(ComputeError::NoUnits);
        }

        if self.labor_cost < Decimal::ZERO {
            return Err(ComputeError::NegativeLaborCost);
        }

        check_items(ItemKind::Material, &self.material_items)?;
        check_items(ItemKind::Overhead, &self.overhead_items)
    }
}

fn check_items(kind: ItemKind, items: &[LineItem]) -> Result<(), ComputeError> {
    items.iter().enumerate().try_for_each(|(i, item)| {
        if item.name().trim().is_empty() {
            Err(ComputeError::EmptyItemName(kind, i))
        } else if item.cost() < Decimal::ZERO {
            Err(ComputeError::NegativeItemCost(kind, i))
        } else {
            Ok(())
        }
    })
}

/// Cost breakdown of a production batch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostingResult {
    /// Input the result was computed from
    pub input: CostingInput,

    /// Sum of raw material costs
    pub total_material: Decimal,

    /// Sum of overhead costs
    pub total_overhead: Decimal,

    /// Materials plus labor plus overhead (HPP)
    pub total_production_cost: Decimal,

    /// Production cost of a single unit
    pub cost_per_unit: Decimal,

    /// Selling price derived from the margin, once priced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_price: Option<Decimal>,

    /// When the calculation ran
    pub computed_at: Timestamp,
}

impl CostingResult {
    /// Price the result with the given margin.
    ///
    /// Returns a new result carrying the margin and the suggested price.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the margin is out of range or the price overflows.
    pub fn with_suggested_price(&self, margin_percent: Decimal) -> Result<Self, PricingError> {
        let price = price_from_margin(self.cost_per_unit, margin_percent)?;

        let mut priced = self.clone();
        priced.input.margin_percent = margin_percent;
        priced.suggested_price = Some(price);

        Ok(priced)
    }

    /// Share of the production cost taken by each cost group.
    pub fn composition(&self) -> Composition {
        Composition::of(
            self.total_material,
            self.input.labor_cost,
            self.total_overhead,
            self.total_production_cost,
        )
    }
}

/// Compute the cost breakdown of a batch, stamped with the current time.
///
/// # Errors
///
/// Returns a [`ComputeError`] if the input breaks a precondition or the totals overflow.
pub fn compute(input: CostingInput) -> Result<CostingResult, ComputeError> {
    compute_at(input, Timestamp::now())
}

/// Compute the cost breakdown of a batch with an explicit timestamp.
///
/// # Errors
///
/// Returns a [`ComputeError`] if the input breaks a precondition or the totals overflow.
pub fn compute_at(
    input: CostingInput,
    computed_at: Timestamp,
) -> Result<CostingResult, ComputeError> {
    input.check()?;

    let total_material = total_cost(&input.material_items).ok_or(ComputeError::Overflow)?;
    let total_overhead = total_cost(&input.overhead_items).ok_or(ComputeError::Overflow)?;

    let total_production_cost = total_material
        .checked_add(input.labor_cost)
        .and_then(|total| total.checked_add(total_overhead))
        .ok_or(ComputeError::Overflow)?;

    let cost_per_unit = total_production_cost
        .checked_div(Decimal::from(input.unit_count))
        .ok_or(ComputeError::Overflow)?;

    debug!(
        product = %input.product_name,
        units = input.unit_count,
        %total_production_cost,
        %cost_per_unit,
        "computed production cost"
    );

    Ok(CostingResult {
        input,
        total_material,
        total_overhead,
        total_production_cost,
        cost_per_unit,
        suggested_price: None,
        computed_at,
    })
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn bakery_input() -> CostingInput {
        CostingInput::new("Roti Manis", 10)
            .with_material("Tepung", Decimal::from(5000))
            .with_material("Gula", Decimal::from(2000))
            .with_labor_cost(Decimal::from(3000))
            .with_overhead("Listrik", Decimal::from(1000))
    }

    #[test]
    fn compute_sums_each_cost_group() -> TestResult {
        let result = compute(bakery_input())?;

        assert_eq!(result.total_material, Decimal::from(7000));
        assert_eq!(result.total_overhead, Decimal::from(1000));
        assert_eq!(result.total_production_cost, Decimal::from(11000));
        assert_eq!(result.cost_per_unit, Decimal::from(1100));
        assert_eq!(result.suggested_price, None);

        Ok(())
    }

    #[test]
    fn compute_preserves_item_order() -> TestResult {
        let result = compute(bakery_input())?;

        let names: Vec<&str> = result
            .input
            .material_items
            .iter()
            .map(LineItem::name)
            .collect();

        assert_eq!(names, ["Tepung", "Gula"]);

        Ok(())
    }

    #[test]
    fn compute_uses_given_timestamp() -> TestResult {
        let at: Timestamp = "2024-05-01T08:00:00Z".parse()?;

        let result = compute_at(bakery_input(), at)?;

        assert_eq!(result.computed_at, at);

        Ok(())
    }

    #[test]
    fn compute_with_no_items_is_labor_only() -> TestResult {
        let input = CostingInput::new("Jasa Jahit", 4).with_labor_cost(Decimal::from(10));

        let result = compute(input)?;

        assert_eq!(result.total_production_cost, Decimal::from(10));
        assert_eq!(result.cost_per_unit, Decimal::new(25, 1));

        Ok(())
    }

    #[test]
    fn total_is_sum_of_groups() -> TestResult {
        let input = CostingInput::new("Keripik", 3)
            .with_material("Singkong", Decimal::new(1234_56, 2))
            .with_material("Minyak", Decimal::new(789_10, 2))
            .with_labor_cost(Decimal::new(333_33, 2))
            .with_overhead("Gas", Decimal::new(99_99, 2));

        let result = compute(input)?;

        assert_eq!(
            result.total_production_cost,
            result.total_material + result.input.labor_cost + result.total_overhead
        );
        assert_eq!(
            result.cost_per_unit,
            result.total_production_cost / Decimal::from(3)
        );

        Ok(())
    }

    #[test]
    fn zero_units_is_rejected() {
        let input = CostingInput::new("Roti", 0);

        assert_eq!(compute(input), Err(ComputeError::NoUnits));
    }

    #[test]
    fn blank_product_name_is_rejected() {
        let input = CostingInput::new("   ", 1);

        assert_eq!(compute(input), Err(ComputeError::EmptyProductName));
    }

    #[test]
    fn blank_item_name_is_rejected() {
        let input = bakery_input().with_overhead("", Decimal::ONE);

        assert_eq!(
            compute(input),
            Err(ComputeError::EmptyItemName(ItemKind::Overhead, 1))
        );
    }

    #[test]
    fn negative_costs_are_rejected() {
        let input = bakery_input().with_material("Ragi", Decimal::from(-5));

        assert_eq!(
            compute(input),
            Err(ComputeError::NegativeItemCost(ItemKind::Material, 2))
        );

        let input = bakery_input().with_labor_cost(Decimal::from(-1));

        assert_eq!(compute(input), Err(ComputeError::NegativeLaborCost));
    }

    #[test]
    fn overflowing_totals_are_rejected() {
        let input = CostingInput::new("Emas", 1)
            .with_material("Batangan", Decimal::MAX)
            .with_labor_cost(Decimal::MAX);

        assert_eq!(compute(input), Err(ComputeError::Overflow));
    }

    #[test]
    fn error_messages_name_the_field() {
        let error = ComputeError::EmptyItemName(ItemKind::Material, 3);

        assert_eq!(error.to_string(), "materialItems[3] has an empty name");
    }

    #[test]
    fn pricing_returns_new_result() -> TestResult {
        let result = compute(bakery_input())?;

        let priced = result.with_suggested_price(Decimal::from(20))?;

        assert_eq!(priced.suggested_price, Some(Decimal::from(1375)));
        assert_eq!(priced.input.margin_percent, Decimal::from(20));
        assert_eq!(result.suggested_price, None);

        let marked_up = result.with_suggested_price(Decimal::from(150))?;

        assert_eq!(marked_up.suggested_price, Some(Decimal::from(2750)));

        Ok(())
    }

    #[test]
    fn pricing_rejects_out_of_range_margin() -> TestResult {
        let result = compute(bakery_input())?;

        assert_eq!(
            result.with_suggested_price(Decimal::from(1500)),
            Err(PricingError::MarginOutOfRange(Decimal::from(1500)))
        );

        Ok(())
    }
}
