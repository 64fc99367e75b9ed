//! Pricing

use rust_decimal::Decimal;
use thiserror::Error;

/// Highest margin percentage accepted by [`price_from_margin`].
pub const MAX_MARGIN_PERCENT: Decimal = Decimal::from_parts(1000, 0, 0, false, 0);

/// Margin percentage from which the margin is applied to cost instead of price.
pub const MARKUP_THRESHOLD_PERCENT: Decimal = Decimal::ONE_HUNDRED;

/// Errors that can occur while pricing a unit.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// Margin is negative or above [`MAX_MARGIN_PERCENT`].
    #[error("margin {0}% is outside 0-1000%")]
    MarginOutOfRange(Decimal),

    /// The price could not be represented.
    #[error("suggested price overflowed")]
    Overflow,
}

/// How a margin percentage is turned into a price.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarginPolicy {
    /// Margin is a share of the final price: `cost / (1 - margin)`.
    MarginOnPrice,

    /// Margin is a mark-up on cost: `cost * (1 + margin)`.
    MarkupOnCost,
}

impl MarginPolicy {
    /// Selects the policy for a margin percentage.
    ///
    /// Margins of 100% and above can't be a share of the price, so they are
    /// treated as a mark-up on cost.
    pub fn for_margin(margin_percent: Decimal) -> Self {
        if margin_percent >= MARKUP_THRESHOLD_PERCENT {
            MarginPolicy::MarkupOnCost
        } else {
            MarginPolicy::MarginOnPrice
        }
    }
}

/// Calculates the suggested selling price of one unit.
///
/// # Errors
///
/// - [`PricingError::MarginOutOfRange`]: margin is below 0 or above 1000.
/// - [`PricingError::Overflow`]: the price can't be represented.
pub fn price_from_margin(
    cost_per_unit: Decimal,
    margin_percent: Decimal,
) -> Result<Decimal, PricingError> {
    if margin_percent < Decimal::ZERO || margin_percent > MAX_MARGIN_PERCENT {
        return Err(PricingError::MarginOutOfRange(margin_percent));
    }

    let fraction = margin_percent
        .checked_div(Decimal::ONE_HUNDRED)
        .ok_or(PricingError::Overflow)?;

    let price = match MarginPolicy::for_margin(margin_percent) {
        MarginPolicy::MarkupOnCost => Decimal::ONE
            .checked_add(fraction)
            .and_then(|factor| cost_per_unit.checked_mul(factor)),
        MarginPolicy::MarginOnPrice => Decimal::ONE
            .checked_sub(fraction)
            .and_then(|divisor| cost_per_unit.checked_div(divisor)),
    };

    price.ok_or(PricingError::Overflow)
}
