//! Composition

use rust_decimal::Decimal;
use serde::Serialize;

/// Percentage share of the production cost taken by each cost group.
///
/// Every share is zero when the production cost is zero.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Composition {
    /// Raw materials share (BB)
    pub material: Decimal,

    /// Direct labor share (BTKL)
    pub labor: Decimal,

    /// Overhead share (BOP)
    pub overhead: Decimal,
}

impl Composition {
    /// Build the composition from group totals and the overall total.
    pub fn of(material: Decimal, labor: Decimal, overhead: Decimal, total: Decimal) -> Self {
        Self {
            material: share(material, total),
            labor: share(labor, total),
            overhead: share(overhead, total),
        }
    }

    /// Shares rounded to two decimal places, as shown in summaries.
    #[must_use]
    pub fn rounded(self) -> Self {
        Self {
            material: self.material.round_dp(2),
            labor: self.labor.round_dp(2),
            overhead: self.overhead.round_dp(2),
        }
    }
}

fn share(part: Decimal, total: Decimal) -> Decimal {
    part.checked_div(total)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shares_of_total() {
        let composition = Composition::of(
            Decimal::from(7000),
            Decimal::from(3000),
            Decimal::from(1000),
            Decimal::from(11000),
        )
        .rounded();

        assert_eq!(composition.material, Decimal::new(6364, 2));
        assert_eq!(composition.labor, Decimal::new(2727, 2));
        assert_eq!(composition.overhead, Decimal::new(909, 2));
    }

    #[test]
    fn zero_total_gives_zero_shares() {
        let composition = Composition::of(
            Decimal::ZERO,
            Decimal::ZERO,
            Decimal::ZERO,
            Decimal::ZERO,
        );

        assert_eq!(composition.material, Decimal::ZERO);
        assert_eq!(composition.labor, Decimal::ZERO);
        assert_eq!(composition.overhead, Decimal::ZERO);
    }
}
