//! Largest-remainder normalization of two-outcome probabilities.
//!
//! Platforms rarely quote two outcomes that sum to exactly 100%. Polymarket
//! outcome prices drift a little either side of 1.00, and Kalshi bid/ask
//! derived values routinely sum past 100 because of the spread. For display
//! and divergence tracking both sides are floored to whole percentages and the
//! residual is handed to the *smaller* raw value, so the pair always sums to
//! exactly 100. The residual never goes to the larger value.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Total every normalized pair sums to.
pub const PERCENT_TOTAL: i64 = 100;

/// Converts raw two-outcome prices into integer percentages summing to 100.
pub struct ProbabilityNormalizer;

impl ProbabilityNormalizer {
    /// Normalize two raw percentages (0-100 scale, any precision).
    ///
    /// The residual `100 - (floor(p1) + floor(p2))` may be negative when the
    /// inputs sum past 100. It goes to the smaller input; on a tie it goes to
    /// `p1`. Negative inputs are treated as zero.
    ///
    /// # Returns
    /// `(first, second)` with `first + second == 100`
    pub fn normalize(p1: Decimal, p2: Decimal) -> (i64, i64) {
        let p1 = p1.max(Decimal::ZERO);
        let p2 = p2.max(Decimal::ZERO);

        let floor1 = Self::floor(p1);
        let floor2 = Self::floor(p2);

        if p1 <= p2 {
            (PERCENT_TOTAL - floor2, floor2)
        } else {
            (floor1, PERCENT_TOTAL - floor1)
        }
    }

    /// Normalize two raw fractional prices (0.0-1.0 scale).
    pub fn normalize_fractions(price1: Decimal, price2: Decimal) -> (i64, i64) {
        Self::normalize(Self::to_percent(price1), Self::to_percent(price2))
    }

    /// Scale a 0-1 price into percentage space, saturating on overflow.
    pub fn to_percent(price: Decimal) -> Decimal {
        price
            .checked_mul(Decimal::ONE_HUNDRED)
            .unwrap_or(Decimal::MAX)
    }

    // floor(p1) + remainder == PERCENT_TOTAL - floor(p2), so only the floor of
    // the side that keeps its value is ever needed.
    fn floor(value: Decimal) -> i64 {
        value.floor().to_i64().unwrap_or(i64::MAX)
    }
}
