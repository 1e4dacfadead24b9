//! Composite 0-100 arbitrage score.
//!
//! | Component  | Formula                            | Cap |
//! |------------|------------------------------------|-----|
//! | Base       | max divergence × 5                 | 50  |
//! | Trend      | abs(trend) × 10, only if increasing | 20  |
//! | Volatility | range × 3, only with ≥5 samples     | 15  |
//! | Absolute   | +15 if divergence ≥ 8, +10 if ≥ 5   | -   |

use crate::trend::{Trend, TrendAnalysis, TrendDirection};
use rust_decimal::{Decimal, prelude::ToPrimitive};
use serde::{Deserialize, Serialize};

const BASE_MULTIPLIER: Decimal = Decimal::from_parts(5, 0, 0, false, 0);
const BASE_CAP: Decimal = Decimal::from_parts(50, 0, 0, false, 0);
const TREND_MULTIPLIER: Decimal = Decimal::TEN;
const TREND_CAP: Decimal = Decimal::from_parts(20, 0, 0, false, 0);
const VOLATILITY_MULTIPLIER: Decimal = Decimal::from_parts(3, 0, 0, false, 0);
const VOLATILITY_CAP: Decimal = Decimal::from_parts(15, 0, 0, false, 0);
const LARGE_DIVERGENCE: Decimal = Decimal::from_parts(8, 0, 0, false, 0);
const LARGE_DIVERGENCE_BONUS: Decimal = Decimal::from_parts(15, 0, 0, false, 0);
const MEDIUM_DIVERGENCE: Decimal = Decimal::from_parts(5, 0, 0, false, 0);
const MEDIUM_DIVERGENCE_BONUS: Decimal = Decimal::TEN;

/// Maximum score.
pub const MAX_SCORE: u8 = 100;

/// Individual score components before rounding.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Deserialize, Serialize)]
pub struct ScoreBreakdown {
    pub base: Decimal,
    pub trend_bonus: Decimal,
    pub volatility_bonus: Decimal,
    pub absolute_bonus: Decimal,
}

impl ScoreBreakdown {
    /// Unrounded sum of all components.
    pub fn sum(&self) -> Decimal {
        self.base + self.trend_bonus + self.volatility_bonus + self.absolute_bonus
    }

    /// Sum rounded half-to-even and clamped to `[0, 100]`.
    pub fn total(&self) -> u8 {
        self.sum()
            .round()
            .clamp(Decimal::ZERO, Decimal::from(MAX_SCORE))
            .to_u8()
            .unwrap_or_default()
    }
}

/// Scores a matched game from its divergence and history analytics.
pub struct ArbitrageScorer;

impl ArbitrageScorer {
    /// Compute each score component.
    ///
    /// `volatility` is `None` when the game has fewer than five samples.
    pub fn breakdown(max_diff: Decimal, trend: &Trend, volatility: Option<Decimal>) -> ScoreBreakdown {
        let base = (max_diff * BASE_MULTIPLIER).min(BASE_CAP);

        let trend_bonus = match trend.direction {
            TrendDirection::Increasing => (trend.value.abs() * TREND_MULTIPLIER).min(TREND_CAP),
            TrendDirection::Decreasing | TrendDirection::Stable => Decimal::ZERO,
        };

        let volatility_bonus = volatility
            .map(|volatility| (volatility * VOLATILITY_MULTIPLIER).min(VOLATILITY_CAP))
            .unwrap_or_default();

        let absolute_bonus = if max_diff >= LARGE_DIVERGENCE {
            LARGE_DIVERGENCE_BONUS
        } else if max_diff >= MEDIUM_DIVERGENCE {
            MEDIUM_DIVERGENCE_BONUS
        } else {
            Decimal::ZERO
        };

        ScoreBreakdown {
            base,
            trend_bonus,
            volatility_bonus,
            absolute_bonus,
        }
    }

    pub fn score(max_diff: Decimal, trend: &Trend, volatility: Option<Decimal>) -> u8 {
        Self::breakdown(max_diff, trend, volatility).total()
    }

    /// Score using a full [`TrendAnalysis`].
    pub fn score_analysis(max_diff: Decimal, analysis: &TrendAnalysis) -> u8 {
        Self::score(max_diff, &analysis.trend, analysis.volatility)
    }
}
