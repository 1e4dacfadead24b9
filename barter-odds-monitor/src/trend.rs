//! Trend, price movement and volatility derived from a game's history.
//!
//! All calculations expect the current observation to already be recorded.
//! Short histories resolve to neutral defaults rather than errors.

use crate::{history::HistoryWindow, quote::ProbabilityPair};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Samples required before a trend is classified.
pub const TREND_MIN_SAMPLES: usize = 10;

/// Samples averaged on each side of the trend comparison.
pub const TREND_SPAN: usize = 5;

/// Samples required before price changes are reported (≈5 minutes at 30s).
pub const PRICE_CHANGE_LOOKBACK: usize = 10;

/// Samples in the volatility range.
pub const VOLATILITY_SPAN: usize = 5;

/// Change in mean divergence beyond which a trend is not stable.
pub const TREND_THRESHOLD: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

/// Direction the divergence between platforms is moving.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    #[default]
    Stable,
}

impl std::fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrendDirection::Increasing => write!(f, "increasing"),
            TrendDirection::Decreasing => write!(f, "decreasing"),
            TrendDirection::Stable => write!(f, "stable"),
        }
    }
}

/// Divergence trend: recent mean minus the mean of the five samples before.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Deserialize, Serialize)]
pub struct Trend {
    pub direction: TrendDirection,
    pub value: Decimal,
}

impl Trend {
    /// Classify a trend value against [`TREND_THRESHOLD`].
    pub fn from_value(value: Decimal) -> Self {
        let direction = if value > TREND_THRESHOLD {
            TrendDirection::Increasing
        } else if value < -TREND_THRESHOLD {
            TrendDirection::Decreasing
        } else {
            TrendDirection::Stable
        };
        Self { direction, value }
    }
}

/// Signed probability movement per side, in percentage points.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Deserialize, Serialize)]
pub struct SideDelta {
    pub away: Decimal,
    pub home: Decimal,
}

impl SideDelta {
    fn between(current: ProbabilityPair, previous: ProbabilityPair) -> Self {
        Self {
            away: (Decimal::from(current.away) - Decimal::from(previous.away)).round_dp(1),
            home: (Decimal::from(current.home) - Decimal::from(previous.home)).round_dp(1),
        }
    }
}

/// Movement on both platforms since [`PRICE_CHANGE_LOOKBACK`] samples ago.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Deserialize, Serialize)]
pub struct PriceChange {
    pub base: SideDelta,
    pub counterpart: SideDelta,
}

/// Everything derived from one history window.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Deserialize, Serialize)]
pub struct TrendAnalysis {
    pub trend: Trend,
    /// Zero deltas when fewer than [`PRICE_CHANGE_LOOKBACK`] samples exist
    pub price_change: PriceChange,
    /// `None` when fewer than [`VOLATILITY_SPAN`] samples exist
    pub volatility: Option<Decimal>,
    /// Samples the analysis was based on
    pub samples: usize,
}

/// Derives trend analytics from a [`HistoryWindow`].
pub struct TrendAnalyzer;

impl TrendAnalyzer {
    pub fn analyze(window: &HistoryWindow) -> TrendAnalysis {
        TrendAnalysis {
            trend: Self::trend(window),
            price_change: Self::price_change(window),
            volatility: Self::volatility(window),
            samples: window.len(),
        }
    }

    /// Compare the mean of the last five divergences with the five before.
    ///
    /// With fewer than [`TREND_MIN_SAMPLES`] samples the trend is `Stable`
    /// with value 0.
    pub fn trend(window: &HistoryWindow) -> Trend {
        if window.len() < TREND_MIN_SAMPLES {
            return Trend::default();
        }

        let span = Decimal::from(TREND_SPAN);
        let recent: Decimal = window.divergences().rev().take(TREND_SPAN).sum();
        let older: Decimal = window
            .divergences()
            .rev()
            .skip(TREND_SPAN)
            .take(TREND_SPAN)
            .sum();

        Trend::from_value(recent / span - older / span)
    }

    /// Current probabilities minus those [`PRICE_CHANGE_LOOKBACK`] samples
    /// back, rounded to one decimal.
    pub fn price_change(window: &HistoryWindow) -> PriceChange {
        if window.len() < PRICE_CHANGE_LOOKBACK {
            return PriceChange::default();
        }

        match (window.latest(), window.nth_from_end(PRICE_CHANGE_LOOKBACK)) {
            (Some(current), Some(previous)) => PriceChange {
                base: SideDelta::between(current.base, previous.base),
                counterpart: SideDelta::between(current.counterpart, previous.counterpart),
            },
            _ => PriceChange::default(),
        }
    }

    /// Range (max - min) of the last five divergences.
    pub fn volatility(window: &HistoryWindow) -> Option<Decimal> {
        if window.len() < VOLATILITY_SPAN {
            return None;
        }

        let recent = window.divergences().rev().take(VOLATILITY_SPAN);
        let (min, max) = recent.fold((Decimal::MAX, Decimal::MIN), |(min, max), value| {
            (min.min(value), max.max(value))
        });
        Some(max - min)
    }
}
