//! Sports Prediction Market Odds Monitor for the Barter Trading Ecosystem
//!
//! This crate compares probability quotes for the same sporting event across
//! prediction market platforms (Polymarket, Kalshi) and optional additional
//! sources (aggregated sportsbooks, community markets). It tracks how the
//! platforms diverge over time and detects fee-aware arbitrage legs.
//!
//! # Key Components
//!
//! - [`ProbabilityNormalizer`]: Raw prices to integer percentages summing to 100
//! - [`GameMatcher`]: Pairs quotes for the same game across platforms
//! - [`HistoryStore`]: Bounded per-game divergence history (60 samples)
//! - [`TrendAnalyzer`]: Trend, price change and volatility from history
//! - [`ArbitrageScorer`]: Composite 0-100 arbitrage score
//! - [`FeeAwareArbitrageDetector`]: Four-leg fee-adjusted arbitrage on raw prices
//! - [`ComparisonAggregator`]: Runs a refresh cycle end to end
//!
//! # Example
//!
//! ```rust,ignore
//! use barter_odds_monitor::{
//!     ComparisonAggregator, CycleQuotes, HistoryStore, Matchup, MonitorConfig, Platform, Quote,
//! };
//! use rust_decimal_macros::dec;
//! use std::sync::Arc;
//!
//! let aggregator = ComparisonAggregator::new(Arc::new(HistoryStore::new()), MonitorConfig::default());
//!
//! let matchup = Matchup::new("BKN", "WAS", "Brooklyn Nets", "Washington Wizards");
//! let quotes = CycleQuotes {
//!     base: vec![Quote::from_percentages(Platform::Polymarket, matchup.clone(), dec!(42.5), dec!(57.5))?],
//!     counterpart: vec![Quote::from_percentages(Platform::Kalshi, matchup, dec!(47), dec!(53))?],
//!     ..Default::default()
//! };
//!
//! // Call once per refresh (e.g., every 30 seconds)
//! let report = aggregator.run_cycle(&quotes);
//! ```
//!
//! # Fee Model
//!
//! Each venue carries a flat fee rate applied to both sides of a leg:
//!
//! ```text
//! cost    = buy_price  * (1 + buy_fee)
//! revenue = sell_price * (1 - sell_fee)
//! profit  = revenue - cost
//! ```
//!
//! Defaults: Polymarket 2% (mid-style prices), Kalshi 7% (bid/ask in cents).

pub mod aggregator;
pub mod comparison;
pub mod config;
pub mod detector;
pub mod error;
pub mod fees;
pub mod game;
pub mod history;
pub mod matcher;
pub mod normalize;
pub mod opportunity;
pub mod quote;
pub mod score;
pub mod trend;

// Re-exports for convenience
pub use aggregator::{ComparisonAggregator, CycleQuotes};
pub use comparison::{
    Comparison, ComparisonReport, ComparisonStats, DateGroups, Divergence, HistorySlice, PlatformSection,
};
pub use config::{DetectorConfig, MonitorConfig, PlatformToggles, VenueConfig};
pub use detector::FeeAwareArbitrageDetector;
pub use error::{ConfigError, QuoteError};
pub use fees::FeeCalculator;
pub use game::{GameKey, Matchup, Platform, Side};
pub use history::{HISTORY_CAPACITY, HistorySample, HistoryStore, HistoryWindow};
pub use matcher::{GameMatcher, Keyed, MatchedPair, OrientedPair};
pub use normalize::ProbabilityNormalizer;
pub use opportunity::{ArbitrageLeg, LegDirection};
pub use quote::{BookTop, OutcomePrice, ProbabilityPair, Quote, QuotingConvention, RawPricing, RawQuote};
pub use score::{ArbitrageScorer, ScoreBreakdown};
pub use trend::{PriceChange, SideDelta, Trend, TrendAnalysis, TrendAnalyzer, TrendDirection};
