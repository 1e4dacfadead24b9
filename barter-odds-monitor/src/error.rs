//! Error types for quote construction and configuration loading.
//!
//! The comparison core itself never fails: malformed quotes are dropped and
//! arithmetic edge cases resolve to documented defaults.

use rust_decimal::Decimal;
use smol_str::SmolStr;
use thiserror::Error;

/// Reasons a fetch-layer market cannot become a [`Quote`](crate::quote::Quote).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuoteError {
    #[error("expected a two-outcome market, found {0} outcomes")]
    OutcomeCount(usize),

    #[error("outcome {code} does not belong to game {game}")]
    UnknownOutcome { code: SmolStr, game: String },

    #[error("outcome {code} listed twice for game {game}")]
    DuplicateOutcome { code: SmolStr, game: String },

    #[error("negative price {price} for {game}")]
    NegativePrice { price: Decimal, game: String },
}

/// Errors that can occur when loading a [`MonitorConfig`](crate::config::MonitorConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}
