//! Configuration types for the odds monitor.

use crate::{error::ConfigError, game::Platform, quote::QuotingConvention};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Top level configuration for a monitor process.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Fee-aware arbitrage detection settings
    pub detector: DetectorConfig,
    /// Which additional platforms are merged into comparisons
    pub platforms: PlatformToggles,
}

impl MonitorConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load config from environment variables, falling back to defaults.
    ///
    /// Reads:
    /// - `ODDS_MIN_PROFIT_PCT`: minimum leg profit in percent (e.g., 0.5)
    /// - `ODDS_BASE_FEE`: base venue fee rate (e.g., 0.02)
    /// - `ODDS_COUNTERPART_FEE`: counterpart venue fee rate (e.g., 0.07)
    /// - `ODDS_SPORTSBOOK_ENABLED`: "true"/"1" or "false"/"0"
    /// - `ODDS_COMMUNITY_ENABLED`: "true"/"1" or "false"/"0"
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup("ODDS_MIN_PROFIT_PCT") {
            config.detector.min_profit_pct = parse_decimal("ODDS_MIN_PROFIT_PCT", value)?;
        }
        if let Some(value) = lookup("ODDS_BASE_FEE") {
            config.detector.base.fee_rate = parse_fee_rate("ODDS_BASE_FEE", value)?;
        }
        if let Some(value) = lookup("ODDS_COUNTERPART_FEE") {
            config.detector.counterpart.fee_rate = parse_fee_rate("ODDS_COUNTERPART_FEE", value)?;
        }
        if let Some(value) = lookup("ODDS_SPORTSBOOK_ENABLED") {
            config.platforms.sportsbook = parse_bool("ODDS_SPORTSBOOK_ENABLED", value)?;
        }
        if let Some(value) = lookup("ODDS_COMMUNITY_ENABLED") {
            config.platforms.community = parse_bool("ODDS_COMMUNITY_ENABLED", value)?;
        }

        Ok(config)
    }
}

fn parse_decimal(key: &'static str, value: String) -> Result<Decimal, ConfigError> {
    Decimal::from_str(value.trim()).map_err(|_| ConfigError::InvalidValue { key, value })
}

fn parse_fee_rate(key: &'static str, value: String) -> Result<Decimal, ConfigError> {
    let rate = parse_decimal(key, value.clone())?;
    if rate < Decimal::ZERO || rate >= Decimal::ONE {
        return Err(ConfigError::InvalidValue { key, value });
    }
    Ok(rate)
}

fn parse_bool(key: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.trim() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(ConfigError::InvalidValue { key, value }),
    }
}

/// Fee and pricing convention of one venue.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct VenueConfig {
    pub platform: Platform,
    /// Fee as a fraction of notional (e.g., 0.02 = 2%)
    pub fee_rate: Decimal,
    pub convention: QuotingConvention,
}

impl VenueConfig {
    /// Polymarket: single mid-style price per outcome, 2% fee.
    pub fn polymarket() -> Self {
        Self {
            platform: Platform::Polymarket,
            fee_rate: Decimal::new(2, 2), // 0.02
            convention: QuotingConvention::Mid,
        }
    }

    /// Kalshi: bid/ask in cents, 7% fee.
    pub fn kalshi() -> Self {
        Self {
            platform: Platform::Kalshi,
            fee_rate: Decimal::new(7, 2), // 0.07
            convention: QuotingConvention::Book,
        }
    }
}

/// Configuration for the fee-aware arbitrage detector.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Venue treated as the base side of every leg
    pub base: VenueConfig,
    /// Venue compared against the base
    pub counterpart: VenueConfig,
    /// Minimum profit after fees, in percent of cost (e.g., 0.5 = 0.5%)
    pub min_profit_pct: Decimal,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            base: VenueConfig::polymarket(),
            counterpart: VenueConfig::kalshi(),
            min_profit_pct: Decimal::new(5, 1), // 0.5%
        }
    }
}

/// Additional platforms merged into each comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PlatformToggles {
    /// Aggregated sportsbook odds
    pub sportsbook: bool,
    /// Community play-money market
    pub community: bool,
}

impl Default for PlatformToggles {
    fn default() -> Self {
        Self {
            sportsbook: true,
            community: true,
        }
    }
}
