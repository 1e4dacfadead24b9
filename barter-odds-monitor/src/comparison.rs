//! Per-game comparison records produced by each refresh cycle.

use crate::{
    game::{GameKey, Platform, Side},
    history::HistoryWindow,
    quote::{ProbabilityPair, Quote},
    trend::{PriceChange, Trend},
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use smol_str::SmolStr;

/// Characters of the market end time kept as the game time ("YYYY-MM-DDTHH:MM").
pub const GAME_TIME_LEN: usize = 16;

/// Date prefix of [`Comparison::game_time`] ("YYYY-MM-DD").
const GAME_DATE_LEN: usize = 10;

/// One platform's view of a game.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformSection {
    pub platform: Platform,
    pub away: i64,
    pub home: i64,
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub bookmakers: Vec<SmolStr>,
}

impl From<&Quote> for PlatformSection {
    fn from(quote: &Quote) -> Self {
        Self {
            platform: quote.platform,
            away: quote.probability.away,
            home: quote.probability.home,
            url: quote.url.clone(),
            bookmakers: quote.bookmakers.clone(),
        }
    }
}

/// Absolute per-side probability differences between base and counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Divergence {
    pub away: Decimal,
    pub home: Decimal,
    pub max: Decimal,
}

impl Divergence {
    pub fn between(base: &ProbabilityPair, counterpart: &ProbabilityPair) -> Self {
        let away = base.divergence(counterpart, Side::Away);
        let home = base.divergence(counterpart, Side::Home);
        Self {
            away,
            home,
            max: away.max(home),
        }
    }
}

/// Divergence series and timestamps for charting, oldest first.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct HistorySlice {
    pub divergence: Vec<Decimal>,
    pub timestamps: Vec<DateTime<Utc>>,
}

impl From<&HistoryWindow> for HistorySlice {
    fn from(window: &HistoryWindow) -> Self {
        Self {
            divergence: window.divergences().collect(),
            timestamps: window.timestamps().collect(),
        }
    }
}

/// Read-only comparison of one matched game for one cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub away_code: SmolStr,
    pub home_code: SmolStr,
    pub away_team: SmolStr,
    pub home_team: SmolStr,
    pub base: PlatformSection,
    pub counterpart: PlatformSection,
    /// Aggregated sportsbook odds, when listed
    pub sportsbook: Option<PlatformSection>,
    /// Community market odds, when listed
    pub community: Option<PlatformSection>,
    pub divergence: Divergence,
    /// Trend value rounded to one decimal
    pub trend: Trend,
    pub price_change: PriceChange,
    pub volatility: Option<Decimal>,
    pub arbitrage_score: u8,
    /// First 16 characters of the base market's end time, or empty
    pub game_time: String,
    pub history: HistorySlice,
}

impl Comparison {
    pub fn key(&self) -> GameKey {
        GameKey::new(self.away_code.clone(), self.home_code.clone())
    }

    /// Calendar date of the game, if the game time carries one.
    pub fn game_date(&self) -> Option<NaiveDate> {
        let prefix = self.game_time.get(..GAME_DATE_LEN)?;
        NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
    }
}

/// Truncate a platform end time to [`GAME_TIME_LEN`] characters.
pub fn game_time(end_time: Option<&str>) -> String {
    end_time
        .map(|end_time| end_time.chars().take(GAME_TIME_LEN).collect())
        .unwrap_or_default()
}

/// Counts for one refresh cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ComparisonStats {
    /// Quotes received from the base platform
    pub base_total: usize,
    /// Quotes received from the counterpart platform
    pub counterpart_total: usize,
    /// Base quotes with a counterpart
    pub matched: usize,
    /// Comparisons produced
    pub total_games: usize,
}

/// Output of one refresh cycle, sorted by arbitrage score then divergence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    pub timestamp: DateTime<Utc>,
    pub stats: ComparisonStats,
    pub comparisons: Vec<Comparison>,
}

/// Comparisons split by game date. Games on other dates are left out.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DateGroups<'a> {
    pub today: Vec<&'a Comparison>,
    pub tomorrow: Vec<&'a Comparison>,
}

impl ComparisonReport {
    pub fn group_by_date(&self, today: NaiveDate, tomorrow: NaiveDate) -> DateGroups<'_> {
        let mut groups = DateGroups::default();
        for comparison in &self.comparisons {
            match comparison.game_date() {
                Some(date) if date == today => groups.today.push(comparison),
                Some(date) if date == tomorrow => groups.tomorrow.push(comparison),
                _ => {}
            }
        }
        groups
    }

    pub fn get(&self, key: &GameKey) -> Option<&Comparison> {
        self.comparisons
            .iter()
            .find(|comparison| comparison.away_code == key.away && comparison.home_code == key.home)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Matchup;
    use rust_decimal_macros::dec;

    #[test]
    fn test_divergence_between() {
        let divergence = Divergence::between(
            &ProbabilityPair { away: 43, home: 57 },
            &ProbabilityPair { away: 47, home: 53 },
        );
        assert_eq!(divergence.away, dec!(4));
        assert_eq!(divergence.home, dec!(4));
        assert_eq!(divergence.max, dec!(4));
    }

    #[test]
    fn test_game_time_truncation() {
        assert_eq!(game_time(Some("2025-11-16T00:00:00Z")), "2025-11-16T00:00");
        assert_eq!(game_time(Some("2025-11-16")), "2025-11-16");
        assert_eq!(game_time(None), "");
    }

    #[test]
    fn test_platform_section_from_quote() {
        let quote = Quote::new(
            Platform::Sportsbooks,
            Matchup::new("BKN", "WAS", "Brooklyn Nets", "Washington Wizards"),
            ProbabilityPair { away: 38, home: 62 },
        )
        .with_bookmakers(["draftkings", "fanduel"]);

        let section = PlatformSection::from(&quote);
        assert_eq!(section.away, 38);
        assert_eq!(section.bookmakers.len(), 2);
        assert!(section.url.is_none());

        let json = serde_json::to_value(&section).unwrap();
        assert_eq!(json["platform"], "sportsbooks");
    }
}
