//! Event identity shared by every platform: venues, game keys and sides.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Prediction market or odds venue a quote originates from.
#[derive(Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Debug, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Polymarket,
    Kalshi,
    /// Aggregated bookmaker odds (DraftKings, FanDuel, BetMGM, ...)
    Sportsbooks,
    /// Community play-money market
    Manifold,
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::Polymarket => write!(f, "polymarket"),
            Platform::Kalshi => write!(f, "kalshi"),
            Platform::Sportsbooks => write!(f, "sportsbooks"),
            Platform::Manifold => write!(f, "manifold"),
        }
    }
}

/// Canonical identity of a game: the ordered (away, home) team code tuple.
///
/// Two quotes share a `GameKey` iff they denote the same event with the same
/// away/home orientation. Displays as `"{away}@{home}"`.
#[derive(Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Debug, Deserialize, Serialize)]
pub struct GameKey {
    /// Away team code (e.g., "BKN")
    pub away: SmolStr,
    /// Home team code (e.g., "WAS")
    pub home: SmolStr,
}

impl GameKey {
    /// Create a new game key from resolved team codes.
    pub fn new(away: impl Into<SmolStr>, home: impl Into<SmolStr>) -> Self {
        Self {
            away: away.into(),
            home: home.into(),
        }
    }

    /// The same two teams with away and home swapped.
    pub fn reversed(&self) -> Self {
        Self {
            away: self.home.clone(),
            home: self.away.clone(),
        }
    }

    /// Check if both keys involve the same two teams, in either orientation.
    pub fn same_teams(&self, other: &GameKey) -> bool {
        self == other || (self.away == other.home && self.home == other.away)
    }

    /// Team code for one side of the game.
    pub fn code(&self, side: Side) -> &SmolStr {
        match side {
            Side::Away => &self.away,
            Side::Home => &self.home,
        }
    }
}

impl std::fmt::Display for GameKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.away, self.home)
    }
}

/// A game as listed by one platform: identity plus display names.
#[derive(Clone, PartialEq, Eq, Debug, Deserialize, Serialize)]
pub struct Matchup {
    pub key: GameKey,
    /// Away team display name (e.g., "Brooklyn Nets")
    pub away_team: SmolStr,
    /// Home team display name
    pub home_team: SmolStr,
}

impl Matchup {
    pub fn new(
        away_code: impl Into<SmolStr>,
        home_code: impl Into<SmolStr>,
        away_team: impl Into<SmolStr>,
        home_team: impl Into<SmolStr>,
    ) -> Self {
        Self {
            key: GameKey::new(away_code, home_code),
            away_team: away_team.into(),
            home_team: home_team.into(),
        }
    }

    /// Display name for one side of the game.
    pub fn team(&self, side: Side) -> &SmolStr {
        match side {
            Side::Away => &self.away_team,
            Side::Home => &self.home_team,
        }
    }
}

/// Side of a two-outcome game market.
#[derive(Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Debug, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Away,
    Home,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Away, Side::Home];

    /// Get the opposite side.
    pub fn inverse(&self) -> Self {
        match self {
            Side::Away => Side::Home,
            Side::Home => Side::Away,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Away => write!(f, "away"),
            Side::Home => write!(f, "home"),
        }
    }
}
