//! Per-platform quotes handed over by the fetch layer.
//!
//! Two paths exist:
//! - [`Quote`]: normalized integer percentages, used for divergence tracking.
//! - [`RawQuote`]: unnormalized prices, used for fee-aware arbitrage where the
//!   real transaction cost matters.

use crate::{
    error::QuoteError,
    game::{GameKey, Matchup, Platform, Side},
    normalize::ProbabilityNormalizer,
};
use derive_more::Constructor;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use tracing::debug;

/// Normalized away/home probabilities in whole percent. Always sums to 100.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, Deserialize, Serialize)]
pub struct ProbabilityPair {
    pub away: i64,
    pub home: i64,
}

impl ProbabilityPair {
    /// Normalize raw away/home percentages into a pair summing to 100.
    pub fn from_percentages(away: Decimal, home: Decimal) -> Self {
        let (away, home) = ProbabilityNormalizer::normalize(away, home);
        Self { away, home }
    }

    /// Probability for one side.
    pub fn get(&self, side: Side) -> i64 {
        match side {
            Side::Away => self.away,
            Side::Home => self.home,
        }
    }

    /// Absolute per-side difference against another platform's pair.
    ///
    /// Saturated pairs from out-of-range inputs can sit at opposite ends of
    /// `i64`, so the difference is taken unsigned.
    pub fn divergence(&self, other: &ProbabilityPair, side: Side) -> Decimal {
        Decimal::from(self.get(side).abs_diff(other.get(side)))
    }
}

/// One outcome of a two-outcome market, as listed by the platform.
#[derive(Clone, PartialEq, Debug, Constructor, Deserialize, Serialize)]
pub struct OutcomePrice {
    /// Team code the outcome resolves to
    pub code: SmolStr,
    /// Raw outcome price (0.00 - 1.00)
    pub price: Decimal,
}

/// A normalized probability quote for one game on one platform.
#[derive(Clone, PartialEq, Debug, Deserialize, Serialize)]
pub struct Quote {
    pub platform: Platform,
    pub matchup: Matchup,
    pub probability: ProbabilityPair,
    /// Event page on the platform
    pub url: Option<String>,
    /// Market end / close time as reported by the platform
    pub end_time: Option<String>,
    /// Contributing bookmakers, for aggregated odds sources
    #[serde(default)]
    pub bookmakers: Vec<SmolStr>,
}

impl Quote {
    /// Create a quote from already-normalized probabilities.
    pub fn new(platform: Platform, matchup: Matchup, probability: ProbabilityPair) -> Self {
        Self {
            platform,
            matchup,
            probability,
            url: None,
            end_time: None,
            bookmakers: Vec::new(),
        }
    }

    /// Build a quote from a two-outcome market's raw prices.
    ///
    /// Outcomes are normalized in the order the platform lists them (the tie
    /// rule favours the first outcome), then mapped onto away/home by code.
    pub fn from_outcome_prices(
        platform: Platform,
        matchup: Matchup,
        outcomes: &[OutcomePrice],
    ) -> Result<Self, QuoteError> {
        let [first, second] = outcomes else {
            return Err(QuoteError::OutcomeCount(outcomes.len()));
        };

        let game = matchup.key.to_string();
        for outcome in [first, second] {
            if outcome.price < Decimal::ZERO {
                return Err(QuoteError::NegativePrice {
                    price: outcome.price,
                    game,
                });
            }
            if outcome.code != matchup.key.away && outcome.code != matchup.key.home {
                return Err(QuoteError::UnknownOutcome {
                    code: outcome.code.clone(),
                    game,
                });
            }
        }
        if first.code == second.code {
            return Err(QuoteError::DuplicateOutcome {
                code: first.code.clone(),
                game,
            });
        }

        let (first_prob, second_prob) =
            ProbabilityNormalizer::normalize_fractions(first.price, second.price);

        let probability = if first.code == matchup.key.away {
            ProbabilityPair {
                away: first_prob,
                home: second_prob,
            }
        } else {
            ProbabilityPair {
                away: second_prob,
                home: first_prob,
            }
        };

        Ok(Self::new(platform, matchup, probability))
    }

    /// Build a quote from away/home values already in percentage space, such
    /// as last-traded prices in cents.
    pub fn from_percentages(
        platform: Platform,
        matchup: Matchup,
        away: Decimal,
        home: Decimal,
    ) -> Result<Self, QuoteError> {
        for price in [away, home] {
            if price < Decimal::ZERO {
                return Err(QuoteError::NegativePrice {
                    price,
                    game: matchup.key.to_string(),
                });
            }
        }
        let probability = ProbabilityPair::from_percentages(away, home);
        Ok(Self::new(platform, matchup, probability))
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_end_time(mut self, end_time: impl Into<String>) -> Self {
        self.end_time = Some(end_time.into());
        self
    }

    pub fn with_bookmakers(mut self, bookmakers: impl IntoIterator<Item = impl Into<SmolStr>>) -> Self {
        self.bookmakers = bookmakers.into_iter().map(Into::into).collect();
        self
    }

    /// Identity used to join this quote with other platforms.
    pub fn key(&self) -> &GameKey {
        &self.matchup.key
    }
}

/// Drop quotes the fetch layer could not build, logging why.
///
/// Works for both [`Quote`] and [`RawQuote`]. Partial platform data is the
/// normal case, so invalid markets never fail a refresh cycle.
pub fn retain_valid<T>(
    platform: Platform,
    quotes: impl IntoIterator<Item = Result<T, QuoteError>>,
) -> Vec<T> {
    quotes
        .into_iter()
        .filter_map(|result| match result {
            Ok(quote) => Some(quote),
            Err(error) => {
                debug!(%platform, %error, "Dropping malformed quote");
                None
            }
        })
        .collect()
}

/// How a venue quotes prices.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuotingConvention {
    /// A single fractional price per outcome (0.00 - 1.00), no bid/ask.
    Mid,
    /// Best bid and ask per outcome, in cents (0 - 100).
    Book,
}

/// Best bid/ask for one outcome, in cents.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Constructor, Deserialize, Serialize)]
pub struct BookTop {
    /// Price you receive when selling
    pub bid: Decimal,
    /// Price you pay when buying
    pub ask: Decimal,
}

impl BookTop {
    /// Ask minus bid.
    pub fn spread(&self) -> Decimal {
        self.ask - self.bid
    }
}

/// Unnormalized pricing for both sides of a game.
#[derive(Copy, Clone, PartialEq, Debug, Deserialize, Serialize)]
#[serde(tag = "convention", rename_all = "snake_case")]
pub enum RawPricing {
    /// Fractional prices (0.00 - 1.00)
    Mid { away: Decimal, home: Decimal },
    /// Order book tops in cents
    Book { away: BookTop, home: BookTop },
}

impl RawPricing {
    pub fn convention(&self) -> QuotingConvention {
        match self {
            RawPricing::Mid { .. } => QuotingConvention::Mid,
            RawPricing::Book { .. } => QuotingConvention::Book,
        }
    }

    /// Price in cents to buy one contract of `side`.
    ///
    /// Mid-style venues have no ask, so the quoted price is used.
    pub fn buy_cents(&self, side: Side) -> Decimal {
        match (self, side) {
            (RawPricing::Mid { away, .. }, Side::Away) => ProbabilityNormalizer::to_percent(*away),
            (RawPricing::Mid { home, .. }, Side::Home) => ProbabilityNormalizer::to_percent(*home),
            (RawPricing::Book { away, .. }, Side::Away) => away.ask,
            (RawPricing::Book { home, .. }, Side::Home) => home.ask,
        }
    }

    /// Price in cents received for selling one contract of `side`.
    ///
    /// Selling a mid-style venue at its quoted price is an approximation: no
    /// bid exists there to confirm it.
    pub fn sell_cents(&self, side: Side) -> Decimal {
        match (self, side) {
            (RawPricing::Mid { away, .. }, Side::Away) => ProbabilityNormalizer::to_percent(*away),
            (RawPricing::Mid { home, .. }, Side::Home) => ProbabilityNormalizer::to_percent(*home),
            (RawPricing::Book { away, .. }, Side::Away) => away.bid,
            (RawPricing::Book { home, .. }, Side::Home) => home.bid,
        }
    }

    /// The first negative price, in away then home order.
    pub fn negative_price(&self) -> Option<Decimal> {
        let prices = match *self {
            RawPricing::Mid { away, home } => [away, home, Decimal::ZERO, Decimal::ZERO],
            RawPricing::Book { away, home } => [away.bid, away.ask, home.bid, home.ask],
        };
        prices.into_iter().find(|price| *price < Decimal::ZERO)
    }

    /// Same pricing with away and home swapped.
    pub fn swapped(&self) -> Self {
        match *self {
            RawPricing::Mid { away, home } => RawPricing::Mid {
                away: home,
                home: away,
            },
            RawPricing::Book { away, home } => RawPricing::Book {
                away: home,
                home: away,
            },
        }
    }
}

/// An unnormalized quote for one game on one platform.
#[derive(Clone, PartialEq, Debug, Constructor, Deserialize, Serialize)]
pub struct RawQuote {
    pub platform: Platform,
    pub matchup: Matchup,
    pub pricing: RawPricing,
}

impl RawQuote {
    /// Build a raw quote, rejecting any negative price.
    pub fn try_new(platform: Platform, matchup: Matchup, pricing: RawPricing) -> Result<Self, QuoteError> {
        if let Some(price) = pricing.negative_price() {
            return Err(QuoteError::NegativePrice {
                price,
                game: matchup.key.to_string(),
            });
        }
        Ok(Self::new(platform, matchup, pricing))
    }

    pub fn key(&self) -> &GameKey {
        &self.matchup.key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn matchup() -> Matchup {
        Matchup::new("BKN", "WAS", "Brooklyn Nets", "Washington Wizards")
    }

    #[test]
    fn test_from_outcome_prices_maps_by_code() {
        // Platform lists the home team first
        let quote = Quote::from_outcome_prices(
            Platform::Polymarket,
            matchup(),
            &[
                OutcomePrice::new("WAS".into(), dec!(0.575)),
                OutcomePrice::new("BKN".into(), dec!(0.425)),
            ],
        )
        .unwrap();

        assert_eq!(quote.probability, ProbabilityPair { away: 43, home: 57 });
        assert_eq!(quote.key().to_string(), "BKN@WAS");
    }

    #[test]
    fn test_from_outcome_prices_rejects_malformed() {
        let one = [OutcomePrice::new("BKN".into(), dec!(0.5))];
        assert_eq!(
            Quote::from_outcome_prices(Platform::Polymarket, matchup(), &one),
            Err(QuoteError::OutcomeCount(1))
        );

        let unknown = [
            OutcomePrice::new("BKN".into(), dec!(0.5)),
            OutcomePrice::new("LAL".into(), dec!(0.5)),
        ];
        assert!(matches!(
            Quote::from_outcome_prices(Platform::Polymarket, matchup(), &unknown),
            Err(QuoteError::UnknownOutcome { .. })
        ));

        let duplicate = [
            OutcomePrice::new("BKN".into(), dec!(0.5)),
            OutcomePrice::new("BKN".into(), dec!(0.5)),
        ];
        assert!(matches!(
            Quote::from_outcome_prices(Platform::Polymarket, matchup(), &duplicate),
            Err(QuoteError::DuplicateOutcome { .. })
        ));

        let negative = [
            OutcomePrice::new("BKN".into(), dec!(-0.1)),
            OutcomePrice::new("WAS".into(), dec!(0.5)),
        ];
        assert!(matches!(
            Quote::from_outcome_prices(Platform::Polymarket, matchup(), &negative),
            Err(QuoteError::NegativePrice { .. })
        ));
    }

    #[test]
    fn test_from_percentages_normalizes_spread() {
        // Order book derived values summing to 105
        let quote =
            Quote::from_percentages(Platform::Kalshi, matchup(), dec!(55), dec!(50)).unwrap();
        assert_eq!(quote.probability, ProbabilityPair { away: 55, home: 45 });
    }

    #[test]
    fn test_retain_valid_drops_errors() {
        let quotes = retain_valid(
            Platform::Kalshi,
            vec![
                Quote::from_percentages(Platform::Kalshi, matchup(), dec!(40), dec!(60)),
                Err(QuoteError::OutcomeCount(3)),
            ],
        );
        assert_eq!(quotes.len(), 1);
    }

    #[test]
    fn test_raw_pricing_prices_in_cents() {
        let mid = RawPricing::Mid {
            away: dec!(0.40),
            home: dec!(0.61),
        };
        assert_eq!(mid.buy_cents(Side::Away), dec!(40));
        assert_eq!(mid.sell_cents(Side::Home), dec!(61));

        let book = RawPricing::Book {
            away: BookTop::new(dec!(45), dec!(47)),
            home: BookTop::new(dec!(52), dec!(55)),
        };
        assert_eq!(book.buy_cents(Side::Away), dec!(47));
        assert_eq!(book.sell_cents(Side::Away), dec!(45));
        assert_eq!(book.swapped().buy_cents(Side::Away), dec!(55));
        assert_eq!(BookTop::new(dec!(45), dec!(47)).spread(), dec!(2));
    }

    #[test]
    fn test_probability_divergence() {
        let a = ProbabilityPair { away: 43, home: 57 };
        let b = ProbabilityPair { away: 48, home: 52 };
        assert_eq!(a.divergence(&b, Side::Away), dec!(5));
        assert_eq!(b.divergence(&a, Side::Home), dec!(5));
    }

    #[test]
    fn test_probability_divergence_saturated_pairs() {
        let huge = Decimal::from(10_000_000_000_000_000_000_u64);
        let a = Quote::from_percentages(Platform::Polymarket, matchup(), huge, dec!(3)).unwrap();
        let b = Quote::from_percentages(Platform::Kalshi, matchup(), dec!(3), huge).unwrap();
        assert_eq!(a.probability, ProbabilityPair { away: i64::MAX, home: 100 - i64::MAX });

        // i64::MAX - (100 - i64::MAX)
        let expected = Decimal::from(i64::MAX) * Decimal::TWO - Decimal::ONE_HUNDRED;
        assert_eq!(a.probability.divergence(&b.probability, Side::Away), expected);
        assert_eq!(b.probability.divergence(&a.probability, Side::Home), expected);
    }

    #[test]
    fn test_raw_quote_try_new_rejects_negative_prices() {
        let book = RawPricing::Book {
            away: BookTop::new(dec!(45), dec!(-47)),
            home: BookTop::new(dec!(53), dec!(55)),
        };
        assert_eq!(
            RawQuote::try_new(Platform::Kalshi, matchup(), book),
            Err(QuoteError::NegativePrice {
                price: dec!(-47),
                game: "BKN@WAS".to_string(),
            })
        );

        let mid = RawPricing::Mid {
            away: dec!(0.40),
            home: dec!(0.60),
        };
        assert!(RawQuote::try_new(Platform::Polymarket, matchup(), mid).is_ok());
        assert_eq!(book.swapped().negative_price(), Some(dec!(-47)));
    }

    #[test]
    fn test_retain_valid_raw_quotes() {
        let quotes = retain_valid(
            Platform::Kalshi,
            [
                RawQuote::try_new(
                    Platform::Kalshi,
                    matchup(),
                    RawPricing::Book {
                        away: BookTop::new(dec!(45), dec!(47)),
                        home: BookTop::new(dec!(53), dec!(55)),
                    },
                ),
                RawQuote::try_new(
                    Platform::Kalshi,
                    matchup(),
                    RawPricing::Book {
                        away: BookTop::new(dec!(-1), dec!(47)),
                        home: BookTop::new(dec!(53), dec!(55)),
                    },
                ),
            ],
        );
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].pricing.negative_price(), None);
    }
}
