//! Fee-aware two-venue arbitrage detection on raw prices.
//!
//! For every matched game four legs are priced: buy on the base venue and sell
//! on the counterpart, or the reverse, for each of the away and home outcomes.
//! The most profitable viable leg per game is reported.
//!
//! Mid-style venues have no order book, so selling there at the quoted price
//! is an approximation. Book venues buy at the ask and sell at the bid.

use crate::{
    config::{DetectorConfig, VenueConfig},
    game::Side,
    matcher::GameMatcher,
    opportunity::{ArbitrageLeg, LegDirection},
    quote::{RawPricing, RawQuote},
};
use fnv::FnvHashSet;
use itertools::Itertools;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

/// Detects arbitrage legs between a base and a counterpart venue.
#[derive(Debug, Clone, Default)]
pub struct FeeAwareArbitrageDetector {
    config: DetectorConfig,
}

impl FeeAwareArbitrageDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Find the best viable leg per matched game, keep those at or above
    /// `min_profit_pct`, sorted by profit percentage descending.
    ///
    /// A game listed more than once on the base venue is priced once, against
    /// its first listing.
    pub fn detect(
        &self,
        base: &[RawQuote],
        counterpart: &[RawQuote],
        min_profit_pct: Decimal,
    ) -> Vec<ArbitrageLeg> {
        let pairs = GameMatcher::match_oriented(base, counterpart);
        let evaluated = pairs.len();

        let mut seen = FnvHashSet::default();
        let legs = pairs
            .into_iter()
            .filter(|pair| {
                let first = seen.insert(pair.base.key().clone());
                if !first {
                    debug!(game = %pair.base.key(), "Skipping duplicate game in scan");
                }
                first
            })
            .filter_map(|pair| self.best_leg(pair.base, pair.counterpart))
            .filter(|leg| leg.profit_pct >= min_profit_pct)
            .sorted_by(|a, b| b.profit_pct.cmp(&a.profit_pct))
            .collect::<Vec<_>>();

        for leg in &legs {
            info!(
                game = %leg.game,
                direction = ?leg.direction,
                side = %leg.side,
                buy = %leg.buy_platform,
                sell = %leg.sell_platform,
                profit_pct = %leg.profit_pct.round_dp(2),
                "Arbitrage opportunity detected"
            );
        }

        debug!(
            base = base.len(),
            counterpart = counterpart.len(),
            matched = evaluated,
            opportunities = legs.len(),
            %min_profit_pct,
            "Arbitrage scan complete"
        );

        legs
    }

    /// Same as [`detect`](Self::detect) using the configured minimum profit.
    pub fn scan(&self, base: &[RawQuote], counterpart: &[RawQuote]) -> Vec<ArbitrageLeg> {
        self.detect(base, counterpart, self.config.min_profit_pct)
    }

    /// The viable leg with the highest profit percentage for one game.
    ///
    /// The counterpart may list the teams in either orientation; its prices
    /// are realigned to the base quote by team code. Returns `None` when the
    /// quotes are for different games, when either quote's pricing does not
    /// match its venue's convention or carries a negative price, or when no
    /// leg is profitable.
    pub fn best_leg(&self, base: &RawQuote, counterpart: &RawQuote) -> Option<ArbitrageLeg> {
        let counterpart_pricing = if counterpart.key() == base.key() {
            counterpart.pricing
        } else if counterpart.key() == &base.key().reversed() {
            counterpart.pricing.swapped()
        } else {
            return None;
        };

        if !Self::usable(&self.config.base, base, &base.pricing)
            || !Self::usable(&self.config.counterpart, counterpart, &counterpart_pricing)
        {
            return None;
        }

        // First maximum wins ties, in leg evaluation order
        self.legs(base, &counterpart_pricing)
            .into_iter()
            .filter(ArbitrageLeg::is_viable)
            .reduce(|best, leg| if leg.profit_pct > best.profit_pct { leg } else { best })
    }

    /// All four legs for one game, viable or not.
    ///
    /// `counterpart` must already be aligned to the base quote's orientation.
    pub fn legs(&self, base: &RawQuote, counterpart: &RawPricing) -> Vec<ArbitrageLeg> {
        let base_venue = &self.config.base;
        let counterpart_venue = &self.config.counterpart;

        LegDirection::ALL
            .into_iter()
            .cartesian_product(Side::ALL)
            .map(|(direction, side)| {
                let (buy_price, sell_price) = match direction {
                    LegDirection::BaseToCounterpart => {
                        (base.pricing.buy_cents(side), counterpart.sell_cents(side))
                    }
                    LegDirection::CounterpartToBase => {
                        (counterpart.buy_cents(side), base.pricing.sell_cents(side))
                    }
                };

                ArbitrageLeg::new(
                    base.key().clone(),
                    direction,
                    side,
                    base.matchup.team(side).clone(),
                    direction.buy_venue(base_venue, counterpart_venue),
                    buy_price,
                    direction.sell_venue(base_venue, counterpart_venue),
                    sell_price,
                )
            })
            .collect()
    }

    fn usable(venue: &VenueConfig, quote: &RawQuote, pricing: &RawPricing) -> bool {
        if pricing.convention() != venue.convention {
            warn!(
                game = %quote.key(),
                platform = %quote.platform,
                expected = ?venue.convention,
                actual = ?pricing.convention(),
                "Skipping quote with unexpected pricing convention"
            );
            return false;
        }
        if let Some(price) = pricing.negative_price() {
            warn!(
                game = %quote.key(),
                platform = %quote.platform,
                %price,
                "Skipping quote with negative price"
            );
            return false;
        }
        true
    }
}
