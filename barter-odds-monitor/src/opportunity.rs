//! Directional arbitrage legs and their fee-adjusted profit.

use crate::{
    config::VenueConfig,
    fees::FeeCalculator,
    game::{GameKey, Platform, Side},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Direction of the arbitrage trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LegDirection {
    /// Buy on the base venue, sell on the counterpart
    BaseToCounterpart,
    /// Buy on the counterpart venue, sell on the base
    CounterpartToBase,
}

impl LegDirection {
    pub const ALL: [LegDirection; 2] = [LegDirection::BaseToCounterpart, LegDirection::CounterpartToBase];

    /// Venue we're buying from.
    pub fn buy_venue<'a>(&self, base: &'a VenueConfig, counterpart: &'a VenueConfig) -> &'a VenueConfig {
        match self {
            LegDirection::BaseToCounterpart => base,
            LegDirection::CounterpartToBase => counterpart,
        }
    }

    /// Venue we're selling to.
    pub fn sell_venue<'a>(&self, base: &'a VenueConfig, counterpart: &'a VenueConfig) -> &'a VenueConfig {
        match self {
            LegDirection::BaseToCounterpart => counterpart,
            LegDirection::CounterpartToBase => base,
        }
    }
}

/// One directional buy/sell strategy on one side of a game.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ArbitrageLeg {
    /// Game the leg trades, in base venue orientation
    pub game: GameKey,
    pub direction: LegDirection,
    /// Outcome being bought and sold
    pub side: Side,
    /// Display name of the team for `side`
    pub team: SmolStr,
    pub buy_platform: Platform,
    pub sell_platform: Platform,
    /// Buy price in cents, before fees
    pub buy_price: Decimal,
    /// Sell price in cents, before fees
    pub sell_price: Decimal,
    pub buy_fee_rate: Decimal,
    pub sell_fee_rate: Decimal,
    /// Buy price plus buy fee
    pub cost: Decimal,
    /// Sell price minus sell fee
    pub revenue: Decimal,
    /// Revenue minus cost
    pub profit: Decimal,
    /// Profit as a percentage of cost (0 when cost is 0)
    pub profit_pct: Decimal,
}

impl ArbitrageLeg {
    /// Price a leg, applying each venue's fee.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        game: GameKey,
        direction: LegDirection,
        side: Side,
        team: SmolStr,
        buy_venue: &VenueConfig,
        buy_price: Decimal,
        sell_venue: &VenueConfig,
        sell_price: Decimal,
    ) -> Self {
        let cost = FeeCalculator::buy_cost(buy_price, buy_venue.fee_rate);
        let revenue = FeeCalculator::sell_revenue(sell_price, sell_venue.fee_rate);
        let profit = revenue - cost;
        let profit_pct = FeeCalculator::profit_pct(profit, cost);

        Self {
            game,
            direction,
            side,
            team,
            buy_platform: buy_venue.platform,
            sell_platform: sell_venue.platform,
            buy_price,
            sell_price,
            buy_fee_rate: buy_venue.fee_rate,
            sell_fee_rate: sell_venue.fee_rate,
            cost,
            revenue,
            profit,
            profit_pct,
        }
    }

    /// Check if this leg is profitable after fees.
    pub fn is_viable(&self) -> bool {
        self.profit > Decimal::ZERO
    }

    /// Check if this leg meets a minimum profit percentage.
    pub fn meets_threshold(&self, min_profit_pct: Decimal) -> bool {
        self.is_viable() && self.profit_pct >= min_profit_pct
    }
}
