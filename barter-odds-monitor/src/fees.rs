//! Fee-adjusted cost and revenue for a single buy/sell leg.
//!
//! Uses rust_decimal for exact precision in financial calculations. Prices are
//! in cents per contract and fee rates are fractions (e.g., 0.07 = 7%).

use rust_decimal::Decimal;

/// Fee calculator for prediction market venues.
pub struct FeeCalculator;

impl FeeCalculator {
    /// Total paid to buy one contract: `price * (1 + fee_rate)`.
    ///
    /// # Arguments
    /// * `price` - Buy price in cents
    /// * `fee_rate` - Venue fee as a fraction
    pub fn buy_cost(price: Decimal, fee_rate: Decimal) -> Decimal {
        price * (Decimal::ONE + fee_rate)
    }

    /// Total received for selling one contract: `price * (1 - fee_rate)`.
    pub fn sell_revenue(price: Decimal, fee_rate: Decimal) -> Decimal {
        price * (Decimal::ONE - fee_rate)
    }

    /// Net profit of buying on one venue and selling on another.
    ///
    /// # Returns
    /// Net profit in cents (positive = profit, negative = loss)
    pub fn net_profit(
        buy_price: Decimal,
        buy_fee_rate: Decimal,
        sell_price: Decimal,
        sell_fee_rate: Decimal,
    ) -> Decimal {
        Self::sell_revenue(sell_price, sell_fee_rate) - Self::buy_cost(buy_price, buy_fee_rate)
    }

    /// Profit as a percentage of cost. A zero cost yields 0.
    pub fn profit_pct(profit: Decimal, cost: Decimal) -> Decimal {
        if cost.is_zero() {
            return Decimal::ZERO;
        }
        profit / cost * Decimal::ONE_HUNDRED
    }

    /// Minimum sell/buy price ratio required to break even after fees.
    ///
    /// # Returns
    /// `None` when the sell fee consumes the whole sale (fee rate ≥ 100%)
    pub fn breakeven_ratio(buy_fee_rate: Decimal, sell_fee_rate: Decimal) -> Option<Decimal> {
        let kept = Decimal::ONE - sell_fee_rate;
        if kept <= Decimal::ZERO {
            return None;
        }
        Some((Decimal::ONE + buy_fee_rate) / kept)
    }
}
