//! Replays synthetic refresh cycles through the odds monitor.
//!
//! Simulates a Kalshi market drifting away from Polymarket over twelve 30
//! second cycles, then scans raw prices for fee-aware arbitrage.
//!
//! Usage:
//!   # Optional overrides
//!   ODDS_MIN_PROFIT_PCT=0.5
//!   ODDS_COUNTERPART_FEE=0.07
//!   RUST_LOG=barter_odds_monitor=debug
//!
//!   cargo run -p barter-odds-monitor --example replay_cycles

use barter_odds_monitor::{
    BookTop, ComparisonAggregator, CycleQuotes, HistoryStore, Matchup, MonitorConfig, OutcomePrice,
    Platform, ProbabilityPair, Quote, QuoteError, RawPricing, RawQuote, quote::retain_valid,
};
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use tracing::{error, info};

const CYCLES: i64 = 12;

fn main() {
    init_logging();

    let config = match MonitorConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!(%err, "Invalid configuration");
            return;
        }
    };
    info!(?config, "Loaded configuration");

    let aggregator = ComparisonAggregator::new(Arc::new(HistoryStore::new()), config);
    let start = Utc::now();
    let today = start.date_naive();

    for cycle in 0..CYCLES {
        let quotes = cycle_quotes(cycle, &today.format("%Y-%m-%d").to_string());
        let report = aggregator.run_cycle_at(start + Duration::seconds(30 * cycle), &quotes);

        for game in &report.comparisons {
            info!(
                cycle,
                game = %game.key(),
                base = %format!("{}/{}", game.base.away, game.base.home),
                counterpart = %format!("{}/{}", game.counterpart.away, game.counterpart.home),
                divergence = %game.divergence.max,
                trend = %game.trend.direction,
                trend_value = %game.trend.value,
                score = game.arbitrage_score,
                "Comparison"
            );
        }

        if cycle == CYCLES - 1 {
            let groups = report.group_by_date(today, today + chrono::Days::new(1));
            info!(
                today = groups.today.len(),
                tomorrow = groups.tomorrow.len(),
                "Games by date"
            );
        }
    }

    let (poly, kalshi) = raw_quotes();
    let legs = aggregator.detect_arbitrage(&poly, &kalshi);
    if legs.is_empty() {
        info!("No arbitrage opportunities above threshold");
    }
    for leg in &legs {
        info!(
            game = %leg.game,
            team = %leg.team,
            buy = %leg.buy_platform,
            sell = %leg.sell_platform,
            cost = %leg.cost.round_dp(2),
            revenue = %leg.revenue.round_dp(2),
            profit_pct = %leg.profit_pct.round_dp(2),
            "Arbitrage leg"
        );
    }
}

/// Quotes for one cycle. Kalshi's view of BKN@WAS widens halfway through.
fn cycle_quotes(cycle: i64, date: &str) -> CycleQuotes {
    let nets = Matchup::new("BKN", "WAS", "Brooklyn Nets", "Washington Wizards");
    let lakers = Matchup::new("LAL", "BOS", "Los Angeles Lakers", "Boston Celtics");

    let end_time = format!("{date}T23:30:00Z");
    let base = retain_valid(
        Platform::Polymarket,
        [
            polymarket(&nets, dec!(0.425), dec!(0.575)).map(|q| q.with_end_time(end_time.clone())),
            polymarket(&lakers, dec!(0.31), dec!(0.70)).map(|q| q.with_end_time(end_time.clone())),
            // Three outcomes: dropped
            Quote::from_outcome_prices(
                Platform::Polymarket,
                Matchup::new("MIA", "NYK", "Miami Heat", "New York Knicks"),
                &[
                    OutcomePrice::new("MIA".into(), dec!(0.4)),
                    OutcomePrice::new("NYK".into(), dec!(0.5)),
                    OutcomePrice::new("TIE".into(), dec!(0.1)),
                ],
            ),
        ],
    );

    let drift = if cycle < CYCLES / 2 { Decimal::ZERO } else { dec!(4) };
    let counterpart = retain_valid(
        Platform::Kalshi,
        [
            Quote::from_percentages(Platform::Kalshi, nets.clone(), dec!(45) + drift, dec!(56) - drift),
            Quote::from_percentages(Platform::Kalshi, lakers.clone(), dec!(33), dec!(68)),
        ],
    );

    CycleQuotes {
        base,
        counterpart,
        sportsbook: vec![
            Quote::new(Platform::Sportsbooks, lakers, ProbabilityPair { away: 32, home: 68 })
                .with_bookmakers(["draftkings", "fanduel"]),
        ],
        community: vec![Quote::new(Platform::Manifold, nets, ProbabilityPair { away: 44, home: 56 })],
    }
}

fn polymarket(matchup: &Matchup, away: Decimal, home: Decimal) -> Result<Quote, QuoteError> {
    Quote::from_outcome_prices(
        Platform::Polymarket,
        matchup.clone(),
        &[
            OutcomePrice::new(matchup.key.away.clone(), away),
            OutcomePrice::new(matchup.key.home.clone(), home),
        ],
    )
}

fn raw_quotes() -> (Vec<RawQuote>, Vec<RawQuote>) {
    let nets = Matchup::new("BKN", "WAS", "Brooklyn Nets", "Washington Wizards");
    let lakers = Matchup::new("LAL", "BOS", "Los Angeles Lakers", "Boston Celtics");

    let poly = vec![
        RawQuote::new(
            Platform::Polymarket,
            nets.clone(),
            RawPricing::Mid {
                away: dec!(0.40),
                home: dec!(0.60),
            },
        ),
        RawQuote::new(
            Platform::Polymarket,
            lakers.clone(),
            RawPricing::Mid {
                away: dec!(0.42),
                home: dec!(0.58),
            },
        ),
    ];

    let kalshi = vec![
        RawQuote::new(
            Platform::Kalshi,
            nets,
            RawPricing::Book {
                away: BookTop::new(dec!(45), dec!(47)),
                home: BookTop::new(dec!(53), dec!(55)),
            },
        ),
        RawQuote::new(
            Platform::Kalshi,
            lakers,
            RawPricing::Book {
                away: BookTop::new(dec!(40), dec!(52)),
                home: BookTop::new(dec!(48), dec!(50)),
            },
        ),
    ];

    (poly, kalshi)
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::builder()
                .with_default_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_ansi(cfg!(debug_assertions))
        .init()
}
