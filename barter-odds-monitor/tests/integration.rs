//! Integration tests for the odds comparison pipeline.
//!
//! Drives full refresh cycles through the aggregator with synthetic platform
//! quotes, and runs the fee-aware detector end to end. No network calls.

use barter_odds_monitor::{
    BookTop, ComparisonAggregator, CycleQuotes, FeeAwareArbitrageDetector, GameKey, HISTORY_CAPACITY,
    HistoryStore, LegDirection, Matchup, MonitorConfig, OutcomePrice, Platform, ProbabilityPair, Quote,
    RawPricing, RawQuote, Side, TrendDirection, quote::retain_valid,
};
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn nets_wizards() -> Matchup {
    Matchup::new("BKN", "WAS", "Brooklyn Nets", "Washington Wizards")
}

fn lakers_celtics() -> Matchup {
    Matchup::new("LAL", "BOS", "Los Angeles Lakers", "Boston Celtics")
}

fn poly_quote(matchup: Matchup, away: Decimal, home: Decimal) -> Quote {
    let outcomes = [
        OutcomePrice::new(matchup.key.away.clone(), away),
        OutcomePrice::new(matchup.key.home.clone(), home),
    ];
    Quote::from_outcome_prices(Platform::Polymarket, matchup, &outcomes).unwrap()
}

fn kalshi_quote(matchup: Matchup, away: Decimal, home: Decimal) -> Quote {
    Quote::from_percentages(Platform::Kalshi, matchup, away, home).unwrap()
}

fn at(cycle: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 11, 16, 18, 0, 0).unwrap() + Duration::seconds(30 * cycle)
}

fn aggregator() -> ComparisonAggregator {
    ComparisonAggregator::new(Arc::new(HistoryStore::new()), MonitorConfig::default())
}

// ---------------------------------------------------------------------------
// Test 1: Single cycle produces normalized, matched comparisons
// ---------------------------------------------------------------------------

#[test]
fn test_single_cycle_comparison() {
    let aggregator = aggregator();

    let quotes = CycleQuotes {
        base: vec![
            poly_quote(nets_wizards(), dec!(0.425), dec!(0.575))
                .with_url("https://polymarket.com/event/nba-bkn-was")
                .with_end_time("2025-11-16T00:00:00Z"),
            poly_quote(lakers_celtics(), dec!(0.30), dec!(0.70)),
        ],
        counterpart: vec![kalshi_quote(nets_wizards(), dec!(48), dec!(52))],
        ..Default::default()
    };

    let report = aggregator.run_cycle_at(at(0), &quotes);
    assert_eq!(report.stats.matched, 1);
    assert_eq!(report.stats.total_games, 1);
    assert_eq!(report.timestamp, at(0));

    let game = &report.comparisons[0];
    // 42.5 / 57.5 → 43 / 57
    assert_eq!(game.base.away + game.base.home, 100);
    assert_eq!((game.base.away, game.base.home), (43, 57));
    assert_eq!((game.counterpart.away, game.counterpart.home), (48, 52));
    assert_eq!(game.divergence.max, dec!(5));
    // 5 * 5 + 10
    assert_eq!(game.arbitrage_score, 35);
    assert_eq!(game.game_time, "2025-11-16T00:00");
    assert_eq!(game.away_team.as_str(), "Brooklyn Nets");
    assert!(game.base.url.is_some());
}

// ---------------------------------------------------------------------------
// Test 2: History accumulates across cycles and is bounded
// ---------------------------------------------------------------------------

#[test]
fn test_history_bounded_across_cycles() {
    let history = Arc::new(HistoryStore::new());
    let aggregator = ComparisonAggregator::new(Arc::clone(&history), MonitorConfig::default());

    for cycle in 0..(HISTORY_CAPACITY as i64 + 5) {
        let quotes = CycleQuotes {
            base: vec![poly_quote(nets_wizards(), dec!(0.40), dec!(0.60))],
            counterpart: vec![kalshi_quote(
                nets_wizards(),
                Decimal::from(40 + cycle % 7),
                Decimal::from(60 - cycle % 7),
            )],
            ..Default::default()
        };
        let report = aggregator.run_cycle_at(at(cycle), &quotes);
        let game = &report.comparisons[0];
        assert!(game.history.divergence.len() <= HISTORY_CAPACITY);
        assert_eq!(game.history.divergence.len(), game.history.timestamps.len());
    }

    let window = history.snapshot(&GameKey::new("BKN", "WAS")).unwrap();
    assert_eq!(window.len(), HISTORY_CAPACITY);
    // First five cycles evicted
    assert_eq!(window.timestamps().next(), Some(at(5)));
    assert_eq!(window.latest().map(|s| s.timestamp), Some(at(HISTORY_CAPACITY as i64 + 4)));
}

// ---------------------------------------------------------------------------
// Test 3: Widening divergence raises trend and score
// ---------------------------------------------------------------------------

#[test]
fn test_widening_divergence_trend() {
    let aggregator = aggregator();
    let mut scores = Vec::new();
    let mut last = None;

    // Counterpart drifts away from a steady base
    for cycle in 0..12 {
        let counterpart_away = if cycle < 5 { dec!(41) } else { dec!(45) };
        let quotes = CycleQuotes {
            base: vec![poly_quote(nets_wizards(), dec!(0.40), dec!(0.60))],
            counterpart: vec![kalshi_quote(nets_wizards(), counterpart_away, dec!(100) - counterpart_away)],
            ..Default::default()
        };
        let report = aggregator.run_cycle_at(at(cycle), &quotes);
        scores.push(report.comparisons[0].arbitrage_score);
        last = Some(report);
    }

    let game = &last.unwrap().comparisons[0];
    assert_eq!(game.trend.direction, TrendDirection::Increasing);
    assert_eq!(game.trend.value, dec!(2.4));
    assert_eq!(game.price_change.counterpart.away, dec!(4));
    assert_eq!(game.price_change.base.away, Decimal::ZERO);
    // 25 base + 20 trend (capped) + 0 volatility + 10 absolute
    assert_eq!(game.arbitrage_score, 55);
    assert!(scores.last() > scores.first());
}

// ---------------------------------------------------------------------------
// Test 4: Additional platforms and date grouping
// ---------------------------------------------------------------------------

#[test]
fn test_additional_platforms_and_grouping() {
    let aggregator = aggregator();

    let quotes = CycleQuotes {
        base: vec![
            poly_quote(nets_wizards(), dec!(0.40), dec!(0.60)).with_end_time("2025-11-16T00:00:00Z"),
            poly_quote(lakers_celtics(), dec!(0.35), dec!(0.65)).with_end_time("2025-11-17T02:30:00Z"),
        ],
        counterpart: vec![
            kalshi_quote(nets_wizards(), dec!(44), dec!(56)),
            kalshi_quote(lakers_celtics(), dec!(36), dec!(64)),
        ],
        sportsbook: vec![
            Quote::new(
                Platform::Sportsbooks,
                lakers_celtics(),
                ProbabilityPair { away: 33, home: 67 },
            )
            .with_bookmakers(["draftkings", "fanduel", "betmgm"]),
        ],
        community: vec![Quote::new(
            Platform::Manifold,
            nets_wizards(),
            ProbabilityPair { away: 42, home: 58 },
        )],
    };

    let report = aggregator.run_cycle_at(at(0), &quotes);
    let bkn = report.get(&GameKey::new("BKN", "WAS")).unwrap();
    assert!(bkn.sportsbook.is_none());
    assert_eq!(bkn.community.as_ref().map(|c| c.away), Some(42));

    let lal = report.get(&GameKey::new("LAL", "BOS")).unwrap();
    assert_eq!(lal.sportsbook.as_ref().map(|s| s.bookmakers.len()), Some(3));

    let today = NaiveDate::from_ymd_opt(2025, 11, 16).unwrap();
    let tomorrow = NaiveDate::from_ymd_opt(2025, 11, 17).unwrap();
    let groups = report.group_by_date(today, tomorrow);
    assert_eq!(groups.today.len(), 1);
    assert_eq!(groups.today[0].away_code.as_str(), "BKN");
    assert_eq!(groups.tomorrow.len(), 1);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["comparisons"][0]["trend"]["direction"], "stable");
}

// ---------------------------------------------------------------------------
// Test 5: Malformed quotes are dropped, not fatal
// ---------------------------------------------------------------------------

#[test]
fn test_malformed_quotes_dropped() {
    let base = retain_valid(
        Platform::Polymarket,
        vec![
            Quote::from_outcome_prices(
                Platform::Polymarket,
                nets_wizards(),
                &[OutcomePrice::new("BKN".into(), dec!(0.45))],
            ),
            Quote::from_outcome_prices(
                Platform::Polymarket,
                lakers_celtics(),
                &[
                    OutcomePrice::new("LAL".into(), dec!(0.45)),
                    OutcomePrice::new("BOS".into(), dec!(0.55)),
                ],
            ),
        ],
    );
    assert_eq!(base.len(), 1);

    let quotes = CycleQuotes {
        base,
        counterpart: vec![kalshi_quote(lakers_celtics(), dec!(45), dec!(55))],
        ..Default::default()
    };
    let report = aggregator().run_cycle_at(at(0), &quotes);
    assert_eq!(report.stats.matched, 1);
    assert_eq!(report.comparisons[0].divergence.max, Decimal::ZERO);
}

// ---------------------------------------------------------------------------
// Test 6: Fee-aware detector end to end
// ---------------------------------------------------------------------------

#[test]
fn test_detector_end_to_end() {
    let poly = vec![
        RawQuote::new(
            Platform::Polymarket,
            nets_wizards(),
            RawPricing::Mid {
                away: dec!(0.40),
                home: dec!(0.60),
            },
        ),
        RawQuote::new(
            Platform::Polymarket,
            lakers_celtics(),
            RawPricing::Mid {
                away: dec!(0.50),
                home: dec!(0.50),
            },
        ),
    ];
    let kalshi = vec![
        // Listed with teams reversed relative to Polymarket
        RawQuote::new(
            Platform::Kalshi,
            Matchup::new("WAS", "BKN", "Washington Wizards", "Brooklyn Nets"),
            RawPricing::Book {
                away: BookTop::new(dec!(53), dec!(55)),
                home: BookTop::new(dec!(45), dec!(47)),
            },
        ),
        RawQuote::new(
            Platform::Kalshi,
            lakers_celtics(),
            RawPricing::Book {
                away: BookTop::new(dec!(49), dec!(51)),
                home: BookTop::new(dec!(49), dec!(51)),
            },
        ),
    ];

    let detector = FeeAwareArbitrageDetector::default();
    let legs = detector.detect(&poly, &kalshi, dec!(0.5));

    assert_eq!(legs.len(), 1);
    let leg = &legs[0];
    assert_eq!(leg.game, GameKey::new("BKN", "WAS"));
    assert_eq!(leg.direction, LegDirection::BaseToCounterpart);
    assert_eq!(leg.side, Side::Away);
    assert_eq!(leg.team.as_str(), "Brooklyn Nets");
    assert_eq!(leg.cost, dec!(40.8));
    assert_eq!(leg.revenue, dec!(41.85));
    assert_eq!(leg.profit, dec!(1.05));
    assert_eq!(leg.profit_pct.round_dp(2), dec!(2.57));

    // Aggregator uses the configured 0.5% minimum
    let aggregator = aggregator();
    assert_eq!(aggregator.detect_arbitrage(&poly, &kalshi), legs);

    // Above the leg's profit percentage nothing survives
    assert!(detector.detect(&poly, &kalshi, dec!(3)).is_empty());
}
