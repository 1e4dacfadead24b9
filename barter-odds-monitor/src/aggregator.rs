//! Refresh cycle orchestration.
//!
//! One cycle: match base against counterpart quotes, merge optional additional
//! platforms, record history for every matched game, derive analytics, score
//! and sort. History is shared across cycles through an injected
//! [`HistoryStore`].

use crate::{
    comparison::{self, Comparison, ComparisonReport, ComparisonStats, Divergence, HistorySlice, PlatformSection},
    config::MonitorConfig,
    detector::FeeAwareArbitrageDetector,
    game::GameKey,
    history::HistoryStore,
    matcher::{GameMatcher, MatchedPair},
    opportunity::ArbitrageLeg,
    quote::{Quote, RawQuote},
    score::ArbitrageScorer,
    trend::{Trend, TrendAnalyzer},
};
use chrono::{DateTime, Utc};
use fnv::FnvHashSet;
use indexmap::IndexMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Quotes fetched from every platform for one refresh cycle.
///
/// A platform that failed to fetch is an empty list.
#[derive(Debug, Clone, Default)]
pub struct CycleQuotes {
    pub base: Vec<Quote>,
    pub counterpart: Vec<Quote>,
    pub sportsbook: Vec<Quote>,
    pub community: Vec<Quote>,
}

/// Runs refresh cycles against a shared history.
#[derive(Debug, Clone)]
pub struct ComparisonAggregator {
    history: Arc<HistoryStore>,
    config: MonitorConfig,
    detector: FeeAwareArbitrageDetector,
}

impl ComparisonAggregator {
    pub fn new(history: Arc<HistoryStore>, config: MonitorConfig) -> Self {
        let detector = FeeAwareArbitrageDetector::new(config.detector);
        Self {
            history,
            config,
            detector,
        }
    }

    pub fn history(&self) -> &Arc<HistoryStore> {
        &self.history
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Run a cycle stamped with the current time.
    pub fn run_cycle(&self, quotes: &CycleQuotes) -> ComparisonReport {
        self.run_cycle_at(Utc::now(), quotes)
    }

    /// Run a cycle stamped with `now`.
    ///
    /// Every matched game gets exactly one history sample per cycle, even if
    /// the base platform lists it twice.
    pub fn run_cycle_at(&self, now: DateTime<Utc>, quotes: &CycleQuotes) -> ComparisonReport {
        let pairs = GameMatcher::match_pairs(&quotes.base, &quotes.counterpart);

        let sportsbook = Self::additional(&pairs, &quotes.sportsbook, self.config.platforms.sportsbook);
        let community = Self::additional(&pairs, &quotes.community, self.config.platforms.community);

        let mut seen = FnvHashSet::default();
        let mut comparisons = Vec::with_capacity(pairs.len());

        for pair in &pairs {
            if !seen.insert(pair.key().clone()) {
                debug!(game = %pair.key(), "Skipping duplicate game in cycle");
                continue;
            }

            let comparison = self.compare(
                now,
                *pair,
                sportsbook.get(pair.key()).copied().flatten(),
                community.get(pair.key()).copied().flatten(),
            );
            comparisons.push(comparison);
        }

        comparisons.sort_by(|a, b| {
            (b.arbitrage_score, b.divergence.max).cmp(&(a.arbitrage_score, a.divergence.max))
        });

        let stats = ComparisonStats {
            base_total: quotes.base.len(),
            counterpart_total: quotes.counterpart.len(),
            matched: pairs.len(),
            total_games: comparisons.len(),
        };

        info!(
            base = stats.base_total,
            counterpart = stats.counterpart_total,
            matched = stats.matched,
            games = stats.total_games,
            tracked = self.history.len(),
            "Comparison cycle complete"
        );

        ComparisonReport {
            timestamp: now,
            stats,
            comparisons,
        }
    }

    /// Fee-aware arbitrage legs between raw quotes, using the configured
    /// venues and minimum profit.
    pub fn detect_arbitrage(&self, base: &[RawQuote], counterpart: &[RawQuote]) -> Vec<ArbitrageLeg> {
        self.detector.scan(base, counterpart)
    }

    fn additional<'a>(
        pairs: &[MatchedPair<'_, Quote>],
        extra: &'a [Quote],
        enabled: bool,
    ) -> IndexMap<GameKey, Option<&'a Quote>> {
        if !enabled || extra.is_empty() {
            return IndexMap::new();
        }
        GameMatcher::match_additional(pairs.iter().map(|pair| pair.base), extra)
    }

    fn compare(
        &self,
        now: DateTime<Utc>,
        pair: MatchedPair<'_, Quote>,
        sportsbook: Option<&Quote>,
        community: Option<&Quote>,
    ) -> Comparison {
        let MatchedPair { base, counterpart } = pair;
        let key = pair.key();

        let divergence = Divergence::between(&base.probability, &counterpart.probability);
        let window = self
            .history
            .record(key, divergence.max, base.probability, counterpart.probability, now);

        let analysis = TrendAnalyzer::analyze(&window);
        let score = ArbitrageScorer::score_analysis(divergence.max, &analysis);

        debug!(
            game = %key,
            divergence = %divergence.max,
            trend = %analysis.trend.direction,
            samples = analysis.samples,
            score,
            "Game compared"
        );

        Comparison {
            away_code: key.away.clone(),
            home_code: key.home.clone(),
            away_team: base.matchup.away_team.clone(),
            home_team: base.matchup.home_team.clone(),
            base: PlatformSection::from(base),
            counterpart: PlatformSection::from(counterpart),
            sportsbook: sportsbook.map(PlatformSection::from),
            community: community.map(PlatformSection::from),
            divergence,
            trend: Trend {
                direction: analysis.trend.direction,
                value: analysis.trend.value.round_dp(1),
            },
            price_change: analysis.price_change,
            volatility: analysis.volatility,
            arbitrage_score: score,
            game_time: comparison::game_time(base.end_time.as_deref()),
            history: HistorySlice::from(&window),
        }
    }
}
