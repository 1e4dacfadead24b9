//! Bounded per-game divergence history.
//!
//! Each game keeps the last [`HISTORY_CAPACITY`] observations: 30 minutes at
//! a 30 second refresh cadence. The store lives for the whole process and is
//! injected into the comparison pipeline.

use crate::{game::GameKey, quote::ProbabilityPair};
use chrono::{DateTime, Utc};
use fnv::FnvHashMap;
use parking_lot::RwLock;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Maximum samples retained per game. Oldest samples are evicted first.
pub const HISTORY_CAPACITY: usize = 60;

/// One observation of a matched game.
#[derive(Clone, PartialEq, Debug, Deserialize, Serialize)]
pub struct HistorySample {
    /// Larger of the two per-side probability differences
    pub divergence: Decimal,
    /// Base platform probabilities
    pub base: ProbabilityPair,
    /// Counterpart platform probabilities
    pub counterpart: ProbabilityPair,
    pub timestamp: DateTime<Utc>,
}

/// Read view of one game's history, oldest sample first.
///
/// The divergence, base, counterpart and timestamp sequences are stored as one
/// sample per observation, so their lengths are always equal.
#[derive(Clone, PartialEq, Debug, Default, Deserialize, Serialize)]
pub struct HistoryWindow {
    samples: VecDeque<HistorySample>,
}

impl HistoryWindow {
    fn push(&mut self, sample: HistorySample) {
        if self.samples.len() == HISTORY_CAPACITY {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    /// Number of samples recorded (at most [`HISTORY_CAPACITY`]).
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// All samples, oldest first.
    pub fn samples(&self) -> impl DoubleEndedIterator<Item = &HistorySample> + ExactSizeIterator {
        self.samples.iter()
    }

    /// The most recent sample.
    pub fn latest(&self) -> Option<&HistorySample> {
        self.samples.back()
    }

    /// Sample `n` positions from the end, where `1` is the latest.
    pub fn nth_from_end(&self, n: usize) -> Option<&HistorySample> {
        self.samples
            .len()
            .checked_sub(n)
            .and_then(|index| self.samples.get(index))
    }

    pub fn divergences(&self) -> impl DoubleEndedIterator<Item = Decimal> + ExactSizeIterator + '_ {
        self.samples.iter().map(|sample| sample.divergence)
    }

    pub fn base_probabilities(
        &self,
    ) -> impl DoubleEndedIterator<Item = ProbabilityPair> + ExactSizeIterator + '_ {
        self.samples.iter().map(|sample| sample.base)
    }

    pub fn counterpart_probabilities(
        &self,
    ) -> impl DoubleEndedIterator<Item = ProbabilityPair> + ExactSizeIterator + '_ {
        self.samples.iter().map(|sample| sample.counterpart)
    }

    pub fn timestamps(&self) -> impl DoubleEndedIterator<Item = DateTime<Utc>> + ExactSizeIterator + '_ {
        self.samples.iter().map(|sample| sample.timestamp)
    }
}

/// Process-wide history of every observed game.
///
/// Windows are created lazily on the first [`record`](Self::record) for a key
/// and are never removed. `record` is the only way to append.
#[derive(Debug, Default)]
pub struct HistoryStore {
    windows: RwLock<FnvHashMap<GameKey, HistoryWindow>>,
}

impl HistoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one observation for `game_key`, evicting the oldest sample once
    /// the window is full.
    ///
    /// Returns the updated window, copied under the same write lock so no
    /// concurrent sample can land between the append and the read.
    pub fn record(
        &self,
        game_key: &GameKey,
        divergence: Decimal,
        base: ProbabilityPair,
        counterpart: ProbabilityPair,
        timestamp: DateTime<Utc>,
    ) -> HistoryWindow {
        let sample = HistorySample {
            divergence,
            base,
            counterpart,
            timestamp,
        };

        let mut windows = self.windows.write();
        let window = windows.entry(game_key.clone()).or_default();
        window.push(sample);
        window.clone()
    }

    /// Copy of the current window for `game_key`, including every sample
    /// recorded so far.
    pub fn snapshot(&self, game_key: &GameKey) -> Option<HistoryWindow> {
        self.windows.read().get(game_key).cloned()
    }

    /// Number of games with history.
    pub fn len(&self) -> usize {
        self.windows.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.read().is_empty()
    }

    /// Keys of every game with history, in no particular order.
    pub fn game_keys(&self) -> Vec<GameKey> {
        self.windows.read().keys().cloned().collect()
    }
}
