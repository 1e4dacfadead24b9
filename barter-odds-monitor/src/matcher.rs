//! Cross-platform game matching by team code identity.
//!
//! Team codes must already be resolved to a shared vocabulary by the fetch
//! layer. Games are few per refresh cycle (tens), so matching is a plain
//! O(n·m) scan.

use crate::{
    game::GameKey,
    quote::{Quote, RawQuote},
};
use indexmap::IndexMap;

/// Anything that identifies a game by [`GameKey`].
pub trait Keyed {
    fn game_key(&self) -> &GameKey;
}

impl Keyed for Quote {
    fn game_key(&self) -> &GameKey {
        self.key()
    }
}

impl Keyed for RawQuote {
    fn game_key(&self) -> &GameKey {
        self.key()
    }
}

/// A base quote and the counterpart quoting the same game, for one cycle.
#[derive(Debug)]
pub struct MatchedPair<'a, T> {
    pub base: &'a T,
    pub counterpart: &'a T,
}

impl<T> Clone for MatchedPair<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for MatchedPair<'_, T> {}

impl<T: Keyed> MatchedPair<'_, T> {
    pub fn key(&self) -> &GameKey {
        self.base.game_key()
    }
}

/// A matched pair where the counterpart may list the teams the other way round.
#[derive(Debug)]
pub struct OrientedPair<'a, T> {
    pub base: &'a T,
    pub counterpart: &'a T,
    /// True when the counterpart's away team is the base's home team
    pub reversed: bool,
}

/// Pairs quotes for the same event across platforms.
pub struct GameMatcher;

impl GameMatcher {
    /// For each base quote, the first `other` quote with the identical ordered
    /// (away, home) codes. Base quotes without a counterpart are dropped.
    pub fn match_pairs<'a, T: Keyed>(base: &'a [T], other: &'a [T]) -> Vec<MatchedPair<'a, T>> {
        base.iter()
            .filter_map(|base| {
                other
                    .iter()
                    .find(|candidate| candidate.game_key() == base.game_key())
                    .map(|counterpart| MatchedPair { base, counterpart })
            })
            .collect()
    }

    /// Map zero-or-one `extra` quote onto every base game.
    ///
    /// The result holds an entry for every base key, in base order: `None`
    /// means the game was evaluated and the extra platform does not list it.
    pub fn match_additional<'b, 'e, B, E>(
        base: impl IntoIterator<Item = &'b B>,
        extra: &'e [E],
    ) -> IndexMap<GameKey, Option<&'e E>>
    where
        B: Keyed + 'b,
        E: Keyed,
    {
        base.into_iter()
            .map(|base| {
                let key = base.game_key();
                let found = extra.iter().find(|candidate| candidate.game_key() == key);
                (key.clone(), found)
            })
            .collect()
    }

    /// Match on the unordered team pair, preferring an identical orientation.
    ///
    /// Used where sides can be realigned by team code, such as raw price
    /// comparisons between venues that disagree on which team is home.
    pub fn match_oriented<'a, T: Keyed>(
        base: &'a [T],
        other: &'a [T],
    ) -> Vec<OrientedPair<'a, T>> {
        base.iter()
            .filter_map(|base| {
                let key = base.game_key();
                let exact = other
                    .iter()
                    .find(|candidate| candidate.game_key() == key)
                    .map(|counterpart| (counterpart, false));

                exact
                    .or_else(|| {
                        let reversed = key.reversed();
                        other
                            .iter()
                            .find(|candidate| candidate.game_key() == &reversed)
                            .map(|counterpart| (counterpart, true))
                    })
                    .map(|(counterpart, reversed)| OrientedPair {
                        base,
                        counterpart,
                        reversed,
                    })
            })
            .collect()
    }
}
