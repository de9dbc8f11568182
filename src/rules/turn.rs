//! Turn and score bookkeeping.

use serde::{Deserialize, Serialize};

use crate::core::{PlayerId, PlayerMap};

/// Turns, scores and whose turn it is.
///
/// `turns_taken` counts resolved pairs (matches and mismatches) in every
/// mode; solo games report it as their score. `scores` counts matches per
/// seat; a solo game has a single seat.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TurnState {
    pub turns_taken: u32,
    pub scores: PlayerMap<u32>,
    pub active_player: PlayerId,
    pub completed: bool,
}

impl TurnState {
    #[must_use]
    pub fn new(player_count: usize) -> Self {
        Self {
            turns_taken: 0,
            scores: PlayerMap::with_value(player_count, 0),
            active_player: PlayerId::new(0),
            completed: false,
        }
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.scores.player_count()
    }

    #[must_use]
    pub fn score(&self, player: PlayerId) -> u32 {
        self.scores.get(player).copied().unwrap_or(0)
    }

    /// Credit a match to the active player. The turn stays with them.
    pub(crate) fn record_match(&mut self) {
        self.turns_taken += 1;
        if let Some(score) = self.scores.get_mut(self.active_player) {
            *score += 1;
        }
    }

    /// Count a mismatch and hand the turn to the next seat.
    pub(crate) fn record_miss(&mut self) {
        self.turns_taken += 1;
        self.active_player = self.active_player.next(self.player_count());
    }
}
