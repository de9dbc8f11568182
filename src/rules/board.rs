//! Serializable board state.
//!
//! `BoardState` is everything needed to rebuild an engine: what gets pushed
//! to a session store and what comes back from its subscription. Taking one
//! is cheap because the deck is a persistent vector.

use serde::{Deserialize, Serialize};

use super::clock::Clock;
use super::phase::{Phase, Selection};
use super::turn::TurnState;
use crate::cards::Deck;
use crate::core::{Generation, MatchConfig, PlayerId};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardState {
    pub config: MatchConfig,
    pub generation: Generation,
    /// Store revision this state was read at, or was computed from when it
    /// is a proposal.
    pub revision: u64,
    pub deck: Deck,
    pub selection: Selection,
    pub phase: Phase,
    pub turn: TurnState,
    pub clock: Clock,
}

impl BoardState {
    #[must_use]
    pub fn active_player(&self) -> PlayerId {
        self.turn.active_player
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase.is_terminal()
    }
}
