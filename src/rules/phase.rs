//! Engine phase and the transient selection.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::CardId;

/// Where the engine is in the flip/compare cycle.
///
/// ```text
/// Idle --flip--> OneSelected --flip--> Resolving --match/revert--> Idle
///   \                                      |
///    +------------- Won <------------------+      (all cards matched)
///    any non-terminal phase --clock zero--> TimedOut
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// No face-up unmatched cards.
    #[default]
    Idle,
    /// One face-up card waiting for its partner.
    OneSelected,
    /// Two face-up cards being compared; input is locked.
    Resolving,
    /// Every card matched.
    Won,
    /// The countdown reached zero first.
    TimedOut,
}

impl Phase {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Phase::Won | Phase::TimedOut)
    }

    /// Can a card be picked right now?
    #[must_use]
    pub const fn accepts_input(self) -> bool {
        matches!(self, Phase::Idle | Phase::OneSelected)
    }
}

/// Up to two cards picked this turn. Cleared after every resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    pub first: Option<CardId>,
    pub second: Option<CardId>,
}

impl Selection {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.first.is_none() && self.second.is_none()
    }

    #[must_use]
    pub fn contains(&self, card: CardId) -> bool {
        self.first == Some(card) || self.second == Some(card)
    }

    /// Both picks, once the second one is in.
    #[must_use]
    pub fn pair(&self) -> Option<[CardId; 2]> {
        Some([self.first?, self.second?])
    }

    /// Selected ids in pick order.
    #[must_use]
    pub fn cards(&self) -> SmallVec<[CardId; 2]> {
        self.first.into_iter().chain(self.second).collect()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
