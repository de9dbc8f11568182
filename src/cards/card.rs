//! Cards on the board.
//!
//! A `Card` is one board position: its id, the face it shows when turned,
//! and its explicit `CardState`. Flip state is always read from `state`;
//! nothing is inferred from comparing card values.

use serde::{Deserialize, Serialize};

use super::face::FaceId;
use crate::core::CardId;

/// Visible state of a card.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardState {
    #[default]
    FaceDown,
    FaceUp,
    /// Paired. Never leaves this state within a deal.
    Matched,
}

impl CardState {
    /// Should the face be rendered?
    #[must_use]
    pub const fn is_revealed(self) -> bool {
        matches!(self, CardState::FaceUp | CardState::Matched)
    }
}

/// A card in a deck.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub face: FaceId,
    pub state: CardState,
}

impl Card {
    /// A face-down card.
    #[must_use]
    pub fn new(id: CardId, face: FaceId) -> Self {
        Self {
            id,
            face,
            state: CardState::FaceDown,
        }
    }

    #[must_use]
    pub fn is_face_down(&self) -> bool {
        self.state == CardState::FaceDown
    }

    #[must_use]
    pub fn is_matched(&self) -> bool {
        self.state == CardState::Matched
    }

    /// Do two cards form a pair?
    #[must_use]
    pub fn pairs_with(&self, other: &Card) -> bool {
        self.id != other.id && self.face == other.face
    }
}
