//! Card identification.
//!
//! Every card on the board has a `CardId` that is unique within one deal.
//! Ids are drawn from the game RNG rather than allocated sequentially, so
//! a fresh deal never reuses the ids of the previous one and an id never
//! reveals where its twin sits.
//!
//! ```
//! use magic_match::core::CardId;
//!
//! let card = CardId::new(0x2a);
//! assert_eq!(card.raw(), 42);
//! assert_eq!(format!("{}", card), "Card(000000000000002a)");
//! ```

use serde::{Deserialize, Serialize};

/// Unique identifier for a card position within one deal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(pub u64);

impl CardId {
    /// Create a card ID from a raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl From<u64> for CardId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({:016x})", self.0)
    }
}

/// Deck epoch.
///
/// Bumped every time the deck is replaced (new game, rematch). Delayed
/// callbacks carry the generation they were scheduled in and are dropped
/// when it no longer matches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Generation(pub u64);

impl Generation {
    /// The generation after this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Gen({})", self.0)
    }
}
