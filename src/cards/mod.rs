//! Cards, faces and the deck builder.
//!
//! ## Key Types
//!
//! - `FaceId` / `Face`: the artwork two cards share
//! - `FacePool`: where the deck builder gets faces from
//! - `Card` / `CardState`: one board position and its explicit flip state
//! - `Deck`: the ordered board of one deal
//!
//! `build_deck` deals a fresh board; see its docs for the dealing rules.

pub mod card;
pub mod deck;
pub mod face;

pub use card::{Card, CardState};
pub use deck::{build_deck, build_deck_with_rng, Deck};
pub use face::{Face, FaceId, FacePool, StaticFacePool};
