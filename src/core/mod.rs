//! Core types: card and player ids, RNG, configuration, errors.
//!
//! Everything else in the crate builds on these. None of them know about
//! game rules.

pub mod entity;
pub mod player;
pub mod rng;
pub mod config;
pub mod error;

pub use entity::{CardId, Generation};
pub use player::{PlayerId, PlayerMap};
pub use rng::GameRng;
pub use config::{Difficulty, MatchConfig, PlayMode, DEFAULT_MISMATCH_DELAY_MS};
pub use error::{MatchError, MatchResult};
