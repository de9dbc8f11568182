//! # magic-match
//!
//! Turn-resolution engine for Magic Match, a memory card game with solo and
//! realtime versus modes.
//!
//! ## Design Principles
//!
//! 1. **Explicit state**: every card carries its own `CardState`; the engine
//!    never infers a flip from comparing values.
//!
//! 2. **Values, not exceptions**: refused input (double clicks, wrong turn,
//!    clicks after the end) comes back as a `Rejection`. Only configuration
//!    and store failures are errors.
//!
//! 3. **No hidden clocks**: the engine never sleeps. Delays and ticks are
//!    driven by the host and tagged with a `Generation`, so callbacks that
//!    outlive their deal are dropped.
//!
//! 4. **Store is the truth**: in versus play the engine proposes, the
//!    session store confirms, and the view follows the confirmations.
//!
//! ## Modules
//!
//! - `core`: ids, players, RNG, configuration, errors
//! - `cards`: faces, cards, the deck and the deck builder
//! - `rules`: the match engine, clock and outcomes
//! - `session`: session store boundary, in-memory store, synced sessions
//! - `stats`: win/loss records and personal bests

pub mod core;
pub mod cards;
pub mod rules;
pub mod session;
pub mod stats;

// Re-export commonly used types
pub use crate::core::{
    CardId, Difficulty, GameRng, Generation, MatchConfig, MatchError, MatchResult, PlayMode,
    PlayerId, PlayerMap,
};

pub use crate::cards::{
    build_deck, build_deck_with_rng, Card, CardState, Deck, Face, FaceId, FacePool, StaticFacePool,
};

pub use crate::rules::{
    BoardState, Clock, Ending, GameResult, GameSummary, MatchEngine, PendingReversion, Phase,
    Rejection, ReversionOutcome, Selection, TickOutcome, Transition, TurnState,
};

pub use crate::session::{MatchSession, MemoryAdapter, SessionAdapter, SessionId};

pub use crate::stats::{Best, PersonalBests, PlayerRecord, PlayerStats};
