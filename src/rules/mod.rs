//! Game rules: the match engine and everything it reports.
//!
//! `MatchEngine` is a pure, synchronous state machine. It never sleeps,
//! never talks to a store and never reads a clock; the host feeds it
//! selections, reversions and ticks and renders what it reports.

pub mod board;
pub mod clock;
pub mod engine;
pub mod outcome;
pub mod phase;
pub mod turn;

pub use board::BoardState;
pub use clock::Clock;
pub use engine::MatchEngine;
pub use outcome::{
    Ending, GameResult, GameSummary, PendingReversion, Rejection, ReversionOutcome, TickOutcome,
    Transition,
};
pub use phase::{Phase, Selection};
pub use turn::TurnState;
