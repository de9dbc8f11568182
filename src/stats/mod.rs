//! Player statistics kept across games.
//!
//! - `PlayerRecord`: versus wins, losses and draws
//! - `PersonalBests`: best solo result per difficulty, timed and untimed
//! - `PlayerStats`: both, updated from a finished game's `GameSummary`
//!
//! Storage and display belong to the host; these are plain serializable
//! values.

mod record;

pub use record::{Best, PersonalBests, PlayerRecord, PlayerStats};
