//! Session store boundary.
//!
//! A session is one game room whose board lives in an external store. The
//! store is the source of truth once more than one participant is involved;
//! the local engine only computes the *next* state and proposes it.
//!
//! ## Flow
//!
//! ```text
//! MatchSession --push_state(proposal)--> SessionAdapter
//!      ^                                       |
//!      +-------- subscribe() channel ----------+   (confirmed states)
//! ```
//!
//! Proposals carry the revision they were computed from. A store must reject
//! a proposal whose base revision is no longer current (`StaleWrite`), so two
//! players acting at once cannot silently overwrite each other.

pub mod memory;
pub mod sync;

pub use memory::MemoryAdapter;
pub use sync::{MatchSession, CLOCK_SEAT};

use serde::{Deserialize, Serialize};
use std::sync::mpsc::Receiver;

use crate::core::MatchResult;
use crate::rules::BoardState;

/// Identifier of a stored session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub u64);

impl SessionId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Session({})", self.0)
    }
}

/// Persistence and realtime delivery for sessions.
///
/// Implementations surface failures as `MatchError::AdapterUnavailable` and
/// never retry on the caller's behalf.
pub trait SessionAdapter {
    /// Store the first board of a new session. Its revision becomes 0.
    fn create_session(&self, initial: &BoardState) -> MatchResult<SessionId>;

    /// Store a proposed next state and return the revision it was stored at.
    ///
    /// Fails with `StaleWrite` unless `proposal.revision` is the stored
    /// revision.
    fn push_state(&self, session: SessionId, proposal: &BoardState) -> MatchResult<u64>;

    /// Read the current confirmed state.
    fn fetch(&self, session: SessionId) -> MatchResult<BoardState>;

    /// Receive every confirmed state from now on, starting with the current
    /// one. The channel closes when the session is deleted.
    fn subscribe(&self, session: SessionId) -> MatchResult<Receiver<BoardState>>;

    fn delete_session(&self, session: SessionId) -> MatchResult<()>;
}
