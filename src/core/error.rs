//! Error taxonomy.
//!
//! Only genuine failures live here. Routine input the engine refuses during
//! play (double clicks, wrong turn, clicks after the game ended) is reported
//! as a [`Rejection`](crate::rules::Rejection) value, never as an error.

use thiserror::Error;

use crate::session::SessionId;

/// Failures surfaced by the deck builder, the engine setup and the session
/// adapter boundary.
#[derive(Debug, Error)]
pub enum MatchError {
    /// Bad difficulty, pair count or player setup. Not retryable.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The session store could not be reached. Retry policy belongs to the
    /// caller.
    #[error("session adapter unavailable: {0}")]
    AdapterUnavailable(String),

    #[error("{0} not found")]
    UnknownSession(SessionId),

    /// A proposal was computed from an older revision than the stored one.
    #[error("stale write: stored revision is {expected}, proposal was based on {found}")]
    StaleWrite { expected: u64, found: u64 },

    #[error("encoding error: {0}")]
    Encoding(#[from] bincode::Error),
}

impl MatchError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::AdapterUnavailable(msg.into())
    }

    /// Could retrying the same call later succeed?
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::AdapterUnavailable(_) | Self::StaleWrite { .. })
    }
}

/// Result alias used across the crate.
pub type MatchResult<T> = Result<T, MatchError>;
