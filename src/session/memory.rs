//! In-process session store.
//!
//! Used for local play and tests. Boards are stored bincode-encoded, so
//! every read and every delivery is a fresh decode: nothing a caller holds
//! ever aliases the stored record.
//!
//! Cloning a `MemoryAdapter` yields another handle to the same store.

use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use super::{SessionAdapter, SessionId};
use crate::core::{MatchError, MatchResult};
use crate::rules::BoardState;

struct StoredSession {
    revision: u64,
    encoded: Vec<u8>,
    subscribers: Vec<Sender<BoardState>>,
}

impl StoredSession {
    fn decode(&self) -> MatchResult<BoardState> {
        let mut board: BoardState = bincode::deserialize(&self.encoded)?;
        board.revision = self.revision;
        Ok(board)
    }

    /// Deliver the stored board to every live subscriber, dropping closed
    /// channels.
    fn broadcast(&mut self) -> MatchResult<()> {
        let board = self.decode()?;
        self.subscribers.retain(|tx| tx.send(board.clone()).is_ok());
        Ok(())
    }
}

#[derive(Clone)]
pub struct MemoryAdapter {
    sessions: Arc<DashMap<SessionId, StoredSession>>,
    next_id: Arc<AtomicU64>,
    available: Arc<AtomicBool>,
}

impl Default for MemoryAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryAdapter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            next_id: Arc::new(AtomicU64::new(1)),
            available: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Simulate losing or regaining the connection to the store.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    #[must_use]
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    fn ensure_available(&self) -> MatchResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            log::warn!("session store offline");
            Err(MatchError::unavailable("in-memory store is offline"))
        }
    }
}

impl SessionAdapter for MemoryAdapter {
    fn create_session(&self, initial: &BoardState) -> MatchResult<SessionId> {
        self.ensure_available()?;

        let id = SessionId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        let mut board = initial.clone();
        board.revision = 0;
        let stored = StoredSession {
            revision: 0,
            encoded: bincode::serialize(&board)?,
            subscribers: Vec::new(),
        };
        self.sessions.insert(id, stored);

        log::debug!("created {id}");
        Ok(id)
    }

    fn push_state(&self, session: SessionId, proposal: &BoardState) -> MatchResult<u64> {
        self.ensure_available()?;

        let mut stored = self
            .sessions
            .get_mut(&session)
            .ok_or(MatchError::UnknownSession(session))?;

        if proposal.revision != stored.revision {
            log::warn!(
                "{session}: rejecting proposal based on revision {} (stored {})",
                proposal.revision,
                stored.revision
            );
            return Err(MatchError::StaleWrite {
                expected: stored.revision,
                found: proposal.revision,
            });
        }

        let revision = stored.revision + 1;
        let mut board = proposal.clone();
        board.revision = revision;
        stored.encoded = bincode::serialize(&board)?;
        stored.revision = revision;
        stored.broadcast()?;

        log::debug!("{session}: stored revision {revision}");
        Ok(revision)
    }

    fn fetch(&self, session: SessionId) -> MatchResult<BoardState> {
        self.ensure_available()?;

        self.sessions
            .get(&session)
            .ok_or(MatchError::UnknownSession(session))?
            .decode()
    }

    fn subscribe(&self, session: SessionId) -> MatchResult<Receiver<BoardState>> {
        self.ensure_available()?;

        let mut stored = self
            .sessions
            .get_mut(&session)
            .ok_or(MatchError::UnknownSession(session))?;

        let (tx, rx) = mpsc::channel();
        // The receiver is still in scope, so this send cannot fail.
        let _ = tx.send(stored.decode()?);
        stored.subscribers.push(tx);
        Ok(rx)
    }

    fn delete_session(&self, session: SessionId) -> MatchResult<()> {
        self.ensure_available()?;

        self.sessions
            .remove(&session)
            .map(|_| log::debug!("deleted {session}"))
            .ok_or(MatchError::UnknownSession(session))
    }
}
