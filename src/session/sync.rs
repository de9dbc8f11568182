//! Running an engine against a session store.
//!
//! `MatchSession` keeps two things apart:
//! - the *confirmed* board: the last state delivered by the store, which is
//!   what gets rendered
//! - the *proposed* board: a scratch copy of the engine that computes the
//!   next state, which is pushed and then thrown away
//!
//! The local view only changes through `sync`, so every participant converges
//! on whatever the store confirmed.

use std::sync::mpsc::{Receiver, TryRecvError};

use super::{SessionAdapter, SessionId};
use crate::cards::{build_deck_with_rng, FacePool};
use crate::core::{CardId, GameRng, Generation, MatchConfig, MatchError, MatchResult, PlayerId};
use crate::rules::{BoardState, MatchEngine, PendingReversion, ReversionOutcome, TickOutcome, Transition};

/// Seat whose session counts the shared clock.
pub const CLOCK_SEAT: PlayerId = PlayerId::new(0);

/// One participant's connection to a stored game.
pub struct MatchSession<A: SessionAdapter> {
    adapter: A,
    session: SessionId,
    player: PlayerId,
    confirmed: MatchEngine,
    updates: Receiver<BoardState>,
    rng: GameRng,
}

impl<A: SessionAdapter> MatchSession<A> {
    /// Deal a new game, store it and seat the caller as `player`.
    pub fn open(
        adapter: A,
        config: MatchConfig,
        pool: &impl FacePool,
        player: PlayerId,
    ) -> MatchResult<Self> {
        let mut rng = config.seed.map_or_else(GameRng::from_entropy, GameRng::new);
        let deck = build_deck_with_rng(&pool.face_ids(), config.pair_count(), &mut rng)?;
        let engine = MatchEngine::new(config, deck)?;

        let session = adapter.create_session(&engine.snapshot())?;
        let mut this = Self::attach(adapter, session, player, rng)?;
        this.sync()?;
        log::info!("{player} opened {session}");
        Ok(this)
    }

    /// Join an existing game as `player`.
    pub fn join(adapter: A, session: SessionId, player: PlayerId) -> MatchResult<Self> {
        let this = Self::attach(adapter, session, player, GameRng::from_entropy())?;
        log::info!("{player} joined {session}");
        Ok(this)
    }

    fn attach(adapter: A, session: SessionId, player: PlayerId, rng: GameRng) -> MatchResult<Self> {
        let updates = adapter.subscribe(session)?;
        let board = match updates.try_recv() {
            Ok(board) => board,
            Err(_) => adapter.fetch(session)?,
        };
        if !board.turn.scores.contains(player) {
            return Err(MatchError::invalid(format!(
                "{player} has no seat in {session}"
            )));
        }
        let confirmed = MatchEngine::from_board(board)?;

        Ok(Self {
            adapter,
            session,
            player,
            confirmed,
            updates,
            rng,
        })
    }

    #[must_use]
    pub fn session_id(&self) -> SessionId {
        self.session
    }

    #[must_use]
    pub fn player(&self) -> PlayerId {
        self.player
    }

    /// The confirmed view. Render from this.
    #[must_use]
    pub fn engine(&self) -> &MatchEngine {
        &self.confirmed
    }

    #[must_use]
    pub fn board(&self) -> BoardState {
        self.confirmed.snapshot()
    }

    /// Adopt every confirmed state delivered since the last call.
    ///
    /// Returns `true` if the local view changed. Fails with `UnknownSession`
    /// once the session has been deleted.
    pub fn sync(&mut self) -> MatchResult<bool> {
        let mut latest: Option<BoardState> = None;
        loop {
            match self.updates.try_recv() {
                Ok(board) => latest = Some(board),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if latest.is_some() {
                        break;
                    }
                    return Err(MatchError::UnknownSession(self.session));
                }
            }
        }

        match latest {
            Some(board) if board.revision > self.confirmed.revision()
                || board.generation > self.confirmed.generation() =>
            {
                self.confirmed.restore(board)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Pick a card as this session's player.
    ///
    /// Refused picks are returned without touching the store. Accepted picks
    /// are pushed; the view updates once the store confirms them.
    pub fn select(&mut self, card: CardId) -> MatchResult<Transition> {
        self.sync()?;
        let mut proposed = self.confirmed.clone();
        let transition = proposed.select_card(card, self.player);
        if transition.is_accepted() {
            self.propose(&proposed)?;
        }
        Ok(transition)
    }

    /// Flip a mismatched pair back after the delay.
    pub fn complete_reversion(&mut self, pending: &PendingReversion) -> MatchResult<ReversionOutcome> {
        self.sync()?;
        let mut proposed = self.confirmed.clone();
        let outcome = proposed.complete_reversion(pending);
        if outcome != ReversionOutcome::Stale {
            self.propose(&proposed)?;
        }
        Ok(outcome)
    }

    /// Count one second on the shared clock.
    ///
    /// Only the clock seat (seat 0, the player who opened the game) may
    /// tick; other seats follow the clock through `sync`. Ticks from any
    /// other seat fail with `InvalidConfiguration`.
    pub fn tick(&mut self, generation: Generation) -> MatchResult<TickOutcome> {
        if self.player != CLOCK_SEAT {
            return Err(MatchError::invalid(format!(
                "{} does not drive the clock in {}",
                self.player, self.session
            )));
        }
        self.sync()?;
        let mut proposed = self.confirmed.clone();
        let outcome = proposed.tick(generation);
        if !matches!(outcome, TickOutcome::Stale | TickOutcome::Finished) {
            self.propose(&proposed)?;
        }
        Ok(outcome)
    }

    /// Deal a fresh board into the same session.
    pub fn rematch(&mut self, pool: &impl FacePool) -> MatchResult<Generation> {
        self.sync()?;
        let deck = build_deck_with_rng(
            &pool.face_ids(),
            self.confirmed.config().pair_count(),
            &mut self.rng,
        )?;
        let mut proposed = self.confirmed.clone();
        let generation = proposed.new_game(deck)?;
        self.propose(&proposed)?;
        Ok(generation)
    }

    /// Leave without touching the stored game.
    pub fn leave(self) {
        log::info!("{} left {}", self.player, self.session);
    }

    /// Delete the stored game. Other participants' `sync` starts failing.
    pub fn close(self) -> MatchResult<()> {
        self.adapter.delete_session(self.session)?;
        log::info!("{} closed {}", self.player, self.session);
        Ok(())
    }

    fn propose(&mut self, proposed: &MatchEngine) -> MatchResult<()> {
        match self.adapter.push_state(self.session, &proposed.snapshot()) {
            Ok(_) => {
                self.sync()?;
                Ok(())
            }
            Err(err @ MatchError::StaleWrite { .. }) => {
                // Someone else moved first. Their state may not have been
                // delivered yet, so read it from the store.
                self.sync()?;
                let stored = self.adapter.fetch(self.session)?;
                if stored.revision > self.confirmed.revision() {
                    self.confirmed.restore(stored)?;
                }
                Err(err)
            }
            Err(err) => Err(err),
        }
    }
}
