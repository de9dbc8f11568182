//! The match engine.
//!
//! Owns the deck and the selection for one game and runs the
//! flip/compare/resolve/win cycle:
//! - `select_card`: flip a card, and compare when it is the second one
//! - `complete_reversion`: flip a mismatched pair back after the delay
//! - `tick`: advance the clock, once per second
//!
//! The engine is synchronous and never sleeps. The mismatch delay is the
//! host's job: it receives a `PendingReversion`, waits, and hands it back.
//! Every delayed call carries the generation it was issued in, so a call
//! that outlives its deal is dropped instead of touching the new board.

use super::board::BoardState;
use super::clock::Clock;
use super::outcome::{
    Ending, GameResult, GameSummary, PendingReversion, Rejection, ReversionOutcome, TickOutcome,
    Transition,
};
use super::phase::{Phase, Selection};
use super::turn::TurnState;
use crate::cards::{build_deck_with_rng, CardState, Deck, FacePool};
use crate::core::{CardId, GameRng, Generation, MatchConfig, MatchError, MatchResult, PlayerId};

/// Turn-resolution state machine for one board.
///
/// ## Example
///
/// ```
/// use magic_match::cards::StaticFacePool;
/// use magic_match::core::{Difficulty, MatchConfig, PlayerId};
/// use magic_match::rules::{MatchEngine, Phase, Transition};
///
/// let pool = StaticFacePool::numbered(12, "back.png");
/// let config = MatchConfig::new(Difficulty::Easy).with_seed(7);
/// let mut engine = MatchEngine::deal(config, &pool).unwrap();
///
/// let first = engine.deck().iter().next().unwrap().id;
/// let t = engine.select_card(first, PlayerId::new(0));
/// assert_eq!(t, Transition::Flipped(first));
/// assert_eq!(engine.phase(), Phase::OneSelected);
/// ```
#[derive(Clone, Debug)]
pub struct MatchEngine {
    config: MatchConfig,
    deck: Deck,
    selection: Selection,
    phase: Phase,
    turn: TurnState,
    clock: Clock,
    generation: Generation,
    revision: u64,
}

impl MatchEngine {
    /// Start a game on an existing deck.
    pub fn new(config: MatchConfig, deck: Deck) -> MatchResult<Self> {
        config.validate()?;
        check_deck(&deck)?;

        let turn = TurnState::new(config.player_count());
        let clock = Clock::new(config.time_budget());
        log::info!(
            "new {} game: {} pairs, {} player(s), timer {}",
            config.difficulty,
            deck.pair_count(),
            config.player_count(),
            if config.timer_enabled { "on" } else { "off" }
        );

        Ok(Self {
            config,
            deck,
            selection: Selection::default(),
            phase: Phase::Idle,
            turn,
            clock,
            generation: Generation::default(),
            revision: 0,
        })
    }

    /// Deal a deck for the configured difficulty and start a game on it.
    pub fn deal(config: MatchConfig, pool: &impl FacePool) -> MatchResult<Self> {
        let mut rng = config.seed.map_or_else(GameRng::from_entropy, GameRng::new);
        let deck = build_deck_with_rng(&pool.face_ids(), config.pair_count(), &mut rng)?;
        Self::new(config, deck)
    }

    /// Rebuild an engine from a stored board.
    pub fn from_board(board: BoardState) -> MatchResult<Self> {
        check_board(&board)?;
        log::debug!("rebuilt engine at {} revision {}", board.generation, board.revision);

        Ok(Self {
            config: board.config,
            deck: board.deck,
            selection: board.selection,
            phase: board.phase,
            turn: board.turn,
            clock: board.clock,
            generation: board.generation,
            revision: board.revision,
        })
    }

    /// Replace the deck (new game or rematch) and reset turns and clock.
    ///
    /// Bumps the generation, which invalidates every pending reversion and
    /// tick issued for the old deck.
    pub fn new_game(&mut self, deck: Deck) -> MatchResult<Generation> {
        check_deck(&deck)?;

        self.deck = deck;
        self.selection.clear();
        self.phase = Phase::Idle;
        self.turn = TurnState::new(self.config.player_count());
        self.clock = Clock::new(self.config.time_budget());
        self.generation = self.generation.next();

        log::info!("rematch: {} pairs, {}", self.deck.pair_count(), self.generation);
        Ok(self.generation)
    }

    // === Accessors ===

    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    #[must_use]
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    #[must_use]
    pub fn selection(&self) -> Selection {
        self.selection
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn turn(&self) -> &TurnState {
        &self.turn
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    #[must_use]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Store revision this engine's state was last confirmed at.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    #[must_use]
    pub fn active_player(&self) -> PlayerId {
        self.turn.active_player
    }

    // === Play ===

    /// Flip a card for `actor`.
    ///
    /// Refusals leave the board untouched:
    /// - game over: `GameAlreadyWon` / `GameTimedOut`
    /// - pair being resolved: `IgnoredInput`
    /// - versus game and `actor` is not active: `NotYourTurn`
    /// - unknown card, or card not face-down: `IgnoredInput`
    ///
    /// In a solo game `actor` is not checked.
    pub fn select_card(&mut self, card: CardId, actor: PlayerId) -> Transition {
        if let Some(rejection) = self.check_selection(card, actor) {
            log::debug!("{actor} picking {card} rejected: {rejection:?}");
            return Transition::Rejected(rejection);
        }

        self.deck.set_state(card, CardState::FaceUp);

        match self.selection.first {
            None => {
                self.selection.first = Some(card);
                self.phase = Phase::OneSelected;
                log::debug!("{actor} flipped {card}");
                Transition::Flipped(card)
            }
            Some(first) => {
                self.selection.second = Some(card);
                self.phase = Phase::Resolving;
                self.resolve([first, card])
            }
        }
    }

    fn check_selection(&self, card: CardId, actor: PlayerId) -> Option<Rejection> {
        match self.phase {
            Phase::Won => return Some(Rejection::GameAlreadyWon),
            Phase::TimedOut => return Some(Rejection::GameTimedOut),
            Phase::Resolving => return Some(Rejection::IgnoredInput),
            Phase::Idle | Phase::OneSelected => {}
        }

        if self.config.mode.is_versus() && actor != self.turn.active_player {
            return Some(Rejection::NotYourTurn);
        }

        match self.deck.state_of(card) {
            Some(CardState::FaceDown) => None,
            _ => Some(Rejection::IgnoredInput),
        }
    }

    /// Compare the two face-up cards. Called with the phase at `Resolving`.
    fn resolve(&mut self, pair: [CardId; 2]) -> Transition {
        let player = self.turn.active_player;
        let paired = match (self.deck.get(pair[0]), self.deck.get(pair[1])) {
            (Some(a), Some(b)) => a.pairs_with(b),
            _ => false,
        };

        if !paired {
            log::debug!("{player} missed: {} / {}", pair[0], pair[1]);
            return Transition::Mismatched(PendingReversion {
                generation: self.generation,
                pair,
                delay_ms: self.config.mismatch_delay_ms,
            });
        }

        for id in pair {
            self.deck.set_state(id, CardState::Matched);
        }
        self.turn.record_match();
        log::debug!(
            "{player} matched {} / {} ({} of {} cards)",
            pair[0],
            pair[1],
            self.deck.matched_count(),
            self.deck.len()
        );

        match self.finish_resolution() {
            Some(summary) => Transition::Won { pair, player, summary },
            None => Transition::Matched { pair, player },
        }
    }

    /// Flip a mismatched pair back, count the turn and pass it on.
    pub fn complete_reversion(&mut self, pending: &PendingReversion) -> ReversionOutcome {
        if pending.generation != self.generation
            || self.phase != Phase::Resolving
            || self.selection.pair() != Some(pending.pair)
        {
            log::debug!("dropping stale reversion from {}", pending.generation);
            return ReversionOutcome::Stale;
        }

        for id in pending.pair {
            self.deck.set_state(id, CardState::FaceDown);
        }
        self.turn.record_miss();
        // A miss never completes the board, but the check runs after every
        // resolution all the same.
        if let Some(summary) = self.finish_resolution() {
            log::warn!("board completed on a reversion: {summary:?}");
        }

        ReversionOutcome::Reverted {
            active_player: self.turn.active_player,
        }
    }

    /// Clear the selection, return to `Idle` and run the win check.
    fn finish_resolution(&mut self) -> Option<GameSummary> {
        self.selection.clear();
        self.phase = Phase::Idle;

        if !self.deck.all_matched() {
            return None;
        }
        self.phase = Phase::Won;
        self.turn.completed = true;
        let summary = self.build_summary(Ending::Won);
        log::info!("game won in {} turns", summary.turns_taken);
        Some(summary)
    }

    /// Count one second of play.
    ///
    /// The win check runs before the countdown, so a board that is complete
    /// when the last second is counted still ends as `Won`.
    pub fn tick(&mut self, generation: Generation) -> TickOutcome {
        if generation != self.generation {
            return TickOutcome::Stale;
        }
        if self.phase.is_terminal() {
            return TickOutcome::Finished;
        }

        if self.deck.all_matched() {
            self.phase = Phase::Won;
            self.turn.completed = true;
            return TickOutcome::Won(self.build_summary(Ending::Won));
        }

        if self.clock.tick() {
            self.phase = Phase::TimedOut;
            self.turn.completed = true;
            let summary = self.build_summary(Ending::TimedOut);
            log::info!("time is up after {} turns", summary.turns_taken);
            return TickOutcome::TimedOut(summary);
        }

        TickOutcome::Counted {
            elapsed: self.clock.elapsed,
            remaining: self.clock.remaining(),
        }
    }

    // === Queries ===

    /// Cards `actor` may pick right now.
    #[must_use]
    pub fn legal_selections(&self, actor: PlayerId) -> Vec<CardId> {
        if !self.phase.accepts_input() {
            return Vec::new();
        }
        if self.config.mode.is_versus() && actor != self.turn.active_player {
            return Vec::new();
        }
        self.deck.face_down_ids()
    }

    /// Terminal report, once the game is over.
    #[must_use]
    pub fn summary(&self) -> Option<GameSummary> {
        match self.phase {
            Phase::Won => Some(self.build_summary(Ending::Won)),
            Phase::TimedOut => Some(self.build_summary(Ending::TimedOut)),
            _ => None,
        }
    }

    fn build_summary(&self, ending: Ending) -> GameSummary {
        let result = match (ending, self.config.mode.is_versus()) {
            (Ending::TimedOut, false) => None,
            _ => Some(GameResult::from_scores(&self.turn.scores)),
        };

        GameSummary {
            ending,
            result,
            turns_taken: self.turn.turns_taken,
            scores: self.turn.scores.clone(),
            elapsed_secs: self.clock.elapsed,
            remaining_secs: self.clock.remaining(),
        }
    }

    // === Sync ===

    /// Capture the full state. O(1) in the deck size.
    #[must_use]
    pub fn snapshot(&self) -> BoardState {
        BoardState {
            config: self.config.clone(),
            generation: self.generation,
            revision: self.revision,
            deck: self.deck.clone(),
            selection: self.selection,
            phase: self.phase,
            turn: self.turn.clone(),
            clock: self.clock,
        }
    }

    /// Adopt a confirmed state from the session store.
    ///
    /// The incoming state replaces the local one completely; nothing is
    /// merged.
    pub fn restore(&mut self, board: BoardState) -> MatchResult<()> {
        check_board(&board)?;

        if board.generation != self.generation {
            log::debug!("adopting {} (was {})", board.generation, self.generation);
        }

        self.config = board.config;
        self.deck = board.deck;
        self.selection = board.selection;
        self.phase = board.phase;
        self.turn = board.turn;
        self.clock = board.clock;
        self.generation = board.generation;
        self.revision = board.revision;
        Ok(())
    }
}

fn check_deck(deck: &Deck) -> MatchResult<()> {
    if deck.is_empty() {
        return Err(MatchError::invalid("deck is empty"));
    }
    deck.check_pairs()
}

/// Reject boards the engine could never make progress from.
fn check_board(board: &BoardState) -> MatchResult<()> {
    board.config.validate()?;
    check_deck(&board.deck)?;

    if board.turn.player_count() != board.config.player_count() {
        return Err(MatchError::invalid(format!(
            "board has {} score entries for {} players",
            board.turn.player_count(),
            board.config.player_count()
        )));
    }
    if !board.turn.scores.contains(board.turn.active_player) {
        return Err(MatchError::invalid(format!(
            "active {} has no seat",
            board.turn.active_player
        )));
    }

    let selection = board.selection;
    if selection.cards().iter().any(|id| board.deck.get(*id).is_none()) {
        return Err(MatchError::invalid("selection refers to a card not on the board"));
    }
    if selection.first.is_none() && selection.second.is_some() {
        return Err(MatchError::invalid("selection has a second card but no first"));
    }

    let shape_ok = match board.phase {
        Phase::Idle => selection.is_empty(),
        Phase::OneSelected => selection.first.is_some() && selection.second.is_none(),
        Phase::Resolving => selection.pair().is_some(),
        Phase::Won => selection.is_empty() && board.deck.all_matched(),
        Phase::TimedOut => board.clock.is_expired(),
    };
    if !shape_ok {
        return Err(MatchError::invalid(format!(
            "{:?} phase does not fit the board",
            board.phase
        )));
    }

    // Outside the terminal phases the face-up cards are exactly the selection.
    if !board.phase.is_terminal() {
        let face_up = board
            .deck
            .iter()
            .filter(|c| c.state == CardState::FaceUp)
            .map(|c| c.id);
        let mut count = 0;
        for id in face_up {
            if !selection.contains(id) {
                return Err(MatchError::invalid(format!("{id} is face-up but not selected")));
            }
            count += 1;
        }
        if count != selection.cards().len() {
            return Err(MatchError::invalid("selected card is not face-up"));
        }
    }
    Ok(())
}
