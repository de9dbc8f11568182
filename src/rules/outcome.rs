//! What the engine reports back.
//!
//! Every call returns a value describing what happened. Refused input is a
//! `Rejection`, not an error: double clicks and clicks out of turn are normal
//! during play.

use serde::{Deserialize, Serialize};

use crate::core::{CardId, Generation, PlayerId, PlayerMap};

/// Why a selection was refused. State is unchanged in every case.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rejection {
    /// Input locked, unknown card, or card not face-down.
    IgnoredInput,
    /// Versus mode, and the actor is not the active player.
    NotYourTurn,
    GameAlreadyWon,
    GameTimedOut,
}

/// A mismatched pair waiting to flip back.
///
/// The host waits `delay_ms` and then passes this back to
/// `MatchEngine::complete_reversion`. The generation makes it harmless if
/// the board was replaced in the meantime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PendingReversion {
    pub generation: Generation,
    pub pair: [CardId; 2],
    pub delay_ms: u64,
}

/// Result of `select_card`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transition {
    /// First card of the turn is face-up.
    Flipped(CardId),
    /// Second card paired with the first. `player` keeps the turn.
    Matched { pair: [CardId; 2], player: PlayerId },
    /// Second card did not pair; both stay face-up until the reversion.
    Mismatched(PendingReversion),
    /// The last pair was matched.
    Won { pair: [CardId; 2], player: PlayerId, summary: GameSummary },
    Rejected(Rejection),
}

impl Transition {
    /// Did the selection change the board?
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        !matches!(self, Transition::Rejected(_))
    }

    #[must_use]
    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            Transition::Rejected(r) => Some(*r),
            _ => None,
        }
    }
}

/// Result of `complete_reversion`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReversionOutcome {
    /// Both cards are face-down again; `active_player` moves next.
    Reverted { active_player: PlayerId },
    /// The pending pair no longer applies (new deal, already resolved, or
    /// the game ended first). Nothing changed.
    Stale,
}

/// Result of `tick`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickOutcome {
    Counted { elapsed: u32, remaining: Option<u32> },
    /// Board found fully matched before the countdown moved.
    Won(GameSummary),
    TimedOut(GameSummary),
    /// Tick scheduled for an earlier deal.
    Stale,
    /// Game already over; the clock is stopped.
    Finished,
}

/// Result of a completed game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    /// Single winner.
    Winner(PlayerId),
    /// Every seat tied.
    Draw,
    /// Several seats share the top score, but not all of them.
    Winners(Vec<PlayerId>),
}

impl GameResult {
    /// Decide a result from per-seat scores.
    #[must_use]
    pub fn from_scores(scores: &PlayerMap<u32>) -> Self {
        let leaders = scores.leaders();
        match leaders.as_slice() {
            [single] => GameResult::Winner(*single),
            _ if leaders.len() == scores.player_count() => GameResult::Draw,
            _ => GameResult::Winners(leaders),
        }
    }

    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        match self {
            GameResult::Winner(p) => *p == player,
            GameResult::Winners(ps) => ps.contains(&player),
            GameResult::Draw => false,
        }
    }
}

/// How the game ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ending {
    Won,
    TimedOut,
}

/// Terminal report for the results screen and the stats store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub ending: Ending,
    /// `None` for a solo game that ran out of time.
    pub result: Option<GameResult>,
    pub turns_taken: u32,
    pub scores: PlayerMap<u32>,
    pub elapsed_secs: u32,
    pub remaining_secs: Option<u32>,
}
