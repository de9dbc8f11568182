//! Game configuration.
//!
//! A host builds one `MatchConfig` per game and hands it to the engine or the
//! session driver; nothing reads settings from ambient state.
//! - `Difficulty`: board size and timer budget
//! - `PlayMode`: solo or versus, and how many seats
//! - `MatchConfig`: combines all configuration
//!
//! All types derive `serde` so hosts can load them from whatever format they
//! keep settings in.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

use super::error::{MatchError, MatchResult};

/// Mismatched cards stay visible this long before flipping back.
pub const DEFAULT_MISMATCH_DELAY_MS: u64 = 1_000;

/// Board size preset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// All presets, easiest first.
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Number of face pairs dealt.
    #[must_use]
    pub const fn pair_count(self) -> usize {
        match self {
            Difficulty::Easy => 6,
            Difficulty::Medium => 8,
            Difficulty::Hard => 10,
        }
    }

    /// Countdown budget in seconds when the timer is enabled.
    #[must_use]
    pub const fn time_budget_secs(self) -> u32 {
        match self {
            Difficulty::Easy => 5,
            Difficulty::Medium => 55,
            Difficulty::Hard => 65,
        }
    }

    /// Lowercase name, as stored in session records.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = MatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(MatchError::invalid(format!("unknown difficulty {other:?}"))),
        }
    }
}

/// Who is playing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayMode {
    /// One player; the engine counts turns.
    #[default]
    Solo,
    /// Players take turns on one board; the engine keeps a score per seat
    /// and enforces turn ownership.
    Versus { players: u8 },
}

impl PlayMode {
    /// The usual two-player versus game.
    #[must_use]
    pub const fn two_player() -> Self {
        PlayMode::Versus { players: 2 }
    }

    /// Number of seats.
    #[must_use]
    pub const fn player_count(self) -> usize {
        match self {
            PlayMode::Solo => 1,
            PlayMode::Versus { players } => players as usize,
        }
    }

    #[must_use]
    pub const fn is_versus(self) -> bool {
        matches!(self, PlayMode::Versus { .. })
    }
}

/// Complete game configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    pub difficulty: Difficulty,

    pub mode: PlayMode,

    /// Run the countdown sub-rule.
    pub timer_enabled: bool,

    /// Countdown budget overriding the difficulty preset, in seconds.
    #[serde(default)]
    pub time_limit_secs: Option<u32>,

    /// How long a mismatched pair stays face-up, in milliseconds.
    pub mismatch_delay_ms: u64,

    /// Seed for dealing. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            mode: PlayMode::default(),
            timer_enabled: false,
            time_limit_secs: None,
            mismatch_delay_ms: DEFAULT_MISMATCH_DELAY_MS,
            seed: None,
        }
    }
}

impl MatchConfig {
    /// Solo game at the given difficulty, no timer.
    #[must_use]
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_mode(mut self, mode: PlayMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_timer(mut self, enabled: bool) -> Self {
        self.timer_enabled = enabled;
        self
    }

    /// Enable the timer with a custom budget.
    #[must_use]
    pub fn with_time_limit(mut self, secs: u32) -> Self {
        self.timer_enabled = true;
        self.time_limit_secs = Some(secs);
        self
    }

    #[must_use]
    pub fn with_mismatch_delay(mut self, delay: Duration) -> Self {
        self.mismatch_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.difficulty.pair_count()
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.mode.player_count()
    }

    /// Countdown budget, or `None` when the timer is off.
    #[must_use]
    pub fn time_budget(&self) -> Option<u32> {
        self.timer_enabled
            .then(|| self.time_limit_secs.unwrap_or(self.difficulty.time_budget_secs()))
    }

    #[must_use]
    pub fn mismatch_delay(&self) -> Duration {
        Duration::from_millis(self.mismatch_delay_ms)
    }

    /// Check the configuration before any game is built from it.
    pub fn validate(&self) -> MatchResult<()> {
        if let PlayMode::Versus { players } = self.mode {
            if players < 2 {
                return Err(MatchError::invalid(format!(
                    "versus mode needs at least 2 players, got {players}"
                )));
            }
        }
        if self.time_limit_secs == Some(0) {
            return Err(MatchError::invalid("time limit must be positive"));
        }
        Ok(())
    }
}
