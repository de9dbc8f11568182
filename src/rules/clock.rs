//! Game clock and the countdown sub-rule.
//!
//! The host calls `tick` once per second. The clock does not know about the
//! engine phase: it keeps counting through the mismatch delay.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Clock {
    /// Countdown budget in seconds; `None` when the timer is off.
    pub budget: Option<u32>,
    /// Seconds counted since the deal.
    pub elapsed: u32,
}

impl Clock {
    #[must_use]
    pub fn new(budget: Option<u32>) -> Self {
        Self { budget, elapsed: 0 }
    }

    #[must_use]
    pub fn is_timed(&self) -> bool {
        self.budget.is_some()
    }

    /// Seconds left, for timed games.
    #[must_use]
    pub fn remaining(&self) -> Option<u32> {
        self.budget.map(|b| b.saturating_sub(self.elapsed))
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.remaining() == Some(0)
    }

    /// Count one second. Returns `true` when this tick used up the budget.
    pub fn tick(&mut self) -> bool {
        let was_expired = self.is_expired();
        self.elapsed = self.elapsed.saturating_add(1);
        !was_expired && self.is_expired()
    }
}
