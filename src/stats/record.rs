use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::core::{Difficulty, MatchConfig, PlayerId};
use crate::rules::{Ending, GameResult, GameSummary};

/// Versus results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
}

impl PlayerRecord {
    /// Count one finished versus game from `player`'s side.
    pub fn record(&mut self, result: &GameResult, player: PlayerId) {
        match result {
            GameResult::Draw => self.draws += 1,
            r if r.is_winner(player) => self.wins += 1,
            _ => self.losses += 1,
        }
    }

    #[must_use]
    pub fn games(&self) -> u32 {
        self.wins + self.losses + self.draws
    }
}

/// A solo result worth keeping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Best {
    pub turns: u32,
    /// Seconds left on the clock, for timed games.
    pub time_left: Option<u32>,
}

impl Best {
    /// Fewer turns is better; on equal turns, more time left is better.
    fn beats(&self, other: &Best) -> bool {
        match self.turns.cmp(&other.turns) {
            Ordering::Less => true,
            Ordering::Greater => false,
            Ordering::Equal => self.time_left.unwrap_or(0) > other.time_left.unwrap_or(0),
        }
    }
}

/// Best solo results per difficulty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalBests {
    untimed: FxHashMap<Difficulty, Best>,
    timed: FxHashMap<Difficulty, Best>,
}

impl PersonalBests {
    #[must_use]
    pub fn get(&self, difficulty: Difficulty, timed: bool) -> Option<Best> {
        self.table(timed).get(&difficulty).copied()
    }

    /// Keep `candidate` if it beats the stored best. Returns `true` when it
    /// was kept.
    pub fn offer(&mut self, difficulty: Difficulty, timed: bool, candidate: Best) -> bool {
        let table = if timed { &mut self.timed } else { &mut self.untimed };
        let keep = table
            .get(&difficulty)
            .map_or(true, |current| candidate.beats(current));
        if keep {
            table.insert(difficulty, candidate);
        }
        keep
    }

    fn table(&self, timed: bool) -> &FxHashMap<Difficulty, Best> {
        if timed {
            &self.timed
        } else {
            &self.untimed
        }
    }
}

/// Everything kept about one player.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub record: PlayerRecord,
    pub bests: PersonalBests,
}

impl PlayerStats {
    /// Fold a finished game into the stats.
    ///
    /// Versus games count towards the record. Solo games that were won are
    /// offered as personal bests; a solo game lost to the clock counts for
    /// nothing. Returns `true` if a new personal best was set.
    pub fn apply(&mut self, config: &MatchConfig, summary: &GameSummary, player: PlayerId) -> bool {
        if config.mode.is_versus() {
            if let Some(result) = &summary.result {
                self.record.record(result, player);
            }
            return false;
        }

        if summary.ending != Ending::Won {
            return false;
        }
        let best = Best {
            turns: summary.turns_taken,
            time_left: summary.remaining_secs,
        };
        let improved = self.bests.offer(config.difficulty, config.timer_enabled, best);
        if improved {
            log::info!(
                "new {} best ({}): {} turns",
                config.difficulty,
                if config.timer_enabled { "timed" } else { "untimed" },
                best.turns
            );
        }
        improved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PlayMode, PlayerMap};

    fn summary(ending: Ending, result: Option<GameResult>, turns: u32, left: Option<u32>) -> GameSummary {
        GameSummary {
            ending,
            result,
            turns_taken: turns,
            scores: PlayerMap::with_value(1, 0),
            elapsed_secs: 10,
            remaining_secs: left,
        }
    }

    #[test]
    fn test_record_counts() {
        let mut record = PlayerRecord::default();
        let p0 = PlayerId::new(0);

        record.record(&GameResult::Winner(p0), p0);
        record.record(&GameResult::Winner(PlayerId::new(1)), p0);
        record.record(&GameResult::Draw, p0);

        assert_eq!(record, PlayerRecord { wins: 1, losses: 1, draws: 1 });
        assert_eq!(record.games(), 3);
    }

    #[test]
    fn test_bests_keep_fewest_turns() {
        let mut bests = PersonalBests::default();
        let easy = Difficulty::Easy;

        assert!(bests.offer(easy, false, Best { turns: 12, time_left: None }));
        assert!(!bests.offer(easy, false, Best { turns: 14, time_left: None }));
        assert!(bests.offer(easy, false, Best { turns: 9, time_left: None }));
        assert_eq!(bests.get(easy, false).unwrap().turns, 9);
        assert_eq!(bests.get(easy, true), None);
    }

    #[test]
    fn test_timed_tie_prefers_more_time() {
        let mut bests = PersonalBests::default();
        let hard = Difficulty::Hard;

        bests.offer(hard, true, Best { turns: 15, time_left: Some(10) });
        assert!(!bests.offer(hard, true, Best { turns: 15, time_left: Some(4) }));
        assert!(bests.offer(hard, true, Best { turns: 15, time_left: Some(20) }));
    }

    #[test]
    fn test_apply_solo_and_versus() {
        let mut stats = PlayerStats::default();
        let solo = MatchConfig::new(Difficulty::Medium);
        let p0 = PlayerId::new(0);

        let won = summary(Ending::Won, Some(GameResult::Winner(p0)), 11, None);
        assert!(stats.apply(&solo, &won, p0));
        assert_eq!(stats.bests.get(Difficulty::Medium, false).unwrap().turns, 11);

        let timed_out = summary(Ending::TimedOut, None, 3, Some(0));
        assert!(!stats.apply(&solo.clone().with_timer(true), &timed_out, p0));

        let versus = MatchConfig::new(Difficulty::Easy).with_mode(PlayMode::two_player());
        let draw = summary(Ending::Won, Some(GameResult::Draw), 8, None);
        assert!(!stats.apply(&versus, &draw, p0));
        assert_eq!(stats.record.draws, 1);
    }
}
