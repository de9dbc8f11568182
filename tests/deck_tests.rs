//! Deck builder and engine invariants under random input.

use proptest::prelude::*;
use rustc_hash::FxHashMap;

use magic_match::cards::{build_deck, CardState, FaceId};
use magic_match::core::{CardId, Difficulty, MatchConfig, MatchError, PlayMode, PlayerId};
use magic_match::rules::{MatchEngine, Phase, ReversionOutcome, Transition};

fn pool(n: u32) -> Vec<FaceId> {
    (0..n).map(FaceId::new).collect()
}

proptest! {
    /// Every dealt deck holds each chosen face exactly twice, all face-down,
    /// with unique ids.
    #[test]
    fn prop_deck_pairs(pool_size in 1u32..40, pairs in 1usize..20, seed in any::<u64>()) {
        let result = build_deck(&pool(pool_size), pairs, Some(seed));
        if pairs > pool_size as usize {
            prop_assert!(matches!(result, Err(MatchError::InvalidConfiguration(_))));
            return Ok(());
        }
        let deck = result.unwrap();

        prop_assert_eq!(deck.len(), pairs * 2);
        prop_assert!(deck.check_pairs().is_ok());

        let mut faces: FxHashMap<FaceId, usize> = FxHashMap::default();
        for card in deck.iter() {
            prop_assert_eq!(card.state, CardState::FaceDown);
            prop_assert!(card.face.raw() < pool_size);
            *faces.entry(card.face).or_default() += 1;
        }
        prop_assert_eq!(faces.len(), pairs);
        prop_assert!(faces.values().all(|&n| n == 2));
    }

    /// Random clicking never breaks the board: at most two cards are up,
    /// matched cards stay matched and the win fires only on a full board.
    #[test]
    fn prop_random_play(
        seed in any::<u64>(),
        versus in any::<bool>(),
        clicks in prop::collection::vec((0usize..12, 0u8..2), 1..200),
    ) {
        let faces = pool(12);
        let deck = build_deck(&faces, 6, Some(seed)).unwrap();
        let mode = if versus { PlayMode::two_player() } else { PlayMode::Solo };
        let config = MatchConfig::new(Difficulty::Easy).with_mode(mode);
        let mut engine = MatchEngine::new(config, deck).unwrap();
        let ids: Vec<CardId> = engine.deck().iter().map(|c| c.id).collect();

        let mut matched: Vec<CardId> = Vec::new();
        for (index, seat) in clicks {
            let actor = PlayerId::new(seat);
            match engine.select_card(ids[index], actor) {
                Transition::Mismatched(pending) => {
                    prop_assert_eq!(engine.phase(), Phase::Resolving);
                    let outcome = engine.complete_reversion(&pending);
                    let is_reverted = matches!(outcome, ReversionOutcome::Reverted { .. });
                    prop_assert!(is_reverted);
                }
                Transition::Won { .. } => {
                    prop_assert!(engine.deck().all_matched());
                }
                _ => {}
            }

            let up = engine.deck().iter().filter(|c| c.state == CardState::FaceUp).count();
            prop_assert!(up <= 2);
            for id in &matched {
                prop_assert_eq!(engine.deck().state_of(*id), Some(CardState::Matched));
            }
            matched = engine.deck().iter().filter(|c| c.is_matched()).map(|c| c.id).collect();

            prop_assert_eq!(engine.phase() == Phase::Won, engine.deck().all_matched());
            let scored: u32 = engine.turn().scores.iter().map(|(_, s)| *s).sum();
            prop_assert_eq!(scored as usize * 2, engine.deck().matched_count());
        }
    }
}

/// Test the builder's refusals.
#[test]
fn test_build_deck_rejects() {
    assert!(matches!(
        build_deck(&pool(4), 0, Some(1)),
        Err(MatchError::InvalidConfiguration(_))
    ));
    assert!(matches!(
        build_deck(&[], 1, Some(1)),
        Err(MatchError::InvalidConfiguration(_))
    ));

    // Duplicates in the pool count once.
    let dupes = [FaceId::new(1), FaceId::new(1), FaceId::new(2)];
    assert!(build_deck(&dupes, 2, Some(1)).is_ok());
    assert!(build_deck(&dupes, 3, Some(1)).is_err());
}

/// Test that a pool exactly the size of the board uses every face.
#[test]
fn test_exact_pool() {
    let deck = build_deck(&pool(10), 10, None).unwrap();
    for face in pool(10) {
        assert_eq!(deck.iter().filter(|c| c.face == face).count(), 2);
    }
}
