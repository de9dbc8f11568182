//! The deck and the deck builder.
//!
//! A `Deck` is the ordered board of one deal. It is replaced wholesale on
//! every new game; within a deal only card states change.
//!
//! Backed by `im::Vector` so snapshots handed to the session layer are O(1)
//! clones that share structure with the live board.

use im::Vector;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use super::card::{Card, CardState};
use super::face::{distinct, FaceId};
use crate::core::{CardId, GameRng, MatchError, MatchResult};

/// Ordered cards of one deal.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    cards: Vector<Card>,
}

impl Deck {
    /// Wrap existing cards. Use [`Deck::check_pairs`] on untrusted input.
    #[must_use]
    pub fn from_cards(cards: impl IntoIterator<Item = Card>) -> Self {
        Self {
            cards: cards.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Number of face pairs on the board.
    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.cards.len() / 2
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    #[must_use]
    pub fn position(&self, id: CardId) -> Option<usize> {
        self.cards.iter().position(|c| c.id == id)
    }

    #[must_use]
    pub fn state_of(&self, id: CardId) -> Option<CardState> {
        self.get(id).map(|c| c.state)
    }

    /// Set a card's state. Returns `false` if the card is not in this deck.
    pub(crate) fn set_state(&mut self, id: CardId, state: CardState) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        if let Some(card) = self.cards.get_mut(index) {
            card.state = state;
        }
        true
    }

    #[must_use]
    pub fn matched_count(&self) -> usize {
        self.cards.iter().filter(|c| c.is_matched()).count()
    }

    /// Every card matched, on a non-empty board.
    #[must_use]
    pub fn all_matched(&self) -> bool {
        !self.cards.is_empty() && self.matched_count() == self.cards.len()
    }

    /// Ids of cards that can still be picked.
    #[must_use]
    pub fn face_down_ids(&self) -> Vec<CardId> {
        self.cards
            .iter()
            .filter(|c| c.is_face_down())
            .map(|c| c.id)
            .collect()
    }

    /// Verify the pairing invariant: ids are unique and every face appears
    /// on exactly two cards.
    pub fn check_pairs(&self) -> MatchResult<()> {
        let mut ids = FxHashSet::default();
        let mut faces: FxHashMap<FaceId, usize> = FxHashMap::default();

        for card in &self.cards {
            if !ids.insert(card.id) {
                return Err(MatchError::invalid(format!("duplicate {}", card.id)));
            }
            *faces.entry(card.face).or_default() += 1;
        }

        match faces.iter().find(|(_, count)| **count != 2) {
            Some((face, count)) => Err(MatchError::invalid(format!(
                "{face} appears on {count} cards"
            ))),
            None => Ok(()),
        }
    }
}

impl<'a> IntoIterator for &'a Deck {
    type Item = &'a Card;
    type IntoIter = im::vector::Iter<'a, Card>;

    fn into_iter(self) -> Self::IntoIter {
        self.cards.iter()
    }
}

/// Deal a fresh deck from a seed, or from OS entropy when `seed` is `None`.
///
/// ## Example
///
/// ```
/// use magic_match::cards::{build_deck, FaceId};
///
/// let pool: Vec<FaceId> = (0..12).map(FaceId::new).collect();
/// let deck = build_deck(&pool, 6, Some(42)).unwrap();
///
/// assert_eq!(deck.len(), 12);
/// assert!(deck.check_pairs().is_ok());
/// assert!(deck.iter().all(|c| c.is_face_down()));
/// ```
pub fn build_deck(face_pool: &[FaceId], pair_count: usize, seed: Option<u64>) -> MatchResult<Deck> {
    let mut rng = seed.map_or_else(GameRng::from_entropy, GameRng::new);
    build_deck_with_rng(face_pool, pair_count, &mut rng)
}

/// Deal a fresh deck, drawing from `rng`.
///
/// Picks `pair_count` distinct faces from a uniform shuffle of the pool,
/// doubles them, shuffles the whole board again and gives every card a fresh
/// id. Repeated ids in the pool count once.
pub fn build_deck_with_rng(
    face_pool: &[FaceId],
    pair_count: usize,
    rng: &mut GameRng,
) -> MatchResult<Deck> {
    let mut faces = distinct(face_pool.iter().copied());

    if pair_count == 0 {
        return Err(MatchError::invalid("pair count must be positive"));
    }
    if pair_count > faces.len() {
        return Err(MatchError::invalid(format!(
            "{pair_count} pairs requested but only {} distinct faces available",
            faces.len()
        )));
    }

    rng.shuffle(&mut faces);
    faces.truncate(pair_count);

    let mut board: Vec<FaceId> = faces.iter().chain(faces.iter()).copied().collect();
    rng.shuffle(&mut board);

    let mut ids = FxHashSet::default();
    let cards: Vec<Card> = board
        .into_iter()
        .map(|face| {
            let id = loop {
                let candidate = CardId::new(rng.next_u64());
                if ids.insert(candidate) {
                    break candidate;
                }
            };
            Card::new(id, face)
        })
        .collect();

    log::debug!("dealt {} cards ({} pairs)", cards.len(), pair_count);
    Ok(Deck::from_cards(cards))
}
