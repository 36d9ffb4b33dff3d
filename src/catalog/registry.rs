//! Id-indexed card and noble registry.
//!
//! The rules core repeatedly resolves ids coming off the wire; the
//! registry gives O(1) lookup instead of scanning the catalog vectors.

use rustc_hash::FxHashMap;

use crate::core::{is_concrete_card_id, Card, Noble, Tier};
use crate::error::DataError;

/// The full static catalog: all cards and nobles, indexed by id.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    cards: Vec<Card>,
    nobles: Vec<Noble>,
    card_index: FxHashMap<u16, usize>,
    noble_index: FxHashMap<u16, usize>,
}

impl Catalog {
    /// Build a catalog, checking id uniqueness and ranges.
    pub fn new(cards: Vec<Card>, nobles: Vec<Noble>) -> Result<Self, DataError> {
        if cards.is_empty() {
            return Err(DataError::Empty("cards"));
        }
        if nobles.is_empty() {
            return Err(DataError::Empty("nobles"));
        }

        let mut card_index = FxHashMap::default();
        for (i, card) in cards.iter().enumerate() {
            if !is_concrete_card_id(card.id) {
                return Err(DataError::CardIdRange(card.id));
            }
            if card_index.insert(card.id, i).is_some() {
                return Err(DataError::DuplicateCard(card.id));
            }
        }

        let mut noble_index = FxHashMap::default();
        for (i, noble) in nobles.iter().enumerate() {
            if noble_index.insert(noble.id, i).is_some() {
                return Err(DataError::DuplicateNoble(noble.id));
            }
        }

        Ok(Self {
            cards,
            nobles,
            card_index,
            noble_index,
        })
    }

    /// Look up a card by id.
    #[must_use]
    pub fn card(&self, id: u16) -> Option<&Card> {
        self.card_index.get(&id).map(|&i| &self.cards[i])
    }

    /// Look up a noble by id.
    #[must_use]
    pub fn noble(&self, id: u16) -> Option<&Noble> {
        self.noble_index.get(&id).map(|&i| &self.nobles[i])
    }

    /// All cards, in catalog order.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// All nobles, in catalog order.
    #[must_use]
    pub fn nobles(&self) -> &[Noble] {
        &self.nobles
    }

    /// Cards belonging to one tier, in catalog order.
    pub fn cards_of_tier(&self, tier: Tier) -> impl Iterator<Item = &Card> {
        self.cards.iter().filter(move |c| c.tier == tier)
    }
}
