//! Development cards, nobles, and the board slot types.
//!
//! Concrete cards carry ids in `1..=90`. The wire protocol additionally
//! uses `0` for "slot empty, card unknown" and `91`/`92`/`93` as blind
//! reserve handles ("top of the level 1/2/3 deck"); inside the state those
//! are represented by [`CardSlot::Empty`] and [`ReservedCard::Hidden`]
//! rather than by magic ids.

use serde::{Deserialize, Serialize};

use super::tokens::{Color, TokenSet};

/// Lowest concrete card id.
pub const CARD_ID_MIN: u16 = 1;
/// Highest concrete card id.
pub const CARD_ID_MAX: u16 = 90;

/// True for ids that name a real catalog card.
#[must_use]
pub const fn is_concrete_card_id(id: u16) -> bool {
    id >= CARD_ID_MIN && id <= CARD_ID_MAX
}

/// A card level. Determines the deck a card comes from and the richness
/// of its cost and points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tier {
    One,
    Two,
    Three,
}

impl Tier {
    /// All tiers, lowest first.
    pub const ALL: [Tier; 3] = [Tier::One, Tier::Two, Tier::Three];

    /// Zero-based index for deck/row arrays.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Tier::One => 0,
            Tier::Two => 1,
            Tier::Three => 2,
        }
    }

    /// The 1..=3 level number used by the data files and wire format.
    #[inline]
    #[must_use]
    pub const fn level(self) -> u8 {
        match self {
            Tier::One => 1,
            Tier::Two => 2,
            Tier::Three => 3,
        }
    }

    /// Inverse of [`Tier::level`].
    #[must_use]
    pub const fn from_level(level: u8) -> Option<Tier> {
        match level {
            1 => Some(Tier::One),
            2 => Some(Tier::Two),
            3 => Some(Tier::Three),
            _ => None,
        }
    }

    /// The synthetic reserve handle (91/92/93) for blind reserves from
    /// this tier's deck.
    #[inline]
    #[must_use]
    pub const fn reserve_handle(self) -> u16 {
        90 + self.level() as u16
    }

    /// Inverse of [`Tier::reserve_handle`].
    #[must_use]
    pub const fn from_reserve_handle(id: u16) -> Option<Tier> {
        match id {
            91 => Some(Tier::One),
            92 => Some(Tier::Two),
            93 => Some(Tier::Three),
            _ => None,
        }
    }
}

/// An immutable development card.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Card {
    /// Unique catalog id in `1..=90`.
    pub id: u16,
    /// The deck this card belongs to.
    pub tier: Tier,
    /// Victory points granted on purchase.
    pub points: u32,
    /// The permanent discount color granted on purchase.
    pub color: Color,
    /// Purchase cost. The joker component is always zero.
    pub cost: TokenSet,
}

impl Card {
    /// Cost after applying a player's accumulated bonuses, clamped at
    /// zero per color. Jokers never appear in a cost.
    #[must_use]
    pub fn effective_cost(&self, bonuses: &TokenSet) -> TokenSet {
        let mut effective = TokenSet::EMPTY;
        for color in Color::COLORED {
            *effective.get_mut(color) = (self.cost.get(color) - bonuses.get(color)).max(0);
        }
        effective
    }
}

/// A noble tile. Claimed automatically when a player's bonuses meet the
/// colored requirements.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Noble {
    /// Unique catalog id.
    pub id: u16,
    /// Victory points granted on claim.
    pub points: u32,
    /// Required colored bonuses. The joker component is always zero.
    pub requirements: TokenSet,
}

impl Noble {
    /// True when `bonuses` meets every colored requirement.
    #[must_use]
    pub fn satisfied_by(&self, bonuses: &TokenSet) -> bool {
        Color::COLORED
            .iter()
            .all(|&c| bonuses.get(c) >= self.requirements.get(c))
    }
}

/// One position in a face-up row. Rows keep exactly four slots in play
/// mode; an exhausted deck leaves [`CardSlot::Empty`] behind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CardSlot {
    /// Slot empty (wire id 0).
    Empty,
    /// A visible card.
    Face(Card),
}

impl CardSlot {
    /// The card occupying this slot, if any.
    #[inline]
    #[must_use]
    pub fn card(&self) -> Option<&Card> {
        match self {
            CardSlot::Empty => None,
            CardSlot::Face(card) => Some(card),
        }
    }

    /// The wire id for this slot: the card id, or `0` when empty.
    #[must_use]
    pub fn wire_id(&self) -> u16 {
        self.card().map_or(0, |c| c.id)
    }
}

/// One entry in a reserved pile. Opponent reserves decoded from a
/// redacted view, and replay-mode pending blind reserves, are
/// [`ReservedCard::Hidden`] with only the tier known.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReservedCard {
    /// A reserved card whose identity is known.
    Known(Card),
    /// A reserved card known only by tier (wire id 91/92/93).
    Hidden(Tier),
}

impl ReservedCard {
    /// The tier of the reserved card, known or hidden.
    #[must_use]
    pub fn tier(&self) -> Tier {
        match self {
            ReservedCard::Known(card) => card.tier,
            ReservedCard::Hidden(tier) => *tier,
        }
    }

    /// The card, when its identity is known.
    #[inline]
    #[must_use]
    pub fn card(&self) -> Option<&Card> {
        match self {
            ReservedCard::Known(card) => Some(card),
            ReservedCard::Hidden(_) => None,
        }
    }
}
