//! Per-player state.

use smallvec::SmallVec;

use super::card::{Card, Noble, ReservedCard};
use super::tokens::TokenSet;

/// Token-holding cap per player.
pub const MAX_TOKENS: i32 = 10;
/// Reserved-pile cap per player.
pub const MAX_RESERVED: usize = 3;
/// Points threshold that ends the game.
pub const WINNING_POINTS: u32 = 15;
/// Starting wall-clock time bank, in seconds.
pub const INITIAL_TIME_BANK: f64 = 300.0;
/// Time added back to the bank after every completed move, in seconds.
pub const TIME_INCREMENT: f64 = 1.0;

/// One player's holdings.
#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    /// Gems in hand.
    pub tokens: TokenSet,
    /// Permanent discounts from purchased cards. The joker component is
    /// always zero.
    pub bonuses: TokenSet,
    /// Purchased cards, in purchase order.
    pub purchased: Vec<Card>,
    /// Reserved cards (at most [`MAX_RESERVED`]).
    pub reserved: SmallVec<[ReservedCard; 3]>,
    /// Claimed nobles.
    pub nobles: Vec<Noble>,
    /// Victory points from cards and nobles.
    pub points: u32,
    /// Remaining thinking time, in seconds.
    pub time_bank: f64,
}

impl Player {
    /// A fresh player with the given time bank.
    #[must_use]
    pub fn new(time_bank: f64) -> Self {
        Self {
            tokens: TokenSet::EMPTY,
            bonuses: TokenSet::EMPTY,
            purchased: Vec::new(),
            reserved: SmallVec::new(),
            nobles: Vec::new(),
            points: 0,
            time_bank,
        }
    }

    /// Index of a known reserved card by id.
    #[must_use]
    pub fn find_reserved(&self, card_id: u16) -> Option<usize> {
        self.reserved
            .iter()
            .position(|r| r.card().map_or(false, |c| c.id == card_id))
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new(INITIAL_TIME_BANK)
    }
}
