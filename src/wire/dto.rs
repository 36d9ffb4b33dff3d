//! Wire-format data transfer objects.
//!
//! The state travels as a single JSON object on one line with a fixed
//! key order; serde serializes struct fields in declaration order, so
//! the field layout below *is* the wire contract. Token-set objects
//! always serialize black, blue, green, red, white, joker; discount
//! objects omit the joker.

use serde::{Deserialize, Serialize};

use crate::core::TokenSet;

/// A full token set on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireTokens {
    pub black: i32,
    pub blue: i32,
    pub green: i32,
    pub red: i32,
    pub white: i32,
    pub joker: i32,
}

impl From<TokenSet> for WireTokens {
    fn from(t: TokenSet) -> Self {
        Self {
            black: t.black,
            blue: t.blue,
            green: t.green,
            red: t.red,
            white: t.white,
            joker: t.joker,
        }
    }
}

impl From<WireTokens> for TokenSet {
    fn from(w: WireTokens) -> Self {
        TokenSet::new(w.black, w.blue, w.white, w.green, w.red, w.joker)
    }
}

/// A colored-only token set on the wire (permanent discounts).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireDiscounts {
    pub black: i32,
    pub blue: i32,
    pub green: i32,
    pub red: i32,
    pub white: i32,
}

impl From<TokenSet> for WireDiscounts {
    fn from(t: TokenSet) -> Self {
        Self {
            black: t.black,
            blue: t.blue,
            green: t.green,
            red: t.red,
            white: t.white,
        }
    }
}

impl From<WireDiscounts> for TokenSet {
    fn from(w: WireDiscounts) -> Self {
        TokenSet::new(w.black, w.blue, w.white, w.green, w.red, 0)
    }
}

/// One player on the wire.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WirePlayer {
    pub id: u8,
    pub points: u32,
    pub gems: WireTokens,
    pub discounts: WireDiscounts,
    pub reserved_card_ids: Vec<u16>,
    pub purchased_card_ids: Vec<u16>,
    pub owned_noble_ids: Vec<u16>,
    pub time_bank: f64,
}

/// The face-up rows on the wire, ids only; `0` marks an empty slot.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireRows {
    pub level1: Vec<u16>,
    pub level2: Vec<u16>,
    pub level3: Vec<u16>,
}

/// The shared board on the wire.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WireBoard {
    pub gems: WireTokens,
    pub face_up_cards: WireRows,
    pub nobles: Vec<u16>,
}

/// The complete per-viewer state line.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WireState {
    /// 1-indexed active player.
    pub active_player_id: u8,
    /// 1-indexed viewer; omitted in the spectator view.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub you: Option<u8>,
    /// 1-indexed move counter.
    #[serde(rename = "move")]
    pub move_number: u32,
    /// Player 1 then player 2.
    pub players: Vec<WirePlayer>,
    pub board: WireBoard,
}
