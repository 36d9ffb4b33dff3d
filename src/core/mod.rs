//! Core data model: colors, tokens, cards, players, the authoritative
//! game state, and the deterministic RNG.

pub mod card;
pub mod player;
pub mod rng;
pub mod state;
pub mod tokens;

pub use card::{
    is_concrete_card_id, Card, CardSlot, Noble, ReservedCard, Tier, CARD_ID_MAX, CARD_ID_MIN,
};
pub use player::{
    Player, INITIAL_TIME_BANK, MAX_RESERVED, MAX_TOKENS, TIME_INCREMENT, WINNING_POINTS,
};
pub use rng::GameRng;
pub use state::{GameState, PendingReveal, BANK_JOKERS, BANK_PER_COLOR, NOBLES_IN_PLAY, ROW_SIZE};
pub use tokens::{Color, TokenSet};
