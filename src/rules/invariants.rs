//! Whole-state consistency checks.
//!
//! The referee runs these between turns. A failure here is an internal
//! fault (the rules core let something slip), never a player fault.

use rustc_hash::FxHashMap;

use crate::core::{
    Color, GameState, Tier, TokenSet, BANK_JOKERS, BANK_PER_COLOR, MAX_RESERVED, MAX_TOKENS,
    ROW_SIZE,
};
use crate::error::InvariantError;

/// Verify every structural invariant of the state.
pub fn check_state(state: &GameState) -> Result<(), InvariantError> {
    // Token conservation: bank plus hands equals the full stock.
    let circulating = state.bank + state.players[0].tokens + state.players[1].tokens;
    for color in Color::COLORED {
        if circulating.get(color) != BANK_PER_COLOR {
            return Err(InvariantError::TokenConservation(
                color,
                circulating.get(color),
            ));
        }
    }
    if circulating.joker != BANK_JOKERS {
        return Err(InvariantError::TokenConservation(
            Color::Joker,
            circulating.joker,
        ));
    }

    for (idx, player) in state.players.iter().enumerate() {
        let held = player.tokens.total();
        if held > MAX_TOKENS {
            return Err(InvariantError::TokenCap(idx, held));
        }
        if player.reserved.len() > MAX_RESERVED {
            return Err(InvariantError::ReserveCap(idx, player.reserved.len()));
        }
    }

    // Concrete card ids are unique across rows, decks, purchased piles
    // and reserved piles; placeholders are unconstrained.
    let mut seen: FxHashMap<u16, usize> = FxHashMap::default();
    let mut count = |id: u16| {
        if id != 0 {
            *seen.entry(id).or_insert(0) += 1;
        }
    };
    for tier in Tier::ALL {
        for slot in state.row(tier) {
            count(slot.wire_id());
        }
        for card in state.deck(tier) {
            count(card.id);
        }
    }
    for player in &state.players {
        for card in &player.purchased {
            count(card.id);
        }
        for reserved in &player.reserved {
            if let Some(card) = reserved.card() {
                count(card.id);
            }
        }
    }
    for (&id, &n) in &seen {
        if n > 1 {
            return Err(InvariantError::DuplicateCard(id, n));
        }
    }

    // Bonuses mirror purchased-card colors; points mirror cards plus
    // nobles.
    for (idx, player) in state.players.iter().enumerate() {
        let mut expected_bonuses = TokenSet::EMPTY;
        let mut expected_points = 0u32;
        for card in &player.purchased {
            expected_bonuses.add(card.color, 1);
            expected_points += card.points;
        }
        for noble in &player.nobles {
            expected_points += noble.points;
        }

        if player.bonuses != expected_bonuses {
            return Err(InvariantError::BonusMismatch(idx));
        }
        if player.points != expected_points {
            return Err(InvariantError::PointsMismatch(
                idx,
                player.points,
                expected_points,
            ));
        }
    }

    for tier in Tier::ALL {
        if state.row(tier).len() > ROW_SIZE {
            return Err(InvariantError::RowOverflow(tier, state.row(tier).len()));
        }
    }

    // Noble uniqueness across the board and both players.
    let mut noble_seen: FxHashMap<u16, usize> = FxHashMap::default();
    for noble in state
        .nobles
        .iter()
        .chain(state.players.iter().flat_map(|p| p.nobles.iter()))
    {
        *noble_seen.entry(noble.id).or_insert(0) += 1;
    }
    for (&id, &n) in &noble_seen {
        if n > 1 {
            return Err(InvariantError::DuplicateNoble(id, n));
        }
    }
    if state.nobles.len() > 3 {
        return Err(InvariantError::NobleOverflow(state.nobles.len()));
    }

    Ok(())
}
