//! Best-effort state reconstruction from a view line.
//!
//! Deck contents are never transmitted; the decoder leaves them empty
//! for the belief sampler to fill. Opponent reserve handles (91..=93)
//! become tier-tagged hidden entries.

use crate::catalog::Catalog;
use crate::core::{Card, CardSlot, GameState, Player, ReservedCard, Tier};
use crate::error::WireError;

use super::dto::{WirePlayer, WireState};

fn resolve_card(catalog: &Catalog, id: u16) -> Result<Card, WireError> {
    catalog
        .card(id)
        .cloned()
        .ok_or(WireError::UnknownCard(id))
}

fn decode_row(catalog: &Catalog, ids: &[u16]) -> Result<Vec<CardSlot>, WireError> {
    ids.iter()
        .map(|&id| {
            if id == 0 {
                Ok(CardSlot::Empty)
            } else {
                resolve_card(catalog, id).map(CardSlot::Face)
            }
        })
        .collect()
}

fn decode_player(catalog: &Catalog, wire: &WirePlayer) -> Result<Player, WireError> {
    let mut player = Player::new(wire.time_bank);
    player.tokens = wire.gems.into();
    player.bonuses = wire.discounts.into();
    player.points = wire.points;

    for &id in &wire.purchased_card_ids {
        player.purchased.push(resolve_card(catalog, id)?);
    }
    for &id in &wire.reserved_card_ids {
        let entry = match Tier::from_reserve_handle(id) {
            Some(tier) => ReservedCard::Hidden(tier),
            None => ReservedCard::Known(resolve_card(catalog, id)?),
        };
        player.reserved.push(entry);
    }
    for &id in &wire.owned_noble_ids {
        let noble = catalog.noble(id).ok_or(WireError::UnknownNoble(id))?;
        player.nobles.push(noble.clone());
    }
    Ok(player)
}

/// Decode one wire line into a best-effort full state.
pub fn decode_state(line: &str, catalog: &Catalog) -> Result<GameState, WireError> {
    let wire: WireState = serde_json::from_str(line)?;
    decode_wire(&wire, catalog)
}

/// Decode an already-parsed wire object.
pub fn decode_wire(wire: &WireState, catalog: &Catalog) -> Result<GameState, WireError> {
    let mut state = GameState::empty(false);

    state.bank = wire.board.gems.into();
    state.rows[Tier::One.index()] = decode_row(catalog, &wire.board.face_up_cards.level1)?;
    state.rows[Tier::Two.index()] = decode_row(catalog, &wire.board.face_up_cards.level2)?;
    state.rows[Tier::Three.index()] = decode_row(catalog, &wire.board.face_up_cards.level3)?;

    state.nobles = wire
        .board
        .nobles
        .iter()
        .map(|&id| {
            catalog
                .noble(id)
                .cloned()
                .ok_or(WireError::UnknownNoble(id))
        })
        .collect::<Result<_, _>>()?;

    for (idx, wire_player) in wire.players.iter().take(2).enumerate() {
        state.players[idx] = decode_player(catalog, wire_player)?;
    }

    state.current_player = usize::from(wire.active_player_id.saturating_sub(1)).min(1);
    state.move_number = wire.move_number.saturating_sub(1);
    Ok(state)
}
