//! State encoding with per-viewer redaction.

use crate::core::{GameState, Player, ReservedCard, Tier};
use crate::error::WireError;

use super::dto::{WireBoard, WirePlayer, WireRows, WireState};

/// Who a view is for: `0` is the unredacted spectator view, `1`/`2` are
/// the player views.
pub type Viewer = u8;

fn reserved_wire_id(entry: &ReservedCard, owner_id: u8, viewer: Viewer) -> u16 {
    match entry {
        // Opponent reserves are masked down to their tier.
        ReservedCard::Known(card) if viewer != 0 && owner_id != viewer => {
            card.tier.reserve_handle()
        }
        ReservedCard::Known(card) => card.id,
        ReservedCard::Hidden(tier) => tier.reserve_handle(),
    }
}

fn player_to_wire(player: &Player, owner_id: u8, viewer: Viewer) -> WirePlayer {
    WirePlayer {
        id: owner_id,
        points: player.points,
        gems: player.tokens.into(),
        discounts: player.bonuses.into(),
        reserved_card_ids: player
            .reserved
            .iter()
            .map(|r| reserved_wire_id(r, owner_id, viewer))
            .collect(),
        purchased_card_ids: player.purchased.iter().map(|c| c.id).collect(),
        owned_noble_ids: player.nobles.iter().map(|n| n.id).collect(),
        time_bank: player.time_bank,
    }
}

/// Build the per-viewer wire representation of a state.
#[must_use]
pub fn state_to_wire(state: &GameState, viewer: Viewer) -> WireState {
    let row_ids = |tier: Tier| state.row(tier).iter().map(|s| s.wire_id()).collect();

    WireState {
        active_player_id: state.current_player as u8 + 1,
        you: (viewer != 0).then_some(viewer),
        move_number: state.move_number + 1,
        players: vec![
            player_to_wire(&state.players[0], 1, viewer),
            player_to_wire(&state.players[1], 2, viewer),
        ],
        board: WireBoard {
            gems: state.bank.into(),
            face_up_cards: WireRows {
                level1: row_ids(Tier::One),
                level2: row_ids(Tier::Two),
                level3: row_ids(Tier::Three),
            },
            nobles: state.nobles.iter().map(|n| n.id).collect(),
        },
    }
}

/// Encode a state as its one-line JSON wire form for a viewer.
pub fn encode_state(state: &GameState, viewer: Viewer) -> Result<String, WireError> {
    Ok(serde_json::to_string(&state_to_wire(state, viewer))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Card, CardSlot, Color, TokenSet};

    fn card(id: u16, tier: Tier) -> Card {
        Card {
            id,
            tier,
            points: 0,
            color: Color::Blue,
            cost: TokenSet::new(1, 0, 0, 0, 0, 0),
        }
    }

    fn sample_state() -> GameState {
        let mut state = GameState::empty(false);
        state.row_mut(Tier::One).push(CardSlot::Face(card(3, Tier::One)));
        state.row_mut(Tier::One).push(CardSlot::Empty);
        state
            .row_mut(Tier::Three)
            .push(CardSlot::Face(card(71, Tier::Three)));
        state.players[0]
            .reserved
            .push(ReservedCard::Known(card(12, Tier::One)));
        state.players[1]
            .reserved
            .push(ReservedCard::Known(card(55, Tier::Two)));
        state.players[1]
            .reserved
            .push(ReservedCard::Known(card(80, Tier::Three)));
        state
    }

    #[test]
    fn test_spectator_view_is_unredacted() {
        let state = sample_state();
        let wire = state_to_wire(&state, 0);

        assert_eq!(wire.you, None);
        assert_eq!(wire.players[0].reserved_card_ids, vec![12]);
        assert_eq!(wire.players[1].reserved_card_ids, vec![55, 80]);
    }

    #[test]
    fn test_opponent_reserves_masked_by_tier() {
        let state = sample_state();

        let p1_view = state_to_wire(&state, 1);
        assert_eq!(p1_view.you, Some(1));
        assert_eq!(p1_view.players[0].reserved_card_ids, vec![12]);
        assert_eq!(p1_view.players[1].reserved_card_ids, vec![92, 93]);

        let p2_view = state_to_wire(&state, 2);
        assert_eq!(p2_view.players[0].reserved_card_ids, vec![91]);
        assert_eq!(p2_view.players[1].reserved_card_ids, vec![55, 80]);
    }

    #[test]
    fn test_empty_slot_serializes_as_zero() {
        let state = sample_state();
        let wire = state_to_wire(&state, 0);
        assert_eq!(wire.board.face_up_cards.level1, vec![3, 0]);
        assert_eq!(wire.board.face_up_cards.level2, Vec::<u16>::new());
        assert_eq!(wire.board.face_up_cards.level3, vec![71]);
    }

    #[test]
    fn test_one_indexed_counters() {
        let mut state = sample_state();
        state.current_player = 1;
        state.move_number = 6;

        let wire = state_to_wire(&state, 2);
        assert_eq!(wire.active_player_id, 2);
        assert_eq!(wire.move_number, 7);
    }

    #[test]
    fn test_encoded_line_shape() {
        let state = sample_state();
        let line = encode_state(&state, 1).unwrap();

        assert!(!line.contains('\n'));
        assert!(line.starts_with(r#"{"active_player_id":1,"you":1,"move":1,"players":[{"id":1,"#));
        assert!(line.contains(r#""board":{"gems":{"black":4,"blue":4,"green":4,"red":4,"white":4,"joker":5}"#));
    }
}
