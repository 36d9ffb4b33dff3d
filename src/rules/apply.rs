//! Move application.
//!
//! `apply_move` is the sole mutator of the authoritative state. It
//! re-checks validity first, so a rejected move leaves the state
//! byte-identical (the search relies on this to roll a simulation back
//! by simply stopping).

use crate::core::{Card, CardSlot, GameState, ReservedCard, Tier, TokenSet};
use crate::error::RuleError;

use super::moves::{Move, MoveKind};
use super::validate::{auto_payment, validate_move};

/// Validate and apply a move. Flips the player to move and bumps the
/// move counter unless the move left a REVEAL pending.
pub fn apply_move(state: &mut GameState, mv: &Move) -> Result<(), RuleError> {
    validate_move(state, mv)?;

    match &mv.kind {
        MoveKind::Take { taken, returned } => {
            let player = &mut state.players[mv.player];
            player.tokens += *taken;
            state.bank -= *taken;
            player.tokens -= *returned;
            state.bank += *returned;
        }
        MoveKind::Reserve { card_id, returned } => apply_reserve(state, mv, *card_id, returned)?,
        MoveKind::Buy { card_id, payment } => apply_buy(state, mv, *card_id, payment.as_ref())?,
        MoveKind::Pass => {}
        MoveKind::Reveal { card_id } => apply_reveal(state, *card_id)?,
    }

    // The flip is deferred while the driver owes us a REVEAL; the REVEAL
    // itself completes the interrupted move.
    if !state.pending.expected {
        if matches!(mv.kind, MoveKind::Pass) {
            state.consecutive_passes += 1;
        } else {
            state.consecutive_passes = 0;
        }
        state.current_player = GameState::opponent_of(state.current_player);
        state.move_number += 1;
    }

    Ok(())
}

/// Remove a card from a face-up slot and refill it: from the deck top in
/// play mode, with a placeholder (plus a REVEAL obligation) in replay
/// mode, or with a plain placeholder when the deck is out.
fn take_from_row(state: &mut GameState, tier: Tier, idx: usize) -> Card {
    let slot = &mut state.rows[tier.index()][idx];
    let card = match std::mem::replace(slot, CardSlot::Empty) {
        CardSlot::Face(card) => card,
        CardSlot::Empty => unreachable!("validated slot holds a card"),
    };
    state.pending.removed_slot[tier.index()] = Some(idx);

    if !state.decks[tier.index()].is_empty() {
        if state.replay_mode {
            state.pending.expected = true;
        } else if let Some(top) = state.decks[tier.index()].pop() {
            state.rows[tier.index()][idx] = CardSlot::Face(top);
        }
    }
    card
}

fn apply_reserve(
    state: &mut GameState,
    mv: &Move,
    card_id: u16,
    returned: &TokenSet,
) -> Result<(), RuleError> {
    let reserved_entry = if crate::core::is_concrete_card_id(card_id) {
        let (tier, idx) = state
            .find_face_up(card_id)
            .ok_or(RuleError::CardNotOnBoard(card_id))?;
        ReservedCard::Known(take_from_row(state, tier, idx))
    } else {
        let tier = Tier::from_reserve_handle(card_id).ok_or(RuleError::InvalidCardId(card_id))?;
        if state.replay_mode {
            state.pending.blind_reserve = Some((mv.player, tier));
            state.pending.expected = true;
            ReservedCard::Hidden(tier)
        } else {
            let top = state
                .deck_mut(tier)
                .pop()
                .ok_or(RuleError::EmptyDeck(tier))?;
            ReservedCard::Known(top)
        }
    };

    let player = &mut state.players[mv.player];
    player.reserved.push(reserved_entry);

    if state.bank.joker > 0 {
        player.tokens.joker += 1;
        state.bank.joker -= 1;
    }

    player.tokens -= *returned;
    state.bank += *returned;
    Ok(())
}

fn apply_buy(
    state: &mut GameState,
    mv: &Move,
    card_id: u16,
    payment: Option<&TokenSet>,
) -> Result<(), RuleError> {
    enum Source {
        Reserved(usize),
        FaceUp(Tier, usize),
    }

    let source = match state.players[mv.player].find_reserved(card_id) {
        Some(idx) => Source::Reserved(idx),
        None => {
            let (tier, idx) = state
                .find_face_up(card_id)
                .ok_or(RuleError::CardNotFound(card_id))?;
            Source::FaceUp(tier, idx)
        }
    };

    let card = match source {
        Source::Reserved(idx) => match state.players[mv.player].reserved.remove(idx) {
            ReservedCard::Known(card) => card,
            ReservedCard::Hidden(_) => unreachable!("validated buy targets a known card"),
        },
        Source::FaceUp(tier, idx) => take_from_row(state, tier, idx),
    };

    let player = &mut state.players[mv.player];
    let payment = match payment {
        Some(explicit) => *explicit,
        None => auto_payment(&card.effective_cost(&player.bonuses), &player.tokens),
    };

    player.tokens -= payment;
    state.bank += payment;

    player.bonuses.add(card.color, 1);
    player.points += card.points;
    player.purchased.push(card);

    assign_nobles(state, mv.player, mv.noble_id);
    Ok(())
}

/// Noble assignment after a purchase: none qualifying is a no-op, one is
/// auto-claimed, more than one follows the move's choice or the lowest
/// id.
fn assign_nobles(state: &mut GameState, player_idx: usize, noble_id: Option<u16>) {
    let bonuses = state.players[player_idx].bonuses;
    let qualifying: Vec<usize> = state
        .nobles
        .iter()
        .enumerate()
        .filter(|(_, n)| n.satisfied_by(&bonuses))
        .map(|(i, _)| i)
        .collect();

    let chosen = match qualifying.len() {
        0 => return,
        1 => qualifying[0],
        _ => match noble_id {
            Some(id) => match qualifying.iter().find(|&&i| state.nobles[i].id == id) {
                Some(&idx) => idx,
                None => return, // validated earlier; nothing sensible to do
            },
            None => *qualifying
                .iter()
                .min_by_key(|&&i| state.nobles[i].id)
                .expect("non-empty qualifier list"),
        },
    };

    let noble = state.nobles.remove(chosen);
    let player = &mut state.players[player_idx];
    player.points += noble.points;
    player.nobles.push(noble);
}

fn apply_reveal(state: &mut GameState, card_id: u16) -> Result<(), RuleError> {
    if !state.replay_mode {
        return Err(RuleError::RevealNotReplay);
    }

    if let Some((player_idx, tier)) = state.pending.blind_reserve {
        let pos = state
            .deck(tier)
            .iter()
            .position(|c| c.id == card_id)
            .ok_or(RuleError::RevealWrongCard(card_id))?;
        let card = state.deck_mut(tier).remove(pos);

        let player = &mut state.players[player_idx];
        let slot = player
            .reserved
            .iter_mut()
            .rfind(|r| matches!(r, ReservedCard::Hidden(t) if *t == tier))
            .ok_or(RuleError::RevealWrongCard(card_id))?;
        *slot = ReservedCard::Known(card);

        state.pending.blind_reserve = None;
    } else {
        let (tier, pos) = Tier::ALL
            .into_iter()
            .find_map(|t| {
                state
                    .deck(t)
                    .iter()
                    .position(|c| c.id == card_id)
                    .map(|p| (t, p))
            })
            .ok_or(RuleError::RevealWrongCard(card_id))?;
        let card = state.deck_mut(tier).remove(pos);

        let row = &mut state.rows[tier.index()];
        match state.pending.removed_slot[tier.index()].take() {
            Some(idx) if idx < row.len() && row[idx] == CardSlot::Empty => {
                row[idx] = CardSlot::Face(card);
            }
            Some(idx) => row.insert(idx.min(row.len()), CardSlot::Face(card)),
            None => row.push(CardSlot::Face(card)),
        }
    }

    state.pending.expected = false;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Color, Noble};

    fn card(id: u16, tier: Tier, points: u32, color: Color, cost: TokenSet) -> Card {
        Card {
            id,
            tier,
            points,
            color,
            cost,
        }
    }

    fn row_of(state: &mut GameState, tier: Tier, cards: Vec<Card>) {
        let row = state.row_mut(tier);
        row.clear();
        for c in cards {
            row.push(CardSlot::Face(c));
        }
    }

    #[test]
    fn test_take_moves_gems_and_flips() {
        let mut state = GameState::empty(false);
        let mv = Move {
            player: 0,
            kind: MoveKind::Take {
                taken: TokenSet::new(0, 1, 1, 1, 0, 0),
                returned: TokenSet::EMPTY,
            },
            noble_id: None,
        };

        apply_move(&mut state, &mv).unwrap();

        assert_eq!(state.players[0].tokens, TokenSet::new(0, 1, 1, 1, 0, 0));
        assert_eq!(state.bank, TokenSet::new(4, 3, 3, 3, 4, 5));
        assert_eq!(state.current_player, 1);
        assert_eq!(state.move_number, 1);
        assert_eq!(state.consecutive_passes, 0);
    }

    #[test]
    fn test_take_returns_gems_to_bank() {
        let mut state = GameState::empty(false);
        state.players[0].tokens = TokenSet::new(9, 0, 0, 0, 0, 0);
        state.bank.black = 0;

        let mv = Move {
            player: 0,
            kind: MoveKind::Take {
                taken: TokenSet::new(0, 1, 1, 1, 0, 0),
                returned: TokenSet::new(2, 0, 0, 0, 0, 0),
            },
            noble_id: None,
        };
        apply_move(&mut state, &mv).unwrap();

        assert_eq!(state.players[0].tokens.total(), 10);
        assert_eq!(state.bank.black, 2);
    }

    #[test]
    fn test_reserve_face_up_refills_from_deck() {
        let mut state = GameState::empty(false);
        row_of(
            &mut state,
            Tier::One,
            vec![card(1, Tier::One, 0, Color::Red, TokenSet::EMPTY)],
        );
        state
            .deck_mut(Tier::One)
            .push(card(2, Tier::One, 0, Color::Blue, TokenSet::EMPTY));

        let mv = Move {
            player: 0,
            kind: MoveKind::Reserve {
                card_id: 1,
                returned: TokenSet::EMPTY,
            },
            noble_id: None,
        };
        apply_move(&mut state, &mv).unwrap();

        assert_eq!(state.row(Tier::One)[0].wire_id(), 2);
        assert!(state.deck(Tier::One).is_empty());
        assert_eq!(state.players[0].reserved.len(), 1);
        assert_eq!(state.players[0].tokens.joker, 1);
        assert_eq!(state.bank.joker, 4);
    }

    #[test]
    fn test_reserve_leaves_placeholder_when_deck_empty() {
        let mut state = GameState::empty(false);
        row_of(
            &mut state,
            Tier::Two,
            vec![
                card(41, Tier::Two, 0, Color::Red, TokenSet::EMPTY),
                card(42, Tier::Two, 0, Color::Blue, TokenSet::EMPTY),
            ],
        );

        let mv = Move {
            player: 0,
            kind: MoveKind::Reserve {
                card_id: 42,
                returned: TokenSet::EMPTY,
            },
            noble_id: None,
        };
        apply_move(&mut state, &mv).unwrap();

        assert_eq!(state.row(Tier::Two).len(), 2);
        assert_eq!(state.row(Tier::Two)[1], CardSlot::Empty);
    }

    #[test]
    fn test_blind_reserve_pops_deck_top() {
        let mut state = GameState::empty(false);
        state
            .deck_mut(Tier::Three)
            .push(card(71, Tier::Three, 4, Color::Green, TokenSet::EMPTY));
        state
            .deck_mut(Tier::Three)
            .push(card(72, Tier::Three, 4, Color::Red, TokenSet::EMPTY));

        let mv = Move {
            player: 0,
            kind: MoveKind::Reserve {
                card_id: 93,
                returned: TokenSet::EMPTY,
            },
            noble_id: None,
        };
        apply_move(&mut state, &mv).unwrap();

        // Top of the deck is the back.
        assert_eq!(
            state.players[0].reserved[0].card().map(|c| c.id),
            Some(72)
        );
        assert_eq!(state.deck(Tier::Three).len(), 1);
    }

    #[test]
    fn test_reserve_without_bank_joker() {
        let mut state = GameState::empty(false);
        state.bank.joker = 0;
        row_of(
            &mut state,
            Tier::One,
            vec![card(1, Tier::One, 0, Color::Red, TokenSet::EMPTY)],
        );

        let mv = Move {
            player: 0,
            kind: MoveKind::Reserve {
                card_id: 1,
                returned: TokenSet::EMPTY,
            },
            noble_id: None,
        };
        apply_move(&mut state, &mv).unwrap();

        assert_eq!(state.players[0].tokens.joker, 0);
    }

    #[test]
    fn test_buy_exact_cost_from_row() {
        let cost = TokenSet::new(1, 2, 0, 0, 0, 0);
        let mut state = GameState::empty(false);
        row_of(
            &mut state,
            Tier::One,
            vec![card(9, Tier::One, 1, Color::White, cost)],
        );
        state.players[0].tokens = cost;
        state.bank -= cost;

        let mv = Move {
            player: 0,
            kind: MoveKind::Buy {
                card_id: 9,
                payment: None,
            },
            noble_id: None,
        };
        apply_move(&mut state, &mv).unwrap();

        let p = &state.players[0];
        assert_eq!(p.tokens, TokenSet::EMPTY);
        assert_eq!(p.purchased.len(), 1);
        assert_eq!(p.bonuses.white, 1);
        assert_eq!(p.points, 1);
        assert_eq!(state.bank, TokenSet::new(4, 4, 4, 4, 4, 5));
        // Empty deck leaves a placeholder in the vacated slot.
        assert_eq!(state.row(Tier::One)[0], CardSlot::Empty);
    }

    #[test]
    fn test_buy_from_reserved_erases_entry() {
        let c = card(50, Tier::Two, 2, Color::Black, TokenSet::new(0, 0, 1, 0, 0, 0));
        let mut state = GameState::empty(false);
        state.players[0].reserved.push(ReservedCard::Known(c));
        state.players[0].tokens = TokenSet::new(0, 0, 1, 0, 0, 0);
        state.bank.white -= 1;

        let mv = Move {
            player: 0,
            kind: MoveKind::Buy {
                card_id: 50,
                payment: None,
            },
            noble_id: None,
        };
        apply_move(&mut state, &mv).unwrap();

        assert!(state.players[0].reserved.is_empty());
        assert_eq!(state.players[0].points, 2);
    }

    #[test]
    fn test_buy_discount_reduces_payment() {
        let c = card(9, Tier::One, 0, Color::White, TokenSet::new(3, 0, 0, 0, 0, 0));
        let mut state = GameState::empty(false);
        row_of(&mut state, Tier::One, vec![c]);
        state.players[0].bonuses = TokenSet::new(2, 0, 0, 0, 0, 0);
        state.players[0].purchased = vec![
            card(80, Tier::Three, 0, Color::Black, TokenSet::EMPTY),
            card(81, Tier::Three, 0, Color::Black, TokenSet::EMPTY),
        ];
        state.players[0].tokens = TokenSet::new(1, 0, 0, 0, 0, 0);
        state.bank.black -= 1;

        let mv = Move {
            player: 0,
            kind: MoveKind::Buy {
                card_id: 9,
                payment: None,
            },
            noble_id: None,
        };
        apply_move(&mut state, &mv).unwrap();
        assert_eq!(state.players[0].tokens.black, 0);
        assert_eq!(state.bank.black, 4);
    }

    fn noble(id: u16, red: i32) -> Noble {
        Noble {
            id,
            points: 3,
            requirements: TokenSet::new(0, 0, 0, 0, red, 0),
        }
    }

    #[test]
    fn test_noble_tie_break_takes_lowest_id() {
        let c = card(9, Tier::One, 0, Color::Red, TokenSet::new(1, 0, 0, 0, 0, 0));
        let mut state = GameState::empty(false);
        row_of(&mut state, Tier::One, vec![c]);
        state.nobles = vec![noble(7, 3), noble(4, 3)];
        state.players[0].bonuses = TokenSet::new(0, 0, 0, 0, 2, 0);
        state.players[0].purchased = vec![
            card(80, Tier::Three, 0, Color::Red, TokenSet::EMPTY),
            card(81, Tier::Three, 0, Color::Red, TokenSet::EMPTY),
        ];
        state.players[0].tokens = TokenSet::new(1, 0, 0, 0, 0, 0);
        state.bank.black -= 1;

        let mv = Move {
            player: 0,
            kind: MoveKind::Buy {
                card_id: 9,
                payment: None,
            },
            noble_id: None,
        };
        apply_move(&mut state, &mv).unwrap();

        let p = &state.players[0];
        assert_eq!(p.nobles.len(), 1);
        assert_eq!(p.nobles[0].id, 4);
        assert_eq!(p.points, 3);
        assert_eq!(state.nobles.len(), 1);
        assert_eq!(state.nobles[0].id, 7);
    }

    #[test]
    fn test_noble_explicit_choice_honored() {
        let c = card(9, Tier::One, 0, Color::Red, TokenSet::new(1, 0, 0, 0, 0, 0));
        let mut state = GameState::empty(false);
        row_of(&mut state, Tier::One, vec![c]);
        state.nobles = vec![noble(4, 3), noble(7, 3)];
        state.players[0].bonuses = TokenSet::new(0, 0, 0, 0, 2, 0);
        state.players[0].purchased = vec![
            card(80, Tier::Three, 0, Color::Red, TokenSet::EMPTY),
            card(81, Tier::Three, 0, Color::Red, TokenSet::EMPTY),
        ];
        state.players[0].tokens = TokenSet::new(1, 0, 0, 0, 0, 0);
        state.bank.black -= 1;

        let mv = Move {
            player: 0,
            kind: MoveKind::Buy {
                card_id: 9,
                payment: None,
            },
            noble_id: Some(7),
        };
        apply_move(&mut state, &mv).unwrap();
        assert_eq!(state.players[0].nobles[0].id, 7);
    }

    #[test]
    fn test_pass_counts_and_resets() {
        let mut state = GameState::empty(false);

        apply_move(&mut state, &Move::pass(0)).unwrap();
        assert_eq!(state.consecutive_passes, 1);

        let mv = Move {
            player: 1,
            kind: MoveKind::Take {
                taken: TokenSet::new(1, 1, 1, 0, 0, 0),
                returned: TokenSet::EMPTY,
            },
            noble_id: None,
        };
        apply_move(&mut state, &mv).unwrap();
        assert_eq!(state.consecutive_passes, 0);
    }

    #[test]
    fn test_replay_refill_defers_flip_until_reveal() {
        let mut state = GameState::empty(true);
        row_of(
            &mut state,
            Tier::One,
            vec![card(1, Tier::One, 0, Color::Red, TokenSet::EMPTY)],
        );
        state
            .deck_mut(Tier::One)
            .push(card(2, Tier::One, 0, Color::Blue, TokenSet::EMPTY));

        let mv = Move {
            player: 0,
            kind: MoveKind::Reserve {
                card_id: 1,
                returned: TokenSet::EMPTY,
            },
            noble_id: None,
        };
        apply_move(&mut state, &mv).unwrap();

        assert!(state.pending.expected);
        assert_eq!(state.row(Tier::One)[0], CardSlot::Empty);
        assert_eq!(state.current_player, 0, "flip deferred");
        assert_eq!(state.move_number, 0);

        let reveal = Move {
            player: 0,
            kind: MoveKind::Reveal { card_id: 2 },
            noble_id: None,
        };
        apply_move(&mut state, &reveal).unwrap();

        assert!(!state.pending.expected);
        assert_eq!(state.row(Tier::One)[0].wire_id(), 2);
        assert!(state.deck(Tier::One).is_empty());
        assert_eq!(state.current_player, 1, "flip completed by REVEAL");
        assert_eq!(state.move_number, 1);
    }

    #[test]
    fn test_replay_blind_reserve_reveal() {
        let mut state = GameState::empty(true);
        state
            .deck_mut(Tier::Two)
            .push(card(44, Tier::Two, 1, Color::Green, TokenSet::EMPTY));

        let mv = Move {
            player: 0,
            kind: MoveKind::Reserve {
                card_id: 92,
                returned: TokenSet::EMPTY,
            },
            noble_id: None,
        };
        apply_move(&mut state, &mv).unwrap();

        assert!(state.pending.expected);
        assert_eq!(state.pending.blind_reserve, Some((0, Tier::Two)));
        assert_eq!(
            state.players[0].reserved[0],
            ReservedCard::Hidden(Tier::Two)
        );

        let reveal = Move {
            player: 0,
            kind: MoveKind::Reveal { card_id: 44 },
            noble_id: None,
        };
        apply_move(&mut state, &reveal).unwrap();

        assert_eq!(
            state.players[0].reserved[0].card().map(|c| c.id),
            Some(44)
        );
        assert_eq!(state.pending.blind_reserve, None);
        assert_eq!(state.current_player, 1);
    }

    #[test]
    fn test_failed_apply_leaves_state_unchanged() {
        let mut state = GameState::empty(false);
        let before = state.clone();

        let mv = Move {
            player: 0,
            kind: MoveKind::Buy {
                card_id: 12,
                payment: None,
            },
            noble_id: None,
        };
        assert!(apply_move(&mut state, &mv).is_err());
        assert_eq!(state, before);
    }
}
