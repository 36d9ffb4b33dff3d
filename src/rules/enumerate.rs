//! Legal-move enumeration.
//!
//! Candidates are constructed structurally and filtered through the
//! validator, so the result is always a subset of the valid moves. When
//! the ten-token cap forces a return, return-sets are enumerated
//! exhaustively in fixed color order up to [`RETURN_CAP`] variants per
//! base move to keep branching finite.

use crate::core::{Color, GameState, Tier, TokenSet, MAX_RESERVED, MAX_TOKENS};

use super::moves::{Move, MoveKind};
use super::validate::validate_move;

/// Cap on enumerated return-set variants per base move.
pub const RETURN_CAP: usize = 50;

/// All structurally legal moves for the player to move. PASS is included
/// only when nothing else is legal.
#[must_use]
pub fn legal_moves(state: &GameState) -> Vec<Move> {
    let mut moves = Vec::new();
    let player_idx = state.current_player;
    let player = &state.players[player_idx];

    let mut push_if_valid = |moves: &mut Vec<Move>, mv: Move| {
        if validate_move(state, &mv).is_ok() {
            moves.push(mv);
        }
    };

    // BUY: rows lowest tier first, then the reserved pile. With two or
    // more qualifying nobles, one entry per explicit choice.
    let buy_targets = Tier::ALL
        .into_iter()
        .flat_map(|t| state.row(t).iter().filter_map(|s| s.card()))
        .chain(player.reserved.iter().filter_map(|r| r.card()));
    for card in buy_targets {
        let mut new_bonuses = player.bonuses;
        new_bonuses.add(card.color, 1);
        let qualifying: Vec<u16> = state
            .nobles
            .iter()
            .filter(|n| n.satisfied_by(&new_bonuses))
            .map(|n| n.id)
            .collect();

        let base = Move {
            player: player_idx,
            kind: MoveKind::Buy {
                card_id: card.id,
                payment: None,
            },
            noble_id: None,
        };
        if qualifying.len() > 1 {
            for noble_id in qualifying {
                let mut mv = base.clone();
                mv.noble_id = Some(noble_id);
                push_if_valid(&mut moves, mv);
            }
        } else {
            push_if_valid(&mut moves, base);
        }
    }

    // RESERVE: every face-up concrete card plus the three blind handles.
    if player.reserved.len() < MAX_RESERVED {
        let joker_gain = i32::from(state.bank.joker > 0);
        let face_up: Vec<u16> = Tier::ALL
            .into_iter()
            .flat_map(|t| state.row(t).iter().filter_map(|s| s.card().map(|c| c.id)))
            .collect();
        let handles = Tier::ALL.into_iter().map(Tier::reserve_handle);

        for card_id in face_up.into_iter().chain(handles) {
            let make = |returned| Move {
                player: player_idx,
                kind: MoveKind::Reserve { card_id, returned },
                noble_id: None,
            };
            if player.tokens.total() + joker_gain > MAX_TOKENS {
                let mut after = player.tokens;
                after.joker += joker_gain;
                for returned in return_combinations(&after, after.total() - MAX_TOKENS) {
                    push_if_valid(&mut moves, make(returned));
                }
            } else {
                push_if_valid(&mut moves, make(TokenSet::EMPTY));
            }
        }
    }

    // TAKE: doubles, then spreads of exactly min(3, available colors).
    for color in Color::COLORED {
        let mut taken = TokenSet::EMPTY;
        *taken.get_mut(color) = 2;
        push_take_variants(state, player_idx, taken, &mut push_if_valid, &mut moves);
    }

    let take_count = state.bank.colored_kinds().min(3);
    if take_count > 0 {
        for combo in color_subsets(take_count as usize) {
            let mut taken = TokenSet::EMPTY;
            for color in combo {
                *taken.get_mut(color) = 1;
            }
            push_take_variants(state, player_idx, taken, &mut push_if_valid, &mut moves);
        }
    }

    if moves.is_empty() {
        moves.push(Move::pass(player_idx));
    }
    moves
}

/// Emit a TAKE with every forced return-set, or bare when under the cap.
fn push_take_variants(
    state: &GameState,
    player_idx: usize,
    taken: TokenSet,
    push_if_valid: &mut impl FnMut(&mut Vec<Move>, Move),
    moves: &mut Vec<Move>,
) {
    let player = &state.players[player_idx];
    let make = |returned| Move {
        player: player_idx,
        kind: MoveKind::Take { taken, returned },
        noble_id: None,
    };

    if player.tokens.total() + taken.total() > MAX_TOKENS {
        let after = player.tokens + taken;
        for returned in return_combinations(&after, after.total() - MAX_TOKENS) {
            push_if_valid(moves, make(returned));
        }
    } else {
        push_if_valid(moves, make(TokenSet::EMPTY));
    }
}

/// All subsets of the colored gems with exactly `size` members, in
/// canonical color order.
fn color_subsets(size: usize) -> Vec<Vec<Color>> {
    let mut out = Vec::new();
    let mut current = Vec::new();
    subsets_from(0, size, &mut current, &mut out);
    out
}

fn subsets_from(start: usize, size: usize, current: &mut Vec<Color>, out: &mut Vec<Vec<Color>>) {
    if current.len() == size {
        out.push(current.clone());
        return;
    }
    for i in start..Color::COLORED.len() {
        current.push(Color::COLORED[i]);
        subsets_from(i + 1, size, current, out);
        current.pop();
    }
}

/// Every way to give back exactly `need` gems from `held`, enumerated in
/// fixed color order (black, blue, white, green, red, joker) and capped
/// at [`RETURN_CAP`] results.
fn return_combinations(held: &TokenSet, need: i32) -> Vec<TokenSet> {
    let mut results = Vec::new();
    if need <= 0 {
        results.push(TokenSet::EMPTY);
        return results;
    }
    recurse_returns(held, need, TokenSet::EMPTY, 0, &mut results);
    results
}

fn recurse_returns(
    held: &TokenSet,
    need: i32,
    current: TokenSet,
    color_idx: usize,
    results: &mut Vec<TokenSet>,
) {
    if results.len() >= RETURN_CAP {
        return;
    }
    if need <= 0 {
        results.push(current);
        return;
    }
    if color_idx >= Color::ALL.len() {
        return;
    }

    let color = Color::ALL[color_idx];
    let available = held.get(color);
    for count in 0..=need.min(available) {
        let mut next = current;
        *next.get_mut(color) = count;
        recurse_returns(held, need - count, next, color_idx + 1, results);
        if results.len() >= RETURN_CAP {
            return;
        }
    }
}
