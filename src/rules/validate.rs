//! Move validation.
//!
//! The validator is total: it returns a verdict for any (state, move)
//! pair and never mutates the state. The referee treats any `Err` as a
//! fault against the sender.

use crate::core::{Card, Color, GameState, Player, Tier, TokenSet, MAX_RESERVED, MAX_TOKENS};
use crate::error::RuleError;

use super::moves::{Move, MoveKind};

/// Validate a move against the current state.
pub fn validate_move(state: &GameState, mv: &Move) -> Result<(), RuleError> {
    if mv.player != state.current_player {
        return Err(RuleError::NotYourTurn);
    }

    // While a REVEAL is owed, nothing else is accepted.
    if state.pending.expected && !matches!(mv.kind, MoveKind::Reveal { .. }) {
        return Err(RuleError::RevealPending);
    }

    match &mv.kind {
        MoveKind::Take { taken, returned } => validate_take(state, mv, taken, returned),
        MoveKind::Reserve { card_id, returned } => validate_reserve(state, mv, *card_id, returned),
        MoveKind::Buy { card_id, payment } => validate_buy(state, mv, *card_id, payment.as_ref()),
        MoveKind::Pass => {
            if mv.noble_id.is_some() {
                return Err(RuleError::NobleNotAllowed("PASS"));
            }
            Ok(())
        }
        MoveKind::Reveal { card_id } => validate_reveal(state, *card_id),
    }
}

fn validate_take(
    state: &GameState,
    mv: &Move,
    taken: &TokenSet,
    returned: &TokenSet,
) -> Result<(), RuleError> {
    let player = &state.players[mv.player];

    if taken.joker > 0 {
        return Err(RuleError::TakeJoker);
    }

    let total_taken = taken.total();
    if total_taken == 0 {
        return Err(RuleError::EmptyTake);
    }

    for color in Color::COLORED {
        if taken.get(color) > state.bank.get(color) {
            return Err(RuleError::BankShort(color));
        }
    }

    let distinct = taken.colored_kinds();
    let available = state.bank.colored_kinds();

    if total_taken == 2 && distinct == 1 {
        // Double: needs a four-high stack.
        let color = Color::COLORED
            .into_iter()
            .find(|&c| taken.get(c) > 0)
            .expect("distinct == 1 implies a taken color");
        if state.bank.get(color) < 4 {
            return Err(RuleError::DoubleNeedsFour);
        }
    } else if total_taken == distinct {
        // Spread: one each of min(3, available colors) distinct colors.
        let expected = available.min(3);
        if total_taken != expected {
            return Err(RuleError::SpreadCount {
                expected,
                available,
            });
        }
    } else {
        return Err(RuleError::TakePattern);
    }

    check_cap_and_returns(player, taken, returned, 0)?;

    if mv.noble_id.is_some() {
        return Err(RuleError::NobleNotAllowed("TAKE"));
    }
    Ok(())
}

fn validate_reserve(
    state: &GameState,
    mv: &Move,
    card_id: u16,
    returned: &TokenSet,
) -> Result<(), RuleError> {
    let player = &state.players[mv.player];

    if player.reserved.len() >= MAX_RESERVED {
        return Err(RuleError::ReserveLimit);
    }

    if crate::core::is_concrete_card_id(card_id) {
        if state.find_face_up(card_id).is_none() {
            return Err(RuleError::CardNotOnBoard(card_id));
        }
    } else if let Some(tier) = Tier::from_reserve_handle(card_id) {
        // Blind reserve. In replay mode the deck contents are supplied
        // later via REVEAL; in play mode an empty deck makes the move
        // illegal (nothing would be reserved).
        if !state.replay_mode && state.deck(tier).is_empty() {
            return Err(RuleError::EmptyDeck(tier));
        }
    } else {
        return Err(RuleError::InvalidCardId(card_id));
    }

    let joker_gained = i32::from(state.bank.joker > 0);
    check_cap_and_returns(player, &TokenSet::EMPTY, returned, joker_gained)?;

    if mv.noble_id.is_some() {
        return Err(RuleError::NobleNotAllowed("RESERVE"));
    }
    Ok(())
}

/// Shared 10-cap and per-color return accounting for TAKE and RESERVE.
///
/// `taken` is the colored inflow; `joker_gained` the joker inflow.
fn check_cap_and_returns(
    player: &Player,
    taken: &TokenSet,
    returned: &TokenSet,
    joker_gained: i32,
) -> Result<(), RuleError> {
    let inflow = taken.total() + joker_gained;
    let after = player.tokens.total() + inflow - returned.total();

    if player.tokens.total() + inflow > MAX_TOKENS {
        if after != MAX_TOKENS {
            return Err(RuleError::ReturnToTen);
        }
    } else if returned.total() > 0 {
        return Err(RuleError::NeedlessReturn);
    }

    // Returns may include gems acquired this move, but no more.
    for color in Color::COLORED {
        if returned.get(color) > player.tokens.get(color) + taken.get(color) {
            return Err(RuleError::ReturnExceedsHeld(color));
        }
    }
    if returned.joker > player.tokens.joker + joker_gained {
        return Err(RuleError::ReturnExceedsHeld(Color::Joker));
    }
    Ok(())
}

/// Find a purchase target in the player's reserved pile or a face-up row.
fn find_buy_target<'a>(state: &'a GameState, player: &'a Player, card_id: u16) -> Option<&'a Card> {
    if let Some(idx) = player.find_reserved(card_id) {
        return player.reserved[idx].card();
    }
    state
        .find_face_up(card_id)
        .and_then(|(tier, idx)| state.row(tier)[idx].card())
}

/// Derive the cheapest payment: exact colors first, jokers for whatever
/// is left uncovered.
#[must_use]
pub fn auto_payment(effective_cost: &TokenSet, held: &TokenSet) -> TokenSet {
    let mut payment = TokenSet::EMPTY;
    let mut deficit = 0;
    for color in Color::COLORED {
        let paid = effective_cost.get(color).min(held.get(color));
        *payment.get_mut(color) = paid;
        deficit += effective_cost.get(color) - paid;
    }
    payment.joker = deficit.min(held.joker);
    payment
}

fn validate_buy(
    state: &GameState,
    mv: &Move,
    card_id: u16,
    payment: Option<&TokenSet>,
) -> Result<(), RuleError> {
    let player = &state.players[mv.player];

    let card = find_buy_target(state, player, card_id).ok_or(RuleError::CardNotFound(card_id))?;
    let effective = card.effective_cost(&player.bonuses);

    let payment = match payment {
        Some(explicit) => *explicit,
        None => auto_payment(&effective, &player.tokens),
    };

    for color in Color::ALL {
        if payment.get(color) > player.tokens.get(color) {
            return Err(RuleError::PaymentShort(color));
        }
    }

    // Per color: no overpay; shortfalls must be covered by exactly the
    // jokers included in the payment.
    let mut jokers_needed = 0;
    for color in Color::COLORED {
        let paid = payment.get(color);
        let due = effective.get(color);
        if paid < due {
            jokers_needed += due - paid;
        } else if paid > due {
            return Err(RuleError::Overpay(color));
        }
    }
    if jokers_needed > payment.joker {
        return Err(RuleError::JokerShort);
    }
    if payment.joker > jokers_needed {
        return Err(RuleError::JokerExcess);
    }

    let mut new_bonuses = player.bonuses;
    new_bonuses.add(card.color, 1);
    validate_noble_choice(state, &new_bonuses, mv.noble_id)
}

/// Check the NOBLE clause against the qualifiers after this purchase.
fn validate_noble_choice(
    state: &GameState,
    bonuses_after: &TokenSet,
    specified: Option<u16>,
) -> Result<(), RuleError> {
    let qualifying: Vec<u16> = state
        .nobles
        .iter()
        .filter(|n| n.satisfied_by(bonuses_after))
        .map(|n| n.id)
        .collect();

    match (qualifying.len(), specified) {
        (0, Some(_)) => Err(RuleError::NobleNoneQualify),
        (1, Some(id)) if id != qualifying[0] => Err(RuleError::NobleMismatch),
        (n, Some(id)) if n >= 2 && !qualifying.contains(&id) => Err(RuleError::NobleNotQualified),
        _ => Ok(()),
    }
}

fn validate_reveal(state: &GameState, card_id: u16) -> Result<(), RuleError> {
    if !state.replay_mode {
        return Err(RuleError::RevealNotReplay);
    }
    if !state.pending.expected {
        return Err(RuleError::RevealNotExpected);
    }

    // A pending blind reserve pins the tier; otherwise any deck may hold
    // the card.
    let in_deck = |tier: Tier| state.deck(tier).iter().any(|c| c.id == card_id);
    let found = match state.pending.blind_reserve {
        Some((_, tier)) => in_deck(tier),
        None => Tier::ALL.into_iter().any(in_deck),
    };
    if !found {
        return Err(RuleError::RevealWrongCard(card_id));
    }
    Ok(())
}
