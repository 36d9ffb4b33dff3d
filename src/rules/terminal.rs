//! Terminal detection and winner settlement.

use crate::core::{GameState, WINNING_POINTS};

/// True when the game is over.
///
/// Two consecutive passes end the game as a draw. A points threshold
/// ends it with last-reply semantics: the starting player crossing the
/// threshold still grants the second player one final move; the second
/// player crossing ends the game immediately.
#[must_use]
pub fn is_game_over(state: &GameState) -> bool {
    if state.consecutive_passes >= 2 {
        return true;
    }

    let first_done = state.players[0].points >= WINNING_POINTS;
    let second_done = state.players[1].points >= WINNING_POINTS;

    match (first_done, second_done) {
        (false, false) => false,
        // Second player reached the threshold: both have moved equally
        // often, the game ends at once.
        (false, true) => true,
        // First player reached it: the game ends only once the second
        // player has replied, i.e. when the turn is back with player 0.
        (true, false) => state.current_player == 0,
        (true, true) => true,
    }
}

/// The winner of a finished game: `Some(index)`, or `None` for a draw.
///
/// A double-pass finish is always a draw. Otherwise higher points win;
/// on equal points the player with fewer purchased cards wins; if still
/// tied, it is a draw.
#[must_use]
pub fn winner(state: &GameState) -> Option<usize> {
    if state.consecutive_passes >= 2 {
        return None;
    }

    let (p0, p1) = (&state.players[0], &state.players[1]);
    match p0.points.cmp(&p1.points) {
        std::cmp::Ordering::Greater => Some(0),
        std::cmp::Ordering::Less => Some(1),
        std::cmp::Ordering::Equal => match p0.purchased.len().cmp(&p1.purchased.len()) {
            std::cmp::Ordering::Less => Some(0),
            std::cmp::Ordering::Greater => Some(1),
            std::cmp::Ordering::Equal => None,
        },
    }
}
