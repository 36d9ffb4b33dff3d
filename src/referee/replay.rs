//! The replay runner: drives the rules core from a scripted game.
//!
//! After setup, ordinary move lines (including `REVEAL`) are applied in
//! order; the spectator JSON of every reached state is emitted as one
//! JSON array. Hidden draws pause the turn until the script supplies
//! the matching `REVEAL`.

use std::io::{BufRead, Write};

use log::error;

use crate::catalog::Catalog;
use crate::core::GameState;
use crate::error::RefereeError;
use crate::rules::{apply_move, check_state, is_game_over, validate_move, winner, Move};
use crate::wire::encode_state;

use super::setup::process_setup;

/// Play a scripted game. Returns the winner (or `None` for a draw) of
/// the final reached state; a script that stops early or goes invalid
/// simply ends the replay at the last good state.
pub fn run_replay<R: BufRead, W: Write>(
    catalog: &Catalog,
    mut input: R,
    mut output: W,
) -> Result<Option<usize>, RefereeError> {
    let mut state = GameState::empty(true);
    process_setup(&mut state, catalog, &mut input)?;
    check_state(&state)?;

    write!(output, "[\n{}", encode_state(&state, 0)?)?;

    let mut line = String::new();
    while !is_game_over(&state) {
        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let mv = match Move::parse(trimmed, state.current_player) {
            Ok(mv) => mv,
            Err(err) => {
                error!("replay stopped, unparseable line {trimmed:?}: {err}");
                break;
            }
        };
        if let Err(err) = validate_move(&state, &mv) {
            error!("replay stopped, invalid move {trimmed:?}: {err}");
            break;
        }

        apply_move(&mut state, &mv).map_err(RefereeError::Apply)?;
        check_state(&state)?;

        write!(output, ",\n{}", encode_state(&state, 0)?)?;
    }

    writeln!(output, "\n]")?;
    output.flush()?;

    Ok(winner(&state))
}
