//! Playing engines.
//!
//! An engine is a callable from an observed view line to a move line.
//! The referee pushes every view to every engine; an engine answers only
//! when the view shows it as the active player.

pub mod mcts;
pub mod random;

pub use mcts::MctsEngine;
pub use random::RandomEngine;

use crate::wire::WireState;

/// A move-producing engine.
pub trait Engine {
    /// Feed one state line. Returns a move line when this engine is the
    /// active player of the view, `None` otherwise.
    fn respond(&mut self, view_line: &str) -> Option<String>;
}

/// Parse a view line and decide whether it demands a move from us.
///
/// Returns the parsed view and our 0-based seat when it is our turn.
pub(crate) fn our_turn(view_line: &str) -> Option<(WireState, usize)> {
    let wire: WireState = serde_json::from_str(view_line).ok()?;
    let you = wire.you?;
    if you == 0 || wire.active_player_id != you {
        return None;
    }
    Some((wire, usize::from(you) - 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::test_catalog;
    use crate::core::{GameRng, GameState};
    use crate::wire::encode_state;

    #[test]
    fn test_our_turn_filtering() {
        let catalog = test_catalog();
        let mut rng = GameRng::new(2);
        let state = GameState::deal(&catalog, &mut rng);

        let p1_view = encode_state(&state, 1).unwrap();
        let p2_view = encode_state(&state, 2).unwrap();
        let spectator = encode_state(&state, 0).unwrap();

        assert_eq!(our_turn(&p1_view).map(|(_, seat)| seat), Some(0));
        assert!(our_turn(&p2_view).is_none(), "player 2 is not active yet");
        assert!(our_turn(&spectator).is_none(), "spectator views never answer");
        assert!(our_turn("not json").is_none());
    }
}
