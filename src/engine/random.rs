//! Uniform random engine: a protocol-complete baseline opponent.

use log::warn;

use crate::catalog::Catalog;
use crate::core::GameRng;
use crate::rules::legal_moves;
use crate::wire::decode_wire;

use super::{our_turn, Engine};

/// Picks a uniformly random legal move every turn.
pub struct RandomEngine {
    catalog: Catalog,
    rng: GameRng,
}

impl RandomEngine {
    /// Create a random engine over the catalog.
    #[must_use]
    pub fn new(catalog: Catalog, seed: u64) -> Self {
        Self {
            catalog,
            rng: GameRng::new(seed),
        }
    }
}

impl Engine for RandomEngine {
    fn respond(&mut self, view_line: &str) -> Option<String> {
        let (wire, _seat) = our_turn(view_line)?;

        let state = match decode_wire(&wire, &self.catalog) {
            Ok(state) => state,
            Err(err) => {
                warn!("random engine could not decode view: {err}");
                return Some("PASS".to_string());
            }
        };

        let moves = legal_moves(&state);
        let mv = self.rng.choose(&moves)?;
        Some(mv.to_string())
    }
}
