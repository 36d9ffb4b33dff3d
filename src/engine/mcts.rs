//! The IS-MCTS engine.
//!
//! Wires the decoder, belief sampler and search together behind the
//! [`Engine`] trait. Internal failures degrade to `PASS` so a hiccup
//! never becomes a protocol fault.

use log::{debug, warn};

use crate::belief::BeliefSampler;
use crate::catalog::Catalog;
use crate::eval::EvalWeights;
use crate::search::{select_move, SearchConfig};
use crate::wire::decode_wire;

use super::{our_turn, Engine};

/// Resolve a seed of 0 to wall-clock seconds.
fn resolve_seed(seed: u64) -> u64 {
    if seed != 0 {
        return seed;
    }
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(1)
}

/// A full IS-MCTS player.
pub struct MctsEngine {
    catalog: Catalog,
    config: SearchConfig,
    weights: EvalWeights,
    belief: BeliefSampler,
    /// Per-turn search seed, bumped after every decision so successive
    /// turns explore differently but reproducibly.
    turn_seed: u64,
}

impl MctsEngine {
    /// Create an engine. A config seed of 0 picks a wall-clock seed.
    #[must_use]
    pub fn new(catalog: Catalog, config: SearchConfig, weights: EvalWeights) -> Self {
        let seed = resolve_seed(config.seed);
        let belief = BeliefSampler::new(&catalog, seed);
        Self {
            catalog,
            config,
            weights,
            belief,
            turn_seed: seed,
        }
    }
}

impl Engine for MctsEngine {
    fn respond(&mut self, view_line: &str) -> Option<String> {
        let (wire, seat) = our_turn(view_line)?;

        let observed = match decode_wire(&wire, &self.catalog) {
            Ok(state) => state,
            Err(err) => {
                warn!("mcts engine could not decode view: {err}");
                return Some("PASS".to_string());
            }
        };

        let turn_config = self.config.clone().with_seed(self.turn_seed);
        self.turn_seed += 1;

        let mv = select_move(
            &observed,
            seat,
            &turn_config,
            &self.weights,
            &mut self.belief,
        );
        debug!(
            "move {} seat {} chose: {mv}",
            observed.move_number + 1,
            seat + 1
        );
        Some(mv.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::test_catalog;
    use crate::core::{GameRng, GameState};
    use crate::rules::{validate_move, Move};
    use crate::wire::encode_state;

    fn quick_config(seed: u64) -> SearchConfig {
        SearchConfig::default()
            .with_simulations(80)
            .with_determinizations(2)
            .with_seed(seed)
    }

    #[test]
    fn test_engine_answers_only_its_turns_with_legal_moves() {
        let catalog = test_catalog();
        let mut rng = GameRng::new(40);
        let state = GameState::deal(&catalog, &mut rng);

        let mut engine = MctsEngine::new(
            catalog.clone(),
            quick_config(40),
            EvalWeights::default(),
        );

        assert_eq!(engine.respond(&encode_state(&state, 2).unwrap()), None);

        let line = engine
            .respond(&encode_state(&state, 1).unwrap())
            .expect("active player must answer");
        let mv = Move::parse(&line, 0).unwrap();
        assert_eq!(validate_move(&state, &mv), Ok(()));
    }

    #[test]
    fn test_engine_is_reproducible() {
        let catalog = test_catalog();
        let mut rng = GameRng::new(41);
        let state = GameState::deal(&catalog, &mut rng);
        let view = encode_state(&state, 1).unwrap();

        let mut a = MctsEngine::new(catalog.clone(), quick_config(5), EvalWeights::default());
        let mut b = MctsEngine::new(catalog, quick_config(5), EvalWeights::default());

        assert_eq!(a.respond(&view), b.respond(&view));
    }

    #[test]
    fn test_engine_passes_on_undecodable_view() {
        let catalog = test_catalog();
        let mut engine = MctsEngine::new(catalog, quick_config(6), EvalWeights::default());

        // Well-formed JSON claiming it is our turn, but referencing a
        // card the catalog does not know.
        let line = r#"{"active_player_id":1,"you":1,"move":1,"players":[
            {"id":1,"points":0,"gems":{"black":0,"blue":0,"green":0,"red":0,"white":0,"joker":0},
             "discounts":{"black":0,"blue":0,"green":0,"red":0,"white":0},
             "reserved_card_ids":[],"purchased_card_ids":[],"owned_noble_ids":[],"time_bank":300.0},
            {"id":2,"points":0,"gems":{"black":0,"blue":0,"green":0,"red":0,"white":0,"joker":0},
             "discounts":{"black":0,"blue":0,"green":0,"red":0,"white":0},
             "reserved_card_ids":[],"purchased_card_ids":[],"owned_noble_ids":[],"time_bank":300.0}],
            "board":{"gems":{"black":4,"blue":4,"green":4,"red":4,"white":4,"joker":5},
            "face_up_cards":{"level1":[999],"level2":[],"level3":[]},"nobles":[]}}"#
            .replace('\n', "");

        assert_eq!(engine.respond(&line), Some("PASS".to_string()));
    }
}
