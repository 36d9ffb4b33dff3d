//! Search configuration.

use serde::{Deserialize, Serialize};

/// IS-MCTS configuration.
///
/// `simulations` is the whole-turn budget; it is split evenly across
/// `determinizations` sampled worlds.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Total simulations per move decision.
    pub simulations: u32,
    /// PUCT exploration constant.
    pub c_puct: f64,
    /// Simulation depth cap (moves from the root).
    pub max_depth: u32,
    /// Number of determinized worlds per decision.
    pub determinizations: u32,
    /// Risk aversion: the root score is mean − λ·stdev across worlds.
    pub risk_lambda: f64,
    /// Seed for the search RNG. Callers resolve 0 to a wall-clock seed
    /// before handing the config to the search.
    pub seed: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            simulations: 3000,
            c_puct: 1.25,
            max_depth: 18,
            determinizations: 8,
            risk_lambda: 0.30,
            seed: 0,
        }
    }
}

impl SearchConfig {
    /// Replace the seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Replace the simulation budget.
    #[must_use]
    pub fn with_simulations(mut self, simulations: u32) -> Self {
        self.simulations = simulations;
        self
    }

    /// Replace the determinization count.
    #[must_use]
    pub fn with_determinizations(mut self, determinizations: u32) -> Self {
        self.determinizations = determinizations;
        self
    }
}
