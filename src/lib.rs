//! # gemrush
//!
//! A deterministic two-player Splendor engine: a purely functional rules
//! core, a protocol referee with per-turn time banks, and a family of
//! competitive engines built around information-set MCTS.
//!
//! ## Architecture
//!
//! - **Rules core** (`core`, `rules`): a strongly-invariant state
//!   transition system. Validation is total and pure; application is the
//!   single mutator; legal-move enumeration emits only validated moves.
//! - **Wire layer** (`wire`): one-line JSON views with exact key order
//!   and per-viewer redaction of hidden information.
//! - **Search** (`belief`, `eval`, `search`): determinization over
//!   hidden cards, a linear evaluator, and PUCT tree search aggregated
//!   across sampled worlds with a risk-adjusted score.
//! - **Referee** (`referee`): the authoritative arbiter, including the
//!   replay setup/REVEAL protocol.
//!
//! ## Determinism
//!
//! Every stochastic step routes through a seeded [`core::GameRng`];
//! given identical seeds and identical input lines, both the referee
//! and the search are fully reproducible.

pub mod belief;
pub mod catalog;
pub mod core;
pub mod engine;
pub mod error;
pub mod eval;
pub mod referee;
pub mod rules;
pub mod search;
pub mod wire;

pub use crate::belief::BeliefSampler;
pub use crate::catalog::Catalog;
pub use crate::core::{
    Card, CardSlot, Color, GameRng, GameState, Noble, PendingReveal, Player, ReservedCard, Tier,
    TokenSet,
};
pub use crate::engine::{Engine, MctsEngine, RandomEngine};
pub use crate::error::{
    DataError, InvariantError, ParseError, ProtocolError, RefereeError, RuleError, WireError,
};
pub use crate::eval::{evaluate, EvalWeights};
pub use crate::referee::{run_game, GameOutcome, RefereeConfig};
pub use crate::rules::{
    apply_move, check_state, is_game_over, legal_moves, validate_move, winner, Move, MoveKind,
};
pub use crate::search::{select_move, SearchConfig};
pub use crate::wire::{decode_state, encode_state, WireState};
