//! IS-MCTS: determinized single-world tree searches with PUCT selection,
//! heavy (evaluator) playouts, and risk-adjusted root aggregation.

pub mod config;
pub mod mcts;
pub mod tree;

pub use config::SearchConfig;
pub use mcts::select_move;
pub use tree::{Node, NodeId, SearchTree};
