//! The rules core: move grammar, validation, application, legal-move
//! enumeration, terminal settlement, and state invariants.
//!
//! Validation and application are split on purpose: `validate_move` is a
//! total, pure predicate; `apply_move` is the sole mutator and assumes a
//! validated move.

pub mod apply;
pub mod enumerate;
pub mod invariants;
pub mod moves;
pub mod terminal;
pub mod validate;

pub use apply::apply_move;
pub use enumerate::{legal_moves, RETURN_CAP};
pub use invariants::check_state;
pub use moves::{Move, MoveKind};
pub use terminal::{is_game_over, winner};
pub use validate::{auto_payment, validate_move};
