//! Wire-format encoding and decoding of game state.
//!
//! The referee serializes the authoritative state twice per turn (viewer
//! 1, then viewer 2); engines decode their view back into a best-effort
//! [`crate::core::GameState`] with hidden information masked.

pub mod decode;
pub mod dto;
pub mod encode;

pub use decode::{decode_state, decode_wire};
pub use dto::{WireBoard, WireDiscounts, WirePlayer, WireRows, WireState, WireTokens};
pub use encode::{encode_state, state_to_wire, Viewer};
