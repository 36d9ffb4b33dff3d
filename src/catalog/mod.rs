//! Static card/noble catalog loading and lookup.

pub mod loader;
pub mod registry;

pub use loader::{load_catalog, load_cards, load_nobles, parse_cards, parse_nobles};
pub use registry::Catalog;

#[cfg(test)]
pub(crate) use fixtures::test_catalog;
