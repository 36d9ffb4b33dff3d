//! Catalog file parsing.
//!
//! The card and noble catalogs are plain JSON arrays. Only the fields
//! named here are consumed; anything else in the files is ignored.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::core::{Card, Color, Noble, Tier, TokenSet};
use crate::error::DataError;

use super::registry::Catalog;

/// Cost/requirements object keyed by color name; absent keys mean zero.
#[derive(Debug, Default, Deserialize)]
struct RawTokens {
    #[serde(default)]
    black: i32,
    #[serde(default)]
    blue: i32,
    #[serde(default)]
    white: i32,
    #[serde(default)]
    green: i32,
    #[serde(default)]
    red: i32,
    #[serde(default)]
    joker: i32,
}

impl From<RawTokens> for TokenSet {
    fn from(raw: RawTokens) -> TokenSet {
        TokenSet::new(raw.black, raw.blue, raw.white, raw.green, raw.red, raw.joker)
    }
}

#[derive(Debug, Deserialize)]
struct RawCard {
    id: u16,
    level: u8,
    points: u32,
    color: String,
    #[serde(default)]
    cost: RawTokens,
}

#[derive(Debug, Deserialize)]
struct RawNoble {
    id: u16,
    points: u32,
    #[serde(default)]
    requirements: RawTokens,
}

/// Parse a card catalog from JSON text.
pub fn parse_cards(json: &str) -> Result<Vec<Card>, DataError> {
    let raw: Vec<RawCard> = serde_json::from_str(json)?;
    raw.into_iter()
        .map(|r| {
            let tier = Tier::from_level(r.level).ok_or(DataError::BadLevel(r.id, r.level))?;
            let color =
                Color::parse(&r.color).ok_or_else(|| DataError::UnknownColor(r.color.clone()))?;
            Ok(Card {
                id: r.id,
                tier,
                points: r.points,
                color,
                cost: r.cost.into(),
            })
        })
        .collect()
}

/// Parse a noble catalog from JSON text.
pub fn parse_nobles(json: &str) -> Result<Vec<Noble>, DataError> {
    let raw: Vec<RawNoble> = serde_json::from_str(json)?;
    Ok(raw
        .into_iter()
        .map(|r| Noble {
            id: r.id,
            points: r.points,
            requirements: r.requirements.into(),
        })
        .collect())
}

fn read_file(path: &Path) -> Result<String, DataError> {
    fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the card catalog from a file.
pub fn load_cards(path: &Path) -> Result<Vec<Card>, DataError> {
    parse_cards(&read_file(path)?)
}

/// Load the noble catalog from a file.
pub fn load_nobles(path: &Path) -> Result<Vec<Noble>, DataError> {
    parse_nobles(&read_file(path)?)
}

/// Load and index both catalogs. Fatal at startup on any failure.
pub fn load_catalog(cards_path: &Path, nobles_path: &Path) -> Result<Catalog, DataError> {
    let cards = load_cards(cards_path)?;
    let nobles = load_nobles(nobles_path)?;
    Catalog::new(cards, nobles)
}
