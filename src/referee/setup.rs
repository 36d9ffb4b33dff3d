//! Replay-mode setup protocol.
//!
//! A replay starts from directive lines terminated by `BEGIN`:
//!
//! ```text
//! SETUP_FACEUP level<N> id1 id2 ...
//! SETUP_NOBLES id1 id2 ...
//! SETUP_DECK level<N> id1 id2 ...     (first id is the deck top)
//! BEGIN
//! ```
//!
//! Decks not explicitly set are auto-filled from the catalog minus that
//! tier's face-up cards, in catalog order.

use std::io::BufRead;

use log::info;

use crate::catalog::Catalog;
use crate::core::{CardSlot, GameState, Tier};
use crate::error::ProtocolError;

fn parse_level(word: Option<&str>) -> Result<Tier, ProtocolError> {
    let word = word.ok_or_else(|| ProtocolError::UnknownLevel(String::new()))?;
    word.strip_prefix("level")
        .and_then(|n| n.parse::<u8>().ok())
        .and_then(Tier::from_level)
        .ok_or_else(|| ProtocolError::UnknownLevel(word.to_string()))
}

/// Integer ids from the tail of a directive, stopping at the first
/// non-integer word.
fn parse_ids<'a>(words: impl Iterator<Item = &'a str>) -> Vec<u16> {
    words
        .map_while(|w| w.parse::<u16>().ok())
        .collect()
}

/// Consume setup directives up to and including `BEGIN`, mutating the
/// empty replay state into the configured starting position.
pub fn process_setup<R: BufRead>(
    state: &mut GameState,
    catalog: &Catalog,
    input: &mut R,
) -> Result<(), ProtocolError> {
    let mut line = String::new();
    loop {
        line.clear();
        let bytes = input.read_line(&mut line).map_err(|_| ProtocolError::UnexpectedEof)?;
        if bytes == 0 {
            return Err(ProtocolError::UnexpectedEof);
        }
        let mut words = line.split_whitespace();
        let Some(directive) = words.next() else {
            continue;
        };

        match directive {
            "BEGIN" => {
                let complete = Tier::ALL.iter().all(|&t| !state.row(t).is_empty())
                    && !state.nobles.is_empty();
                if !complete {
                    return Err(ProtocolError::IncompleteSetup);
                }

                for tier in Tier::ALL {
                    if !state.deck(tier).is_empty() {
                        continue;
                    }
                    info!("auto-populating level {} deck", tier.level());
                    let face_up: Vec<u16> = state
                        .row(tier)
                        .iter()
                        .map(CardSlot::wire_id)
                        .collect();
                    let remaining: Vec<_> = catalog
                        .cards_of_tier(tier)
                        .filter(|c| !face_up.contains(&c.id))
                        .cloned()
                        .collect();
                    *state.deck_mut(tier) = remaining;
                }

                info!("setup complete, starting replay");
                return Ok(());
            }
            "SETUP_FACEUP" => {
                let tier = parse_level(words.next())?;
                for id in parse_ids(words) {
                    let card = catalog.card(id).ok_or(ProtocolError::UnknownCard(id))?;
                    state.row_mut(tier).push(CardSlot::Face(card.clone()));
                }
            }
            "SETUP_NOBLES" => {
                for id in parse_ids(words) {
                    let noble = catalog.noble(id).ok_or(ProtocolError::UnknownNoble(id))?;
                    state.nobles.push(noble.clone());
                }
            }
            "SETUP_DECK" => {
                let tier = parse_level(words.next())?;
                // First listed id is the top; the top of a deck is the
                // back of its vector.
                for id in parse_ids(words).into_iter().rev() {
                    let card = catalog.card(id).ok_or(ProtocolError::UnknownCard(id))?;
                    state.deck_mut(tier).push(card.clone());
                }
            }
            other => return Err(ProtocolError::UnknownDirective(other.to_string())),
        }
    }
}
