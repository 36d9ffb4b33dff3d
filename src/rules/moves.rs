//! The textual move grammar.
//!
//! A move is a single line of whitespace-separated words:
//!
//! ```text
//! TAKE c1 c2 ... [RETURN r1 r2 ...]
//! RESERVE <card_id> [RETURN r1 r2 ...]
//! BUY <card_id> [USING p1 p2 ...] [NOBLE <noble_id>]
//! PASS
//! REVEAL <card_id>            (replay mode only)
//! ```
//!
//! Gem counts are expressed by repetition. Parsing accepts a `NOBLE`
//! clause on any verb so the validator can reject it with a rule error
//! rather than a parse error.

use std::fmt;

use crate::core::{Color, TokenSet};
use crate::error::ParseError;

/// A parsed move, tagged with the player it claims to come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Move {
    /// Index of the player issuing the move (0 or 1).
    pub player: usize,
    /// The action.
    pub kind: MoveKind,
    /// Explicit noble selection; only legal on BUY.
    pub noble_id: Option<u16>,
}

/// The five move forms.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MoveKind {
    /// Take colored gems from the bank, optionally returning down to the
    /// ten-token cap.
    Take { taken: TokenSet, returned: TokenSet },
    /// Reserve a face-up card (1..=90) or blind-reserve a deck top
    /// (91/92/93), optionally returning down to the cap.
    Reserve { card_id: u16, returned: TokenSet },
    /// Buy a face-up or previously reserved card. `payment == None`
    /// means auto-derived payment.
    Buy {
        card_id: u16,
        payment: Option<TokenSet>,
    },
    /// Do nothing.
    Pass,
    /// Replay-mode only: supply the identity of a hidden draw.
    Reveal { card_id: u16 },
}

impl Move {
    /// A PASS for the given player.
    #[must_use]
    pub fn pass(player: usize) -> Self {
        Self {
            player,
            kind: MoveKind::Pass,
            noble_id: None,
        }
    }

    /// Parse one protocol line for the given player.
    pub fn parse(line: &str, player: usize) -> Result<Self, ParseError> {
        let mut words: Vec<&str> = line.split_whitespace().collect();
        if words.is_empty() {
            return Err(ParseError::Empty);
        }

        // The NOBLE clause is shared across verbs: strip it first.
        let mut noble_id = None;
        if let Some(pos) = words.iter().position(|&w| w == "NOBLE") {
            let id_word = words.get(pos + 1).ok_or(ParseError::MissingNobleId)?;
            noble_id = Some(
                id_word
                    .parse::<u16>()
                    .map_err(|_| ParseError::BadNobleId((*id_word).to_string()))?,
            );
            words.truncate(pos);
            if words.is_empty() {
                return Err(ParseError::UnknownVerb("NOBLE".to_string()));
            }
        }

        let kind = match words[0] {
            "TAKE" => {
                let (taken_words, returned_words) = split_return(&words[1..]);
                MoveKind::Take {
                    taken: parse_gems(taken_words)?,
                    returned: parse_gems(returned_words)?,
                }
            }
            "RESERVE" => {
                let id_word = words.get(1).ok_or(ParseError::MissingCardId("RESERVE"))?;
                let card_id = id_word
                    .parse::<u16>()
                    .map_err(|_| ParseError::BadCardId((*id_word).to_string()))?;
                let (_, returned_words) = split_return(&words[2..]);
                MoveKind::Reserve {
                    card_id,
                    returned: parse_gems(returned_words)?,
                }
            }
            "BUY" => {
                let id_word = words.get(1).ok_or(ParseError::MissingCardId("BUY"))?;
                let card_id = id_word
                    .parse::<u16>()
                    .map_err(|_| ParseError::BadCardId((*id_word).to_string()))?;
                let payment = match words.iter().position(|&w| w == "USING") {
                    Some(pos) => Some(parse_gems(&words[pos + 1..])?),
                    None => None,
                };
                MoveKind::Buy { card_id, payment }
            }
            "PASS" => MoveKind::Pass,
            "REVEAL" => {
                let id_word = words.get(1).ok_or(ParseError::MissingCardId("REVEAL"))?;
                let card_id = id_word
                    .parse::<u16>()
                    .map_err(|_| ParseError::BadCardId((*id_word).to_string()))?;
                MoveKind::Reveal { card_id }
            }
            verb => return Err(ParseError::UnknownVerb(verb.to_string())),
        };

        Ok(Self {
            player,
            kind,
            noble_id,
        })
    }
}

/// Split a word list at the `RETURN` keyword.
fn split_return<'a>(words: &'a [&'a str]) -> (&'a [&'a str], &'a [&'a str]) {
    match words.iter().position(|&w| w == "RETURN") {
        Some(pos) => (&words[..pos], &words[pos + 1..]),
        None => (words, &[]),
    }
}

/// Count color words into a token set.
fn parse_gems(words: &[&str]) -> Result<TokenSet, ParseError> {
    let mut gems = TokenSet::EMPTY;
    for &word in words {
        let color = Color::parse(word).ok_or_else(|| ParseError::UnknownColor(word.to_string()))?;
        gems.add(color, 1);
    }
    Ok(gems)
}

fn write_gems(f: &mut fmt::Formatter<'_>, gems: &TokenSet) -> fmt::Result {
    for color in Color::ALL {
        for _ in 0..gems.get(color) {
            write!(f, " {color}")?;
        }
    }
    Ok(())
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            MoveKind::Take { taken, returned } => {
                write!(f, "TAKE")?;
                write_gems(f, taken)?;
                if returned.total() > 0 {
                    write!(f, " RETURN")?;
                    write_gems(f, returned)?;
                }
            }
            MoveKind::Reserve { card_id, returned } => {
                write!(f, "RESERVE {card_id}")?;
                if returned.total() > 0 {
                    write!(f, " RETURN")?;
                    write_gems(f, returned)?;
                }
            }
            MoveKind::Buy { card_id, payment } => {
                write!(f, "BUY {card_id}")?;
                if let Some(payment) = payment {
                    write!(f, " USING")?;
                    write_gems(f, payment)?;
                }
                if let Some(noble_id) = self.noble_id {
                    write!(f, " NOBLE {noble_id}")?;
                }
            }
            MoveKind::Pass => write!(f, "PASS")?,
            MoveKind::Reveal { card_id } => write!(f, "REVEAL {card_id}")?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_take() {
        let mv = Move::parse("TAKE white blue green", 0).unwrap();
        assert_eq!(mv.player, 0);
        assert_eq!(
            mv.kind,
            MoveKind::Take {
                taken: TokenSet::new(0, 1, 1, 1, 0, 0),
                returned: TokenSet::EMPTY,
            }
        );
        assert_eq!(mv.noble_id, None);
    }

    #[test]
    fn test_parse_take_with_return() {
        let mv = Move::parse("TAKE red red RETURN black joker", 1).unwrap();
        assert_eq!(
            mv.kind,
            MoveKind::Take {
                taken: TokenSet::new(0, 0, 0, 0, 2, 0),
                returned: TokenSet::new(1, 0, 0, 0, 0, 1),
            }
        );
    }

    #[test]
    fn test_parse_reserve() {
        let mv = Move::parse("RESERVE 91", 0).unwrap();
        assert_eq!(
            mv.kind,
            MoveKind::Reserve {
                card_id: 91,
                returned: TokenSet::EMPTY,
            }
        );

        let mv = Move::parse("RESERVE 17 RETURN green", 0).unwrap();
        assert_eq!(
            mv.kind,
            MoveKind::Reserve {
                card_id: 17,
                returned: TokenSet::new(0, 0, 0, 1, 0, 0),
            }
        );
    }

    #[test]
    fn test_parse_buy_variants() {
        let auto = Move::parse("BUY 12", 0).unwrap();
        assert_eq!(
            auto.kind,
            MoveKind::Buy {
                card_id: 12,
                payment: None,
            }
        );

        let explicit = Move::parse("BUY 12 USING red red joker", 0).unwrap();
        assert_eq!(
            explicit.kind,
            MoveKind::Buy {
                card_id: 12,
                payment: Some(TokenSet::new(0, 0, 0, 0, 2, 1)),
            }
        );

        let with_noble = Move::parse("BUY 12 USING red NOBLE 7", 0).unwrap();
        assert_eq!(with_noble.noble_id, Some(7));
        assert_eq!(
            with_noble.kind,
            MoveKind::Buy {
                card_id: 12,
                payment: Some(TokenSet::new(0, 0, 0, 0, 1, 0)),
            }
        );
    }

    #[test]
    fn test_noble_clause_parses_on_any_verb() {
        // The validator rejects these; the parser must not.
        let mv = Move::parse("TAKE red NOBLE 3", 0).unwrap();
        assert_eq!(mv.noble_id, Some(3));
        assert_eq!(
            mv.kind,
            MoveKind::Take {
                taken: TokenSet::new(0, 0, 0, 0, 1, 0),
                returned: TokenSet::EMPTY,
            }
        );
    }

    #[test]
    fn test_parse_pass_and_reveal() {
        assert_eq!(Move::parse("PASS", 1).unwrap().kind, MoveKind::Pass);
        assert_eq!(
            Move::parse("REVEAL 33", 0).unwrap().kind,
            MoveKind::Reveal { card_id: 33 }
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Move::parse("   ", 0), Err(ParseError::Empty));
        assert_eq!(
            Move::parse("JUMP", 0),
            Err(ParseError::UnknownVerb("JUMP".into()))
        );
        assert_eq!(
            Move::parse("RESERVE", 0),
            Err(ParseError::MissingCardId("RESERVE"))
        );
        assert_eq!(
            Move::parse("RESERVE abc", 0),
            Err(ParseError::BadCardId("abc".into()))
        );
        assert_eq!(
            Move::parse("TAKE mauve", 0),
            Err(ParseError::UnknownColor("mauve".into()))
        );
        assert_eq!(Move::parse("BUY 3 NOBLE", 0), Err(ParseError::MissingNobleId));
    }

    #[test]
    fn test_display_round_trip() {
        let lines = [
            "TAKE black blue white",
            "TAKE red red RETURN black joker",
            "RESERVE 92",
            "RESERVE 4 RETURN green green",
            "BUY 71",
            "BUY 5 USING black black joker NOBLE 2",
            "PASS",
            "REVEAL 18",
        ];
        for line in lines {
            let mv = Move::parse(line, 0).unwrap();
            assert_eq!(mv.to_string(), line);
        }
    }

    #[test]
    fn test_display_gem_order_is_canonical() {
        let mv = Move::parse("TAKE green blue black", 0).unwrap();
        assert_eq!(mv.to_string(), "TAKE black blue green");
    }
}
