//! Gem colors and pointwise token arithmetic.
//!
//! A [`TokenSet`] is a vector of six non-negative counts indexed by
//! [`Color`]. Addition, subtraction, equality and `total()` are defined
//! pointwise; the rules layer is responsible for never driving a count
//! negative.

use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// A gem color. The five colored gems grant discounts; the joker is the
/// wild token and is never taken directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Black,
    Blue,
    White,
    Green,
    Red,
    Joker,
}

impl Color {
    /// All six gem kinds, in the canonical move-string order.
    pub const ALL: [Color; 6] = [
        Color::Black,
        Color::Blue,
        Color::White,
        Color::Green,
        Color::Red,
        Color::Joker,
    ];

    /// The five colored gems (everything but the joker).
    pub const COLORED: [Color; 5] = [
        Color::Black,
        Color::Blue,
        Color::White,
        Color::Green,
        Color::Red,
    ];

    /// The lowercase protocol name of this color.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Color::Black => "black",
            Color::Blue => "blue",
            Color::White => "white",
            Color::Green => "green",
            Color::Red => "red",
            Color::Joker => "joker",
        }
    }

    /// Parse a protocol color word.
    #[must_use]
    pub fn parse(word: &str) -> Option<Color> {
        match word {
            "black" => Some(Color::Black),
            "blue" => Some(Color::Blue),
            "white" => Some(Color::White),
            "green" => Some(Color::Green),
            "red" => Some(Color::Red),
            "joker" => Some(Color::Joker),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A vector of gem counts, one per [`Color`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TokenSet {
    pub black: i32,
    pub blue: i32,
    pub white: i32,
    pub green: i32,
    pub red: i32,
    pub joker: i32,
}

impl TokenSet {
    /// The empty token set.
    pub const EMPTY: TokenSet = TokenSet {
        black: 0,
        blue: 0,
        white: 0,
        green: 0,
        red: 0,
        joker: 0,
    };

    /// Construct from explicit per-color counts.
    #[must_use]
    pub const fn new(black: i32, blue: i32, white: i32, green: i32, red: i32, joker: i32) -> Self {
        Self {
            black,
            blue,
            white,
            green,
            red,
            joker,
        }
    }

    /// The count for one color.
    #[inline]
    #[must_use]
    pub const fn get(&self, color: Color) -> i32 {
        match color {
            Color::Black => self.black,
            Color::Blue => self.blue,
            Color::White => self.white,
            Color::Green => self.green,
            Color::Red => self.red,
            Color::Joker => self.joker,
        }
    }

    /// Mutable access to the count for one color.
    #[inline]
    pub fn get_mut(&mut self, color: Color) -> &mut i32 {
        match color {
            Color::Black => &mut self.black,
            Color::Blue => &mut self.blue,
            Color::White => &mut self.white,
            Color::Green => &mut self.green,
            Color::Red => &mut self.red,
            Color::Joker => &mut self.joker,
        }
    }

    /// Add `n` gems of one color.
    pub fn add(&mut self, color: Color, n: i32) {
        *self.get_mut(color) += n;
    }

    /// Sum over all six counts.
    #[must_use]
    pub const fn total(&self) -> i32 {
        self.black + self.blue + self.white + self.green + self.red + self.joker
    }

    /// Sum over the five colored counts.
    #[must_use]
    pub const fn colored_total(&self) -> i32 {
        self.black + self.blue + self.white + self.green + self.red
    }

    /// Number of colored stacks with at least one gem.
    #[must_use]
    pub fn colored_kinds(&self) -> i32 {
        Color::COLORED.iter().filter(|&&c| self.get(c) > 0).count() as i32
    }

    /// True when every count is zero or positive.
    #[must_use]
    pub fn is_non_negative(&self) -> bool {
        Color::ALL.iter().all(|&c| self.get(c) >= 0)
    }
}

impl Add for TokenSet {
    type Output = TokenSet;

    fn add(mut self, rhs: TokenSet) -> TokenSet {
        self += rhs;
        self
    }
}

impl AddAssign for TokenSet {
    fn add_assign(&mut self, rhs: TokenSet) {
        self.black += rhs.black;
        self.blue += rhs.blue;
        self.white += rhs.white;
        self.green += rhs.green;
        self.red += rhs.red;
        self.joker += rhs.joker;
    }
}

impl Sub for TokenSet {
    type Output = TokenSet;

    fn sub(mut self, rhs: TokenSet) -> TokenSet {
        self -= rhs;
        self
    }
}

impl SubAssign for TokenSet {
    fn sub_assign(&mut self, rhs: TokenSet) {
        self.black -= rhs.black;
        self.blue -= rhs.blue;
        self.white -= rhs.white;
        self.green -= rhs.green;
        self.red -= rhs.red;
        self.joker -= rhs.joker;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_names_round_trip() {
        for color in Color::ALL {
            assert_eq!(Color::parse(color.name()), Some(color));
        }
        assert_eq!(Color::parse("purple"), None);
    }

    #[test]
    fn test_colored_excludes_joker() {
        assert_eq!(Color::COLORED.len(), 5);
        assert!(!Color::COLORED.contains(&Color::Joker));
    }

    #[test]
    fn test_pointwise_arithmetic() {
        let a = TokenSet::new(1, 2, 3, 0, 0, 1);
        let b = TokenSet::new(0, 1, 1, 1, 0, 0);

        let sum = a + b;
        assert_eq!(sum, TokenSet::new(1, 3, 4, 1, 0, 1));
        assert_eq!(sum.total(), 10);

        let diff = sum - b;
        assert_eq!(diff, a);
    }

    #[test]
    fn test_get_and_get_mut() {
        let mut t = TokenSet::EMPTY;
        *t.get_mut(Color::Green) = 4;
        TokenSet::add(&mut t, Color::Joker, 2);

        assert_eq!(t.get(Color::Green), 4);
        assert_eq!(t.get(Color::Joker), 2);
        assert_eq!(t.total(), 6);
        assert_eq!(t.colored_total(), 4);
    }

    #[test]
    fn test_colored_kinds() {
        let t = TokenSet::new(2, 0, 1, 0, 0, 5);
        assert_eq!(t.colored_kinds(), 2);
        assert_eq!(TokenSet::EMPTY.colored_kinds(), 0);
    }

    #[test]
    fn test_non_negative() {
        assert!(TokenSet::EMPTY.is_non_negative());
        let t = TokenSet::new(1, 0, 0, 0, 0, 0) - TokenSet::new(2, 0, 0, 0, 0, 0);
        assert!(!t.is_non_negative());
    }
}
