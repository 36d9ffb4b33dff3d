//! Shared test fixtures: a deterministic synthetic catalog with the
//! real game's shape (90 cards split 40/30/20 across tiers, 10 nobles).
//! The real data files are external to the crate.
#![allow(dead_code)]

use gemrush::{Card, Catalog, Color, GameRng, GameState, Noble, Tier, TokenSet};

fn synth_card(id: u16) -> Card {
    let tier = match id {
        1..=40 => Tier::One,
        41..=70 => Tier::Two,
        _ => Tier::Three,
    };
    let color = Color::COLORED[(id as usize - 1) % 5];

    let mut cost = TokenSet::EMPTY;
    let base = match tier {
        Tier::One => 1,
        Tier::Two => 2,
        Tier::Three => 3,
    };
    for (k, &c) in Color::COLORED.iter().enumerate() {
        if c != color && (id as usize + k) % 2 == 0 {
            *cost.get_mut(c) = base + (id as i32 + k as i32) % 3;
        }
    }
    if cost.total() == 0 {
        *cost.get_mut(Color::COLORED[(id as usize) % 5]) = base + 1;
    }

    let points = match tier {
        Tier::One => u32::from(id % 2 == 0),
        Tier::Two => 1 + u32::from(id % 3 == 0) * 2,
        Tier::Three => 3 + u32::from(id % 2 == 0) * 2,
    };

    Card {
        id,
        tier,
        points,
        color,
        cost,
    }
}

fn synth_noble(id: u16) -> Noble {
    let mut requirements = TokenSet::EMPTY;
    let a = Color::COLORED[(id as usize - 1) % 5];
    let b = Color::COLORED[(id as usize + 1) % 5];
    *requirements.get_mut(a) = 3;
    *requirements.get_mut(b) = 3;
    Noble {
        id,
        points: 3,
        requirements,
    }
}

/// The shared integration-test catalog.
pub fn catalog() -> Catalog {
    let cards = (1..=90).map(synth_card).collect();
    let nobles = (1..=10).map(synth_noble).collect();
    Catalog::new(cards, nobles).expect("synthetic catalog is valid")
}

/// A freshly dealt play-mode game.
pub fn dealt(seed: u64) -> GameState {
    GameState::deal(&catalog(), &mut GameRng::new(seed))
}
