//! Determinization over hidden information.
//!
//! An engine only ever sees its redacted view: decks are absent and the
//! opponent's reserved cards are tier placeholders. The sampler turns
//! such an observation into a plausible fully-instantiated world by
//! substituting unseen cards uniformly at random. It is the only source
//! of nondeterminism in a search run.

use rustc_hash::FxHashSet;

use crate::catalog::Catalog;
use crate::core::{Card, GameRng, GameState, ReservedCard, Tier};

/// Samples fully-instantiated worlds consistent with an observation.
#[derive(Clone, Debug)]
pub struct BeliefSampler {
    all_cards: Vec<Card>,
    rng: GameRng,
}

impl BeliefSampler {
    /// Create a sampler over the full catalog.
    #[must_use]
    pub fn new(catalog: &Catalog, seed: u64) -> Self {
        Self {
            all_cards: catalog.cards().to_vec(),
            rng: GameRng::new(seed),
        }
    }

    /// Reseed the sampler's stream.
    pub fn set_seed(&mut self, seed: u64) {
        self.rng = GameRng::new(seed);
    }

    /// Sample one plausible full world from an observed state.
    ///
    /// Known cards (face-up rows, both purchased piles, every reserved
    /// card whose identity is visible) stay fixed. Each hidden opponent
    /// reserve gets a uniformly random unseen card of its tier, without
    /// replacement; the remaining unseen cards become the shuffled
    /// decks.
    #[must_use]
    pub fn sample(&mut self, observed: &GameState, root_player: usize) -> GameState {
        let mut world = observed.clone();

        let mut known: FxHashSet<u16> = FxHashSet::default();
        for tier in Tier::ALL {
            for slot in world.row(tier) {
                if let Some(card) = slot.card() {
                    known.insert(card.id);
                }
            }
        }
        for player in &world.players {
            for card in &player.purchased {
                known.insert(card.id);
            }
            for reserved in &player.reserved {
                if let Some(card) = reserved.card() {
                    known.insert(card.id);
                }
            }
        }

        let mut unseen: [Vec<Card>; 3] = [Vec::new(), Vec::new(), Vec::new()];
        for card in &self.all_cards {
            if !known.contains(&card.id) {
                unseen[card.tier.index()].push(card.clone());
            }
        }

        let opponent = GameState::opponent_of(root_player);
        for reserved in &mut world.players[opponent].reserved {
            let tier = match *reserved {
                ReservedCard::Hidden(tier) => tier,
                ReservedCard::Known(_) => continue,
            };
            let pool = &mut unseen[tier.index()];
            if pool.is_empty() {
                continue;
            }
            let idx = self.rng.index(pool.len());
            *reserved = ReservedCard::Known(pool.swap_remove(idx));
        }

        for tier in Tier::ALL {
            let mut deck = std::mem::take(&mut unseen[tier.index()]);
            self.rng.shuffle(&mut deck);
            world.decks[tier.index()] = deck;
        }

        world
    }
}
