//! Seeded randomness.
//!
//! Only three things in this engine are stochastic: the referee's
//! initial shuffle of the decks and nobles, the belief sampler's draws
//! when it instantiates hidden cards, and the search's uniform choices
//! among untried moves and tied PUCT children. All of them pull from a
//! [`GameRng`], so replaying a game with the same seed and the same
//! input lines reproduces it move for move.
//!
//! ChaCha8 keeps the stream portable across platforms; the standard
//! library's hasher-seeded generators would not be.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// The engine's deterministic random stream.
#[derive(Clone, Debug)]
pub struct GameRng {
    stream: ChaCha8Rng,
}

impl GameRng {
    /// A stream fixed entirely by `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            stream: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// A uniform index into a collection of `len` elements.
    ///
    /// Panics on `len == 0`; callers pick from non-empty move lists and
    /// card pools.
    pub fn index(&mut self, len: usize) -> usize {
        self.stream.gen_range(0..len)
    }

    /// Shuffle a deck (or any slice) in place.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        use rand::seq::SliceRandom;
        items.shuffle(&mut self.stream);
    }

    /// A uniformly chosen element, or `None` on an empty slice.
    #[must_use]
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        items.choose(&mut self.stream)
    }
}
