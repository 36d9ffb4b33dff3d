//! The authoritative game state and its lifecycle.
//!
//! The state is created by the referee via [`GameState::deal`], mutated
//! only through `rules::apply_move`, and observed through the wire
//! encoders. REVEAL coordination for replay mode lives in the explicit
//! [`PendingReveal`] sub-record rather than in loose flags.

use crate::catalog::Catalog;

use super::card::{Card, CardSlot, Noble, Tier};
use super::player::Player;
use super::rng::GameRng;
use super::tokens::TokenSet;

/// Face-up row capacity per tier.
pub const ROW_SIZE: usize = 4;
/// Nobles dealt at game start.
pub const NOBLES_IN_PLAY: usize = 3;
/// Bank stock per colored gem.
pub const BANK_PER_COLOR: i32 = 4;
/// Bank stock of jokers.
pub const BANK_JOKERS: i32 = 5;

/// Bookkeeping for the cooperative REVEAL protocol (replay mode).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PendingReveal {
    /// True while the driver owes the core a `REVEAL` line.
    pub expected: bool,
    /// Per-tier face-up slot whose occupant was last removed; the next
    /// REVEAL for that tier fills it.
    pub removed_slot: [Option<usize>; 3],
    /// A blind reserve waiting for its card: (player index, tier).
    pub blind_reserve: Option<(usize, Tier)>,
}

/// The authoritative two-player game state.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    /// True when driven by the replay protocol (hidden draws become
    /// placeholders awaiting REVEAL).
    pub replay_mode: bool,
    /// The shared token pool.
    pub bank: TokenSet,
    /// Both players, index 0 moves first.
    pub players: [Player; 2],
    /// The three face-down decks; the top of a deck is the *last*
    /// element.
    pub decks: [Vec<Card>; 3],
    /// The three face-up rows, four slots each in play mode.
    pub rows: [Vec<CardSlot>; 3],
    /// Nobles still available to claim.
    pub nobles: Vec<Noble>,
    /// Index of the player to move.
    pub current_player: usize,
    /// Completed-move counter.
    pub move_number: u32,
    /// Consecutive PASS moves; two in a row end the game.
    pub consecutive_passes: u32,
    /// REVEAL coordination, replay mode only.
    pub pending: PendingReveal,
}

impl GameState {
    /// An empty state with a full bank. Used as the replay-mode starting
    /// point before setup directives run.
    #[must_use]
    pub fn empty(replay_mode: bool) -> Self {
        Self {
            replay_mode,
            bank: TokenSet::new(
                BANK_PER_COLOR,
                BANK_PER_COLOR,
                BANK_PER_COLOR,
                BANK_PER_COLOR,
                BANK_PER_COLOR,
                BANK_JOKERS,
            ),
            players: [Player::default(), Player::default()],
            decks: [Vec::new(), Vec::new(), Vec::new()],
            rows: [Vec::new(), Vec::new(), Vec::new()],
            nobles: Vec::new(),
            current_player: 0,
            move_number: 0,
            consecutive_passes: 0,
            pending: PendingReveal::default(),
        }
    }

    /// Deal a fresh play-mode game: shuffle each tier, lay out four
    /// face-up cards per row, stack the rest as decks (top = back), and
    /// draw three nobles.
    #[must_use]
    pub fn deal(catalog: &Catalog, rng: &mut GameRng) -> Self {
        let mut state = Self::empty(false);

        for tier in Tier::ALL {
            let mut cards: Vec<Card> = catalog.cards_of_tier(tier).cloned().collect();
            rng.shuffle(&mut cards);

            let split = cards.len().min(ROW_SIZE);
            for card in cards.drain(..split) {
                state.rows[tier.index()].push(CardSlot::Face(card));
            }
            state.decks[tier.index()] = cards;
        }

        let mut nobles: Vec<Noble> = catalog.nobles().to_vec();
        rng.shuffle(&mut nobles);
        nobles.truncate(NOBLES_IN_PLAY);
        state.nobles = nobles;

        state
    }

    /// The deck for a tier.
    #[inline]
    #[must_use]
    pub fn deck(&self, tier: Tier) -> &Vec<Card> {
        &self.decks[tier.index()]
    }

    /// The deck for a tier, mutably.
    #[inline]
    pub fn deck_mut(&mut self, tier: Tier) -> &mut Vec<Card> {
        &mut self.decks[tier.index()]
    }

    /// The face-up row for a tier.
    #[inline]
    #[must_use]
    pub fn row(&self, tier: Tier) -> &Vec<CardSlot> {
        &self.rows[tier.index()]
    }

    /// The face-up row for a tier, mutably.
    #[inline]
    pub fn row_mut(&mut self, tier: Tier) -> &mut Vec<CardSlot> {
        &mut self.rows[tier.index()]
    }

    /// Locate a concrete card id in the face-up rows.
    #[must_use]
    pub fn find_face_up(&self, card_id: u16) -> Option<(Tier, usize)> {
        if card_id == 0 {
            return None;
        }
        for tier in Tier::ALL {
            if let Some(idx) = self.rows[tier.index()]
                .iter()
                .position(|slot| slot.wire_id() == card_id)
            {
                return Some((tier, idx));
            }
        }
        None
    }

    /// The player to move.
    #[inline]
    #[must_use]
    pub fn current(&self) -> &Player {
        &self.players[self.current_player]
    }

    /// The player to move, mutably.
    #[inline]
    pub fn current_mut(&mut self) -> &mut Player {
        &mut self.players[self.current_player]
    }

    /// The opponent of a player index.
    #[inline]
    #[must_use]
    pub const fn opponent_of(player: usize) -> usize {
        1 - player
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::test_catalog;
    use crate::core::Color;

    #[test]
    fn test_empty_state_bank() {
        let state = GameState::empty(false);
        assert_eq!(state.bank, TokenSet::new(4, 4, 4, 4, 4, 5));
        assert_eq!(state.current_player, 0);
        assert!(!state.pending.expected);
    }

    #[test]
    fn test_deal_layout() {
        let catalog = test_catalog();
        let mut rng = GameRng::new(7);
        let state = GameState::deal(&catalog, &mut rng);

        for tier in Tier::ALL {
            assert_eq!(state.row(tier).len(), ROW_SIZE);
            assert!(state.row(tier).iter().all(|s| s.card().is_some()));
            let tier_total = catalog.cards_of_tier(tier).count();
            assert_eq!(state.deck(tier).len(), tier_total - ROW_SIZE);
        }
        assert_eq!(state.nobles.len(), NOBLES_IN_PLAY);
        assert_eq!(state.move_number, 0);
    }

    #[test]
    fn test_deal_is_seed_deterministic() {
        let catalog = test_catalog();
        let a = GameState::deal(&catalog, &mut GameRng::new(11));
        let b = GameState::deal(&catalog, &mut GameRng::new(11));
        let c = GameState::deal(&catalog, &mut GameRng::new(12));

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_find_face_up() {
        let catalog = test_catalog();
        let mut rng = GameRng::new(3);
        let state = GameState::deal(&catalog, &mut rng);

        let target = state.rows[1][2].card().unwrap().id;
        assert_eq!(state.find_face_up(target), Some((Tier::Two, 2)));
        assert_eq!(state.find_face_up(0), None);

        let in_deck = state.deck(Tier::One).first().unwrap().id;
        assert_eq!(state.find_face_up(in_deck), None);
    }

    #[test]
    fn test_current_player_access() {
        let mut state = GameState::empty(false);
        state.current_player = 1;
        state.current_mut().tokens.add(Color::Red, 2);

        assert_eq!(state.players[1].tokens.red, 2);
        assert_eq!(state.players[0].tokens.red, 0);
        assert_eq!(GameState::opponent_of(1), 0);
    }
}
