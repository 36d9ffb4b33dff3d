//! Linear state evaluation.
//!
//! A scalar advantage score from a root player's point of view: a
//! weighted sum of self-minus-opponent terms plus terminal bonuses.
//! Pure function; the weight set is configurable and the defaults are
//! the tuned tournament values.

use serde::{Deserialize, Serialize};

use crate::core::{Card, Color, GameState, Player, TokenSet};
use crate::rules::{is_game_over, winner};

/// Points-per-cost ratio below which a card counts against its owner.
pub const EFFICIENCY_THRESHOLD: f64 = 0.24;

/// Evaluation weights. `*_self`/`*_opp` pairs allow asymmetric
/// aggression; the `dir_*` group shapes the directional-commitment term.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EvalWeights {
    pub point_self: f64,
    pub point_opp: f64,
    pub gem_self: f64,
    pub gem_opp: f64,
    pub bonus_self: f64,
    pub bonus_opp: f64,
    pub reserved_self: f64,
    pub reserved_opp: f64,
    pub noble_progress_self: f64,
    pub noble_progress_opp: f64,
    pub affordable_self: f64,
    pub affordable_opp: f64,
    pub win_bonus: f64,
    pub loss_penalty: f64,
    pub turn_penalty: f64,
    pub efficiency: f64,
    pub dir_focus: f64,
    pub dir_progress: f64,
    pub dir_spread: f64,
    pub dir_reserve_match: f64,
    pub dir_support_match: f64,
    pub dir_slot_penalty: f64,
}

impl Default for EvalWeights {
    fn default() -> Self {
        Self {
            point_self: 20.0,
            point_opp: 20.0,
            gem_self: 0.25,
            gem_opp: 0.25,
            bonus_self: 1.2,
            bonus_opp: 1.2,
            reserved_self: 0.6,
            reserved_opp: 0.6,
            noble_progress_self: 0.9,
            noble_progress_opp: 0.9,
            affordable_self: 0.8,
            affordable_opp: 0.8,
            win_bonus: 1000.0,
            loss_penalty: 1000.0,
            turn_penalty: 0.01,
            efficiency: 1.0,
            dir_focus: 1.0,
            dir_progress: 0.5,
            dir_spread: 0.7,
            dir_reserve_match: 0.3,
            dir_support_match: 0.3,
            dir_slot_penalty: 0.25,
        }
    }
}

impl EvalWeights {
    /// Apply a positional override, index-compatible with the tuning
    /// scripts' ordered weight lists.
    pub fn apply_override(&mut self, index: usize, value: f64) {
        match index {
            0 => self.point_self = value,
            1 => self.point_opp = value,
            2 => self.bonus_self = value,
            3 => self.bonus_opp = value,
            4 => self.reserved_self = value,
            5 => self.reserved_opp = value,
            6 => self.noble_progress_self = value,
            7 => self.noble_progress_opp = value,
            8 => self.affordable_self = value,
            9 => self.affordable_opp = value,
            10 => self.win_bonus = value,
            11 => self.loss_penalty = value,
            12 => self.turn_penalty = value,
            13 => self.efficiency = value,
            14 => self.dir_focus = value,
            15 => self.dir_progress = value,
            16 => self.dir_spread = value,
            17 => self.dir_reserve_match = value,
            18 => self.dir_support_match = value,
            19 => self.dir_slot_penalty = value,
            _ => {}
        }
    }
}

fn gem_total_weighted(tokens: &TokenSet) -> f64 {
    f64::from(tokens.colored_total() + 2 * tokens.joker)
}

/// Affordability with jokers covering any colored deficit.
fn can_afford(player: &Player, card: &Card) -> bool {
    let effective = card.effective_cost(&player.bonuses);
    let mut deficit = 0;
    for color in Color::COLORED {
        deficit += (effective.get(color) - player.tokens.get(color)).max(0);
    }
    deficit <= player.tokens.joker
}

fn count_affordable(state: &GameState, player_idx: usize) -> i32 {
    let player = &state.players[player_idx];
    let rows = state
        .rows
        .iter()
        .flat_map(|row| row.iter())
        .filter_map(|slot| slot.card());
    let reserved = player.reserved.iter().filter_map(|r| r.card());

    rows.chain(reserved)
        .filter(|card| can_afford(player, card))
        .count() as i32
}

/// Negative total of unmet colored noble requirements. Lower gaps are
/// better, hence the sign.
fn noble_gap(state: &GameState, player_idx: usize) -> f64 {
    let bonuses = &state.players[player_idx].bonuses;
    let gap: i32 = state
        .nobles
        .iter()
        .flat_map(|n| {
            Color::COLORED
                .iter()
                .map(|&c| (n.requirements.get(c) - bonuses.get(c)).max(0))
        })
        .sum();
    -f64::from(gap)
}

fn card_efficiency(card: &Card) -> f64 {
    let required = card.cost.colored_total();
    if required <= 0 {
        return 0.0;
    }
    let ratio = f64::from(card.points) / f64::from(required);
    if ratio >= EFFICIENCY_THRESHOLD {
        ratio
    } else {
        -(EFFICIENCY_THRESHOLD - ratio)
    }
}

fn efficiency_score(player: &Player) -> f64 {
    player
        .purchased
        .iter()
        .chain(player.reserved.iter().filter_map(|r| r.card()))
        .map(card_efficiency)
        .sum()
}

fn cost_vector(card: &Card) -> [f64; 5] {
    let mut v = [0.0; 5];
    for (i, &c) in Color::COLORED.iter().enumerate() {
        v[i] = f64::from(card.cost.get(c));
    }
    v
}

fn cosine(a: &[f64; 5], b: &[f64; 5]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let na: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let nb: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if na <= 0.0 || nb <= 0.0 {
        0.0
    } else {
        dot / (na * nb)
    }
}

/// How committed the reserved pile is to a single color axis.
///
/// Efficient reserved cards define a per-color demand vector; tokens,
/// bonuses and half-weighted jokers define support. The axis maximizing
/// `demand * (support + 1)` anchors the focus and progress terms;
/// spread is the normalized demand entropy; the match terms reward
/// reserved cards that pull in the same direction as each other and as
/// the player's holdings; crowded piles pay an escalating slot penalty.
fn directional_commitment(player: &Player, w: &EvalWeights) -> f64 {
    let efficient: Vec<&Card> = player
        .reserved
        .iter()
        .filter_map(|r| r.card())
        .filter(|c| {
            let required = c.cost.colored_total();
            required > 0 && f64::from(c.points) / f64::from(required) >= EFFICIENCY_THRESHOLD
        })
        .collect();

    if efficient.is_empty() {
        return 0.0;
    }

    let mut demand = [0.0f64; 5];
    for card in &efficient {
        for (i, &c) in Color::COLORED.iter().enumerate() {
            demand[i] += f64::from(card.cost.get(c));
        }
    }

    let half_jokers = 0.5 * f64::from(player.tokens.joker);
    let mut support = [0.0f64; 5];
    for (i, &c) in Color::COLORED.iter().enumerate() {
        support[i] = f64::from(player.tokens.get(c) + player.bonuses.get(c)) + half_jokers;
    }

    let axis = (0..5)
        .max_by(|&a, &b| {
            let va = demand[a] * (support[a] + 1.0);
            let vb = demand[b] * (support[b] + 1.0);
            va.partial_cmp(&vb).unwrap_or(std::cmp::Ordering::Equal)
        })
        .unwrap_or(0);

    let mut focus = 0.0;
    for card in &efficient {
        let total = f64::from(card.cost.colored_total());
        if total > 0.0 {
            focus += f64::from(card.cost.get(Color::COLORED[axis])) / total;
        }
    }
    focus /= efficient.len() as f64;

    let progress = support[axis] / demand[axis].max(1.0);

    let total_demand: f64 = demand.iter().sum();
    let mut entropy = 0.0;
    if total_demand > 0.0 {
        for &d in &demand {
            if d > 0.0 {
                let p = d / total_demand;
                entropy -= p * p.ln();
            }
        }
    }
    let spread = entropy / 5.0f64.ln();

    let reserve_match = if efficient.len() < 2 {
        0.0
    } else {
        let mut total = 0.0;
        let mut pairs = 0.0;
        for i in 0..efficient.len() {
            for j in i + 1..efficient.len() {
                total += cosine(&cost_vector(efficient[i]), &cost_vector(efficient[j]));
                pairs += 1.0;
            }
        }
        total / pairs
    };

    let support_match = cosine(&demand, &support);

    let slot_penalty = (efficient.len() as f64 - 2.0).max(0.0);

    w.dir_focus * focus + w.dir_progress * progress - w.dir_spread * spread
        + w.dir_reserve_match * reserve_match
        + w.dir_support_match * support_match
        - w.dir_slot_penalty * slot_penalty
}

/// Score a state from `root_player`'s viewpoint.
#[must_use]
pub fn evaluate(state: &GameState, root_player: usize, w: &EvalWeights) -> f64 {
    let opp = GameState::opponent_of(root_player);
    let this = &state.players[root_player];
    let enemy = &state.players[opp];

    let mut score = 0.0;

    score += w.point_self * f64::from(this.points);
    score -= w.point_opp * f64::from(enemy.points);

    score += w.gem_self * gem_total_weighted(&this.tokens);
    score -= w.gem_opp * gem_total_weighted(&enemy.tokens);

    score += w.bonus_self * f64::from(this.bonuses.colored_total());
    score -= w.bonus_opp * f64::from(enemy.bonuses.colored_total());

    score += w.reserved_self * this.reserved.len() as f64;
    score -= w.reserved_opp * enemy.reserved.len() as f64;

    score += w.noble_progress_self * noble_gap(state, root_player);
    score -= w.noble_progress_opp * noble_gap(state, opp);

    score += w.affordable_self * f64::from(count_affordable(state, root_player));
    score -= w.affordable_opp * f64::from(count_affordable(state, opp));

    score += w.efficiency * (efficiency_score(this) - efficiency_score(enemy));
    score += directional_commitment(this, w) - directional_commitment(enemy, w);

    score -= w.turn_penalty * f64::from(state.move_number);

    if is_game_over(state) {
        match winner(state) {
            Some(p) if p == root_player => score += w.win_bonus,
            Some(_) => score -= w.loss_penalty,
            None => {}
        }
    }

    score
}
