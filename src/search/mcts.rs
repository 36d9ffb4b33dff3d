//! Information-set MCTS over determinized worlds.
//!
//! One decision runs `determinizations` independent single-world
//! searches, each with `simulations / determinizations` simulations,
//! then aggregates root actions across worlds: total visits first, then
//! the risk-adjusted mean, then the lexicographic order of the move's
//! textual form.

use std::collections::BTreeMap;

use crate::belief::BeliefSampler;
use crate::core::{GameRng, GameState};
use crate::eval::{evaluate, EvalWeights};
use crate::rules::{apply_move, is_game_over, legal_moves, Move};

use super::config::SearchConfig;
use super::tree::{Node, NodeId, SearchTree};

/// Scale of the tanh squash applied to raw evaluator scores.
const VALUE_SCALE: f64 = 120.0;
/// Tie tolerance for PUCT scores and aggregate comparisons.
const TIE_EPSILON: f64 = 1e-12;

/// Statistics for one root action inside a single world.
#[derive(Clone, Debug)]
struct RootAction {
    mv: Move,
    visits: u32,
    mean: f64,
}

/// Cross-world accumulation for one distinct root action.
#[derive(Clone, Debug)]
struct Aggregate {
    mv: Move,
    total_visits: u32,
    weighted_sum: f64,
    weighted_n: u32,
    world_means: Vec<f64>,
}

/// Squash a raw evaluator score into [-1, 1] for backup.
fn squash(raw: f64) -> f64 {
    (raw / VALUE_SCALE).tanh().clamp(-1.0, 1.0)
}

/// Population standard deviation.
fn stdev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}

/// PUCT child selection with a minimax sign flip relative to the root
/// player and a uniform random tie-break.
fn select_child_puct(
    tree: &SearchTree,
    node_id: NodeId,
    c_puct: f64,
    root_player: usize,
    rng: &mut GameRng,
) -> Option<NodeId> {
    let node = tree.get(node_id);
    let parent_scale = (f64::from(node.visits) + 1.0).sqrt();

    let mut best_score = f64::NEG_INFINITY;
    let mut best: Vec<NodeId> = Vec::new();

    for &child_id in &node.children {
        let child = tree.get(child_id);
        let q = child.mean_value();
        let q_for_player = if node.to_move == root_player { q } else { -q };
        let u = c_puct * child.prior * parent_scale / (1.0 + f64::from(child.visits));
        let score = q_for_player + u;

        if score > best_score + TIE_EPSILON {
            best_score = score;
            best.clear();
            best.push(child_id);
        } else if (score - best_score).abs() <= TIE_EPSILON {
            best.push(child_id);
        }
    }

    match best.len() {
        0 => None,
        1 => Some(best[0]),
        n => Some(best[rng.index(n)]),
    }
}

/// Run a single-world tree search and report the root children.
fn run_world(
    root_state: &GameState,
    root_player: usize,
    sims: u32,
    cfg: &SearchConfig,
    weights: &EvalWeights,
    rng: &mut GameRng,
) -> Vec<RootAction> {
    let mut tree = SearchTree::new(Node::root(
        root_state.current_player,
        legal_moves(root_state),
    ));

    for _ in 0..sims {
        let mut state = root_state.clone();
        let mut node_id = tree.root();
        let mut depth = 0u32;
        let mut path = vec![node_id];

        loop {
            if is_game_over(&state) || depth >= cfg.max_depth {
                break;
            }

            let untried_len = tree.get(node_id).untried.len();
            if untried_len > 0 {
                // Expansion: try a uniformly random untried move. An
                // apply failure ends the simulation at this state.
                let pick = rng.index(untried_len);
                let mv = tree.get_mut(node_id).untried.swap_remove(pick);

                if apply_move(&mut state, &mv).is_err() {
                    break;
                }

                let child = Node::child(node_id, mv, state.current_player, legal_moves(&state));
                let child_id = tree.alloc(child);
                tree.get_mut(node_id).children.push(child_id);

                path.push(child_id);
                break;
            }

            if tree.get(node_id).children.is_empty() {
                break;
            }

            let Some(child_id) = select_child_puct(&tree, node_id, cfg.c_puct, root_player, rng)
            else {
                break;
            };
            let mv = tree
                .get(child_id)
                .move_from_parent
                .clone()
                .expect("non-root node has a move");
            if apply_move(&mut state, &mv).is_err() {
                break;
            }

            node_id = child_id;
            path.push(node_id);
            depth += 1;
        }

        // Heavy playout: the leaf value is the squashed linear
        // evaluation of the reached state.
        let value = squash(evaluate(&state, root_player, weights));
        for id in path {
            let node = tree.get_mut(id);
            node.visits += 1;
            node.value_sum += value;
        }
    }

    let root = tree.get(tree.root());
    let mut out: Vec<RootAction> = root
        .children
        .iter()
        .map(|&id| {
            let child = tree.get(id);
            RootAction {
                mv: child
                    .move_from_parent
                    .clone()
                    .expect("root child has a move"),
                visits: child.visits,
                mean: child.mean_value(),
            }
        })
        .collect();

    if out.is_empty() {
        // Degenerate world: surface the first legal move.
        if let Some(mv) = legal_moves(root_state).into_iter().next() {
            out.push(RootAction {
                mv,
                visits: 1,
                mean: 0.0,
            });
        }
    }
    out
}

/// Choose a move for `root_player` from an observed (redacted) state.
///
/// The belief sampler fills in hidden information once per
/// determinization; the search RNG comes from `cfg.seed`.
#[must_use]
pub fn select_move(
    observed: &GameState,
    root_player: usize,
    cfg: &SearchConfig,
    weights: &EvalWeights,
    belief: &mut BeliefSampler,
) -> Move {
    let fallback = || {
        legal_moves(observed)
            .into_iter()
            .next()
            .unwrap_or_else(|| Move::pass(root_player))
    };

    if cfg.simulations == 0 {
        return fallback();
    }

    let mut rng = GameRng::new(cfg.seed);
    let det_count = cfg.determinizations.max(1);
    let sims_per_world = (cfg.simulations / det_count).max(1);

    // Keyed by textual form so the final tie-break is the key order of
    // the map itself.
    let mut by_move: BTreeMap<String, Aggregate> = BTreeMap::new();

    for _ in 0..det_count {
        let world = belief.sample(observed, root_player);
        for result in run_world(&world, root_player, sims_per_world, cfg, weights, &mut rng) {
            let key = result.mv.to_string();
            let entry = by_move.entry(key).or_insert_with(|| Aggregate {
                mv: result.mv.clone(),
                total_visits: 0,
                weighted_sum: 0.0,
                weighted_n: 0,
                world_means: Vec::new(),
            });
            let weight = result.visits.max(1);
            entry.total_visits += result.visits;
            entry.weighted_sum += result.mean * f64::from(weight);
            entry.weighted_n += weight;
            entry.world_means.push(result.mean);
        }
    }

    let mut best: Option<(&Aggregate, u32, f64)> = None;
    for aggregate in by_move.values() {
        let mean = if aggregate.weighted_n > 0 {
            aggregate.weighted_sum / f64::from(aggregate.weighted_n)
        } else {
            0.0
        };
        let conservative = mean - cfg.risk_lambda * stdev(&aggregate.world_means);

        let better = match best {
            None => true,
            Some((_, best_visits, best_score)) => {
                aggregate.total_visits > best_visits
                    || (aggregate.total_visits == best_visits
                        && conservative > best_score + TIE_EPSILON)
                // Equal visits and score: the BTreeMap iteration order
                // already settled the lexicographic tie.
            }
        };
        if better {
            best = Some((aggregate, aggregate.total_visits, conservative));
        }
    }

    match best {
        Some((aggregate, _, _)) => aggregate.mv.clone(),
        None => fallback(),
    }
}
