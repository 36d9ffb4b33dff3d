//! Engine executable: reads view lines from the referee on stdin and
//! answers move lines on stdout.

use std::io::{stdin, stdout, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use gemrush::catalog::load_catalog;
use gemrush::engine::{Engine, MctsEngine, RandomEngine};
use gemrush::eval::EvalWeights;
use gemrush::search::SearchConfig;

#[derive(Parser, Debug)]
#[command(name = "engine", about = "Splendor playing engine")]
struct Args {
    /// Total simulations per decision.
    #[arg(long, default_value_t = 3000)]
    sims: u32,

    /// Search seed; 0 picks a wall-clock seed.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Simulation depth cap.
    #[arg(long, default_value_t = 18)]
    max_depth: u32,

    /// Determinizations per decision.
    #[arg(long, default_value_t = 8)]
    det: u32,

    /// Risk aversion lambda for root aggregation.
    #[arg(long, default_value_t = 0.30)]
    risk_lambda: f64,

    /// PUCT exploration constant.
    #[arg(long, default_value_t = 1.25)]
    c_puct: f64,

    /// Play uniformly random legal moves instead of searching.
    #[arg(long)]
    random: bool,

    /// Card catalog path.
    #[arg(long, default_value = "data/cards.json")]
    cards: PathBuf,

    /// Noble catalog path.
    #[arg(long, default_value = "data/nobles.json")]
    nobles: PathBuf,

    /// Positional evaluation-weight overrides, in tuning-script order.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    weights: Vec<f64>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let catalog = load_catalog(&args.cards, &args.nobles).context("failed to load game data")?;

    let mut engine: Box<dyn Engine> = if args.random {
        Box::new(RandomEngine::new(catalog, args.seed))
    } else {
        let config = SearchConfig {
            simulations: args.sims.max(1),
            c_puct: args.c_puct,
            max_depth: args.max_depth.max(1),
            determinizations: args.det.max(1),
            risk_lambda: args.risk_lambda,
            seed: args.seed,
        };
        let mut weights = EvalWeights::default();
        for (index, value) in args.weights.iter().take(20).enumerate() {
            weights.apply_override(index, *value);
        }
        Box::new(MctsEngine::new(catalog, config, weights))
    };

    let stdin = stdin();
    let mut stdout = stdout().lock();
    for line in stdin.lock().lines() {
        let line = line.context("failed to read view line")?;
        if line.is_empty() {
            continue;
        }
        if let Some(reply) = engine.respond(&line) {
            writeln!(stdout, "{reply}")?;
            stdout.flush()?;
        }
    }
    Ok(())
}
