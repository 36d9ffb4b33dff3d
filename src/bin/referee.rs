//! Referee executable: arbitrates one game between two engines attached
//! via stdin/stdout.

use std::io::{stdin, stdout};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use gemrush::catalog::load_catalog;
use gemrush::referee::{run_game, RefereeConfig};

#[derive(Parser, Debug)]
#[command(name = "referee", about = "Two-player Splendor referee")]
struct Args {
    /// Shuffle seed; 0 picks a wall-clock seed.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Card catalog path.
    #[arg(long, default_value = "data/cards.json")]
    cards: PathBuf,

    /// Noble catalog path.
    #[arg(long, default_value = "data/nobles.json")]
    nobles: PathBuf,

    /// Game log path.
    #[arg(long, default_value = "game.log")]
    log: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let catalog = load_catalog(&args.cards, &args.nobles).context("failed to load game data")?;

    let config = RefereeConfig {
        seed: args.seed,
        log_path: Some(args.log),
        ..RefereeConfig::default()
    };

    run_game(&catalog, &config, stdin().lock(), stdout().lock())
        .context("referee failed")?;
    Ok(())
}
