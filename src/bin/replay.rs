//! Replay executable: consumes setup directives and a move script on
//! stdin, emits the JSON array of reached states on stdout.

use std::io::{stdin, stdout};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use gemrush::catalog::load_catalog;
use gemrush::referee::replay::run_replay;

#[derive(Parser, Debug)]
#[command(name = "replay", about = "Splendor replay driver")]
struct Args {
    /// Card catalog path.
    #[arg(long, default_value = "data/cards.json")]
    cards: PathBuf,

    /// Noble catalog path.
    #[arg(long, default_value = "data/nobles.json")]
    nobles: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let catalog = load_catalog(&args.cards, &args.nobles).context("failed to load game data")?;

    let result = run_replay(&catalog, stdin().lock(), stdout().lock())
        .context("replay failed")?;

    match result {
        Some(player) => log::info!("player {} wins", player + 1),
        None => log::info!("replay ended in a tie"),
    }
    Ok(())
}
