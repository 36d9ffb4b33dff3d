//! The arbiter: owns the authoritative state, administers time banks,
//! enforces the protocol, and settles the game.
//!
//! The loop is generic over its line I/O so whole games run against
//! in-memory pipes in tests. Diagnostics go through `log`; the wire only
//! ever carries state lines and the terminal report.

pub mod replay;
pub mod setup;

use std::fmt::Write as _;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

use log::{error, info};

use crate::catalog::Catalog;
use crate::core::{GameRng, GameState, INITIAL_TIME_BANK, TIME_INCREMENT};
use crate::error::RefereeError;
use crate::rules::{apply_move, check_state, is_game_over, validate_move, winner, Move};
use crate::wire::encode_state;

/// Referee configuration.
#[derive(Clone, Debug)]
pub struct RefereeConfig {
    /// Shuffle seed; 0 resolves to wall-clock seconds.
    pub seed: u64,
    /// Starting time bank per player, in seconds.
    pub time_bank: f64,
    /// Per-move increment, in seconds.
    pub increment: f64,
    /// Where to flush the buffered game log; `None` disables it.
    pub log_path: Option<PathBuf>,
}

impl Default for RefereeConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            time_bank: INITIAL_TIME_BANK,
            increment: TIME_INCREMENT,
            log_path: Some(PathBuf::from("game.log")),
        }
    }
}

/// How a game ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameOutcome {
    /// A decisive finish; `reason` is set on faults (timeout, invalid
    /// move, disconnect).
    Winner {
        player: usize,
        reason: Option<String>,
    },
    /// A draw.
    Draw,
}

/// Resolve a seed of 0 to wall-clock seconds.
fn resolve_seed(seed: u64) -> u64 {
    if seed != 0 {
        return seed;
    }
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(1)
}

/// Write both per-player views, in order, then flush.
fn broadcast<W: Write>(state: &GameState, output: &mut W) -> Result<(), RefereeError> {
    writeln!(output, "{}", encode_state(state, 1)?)?;
    writeln!(output, "{}", encode_state(state, 2)?)?;
    output.flush()?;
    Ok(())
}

/// A fault against `offender`: the opponent wins with a reason.
fn fault(log_buf: &mut String, offender: usize, reason: String) -> GameOutcome {
    error!("{reason}");
    let _ = writeln!(log_buf, "ERROR: {reason}");
    let _ = writeln!(
        log_buf,
        "Game Result: Player {} wins! ({reason})",
        GameState::opponent_of(offender) + 1
    );
    GameOutcome::Winner {
        player: GameState::opponent_of(offender),
        reason: Some(reason),
    }
}

/// Run one complete game between two engines on the other end of the
/// line streams. Returns the outcome; fatal errors (data, invariants,
/// I/O) bubble up and the caller exits non-zero.
pub fn run_game<R: BufRead, W: Write>(
    catalog: &Catalog,
    config: &RefereeConfig,
    mut input: R,
    mut output: W,
) -> Result<GameOutcome, RefereeError> {
    let seed = resolve_seed(config.seed);
    let mut rng = GameRng::new(seed);

    let mut state = GameState::deal(catalog, &mut rng);
    for player in &mut state.players {
        player.time_bank = config.time_bank;
    }
    check_state(&state)?;
    info!("game initialized with seed {seed}");

    let mut log_buf = String::new();
    let _ = writeln!(log_buf, "Seed: {seed}");
    let _ = writeln!(log_buf, "Initial State: {}", encode_state(&state, 0)?);

    broadcast(&state, &mut output)?;

    let outcome = loop {
        if is_game_over(&state) {
            break match winner(&state) {
                Some(player) => GameOutcome::Winner {
                    player,
                    reason: None,
                },
                None => GameOutcome::Draw,
            };
        }

        let current = state.current_player;
        info!(
            "waiting for player {} (bank {:.3}s)",
            current + 1,
            state.players[current].time_bank
        );

        let started = Instant::now();
        let mut line = String::new();
        let bytes = input.read_line(&mut line)?;
        let elapsed = started.elapsed().as_secs_f64();

        if bytes == 0 {
            break fault(
                &mut log_buf,
                current,
                format!("Player {} disconnected (end of input)", current + 1),
            );
        }

        // Subtract-before-add accounting: the increment only helps
        // players who answered in time.
        state.players[current].time_bank -= elapsed;
        if state.players[current].time_bank < 0.0 {
            break fault(
                &mut log_buf,
                current,
                format!(
                    "Player {} timed out ({:.3}s)",
                    current + 1,
                    state.players[current].time_bank
                ),
            );
        }
        state.players[current].time_bank += config.increment;

        let line = line.trim_end();
        info!("player {} sent {line:?} ({elapsed:.3}s)", current + 1);
        let _ = writeln!(log_buf, "Player {}: {line}", current + 1);

        if line.starts_with("REVEAL") {
            break fault(
                &mut log_buf,
                current,
                format!(
                    "Player {} made invalid move (REVEAL command only valid in replay mode)",
                    current + 1
                ),
            );
        }

        let mv = match Move::parse(line, current) {
            Ok(mv) => mv,
            Err(err) => {
                break fault(
                    &mut log_buf,
                    current,
                    format!("Player {} made invalid move ({err})", current + 1),
                );
            }
        };
        if let Err(err) = validate_move(&state, &mv) {
            break fault(
                &mut log_buf,
                current,
                format!("Player {} made invalid move ({err})", current + 1),
            );
        }

        apply_move(&mut state, &mv).map_err(RefereeError::Apply)?;
        let _ = writeln!(log_buf, "Post-Move State: {}", encode_state(&state, 0)?);

        // A rules-core slip is an internal fault, never a player fault.
        check_state(&state)?;

        if !is_game_over(&state) {
            broadcast(&state, &mut output)?;
        }
    };

    match &outcome {
        GameOutcome::Winner { player, reason } => {
            writeln!(output, "WINNER: Player {}", player + 1)?;
            if let Some(reason) = reason {
                writeln!(output, "REASON: {reason}")?;
            } else {
                let _ = writeln!(log_buf, "WINNER: Player {}", player + 1);
            }
        }
        GameOutcome::Draw => {
            writeln!(output, "RESULT: TIE")?;
            let _ = writeln!(log_buf, "RESULT: TIE");
        }
    }
    // Engines replay the game from the seed once it no longer leaks
    // hidden information.
    writeln!(output, "SEED: {seed}")?;
    output.flush()?;

    let _ = writeln!(
        log_buf,
        "Final Scores - P1: {}, P2: {}",
        state.players[0].points, state.players[1].points
    );

    if let Some(path) = &config.log_path {
        std::fs::write(path, &log_buf)?;
    }

    Ok(outcome)
}
