//! Error taxonomy for the whole engine.
//!
//! Errors are classified by kind, not by call site:
//!
//! - [`ParseError`]: a move line that does not match the grammar.
//! - [`RuleError`]: a well-formed move that violates the rules. The
//!   validator is total and never mutates state; a failing validation
//!   leaves the state byte-identical.
//! - [`InvariantError`]: a post-apply consistency failure. These are
//!   assertions; a correct engine never observes them.
//! - [`ProtocolError`]: a violation of the setup/REVEAL line protocol.
//! - [`DataError`]: catalog files missing or unparseable. Fatal at startup.
//! - [`WireError`]: a state line that cannot be decoded against the catalog.

use std::path::PathBuf;

use thiserror::Error;

use crate::core::{Color, Tier};

/// A move line that does not match the §4.1.1 grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty move string")]
    Empty,
    #[error("unknown move action: {0}")]
    UnknownVerb(String),
    #[error("{0} missing card id")]
    MissingCardId(&'static str),
    #[error("invalid card id: {0}")]
    BadCardId(String),
    #[error("unknown gem color: {0}")]
    UnknownColor(String),
    #[error("NOBLE missing noble id")]
    MissingNobleId,
    #[error("invalid noble id: {0}")]
    BadNobleId(String),
}

/// A structurally valid move that the rules reject.
///
/// The messages keep the referee-facing wording stable; they are part of
/// the protocol surface (they end up in `REASON:` lines).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("not your turn")]
    NotYourTurn,
    #[error("cannot specify a noble in a {0} move")]
    NobleNotAllowed(&'static str),

    // TAKE
    #[error("cannot take joker gems directly")]
    TakeJoker,
    #[error("must take at least 1 gem")]
    EmptyTake,
    #[error("not enough {0} gems in bank")]
    BankShort(Color),
    #[error("need 4+ gems in bank to take 2 of same color")]
    DoubleNeedsFour,
    #[error("must take {expected} gems when taking different colors ({available} colors available)")]
    SpreadCount { expected: i32, available: i32 },
    #[error("invalid gem taking pattern")]
    TakePattern,
    #[error("must return gems to have exactly 10 gems")]
    ReturnToTen,
    #[error("cannot return gems when holding 10 or fewer")]
    NeedlessReturn,
    #[error("cannot return more {0} gems than you have")]
    ReturnExceedsHeld(Color),

    // RESERVE
    #[error("player already has 3 reserved cards")]
    ReserveLimit,
    #[error("card {0} not found on board")]
    CardNotOnBoard(u16),
    #[error("invalid card id: {0}")]
    InvalidCardId(u16),
    #[error("the level {level} deck is empty", level = .0.level())]
    EmptyDeck(Tier),

    // BUY
    #[error("card {0} not found in board or reserved")]
    CardNotFound(u16),
    #[error("not enough {0} gems")]
    PaymentShort(Color),
    #[error("overpaying {0} gems")]
    Overpay(Color),
    #[error("not enough jokers to cover cost")]
    JokerShort,
    #[error("using too many jokers")]
    JokerExcess,
    #[error("no nobles qualify, but a noble was specified")]
    NobleNoneQualify,
    #[error("noble does not match the qualifying noble")]
    NobleMismatch,
    #[error("specified noble does not qualify")]
    NobleNotQualified,

    // REVEAL
    #[error("a REVEAL is pending; only REVEAL is accepted")]
    RevealPending,
    #[error("REVEAL command only valid in replay mode")]
    RevealNotReplay,
    #[error("no REVEAL is expected")]
    RevealNotExpected,
    #[error("card {0} is not in the expected deck")]
    RevealWrongCard(u16),
}

/// A consistency failure detected between turns.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantError {
    #[error("{0} gem conservation violated (total {1})")]
    TokenConservation(Color, i32),
    #[error("player {player} holds {held} gems (max 10)", player = .0 + 1, held = .1)]
    TokenCap(usize, i32),
    #[error("player {player} has {n} reserved cards (max 3)", player = .0 + 1, n = .1)]
    ReserveCap(usize, usize),
    #[error("card {0} appears {1} times")]
    DuplicateCard(u16, usize),
    #[error("player {player} bonuses don't match purchased cards", player = .0 + 1)]
    BonusMismatch(usize),
    #[error("player {player} has {got} points, expected {want}", player = .0 + 1, got = .1, want = .2)]
    PointsMismatch(usize, u32, u32),
    #[error("too many face-up level {level} cards: {n}", level = .0.level(), n = .1)]
    RowOverflow(Tier, usize),
    #[error("noble {0} appears {1} times")]
    DuplicateNoble(u16, usize),
    #[error("too many available nobles: {0}")]
    NobleOverflow(usize),
}

/// A violation of the setup/REVEAL line protocol (replay mode).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("unexpected end of input during setup")]
    UnexpectedEof,
    #[error("unknown setup directive: {0}")]
    UnknownDirective(String),
    #[error("unknown level: {0}")]
    UnknownLevel(String),
    #[error("unknown card id {0}")]
    UnknownCard(u16),
    #[error("unknown noble id {0}")]
    UnknownNoble(u16),
    #[error("cannot BEGIN: incomplete setup")]
    IncompleteSetup,
}

/// Catalog files missing, unparseable, or internally inconsistent.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("could not read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid catalog JSON")]
    Syntax(#[from] serde_json::Error),
    #[error("unknown color name: {0}")]
    UnknownColor(String),
    #[error("card id {0} outside the 1..=90 range")]
    CardIdRange(u16),
    #[error("card {0} has invalid level {1}")]
    BadLevel(u16, u8),
    #[error("duplicate card id {0}")]
    DuplicateCard(u16),
    #[error("duplicate noble id {0}")]
    DuplicateNoble(u16),
    #[error("no {0} loaded")]
    Empty(&'static str),
}

/// A state line that cannot be decoded against the catalog.
#[derive(Debug, Error)]
pub enum WireError {
    #[error("malformed state line")]
    Json(#[from] serde_json::Error),
    #[error("unknown card id {0} in view")]
    UnknownCard(u16),
    #[error("unknown noble id {0} in view")]
    UnknownNoble(u16),
}

/// Fatal referee failures (distinct from in-game faults, which settle the
/// game in the opponent's favor and are not errors).
#[derive(Debug, Error)]
pub enum RefereeError {
    #[error(transparent)]
    Data(#[from] DataError),
    #[error("invariant violation after apply: {0}")]
    Invariant(#[from] InvariantError),
    #[error("failed to apply validated move: {0}")]
    Apply(RuleError),
    #[error(transparent)]
    Wire(#[from] WireError),
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
