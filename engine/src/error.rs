use holdem_types::TablePhase;
use thiserror::Error;

use crate::ledger::LedgerError;

/// Errors returned by entry operations. Validation and state errors leave
/// the table unchanged; the caller is informed synchronously.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("seat index {0} out of range")]
    InvalidSeat(usize),
    #[error("seat {0} is occupied")]
    SeatOccupied(usize),
    #[error("identity already seated at this table")]
    AlreadySeated,
    #[error("player is not seated")]
    NotSeated,
    #[error("buy-in {amount} outside [{min}, {max}]")]
    BuyInOutOfRange { amount: u64, min: u64, max: u64 },
    #[error("operation illegal in {0:?} phase")]
    WrongPhase(TablePhase),
    #[error("seat is dealt into the current hand")]
    HandInProgress,
    #[error("need at least {0} funded players")]
    NotEnoughPlayers(usize),
    #[error("not a participant in this hand")]
    NotInHand,
    #[error("commitment already recorded")]
    AlreadyCommitted,
    #[error("invalid commitment length {0}")]
    InvalidCommitLength(usize),
    #[error("secret already revealed")]
    AlreadyRevealed,
    #[error("invalid secret length {0}")]
    InvalidSecretLength(usize),
    #[error("no commitment on record")]
    MissingCommit,
    #[error("reveal does not match commitment")]
    CommitMismatch,
    #[error("deadline has passed")]
    DeadlineElapsed,
    #[error("acting out of turn")]
    OutOfTurn,
    #[error("seat cannot act")]
    CannotAct,
    #[error("cannot check facing a bet")]
    CannotCheck,
    #[error("raise to {target} below minimum {min}")]
    RaiseBelowMinimum { target: u64, min: u64 },
    #[error("insufficient stack (have {stack}, need {needed})")]
    InsufficientStack { stack: u64, needed: u64 },
    #[error("straddle not available")]
    StraddleUnavailable,
    #[error("unauthorized")]
    Unauthorized,
    #[error("expected 7 cards, got {0}")]
    InvalidCardCount(usize),
    #[error("card {0} out of range")]
    InvalidCard(u8),
    #[error("duplicate card {0}")]
    DuplicateCard(u8),
    #[error("invalid internal state: {0}")]
    InternalState(&'static str),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}
