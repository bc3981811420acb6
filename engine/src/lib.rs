//! Hold'em table engine.
//!
//! This crate contains the deterministic state-transition logic for a
//! five-seat no-limit hold'em table: commit-reveal shuffling, encrypted hole
//! cards, four betting streets, side-pot settlement, and a fractional rake
//! accumulator. Every entry operation is a synchronous function over the
//! [`holdem_types::Table`] aggregate that either mutates it and returns the
//! emitted events, or rejects with a [`TableError`] leaving the table
//! untouched.
//!
//! ## Determinism requirements
//! - Do not use wall-clock time inside the engine; time is the caller's
//!   `now` view number.
//! - Do not use ambient randomness; the shuffle seed is derived from the
//!   seats' revealed secrets plus a caller-supplied 32-byte entropy value
//!   (derived from chain height, never from a timestamp).
//! - Avoid iteration order of hash-based collections influencing outputs;
//!   all seat scans are in fixed seat order.
//!
//! ## Concurrency model
//! One table is advanced by one caller at a time; the engine introduces no
//! threading of its own. Distinct tables share nothing.

mod cards;

pub mod actions;
pub mod control;
pub mod error;
pub mod evaluator;
pub mod fees;
pub mod ledger;
pub mod pot;
pub mod queries;
pub mod seats;
pub mod shuffle;
pub mod table;

#[cfg(any(test, feature = "mocks"))]
pub mod mocks;

#[cfg(test)]
mod testutil;
#[cfg(test)]
mod timeout_tests;

pub use actions::{all_in, call, check, fold, raise_to, straddle};
pub use control::{emergency_abort, handle_timeout};
pub use error::TableError;
pub use evaluator::{evaluate_seven, HandCategory, HandRank};
pub use ledger::{ChipLedger, LedgerError};
pub use seats::{join_table, leave_table, sit_in, sit_out, top_up};
pub use table::{reveal_secret, start_hand, submit_commit};
