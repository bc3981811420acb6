//! Poker domain types.
//!
//! Defines the table aggregate, seat and phase state, table configuration, and
//! the structured event log emitted by the engine.

mod codec;
mod config;
mod constants;
mod events;
mod table;

pub use codec::read_optional_bytes;
pub use config::TableConfig;
pub use constants::*;
pub use events::{AbortReason, BlindKind, PlayerAction, TableEvent, TimeoutKind};
pub use table::{Seat, SeatStatus, Table, TableInvariantError, TablePhase};

#[cfg(test)]
mod tests;
