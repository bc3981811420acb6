//! Common types used throughout the hold'em table engine.
//!
//! Everything in this crate is pure data: the table aggregate, its
//! configuration, and the structured event log, together with their wire
//! codecs. The state-transition logic lives in `holdem-engine`.

pub mod poker;

pub use poker::{
    Seat, SeatStatus, Table, TableConfig, TableEvent, TablePhase,
};
