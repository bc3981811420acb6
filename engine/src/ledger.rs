//! External chip-ledger boundary.
//!
//! The table's own `chip_stack` fields are the durable record of who holds
//! what; the ledger is the external value store that is moved to match them.
//! Debits (buy-ins, top-ups) can fail and abort the operation before any
//! table state changes. Credits (cash-outs, fee transfers) are fire-and-
//! forget: once the engine has decided chips leave the table, the ledger
//! must follow.

use commonware_cryptography::ed25519::PublicKey;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("insufficient ledger balance")]
    InsufficientBalance,
    #[error("ledger unavailable")]
    Unavailable,
}

pub trait ChipLedger {
    /// Move `amount` from `identity` into the table. Called before the
    /// corresponding stack mutation; a failure rejects the operation.
    fn debit(&mut self, identity: &PublicKey, amount: u64) -> Result<(), LedgerError>;

    /// Move `amount` from the table to `identity`.
    fn credit(&mut self, identity: &PublicKey, amount: u64);

    /// Current external balance of `identity`.
    fn balance(&self, identity: &PublicKey) -> u64;
}
