//! Test helpers: deterministic keypairs, entropy values, and an in-memory
//! chip ledger.

use std::collections::BTreeMap;

use commonware_cryptography::{
    ed25519::{PrivateKey, PublicKey},
    Signer,
};
use commonware_math::algebra::Random;
use rand::{rngs::StdRng, SeedableRng};

use crate::ledger::{ChipLedger, LedgerError};
use holdem_types::poker::SEED_LEN;

/// Creates an account keypair for Ed25519 signatures used by players.
pub fn create_account_keypair(seed: u64) -> (PrivateKey, PublicKey) {
    let mut rng = StdRng::seed_from_u64(seed);
    let private = PrivateKey::random(&mut rng);
    let public = private.public_key();
    (private, public)
}

/// Deterministic stand-in for the chain-height-derived entropy input.
pub fn test_entropy(tag: u64) -> [u8; SEED_LEN] {
    let mut entropy = [0u8; SEED_LEN];
    entropy[..8].copy_from_slice(&tag.to_be_bytes());
    entropy
}

/// In-memory chip ledger backing the tables under test.
#[derive(Debug, Default)]
pub struct MockLedger {
    balances: BTreeMap<PublicKey, u64>,
}

impl MockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the ledger with starting balances.
    pub fn with_balances(balances: impl IntoIterator<Item = (PublicKey, u64)>) -> Self {
        Self {
            balances: balances.into_iter().collect(),
        }
    }

    /// Total value held across all accounts.
    pub fn total(&self) -> u64 {
        self.balances.values().sum()
    }
}

impl ChipLedger for MockLedger {
    fn debit(&mut self, identity: &PublicKey, amount: u64) -> Result<(), LedgerError> {
        let balance = self
            .balances
            .get_mut(identity)
            .ok_or(LedgerError::InsufficientBalance)?;
        if *balance < amount {
            return Err(LedgerError::InsufficientBalance);
        }
        *balance -= amount;
        Ok(())
    }

    fn credit(&mut self, identity: &PublicKey, amount: u64) {
        let balance = self.balances.entry(identity.clone()).or_insert(0);
        *balance = balance.saturating_add(amount);
    }

    fn balance(&self, identity: &PublicKey) -> u64 {
        self.balances.get(identity).copied().unwrap_or(0)
    }
}
