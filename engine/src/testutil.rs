//! Shared fixtures for the crate-level scenario tests.

use commonware_cryptography::ed25519::PublicKey;

use holdem_types::poker::SEED_LEN;
use holdem_types::{SeatStatus, Table, TableConfig, TablePhase};

use crate::error::TableError;
use crate::mocks::{create_account_keypair, test_entropy, MockLedger};
use crate::{seats, shuffle, table as hand};

/// Per-seat ledger balance before any buy-in.
pub const BANKROLL: u64 = 10_000;

/// Deterministic per-seat reveal secret.
pub fn secret(seat: usize) -> Vec<u8> {
    vec![0x40 + seat as u8; 24]
}

pub fn entropy() -> [u8; SEED_LEN] {
    test_entropy(7)
}

/// A table with `stacks.len()` players seated in order, blinds 5/10.
pub fn setup(
    stacks: &[u64],
    fee_collector: Option<PublicKey>,
) -> (Table, MockLedger, Vec<PublicKey>) {
    let admin = create_account_keypair(0).1;
    let mut config = TableConfig::new(admin, 5, 10);
    config.min_buy_in = 50;
    config.fee_collector = fee_collector;
    let mut table = Table::new(config);

    let players: Vec<PublicKey> = (0..stacks.len())
        .map(|s| create_account_keypair(s as u64 + 1).1)
        .collect();
    let mut ledger =
        MockLedger::with_balances(players.iter().map(|p| (p.clone(), BANKROLL)));
    for (s, (player, &stack)) in players.iter().zip(stacks).enumerate() {
        seats::join_table(&mut table, player, s, stack, &mut ledger)
            .expect("join succeeds");
    }
    (table, ledger, players)
}

/// Start a hand and walk every participant through commit and reveal,
/// leaving the table at the preflop street.
pub fn drive_to_preflop(
    table: &mut Table,
    players: &[PublicKey],
    ledger: &mut MockLedger,
    now: u64,
) -> Result<(), TableError> {
    hand::start_hand(table, now)?;
    drive_commit_reveal(table, players, ledger, now)
}

/// Walk every active seat through commit and reveal on an open hand.
pub fn drive_commit_reveal(
    table: &mut Table,
    players: &[PublicKey],
    ledger: &mut MockLedger,
    now: u64,
) -> Result<(), TableError> {
    for (s, player) in players.iter().enumerate() {
        if table.phase == TablePhase::Commit && table.seats[s].status == SeatStatus::Active {
            let commitment = shuffle::compute_commit(&secret(s));
            hand::submit_commit(table, player, &commitment, now + 1)?;
        }
    }
    for (s, player) in players.iter().enumerate() {
        if table.phase == TablePhase::Reveal && table.seats[s].status == SeatStatus::Active {
            hand::reveal_secret(table, player, &secret(s), now + 2, &entropy(), ledger)?;
        }
    }
    Ok(())
}
