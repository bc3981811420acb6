//! Timeout enforcement scenarios: forced folds, penalties, aborts, and the
//! idempotency guarantee that calling `handle_timeout` with no elapsed
//! deadline changes nothing.

use holdem_types::poker::TableEvent;
use holdem_types::{SeatStatus, TablePhase};

use crate::error::TableError;
use crate::ledger::ChipLedger;
use crate::mocks::create_account_keypair;
use crate::testutil::{drive_commit_reveal, drive_to_preflop, entropy, secret, setup};
use crate::{actions, control, shuffle, table as hand};

#[test]
fn test_timeout_is_a_noop_before_any_deadline() {
    let (mut table, mut ledger, _players) = setup(&[1_000, 1_000, 1_000], None);
    hand::start_hand(&mut table, 10).unwrap();
    assert_eq!(table.commit_deadline, 40);

    let before = table.clone();
    let events = control::handle_timeout(&mut table, 39, &entropy(), &mut ledger).unwrap();
    assert!(events.is_empty());
    assert_eq!(table, before);
}

#[test]
fn test_commit_timeout_drops_silent_seats_and_continues() {
    let (mut table, mut ledger, players) = setup(&[1_000, 1_000, 1_000], None);
    hand::start_hand(&mut table, 10).unwrap();
    for s in 0..2 {
        let commitment = shuffle::compute_commit(&secret(s));
        hand::submit_commit(&mut table, &players[s], &commitment, 11).unwrap();
    }

    let events = control::handle_timeout(&mut table, 40, &entropy(), &mut ledger).unwrap();
    assert_eq!(table.phase, TablePhase::Reveal);
    assert_eq!(table.seats[2].status, SeatStatus::Waiting);
    assert!(table.seats[2].sitting_out);
    assert!(events
        .iter()
        .any(|e| matches!(e, TableEvent::SeatTimedOut { seat: 2, .. })));

    // The two committed seats finish the hand without the no-show.
    drive_commit_reveal(&mut table, &players, &mut ledger, 40).unwrap();
    assert_eq!(table.phase, TablePhase::PreFlop);
    assert!(table.seats[2].hole_ciphertext.is_empty());
}

#[test]
fn test_commit_timeout_aborts_below_quorum() {
    let (mut table, mut ledger, players) = setup(&[1_000, 1_000, 1_000], None);
    hand::start_hand(&mut table, 10).unwrap();
    let commitment = shuffle::compute_commit(&secret(0));
    hand::submit_commit(&mut table, &players[0], &commitment, 11).unwrap();

    let events = control::handle_timeout(&mut table, 40, &entropy(), &mut ledger).unwrap();
    assert!(events
        .iter()
        .any(|e| matches!(e, TableEvent::HandAborted { .. })));
    assert_eq!(table.phase, TablePhase::Waiting);
    assert_eq!(table.hand_number, 1);
    assert_eq!(table.chips_on_table(), 3_000);
}

#[test]
fn test_reveal_timeout_penalizes_and_hand_proceeds() {
    let collector = create_account_keypair(90).1;
    let (mut table, mut ledger, players) =
        setup(&[1_000, 1_000, 1_000], Some(collector.clone()));
    hand::start_hand(&mut table, 10).unwrap();
    for (s, player) in players.iter().enumerate() {
        let commitment = shuffle::compute_commit(&secret(s));
        hand::submit_commit(&mut table, player, &commitment, 11).unwrap();
    }
    // Only two of three reveal in time.
    hand::reveal_secret(&mut table, &players[0], &secret(0), 12, &entropy(), &mut ledger)
        .unwrap();
    hand::reveal_secret(&mut table, &players[1], &secret(1), 13, &entropy(), &mut ledger)
        .unwrap();

    let deadline = table.reveal_deadline;
    let events =
        control::handle_timeout(&mut table, deadline, &entropy(), &mut ledger).unwrap();

    // 10% of the 1,000 stack is forfeited and the hand continues two-handed.
    assert!(events.iter().any(|e| matches!(
        e,
        TableEvent::RevealPenalty {
            seat: 2,
            amount: 100,
            ..
        }
    )));
    assert_eq!(table.seats[2].chip_stack, 900);
    assert!(table.seats[2].sitting_out);
    assert_eq!(ledger.balance(&collector), 100);
    assert_eq!(table.phase, TablePhase::PreFlop);
    assert!(!table.seats[0].hole_ciphertext.is_empty());
    assert!(!table.seats[1].hole_ciphertext.is_empty());
    assert!(table.seats[2].hole_ciphertext.is_empty());
    // Conservation modulo the ledger-visible penalty.
    assert_eq!(table.chips_on_table(), 2_900);
}

#[test]
fn test_reveal_timeout_aborts_below_quorum() {
    let collector = create_account_keypair(90).1;
    let (mut table, mut ledger, players) = setup(&[1_000, 1_000], Some(collector.clone()));
    hand::start_hand(&mut table, 10).unwrap();
    for (s, player) in players.iter().enumerate() {
        let commitment = shuffle::compute_commit(&secret(s));
        hand::submit_commit(&mut table, player, &commitment, 11).unwrap();
    }
    hand::reveal_secret(&mut table, &players[0], &secret(0), 12, &entropy(), &mut ledger)
        .unwrap();

    let deadline = table.reveal_deadline;
    let events =
        control::handle_timeout(&mut table, deadline, &entropy(), &mut ledger).unwrap();
    assert!(events
        .iter()
        .any(|e| matches!(e, TableEvent::HandAborted { .. })));
    assert_eq!(table.phase, TablePhase::Waiting);
    assert_eq!(table.seats[1].chip_stack, 900);
    assert_eq!(ledger.balance(&collector), 100);
    assert_eq!(table.chips_on_table(), 2_900);
}

#[test]
fn test_action_timeout_forces_a_fold() {
    let (mut table, mut ledger, players) = setup(&[1_000, 1_000, 1_000], None);
    drive_to_preflop(&mut table, &players, &mut ledger, 10).unwrap();
    let acting = table.action_on as usize;
    let deadline = table.action_deadline;

    let events =
        control::handle_timeout(&mut table, deadline, &entropy(), &mut ledger).unwrap();
    assert_eq!(table.seats[acting].status, SeatStatus::Folded);
    assert!(events
        .iter()
        .any(|e| matches!(e, TableEvent::SeatTimedOut { .. })));
    // The turn moved on with a fresh window.
    assert_ne!(table.action_on as usize, acting);
    assert!(table.action_deadline > deadline);

    // A late action from the folded seat is rejected.
    assert_eq!(
        actions::check(&mut table, &players[acting], deadline + 1, &mut ledger),
        Err(TableError::CannotAct)
    );
}

#[test]
fn test_handle_timeout_is_idempotent() {
    let (mut table, mut ledger, players) = setup(&[1_000, 1_000, 1_000], None);
    drive_to_preflop(&mut table, &players, &mut ledger, 10).unwrap();
    let deadline = table.action_deadline;

    let first =
        control::handle_timeout(&mut table, deadline, &entropy(), &mut ledger).unwrap();
    assert!(!first.is_empty());

    // Same clock, no new elapsed deadline: nothing changes.
    let before = table.clone();
    let second =
        control::handle_timeout(&mut table, deadline, &entropy(), &mut ledger).unwrap();
    assert!(second.is_empty());
    assert_eq!(table, before);
}
