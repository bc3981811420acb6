//! Timeout enforcement and the admin escape hatch.
//!
//! `handle_timeout` is callable by any party and is idempotent: when no
//! deadline has elapsed it is a strict no-op. Timeout faults are never left
//! pending for a user to clean up; each one resolves into a forced fold, a
//! penalty, or an abort with refunds.

use commonware_cryptography::ed25519::PublicKey;

use holdem_types::poker::{
    AbortReason, PlayerAction, TableEvent, TimeoutKind, BPS_DENOMINATOR, MAX_SEATS, MIN_PLAYERS,
    REVEAL_PENALTY_BPS, SEED_LEN,
};
use holdem_types::{SeatStatus, Table, TablePhase};

use crate::actions::after_action;
use crate::error::TableError;
use crate::ledger::ChipLedger;
use crate::table::{abort_hand, deal_hand, enter_reveal};

/// Enforce whichever deadline has elapsed, if any.
pub fn handle_timeout(
    table: &mut Table,
    now: u64,
    entropy: &[u8; SEED_LEN],
    ledger: &mut dyn ChipLedger,
) -> Result<Vec<TableEvent>, TableError> {
    let mut events = Vec::new();
    match table.phase {
        TablePhase::Commit if now >= table.commit_deadline => {
            commit_timeout(table, now, &mut events, ledger);
        }
        TablePhase::Reveal if now >= table.reveal_deadline => {
            reveal_timeout(table, now, entropy, &mut events, ledger)?;
        }
        phase if phase.is_betting() && now >= table.action_deadline => {
            action_timeout(table, now, &mut events, ledger)?;
        }
        _ => {}
    }
    Ok(events)
}

/// Seats that never committed sit out; the hand continues if enough remain.
fn commit_timeout(
    table: &mut Table,
    now: u64,
    events: &mut Vec<TableEvent>,
    ledger: &mut dyn ChipLedger,
) {
    for s in 0..MAX_SEATS {
        let seat = &mut table.seats[s];
        if seat.status != SeatStatus::Active || !seat.commit.is_empty() {
            continue;
        }
        seat.status = SeatStatus::Waiting;
        seat.sitting_out = true;
        events.push(TableEvent::SeatTimedOut {
            hand_number: table.hand_number,
            seat: s as u8,
            kind: TimeoutKind::Commit,
        });
        tracing::warn!(hand = table.hand_number, seat = s, "commit timeout");
    }
    if table.active_count() >= MIN_PLAYERS {
        enter_reveal(table, now, events);
    } else {
        abort_hand(table, AbortReason::CommitTimeout, events, ledger);
    }
}

/// Seats that committed but never revealed pay the stack penalty and sit
/// out; the hand proceeds on the revealed secrets if enough remain.
fn reveal_timeout(
    table: &mut Table,
    now: u64,
    entropy: &[u8; SEED_LEN],
    events: &mut Vec<TableEvent>,
    ledger: &mut dyn ChipLedger,
) -> Result<(), TableError> {
    let collector = table.config.fee_collector.clone();
    for s in 0..MAX_SEATS {
        if table.seats[s].status != SeatStatus::Active || !table.seats[s].reveal.is_empty() {
            continue;
        }
        if let Some(collector) = collector.as_ref() {
            let penalty = table.seats[s]
                .chip_stack
                .saturating_mul(REVEAL_PENALTY_BPS)
                / BPS_DENOMINATOR;
            if penalty > 0 {
                table.seats[s].chip_stack -= penalty;
                ledger.credit(collector, penalty);
                events.push(TableEvent::RevealPenalty {
                    hand_number: table.hand_number,
                    seat: s as u8,
                    amount: penalty,
                });
            }
        }
        table.seats[s].status = SeatStatus::Waiting;
        table.seats[s].sitting_out = true;
        events.push(TableEvent::SeatTimedOut {
            hand_number: table.hand_number,
            seat: s as u8,
            kind: TimeoutKind::Reveal,
        });
        tracing::warn!(hand = table.hand_number, seat = s, "reveal timeout");
    }
    if table.active_count() >= MIN_PLAYERS {
        deal_hand(table, now, entropy, ledger, events)
    } else {
        abort_hand(table, AbortReason::RevealTimeout, events, ledger);
        Ok(())
    }
}

/// The seat on action is folded in absentia.
fn action_timeout(
    table: &mut Table,
    now: u64,
    events: &mut Vec<TableEvent>,
    ledger: &mut dyn ChipLedger,
) -> Result<(), TableError> {
    let s = table.action_on as usize;
    if s >= MAX_SEATS || table.seats[s].status != SeatStatus::Active {
        return Err(TableError::InternalState("action on inactive seat"));
    }
    table.seats[s].status = SeatStatus::Folded;
    table.seats[s].acted = true;
    events.push(TableEvent::SeatTimedOut {
        hand_number: table.hand_number,
        seat: s as u8,
        kind: TimeoutKind::Action,
    });
    events.push(TableEvent::ActionTaken {
        hand_number: table.hand_number,
        seat: s as u8,
        action: PlayerAction::Fold,
        amount: 0,
    });
    tracing::warn!(hand = table.hand_number, seat = s, "action timeout, forced fold");
    after_action(table, now, events, ledger)
}

/// Admin escape hatch: force the table back to `Waiting`, refunding every
/// chip invested in the current hand. Succeeds from any phase.
pub fn emergency_abort(
    table: &mut Table,
    admin: &PublicKey,
    ledger: &mut dyn ChipLedger,
) -> Result<Vec<TableEvent>, TableError> {
    if admin != &table.config.admin {
        return Err(TableError::Unauthorized);
    }
    let mut events = Vec::new();
    if table.phase == TablePhase::Waiting {
        return Ok(events);
    }
    abort_hand(table, AbortReason::Emergency, &mut events, ledger);
    Ok(events)
}
