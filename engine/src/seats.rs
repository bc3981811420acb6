//! Seat management: joining, leaving, top-ups, and sit-out bookkeeping.
//!
//! These are the only operations that move value between the table and the
//! external chip ledger on a player's behalf. The one-seat-per-identity
//! invariant is enforced here.

use commonware_cryptography::ed25519::PublicKey;
use holdem_types::poker::MAX_SEATS;
use holdem_types::{Seat, SeatStatus, Table, TableEvent};

use crate::error::TableError;
use crate::ledger::ChipLedger;

/// Take an open seat with a buy-in debited from the external ledger.
pub fn join_table(
    table: &mut Table,
    player: &PublicKey,
    seat_index: usize,
    buy_in: u64,
    ledger: &mut dyn ChipLedger,
) -> Result<Vec<TableEvent>, TableError> {
    if seat_index >= MAX_SEATS {
        return Err(TableError::InvalidSeat(seat_index));
    }
    if table.seat_of(player).is_some() {
        return Err(TableError::AlreadySeated);
    }
    if table.seats[seat_index].is_occupied() {
        return Err(TableError::SeatOccupied(seat_index));
    }
    if buy_in < table.config.min_buy_in || buy_in > table.config.max_buy_in {
        return Err(TableError::BuyInOutOfRange {
            amount: buy_in,
            min: table.config.min_buy_in,
            max: table.config.max_buy_in,
        });
    }
    ledger.debit(player, buy_in)?;

    let seat = &mut table.seats[seat_index];
    *seat = Seat::default();
    seat.player = Some(player.clone());
    seat.chip_stack = buy_in;

    tracing::debug!(seat = seat_index, buy_in, "player joined table");
    Ok(vec![TableEvent::PlayerJoined {
        seat: seat_index as u8,
        player: player.clone(),
        buy_in,
    }])
}

/// Add chips to a stack, up to the configured maximum buy-in. Rejected
/// while the seat is dealt into an open hand.
pub fn top_up(
    table: &mut Table,
    player: &PublicKey,
    amount: u64,
    ledger: &mut dyn ChipLedger,
) -> Result<Vec<TableEvent>, TableError> {
    let seat_index = table.seat_of(player).ok_or(TableError::NotSeated)?;
    if table.phase.is_in_hand() && table.seats[seat_index].status != SeatStatus::Waiting {
        return Err(TableError::HandInProgress);
    }
    let new_stack = table.seats[seat_index].chip_stack.saturating_add(amount);
    if new_stack > table.config.max_buy_in {
        return Err(TableError::BuyInOutOfRange {
            amount: new_stack,
            min: table.config.min_buy_in,
            max: table.config.max_buy_in,
        });
    }
    ledger.debit(player, amount)?;
    table.seats[seat_index].chip_stack = new_stack;

    Ok(vec![TableEvent::ToppedUp {
        seat: seat_index as u8,
        amount,
        new_stack,
    }])
}

/// Leave the table and cash the stack out to the ledger.
///
/// A seat dealt into an open hand cannot vanish mid-hand; the leave is
/// queued and honored at hand teardown instead.
pub fn leave_table(
    table: &mut Table,
    player: &PublicKey,
    ledger: &mut dyn ChipLedger,
) -> Result<Vec<TableEvent>, TableError> {
    let seat_index = table.seat_of(player).ok_or(TableError::NotSeated)?;
    if table.phase.is_in_hand() && table.seats[seat_index].status != SeatStatus::Waiting {
        table.seats[seat_index].pending_leave = true;
        return Ok(Vec::new());
    }

    let chips = table.seats[seat_index].chip_stack;
    table.seats[seat_index] = Seat::default();
    ledger.credit(player, chips);

    tracing::debug!(seat = seat_index, chips, "player left table");
    Ok(vec![TableEvent::PlayerLeft {
        seat: seat_index as u8,
        player: player.clone(),
        chips,
    }])
}

/// Sit out of future hands. The current hand, if any, is unaffected.
pub fn sit_out(table: &mut Table, player: &PublicKey) -> Result<(), TableError> {
    let seat_index = table.seat_of(player).ok_or(TableError::NotSeated)?;
    table.seats[seat_index].sitting_out = true;
    Ok(())
}

/// Return from sitting out. Any blinds missed in the meantime are owed as
/// dead money before the seat is dealt back in.
pub fn sit_in(table: &mut Table, player: &PublicKey) -> Result<(), TableError> {
    let seat_index = table.seat_of(player).ok_or(TableError::NotSeated)?;
    table.seats[seat_index].sitting_out = false;
    Ok(())
}
