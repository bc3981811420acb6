//! Betting actions: fold, check, call, raise, all-in, and the straddle.
//!
//! An action is legal only for the seat whose turn it is, only during a
//! betting street, and only while that seat can still act. A betting round
//! is complete once every seat that can act has matched the street's
//! highest bet (or checked it around); a raise re-opens the round.

use commonware_cryptography::ed25519::PublicKey;

use holdem_types::poker::{PlayerAction, TableEvent};
use holdem_types::{SeatStatus, Table, TablePhase};

use crate::error::TableError;
use crate::ledger::ChipLedger;
use crate::pot;
use crate::table::{finish_street, next_seat_where};

/// Validate that `player` may act right now and return their seat.
fn acting_seat(table: &Table, player: &PublicKey, now: u64) -> Result<usize, TableError> {
    if !table.phase.is_betting() {
        return Err(TableError::WrongPhase(table.phase));
    }
    let seat = table.seat_of(player).ok_or(TableError::NotSeated)?;
    if table.seats[seat].status != SeatStatus::Active {
        return Err(TableError::CannotAct);
    }
    if seat != table.action_on as usize {
        return Err(TableError::OutOfTurn);
    }
    if now >= table.action_deadline {
        return Err(TableError::DeadlineElapsed);
    }
    Ok(seat)
}

/// True when the current betting round is finished: no active seat is short
/// of the street's highest bet, and everyone who can act has had their say
/// (a lone active seat facing only all-ins has nothing left to decide).
pub(crate) fn street_complete(table: &Table) -> bool {
    let mut active = 0usize;
    for seat in &table.seats {
        if seat.status != SeatStatus::Active {
            continue;
        }
        active += 1;
        if seat.current_bet < table.current_max_bet {
            return false;
        }
    }
    if active <= 1 {
        return true;
    }
    table
        .seats
        .iter()
        .filter(|s| s.status == SeatStatus::Active)
        .all(|s| s.acted)
}

/// Advance after an action: settle, close the street, or pass the turn.
pub(crate) fn after_action(
    table: &mut Table,
    now: u64,
    events: &mut Vec<TableEvent>,
    ledger: &mut dyn ChipLedger,
) -> Result<(), TableError> {
    if table.in_hand_count() <= 1 || street_complete(table) {
        return finish_street(table, now, events, ledger);
    }
    let next = next_seat_where(table, table.action_on as usize, |s| {
        let seat = &table.seats[s];
        seat.status == SeatStatus::Active
            && (!seat.acted || seat.current_bet < table.current_max_bet)
    })
    .ok_or(TableError::InternalState("no seat to act"))?;
    table.action_on = next as u8;
    table.action_deadline = now.saturating_add(table.config.action_views);
    Ok(())
}

pub fn fold(
    table: &mut Table,
    player: &PublicKey,
    now: u64,
    ledger: &mut dyn ChipLedger,
) -> Result<Vec<TableEvent>, TableError> {
    let seat = acting_seat(table, player, now)?;
    table.seats[seat].status = SeatStatus::Folded;
    table.seats[seat].acted = true;

    let mut events = vec![TableEvent::ActionTaken {
        hand_number: table.hand_number,
        seat: seat as u8,
        action: PlayerAction::Fold,
        amount: 0,
    }];
    after_action(table, now, &mut events, ledger)?;
    Ok(events)
}

pub fn check(
    table: &mut Table,
    player: &PublicKey,
    now: u64,
    ledger: &mut dyn ChipLedger,
) -> Result<Vec<TableEvent>, TableError> {
    let seat = acting_seat(table, player, now)?;
    if pot::call_amount(table, seat) > 0 {
        return Err(TableError::CannotCheck);
    }
    table.seats[seat].acted = true;

    let mut events = vec![TableEvent::ActionTaken {
        hand_number: table.hand_number,
        seat: seat as u8,
        action: PlayerAction::Check,
        amount: 0,
    }];
    after_action(table, now, &mut events, ledger)?;
    Ok(events)
}

/// Match the street's highest bet, going all-in if the stack is short.
pub fn call(
    table: &mut Table,
    player: &PublicKey,
    now: u64,
    ledger: &mut dyn ChipLedger,
) -> Result<Vec<TableEvent>, TableError> {
    let seat = acting_seat(table, player, now)?;
    let owed = pot::call_amount(table, seat);
    let amount = owed.min(table.seats[seat].chip_stack);
    pot::post_bet(&mut table.seats[seat], amount);
    if table.seats[seat].chip_stack == 0 {
        table.seats[seat].status = SeatStatus::AllIn;
    }
    table.seats[seat].acted = true;

    let mut events = vec![TableEvent::ActionTaken {
        hand_number: table.hand_number,
        seat: seat as u8,
        action: PlayerAction::Call,
        amount,
    }];
    after_action(table, now, &mut events, ledger)?;
    Ok(events)
}

/// Raise the street's bet to `target` chips total for this seat.
pub fn raise_to(
    table: &mut Table,
    player: &PublicKey,
    target: u64,
    now: u64,
    ledger: &mut dyn ChipLedger,
) -> Result<Vec<TableEvent>, TableError> {
    let seat = acting_seat(table, player, now)?;
    let minimum = table.current_max_bet.saturating_add(table.min_raise);
    if target < minimum {
        return Err(TableError::RaiseBelowMinimum {
            target,
            min: minimum,
        });
    }
    let needed = target.saturating_sub(table.seats[seat].current_bet);
    let stack = table.seats[seat].chip_stack;
    if needed > stack {
        return Err(TableError::InsufficientStack {
            stack,
            needed,
        });
    }
    pot::post_bet(&mut table.seats[seat], needed);
    if table.seats[seat].chip_stack == 0 {
        table.seats[seat].status = SeatStatus::AllIn;
    }
    table.min_raise = target - table.current_max_bet;
    table.current_max_bet = target;
    reopen_betting(table, seat);

    let mut events = vec![TableEvent::ActionTaken {
        hand_number: table.hand_number,
        seat: seat as u8,
        action: PlayerAction::Raise,
        amount: target,
    }];
    after_action(table, now, &mut events, ledger)?;
    Ok(events)
}

/// Push the entire stack in. Counts as a raise only when the increment
/// meets the minimum; a short all-in does not re-open the betting.
pub fn all_in(
    table: &mut Table,
    player: &PublicKey,
    now: u64,
    ledger: &mut dyn ChipLedger,
) -> Result<Vec<TableEvent>, TableError> {
    let seat = acting_seat(table, player, now)?;
    let stack = table.seats[seat].chip_stack;
    if stack == 0 {
        return Err(TableError::InsufficientStack { stack: 0, needed: 1 });
    }
    let new_bet = table.seats[seat].current_bet.saturating_add(stack);
    pot::post_bet(&mut table.seats[seat], stack);
    table.seats[seat].status = SeatStatus::AllIn;
    table.seats[seat].acted = true;
    if new_bet > table.current_max_bet {
        let increment = new_bet - table.current_max_bet;
        if increment >= table.min_raise {
            table.min_raise = increment;
            reopen_betting(table, seat);
        }
        table.current_max_bet = new_bet;
    }

    let mut events = vec![TableEvent::ActionTaken {
        hand_number: table.hand_number,
        seat: seat as u8,
        action: PlayerAction::AllIn,
        amount: new_bet,
    }];
    after_action(table, now, &mut events, ledger)?;
    Ok(events)
}

/// Post a voluntary blind raise to twice the big blind before any other
/// voluntary action, keeping the option to raise when the action returns.
pub fn straddle(
    table: &mut Table,
    player: &PublicKey,
    now: u64,
    ledger: &mut dyn ChipLedger,
) -> Result<Vec<TableEvent>, TableError> {
    let seat = acting_seat(table, player, now)?;
    let available = table.phase == TablePhase::PreFlop
        && table.current_max_bet == table.config.big_blind
        && table.seats[seat].current_bet == 0
        && table.seats.iter().all(|s| !s.acted);
    if !available {
        return Err(TableError::StraddleUnavailable);
    }
    let amount = table.config.big_blind.saturating_mul(2);
    let stack = table.seats[seat].chip_stack;
    if amount > stack {
        return Err(TableError::InsufficientStack {
            stack,
            needed: amount,
        });
    }
    pot::post_bet(&mut table.seats[seat], amount);
    if table.seats[seat].chip_stack == 0 {
        table.seats[seat].status = SeatStatus::AllIn;
    }
    table.current_max_bet = amount;

    let mut events = vec![TableEvent::ActionTaken {
        hand_number: table.hand_number,
        seat: seat as u8,
        action: PlayerAction::Straddle,
        amount,
    }];
    after_action(table, now, &mut events, ledger)?;
    Ok(events)
}

/// A full raise re-opens the round for everyone else still able to act.
fn reopen_betting(table: &mut Table, raiser: usize) {
    for (s, seat) in table.seats.iter_mut().enumerate() {
        if s != raiser && seat.status == SeatStatus::Active {
            seat.acted = false;
        }
    }
    table.seats[raiser].acted = true;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{create_account_keypair, MockLedger};
    use holdem_types::TableConfig;

    /// A three-handed table frozen mid-preflop, bypassing the deal.
    fn mid_street_table() -> (Table, Vec<PublicKey>, MockLedger) {
        let admin = create_account_keypair(0).1;
        let players: Vec<PublicKey> = (1..=3).map(|s| create_account_keypair(s).1).collect();
        let mut table = Table::new(TableConfig::new(admin, 5, 10));
        for (i, player) in players.iter().enumerate() {
            table.seats[i].player = Some(player.clone());
            table.seats[i].chip_stack = 1_000;
            table.seats[i].status = SeatStatus::Active;
        }
        table.phase = TablePhase::PreFlop;
        table.dealer_seat = 0;
        // Blinds already posted by seats 1 and 2.
        table.seats[1].chip_stack = 995;
        table.seats[1].current_bet = 5;
        table.seats[1].total_invested = 5;
        table.seats[2].chip_stack = 990;
        table.seats[2].current_bet = 10;
        table.seats[2].total_invested = 10;
        table.current_max_bet = 10;
        table.min_raise = 10;
        table.action_on = 0;
        table.action_deadline = 100;
        let ledger = MockLedger::new();
        (table, players, ledger)
    }

    #[test]
    fn test_out_of_turn_is_rejected() {
        let (mut table, players, mut ledger) = mid_street_table();
        assert_eq!(
            call(&mut table, &players[1], 10, &mut ledger),
            Err(TableError::OutOfTurn)
        );
    }

    #[test]
    fn test_action_after_deadline_is_rejected() {
        let (mut table, players, mut ledger) = mid_street_table();
        assert_eq!(
            call(&mut table, &players[0], 100, &mut ledger),
            Err(TableError::DeadlineElapsed)
        );
    }

    #[test]
    fn test_check_facing_a_bet_is_rejected() {
        let (mut table, players, mut ledger) = mid_street_table();
        assert_eq!(
            check(&mut table, &players[0], 10, &mut ledger),
            Err(TableError::CannotCheck)
        );
    }

    #[test]
    fn test_call_matches_street_max_and_passes_turn() {
        let (mut table, players, mut ledger) = mid_street_table();
        let events = call(&mut table, &players[0], 10, &mut ledger).unwrap();
        assert!(matches!(
            events[0],
            TableEvent::ActionTaken {
                action: PlayerAction::Call,
                amount: 10,
                ..
            }
        ));
        assert_eq!(table.seats[0].current_bet, 10);
        assert_eq!(table.seats[0].chip_stack, 990);
        assert_eq!(table.action_on, 1);
    }

    #[test]
    fn test_raise_below_minimum_is_rejected() {
        let (mut table, players, mut ledger) = mid_street_table();
        assert_eq!(
            raise_to(&mut table, &players[0], 15, 10, &mut ledger),
            Err(TableError::RaiseBelowMinimum { target: 15, min: 20 })
        );
    }

    #[test]
    fn test_raise_updates_min_raise_and_reopens_action() {
        let (mut table, players, mut ledger) = mid_street_table();
        call(&mut table, &players[0], 10, &mut ledger).unwrap();
        // Small blind raises to 35: increment 25 becomes the new minimum.
        raise_to(&mut table, &players[1], 35, 11, &mut ledger).unwrap();
        assert_eq!(table.current_max_bet, 35);
        assert_eq!(table.min_raise, 25);
        assert!(!table.seats[0].acted);
        assert!(table.seats[1].acted);
        assert_eq!(table.action_on, 2);
    }

    #[test]
    fn test_raise_beyond_stack_is_rejected() {
        let (mut table, players, mut ledger) = mid_street_table();
        assert_eq!(
            raise_to(&mut table, &players[0], 2_000, 10, &mut ledger),
            Err(TableError::InsufficientStack {
                stack: 1_000,
                needed: 2_000
            })
        );
    }

    #[test]
    fn test_short_all_in_does_not_reopen_betting() {
        let (mut table, players, mut ledger) = mid_street_table();
        call(&mut table, &players[0], 10, &mut ledger).unwrap();
        // Seat 1 has 995 behind but we shrink it to model a short stack.
        table.seats[1].chip_stack = 14;
        all_in(&mut table, &players[1], 11, &mut ledger).unwrap();
        // 5 + 14 = 19 < 10 + 10 minimum raise: max bet moves, round is not
        // re-opened, and the minimum raise is unchanged.
        assert_eq!(table.current_max_bet, 19);
        assert_eq!(table.min_raise, 10);
        assert!(table.seats[0].acted);
        assert_eq!(table.seats[1].status, SeatStatus::AllIn);
    }

    #[test]
    fn test_full_all_in_reopens_betting() {
        let (mut table, players, mut ledger) = mid_street_table();
        call(&mut table, &players[0], 10, &mut ledger).unwrap();
        all_in(&mut table, &players[1], 11, &mut ledger).unwrap();
        assert_eq!(table.current_max_bet, 1_000);
        assert_eq!(table.min_raise, 990);
        assert!(!table.seats[0].acted);
    }

    #[test]
    fn test_straddle_only_before_voluntary_action() {
        let (mut table, players, mut ledger) = mid_street_table();
        let events = straddle(&mut table, &players[0], 5, &mut ledger).unwrap();
        assert!(matches!(
            events[0],
            TableEvent::ActionTaken {
                action: PlayerAction::Straddle,
                amount: 20,
                ..
            }
        ));
        assert_eq!(table.current_max_bet, 20);
        // The straddler keeps the option.
        assert!(!table.seats[0].acted);
        assert_eq!(table.action_on, 1);

        // Once anyone has acted voluntarily, the straddle window is closed.
        call(&mut table, &players[1], 6, &mut ledger).unwrap();
        assert_eq!(
            straddle(&mut table, &players[2], 7, &mut ledger),
            Err(TableError::StraddleUnavailable)
        );
    }

    #[test]
    fn test_blind_seats_cannot_straddle() {
        let (mut table, players, mut ledger) = mid_street_table();
        call(&mut table, &players[0], 5, &mut ledger).unwrap();
        table.seats.iter_mut().for_each(|s| s.acted = false);
        table.action_on = 1;
        assert_eq!(
            straddle(&mut table, &players[1], 6, &mut ledger),
            Err(TableError::StraddleUnavailable)
        );
    }
}
