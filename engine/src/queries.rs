//! Read-only projections of table state.
//!
//! Everything here is a pure function of the current fields: no query
//! mutates the table, so external observers need no lock discipline beyond
//! reading a consistent snapshot.

use commonware_cryptography::ed25519::PublicKey;

use holdem_types::poker::MAX_SEATS;
use holdem_types::{SeatStatus, Table, TableConfig, TablePhase};

use crate::pot;

/// The table's static configuration.
pub fn config(table: &Table) -> &TableConfig {
    &table.config
}

/// Coarse hand-state snapshot for observers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableSnapshot {
    pub phase: TablePhase,
    pub hand_number: u64,
    /// Pot including bets still sitting on the current street.
    pub pot: u64,
    pub dealer_seat: u8,
    pub community_cards: Vec<u8>,
    pub current_max_bet: u64,
    /// Total a raiser must reach for a minimum raise.
    pub min_raise_to: u64,
    pub occupied: usize,
    pub in_hand: usize,
}

/// Per-seat projection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeatInfo {
    pub player: PublicKey,
    pub chip_stack: u64,
    pub current_bet: u64,
    pub total_invested: u64,
    pub status: SeatStatus,
    pub sitting_out: bool,
    pub missed_blinds: u64,
    pub pending_leave: bool,
}

pub fn snapshot(table: &Table) -> TableSnapshot {
    TableSnapshot {
        phase: table.phase,
        hand_number: table.hand_number,
        pot: pot_total(table),
        dealer_seat: table.dealer_seat,
        community_cards: table.community_cards.clone(),
        current_max_bet: table.current_max_bet,
        min_raise_to: min_raise_to(table),
        occupied: table.occupied_count(),
        in_hand: table.in_hand_count(),
    }
}

/// Info for an occupied seat; `None` for empty or out-of-range seats.
pub fn seat_info(table: &Table, seat: usize) -> Option<SeatInfo> {
    let s = table.seats.get(seat)?;
    let player = s.player.clone()?;
    Some(SeatInfo {
        player,
        chip_stack: s.chip_stack,
        current_bet: s.current_bet,
        total_invested: s.total_invested,
        status: s.status,
        sitting_out: s.sitting_out,
        missed_blinds: s.missed_blinds,
        pending_leave: s.pending_leave,
    })
}

/// Pot plus the bets still on the current street.
pub fn pot_total(table: &Table) -> u64 {
    table
        .seats
        .iter()
        .fold(table.pot, |acc, s| acc.saturating_add(s.current_bet))
}

pub fn community_cards(table: &Table) -> &[u8] {
    &table.community_cards
}

/// The stored ciphertext for a seat's hole cards, once dealt.
pub fn hole_cards_ciphertext(table: &Table, seat: usize) -> Option<&[u8]> {
    let s = table.seats.get(seat)?;
    if s.hole_ciphertext.is_empty() {
        None
    } else {
        Some(&s.hole_ciphertext)
    }
}

/// Chips `seat` must add to continue in the hand.
pub fn call_amount_for(table: &Table, seat: usize) -> u64 {
    pot::call_amount(table, seat)
}

/// Total bet a minimum raise must reach on this street.
pub fn min_raise_to(table: &Table) -> u64 {
    table.current_max_bet.saturating_add(table.min_raise)
}

/// Seat on action and its deadline, during betting streets only.
pub fn action_state(table: &Table) -> Option<(u8, u64)> {
    if table.phase.is_betting() {
        Some((table.action_on, table.action_deadline))
    } else {
        None
    }
}

/// Bitmap of seats whose commitment is recorded.
pub fn commit_bitmap(table: &Table) -> u8 {
    let mut mask = 0u8;
    for s in 0..MAX_SEATS {
        if !table.seats[s].commit.is_empty() {
            mask |= 1 << s;
        }
    }
    mask
}

/// Bitmap of seats whose secret is revealed.
pub fn reveal_bitmap(table: &Table) -> u8 {
    let mut mask = 0u8;
    for s in 0..MAX_SEATS {
        if !table.seats[s].reveal.is_empty() {
            mask |= 1 << s;
        }
    }
    mask
}

/// Occupancy counts: (occupied, sitting out, dealt in).
pub fn seat_counts(table: &Table) -> (usize, usize, usize) {
    let occupied = table.occupied_count();
    let sitting_out = table
        .seats
        .iter()
        .filter(|s| s.is_occupied() && s.sitting_out)
        .count();
    let in_hand = table.in_hand_count();
    (occupied, sitting_out, in_hand)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::create_account_keypair;
    use holdem_types::TableConfig;

    fn sample_table() -> Table {
        let admin = create_account_keypair(0).1;
        let mut table = Table::new(TableConfig::new(admin, 5, 10));
        table.phase = TablePhase::Turn;
        table.hand_number = 4;
        table.pot = 120;
        table.dealer_seat = 1;
        table.action_on = 2;
        table.action_deadline = 77;
        table.current_max_bet = 40;
        table.min_raise = 20;
        table.community_cards = vec![3, 17, 30, 44];
        table.seats[0].player = Some(create_account_keypair(1).1);
        table.seats[0].chip_stack = 500;
        table.seats[0].current_bet = 40;
        table.seats[0].status = SeatStatus::Active;
        table.seats[0].commit = vec![1; 32];
        table.seats[2].player = Some(create_account_keypair(2).1);
        table.seats[2].chip_stack = 300;
        table.seats[2].current_bet = 15;
        table.seats[2].status = SeatStatus::Active;
        table.seats[2].commit = vec![2; 32];
        table.seats[2].reveal = vec![3; 16];
        table.seats[2].hole_ciphertext = vec![9, 9];
        table
    }

    #[test]
    fn test_snapshot_projects_without_mutation() {
        let table = sample_table();
        let before = table.clone();
        let snap = snapshot(&table);
        assert_eq!(snap.phase, TablePhase::Turn);
        assert_eq!(snap.pot, 120 + 40 + 15);
        assert_eq!(snap.min_raise_to, 60);
        assert_eq!(snap.occupied, 2);
        assert_eq!(snap.in_hand, 2);
        assert_eq!(table, before);
    }

    #[test]
    fn test_seat_info_and_ciphertext() {
        let table = sample_table();
        assert!(seat_info(&table, 1).is_none());
        assert!(seat_info(&table, 9).is_none());
        let info = seat_info(&table, 2).unwrap();
        assert_eq!(info.chip_stack, 300);
        assert_eq!(info.status, SeatStatus::Active);

        assert_eq!(hole_cards_ciphertext(&table, 2), Some(&[9u8, 9u8][..]));
        assert!(hole_cards_ciphertext(&table, 0).is_none());
    }

    #[test]
    fn test_call_amount_and_action_state() {
        let table = sample_table();
        assert_eq!(call_amount_for(&table, 2), 25);
        assert_eq!(call_amount_for(&table, 0), 0);
        assert_eq!(action_state(&table), Some((2, 77)));

        let mut idle = sample_table();
        idle.phase = TablePhase::Waiting;
        assert_eq!(action_state(&idle), None);
    }

    #[test]
    fn test_bitmaps_and_counts() {
        let table = sample_table();
        assert_eq!(commit_bitmap(&table), 0b00101);
        assert_eq!(reveal_bitmap(&table), 0b00100);
        assert_eq!(seat_counts(&table), (2, 0, 2));
    }
}
