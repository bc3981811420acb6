//! Pot accounting: street bets, call amounts, side-pot tiering, and
//! distribution.
//!
//! Side pots are an explicit loop over the sorted distinct total-investment
//! levels. For each level, every seat that invested at least that much
//! contributes the level delta to that tier's pot, and only non-folded seats
//! that reached the level may win it. A folded seat keeps no claim anywhere,
//! but its chips stay in the tiers it funded.

use holdem_types::poker::MAX_SEATS;
use holdem_types::{Seat, Table};

use crate::evaluator::HandRank;

/// One contestable tier of the pot, lowest investment level first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PotTier {
    pub amount: u64,
    /// Seats that may win this tier, in seat order.
    pub eligible: Vec<usize>,
}

/// Move `amount` from the seat's stack into its street bet.
///
/// The caller validates `amount <= chip_stack`.
pub(crate) fn post_bet(seat: &mut Seat, amount: u64) {
    seat.chip_stack = seat.chip_stack.saturating_sub(amount);
    seat.current_bet = seat.current_bet.saturating_add(amount);
    seat.total_invested = seat.total_invested.saturating_add(amount);
}

/// Chips the seat must add to match the street's highest bet.
pub fn call_amount(table: &Table, seat: usize) -> u64 {
    let Some(seat) = table.seats.get(seat) else {
        return 0;
    };
    table.current_max_bet.saturating_sub(seat.current_bet)
}

/// Sweep every street bet into the shared pot and reset the street.
pub(crate) fn collect_street(table: &mut Table) {
    let mut street_total = 0u64;
    for seat in table.seats.iter_mut() {
        street_total = street_total.saturating_add(seat.current_bet);
        seat.current_bet = 0;
        seat.acted = false;
    }
    table.pot = table.pot.saturating_add(street_total);
    table.current_max_bet = 0;
    table.min_raise = table.config.big_blind;
}

/// Compute the pot tiers from per-seat total investments.
///
/// `contesting[s]` marks seats still in the hand. Tiers whose eligible set
/// would be empty (a folded seat out-invested everyone remaining) fold their
/// chips into the nearest eligible tier below.
pub fn side_pots(
    invested: &[u64; MAX_SEATS],
    contesting: &[bool; MAX_SEATS],
) -> Vec<PotTier> {
    let mut levels: Vec<u64> = invested.iter().copied().filter(|&v| v > 0).collect();
    levels.sort_unstable();
    levels.dedup();

    let mut tiers: Vec<PotTier> = Vec::with_capacity(levels.len());
    let mut orphan = 0u64;
    let mut prev = 0u64;
    for level in levels {
        let delta = level - prev;
        let contributors = invested.iter().filter(|&&v| v >= level).count() as u64;
        let amount = delta.saturating_mul(contributors);
        let eligible: Vec<usize> = (0..MAX_SEATS)
            .filter(|&s| contesting[s] && invested[s] >= level)
            .collect();
        if eligible.is_empty() {
            orphan = orphan.saturating_add(amount);
        } else {
            let amount = amount.saturating_add(orphan);
            orphan = 0;
            tiers.push(PotTier { amount, eligible });
        }
        prev = level;
    }
    if orphan > 0 {
        if let Some(last) = tiers.last_mut() {
            last.amount = last.amount.saturating_add(orphan);
        }
    }
    tiers
}

/// Split each tier among its best-ranked eligible seats.
///
/// An indivisible remainder chip goes to the first winner in seat order
/// scanning clockwise from `start_seat` (the seat immediately left of the
/// dealer).
pub fn distribute(
    tiers: &[PotTier],
    ranks: &[Option<HandRank>; MAX_SEATS],
    start_seat: usize,
) -> [u64; MAX_SEATS] {
    let mut winnings = [0u64; MAX_SEATS];
    for tier in tiers {
        let Some(best) = tier
            .eligible
            .iter()
            .filter_map(|&s| ranks[s].as_ref())
            .max()
        else {
            continue;
        };
        let winners: Vec<usize> = tier
            .eligible
            .iter()
            .copied()
            .filter(|&s| ranks[s].as_ref() == Some(best))
            .collect();
        let share = tier.amount / winners.len() as u64;
        let remainder = tier.amount % winners.len() as u64;
        for &w in &winners {
            winnings[w] = winnings[w].saturating_add(share);
        }
        if remainder > 0 {
            for k in 0..MAX_SEATS {
                let s = (start_seat + k) % MAX_SEATS;
                if winners.contains(&s) {
                    winnings[s] = winnings[s].saturating_add(remainder);
                    break;
                }
            }
        }
    }
    winnings
}
