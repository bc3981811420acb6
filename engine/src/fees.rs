//! Fractional rake accumulator.
//!
//! The rake is `pot * fee_bps / 10_000`, but truncating that per hand would
//! leak revenue on small pots. Instead the numerator accumulates across
//! hands in units of 1/10,000 chip; whenever the accumulator holds at least
//! one whole chip, that integer part is taken out of the current pot and
//! sent to the fee collector, and the fraction carries forward.

use holdem_types::poker::BPS_DENOMINATOR;
use holdem_types::Table;

/// Accrue the rake for a pot and return the whole chips to collect now.
///
/// With no fee collector configured, the rake is waived for the hand (the
/// value stays with the winners) rather than accruing unpayable debt.
pub fn accrue_rake(table: &mut Table, pot: u64) -> u64 {
    if table.config.fee_collector.is_none() || table.config.fee_bps == 0 {
        return 0;
    }
    table.fee_accumulator = table
        .fee_accumulator
        .saturating_add(pot.saturating_mul(table.config.fee_bps as u64));
    let whole = table.fee_accumulator / BPS_DENOMINATOR;
    // A 100% rake cap means the integer part never exceeds the pot, but the
    // clamp keeps the invariant explicit.
    let collected = whole.min(pot);
    table.fee_accumulator -= collected.saturating_mul(BPS_DENOMINATOR);
    table.total_fees_collected = table.total_fees_collected.saturating_add(collected);
    collected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::create_account_keypair;
    use holdem_types::TableConfig;

    fn raked_table() -> Table {
        let admin = create_account_keypair(0).1;
        let collector = create_account_keypair(99).1;
        let mut config = TableConfig::new(admin, 5, 10);
        config.fee_bps = 50;
        config.fee_collector = Some(collector);
        Table::new(config)
    }

    #[test]
    fn test_fractional_carry_across_hands() {
        let mut table = raked_table();

        // 72 * 50 = 3,600 -> 0.36 chips, nothing collected.
        assert_eq!(accrue_rake(&mut table, 72), 0);
        assert_eq!(table.fee_accumulator, 3_600);

        // + 108 * 50 = 5,400 -> 0.90 chips.
        assert_eq!(accrue_rake(&mut table, 108), 0);
        assert_eq!(table.fee_accumulator, 9_000);

        // + 80 * 50 = 4,000 -> 1.30 chips: collect 1, carry 0.30.
        assert_eq!(accrue_rake(&mut table, 80), 1);
        assert_eq!(table.fee_accumulator, 3_000);
        assert_eq!(table.total_fees_collected, 1);

        // + 100 * 50 = 5,000 -> 0.80 chips carried.
        assert_eq!(accrue_rake(&mut table, 100), 0);
        assert_eq!(table.fee_accumulator, 8_000);
        assert_eq!(table.total_fees_collected, 1);
    }

    #[test]
    fn test_waived_without_collector() {
        let admin = create_account_keypair(0).1;
        let mut config = TableConfig::new(admin, 5, 10);
        config.fee_bps = 50;
        config.fee_collector = None;
        let mut table = Table::new(config);

        assert_eq!(accrue_rake(&mut table, 10_000), 0);
        assert_eq!(table.fee_accumulator, 0);
        assert_eq!(table.total_fees_collected, 0);
    }

    #[test]
    fn test_zero_bps_collects_nothing() {
        let mut table = raked_table();
        table.config.fee_bps = 0;
        assert_eq!(accrue_rake(&mut table, 1_000), 0);
        assert_eq!(table.fee_accumulator, 0);
    }
}
