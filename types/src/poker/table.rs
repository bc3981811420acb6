use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, FixedSize, Read, ReadExt, ReadRangeExt, Write};
use commonware_cryptography::ed25519::PublicKey;
use thiserror::Error as ThisError;

use super::codec::read_optional_bytes;
use super::{
    TableConfig, COMMIT_LEN, COMMUNITY_CARDS, DECK_SIZE, HOLE_CARDS, MAX_SEATS, SECRET_MAX_LEN,
    SECRET_MIN_LEN, SEED_LEN,
};

/// Phase of the table's hand lifecycle.
///
/// Transitions are monotonic within a hand; the only backwards edges are the
/// abort paths (commit/reveal failure or an admin abort) back to `Waiting`.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TablePhase {
    Waiting = 0,
    Commit = 1,
    Reveal = 2,
    PreFlop = 3,
    Flop = 4,
    Turn = 5,
    River = 6,
    Showdown = 7,
}

impl TablePhase {
    /// True during the four betting streets.
    pub fn is_betting(&self) -> bool {
        matches!(
            self,
            TablePhase::PreFlop | TablePhase::Flop | TablePhase::Turn | TablePhase::River
        )
    }

    /// True for every phase of an open hand.
    pub fn is_in_hand(&self) -> bool {
        !matches!(self, TablePhase::Waiting)
    }
}

impl TryFrom<u8> for TablePhase {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(TablePhase::Waiting),
            1 => Ok(TablePhase::Commit),
            2 => Ok(TablePhase::Reveal),
            3 => Ok(TablePhase::PreFlop),
            4 => Ok(TablePhase::Flop),
            5 => Ok(TablePhase::Turn),
            6 => Ok(TablePhase::River),
            7 => Ok(TablePhase::Showdown),
            _ => Err(()),
        }
    }
}

impl Write for TablePhase {
    fn write(&self, writer: &mut impl BufMut) {
        (*self as u8).write(writer);
    }
}

impl Read for TablePhase {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let value = u8::read(reader)?;
        TablePhase::try_from(value).map_err(|_| Error::InvalidEnum(value))
    }
}

impl EncodeSize for TablePhase {
    fn encode_size(&self) -> usize {
        u8::SIZE
    }
}

/// Status of a seat within the current hand.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SeatStatus {
    /// Seated but not dealt into the current hand.
    #[default]
    Waiting = 0,
    /// Dealt in and still able to act.
    Active = 1,
    Folded = 2,
    AllIn = 3,
}

impl TryFrom<u8> for SeatStatus {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(SeatStatus::Waiting),
            1 => Ok(SeatStatus::Active),
            2 => Ok(SeatStatus::Folded),
            3 => Ok(SeatStatus::AllIn),
            _ => Err(()),
        }
    }
}

impl Write for SeatStatus {
    fn write(&self, writer: &mut impl BufMut) {
        (*self as u8).write(writer);
    }
}

impl Read for SeatStatus {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let value = u8::read(reader)?;
        SeatStatus::try_from(value).map_err(|_| Error::InvalidEnum(value))
    }
}

impl EncodeSize for SeatStatus {
    fn encode_size(&self) -> usize {
        u8::SIZE
    }
}

/// One of the five table positions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Seat {
    pub player: Option<PublicKey>,
    /// Chips held at the table. This is the durable record; the external
    /// chip ledger is moved to match it at the join/leave/fee boundaries.
    pub chip_stack: u64,
    /// Chips wagered on the current street.
    pub current_bet: u64,
    /// Chips wagered across the whole hand, including dead blinds.
    pub total_invested: u64,
    pub status: SeatStatus,
    pub sitting_out: bool,
    /// Blind chips owed from hands skipped while sitting out.
    pub missed_blinds: u64,
    /// Leave requested mid-hand; honored at hand teardown.
    pub pending_leave: bool,
    /// Whether the seat has acted on the current street.
    pub acted: bool,
    /// Commitment hash (empty or 32 bytes).
    pub commit: Vec<u8>,
    /// Revealed secret (empty or 16..=32 bytes).
    pub reveal: Vec<u8>,
    /// Encrypted hole cards (empty or 2 bytes).
    pub hole_ciphertext: Vec<u8>,
}

impl Seat {
    pub fn is_occupied(&self) -> bool {
        self.player.is_some()
    }

    /// True when the seat was dealt in and has not folded.
    pub fn in_hand(&self) -> bool {
        matches!(self.status, SeatStatus::Active | SeatStatus::AllIn)
    }

    /// Clear per-hand fields, preserving occupancy and stack.
    pub fn reset_for_hand(&mut self) {
        self.current_bet = 0;
        self.total_invested = 0;
        self.status = SeatStatus::Waiting;
        self.acted = false;
        self.commit.clear();
        self.reveal.clear();
        self.hole_ciphertext.clear();
    }
}

impl Write for Seat {
    fn write(&self, writer: &mut impl BufMut) {
        self.player.write(writer);
        self.chip_stack.write(writer);
        self.current_bet.write(writer);
        self.total_invested.write(writer);
        self.status.write(writer);
        self.sitting_out.write(writer);
        self.missed_blinds.write(writer);
        self.pending_leave.write(writer);
        self.acted.write(writer);
        self.commit.write(writer);
        self.reveal.write(writer);
        self.hole_ciphertext.write(writer);
    }
}

impl Read for Seat {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let player = Option::<PublicKey>::read(reader)?;
        let chip_stack = u64::read(reader)?;
        let current_bet = u64::read(reader)?;
        let total_invested = u64::read(reader)?;
        let status = SeatStatus::read(reader)?;
        let sitting_out = bool::read(reader)?;
        let missed_blinds = u64::read(reader)?;
        let pending_leave = bool::read(reader)?;
        let acted = bool::read(reader)?;
        let commit = read_optional_bytes(reader, COMMIT_LEN, COMMIT_LEN, "Seat")?;
        let reveal = read_optional_bytes(reader, SECRET_MIN_LEN, SECRET_MAX_LEN, "Seat")?;
        let hole_ciphertext = read_optional_bytes(reader, HOLE_CARDS, HOLE_CARDS, "Seat")?;

        Ok(Self {
            player,
            chip_stack,
            current_bet,
            total_invested,
            status,
            sitting_out,
            missed_blinds,
            pending_leave,
            acted,
            commit,
            reveal,
            hole_ciphertext,
        })
    }
}

impl EncodeSize for Seat {
    fn encode_size(&self) -> usize {
        self.player.encode_size()
            + self.chip_stack.encode_size()
            + self.current_bet.encode_size()
            + self.total_invested.encode_size()
            + self.status.encode_size()
            + self.sitting_out.encode_size()
            + self.missed_blinds.encode_size()
            + self.pending_leave.encode_size()
            + self.acted.encode_size()
            + self.commit.encode_size()
            + self.reveal.encode_size()
            + self.hole_ciphertext.encode_size()
    }
}

#[derive(Debug, ThisError, PartialEq, Eq)]
pub enum TableInvariantError {
    #[error("identity occupies seats {first} and {second}")]
    DuplicateIdentity { first: usize, second: usize },
    #[error("community card {card} out of range")]
    CardOutOfRange { card: u8 },
    #[error("duplicate community card {card}")]
    DuplicateCard { card: u8 },
    #[error("seat index {seat} out of range")]
    SeatOutOfRange { seat: u8 },
}

/// A poker table. One instance per table; the engine is the sole writer and
/// every transition is a synchronous call against this aggregate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Table {
    pub config: TableConfig,
    pub phase: TablePhase,
    pub seats: [Seat; MAX_SEATS],
    pub hand_number: u64,
    pub dealer_seat: u8,
    /// Rotation cursor: the seat that owes the next big blind.
    pub next_big_blind_seat: u8,
    /// Seat whose turn it is during betting streets.
    pub action_on: u8,
    /// Deadlines in consensus views; meaningful only in their phase.
    pub commit_deadline: u64,
    pub reveal_deadline: u64,
    pub action_deadline: u64,
    /// Highest `current_bet` on this street.
    pub current_max_bet: u64,
    /// Minimum raise increment for the next raise.
    pub min_raise: u64,
    /// Chips collected from completed streets and dead blinds.
    pub pot: u64,
    /// Plaintext community cards (0..=5).
    pub community_cards: Vec<u8>,
    /// Shuffle seed (empty until hole cards are dealt, then 32 bytes).
    pub shuffle_seed: Vec<u8>,
    /// Fractional rake carry, in units of 1/10,000 chip.
    pub fee_accumulator: u64,
    pub total_fees_collected: u64,
}

impl Table {
    pub fn new(config: TableConfig) -> Self {
        Self {
            config,
            phase: TablePhase::Waiting,
            seats: Default::default(),
            hand_number: 0,
            dealer_seat: 0,
            next_big_blind_seat: 0,
            action_on: 0,
            commit_deadline: 0,
            reveal_deadline: 0,
            action_deadline: 0,
            current_max_bet: 0,
            min_raise: 0,
            pot: 0,
            community_cards: Vec::with_capacity(COMMUNITY_CARDS),
            shuffle_seed: Vec::new(),
            fee_accumulator: 0,
            total_fees_collected: 0,
        }
    }

    /// Seat index occupied by `player`, if any.
    pub fn seat_of(&self, player: &PublicKey) -> Option<usize> {
        self.seats
            .iter()
            .position(|seat| seat.player.as_ref() == Some(player))
    }

    pub fn occupied_count(&self) -> usize {
        self.seats.iter().filter(|seat| seat.is_occupied()).count()
    }

    /// Seats dealt into the hand that have not folded.
    pub fn in_hand_count(&self) -> usize {
        self.seats.iter().filter(|seat| seat.in_hand()).count()
    }

    /// Seats still able to act (dealt in, not folded, not all-in).
    pub fn active_count(&self) -> usize {
        self.seats
            .iter()
            .filter(|seat| seat.status == SeatStatus::Active)
            .count()
    }

    /// Bitmask of seats dealt into the current hand.
    pub fn participant_mask(&self) -> u8 {
        let mut mask = 0u8;
        for (i, seat) in self.seats.iter().enumerate() {
            if seat.status != SeatStatus::Waiting {
                mask |= 1 << i;
            }
        }
        mask
    }

    /// Sum of all chips the table is responsible for: stacks, street bets,
    /// and the pot. Used by conservation checks.
    pub fn chips_on_table(&self) -> u64 {
        let mut total = self.pot;
        for seat in &self.seats {
            total = total
                .saturating_add(seat.chip_stack)
                .saturating_add(seat.current_bet);
        }
        total
    }

    /// Check the structural invariants that must hold between transitions.
    pub fn validate_invariants(&self) -> Result<(), TableInvariantError> {
        for (i, seat) in self.seats.iter().enumerate() {
            let Some(player) = seat.player.as_ref() else {
                continue;
            };
            for (j, other) in self.seats.iter().enumerate().skip(i + 1) {
                if other.player.as_ref() == Some(player) {
                    return Err(TableInvariantError::DuplicateIdentity { first: i, second: j });
                }
            }
        }
        let mut seen = [false; DECK_SIZE];
        for &card in &self.community_cards {
            if card as usize >= DECK_SIZE {
                return Err(TableInvariantError::CardOutOfRange { card });
            }
            if seen[card as usize] {
                return Err(TableInvariantError::DuplicateCard { card });
            }
            seen[card as usize] = true;
        }
        for seat in [self.dealer_seat, self.next_big_blind_seat, self.action_on] {
            if seat as usize >= MAX_SEATS {
                return Err(TableInvariantError::SeatOutOfRange { seat });
            }
        }
        Ok(())
    }

    /// Clear all per-hand state, leaving occupancy, stacks, config, rotation,
    /// and the fee carry untouched.
    pub fn reset_for_hand(&mut self) {
        for seat in self.seats.iter_mut() {
            seat.reset_for_hand();
        }
        self.phase = TablePhase::Waiting;
        self.commit_deadline = 0;
        self.reveal_deadline = 0;
        self.action_deadline = 0;
        self.current_max_bet = 0;
        self.min_raise = 0;
        self.pot = 0;
        self.community_cards.clear();
        self.shuffle_seed.clear();
    }
}

impl Write for Table {
    fn write(&self, writer: &mut impl BufMut) {
        self.config.write(writer);
        self.phase.write(writer);
        for seat in &self.seats {
            seat.write(writer);
        }
        self.hand_number.write(writer);
        self.dealer_seat.write(writer);
        self.next_big_blind_seat.write(writer);
        self.action_on.write(writer);
        self.commit_deadline.write(writer);
        self.reveal_deadline.write(writer);
        self.action_deadline.write(writer);
        self.current_max_bet.write(writer);
        self.min_raise.write(writer);
        self.pot.write(writer);
        self.community_cards.write(writer);
        self.shuffle_seed.write(writer);
        self.fee_accumulator.write(writer);
        self.total_fees_collected.write(writer);
    }
}

impl Read for Table {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let config = TableConfig::read(reader)?;
        let phase = TablePhase::read(reader)?;
        let mut seats: [Seat; MAX_SEATS] = Default::default();
        for seat in seats.iter_mut() {
            *seat = Seat::read(reader)?;
        }
        let hand_number = u64::read(reader)?;
        let dealer_seat = u8::read(reader)?;
        let next_big_blind_seat = u8::read(reader)?;
        let action_on = u8::read(reader)?;
        let commit_deadline = u64::read(reader)?;
        let reveal_deadline = u64::read(reader)?;
        let action_deadline = u64::read(reader)?;
        let current_max_bet = u64::read(reader)?;
        let min_raise = u64::read(reader)?;
        let pot = u64::read(reader)?;
        let community_cards = Vec::<u8>::read_range(reader, 0..=COMMUNITY_CARDS)?;
        let shuffle_seed = read_optional_bytes(reader, SEED_LEN, SEED_LEN, "Table")?;
        let fee_accumulator = u64::read(reader)?;
        let total_fees_collected = u64::read(reader)?;

        let table = Self {
            config,
            phase,
            seats,
            hand_number,
            dealer_seat,
            next_big_blind_seat,
            action_on,
            commit_deadline,
            reveal_deadline,
            action_deadline,
            current_max_bet,
            min_raise,
            pot,
            community_cards,
            shuffle_seed,
            fee_accumulator,
            total_fees_collected,
        };
        table
            .validate_invariants()
            .map_err(|_| Error::Invalid("Table", "invariant violation"))?;
        Ok(table)
    }
}

impl EncodeSize for Table {
    fn encode_size(&self) -> usize {
        self.config.encode_size()
            + self.phase.encode_size()
            + self.seats.iter().map(Seat::encode_size).sum::<usize>()
            + self.hand_number.encode_size()
            + self.dealer_seat.encode_size()
            + self.next_big_blind_seat.encode_size()
            + self.action_on.encode_size()
            + self.commit_deadline.encode_size()
            + self.reveal_deadline.encode_size()
            + self.action_deadline.encode_size()
            + self.current_max_bet.encode_size()
            + self.min_raise.encode_size()
            + self.pot.encode_size()
            + self.community_cards.encode_size()
            + self.shuffle_seed.encode_size()
            + self.fee_accumulator.encode_size()
            + self.total_fees_collected.encode_size()
    }
}
