//! Table state machine: hand lifecycle from `start_hand` through settlement.
//!
//! Phases run `Waiting -> Commit -> Reveal -> PreFlop -> Flop -> Turn ->
//! River -> Showdown -> Waiting`. Each entry operation validates the caller
//! and phase, mutates the aggregate, and returns the events it emitted. If
//! only one non-folded seat remains at any point the hand short-circuits to
//! a fold win; once no seat can act, the remaining streets run out straight
//! to showdown.

use commonware_cryptography::ed25519::PublicKey;

use holdem_types::poker::{
    AbortReason, BlindKind, TableEvent, MAX_SEATS, MIN_PLAYERS, SEED_LEN,
};
use holdem_types::{SeatStatus, Table, TablePhase};

use crate::actions::street_complete;
use crate::error::TableError;
use crate::evaluator::{evaluate_seven, HandRank};
use crate::ledger::ChipLedger;
use crate::{fees, pot, shuffle};

/// Open a new hand: pick the blind seats, collect owed dead blinds, and
/// enter the commit phase.
pub fn start_hand(table: &mut Table, now: u64) -> Result<Vec<TableEvent>, TableError> {
    if table.phase != TablePhase::Waiting {
        return Err(TableError::WrongPhase(table.phase));
    }

    let eligible: Vec<usize> = (0..MAX_SEATS).filter(|&s| seat_eligible(table, s)).collect();
    if eligible.len() < MIN_PLAYERS {
        return Err(TableError::NotEnoughPlayers(MIN_PLAYERS));
    }

    // The big blind drives rotation: scan clockwise from the cursor, and
    // every occupied seat sitting out of its turn accrues the blind it
    // skipped.
    let mut big_blind = None;
    for k in 0..MAX_SEATS {
        let s = (table.next_big_blind_seat as usize + k) % MAX_SEATS;
        if seat_eligible(table, s) {
            big_blind = Some(s);
            break;
        }
        if table.seats[s].is_occupied() && table.seats[s].sitting_out {
            table.seats[s].missed_blinds = table.seats[s]
                .missed_blinds
                .saturating_add(table.config.big_blind);
        }
    }
    let Some(big_blind) = big_blind else {
        return Err(TableError::NotEnoughPlayers(MIN_PLAYERS));
    };

    for &s in &eligible {
        table.seats[s].status = SeatStatus::Active;
    }

    // Positions are taken counter-clockwise from the big blind; heads-up the
    // dealer posts the small blind.
    let small_blind = prev_participant(&eligible, big_blind);
    let dealer = if eligible.len() == 2 {
        small_blind
    } else {
        prev_participant(&eligible, small_blind)
    };
    table.dealer_seat = dealer as u8;

    // Advance the rotation cursor past this hand's big blind.
    for k in 1..=MAX_SEATS {
        let s = (big_blind + k) % MAX_SEATS;
        if table.seats[s].is_occupied() {
            table.next_big_blind_seat = s as u8;
            break;
        }
    }

    let mut events = vec![TableEvent::HandStarted {
        hand_number: table.hand_number,
        dealer_seat: table.dealer_seat,
        big_blind_seat: big_blind as u8,
        participants: table.participant_mask(),
    }];

    // Dead blinds owed from sitting out are collected up front, straight
    // into the pot.
    for &s in &eligible {
        let owed = table.seats[s].missed_blinds;
        if owed == 0 {
            continue;
        }
        {
            let seat = &mut table.seats[s];
            seat.chip_stack = seat.chip_stack.saturating_sub(owed);
            seat.total_invested = seat.total_invested.saturating_add(owed);
            seat.missed_blinds = 0;
        }
        table.pot = table.pot.saturating_add(owed);
        events.push(TableEvent::BlindPosted {
            hand_number: table.hand_number,
            seat: s as u8,
            kind: BlindKind::Dead,
            amount: owed,
        });
    }

    table.phase = TablePhase::Commit;
    table.commit_deadline = now.saturating_add(table.config.commit_views);
    events.push(TableEvent::PhaseAdvanced {
        hand_number: table.hand_number,
        phase: TablePhase::Commit,
        deadline: table.commit_deadline,
    });

    tracing::debug!(
        hand = table.hand_number,
        dealer = table.dealer_seat,
        players = eligible.len(),
        "hand started"
    );
    Ok(events)
}

/// Record a seat's 32-byte commitment. When the last participant commits,
/// the table moves to the reveal phase.
pub fn submit_commit(
    table: &mut Table,
    player: &PublicKey,
    commitment: &[u8],
    now: u64,
) -> Result<Vec<TableEvent>, TableError> {
    if table.phase != TablePhase::Commit {
        return Err(TableError::WrongPhase(table.phase));
    }
    let seat_index = table.seat_of(player).ok_or(TableError::NotSeated)?;
    if table.seats[seat_index].status != SeatStatus::Active {
        return Err(TableError::NotInHand);
    }
    if now >= table.commit_deadline {
        return Err(TableError::DeadlineElapsed);
    }
    if commitment.len() != holdem_types::poker::COMMIT_LEN {
        return Err(TableError::InvalidCommitLength(commitment.len()));
    }
    if !table.seats[seat_index].commit.is_empty() {
        return Err(TableError::AlreadyCommitted);
    }
    table.seats[seat_index].commit = commitment.to_vec();

    let mut events = vec![TableEvent::CommitRecorded {
        hand_number: table.hand_number,
        seat: seat_index as u8,
    }];
    let all_committed = table
        .seats
        .iter()
        .filter(|s| s.status == SeatStatus::Active)
        .all(|s| !s.commit.is_empty());
    if all_committed {
        enter_reveal(table, now, &mut events);
    }
    Ok(events)
}

/// Disclose a secret and check it against the commitment. A mismatch
/// rejects the reveal; the hand stays put. When the last participant
/// reveals, the deck is shuffled and hole cards are dealt.
pub fn reveal_secret(
    table: &mut Table,
    player: &PublicKey,
    secret: &[u8],
    now: u64,
    entropy: &[u8; SEED_LEN],
    ledger: &mut dyn ChipLedger,
) -> Result<Vec<TableEvent>, TableError> {
    if table.phase != TablePhase::Reveal {
        return Err(TableError::WrongPhase(table.phase));
    }
    let seat_index = table.seat_of(player).ok_or(TableError::NotSeated)?;
    if table.seats[seat_index].status != SeatStatus::Active {
        return Err(TableError::NotInHand);
    }
    if now >= table.reveal_deadline {
        return Err(TableError::DeadlineElapsed);
    }
    if table.seats[seat_index].commit.is_empty() {
        return Err(TableError::MissingCommit);
    }
    if !table.seats[seat_index].reveal.is_empty() {
        return Err(TableError::AlreadyRevealed);
    }
    shuffle::verify_reveal(&table.seats[seat_index].commit, secret)?;
    table.seats[seat_index].reveal = secret.to_vec();

    let mut events = vec![TableEvent::RevealRecorded {
        hand_number: table.hand_number,
        seat: seat_index as u8,
    }];
    let all_revealed = table
        .seats
        .iter()
        .filter(|s| s.status == SeatStatus::Active)
        .all(|s| !s.reveal.is_empty());
    if all_revealed {
        deal_hand(table, now, entropy, ledger, &mut events)?;
    }
    Ok(events)
}

/// True when the seat can be dealt into the next hand.
fn seat_eligible(table: &Table, seat: usize) -> bool {
    let s = &table.seats[seat];
    s.is_occupied()
        && !s.sitting_out
        && s.chip_stack >= s.missed_blinds.saturating_add(table.config.big_blind)
}

/// The participant immediately counter-clockwise of `from`.
fn prev_participant(participants: &[usize], from: usize) -> usize {
    let pos = participants
        .iter()
        .position(|&s| s == from)
        .unwrap_or(0);
    let prev = (pos + participants.len() - 1) % participants.len();
    participants[prev]
}

/// First seat matching `pred` scanning clockwise from (and excluding)
/// `start`.
pub(crate) fn next_seat_where(
    table: &Table,
    start: usize,
    pred: impl Fn(usize) -> bool,
) -> Option<usize> {
    (1..=MAX_SEATS)
        .map(|k| (start + k) % MAX_SEATS)
        .find(|&s| pred(s))
}

pub(crate) fn enter_reveal(table: &mut Table, now: u64, events: &mut Vec<TableEvent>) {
    table.phase = TablePhase::Reveal;
    table.reveal_deadline = now.saturating_add(table.config.reveal_views);
    events.push(TableEvent::PhaseAdvanced {
        hand_number: table.hand_number,
        phase: TablePhase::Reveal,
        deadline: table.reveal_deadline,
    });
}

/// Seat indices that were dealt hole cards, in seat order. Stable for the
/// rest of the hand regardless of later folds.
fn dealt_seats(table: &Table) -> Vec<usize> {
    (0..MAX_SEATS)
        .filter(|&s| !table.seats[s].hole_ciphertext.is_empty())
        .collect()
}

fn deck_from_seed(table: &Table) -> Result<[u8; 52], TableError> {
    let seed: [u8; SEED_LEN] = table
        .shuffle_seed
        .as_slice()
        .try_into()
        .map_err(|_| TableError::InternalState("shuffle seed missing"))?;
    Ok(shuffle::shuffled_deck(&seed))
}

/// Shuffle from the collected secrets, deal encrypted hole cards, and post
/// blinds into the preflop street.
pub(crate) fn deal_hand(
    table: &mut Table,
    now: u64,
    entropy: &[u8; SEED_LEN],
    ledger: &mut dyn ChipLedger,
    events: &mut Vec<TableEvent>,
) -> Result<(), TableError> {
    let participants: Vec<usize> = (0..MAX_SEATS)
        .filter(|&s| table.seats[s].status == SeatStatus::Active)
        .collect();
    let secrets: Vec<&[u8]> = participants
        .iter()
        .map(|&s| table.seats[s].reveal.as_slice())
        .collect();
    let seed = shuffle::derive_seed(
        &secrets,
        table.commit_deadline,
        table.reveal_deadline,
        entropy,
    );
    table.shuffle_seed = seed.to_vec();
    let deck = shuffle::shuffled_deck(&seed);

    for (k, &s) in participants.iter().enumerate() {
        let hole = [deck[2 * k], deck[2 * k + 1]];
        let key = shuffle::hole_card_key(&table.seats[s].reveal, s as u64);
        table.seats[s].hole_ciphertext = shuffle::xor_hole_cards(&hole, &key);
        events.push(TableEvent::HoleCardsDealt {
            hand_number: table.hand_number,
            seat: s as u8,
            ciphertext: table.seats[s].hole_ciphertext.clone(),
        });
    }

    table.phase = TablePhase::PreFlop;
    table.action_deadline = now.saturating_add(table.config.action_views);
    events.push(TableEvent::PhaseAdvanced {
        hand_number: table.hand_number,
        phase: TablePhase::PreFlop,
        deadline: table.action_deadline,
    });

    // Blind positions derive from the dealer anchor so that seats dropped
    // during commit/reveal do not leave a hole: heads-up the dealer posts
    // the small blind.
    let (small_blind, big_blind) = blind_seats(table, &participants);

    let ante = table.config.ante;
    if ante > 0 {
        for &s in &participants {
            let amount = ante.min(table.seats[s].chip_stack);
            {
                let seat = &mut table.seats[s];
                seat.chip_stack -= amount;
                seat.total_invested = seat.total_invested.saturating_add(amount);
                if seat.chip_stack == 0 {
                    seat.status = SeatStatus::AllIn;
                }
            }
            table.pot = table.pot.saturating_add(amount);
            events.push(TableEvent::BlindPosted {
                hand_number: table.hand_number,
                seat: s as u8,
                kind: BlindKind::Ante,
                amount,
            });
        }
    }

    for (s, kind, size) in [
        (small_blind, BlindKind::Small, table.config.small_blind),
        (big_blind, BlindKind::Big, table.config.big_blind),
    ] {
        let amount = size.min(table.seats[s].chip_stack);
        pot::post_bet(&mut table.seats[s], amount);
        if table.seats[s].chip_stack == 0 {
            table.seats[s].status = SeatStatus::AllIn;
        }
        events.push(TableEvent::BlindPosted {
            hand_number: table.hand_number,
            seat: s as u8,
            kind,
            amount,
        });
    }

    // The big blind sets the price of the street even when posted short.
    table.current_max_bet = table.config.big_blind;
    table.min_raise = table.config.big_blind;

    if street_complete(table) {
        return finish_street(table, now, events, ledger);
    }
    let next = next_seat_where(table, big_blind, |s| {
        table.seats[s].status == SeatStatus::Active
    });
    table.action_on = next.ok_or(TableError::InternalState("no seat to act"))? as u8;
    Ok(())
}

/// Small- and big-blind seats for this hand, derived from the dealer.
fn blind_seats(table: &Table, participants: &[usize]) -> (usize, usize) {
    let dealer = table.dealer_seat as usize;
    if participants.len() == 2 {
        let small = if participants.contains(&dealer) {
            dealer
        } else {
            // The dealer seat dropped out before the deal; the next
            // participant clockwise inherits the button.
            next_seat_where(table, dealer, |s| participants.contains(&s)).unwrap_or(participants[0])
        };
        let big = if participants[0] == small {
            participants[1]
        } else {
            participants[0]
        };
        (small, big)
    } else {
        let small = next_seat_where(table, dealer, |s| participants.contains(&s))
            .unwrap_or(participants[0]);
        let big =
            next_seat_where(table, small, |s| participants.contains(&s)).unwrap_or(participants[0]);
        (small, big)
    }
}

/// Close the current street and advance: fold win, next street, or
/// showdown. Streets with no seat left to act run out back-to-back.
pub(crate) fn finish_street(
    table: &mut Table,
    now: u64,
    events: &mut Vec<TableEvent>,
    ledger: &mut dyn ChipLedger,
) -> Result<(), TableError> {
    loop {
        let closing = table.phase;
        pot::collect_street(table);
        events.push(TableEvent::StreetClosed {
            hand_number: table.hand_number,
            phase: closing,
            pot: table.pot,
        });

        if table.in_hand_count() <= 1 {
            return settle_fold_win(table, events, ledger);
        }

        let (next_phase, draw) = match table.phase {
            TablePhase::PreFlop => (TablePhase::Flop, 3),
            TablePhase::Flop => (TablePhase::Turn, 1),
            TablePhase::Turn => (TablePhase::River, 1),
            TablePhase::River => return settle_showdown(table, events, ledger),
            phase => return Err(TableError::WrongPhase(phase)),
        };

        let deck = deck_from_seed(table)?;
        let offset = 2 * dealt_seats(table).len() + table.community_cards.len();
        let cards: Vec<u8> = deck[offset..offset + draw].to_vec();
        table.community_cards.extend_from_slice(&cards);
        table.phase = next_phase;
        table.action_deadline = now.saturating_add(table.config.action_views);
        events.push(TableEvent::PhaseAdvanced {
            hand_number: table.hand_number,
            phase: next_phase,
            deadline: table.action_deadline,
        });
        events.push(TableEvent::CommunityDealt {
            hand_number: table.hand_number,
            phase: next_phase,
            cards,
        });

        if street_complete(table) {
            // Nobody can act: keep running the board out.
            continue;
        }
        let next = next_seat_where(table, table.dealer_seat as usize, |s| {
            table.seats[s].status == SeatStatus::Active
        });
        table.action_on = next.ok_or(TableError::InternalState("no seat to act"))? as u8;
        return Ok(());
    }
}

/// Award the whole pot to the sole surviving seat without evaluation.
fn settle_fold_win(
    table: &mut Table,
    events: &mut Vec<TableEvent>,
    ledger: &mut dyn ChipLedger,
) -> Result<(), TableError> {
    let winner = (0..MAX_SEATS)
        .find(|&s| table.seats[s].in_hand())
        .ok_or(TableError::InternalState("no surviving seat"))?;

    let mut award = table.pot;
    let collected = fees::accrue_rake(table, award);
    if collected > 0 {
        award -= collected;
        collect_fee(table, collected, ledger, events);
    }
    table.seats[winner].chip_stack = table.seats[winner].chip_stack.saturating_add(award);
    table.pot = 0;
    events.push(TableEvent::PotAwarded {
        hand_number: table.hand_number,
        seat: winner as u8,
        amount: award,
    });
    tracing::info!(
        hand = table.hand_number,
        winner,
        amount = award,
        "hand resolved by folds"
    );
    teardown(table, events, ledger);
    Ok(())
}

/// Evaluate every surviving hand, tier the pot, and pay the winners.
fn settle_showdown(
    table: &mut Table,
    events: &mut Vec<TableEvent>,
    ledger: &mut dyn ChipLedger,
) -> Result<(), TableError> {
    table.phase = TablePhase::Showdown;
    events.push(TableEvent::PhaseAdvanced {
        hand_number: table.hand_number,
        phase: TablePhase::Showdown,
        deadline: 0,
    });
    if table.community_cards.len() != holdem_types::poker::COMMUNITY_CARDS {
        return Err(TableError::InternalState("incomplete board at showdown"));
    }

    let deck = deck_from_seed(table)?;
    let dealt = dealt_seats(table);
    let mut ranks: [Option<HandRank>; MAX_SEATS] = Default::default();
    for (k, &s) in dealt.iter().enumerate() {
        if !table.seats[s].in_hand() {
            continue;
        }
        let hole = [deck[2 * k], deck[2 * k + 1]];
        let mut seven = [0u8; 7];
        seven[..2].copy_from_slice(&hole);
        seven[2..].copy_from_slice(&table.community_cards);
        let rank = evaluate_seven(&seven)?;
        events.push(TableEvent::ShowdownHand {
            hand_number: table.hand_number,
            seat: s as u8,
            hole_cards: hole.to_vec(),
            category: rank.category as u8,
        });
        ranks[s] = Some(rank);
    }

    let mut invested = [0u64; MAX_SEATS];
    let mut contesting = [false; MAX_SEATS];
    for s in 0..MAX_SEATS {
        invested[s] = table.seats[s].total_invested;
        contesting[s] = table.seats[s].in_hand();
    }
    let mut tiers = pot::side_pots(&invested, &contesting);

    let total_pot = table.pot;
    let collected = fees::accrue_rake(table, total_pot);
    if collected > 0 {
        // The rake comes off the top of the lowest tiers first.
        let mut remaining = collected;
        for tier in tiers.iter_mut() {
            let take = tier.amount.min(remaining);
            tier.amount -= take;
            remaining -= take;
            if remaining == 0 {
                break;
            }
        }
        collect_fee(table, collected, ledger, events);
    }

    let start = (table.dealer_seat as usize + 1) % MAX_SEATS;
    let winnings = pot::distribute(&tiers, &ranks, start);
    for (s, &amount) in winnings.iter().enumerate() {
        if amount == 0 {
            continue;
        }
        table.seats[s].chip_stack = table.seats[s].chip_stack.saturating_add(amount);
        events.push(TableEvent::PotAwarded {
            hand_number: table.hand_number,
            seat: s as u8,
            amount,
        });
    }
    table.pot = 0;
    tracing::info!(hand = table.hand_number, fees = collected, "showdown settled");
    teardown(table, events, ledger);
    Ok(())
}

fn collect_fee(
    table: &mut Table,
    amount: u64,
    ledger: &mut dyn ChipLedger,
    events: &mut Vec<TableEvent>,
) {
    if let Some(collector) = table.config.fee_collector.clone() {
        ledger.credit(&collector, amount);
    }
    events.push(TableEvent::FeeCollected {
        hand_number: table.hand_number,
        amount,
        total_collected: table.total_fees_collected,
    });
}

/// Refund every seat's hand investment and tear the hand down.
pub(crate) fn abort_hand(
    table: &mut Table,
    reason: AbortReason,
    events: &mut Vec<TableEvent>,
    ledger: &mut dyn ChipLedger,
) {
    for seat in table.seats.iter_mut() {
        if seat.total_invested > 0 {
            seat.chip_stack = seat.chip_stack.saturating_add(seat.total_invested);
        }
    }
    events.push(TableEvent::HandAborted {
        hand_number: table.hand_number,
        reason,
    });
    tracing::warn!(hand = table.hand_number, ?reason, "hand aborted");
    teardown(table, events, ledger);
}

/// Close the hand: honor queued leaves, bump the hand counter, and clear
/// all per-hand state.
fn teardown(table: &mut Table, events: &mut Vec<TableEvent>, ledger: &mut dyn ChipLedger) {
    for s in 0..MAX_SEATS {
        if !table.seats[s].pending_leave {
            continue;
        }
        let Some(player) = table.seats[s].player.take() else {
            continue;
        };
        let chips = table.seats[s].chip_stack;
        table.seats[s] = Default::default();
        ledger.credit(&player, chips);
        events.push(TableEvent::PlayerLeft {
            seat: s as u8,
            player,
            chips,
        });
    }
    table.hand_number = table.hand_number.saturating_add(1);
    table.reset_for_hand();
    events.push(TableEvent::PhaseAdvanced {
        hand_number: table.hand_number,
        phase: TablePhase::Waiting,
        deadline: 0,
    });
}
