use super::*;
use commonware_codec::{Encode, ReadExt};
use commonware_cryptography::{ed25519::PrivateKey, Signer};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn test_config() -> TableConfig {
    TableConfig::new(PrivateKey::from_seed(0).public_key(), 5, 10)
}

#[test]
fn test_phase_roundtrip() {
    for phase in [
        TablePhase::Waiting,
        TablePhase::Commit,
        TablePhase::Reveal,
        TablePhase::PreFlop,
        TablePhase::Flop,
        TablePhase::Turn,
        TablePhase::River,
        TablePhase::Showdown,
    ] {
        let encoded = phase.encode();
        let decoded = TablePhase::read(&mut &encoded[..]).unwrap();
        assert_eq!(phase, decoded);
    }
}

#[test]
fn test_config_validate() {
    let config = test_config();
    assert!(config.validate().is_ok());

    let mut bad = config.clone();
    bad.small_blind = 0;
    assert!(bad.validate().is_err());

    let mut bad = config.clone();
    bad.big_blind = bad.small_blind - 1;
    assert!(bad.validate().is_err());

    let mut bad = config.clone();
    bad.max_buy_in = bad.min_buy_in - 1;
    assert!(bad.validate().is_err());

    let mut bad = config;
    bad.action_views = 0;
    assert!(bad.validate().is_err());
}

#[test]
fn test_table_roundtrip() {
    let mut table = Table::new(test_config());
    table.phase = TablePhase::Flop;
    table.hand_number = 7;
    table.pot = 120;
    table.community_cards = vec![0, 13, 26];
    table.shuffle_seed = vec![0xAB; SEED_LEN];
    table.seats[0].player = Some(PrivateKey::from_seed(1).public_key());
    table.seats[0].chip_stack = 480;
    table.seats[0].status = SeatStatus::Active;
    table.seats[0].commit = vec![1; COMMIT_LEN];
    table.seats[0].reveal = vec![2; SECRET_MIN_LEN];
    table.seats[0].hole_ciphertext = vec![3; HOLE_CARDS];
    table.seats[2].player = Some(PrivateKey::from_seed(2).public_key());
    table.seats[2].status = SeatStatus::AllIn;
    table.seats[2].total_invested = 200;

    let encoded = table.encode();
    let decoded = Table::read(&mut &encoded[..]).unwrap();
    assert_eq!(table, decoded);
}

#[test]
fn test_table_decode_rejects_duplicate_identity() {
    let mut table = Table::new(test_config());
    let pk = PrivateKey::from_seed(1).public_key();
    table.seats[0].player = Some(pk.clone());
    table.seats[3].player = Some(pk);

    assert!(matches!(
        table.validate_invariants(),
        Err(TableInvariantError::DuplicateIdentity { first: 0, second: 3 })
    ));
    let encoded = table.encode();
    assert!(Table::read(&mut &encoded[..]).is_err());
}

#[test]
fn test_table_decode_rejects_bad_community_cards() {
    let mut table = Table::new(test_config());
    table.community_cards = vec![52];
    let encoded = table.encode();
    assert!(Table::read(&mut &encoded[..]).is_err());

    table.community_cards = vec![7, 7];
    let encoded = table.encode();
    assert!(Table::read(&mut &encoded[..]).is_err());
}

#[test]
fn test_seat_decode_rejects_short_commit() {
    let mut seat = Seat {
        player: Some(PrivateKey::from_seed(1).public_key()),
        chip_stack: 100,
        ..Default::default()
    };
    seat.commit = vec![0; COMMIT_LEN - 1];
    let encoded = seat.encode();
    assert!(Seat::read(&mut &encoded[..]).is_err());
}

#[test]
fn test_event_roundtrip() {
    let pk = PrivateKey::from_seed(9).public_key();
    let events = [
        TableEvent::PlayerJoined {
            seat: 1,
            player: pk.clone(),
            buy_in: 500,
        },
        TableEvent::HandStarted {
            hand_number: 3,
            dealer_seat: 0,
            big_blind_seat: 2,
            participants: 0b00111,
        },
        TableEvent::PhaseAdvanced {
            hand_number: 3,
            phase: TablePhase::Reveal,
            deadline: 90,
        },
        TableEvent::HoleCardsDealt {
            hand_number: 3,
            seat: 1,
            ciphertext: vec![0xde, 0xad],
        },
        TableEvent::BlindPosted {
            hand_number: 3,
            seat: 2,
            kind: BlindKind::Big,
            amount: 10,
        },
        TableEvent::ActionTaken {
            hand_number: 3,
            seat: 4,
            action: PlayerAction::Raise,
            amount: 30,
        },
        TableEvent::CommunityDealt {
            hand_number: 3,
            phase: TablePhase::Flop,
            cards: vec![4, 17, 30],
        },
        TableEvent::ShowdownHand {
            hand_number: 3,
            seat: 1,
            hole_cards: vec![12, 25],
            category: 8,
        },
        TableEvent::PotAwarded {
            hand_number: 3,
            seat: 1,
            amount: 95,
        },
        TableEvent::FeeCollected {
            hand_number: 3,
            amount: 1,
            total_collected: 4,
        },
        TableEvent::SeatTimedOut {
            hand_number: 3,
            seat: 0,
            kind: TimeoutKind::Action,
        },
        TableEvent::HandAborted {
            hand_number: 3,
            reason: AbortReason::RevealTimeout,
        },
        TableEvent::PlayerLeft {
            seat: 1,
            player: pk,
            chips: 595,
        },
    ];
    for event in events {
        let encoded = event.encode();
        let decoded = TableEvent::read(&mut &encoded[..]).unwrap();
        assert_eq!(event, decoded);
    }
}

#[test]
fn test_event_decode_rejects_unknown_tag() {
    let encoded = vec![0xFFu8, 0, 0];
    assert!(TableEvent::read(&mut &encoded[..]).is_err());
}

#[test]
fn test_table_decode_fuzz_does_not_panic() {
    let mut rng = StdRng::seed_from_u64(0x7ab1e);
    for _ in 0..1_000 {
        let len = rng.gen_range(0..=256);
        let mut blob = vec![0u8; len];
        rng.fill(&mut blob[..]);
        let _ = Table::read(&mut &blob[..]);
        let _ = TableEvent::read(&mut &blob[..]);
    }
}

#[test]
fn test_chips_on_table_sums_bets_and_pot() {
    let mut table = Table::new(test_config());
    table.seats[0].chip_stack = 90;
    table.seats[0].current_bet = 10;
    table.seats[1].chip_stack = 80;
    table.seats[1].current_bet = 20;
    table.pot = 30;
    assert_eq!(table.chips_on_table(), 230);
}
