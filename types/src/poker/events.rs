use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, FixedSize, Read, ReadExt, ReadRangeExt, Write};
use commonware_cryptography::ed25519::PublicKey;

use super::{TablePhase, COMMUNITY_CARDS, HOLE_CARDS};

/// Voluntary betting action taken by a seat.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerAction {
    Fold = 0,
    Check = 1,
    Call = 2,
    Raise = 3,
    AllIn = 4,
    Straddle = 5,
}

impl TryFrom<u8> for PlayerAction {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(PlayerAction::Fold),
            1 => Ok(PlayerAction::Check),
            2 => Ok(PlayerAction::Call),
            3 => Ok(PlayerAction::Raise),
            4 => Ok(PlayerAction::AllIn),
            5 => Ok(PlayerAction::Straddle),
            _ => Err(()),
        }
    }
}

/// Forced contribution posted at preflop entry.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlindKind {
    Small = 0,
    Big = 1,
    Ante = 2,
    /// Dead money owed for blinds missed while sitting out.
    Dead = 3,
}

impl TryFrom<u8> for BlindKind {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(BlindKind::Small),
            1 => Ok(BlindKind::Big),
            2 => Ok(BlindKind::Ante),
            3 => Ok(BlindKind::Dead),
            _ => Err(()),
        }
    }
}

/// Which deadline a timeout enforcement acted on.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeoutKind {
    Commit = 0,
    Reveal = 1,
    Action = 2,
}

impl TryFrom<u8> for TimeoutKind {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(TimeoutKind::Commit),
            1 => Ok(TimeoutKind::Reveal),
            2 => Ok(TimeoutKind::Action),
            _ => Err(()),
        }
    }
}

/// Why a hand was torn down before showdown.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AbortReason {
    CommitTimeout = 0,
    RevealTimeout = 1,
    Emergency = 2,
}

impl TryFrom<u8> for AbortReason {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(AbortReason::CommitTimeout),
            1 => Ok(AbortReason::RevealTimeout),
            2 => Ok(AbortReason::Emergency),
            _ => Err(()),
        }
    }
}

/// One structured fact per meaningful table transition. Off-chain observers
/// can reconstruct the full hand history from the event stream alone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TableEvent {
    // Seat management (tags 1-3)
    PlayerJoined {
        seat: u8,
        player: PublicKey,
        buy_in: u64,
    },
    PlayerLeft {
        seat: u8,
        player: PublicKey,
        chips: u64,
    },
    ToppedUp {
        seat: u8,
        amount: u64,
        new_stack: u64,
    },

    // Hand lifecycle (tags 4-8)
    HandStarted {
        hand_number: u64,
        dealer_seat: u8,
        big_blind_seat: u8,
        participants: u8,
    },
    CommitRecorded {
        hand_number: u64,
        seat: u8,
    },
    RevealRecorded {
        hand_number: u64,
        seat: u8,
    },
    PhaseAdvanced {
        hand_number: u64,
        phase: TablePhase,
        deadline: u64,
    },
    HoleCardsDealt {
        hand_number: u64,
        seat: u8,
        ciphertext: Vec<u8>,
    },

    // Betting (tags 9-12)
    BlindPosted {
        hand_number: u64,
        seat: u8,
        kind: BlindKind,
        amount: u64,
    },
    ActionTaken {
        hand_number: u64,
        seat: u8,
        action: PlayerAction,
        amount: u64,
    },
    StreetClosed {
        hand_number: u64,
        phase: TablePhase,
        pot: u64,
    },
    CommunityDealt {
        hand_number: u64,
        phase: TablePhase,
        cards: Vec<u8>,
    },

    // Settlement (tags 13-15)
    ShowdownHand {
        hand_number: u64,
        seat: u8,
        hole_cards: Vec<u8>,
        category: u8,
    },
    PotAwarded {
        hand_number: u64,
        seat: u8,
        amount: u64,
    },
    FeeCollected {
        hand_number: u64,
        amount: u64,
        total_collected: u64,
    },

    // Faults (tags 16-18)
    RevealPenalty {
        hand_number: u64,
        seat: u8,
        amount: u64,
    },
    SeatTimedOut {
        hand_number: u64,
        seat: u8,
        kind: TimeoutKind,
    },
    HandAborted {
        hand_number: u64,
        reason: AbortReason,
    },
}

impl Write for TableEvent {
    fn write(&self, writer: &mut impl BufMut) {
        match self {
            Self::PlayerJoined {
                seat,
                player,
                buy_in,
            } => {
                1u8.write(writer);
                seat.write(writer);
                player.write(writer);
                buy_in.write(writer);
            }
            Self::PlayerLeft {
                seat,
                player,
                chips,
            } => {
                2u8.write(writer);
                seat.write(writer);
                player.write(writer);
                chips.write(writer);
            }
            Self::ToppedUp {
                seat,
                amount,
                new_stack,
            } => {
                3u8.write(writer);
                seat.write(writer);
                amount.write(writer);
                new_stack.write(writer);
            }
            Self::HandStarted {
                hand_number,
                dealer_seat,
                big_blind_seat,
                participants,
            } => {
                4u8.write(writer);
                hand_number.write(writer);
                dealer_seat.write(writer);
                big_blind_seat.write(writer);
                participants.write(writer);
            }
            Self::CommitRecorded { hand_number, seat } => {
                5u8.write(writer);
                hand_number.write(writer);
                seat.write(writer);
            }
            Self::RevealRecorded { hand_number, seat } => {
                6u8.write(writer);
                hand_number.write(writer);
                seat.write(writer);
            }
            Self::PhaseAdvanced {
                hand_number,
                phase,
                deadline,
            } => {
                7u8.write(writer);
                hand_number.write(writer);
                phase.write(writer);
                deadline.write(writer);
            }
            Self::HoleCardsDealt {
                hand_number,
                seat,
                ciphertext,
            } => {
                8u8.write(writer);
                hand_number.write(writer);
                seat.write(writer);
                ciphertext.write(writer);
            }
            Self::BlindPosted {
                hand_number,
                seat,
                kind,
                amount,
            } => {
                9u8.write(writer);
                hand_number.write(writer);
                seat.write(writer);
                (*kind as u8).write(writer);
                amount.write(writer);
            }
            Self::ActionTaken {
                hand_number,
                seat,
                action,
                amount,
            } => {
                10u8.write(writer);
                hand_number.write(writer);
                seat.write(writer);
                (*action as u8).write(writer);
                amount.write(writer);
            }
            Self::StreetClosed {
                hand_number,
                phase,
                pot,
            } => {
                11u8.write(writer);
                hand_number.write(writer);
                phase.write(writer);
                pot.write(writer);
            }
            Self::CommunityDealt {
                hand_number,
                phase,
                cards,
            } => {
                12u8.write(writer);
                hand_number.write(writer);
                phase.write(writer);
                cards.write(writer);
            }
            Self::ShowdownHand {
                hand_number,
                seat,
                hole_cards,
                category,
            } => {
                13u8.write(writer);
                hand_number.write(writer);
                seat.write(writer);
                hole_cards.write(writer);
                category.write(writer);
            }
            Self::PotAwarded {
                hand_number,
                seat,
                amount,
            } => {
                14u8.write(writer);
                hand_number.write(writer);
                seat.write(writer);
                amount.write(writer);
            }
            Self::FeeCollected {
                hand_number,
                amount,
                total_collected,
            } => {
                15u8.write(writer);
                hand_number.write(writer);
                amount.write(writer);
                total_collected.write(writer);
            }
            Self::RevealPenalty {
                hand_number,
                seat,
                amount,
            } => {
                16u8.write(writer);
                hand_number.write(writer);
                seat.write(writer);
                amount.write(writer);
            }
            Self::SeatTimedOut {
                hand_number,
                seat,
                kind,
            } => {
                17u8.write(writer);
                hand_number.write(writer);
                seat.write(writer);
                (*kind as u8).write(writer);
            }
            Self::HandAborted {
                hand_number,
                reason,
            } => {
                18u8.write(writer);
                hand_number.write(writer);
                (*reason as u8).write(writer);
            }
        }
    }
}

impl Read for TableEvent {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let tag = u8::read(reader)?;
        let event = match tag {
            1 => Self::PlayerJoined {
                seat: u8::read(reader)?,
                player: PublicKey::read(reader)?,
                buy_in: u64::read(reader)?,
            },
            2 => Self::PlayerLeft {
                seat: u8::read(reader)?,
                player: PublicKey::read(reader)?,
                chips: u64::read(reader)?,
            },
            3 => Self::ToppedUp {
                seat: u8::read(reader)?,
                amount: u64::read(reader)?,
                new_stack: u64::read(reader)?,
            },
            4 => Self::HandStarted {
                hand_number: u64::read(reader)?,
                dealer_seat: u8::read(reader)?,
                big_blind_seat: u8::read(reader)?,
                participants: u8::read(reader)?,
            },
            5 => Self::CommitRecorded {
                hand_number: u64::read(reader)?,
                seat: u8::read(reader)?,
            },
            6 => Self::RevealRecorded {
                hand_number: u64::read(reader)?,
                seat: u8::read(reader)?,
            },
            7 => Self::PhaseAdvanced {
                hand_number: u64::read(reader)?,
                phase: TablePhase::read(reader)?,
                deadline: u64::read(reader)?,
            },
            8 => Self::HoleCardsDealt {
                hand_number: u64::read(reader)?,
                seat: u8::read(reader)?,
                ciphertext: Vec::<u8>::read_range(reader, 0..=HOLE_CARDS)?,
            },
            9 => {
                let hand_number = u64::read(reader)?;
                let seat = u8::read(reader)?;
                let kind = u8::read(reader)?;
                let kind = BlindKind::try_from(kind).map_err(|_| Error::InvalidEnum(kind))?;
                Self::BlindPosted {
                    hand_number,
                    seat,
                    kind,
                    amount: u64::read(reader)?,
                }
            }
            10 => {
                let hand_number = u64::read(reader)?;
                let seat = u8::read(reader)?;
                let action = u8::read(reader)?;
                let action =
                    PlayerAction::try_from(action).map_err(|_| Error::InvalidEnum(action))?;
                Self::ActionTaken {
                    hand_number,
                    seat,
                    action,
                    amount: u64::read(reader)?,
                }
            }
            11 => Self::StreetClosed {
                hand_number: u64::read(reader)?,
                phase: TablePhase::read(reader)?,
                pot: u64::read(reader)?,
            },
            12 => Self::CommunityDealt {
                hand_number: u64::read(reader)?,
                phase: TablePhase::read(reader)?,
                cards: Vec::<u8>::read_range(reader, 0..=COMMUNITY_CARDS)?,
            },
            13 => Self::ShowdownHand {
                hand_number: u64::read(reader)?,
                seat: u8::read(reader)?,
                hole_cards: Vec::<u8>::read_range(reader, 0..=HOLE_CARDS)?,
                category: u8::read(reader)?,
            },
            14 => Self::PotAwarded {
                hand_number: u64::read(reader)?,
                seat: u8::read(reader)?,
                amount: u64::read(reader)?,
            },
            15 => Self::FeeCollected {
                hand_number: u64::read(reader)?,
                amount: u64::read(reader)?,
                total_collected: u64::read(reader)?,
            },
            16 => Self::RevealPenalty {
                hand_number: u64::read(reader)?,
                seat: u8::read(reader)?,
                amount: u64::read(reader)?,
            },
            17 => {
                let hand_number = u64::read(reader)?;
                let seat = u8::read(reader)?;
                let kind = u8::read(reader)?;
                let kind = TimeoutKind::try_from(kind).map_err(|_| Error::InvalidEnum(kind))?;
                Self::SeatTimedOut {
                    hand_number,
                    seat,
                    kind,
                }
            }
            18 => {
                let hand_number = u64::read(reader)?;
                let reason = u8::read(reader)?;
                let reason =
                    AbortReason::try_from(reason).map_err(|_| Error::InvalidEnum(reason))?;
                Self::HandAborted {
                    hand_number,
                    reason,
                }
            }
            i => return Err(Error::InvalidEnum(i)),
        };
        Ok(event)
    }
}

impl EncodeSize for TableEvent {
    fn encode_size(&self) -> usize {
        u8::SIZE
            + match self {
                Self::PlayerJoined {
                    seat,
                    player,
                    buy_in,
                } => seat.encode_size() + player.encode_size() + buy_in.encode_size(),
                Self::PlayerLeft {
                    seat,
                    player,
                    chips,
                } => seat.encode_size() + player.encode_size() + chips.encode_size(),
                Self::ToppedUp {
                    seat,
                    amount,
                    new_stack,
                } => seat.encode_size() + amount.encode_size() + new_stack.encode_size(),
                Self::HandStarted {
                    hand_number,
                    dealer_seat,
                    big_blind_seat,
                    participants,
                } => {
                    hand_number.encode_size()
                        + dealer_seat.encode_size()
                        + big_blind_seat.encode_size()
                        + participants.encode_size()
                }
                Self::CommitRecorded { hand_number, seat }
                | Self::RevealRecorded { hand_number, seat } => {
                    hand_number.encode_size() + seat.encode_size()
                }
                Self::PhaseAdvanced {
                    hand_number,
                    phase,
                    deadline,
                } => hand_number.encode_size() + phase.encode_size() + deadline.encode_size(),
                Self::HoleCardsDealt {
                    hand_number,
                    seat,
                    ciphertext,
                } => hand_number.encode_size() + seat.encode_size() + ciphertext.encode_size(),
                Self::BlindPosted {
                    hand_number,
                    seat,
                    amount,
                    ..
                } => hand_number.encode_size() + seat.encode_size() + u8::SIZE + amount.encode_size(),
                Self::ActionTaken {
                    hand_number,
                    seat,
                    amount,
                    ..
                } => hand_number.encode_size() + seat.encode_size() + u8::SIZE + amount.encode_size(),
                Self::StreetClosed {
                    hand_number,
                    phase,
                    pot,
                } => hand_number.encode_size() + phase.encode_size() + pot.encode_size(),
                Self::CommunityDealt {
                    hand_number,
                    phase,
                    cards,
                } => hand_number.encode_size() + phase.encode_size() + cards.encode_size(),
                Self::ShowdownHand {
                    hand_number,
                    seat,
                    hole_cards,
                    category,
                } => {
                    hand_number.encode_size()
                        + seat.encode_size()
                        + hole_cards.encode_size()
                        + category.encode_size()
                }
                Self::PotAwarded {
                    hand_number,
                    seat,
                    amount,
                } => hand_number.encode_size() + seat.encode_size() + amount.encode_size(),
                Self::FeeCollected {
                    hand_number,
                    amount,
                    total_collected,
                } => {
                    hand_number.encode_size()
                        + amount.encode_size()
                        + total_collected.encode_size()
                }
                Self::RevealPenalty {
                    hand_number,
                    seat,
                    amount,
                } => hand_number.encode_size() + seat.encode_size() + amount.encode_size(),
                Self::SeatTimedOut {
                    hand_number, seat, ..
                } => hand_number.encode_size() + seat.encode_size() + u8::SIZE,
                Self::HandAborted { hand_number, .. } => hand_number.encode_size() + u8::SIZE,
            }
    }
}
