//! Seven-card hand evaluator.
//!
//! Takes the two hole cards plus the five community cards and returns the
//! best five-card hand as a totally ordered key: category first, then
//! tiebreak ranks compared lexicographically. Ranks in tiebreaks use the
//! ace-high comparison values (2..=14).

use crate::cards;
use crate::error::TableError;

/// Hand categories, weakest to strongest.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum HandCategory {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
    RoyalFlush = 9,
}

impl TryFrom<u8> for HandCategory {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(HandCategory::HighCard),
            1 => Ok(HandCategory::OnePair),
            2 => Ok(HandCategory::TwoPair),
            3 => Ok(HandCategory::ThreeOfAKind),
            4 => Ok(HandCategory::Straight),
            5 => Ok(HandCategory::Flush),
            6 => Ok(HandCategory::FullHouse),
            7 => Ok(HandCategory::FourOfAKind),
            8 => Ok(HandCategory::StraightFlush),
            9 => Ok(HandCategory::RoyalFlush),
            _ => Err(()),
        }
    }
}

/// Comparable hand strength. Derived ordering compares the category first
/// and then the tiebreak ranks lexicographically; equal keys mean a split.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct HandRank {
    pub category: HandCategory,
    pub tiebreaks: Vec<u8>,
}

/// Evaluate a five-card hand. Input cards are assumed valid and distinct.
fn evaluate_five(cards: &[u8; 5]) -> HandRank {
    let mut values = [0u8; 5];
    let mut suits = [0u8; 5];
    for i in 0..5 {
        values[i] = cards::card_rank_value(cards[i]);
        suits[i] = cards::card_suit(cards[i]);
    }

    let is_flush = suits.iter().all(|&s| s == suits[0]);

    let mut sorted = values;
    sorted.sort_unstable();
    let distinct = sorted.windows(2).all(|w| w[0] != w[1]);
    // The wheel (A-2-3-4-5) is the one case where the Ace plays low; it
    // ranks as a five-high straight, below every other straight.
    let is_wheel = sorted == [2, 3, 4, 5, 14];
    let is_straight = distinct && (sorted[4] - sorted[0] == 4 || is_wheel);
    let straight_high = if is_wheel { 5 } else { sorted[4] };

    let mut counts = [0u8; 15];
    for &v in &values {
        counts[v as usize] += 1;
    }

    let mut quad = 0u8;
    let mut trip = 0u8;
    let mut pairs: Vec<u8> = Vec::with_capacity(2);
    let mut kickers: Vec<u8> = Vec::with_capacity(5);
    for v in (2..=14u8).rev() {
        match counts[v as usize] {
            4 => quad = v,
            3 => trip = v,
            2 => pairs.push(v),
            1 => kickers.push(v),
            _ => {}
        }
    }

    let mut desc = values;
    desc.sort_unstable_by(|a, b| b.cmp(a));

    if is_straight && is_flush {
        return if straight_high == 14 {
            HandRank {
                category: HandCategory::RoyalFlush,
                tiebreaks: vec![14],
            }
        } else {
            HandRank {
                category: HandCategory::StraightFlush,
                tiebreaks: vec![straight_high],
            }
        };
    }
    if quad > 0 {
        return HandRank {
            category: HandCategory::FourOfAKind,
            tiebreaks: vec![quad, kickers[0]],
        };
    }
    if trip > 0 && !pairs.is_empty() {
        return HandRank {
            category: HandCategory::FullHouse,
            tiebreaks: vec![trip, pairs[0]],
        };
    }
    if is_flush {
        return HandRank {
            category: HandCategory::Flush,
            tiebreaks: desc.to_vec(),
        };
    }
    if is_straight {
        return HandRank {
            category: HandCategory::Straight,
            tiebreaks: vec![straight_high],
        };
    }
    if trip > 0 {
        return HandRank {
            category: HandCategory::ThreeOfAKind,
            tiebreaks: vec![trip, kickers[0], kickers[1]],
        };
    }
    if pairs.len() >= 2 {
        return HandRank {
            category: HandCategory::TwoPair,
            tiebreaks: vec![pairs[0], pairs[1], kickers[0]],
        };
    }
    if pairs.len() == 1 {
        return HandRank {
            category: HandCategory::OnePair,
            tiebreaks: vec![pairs[0], kickers[0], kickers[1], kickers[2]],
        };
    }
    HandRank {
        category: HandCategory::HighCard,
        tiebreaks: desc.to_vec(),
    }
}

/// Evaluate the best five-card hand out of exactly seven cards.
///
/// Rejects any input that is not seven distinct, in-range cards; an upstream
/// miscount must never be folded into a quiet misevaluation.
pub fn evaluate_seven(cards: &[u8]) -> Result<HandRank, TableError> {
    if cards.len() != 7 {
        return Err(TableError::InvalidCardCount(cards.len()));
    }
    let mut seen = [false; cards::CARDS_PER_DECK as usize];
    for &card in cards {
        if !cards::is_valid_card(card) {
            return Err(TableError::InvalidCard(card));
        }
        if seen[card as usize] {
            return Err(TableError::DuplicateCard(card));
        }
        seen[card as usize] = true;
    }

    // Scan all C(7,5) = 21 five-card subsets by choosing the two skipped
    // indices.
    let mut best: Option<HandRank> = None;
    for skip_a in 0..7 {
        for skip_b in (skip_a + 1)..7 {
            let mut hand = [0u8; 5];
            let mut idx = 0;
            for (i, &c) in cards.iter().enumerate() {
                if i == skip_a || i == skip_b {
                    continue;
                }
                hand[idx] = c;
                idx += 1;
            }
            let rank = evaluate_five(&hand);
            if best.as_ref().map_or(true, |b| rank > *b) {
                best = Some(rank);
            }
        }
    }
    // Seven cards always yield at least one subset.
    best.ok_or(TableError::InvalidCardCount(0))
}
