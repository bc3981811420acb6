//! Shared playing-card helpers.
//!
//! Cards are encoded as `0..=51`, where:
//! - suit = card / 13 (0..=3: club, diamond, heart, spade)
//! - rank = card % 13 (0..=12, where 0 is a deuce and 12 is an Ace)

/// Total cards in a standard deck.
pub(crate) const CARDS_PER_DECK: u8 = 52;

/// Ranks per suit.
pub(crate) const RANKS_PER_SUIT: u8 = 13;

/// Returns true if `card` is within `0..CARDS_PER_DECK`.
pub(crate) fn is_valid_card(card: u8) -> bool {
    card < CARDS_PER_DECK
}

/// Returns the 0-based rank (0..=12), where 0 is a deuce.
pub(crate) fn card_rank(card: u8) -> u8 {
    card % RANKS_PER_SUIT
}

/// Returns the rank for comparisons (2..=14), where Ace is high (14).
pub(crate) fn card_rank_value(card: u8) -> u8 {
    card_rank(card) + 2
}

/// Returns the suit (0..=3).
pub(crate) fn card_suit(card: u8) -> u8 {
    card / RANKS_PER_SUIT
}
