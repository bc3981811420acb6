//! Commit-reveal shuffling and hole-card encryption.
//!
//! ## Commit-Reveal Flow
//!
//! 1. **Commit** - Each dealt-in seat publishes a 32-byte hash of a private
//!    secret before the commit deadline.
//! 2. **Reveal** - Each seat discloses the 16..=32-byte pre-image; the engine
//!    checks `hash(secret) == commit` and rejects mismatches outright.
//! 3. **Seed** - Once every remaining seat has revealed, the shuffle seed is
//!    `hash(secrets in seat order || deadlines || entropy)`, where the
//!    entropy is a chain-height-derived value supplied by the caller. No
//!    single party (the operator included) controls the seed.
//! 4. **Shuffle** - A Fisher-Yates pass over the 52-card deck, drawing each
//!    swap index from `hash(seed || counter)`. Reproducible from the seed
//!    alone.
//!
//! Hole cards are XOR-encrypted with a per-seat key derived from that seat's
//! secret, so the table stores only ciphertext; community cards stay
//! plaintext once dealt.

use commonware_cryptography::{sha256::Sha256, Hasher};

use crate::cards::CARDS_PER_DECK;
use crate::error::TableError;
use holdem_types::poker::{COMMIT_LEN, SECRET_MAX_LEN, SECRET_MIN_LEN, SEED_LEN};

/// Compute a commitment from a secret: `commit = hash(secret)`.
pub fn compute_commit(secret: &[u8]) -> [u8; COMMIT_LEN] {
    let mut hasher = Sha256::new();
    hasher.update(secret);
    hasher.finalize().0
}

/// Verify a revealed secret against its prior commitment.
///
/// A mismatch rejects the reveal, not the hand: the seat may retry with the
/// correct pre-image until the reveal deadline.
pub fn verify_reveal(commit: &[u8], secret: &[u8]) -> Result<(), TableError> {
    if secret.len() < SECRET_MIN_LEN || secret.len() > SECRET_MAX_LEN {
        return Err(TableError::InvalidSecretLength(secret.len()));
    }
    if commit.len() != COMMIT_LEN {
        return Err(TableError::InvalidCommitLength(commit.len()));
    }
    if compute_commit(secret)[..] != commit[..] {
        return Err(TableError::CommitMismatch);
    }
    Ok(())
}

/// Derive the 256-bit shuffle seed from the revealed secrets (in seat
/// order), both deadlines, and the caller-supplied entropy.
///
/// The entropy must be derived from chain height or similar consensus
/// randomness, never from a wall clock, so that no validator can grind a
/// favorable deck after seeing the reveals.
pub fn derive_seed(
    secrets: &[&[u8]],
    commit_deadline: u64,
    reveal_deadline: u64,
    entropy: &[u8; SEED_LEN],
) -> [u8; SEED_LEN] {
    let mut hasher = Sha256::new();
    for secret in secrets {
        hasher.update(secret);
    }
    hasher.update(&commit_deadline.to_be_bytes());
    hasher.update(&reveal_deadline.to_be_bytes());
    hasher.update(entropy);
    hasher.update(b"seed"); // Domain separator
    hasher.finalize().0
}

/// Draw the `counter`-th index from the seed's counter-mode expansion.
fn draw_index(seed: &[u8; SEED_LEN], counter: u64) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(seed);
    hasher.update(&counter.to_be_bytes());
    let digest = hasher.finalize().0;
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(bytes)
}

/// Deterministic Fisher-Yates shuffle of the full deck.
pub fn shuffled_deck(seed: &[u8; SEED_LEN]) -> [u8; CARDS_PER_DECK as usize] {
    let mut deck = [0u8; CARDS_PER_DECK as usize];
    for (i, card) in deck.iter_mut().enumerate() {
        *card = i as u8;
    }
    let mut counter = 0u64;
    for i in (1..deck.len()).rev() {
        let j = (draw_index(seed, counter) % (i as u64 + 1)) as usize;
        deck.swap(i, j);
        counter += 1;
    }
    deck
}

/// Derive the hole-card key for a seat: `hash(secret || "HOLECARDS" || seat)`.
///
/// Only the holder of `secret` can derive the key before the reveal phase
/// makes it public.
pub fn hole_card_key(secret: &[u8], seat: u64) -> [u8; SEED_LEN] {
    let mut hasher = Sha256::new();
    hasher.update(secret);
    hasher.update(b"HOLECARDS");
    hasher.update(&seat.to_be_bytes());
    hasher.finalize().0
}

/// XOR the cards with the key's keystream. Applying it twice decrypts.
pub fn xor_hole_cards(cards: &[u8], key: &[u8; SEED_LEN]) -> Vec<u8> {
    cards
        .iter()
        .enumerate()
        .map(|(j, &card)| card ^ key[j % key.len()])
        .collect()
}
