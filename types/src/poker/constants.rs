/// Number of seats at a table.
pub const MAX_SEATS: usize = 5;

/// Minimum seated, funded players required to start a hand.
pub const MIN_PLAYERS: usize = 2;

/// Cards in a standard deck.
pub const DECK_SIZE: usize = 52;

/// Hole cards dealt to each seat.
pub const HOLE_CARDS: usize = 2;

/// Community cards dealt across flop, turn, and river.
pub const COMMUNITY_CARDS: usize = 5;

/// Commitment hash length in bytes.
pub const COMMIT_LEN: usize = 32;

/// Bounds on revealed secret length in bytes.
pub const SECRET_MIN_LEN: usize = 16;
pub const SECRET_MAX_LEN: usize = 32;

/// Shuffle seed length in bytes.
pub const SEED_LEN: usize = 32;

/// Denominator for basis-point arithmetic.
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Default rake in basis points (0.5%).
pub const DEFAULT_FEE_BPS: u16 = 50;

/// Stack penalty for failing to reveal a committed secret, in basis points (10%).
pub const REVEAL_PENALTY_BPS: u64 = 1_000;

/// Default deadline windows, in consensus views.
pub const DEFAULT_COMMIT_VIEWS: u64 = 30;
pub const DEFAULT_REVEAL_VIEWS: u64 = 30;
pub const DEFAULT_ACTION_VIEWS: u64 = 30;
