use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, Read, ReadExt, Write};
use commonware_cryptography::ed25519::PublicKey;

use super::{
    DEFAULT_ACTION_VIEWS, DEFAULT_COMMIT_VIEWS, DEFAULT_FEE_BPS, DEFAULT_REVEAL_VIEWS,
};

/// Per-table configuration. Set once at table creation by the admin; the
/// engine treats it as read-only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableConfig {
    /// Admin authorized to force an emergency abort.
    pub admin: PublicKey,
    pub small_blind: u64,
    pub big_blind: u64,
    /// Forced per-seat contribution at the start of each hand (0 disables).
    pub ante: u64,
    pub min_buy_in: u64,
    pub max_buy_in: u64,
    /// Rake in basis points, accrued fractionally across hands.
    pub fee_bps: u16,
    /// Destination for collected rake and penalties. When unset, fees are
    /// waived rather than collected.
    pub fee_collector: Option<PublicKey>,
    /// Deadline windows in consensus views.
    pub commit_views: u64,
    pub reveal_views: u64,
    pub action_views: u64,
}

impl TableConfig {
    /// Standard configuration for the given admin and blind sizes.
    pub fn new(admin: PublicKey, small_blind: u64, big_blind: u64) -> Self {
        Self {
            admin,
            small_blind,
            big_blind,
            ante: 0,
            min_buy_in: big_blind.saturating_mul(20),
            max_buy_in: big_blind.saturating_mul(200),
            fee_bps: DEFAULT_FEE_BPS,
            fee_collector: None,
            commit_views: DEFAULT_COMMIT_VIEWS,
            reveal_views: DEFAULT_REVEAL_VIEWS,
            action_views: DEFAULT_ACTION_VIEWS,
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.small_blind == 0 {
            return Err("small_blind must be greater than zero");
        }
        if self.big_blind < self.small_blind {
            return Err("big_blind must be at least the small blind");
        }
        if self.min_buy_in < self.big_blind {
            return Err("min_buy_in must cover the big blind");
        }
        if self.max_buy_in < self.min_buy_in {
            return Err("max_buy_in must be at least min_buy_in");
        }
        if self.commit_views == 0 || self.reveal_views == 0 || self.action_views == 0 {
            return Err("deadline windows must be greater than zero");
        }
        Ok(())
    }
}

impl Write for TableConfig {
    fn write(&self, writer: &mut impl BufMut) {
        self.admin.write(writer);
        self.small_blind.write(writer);
        self.big_blind.write(writer);
        self.ante.write(writer);
        self.min_buy_in.write(writer);
        self.max_buy_in.write(writer);
        self.fee_bps.write(writer);
        self.fee_collector.write(writer);
        self.commit_views.write(writer);
        self.reveal_views.write(writer);
        self.action_views.write(writer);
    }
}

impl Read for TableConfig {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            admin: PublicKey::read(reader)?,
            small_blind: u64::read(reader)?,
            big_blind: u64::read(reader)?,
            ante: u64::read(reader)?,
            min_buy_in: u64::read(reader)?,
            max_buy_in: u64::read(reader)?,
            fee_bps: u16::read(reader)?,
            fee_collector: Option::<PublicKey>::read(reader)?,
            commit_views: u64::read(reader)?,
            reveal_views: u64::read(reader)?,
            action_views: u64::read(reader)?,
        })
    }
}

impl EncodeSize for TableConfig {
    fn encode_size(&self) -> usize {
        self.admin.encode_size()
            + self.small_blind.encode_size()
            + self.big_blind.encode_size()
            + self.ante.encode_size()
            + self.min_buy_in.encode_size()
            + self.max_buy_in.encode_size()
            + self.fee_bps.encode_size()
            + self.fee_collector.encode_size()
            + self.commit_views.encode_size()
            + self.reveal_views.encode_size()
            + self.action_views.encode_size()
    }
}
