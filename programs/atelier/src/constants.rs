//! PDA seeds and protocol-wide limits.

// === PDA seeds ===

pub const AUCTION_HOUSE_SEED: &[u8] = b"auction_house";
pub const VAULT_SEED: &[u8] = b"vault";
pub const CUSTODY_SEED: &[u8] = b"custody";
pub const AUCTION_SEED: &[u8] = b"auction";
pub const ITEM_LISTING_SEED: &[u8] = b"item_listing";
pub const BID_RECORD_SEED: &[u8] = b"bid_record";
pub const PENDING_SEED: &[u8] = b"pending";

pub const CURATION_CONFIG_SEED: &[u8] = b"curation_config";
pub const SEED_STATE_SEED: &[u8] = b"seed";
pub const BLESSING_RECORD_SEED: &[u8] = b"blessing";
pub const QUOTA_SEED: &[u8] = b"quota";
pub const DELEGATE_SEED: &[u8] = b"delegate";
pub const CREATOR_SEED: &[u8] = b"creator";

// === Auction limits ===

/// Hard ceiling on any single bid. Keeps pool sums far away from u64
/// overflow even across every live auction combined.
pub const MAX_BID_LAMPORTS: u64 = 1 << 62;

/// A raise must exceed the standing bid by 5%.
pub const MIN_RAISE_BPS: u64 = 500;
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Anti-snipe extensions per auction.
pub const MAX_EXTENSIONS: u8 = 10;

/// Anti-snipe window/duration bounds accepted at house initialization.
pub const MIN_EXTENSION_SECONDS: i64 = 60;
pub const MAX_EXTENSION_SECONDS: i64 = 3_600;

/// Delay after an auction's end before the operator may force-settle with
/// an unverified destination.
pub const FORCE_SETTLE_GRACE_SECONDS: i64 = 7 * 86_400;

pub const MAX_CREATE_BATCH: usize = 10;
pub const MAX_SETTLE_BATCH: usize = 10;
pub const MAX_CANCEL_BATCH: usize = 10;
pub const MAX_BLESS_BATCH: usize = 20;

/// Accounts per item in the batch instruction account lists.
pub const CREATE_BATCH_ACCOUNTS_PER_ITEM: usize = 4;
pub const SETTLE_BATCH_ACCOUNTS_PER_ITEM: usize = 5;
pub const CANCEL_BATCH_ACCOUNTS_PER_ITEM: usize = 5;
pub const BLESS_BATCH_ACCOUNTS_PER_ITEM: usize = 3;

// === Curation limits ===

pub const SECONDS_PER_DAY: i64 = 86_400;

/// Fixed-point scale for decay-weighted scores. The score is kept in this
/// scale; it is never divided back down, so any blessed seed keeps a
/// strictly positive score at the minimum decay.
pub const DECAY_PRECISION: u64 = 1_000;
/// Decay at the start of a voting period (full weight).
pub const DECAY_MAX_FP: u64 = 1_000;
/// Decay floor at the end of a voting period. Must stay positive.
pub const DECAY_MIN_FP: u64 = 100;

pub const MIN_PERIOD_DURATION: i64 = 3_600;
pub const MAX_PERIOD_DURATION: i64 = 30 * 86_400;

pub const MAX_QUOTA_PER_ID: u16 = 100;
pub const MAX_CLAIMED_IDS: usize = 64;
pub const MAX_PROOF_DEPTH: usize = 32;
