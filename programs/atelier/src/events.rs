//! Event definitions.
//!
//! Events are the only durable external signal. Money-moving events carry
//! the post-state of the affected pools so the full accounting history can
//! be replayed from the event stream alone.

use anchor_lang::prelude::*;

use crate::state::{DeadlockPolicy, ScopeMode, TieBreakPolicy};

// === Auction engine ===

#[event]
pub struct AuctionCreated {
    pub auction_id: u64,
    pub item_mint: Pubkey,
    pub start_time: i64,
    pub end_time: i64,
    pub min_bid: u64,
}

#[event]
pub struct BidPlaced {
    pub auction_id: u64,
    pub bidder: Pubkey,
    pub amount: u64,
    pub previous_bidder: Option<Pubkey>,
    pub previous_bid: u64,
    pub escrow_delta: u64,
    pub escrowed_total: u64,
    pub end_time: i64,
    pub extension_count: u8,
    pub bid_index: u64,
    pub refund_pushed: bool,
}

#[event]
pub struct AuctionExtended {
    pub auction_id: u64,
    pub new_end_time: i64,
    pub extension_count: u8,
}

/// A displaced bidder could not be paid directly; the amount was credited
/// to their pull-ledger entry instead.
#[event]
pub struct RefundCredited {
    pub user: Pubkey,
    pub amount: u64,
    pub user_pending: u64,
    pub pending_total: u64,
}

#[event]
pub struct AuctionSettled {
    pub auction_id: u64,
    pub winner: Option<Pubkey>,
    pub amount: u64,
    pub proceeds_pushed: bool,
    pub escrowed_total: u64,
    pub realized_total: u64,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum SettleSkipReason {
    NotEnded,
    AlreadySettled,
    CustodyLost,
    ReceiverNotVerified,
    Malformed,
}

#[event]
pub struct SettlementSkipped {
    pub index: u32,
    pub auction: Pubkey,
    pub reason: SettleSkipReason,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum CancelSkipReason {
    HasBids,
    AlreadySettled,
    Malformed,
}

#[event]
pub struct CancelSkipped {
    pub index: u32,
    pub auction: Pubkey,
    pub reason: CancelSkipReason,
}

#[event]
pub struct AuctionCancelled {
    pub auction_id: u64,
    pub item_mint: Pubkey,
}

#[event]
pub struct AuctionForceSettled {
    pub auction_id: u64,
    pub winner: Pubkey,
    pub amount: u64,
    pub destination: Pubkey,
    pub proceeds_pushed: bool,
    pub escrowed_total: u64,
    pub realized_total: u64,
}

#[event]
pub struct FundsWithdrawn {
    pub user: Pubkey,
    pub amount: u64,
    pub pending_total: u64,
    pub by_operator: bool,
}

#[event]
pub struct ProceedsWithdrawn {
    pub amount: u64,
    pub realized_total: u64,
}

#[event]
pub struct ExcessSwept {
    pub amount: u64,
}

#[event]
pub struct StuckFundsRecovered {
    pub user: Pubkey,
    pub amount: u64,
    pub redirected_to_payout: bool,
    pub pending_total: u64,
}

#[event]
pub struct AccountingCorrected {
    pub escrowed_before: u64,
    pub pending_before: u64,
    pub realized_before: u64,
    pub escrowed_after: u64,
    pub pending_after: u64,
    pub realized_after: u64,
}

#[event]
pub struct PausedSet {
    pub paused: bool,
}

// === Curation engine ===

#[event]
pub struct SeedSubmitted {
    pub seed_id: u64,
    pub creator: Pubkey,
    pub content_ref: [u8; 32],
    pub round: u64,
}

#[event]
pub struct SeedRetracted {
    pub seed_id: u64,
}

#[event]
pub struct SeedBlessed {
    pub seed_id: u64,
    pub endorser: Pubkey,
    pub acting: Pubkey,
    pub weight: u32,
    pub delegated: bool,
    pub blessing_count: u64,
    pub score: u64,
    pub quota_used: u32,
    pub quota_allowance: u32,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum BlessSkipReason {
    SeedNotOpen,
    InvalidProof,
    QuotaExceeded,
    EmptyClaim,
    Malformed,
}

#[event]
pub struct BlessingSkipped {
    pub index: u32,
    pub endorser: Pubkey,
    pub reason: BlessSkipReason,
}

#[event]
pub struct DelegateApprovalSet {
    pub owner: Pubkey,
    pub delegate: Pubkey,
    pub approved: bool,
}

#[event]
pub struct CreatorCapabilitySet {
    pub wallet: Pubkey,
    pub revoked: bool,
}

#[event]
pub struct OwnershipCommitmentUpdated {
    pub root: [u8; 32],
    pub published_at: i64,
}

#[event]
pub struct WinnerSelected {
    pub round: u64,
    pub seed_id: u64,
    pub creator: Pubkey,
    pub content_ref: [u8; 32],
    pub score: u64,
    pub blessing_count: u64,
    pub next_round: u64,
    pub next_period_start: i64,
}

#[event]
pub struct RoundSkipped {
    pub round: u64,
    pub next_round: u64,
    pub next_period_start: i64,
}

#[event]
pub struct CurationConfigUpdated {
    pub period_duration: i64,
    pub quota_per_id: u16,
    pub bless_cost: u64,
    pub relayer: Pubkey,
    pub tie_break: TieBreakPolicy,
    pub deadlock: DeadlockPolicy,
    pub scope: ScopeMode,
}
