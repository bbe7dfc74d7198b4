use anchor_lang::prelude::*;

pub mod constants;
pub mod errors;
pub mod events;
pub mod gating;
pub mod instructions;
pub mod state;
pub mod util;

use instructions::*;
use state::{DeadlockPolicy, ScopeMode, TieBreakPolicy};

declare_id!("3bHnvkqt5XxpZfs2sKTBs5bKKNSA3v13hheoidwkp32j");

#[program]
pub mod atelier {
    use super::*;

    // === Auction house administration ===

    /// Create the auction house, its vault and the custody authority
    pub fn initialize_house(
        ctx: Context<InitializeHouse>,
        params: InitializeHouseParams,
    ) -> Result<()> {
        instructions::initialize_house::handler(ctx, params)
    }

    /// Update payout address and anti-snipe parameters
    pub fn update_house_config(
        ctx: Context<HouseAdmin>,
        params: UpdateHouseParams,
    ) -> Result<()> {
        instructions::auction::configure::update_house_config(ctx, params)
    }

    /// Pause or resume the auction engine
    pub fn set_paused(ctx: Context<HouseAdmin>, paused: bool) -> Result<()> {
        instructions::auction::configure::set_paused(ctx, paused)
    }

    // === Auctions ===

    /// Open an English auction for an item held in custody
    pub fn create_auction(
        ctx: Context<CreateAuction>,
        params: CreateAuctionParams,
    ) -> Result<()> {
        instructions::create_auction::handler(ctx, params)
    }

    /// Open several auctions with identical timing; all-or-nothing
    pub fn batch_create_auctions<'info>(
        ctx: Context<'_, '_, 'info, 'info, BatchCreateAuctions<'info>>,
        params: BatchCreateParams,
    ) -> Result<()> {
        instructions::batch_create::handler(ctx, params)
    }

    /// Bid on a live auction, displacing and refunding the previous bidder
    pub fn place_bid(ctx: Context<PlaceBid>, amount: u64) -> Result<()> {
        instructions::place_bid::handler(ctx, amount)
    }

    /// Settle an ended auction: item to the winner, proceeds to the payout
    pub fn settle_auction(ctx: Context<SettleAuction>) -> Result<()> {
        instructions::settle_auction::handler(ctx)
    }

    /// Settle several ended auctions; best-effort, skips report per item
    pub fn batch_settle_auctions<'info>(
        ctx: Context<'_, '_, 'info, 'info, BatchSettleAuctions<'info>>,
    ) -> Result<()> {
        instructions::batch_settle::handler(ctx)
    }

    /// Cancel an auction no one has bid on
    pub fn cancel_auction(ctx: Context<CancelAuction>) -> Result<()> {
        instructions::cancel_auction::handler(ctx)
    }

    /// Cancel several bid-less auctions; best-effort
    pub fn batch_cancel_auctions<'info>(
        ctx: Context<'_, '_, 'info, 'info, BatchCancelAuctions<'info>>,
    ) -> Result<()> {
        instructions::batch_cancel::handler(ctx)
    }

    /// Operator override for a stranded settlement; unverified destination
    pub fn force_settle_unsafe(ctx: Context<ForceSettleUnsafe>) -> Result<()> {
        instructions::force_settle::handler(ctx)
    }

    // === Funds ===

    /// Claim a pending refund
    pub fn withdraw(ctx: Context<Withdraw>) -> Result<()> {
        instructions::withdraw::handler(ctx)
    }

    /// Move realized proceeds to the payout address
    pub fn withdraw_proceeds(ctx: Context<WithdrawProceeds>, amount: u64) -> Result<()> {
        instructions::withdraw::withdraw_proceeds(ctx, amount)
    }

    /// Sweep vault balance unaccounted by the pools; paused only
    pub fn sweep_excess(ctx: Context<SweepExcess>) -> Result<()> {
        instructions::recovery::sweep_excess(ctx)
    }

    /// Clear an unreachable user's pending entry; paused only
    pub fn recover_stuck_funds(ctx: Context<RecoverStuckFunds>, user: Pubkey) -> Result<()> {
        instructions::recovery::recover_stuck_funds(ctx, user)
    }

    /// Trigger a user's withdrawal on their behalf; funds go to the user
    pub fn owner_withdraw_for(ctx: Context<OwnerWithdrawFor>, user: Pubkey) -> Result<()> {
        instructions::recovery::owner_withdraw_for(ctx, user)
    }

    /// Manual pool override for incident recovery; paused only
    pub fn correct_accounting(
        ctx: Context<CorrectAccounting>,
        escrowed: u64,
        pending: u64,
        realized: u64,
    ) -> Result<()> {
        instructions::recovery::correct_accounting(ctx, escrowed, pending, realized)
    }

    // === Curation administration ===

    /// Create the curation config and start round 1
    pub fn initialize_curation(
        ctx: Context<InitializeCuration>,
        params: InitializeCurationParams,
    ) -> Result<()> {
        instructions::initialize_curation::handler(ctx, params)
    }

    /// Publish a fresh ownership commitment root
    pub fn set_ownership_commitment(ctx: Context<CurationAdmin>, root: [u8; 32]) -> Result<()> {
        instructions::curation::admin::set_ownership_commitment(ctx, root)
    }

    /// Change the voting period length
    pub fn set_period_duration(ctx: Context<CurationAdmin>, period_duration: i64) -> Result<()> {
        instructions::curation::admin::set_period_duration(ctx, period_duration)
    }

    /// Change the daily blessings allowed per claimed id
    pub fn set_quota_per_id(ctx: Context<CurationAdmin>, quota_per_id: u16) -> Result<()> {
        instructions::curation::admin::set_quota_per_id(ctx, quota_per_id)
    }

    /// Change the lamport cost per blessing
    pub fn set_bless_cost(ctx: Context<CurationAdmin>, bless_cost: u64) -> Result<()> {
        instructions::curation::admin::set_bless_cost(ctx, bless_cost)
    }

    /// Change the global relayer
    pub fn set_relayer(ctx: Context<CurationAdmin>, relayer: Pubkey) -> Result<()> {
        instructions::curation::admin::set_relayer(ctx, relayer)
    }

    /// Change tie-break, deadlock and candidate-scope policies
    pub fn set_curation_policies(
        ctx: Context<CurationAdmin>,
        tie_break: TieBreakPolicy,
        deadlock: DeadlockPolicy,
        scope: ScopeMode,
    ) -> Result<()> {
        instructions::curation::admin::set_curation_policies(ctx, tie_break, deadlock, scope)
    }

    /// Grant the seed-submission capability to a wallet
    pub fn grant_creator(ctx: Context<GrantCreator>) -> Result<()> {
        instructions::grant_creator::grant_creator(ctx)
    }

    /// Revoke a wallet's seed-submission capability
    pub fn revoke_creator(ctx: Context<RevokeCreator>) -> Result<()> {
        instructions::grant_creator::revoke_creator(ctx)
    }

    // === Curation ===

    /// Propose a new seed
    pub fn submit_seed(ctx: Context<SubmitSeed>, content_ref: [u8; 32]) -> Result<()> {
        instructions::submit_seed::handler(ctx, content_ref)
    }

    /// Withdraw an open seed
    pub fn retract_seed(ctx: Context<RetractSeed>) -> Result<()> {
        instructions::retract_seed::handler(ctx)
    }

    /// Allow or disallow a delegate to bless on the caller's behalf
    pub fn approve_delegate(ctx: Context<ApproveDelegate>, approved: bool) -> Result<()> {
        instructions::approve_delegate::handler(ctx, approved)
    }

    /// Endorse a seed with a gating proof over claimed token ids
    pub fn bless(
        ctx: Context<Bless>,
        claimed_ids: Vec<u64>,
        proof: Vec<[u8; 32]>,
    ) -> Result<()> {
        instructions::bless::handler(ctx, claimed_ids, proof)
    }

    /// Endorse a seed on a holder's behalf (approved delegate or relayer)
    pub fn bless_for(
        ctx: Context<BlessFor>,
        claimed_ids: Vec<u64>,
        proof: Vec<[u8; 32]>,
    ) -> Result<()> {
        instructions::bless_for::handler(ctx, claimed_ids, proof)
    }

    /// Bulk relayer submission; failing items are skipped and reported
    pub fn batch_bless_for<'info>(
        ctx: Context<'_, '_, 'info, 'info, BatchBlessFor<'info>>,
        items: Vec<BlessItem>,
    ) -> Result<()> {
        instructions::batch_bless::handler(ctx, items)
    }

    /// Finalize the period over the supplied candidates, or apply the
    /// deadlock policy when nothing scores above zero
    pub fn select_winner<'info>(
        ctx: Context<'_, '_, 'info, 'info, SelectWinner<'info>>,
    ) -> Result<()> {
        instructions::select_winner::handler(ctx)
    }
}
