use anchor_lang::prelude::*;

use crate::constants::{
    AUCTION_HOUSE_SEED, BLESSING_RECORD_SEED, CURATION_CONFIG_SEED, DELEGATE_SEED, QUOTA_SEED,
    SEED_STATE_SEED, VAULT_SEED,
};
use crate::events::SeedBlessed;
use crate::instructions::curation::bless::{apply_blessing, charge_cost, failure_to_error};
use crate::instructions::curation::submit_seed::CurationError;
use crate::state::{
    AuctionHouse, BlessingQuota, BlessingRecord, CurationConfig, DelegateApproval, Seed, Vault,
};

// Relayer-on-behalf blessing. The endorser's ownership proof still gates
// the action; authorization to submit it comes from either a user-granted
// delegate approval or the global relayer capability. The acting account
// pays the record rent and the blessing cost.

#[derive(Accounts)]
pub struct BlessFor<'info> {
    #[account(mut)]
    pub acting: Signer<'info>,

    /// CHECK: the token holder the blessing is cast for; their key is
    /// bound into the gating proof
    pub endorser: UncheckedAccount<'info>,

    /// Present when authorization comes from a user grant rather than the
    /// global relayer capability.
    #[account(
        seeds = [DELEGATE_SEED, endorser.key().as_ref(), acting.key().as_ref()],
        bump = approval.bump,
    )]
    pub approval: Option<Account<'info, DelegateApproval>>,

    #[account(mut, seeds = [CURATION_CONFIG_SEED], bump = config.bump)]
    pub config: Account<'info, CurationConfig>,

    #[account(
        mut,
        seeds = [SEED_STATE_SEED, seed.id.to_le_bytes().as_ref()],
        bump = seed.bump,
    )]
    pub seed: Account<'info, Seed>,

    #[account(
        init_if_needed,
        payer = acting,
        space = BlessingQuota::SIZE,
        seeds = [QUOTA_SEED, endorser.key().as_ref()],
        bump
    )]
    pub quota: Account<'info, BlessingQuota>,

    #[account(
        init,
        payer = acting,
        space = BlessingRecord::SIZE,
        seeds = [
            BLESSING_RECORD_SEED,
            seed.key().as_ref(),
            seed.blessing_count.to_le_bytes().as_ref()
        ],
        bump
    )]
    pub record: Account<'info, BlessingRecord>,

    #[account(mut, seeds = [AUCTION_HOUSE_SEED], bump = house.bump)]
    pub house: Account<'info, AuctionHouse>,

    #[account(mut, seeds = [VAULT_SEED], bump = house.vault_bump)]
    pub vault: Account<'info, Vault>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<BlessFor>, claimed_ids: Vec<u64>, proof: Vec<[u8; 32]>) -> Result<()> {
    let clock = Clock::get()?;
    let now = clock.unix_timestamp;
    let config = &ctx.accounts.config;
    let endorser = ctx.accounts.endorser.key();
    let acting = ctx.accounts.acting.key();

    require!(config.commitment_is_set(), CurationError::CommitmentNotSet);

    let delegated_grant = ctx
        .accounts
        .approval
        .as_ref()
        .map(|a| a.approved)
        .unwrap_or(false);
    require!(
        delegated_grant || acting == config.relayer,
        CurationError::NotDelegate
    );

    let quota = &mut ctx.accounts.quota;
    if quota.endorser == Pubkey::default() {
        quota.endorser = endorser;
        quota.bump = ctx.bumps.quota;
    }

    let outcome = apply_blessing(
        config,
        &mut ctx.accounts.seed,
        quota,
        &endorser,
        &claimed_ids,
        &proof,
        now,
    )
    .map_err(failure_to_error)?;

    let record = &mut ctx.accounts.record;
    record.seed = ctx.accounts.seed.key();
    record.index = outcome.blessing_index;
    record.endorser = endorser;
    record.acting = acting;
    record.weight = outcome.weight;
    record.timestamp = now;
    record.delegated = true;
    record.bump = ctx.bumps.record;

    charge_cost(
        config.bless_cost,
        &ctx.accounts.acting.to_account_info(),
        &ctx.accounts.vault.to_account_info(),
        &ctx.accounts.system_program.to_account_info(),
        &mut ctx.accounts.house,
    )?;

    emit!(SeedBlessed {
        seed_id: ctx.accounts.seed.id,
        endorser,
        acting,
        weight: outcome.weight,
        delegated: true,
        blessing_count: ctx.accounts.seed.blessing_count,
        score: outcome.score,
        quota_used: outcome.quota_used,
        quota_allowance: outcome.allowance,
    });
    msg!(
        "Seed #{} blessed for {} by {} (weight {})",
        ctx.accounts.seed.id,
        endorser,
        acting,
        outcome.weight
    );

    Ok(())
}
