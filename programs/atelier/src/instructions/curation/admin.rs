use anchor_lang::prelude::*;

use crate::constants::{
    CURATION_CONFIG_SEED, MAX_PERIOD_DURATION, MAX_QUOTA_PER_ID, MIN_PERIOD_DURATION,
};
use crate::errors::AtelierError;
use crate::events::{CurationConfigUpdated, OwnershipCommitmentUpdated};
use crate::instructions::curation::submit_seed::CurationError;
use crate::state::{CurationConfig, DeadlockPolicy, ScopeMode, TieBreakPolicy};

#[derive(Accounts)]
pub struct CurationAdmin<'info> {
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [CURATION_CONFIG_SEED],
        bump = config.bump,
        has_one = authority @ AtelierError::Unauthorized,
    )]
    pub config: Account<'info, CurationConfig>,
}

/// Publish a fresh ownership snapshot. Fed by the off-chain job that
/// recomputes the commitment; everything gating-related trusts this root.
pub fn set_ownership_commitment(ctx: Context<CurationAdmin>, root: [u8; 32]) -> Result<()> {
    require!(root != [0u8; 32], CurationError::ZeroRoot);

    let clock = Clock::get()?;
    let config = &mut ctx.accounts.config;
    config.ownership_root = root;
    config.root_published_at = clock.unix_timestamp;

    emit!(OwnershipCommitmentUpdated {
        root,
        published_at: config.root_published_at,
    });
    msg!("Ownership commitment updated");

    Ok(())
}

pub fn set_period_duration(ctx: Context<CurationAdmin>, period_duration: i64) -> Result<()> {
    require!(
        (MIN_PERIOD_DURATION..=MAX_PERIOD_DURATION).contains(&period_duration),
        AtelierError::InvalidParameter
    );
    ctx.accounts.config.period_duration = period_duration;
    emit_config(&ctx.accounts.config);
    Ok(())
}

pub fn set_quota_per_id(ctx: Context<CurationAdmin>, quota_per_id: u16) -> Result<()> {
    require!(
        quota_per_id > 0 && quota_per_id <= MAX_QUOTA_PER_ID,
        AtelierError::InvalidParameter
    );
    ctx.accounts.config.quota_per_id = quota_per_id;
    emit_config(&ctx.accounts.config);
    Ok(())
}

pub fn set_bless_cost(ctx: Context<CurationAdmin>, bless_cost: u64) -> Result<()> {
    ctx.accounts.config.bless_cost = bless_cost;
    emit_config(&ctx.accounts.config);
    Ok(())
}

pub fn set_relayer(ctx: Context<CurationAdmin>, relayer: Pubkey) -> Result<()> {
    ctx.accounts.config.relayer = relayer;
    emit_config(&ctx.accounts.config);
    Ok(())
}

pub fn set_curation_policies(
    ctx: Context<CurationAdmin>,
    tie_break: TieBreakPolicy,
    deadlock: DeadlockPolicy,
    scope: ScopeMode,
) -> Result<()> {
    let config = &mut ctx.accounts.config;
    config.tie_break = tie_break;
    config.deadlock = deadlock;
    config.scope = scope;
    emit_config(config);
    Ok(())
}

fn emit_config(config: &CurationConfig) {
    emit!(CurationConfigUpdated {
        period_duration: config.period_duration,
        quota_per_id: config.quota_per_id,
        bless_cost: config.bless_cost,
        relayer: config.relayer,
        tie_break: config.tie_break,
        deadlock: config.deadlock,
        scope: config.scope,
    });
}
