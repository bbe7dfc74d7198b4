use anchor_lang::prelude::*;

use crate::constants::{
    CURATION_CONFIG_SEED, MAX_PERIOD_DURATION, MAX_QUOTA_PER_ID, MIN_PERIOD_DURATION,
};
use crate::errors::AtelierError;
use crate::state::{CurationConfig, DeadlockPolicy, ScopeMode, TieBreakPolicy};

#[derive(AnchorSerialize, AnchorDeserialize)]
pub struct InitializeCurationParams {
    pub relayer: Pubkey,
    pub period_duration: i64,
    pub quota_per_id: u16,
    pub bless_cost: u64,
    pub tie_break: TieBreakPolicy,
    pub deadlock: DeadlockPolicy,
    pub scope: ScopeMode,
}

#[derive(Accounts)]
pub struct InitializeCuration<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        init,
        payer = authority,
        space = CurationConfig::SIZE,
        seeds = [CURATION_CONFIG_SEED],
        bump
    )]
    pub config: Account<'info, CurationConfig>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<InitializeCuration>, params: InitializeCurationParams) -> Result<()> {
    let clock = Clock::get()?;

    require!(
        (MIN_PERIOD_DURATION..=MAX_PERIOD_DURATION).contains(&params.period_duration),
        AtelierError::InvalidParameter
    );
    require!(
        params.quota_per_id > 0 && params.quota_per_id <= MAX_QUOTA_PER_ID,
        AtelierError::InvalidParameter
    );

    let config = &mut ctx.accounts.config;
    config.authority = ctx.accounts.authority.key();
    config.relayer = params.relayer;
    config.ownership_root = [0u8; 32];
    config.root_published_at = 0;
    config.seed_count = 0;
    config.current_round = 1;
    config.period_start = clock.unix_timestamp;
    config.period_duration = params.period_duration;
    config.quota_per_id = params.quota_per_id;
    config.bless_cost = params.bless_cost;
    config.tie_break = params.tie_break;
    config.deadlock = params.deadlock;
    config.scope = params.scope;
    config.bump = ctx.bumps.config;

    msg!(
        "Curation initialized; round 1 starts at {}",
        config.period_start
    );

    Ok(())
}
