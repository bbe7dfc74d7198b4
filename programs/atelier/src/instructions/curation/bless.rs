use anchor_lang::prelude::*;
use anchor_lang::system_program::{self, Transfer};

use crate::constants::{
    AUCTION_HOUSE_SEED, BLESSING_RECORD_SEED, CURATION_CONFIG_SEED, MAX_CLAIMED_IDS,
    MAX_PROOF_DEPTH, QUOTA_SEED, SEED_STATE_SEED, VAULT_SEED,
};
use crate::events::SeedBlessed;
use crate::gating::{leaf_hash, verify_inclusion};
use crate::instructions::curation::submit_seed::CurationError;
use crate::state::{
    epoch_day, quota_allowance, seed_score, AuctionHouse, BlessingQuota, BlessingRecord,
    CurationConfig, Seed, SeedStatus, Vault,
};

/// Why a blessing was refused. The self-service paths convert these into
/// named errors; the relayer batch converts them into skip reports.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BlessFailure {
    SeedNotOpen,
    EmptyClaim,
    ClaimTooLarge,
    ProofTooDeep,
    InvalidProof,
    QuotaExceeded,
}

pub struct BlessOutcome {
    pub weight: u32,
    pub quota_used: u32,
    pub allowance: u32,
    pub score: u64,
    pub blessing_index: u64,
}

/// Verify a gating proof and apply one blessing: charge the day-bucketed
/// quota, bump the seed counter and recompute its cached score. Mutations
/// only happen once every check has passed, so a refusal leaves both
/// accounts untouched.
pub fn apply_blessing(
    config: &CurationConfig,
    seed: &mut Seed,
    quota: &mut BlessingQuota,
    endorser: &Pubkey,
    claimed_ids: &[u64],
    proof: &[[u8; 32]],
    now: i64,
) -> std::result::Result<BlessOutcome, BlessFailure> {
    if seed.status != SeedStatus::Open {
        return Err(BlessFailure::SeedNotOpen);
    }
    if claimed_ids.is_empty() {
        return Err(BlessFailure::EmptyClaim);
    }
    if claimed_ids.len() > MAX_CLAIMED_IDS {
        return Err(BlessFailure::ClaimTooLarge);
    }
    if proof.len() > MAX_PROOF_DEPTH {
        return Err(BlessFailure::ProofTooDeep);
    }
    if !verify_inclusion(
        &config.ownership_root,
        leaf_hash(endorser, claimed_ids),
        proof,
    ) {
        return Err(BlessFailure::InvalidProof);
    }

    let weight = claimed_ids.len() as u32;
    let allowance = quota_allowance(weight, config.quota_per_id);
    let used = quota
        .charge(epoch_day(now), allowance)
        .ok_or(BlessFailure::QuotaExceeded)?;

    let blessing_index = seed.blessing_count;
    seed.blessing_count += 1;
    seed.score = seed_score(seed.blessing_count, config.decay_fp(now));

    Ok(BlessOutcome {
        weight,
        quota_used: used,
        allowance,
        score: seed.score,
        blessing_index,
    })
}

pub fn failure_to_error(failure: BlessFailure) -> Error {
    match failure {
        BlessFailure::SeedNotOpen => error!(CurationError::SeedNotOpen),
        BlessFailure::EmptyClaim => error!(CurationError::EmptyClaim),
        BlessFailure::ClaimTooLarge => error!(CurationError::ClaimTooLarge),
        BlessFailure::ProofTooDeep => error!(CurationError::ProofTooDeep),
        BlessFailure::InvalidProof => error!(CurationError::InvalidProof),
        BlessFailure::QuotaExceeded => error!(CurationError::QuotaExceeded),
    }
}

#[derive(Accounts)]
pub struct Bless<'info> {
    #[account(mut)]
    pub endorser: Signer<'info>,

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
        payer = endorser,
        space = BlessingQuota::SIZE,
        seeds = [QUOTA_SEED, endorser.key().as_ref()],
        bump
    )]
    pub quota: Account<'info, BlessingQuota>,

    #[account(
        init,
        payer = endorser,
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

pub fn handler(ctx: Context<Bless>, claimed_ids: Vec<u64>, proof: Vec<[u8; 32]>) -> Result<()> {
    let clock = Clock::get()?;
    let now = clock.unix_timestamp;
    let config = &ctx.accounts.config;
    let endorser = ctx.accounts.endorser.key();

    require!(config.commitment_is_set(), CurationError::CommitmentNotSet);

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
    record.acting = endorser;
    record.weight = outcome.weight;
    record.timestamp = now;
    record.delegated = false;
    record.bump = ctx.bumps.record;

    charge_cost(
        config.bless_cost,
        &ctx.accounts.endorser.to_account_info(),
        &ctx.accounts.vault.to_account_info(),
        &ctx.accounts.system_program.to_account_info(),
        &mut ctx.accounts.house,
    )?;

    emit!(SeedBlessed {
        seed_id: ctx.accounts.seed.id,
        endorser,
        acting: endorser,
        weight: outcome.weight,
        delegated: false,
        blessing_count: ctx.accounts.seed.blessing_count,
        score: outcome.score,
        quota_used: outcome.quota_used,
        quota_allowance: outcome.allowance,
    });
    msg!(
        "Seed #{} blessed by {} (weight {}, {}/{} today)",
        ctx.accounts.seed.id,
        endorser,
        outcome.weight,
        outcome.quota_used,
        outcome.allowance
    );

    Ok(())
}

/// Collect the per-blessing cost into the vault as realized proceeds.
pub fn charge_cost<'info>(
    cost: u64,
    payer: &AccountInfo<'info>,
    vault: &AccountInfo<'info>,
    system_program: &AccountInfo<'info>,
    house: &mut Account<'info, AuctionHouse>,
) -> Result<()> {
    if cost == 0 {
        return Ok(());
    }
    system_program::transfer(
        CpiContext::new(
            system_program.clone(),
            Transfer {
                from: payer.clone(),
                to: vault.clone(),
            },
        ),
        cost,
    )?;
    house.realized_add(cost)?;
    Ok(())
}
