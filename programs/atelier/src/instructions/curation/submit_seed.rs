use anchor_lang::prelude::*;

use crate::constants::{CREATOR_SEED, CURATION_CONFIG_SEED, SEED_STATE_SEED};
use crate::events::SeedSubmitted;
use crate::state::{CreatorCapability, CurationConfig, Seed, SeedStatus};

#[derive(Accounts)]
pub struct SubmitSeed<'info> {
    #[account(mut)]
    pub creator: Signer<'info>,

    #[account(
        mut,
        seeds = [CURATION_CONFIG_SEED],
        bump = config.bump,
    )]
    pub config: Account<'info, CurationConfig>,

    #[account(
        seeds = [CREATOR_SEED, creator.key().as_ref()],
        bump = capability.bump,
        constraint = !capability.revoked @ CurationError::CapabilityRevoked,
    )]
    pub capability: Account<'info, CreatorCapability>,

    #[account(
        init,
        payer = creator,
        space = Seed::SIZE,
        seeds = [SEED_STATE_SEED, config.seed_count.to_le_bytes().as_ref()],
        bump
    )]
    pub seed: Account<'info, Seed>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<SubmitSeed>, content_ref: [u8; 32]) -> Result<()> {
    let clock = Clock::get()?;
    let config = &mut ctx.accounts.config;
    let seed = &mut ctx.accounts.seed;

    seed.id = config.seed_count;
    seed.creator = ctx.accounts.creator.key();
    seed.content_ref = content_ref;
    seed.blessing_count = 0;
    seed.score = 0;
    seed.created_at = clock.unix_timestamp;
    seed.submitted_round = config.current_round;
    seed.status = SeedStatus::Open;
    seed.winning_round = None;
    seed.bump = ctx.bumps.seed;

    config.seed_count += 1;

    emit!(SeedSubmitted {
        seed_id: seed.id,
        creator: seed.creator,
        content_ref,
        round: seed.submitted_round,
    });
    msg!(
        "Seed #{} submitted by {} in round {}",
        seed.id,
        seed.creator,
        seed.submitted_round
    );

    Ok(())
}

#[error_code]
pub enum CurationError {
    #[msg("Creator capability has been revoked")]
    CapabilityRevoked,

    #[msg("Caller is not the seed's creator")]
    NotSeedCreator,

    #[msg("Seed is not open")]
    SeedNotOpen,

    #[msg("Ownership commitment has not been published")]
    CommitmentNotSet,

    #[msg("Commitment root cannot be zero")]
    ZeroRoot,

    #[msg("Gating proof does not match the published commitment")]
    InvalidProof,

    #[msg("Claimed id set is empty")]
    EmptyClaim,

    #[msg("Claimed id set exceeds the supported size")]
    ClaimTooLarge,

    #[msg("Gating proof exceeds the supported depth")]
    ProofTooDeep,

    #[msg("Daily blessing quota exhausted")]
    QuotaExceeded,

    #[msg("Caller is neither an approved delegate nor the relayer")]
    NotDelegate,

    #[msg("Caller is not the configured relayer")]
    NotRelayer,

    #[msg("Voting period has not ended")]
    PeriodNotEnded,

    #[msg("No eligible seed scored above zero")]
    NoEligibleSeeds,

    #[msg("Batch exceeds the size cap")]
    BatchTooLarge,

    #[msg("Batch account list does not match the expected shape")]
    MalformedBatch,

    #[msg("Candidate seed account is invalid")]
    InvalidCandidate,
}
