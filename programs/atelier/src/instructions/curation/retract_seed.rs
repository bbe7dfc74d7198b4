use anchor_lang::prelude::*;

use crate::constants::SEED_STATE_SEED;
use crate::events::SeedRetracted;
use crate::instructions::curation::submit_seed::CurationError;
use crate::state::{Seed, SeedStatus};

#[derive(Accounts)]
pub struct RetractSeed<'info> {
    pub creator: Signer<'info>,

    #[account(
        mut,
        seeds = [SEED_STATE_SEED, seed.id.to_le_bytes().as_ref()],
        bump = seed.bump,
        constraint = seed.creator == creator.key() @ CurationError::NotSeedCreator,
        constraint = seed.status == SeedStatus::Open @ CurationError::SeedNotOpen,
    )]
    pub seed: Account<'info, Seed>,
}

/// Retraction is only possible while the seed is open; a past winner stays
/// a winner.
pub fn handler(ctx: Context<RetractSeed>) -> Result<()> {
    let seed = &mut ctx.accounts.seed;
    seed.status = SeedStatus::Retracted;

    emit!(SeedRetracted { seed_id: seed.id });
    msg!("Seed #{} retracted", seed.id);

    Ok(())
}
