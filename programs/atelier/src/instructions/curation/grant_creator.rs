use anchor_lang::prelude::*;

use crate::constants::{CREATOR_SEED, CURATION_CONFIG_SEED};
use crate::errors::AtelierError;
use crate::events::CreatorCapabilitySet;
use crate::state::{CreatorCapability, CurationConfig};

#[derive(Accounts)]
pub struct GrantCreator<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        seeds = [CURATION_CONFIG_SEED],
        bump = config.bump,
        has_one = authority @ AtelierError::Unauthorized,
    )]
    pub config: Account<'info, CurationConfig>,

    /// CHECK: wallet receiving the capability; any address may be granted
    pub wallet: UncheckedAccount<'info>,

    #[account(
        init_if_needed,
        payer = authority,
        space = CreatorCapability::SIZE,
        seeds = [CREATOR_SEED, wallet.key().as_ref()],
        bump
    )]
    pub capability: Account<'info, CreatorCapability>,

    pub system_program: Program<'info, System>,
}

pub fn grant_creator(ctx: Context<GrantCreator>) -> Result<()> {
    let clock = Clock::get()?;
    let capability = &mut ctx.accounts.capability;

    capability.wallet = ctx.accounts.wallet.key();
    capability.granted_by = ctx.accounts.authority.key();
    capability.granted_at = clock.unix_timestamp;
    capability.revoked = false;
    capability.bump = ctx.bumps.capability;

    emit!(CreatorCapabilitySet {
        wallet: capability.wallet,
        revoked: false,
    });
    msg!("Creator capability granted to {}", capability.wallet);

    Ok(())
}

#[derive(Accounts)]
pub struct RevokeCreator<'info> {
    pub authority: Signer<'info>,

    #[account(
        seeds = [CURATION_CONFIG_SEED],
        bump = config.bump,
        has_one = authority @ AtelierError::Unauthorized,
    )]
    pub config: Account<'info, CurationConfig>,

    #[account(
        mut,
        seeds = [CREATOR_SEED, capability.wallet.as_ref()],
        bump = capability.bump,
    )]
    pub capability: Account<'info, CreatorCapability>,
}

pub fn revoke_creator(ctx: Context<RevokeCreator>) -> Result<()> {
    let capability = &mut ctx.accounts.capability;
    capability.revoked = true;

    emit!(CreatorCapabilitySet {
        wallet: capability.wallet,
        revoked: true,
    });
    msg!("Creator capability revoked for {}", capability.wallet);

    Ok(())
}
