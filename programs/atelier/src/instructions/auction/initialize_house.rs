use anchor_lang::prelude::*;

use crate::constants::{
    AUCTION_HOUSE_SEED, CUSTODY_SEED, MAX_EXTENSION_SECONDS, MIN_EXTENSION_SECONDS, VAULT_SEED,
};
use crate::errors::AtelierError;
use crate::state::{AuctionHouse, Vault};

#[derive(AnchorSerialize, AnchorDeserialize)]
pub struct InitializeHouseParams {
    pub payout_address: Pubkey,
    pub extension_window: i64,
    pub extension_duration: i64,
}

#[derive(Accounts)]
pub struct InitializeHouse<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        init,
        payer = authority,
        space = AuctionHouse::SIZE,
        seeds = [AUCTION_HOUSE_SEED],
        bump
    )]
    pub house: Account<'info, AuctionHouse>,

    /// Lamport store for escrowed, pending and realized funds.
    #[account(
        init,
        payer = authority,
        space = Vault::SIZE,
        seeds = [VAULT_SEED],
        bump
    )]
    pub vault: Account<'info, Vault>,

    /// CHECK: signing authority over per-item token vaults; holds no data
    #[account(seeds = [CUSTODY_SEED], bump)]
    pub custody: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<InitializeHouse>, params: InitializeHouseParams) -> Result<()> {
    require!(
        params.payout_address != Pubkey::default(),
        AtelierError::InvalidParameter
    );
    require!(
        (MIN_EXTENSION_SECONDS..=MAX_EXTENSION_SECONDS).contains(&params.extension_window),
        AtelierError::InvalidParameter
    );
    require!(
        (MIN_EXTENSION_SECONDS..=MAX_EXTENSION_SECONDS).contains(&params.extension_duration),
        AtelierError::InvalidParameter
    );

    let house = &mut ctx.accounts.house;
    house.authority = ctx.accounts.authority.key();
    house.payout_address = params.payout_address;
    house.paused = false;
    house.auction_count = 0;
    house.escrowed_active_bids = 0;
    house.total_pending_withdrawals = 0;
    house.realized_proceeds = 0;
    house.extension_window = params.extension_window;
    house.extension_duration = params.extension_duration;
    house.vault_bump = ctx.bumps.vault;
    house.custody_bump = ctx.bumps.custody;
    house.bump = ctx.bumps.house;

    ctx.accounts.vault.bump = ctx.bumps.vault;

    msg!(
        "Auction house initialized; payout {}",
        house.payout_address
    );

    Ok(())
}
