use anchor_lang::prelude::*;

use crate::constants::{AUCTION_HOUSE_SEED, MAX_EXTENSION_SECONDS, MIN_EXTENSION_SECONDS};
use crate::errors::AtelierError;
use crate::events::PausedSet;
use crate::state::AuctionHouse;

#[derive(AnchorSerialize, AnchorDeserialize)]
pub struct UpdateHouseParams {
    pub payout_address: Option<Pubkey>,
    pub extension_window: Option<i64>,
    pub extension_duration: Option<i64>,
}

#[derive(Accounts)]
pub struct HouseAdmin<'info> {
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [AUCTION_HOUSE_SEED],
        bump = house.bump,
        has_one = authority @ AtelierError::Unauthorized,
    )]
    pub house: Account<'info, AuctionHouse>,
}

pub fn update_house_config(ctx: Context<HouseAdmin>, params: UpdateHouseParams) -> Result<()> {
    let house = &mut ctx.accounts.house;

    if let Some(payout) = params.payout_address {
        require!(payout != Pubkey::default(), AtelierError::InvalidParameter);
        house.payout_address = payout;
    }
    if let Some(window) = params.extension_window {
        require!(
            (MIN_EXTENSION_SECONDS..=MAX_EXTENSION_SECONDS).contains(&window),
            AtelierError::InvalidParameter
        );
        house.extension_window = window;
    }
    if let Some(duration) = params.extension_duration {
        require!(
            (MIN_EXTENSION_SECONDS..=MAX_EXTENSION_SECONDS).contains(&duration),
            AtelierError::InvalidParameter
        );
        house.extension_duration = duration;
    }

    Ok(())
}

pub fn set_paused(ctx: Context<HouseAdmin>, paused: bool) -> Result<()> {
    ctx.accounts.house.paused = paused;
    emit!(PausedSet { paused });
    msg!("Auction house paused: {}", paused);
    Ok(())
}
