use anchor_lang::prelude::*;
use anchor_spl::token_interface::{
    transfer_checked, Mint, TokenAccount, TokenInterface, TransferChecked,
};

use crate::constants::{AUCTION_HOUSE_SEED, AUCTION_SEED, CUSTODY_SEED, ITEM_LISTING_SEED};
use crate::errors::AtelierError;
use crate::events::AuctionCancelled;
use crate::instructions::auction::create_auction::AuctionError;
use crate::state::{Auction, AuctionHouse, ItemListing};

#[derive(Accounts)]
pub struct CancelAuction<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        seeds = [AUCTION_HOUSE_SEED],
        bump = house.bump,
        has_one = authority @ AtelierError::Unauthorized,
    )]
    pub house: Account<'info, AuctionHouse>,

    /// Closed on cancellation; rent back to the operator who created it.
    #[account(
        mut,
        close = authority,
        seeds = [AUCTION_SEED, auction.id.to_le_bytes().as_ref()],
        bump = auction.bump,
    )]
    pub auction: Account<'info, Auction>,

    #[account(
        mut,
        close = authority,
        seeds = [ITEM_LISTING_SEED, auction.item_mint.as_ref()],
        bump = listing.bump,
        constraint = listing.auction == auction.key() @ AuctionError::ListingMismatch,
    )]
    pub listing: Account<'info, ItemListing>,

    #[account(constraint = item_mint.key() == auction.item_mint @ AuctionError::ItemNotInCustody)]
    pub item_mint: InterfaceAccount<'info, Mint>,

    /// CHECK: custody signing authority, validated by seeds
    #[account(seeds = [CUSTODY_SEED], bump = house.custody_bump)]
    pub custody: UncheckedAccount<'info>,

    #[account(
        mut,
        token::mint = item_mint,
        token::authority = custody,
        constraint = item_vault.key() == auction.item_vault @ AuctionError::ItemNotInCustody,
    )]
    pub item_vault: InterfaceAccount<'info, TokenAccount>,

    /// Where the operator takes the item back; only the mint is enforced.
    #[account(mut, token::mint = item_mint)]
    pub reclaim_destination: InterfaceAccount<'info, TokenAccount>,

    pub token_program: Interface<'info, TokenInterface>,
}

pub fn handler(ctx: Context<CancelAuction>) -> Result<()> {
    let house = &ctx.accounts.house;
    let auction = &ctx.accounts.auction;

    require!(!house.paused, AtelierError::Paused);
    require!(!auction.settled, AuctionError::AlreadySettled);
    // Committed bidders make an auction irrevocable.
    require!(auction.highest_bidder.is_none(), AuctionError::AuctionHasBids);

    let custody_seeds: &[&[u8]] = &[CUSTODY_SEED, &[house.custody_bump]];
    transfer_checked(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            TransferChecked {
                from: ctx.accounts.item_vault.to_account_info(),
                to: ctx.accounts.reclaim_destination.to_account_info(),
                authority: ctx.accounts.custody.to_account_info(),
                mint: ctx.accounts.item_mint.to_account_info(),
            },
            &[custody_seeds],
        ),
        1,
        ctx.accounts.item_mint.decimals,
    )?;

    emit!(AuctionCancelled {
        auction_id: auction.id,
        item_mint: auction.item_mint,
    });
    msg!("Auction #{} cancelled before any bid", auction.id);

    Ok(())
}
