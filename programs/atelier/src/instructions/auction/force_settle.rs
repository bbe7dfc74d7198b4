use anchor_lang::prelude::*;
use anchor_spl::token_interface::{
    transfer_checked, Mint, TokenAccount, TokenInterface, TransferChecked,
};

use crate::constants::{
    AUCTION_HOUSE_SEED, AUCTION_SEED, CUSTODY_SEED, FORCE_SETTLE_GRACE_SECONDS,
    ITEM_LISTING_SEED, VAULT_SEED,
};
use crate::errors::AtelierError;
use crate::events::AuctionForceSettled;
use crate::instructions::auction::create_auction::AuctionError;
use crate::state::{Auction, AuctionHouse, ItemListing, Vault};
use crate::util::move_lamports;

// Escape hatch for a won auction stranded by a winner who never opened a
// receiving token account. The transfer destination is only mint-checked;
// the operator accepts the misdelivery risk explicitly, and only after the
// grace period has run out.

#[derive(Accounts)]
pub struct ForceSettleUnsafe<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [AUCTION_HOUSE_SEED],
        bump = house.bump,
        has_one = authority @ AtelierError::Unauthorized,
    )]
    pub house: Account<'info, AuctionHouse>,

    #[account(mut, seeds = [VAULT_SEED], bump = house.vault_bump)]
    pub vault: Account<'info, Vault>,

    #[account(
        mut,
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

    /// Non-verifying destination: any token account of the right mint.
    #[account(mut, token::mint = item_mint)]
    pub destination: InterfaceAccount<'info, TokenAccount>,

    /// CHECK: proceeds push target; must match the configured payout
    /// address. Absent, proceeds accrue to realized instead.
    #[account(mut)]
    pub payout_destination: Option<UncheckedAccount<'info>>,

    pub token_program: Interface<'info, TokenInterface>,
}

pub fn handler(ctx: Context<ForceSettleUnsafe>) -> Result<()> {
    let clock = Clock::get()?;
    let house = &mut ctx.accounts.house;
    let auction = &mut ctx.accounts.auction;

    require!(!house.paused, AtelierError::Paused);
    require!(!auction.settled, AuctionError::AlreadySettled);
    require!(
        auction.is_ended(clock.unix_timestamp),
        AuctionError::AuctionNotEnded
    );
    require!(
        clock.unix_timestamp
            >= auction.end_time.saturating_add(FORCE_SETTLE_GRACE_SECONDS),
        AuctionError::GracePeriodNotElapsed
    );
    let winner = auction
        .highest_bidder
        .ok_or(AuctionError::WinnerAccountMismatch)?;
    require!(
        ctx.accounts.item_vault.amount == 1,
        AuctionError::ItemNotInCustody
    );

    let amount = auction.highest_bid;

    // === Effects ===
    auction.settled = true;
    house.escrow_release(amount)?;
    let push_target = ctx
        .accounts
        .payout_destination
        .as_ref()
        .filter(|info| info.key() == house.payout_address && info.is_writable);
    let proceeds_pushed = push_target.is_some();
    if !proceeds_pushed {
        house.realized_add(amount)?;
    }

    // === Interactions ===
    let custody_seeds: &[&[u8]] = &[CUSTODY_SEED, &[house.custody_bump]];
    transfer_checked(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            TransferChecked {
                from: ctx.accounts.item_vault.to_account_info(),
                to: ctx.accounts.destination.to_account_info(),
                authority: ctx.accounts.custody.to_account_info(),
                mint: ctx.accounts.item_mint.to_account_info(),
            },
            &[custody_seeds],
        ),
        1,
        ctx.accounts.item_mint.decimals,
    )?;

    if let Some(payout) = push_target {
        move_lamports(
            &ctx.accounts.vault.to_account_info(),
            &payout.to_account_info(),
            amount,
        )?;
    }

    emit!(AuctionForceSettled {
        auction_id: auction.id,
        winner,
        amount,
        destination: ctx.accounts.destination.key(),
        proceeds_pushed,
        escrowed_total: house.escrowed_active_bids,
        realized_total: house.realized_proceeds,
    });
    msg!(
        "Auction #{} force-settled to {} (unverified destination)",
        auction.id,
        ctx.accounts.destination.key()
    );

    Ok(())
}
