use anchor_lang::prelude::*;
use anchor_spl::token_interface::{
    transfer_checked, Mint, TokenAccount, TokenInterface, TransferChecked,
};

use crate::constants::{
    AUCTION_HOUSE_SEED, AUCTION_SEED, CUSTODY_SEED, ITEM_LISTING_SEED, VAULT_SEED,
};
use crate::errors::AtelierError;
use crate::events::AuctionSettled;
use crate::instructions::auction::create_auction::AuctionError;
use crate::state::{Auction, AuctionHouse, ItemListing, Vault};
use crate::util::move_lamports;

#[derive(Accounts)]
pub struct SettleAuction<'info> {
    /// Settlement is permissionless once the auction has ended.
    #[account(mut)]
    pub settler: Signer<'info>,

    #[account(mut, seeds = [AUCTION_HOUSE_SEED], bump = house.bump)]
    pub house: Account<'info, AuctionHouse>,

    #[account(mut, seeds = [VAULT_SEED], bump = house.vault_bump)]
    pub vault: Account<'info, Vault>,

    #[account(
        mut,
        seeds = [AUCTION_SEED, auction.id.to_le_bytes().as_ref()],
        bump = auction.bump,
    )]
    pub auction: Account<'info, Auction>,

    /// Closing the listing frees the item for a future auction.
    #[account(
        mut,
        close = settler,
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

    /// Receiver-verified destination: must exist and be owned by the
    /// winner. A winner who never opened one cannot be settled normally;
    /// that is what the grace-period override is for.
    #[account(mut)]
    pub winner_item_account: Option<InterfaceAccount<'info, TokenAccount>>,

    /// CHECK: proceeds push target; must match the configured payout
    /// address. Absent, proceeds accrue to realized instead.
    #[account(mut)]
    pub payout_destination: Option<UncheckedAccount<'info>>,

    pub token_program: Interface<'info, TokenInterface>,
}

pub fn handler(ctx: Context<SettleAuction>) -> Result<()> {
    let clock = Clock::get()?;
    let house = &mut ctx.accounts.house;
    let auction = &mut ctx.accounts.auction;

    require!(!house.paused, AtelierError::Paused);
    require!(auction.is_ended(clock.unix_timestamp), AuctionError::AuctionNotEnded);
    require!(!auction.settled, AuctionError::AlreadySettled);

    auction.settled = true;

    let Some(winner) = auction.highest_bidder else {
        // No bids: latch, release the (empty) reservation, move nothing.
        emit!(AuctionSettled {
            auction_id: auction.id,
            winner: None,
            amount: 0,
            proceeds_pushed: false,
            escrowed_total: house.escrowed_active_bids,
            realized_total: house.realized_proceeds,
        });
        msg!("Auction #{} closed with no bids", auction.id);
        return Ok(());
    };

    // Custody re-check: approval could have been pulled after bidding began.
    require!(
        ctx.accounts.item_vault.amount == 1,
        AuctionError::ItemNotInCustody
    );

    let destination = ctx
        .accounts
        .winner_item_account
        .as_ref()
        .ok_or(AuctionError::ReceiverNotVerified)?;
    require!(
        destination.owner == winner && destination.mint == auction.item_mint,
        AuctionError::ReceiverNotVerified
    );

    let amount = auction.highest_bid;

    // === Effects ===
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
    let custody_bump = house.custody_bump;
    let custody_seeds: &[&[u8]] = &[CUSTODY_SEED, &[custody_bump]];
    transfer_checked(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            TransferChecked {
                from: ctx.accounts.item_vault.to_account_info(),
                to: destination.to_account_info(),
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

    emit!(AuctionSettled {
        auction_id: auction.id,
        winner: Some(winner),
        amount,
        proceeds_pushed,
        escrowed_total: house.escrowed_active_bids,
        realized_total: house.realized_proceeds,
    });
    msg!(
        "Auction #{} settled; item to {}, proceeds {} ({})",
        auction.id,
        winner,
        amount,
        if proceeds_pushed { "pushed" } else { "accrued" }
    );

    Ok(())
}
