use anchor_lang::prelude::*;
use anchor_spl::token_interface::{
    transfer_checked, Mint, TokenAccount, TokenInterface, TransferChecked,
};

use crate::constants::{
    AUCTION_HOUSE_SEED, CANCEL_BATCH_ACCOUNTS_PER_ITEM, CUSTODY_SEED, MAX_CANCEL_BATCH,
};
use crate::errors::AtelierError;
use crate::events::{AuctionCancelled, CancelSkipReason, CancelSkipped};
use crate::instructions::auction::create_auction::AuctionError;
use crate::state::{Auction, AuctionHouse, ItemListing};
use crate::util::close_pda_account;

// Best-effort batch cancellation; auctions that have attracted a bid are
// skipped and reported, never cancelled.
//
// remaining_accounts, per item:
//   [auction, listing, item_mint, item_vault, reclaim_destination]

#[derive(Accounts)]
pub struct BatchCancelAuctions<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        seeds = [AUCTION_HOUSE_SEED],
        bump = house.bump,
        has_one = authority @ AtelierError::Unauthorized,
    )]
    pub house: Account<'info, AuctionHouse>,

    /// CHECK: custody signing authority, validated by seeds
    #[account(seeds = [CUSTODY_SEED], bump = house.custody_bump)]
    pub custody: UncheckedAccount<'info>,

    pub token_program: Interface<'info, TokenInterface>,
}

pub fn handler<'info>(
    ctx: Context<'_, '_, 'info, 'info, BatchCancelAuctions<'info>>,
) -> Result<()> {
    let house = &ctx.accounts.house;

    require!(!house.paused, AtelierError::Paused);
    require!(!ctx.remaining_accounts.is_empty(), AuctionError::EmptyBatch);
    require!(
        ctx.remaining_accounts.len() % CANCEL_BATCH_ACCOUNTS_PER_ITEM == 0,
        AuctionError::MalformedBatch
    );
    require!(
        ctx.remaining_accounts.len() / CANCEL_BATCH_ACCOUNTS_PER_ITEM <= MAX_CANCEL_BATCH,
        AuctionError::BatchTooLarge
    );

    let custody_key = ctx.accounts.custody.key();
    let custody_info = ctx.accounts.custody.to_account_info();
    let authority_info = ctx.accounts.authority.to_account_info();
    let token_program_info = ctx.accounts.token_program.to_account_info();
    let custody_bump = house.custody_bump;

    let mut cancelled = 0u32;
    let mut skipped = 0u32;

    for (i, chunk) in ctx
        .remaining_accounts
        .chunks(CANCEL_BATCH_ACCOUNTS_PER_ITEM)
        .enumerate()
    {
        let index = i as u32;
        let [auction_info, listing_info, mint_info, item_vault_info, destination_info] = chunk
        else {
            return err!(AuctionError::MalformedBatch);
        };

        let skip = |reason: CancelSkipReason| {
            emit!(CancelSkipped {
                index,
                auction: auction_info.key(),
                reason,
            });
        };

        let Ok(auction) = Account::<Auction>::try_from(auction_info) else {
            skip(CancelSkipReason::Malformed);
            skipped += 1;
            continue;
        };
        if !auction_info.is_writable || !listing_info.is_writable {
            skip(CancelSkipReason::Malformed);
            skipped += 1;
            continue;
        }
        if auction.settled {
            skip(CancelSkipReason::AlreadySettled);
            skipped += 1;
            continue;
        }
        if auction.highest_bidder.is_some() {
            skip(CancelSkipReason::HasBids);
            skipped += 1;
            continue;
        }
        let listing_ok = Account::<ItemListing>::try_from(listing_info)
            .map(|l| l.auction == auction.key() && l.item_mint == auction.item_mint)
            .unwrap_or(false);
        let custody_ok = InterfaceAccount::<TokenAccount>::try_from(item_vault_info)
            .map(|v| {
                item_vault_info.key() == auction.item_vault
                    && v.mint == auction.item_mint
                    && v.owner == custody_key
                    && v.amount == 1
            })
            .unwrap_or(false);
        let destination_ok = InterfaceAccount::<TokenAccount>::try_from(destination_info)
            .map(|t| t.mint == auction.item_mint)
            .unwrap_or(false);
        if !listing_ok
            || !custody_ok
            || !destination_ok
            || !destination_info.is_writable
            || mint_info.key() != auction.item_mint
        {
            skip(CancelSkipReason::Malformed);
            skipped += 1;
            continue;
        }

        let mint = InterfaceAccount::<Mint>::try_from(mint_info)?;

        let custody_seeds: &[&[u8]] = &[CUSTODY_SEED, &[custody_bump]];
        transfer_checked(
            CpiContext::new_with_signer(
                token_program_info.clone(),
                TransferChecked {
                    from: item_vault_info.clone(),
                    to: destination_info.clone(),
                    authority: custody_info.clone(),
                    mint: mint_info.clone(),
                },
                &[custody_seeds],
            ),
            1,
            mint.decimals,
        )?;

        emit!(AuctionCancelled {
            auction_id: auction.id,
            item_mint: auction.item_mint,
        });

        close_pda_account(listing_info, &authority_info)?;
        close_pda_account(auction_info, &authority_info)?;
        cancelled += 1;
    }

    msg!("Batch cancel: {} cancelled, {} skipped", cancelled, skipped);

    Ok(())
}
