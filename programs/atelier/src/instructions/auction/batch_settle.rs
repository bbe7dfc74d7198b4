use anchor_lang::prelude::*;
use anchor_spl::token_interface::{
    transfer_checked, Mint, TokenAccount, TokenInterface, TransferChecked,
};

use crate::constants::{
    AUCTION_HOUSE_SEED, CUSTODY_SEED, ITEM_LISTING_SEED, MAX_SETTLE_BATCH,
    SETTLE_BATCH_ACCOUNTS_PER_ITEM, VAULT_SEED,
};
use crate::errors::AtelierError;
use crate::events::{AuctionSettled, SettleSkipReason, SettlementSkipped};
use crate::instructions::auction::create_auction::AuctionError;
use crate::state::{Auction, AuctionHouse, ItemListing, Vault};
use crate::util::{close_pda_account, move_lamports, write_account};

// Best-effort batch: each item is validated independently; failures are
// skipped and reported so one stuck auction cannot hold the rest hostage.
// In-batch item transfers require a pre-existing, owner-verified token
// account; winners without one are skipped and settled individually or
// through the grace-period override.
//
// remaining_accounts, per item:
//   [auction, listing, item_mint, item_vault, winner_token_account]

#[derive(Accounts)]
pub struct BatchSettleAuctions<'info> {
    #[account(mut)]
    pub settler: Signer<'info>,

    #[account(mut, seeds = [AUCTION_HOUSE_SEED], bump = house.bump)]
    pub house: Account<'info, AuctionHouse>,

    #[account(mut, seeds = [VAULT_SEED], bump = house.vault_bump)]
    pub vault: Account<'info, Vault>,

    /// CHECK: custody signing authority, validated by seeds
    #[account(seeds = [CUSTODY_SEED], bump = house.custody_bump)]
    pub custody: UncheckedAccount<'info>,

    /// CHECK: proceeds push target; must match the configured payout
    /// address. Absent, proceeds accrue to realized instead.
    #[account(mut)]
    pub payout_destination: Option<UncheckedAccount<'info>>,

    pub token_program: Interface<'info, TokenInterface>,
}

pub fn handler<'info>(
    ctx: Context<'_, '_, 'info, 'info, BatchSettleAuctions<'info>>,
) -> Result<()> {
    let clock = Clock::get()?;
    let now = clock.unix_timestamp;
    let house = &mut ctx.accounts.house;

    require!(!house.paused, AtelierError::Paused);
    require!(!ctx.remaining_accounts.is_empty(), AuctionError::EmptyBatch);
    require!(
        ctx.remaining_accounts.len() % SETTLE_BATCH_ACCOUNTS_PER_ITEM == 0,
        AuctionError::MalformedBatch
    );
    require!(
        ctx.remaining_accounts.len() / SETTLE_BATCH_ACCOUNTS_PER_ITEM <= MAX_SETTLE_BATCH,
        AuctionError::BatchTooLarge
    );

    let custody_key = ctx.accounts.custody.key();
    let custody_info = ctx.accounts.custody.to_account_info();
    let vault_info = ctx.accounts.vault.to_account_info();
    let settler_info = ctx.accounts.settler.to_account_info();
    let token_program_info = ctx.accounts.token_program.to_account_info();
    let payout_address = house.payout_address;
    let push_target = ctx
        .accounts
        .payout_destination
        .as_ref()
        .filter(|p| p.key() == payout_address && p.is_writable)
        .map(|p| p.to_account_info());
    let custody_bump = house.custody_bump;

    let mut settled = 0u32;
    let mut skipped = 0u32;

    for (i, chunk) in ctx
        .remaining_accounts
        .chunks(SETTLE_BATCH_ACCOUNTS_PER_ITEM)
        .enumerate()
    {
        let index = i as u32;
        let [auction_info, listing_info, mint_info, item_vault_info, winner_ta_info] = chunk
        else {
            return err!(AuctionError::MalformedBatch);
        };

        let skip = |reason: SettleSkipReason| {
            emit!(SettlementSkipped {
                index,
                auction: auction_info.key(),
                reason,
            });
        };

        let Ok(mut auction) = Account::<Auction>::try_from(auction_info) else {
            skip(SettleSkipReason::Malformed);
            skipped += 1;
            continue;
        };
        if !auction_info.is_writable || !listing_info.is_writable {
            skip(SettleSkipReason::Malformed);
            skipped += 1;
            continue;
        }
        if auction.settled {
            skip(SettleSkipReason::AlreadySettled);
            skipped += 1;
            continue;
        }
        if !auction.is_ended(now) {
            skip(SettleSkipReason::NotEnded);
            skipped += 1;
            continue;
        }
        let listing_ok = Account::<ItemListing>::try_from(listing_info)
            .map(|l| l.auction == auction.key() && l.item_mint == auction.item_mint)
            .unwrap_or(false);
        if !listing_ok {
            skip(SettleSkipReason::Malformed);
            skipped += 1;
            continue;
        }

        let Some(winner) = auction.highest_bidder else {
            // No bids: latch and free the listing, nothing moves.
            auction.settled = true;
            write_account(&*auction, auction_info)?;
            close_pda_account(listing_info, &settler_info)?;
            emit!(AuctionSettled {
                auction_id: auction.id,
                winner: None,
                amount: 0,
                proceeds_pushed: false,
                escrowed_total: house.escrowed_active_bids,
                realized_total: house.realized_proceeds,
            });
            settled += 1;
            continue;
        };

        // Custody re-check.
        let custody_ok = InterfaceAccount::<TokenAccount>::try_from(item_vault_info)
            .map(|v| {
                item_vault_info.key() == auction.item_vault
                    && v.mint == auction.item_mint
                    && v.owner == custody_key
                    && v.amount == 1
            })
            .unwrap_or(false);
        if !custody_ok || mint_info.key() != auction.item_mint {
            skip(SettleSkipReason::CustodyLost);
            skipped += 1;
            continue;
        }

        // Receiver verification.
        let receiver_ok = InterfaceAccount::<TokenAccount>::try_from(winner_ta_info)
            .map(|t| t.owner == winner && t.mint == auction.item_mint)
            .unwrap_or(false);
        if !receiver_ok || !winner_ta_info.is_writable {
            skip(SettleSkipReason::ReceiverNotVerified);
            skipped += 1;
            continue;
        }

        let mint = InterfaceAccount::<Mint>::try_from(mint_info)?;
        let amount = auction.highest_bid;

        // === Effects ===
        auction.settled = true;
        house.escrow_release(amount)?;
        let proceeds_pushed = push_target.is_some();
        if !proceeds_pushed {
            house.realized_add(amount)?;
        }
        write_account(&*auction, auction_info)?;
        close_pda_account(listing_info, &settler_info)?;

        // === Interactions ===
        let custody_seeds: &[&[u8]] = &[CUSTODY_SEED, &[custody_bump]];
        transfer_checked(
            CpiContext::new_with_signer(
                token_program_info.clone(),
                TransferChecked {
                    from: item_vault_info.clone(),
                    to: winner_ta_info.clone(),
                    authority: custody_info.clone(),
                    mint: mint_info.clone(),
                },
                &[custody_seeds],
            ),
            1,
            mint.decimals,
        )?;

        if let Some(payout) = push_target.as_ref() {
            move_lamports(&vault_info, payout, amount)?;
        }

        emit!(AuctionSettled {
            auction_id: auction.id,
            winner: Some(winner),
            amount,
            proceeds_pushed,
            escrowed_total: house.escrowed_active_bids,
            realized_total: house.realized_proceeds,
        });
        settled += 1;
    }

    msg!("Batch settlement: {} settled, {} skipped", settled, skipped);

    Ok(())
}
