use anchor_lang::prelude::*;
use anchor_lang::system_program::{self, Transfer};

use crate::constants::{
    AUCTION_HOUSE_SEED, AUCTION_SEED, BID_RECORD_SEED, MAX_BID_LAMPORTS, PENDING_SEED, VAULT_SEED,
};
use crate::errors::AtelierError;
use crate::events::{AuctionExtended, BidPlaced, RefundCredited};
use crate::instructions::auction::create_auction::AuctionError;
use crate::state::{Auction, AuctionHouse, BidRecord, PendingWithdrawal, Vault};
use crate::util::move_lamports;

#[derive(Accounts)]
pub struct PlaceBid<'info> {
    #[account(mut)]
    pub bidder: Signer<'info>,

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

    /// Immutable audit-trail entry for this bid.
    #[account(
        init,
        payer = bidder,
        space = BidRecord::SIZE,
        seeds = [
            BID_RECORD_SEED,
            auction.key().as_ref(),
            auction.bid_count.to_le_bytes().as_ref()
        ],
        bump
    )]
    pub bid_record: Account<'info, BidRecord>,

    /// CHECK: displaced bidder's wallet for the push refund; validated
    /// against the auction state in the handler
    #[account(mut)]
    pub previous_bidder: Option<UncheckedAccount<'info>>,

    /// Pull-ledger fallback for the displaced bidder.
    #[account(
        init_if_needed,
        payer = bidder,
        space = PendingWithdrawal::SIZE,
        seeds = [PENDING_SEED, auction.highest_bidder.unwrap_or_default().as_ref()],
        bump
    )]
    pub previous_pending: Option<Account<'info, PendingWithdrawal>>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<PlaceBid>, amount: u64) -> Result<()> {
    let clock = Clock::get()?;
    let now = clock.unix_timestamp;
    let house = &mut ctx.accounts.house;
    let auction = &mut ctx.accounts.auction;

    // === Checks ===
    require!(!house.paused, AtelierError::Paused);
    require!(!auction.settled, AuctionError::AlreadySettled);
    require!(now >= auction.start_time, AuctionError::AuctionNotStarted);
    require!(now < auction.end_time, AuctionError::AuctionEnded);
    require!(amount <= MAX_BID_LAMPORTS, AuctionError::BidAboveCap);

    if let Some(current) = auction.highest_bidder {
        require!(
            current != ctx.accounts.bidder.key(),
            AuctionError::AlreadyHighestBidder
        );
    }

    let required = auction.min_acceptable_bid();
    if amount < required {
        msg!("Bid {} below required minimum {}", amount, required);
        return if auction.highest_bidder.is_none() {
            err!(AuctionError::BidBelowMinimum)
        } else {
            err!(AuctionError::BidBelowRaiseThreshold)
        };
    }

    let displaced = auction.highest_bidder;
    let displaced_amount = auction.highest_bid;

    // === Effects ===
    // Everything below mutates internal state before any lamport movement,
    // so a caller observing mid-transaction state sees the new bid standing.
    let escrow_delta = amount
        .checked_sub(displaced_amount)
        .ok_or(AtelierError::MathOverflow)?;
    house.escrow_add(escrow_delta)?;

    auction.highest_bidder = Some(ctx.accounts.bidder.key());
    auction.highest_bid = amount;

    if let Some(new_end) =
        auction.extension(now, house.extension_window, house.extension_duration)
    {
        auction.end_time = new_end;
        auction.extension_count += 1;
        emit!(AuctionExtended {
            auction_id: auction.id,
            new_end_time: new_end,
            extension_count: auction.extension_count,
        });
    }

    let bid_index = auction.bid_count;
    let record = &mut ctx.accounts.bid_record;
    record.auction = auction.key();
    record.index = bid_index;
    record.bidder = ctx.accounts.bidder.key();
    record.amount = amount;
    record.timestamp = now;
    record.bump = ctx.bumps.bid_record;
    auction.bid_count += 1;

    // === Interactions ===
    system_program::transfer(
        CpiContext::new(
            ctx.accounts.system_program.to_account_info(),
            Transfer {
                from: ctx.accounts.bidder.to_account_info(),
                to: ctx.accounts.vault.to_account_info(),
            },
        ),
        amount,
    )?;

    // Refund the displaced bidder. The push is a plain lamport credit (no
    // recipient code runs); if their wallet is not usable in this
    // transaction the amount lands in their pull ledger instead. A hostile
    // or absent previous bidder can never make the bid fail.
    let mut refund_pushed = false;
    if let Some(previous) = displaced {
        let push_target = ctx
            .accounts
            .previous_bidder
            .as_ref()
            .filter(|info| info.key() == previous && info.is_writable);

        if let Some(target) = push_target {
            move_lamports(
                &ctx.accounts.vault.to_account_info(),
                &target.to_account_info(),
                displaced_amount,
            )?;
            refund_pushed = true;
        } else if let Some(pending) = ctx.accounts.previous_pending.as_mut() {
            if pending.user == Pubkey::default() {
                pending.user = previous;
                pending.bump =
                    Pubkey::find_program_address(&[PENDING_SEED, previous.as_ref()], &crate::ID).1;
            }
            pending.amount = pending
                .amount
                .checked_add(displaced_amount)
                .ok_or(AtelierError::MathOverflow)?;
            house.pending_add(displaced_amount)?;
            emit!(RefundCredited {
                user: previous,
                amount: displaced_amount,
                user_pending: pending.amount,
                pending_total: house.total_pending_withdrawals,
            });
        } else {
            return err!(AuctionError::MissingRefundAccount);
        }
    }

    emit!(BidPlaced {
        auction_id: auction.id,
        bidder: ctx.accounts.bidder.key(),
        amount,
        previous_bidder: displaced,
        previous_bid: displaced_amount,
        escrow_delta,
        escrowed_total: house.escrowed_active_bids,
        end_time: auction.end_time,
        extension_count: auction.extension_count,
        bid_index,
        refund_pushed,
    });
    msg!(
        "Bid {} on auction #{} by {}",
        amount,
        auction.id,
        ctx.accounts.bidder.key()
    );

    Ok(())
}
