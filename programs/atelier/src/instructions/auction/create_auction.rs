use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount};

use crate::constants::{
    AUCTION_HOUSE_SEED, AUCTION_SEED, CUSTODY_SEED, ITEM_LISTING_SEED, MAX_BID_LAMPORTS,
};
use crate::errors::AtelierError;
use crate::events::AuctionCreated;
use crate::state::{Auction, AuctionHouse, ItemListing};

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy)]
pub struct CreateAuctionParams {
    /// Desired opening time; clamped forward to now.
    pub start_time: i64,
    pub duration: i64,
    pub min_bid: u64,
}

#[derive(Accounts)]
pub struct CreateAuction<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [AUCTION_HOUSE_SEED],
        bump = house.bump,
        has_one = authority @ AtelierError::Unauthorized,
    )]
    pub house: Account<'info, AuctionHouse>,

    pub item_mint: InterfaceAccount<'info, Mint>,

    /// CHECK: custody signing authority, validated by seeds
    #[account(seeds = [CUSTODY_SEED], bump = house.custody_bump)]
    pub custody: UncheckedAccount<'info>,

    /// The item must already sit in custody: held and transfer-approved.
    #[account(
        token::mint = item_mint,
        token::authority = custody,
    )]
    pub item_vault: InterfaceAccount<'info, TokenAccount>,

    #[account(
        init,
        payer = authority,
        space = Auction::SIZE,
        seeds = [AUCTION_SEED, house.auction_count.to_le_bytes().as_ref()],
        bump
    )]
    pub auction: Account<'info, Auction>,

    /// One live auction per item; creation fails while a listing exists.
    #[account(
        init,
        payer = authority,
        space = ItemListing::SIZE,
        seeds = [ITEM_LISTING_SEED, item_mint.key().as_ref()],
        bump
    )]
    pub listing: Account<'info, ItemListing>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<CreateAuction>, params: CreateAuctionParams) -> Result<()> {
    let clock = Clock::get()?;
    let house = &mut ctx.accounts.house;

    require!(!house.paused, AtelierError::Paused);
    validate_params(&params)?;
    require!(
        ctx.accounts.item_vault.amount == 1,
        AuctionError::ItemNotInCustody
    );

    let start = params.start_time.max(clock.unix_timestamp);
    let end = start
        .checked_add(params.duration)
        .ok_or(AtelierError::MathOverflow)?;
    require!(end > clock.unix_timestamp, AuctionError::EndNotInFuture);

    let auction = &mut ctx.accounts.auction;
    auction.id = house.auction_count;
    auction.item_mint = ctx.accounts.item_mint.key();
    auction.item_vault = ctx.accounts.item_vault.key();
    auction.start_time = start;
    auction.end_time = end;
    auction.min_bid = params.min_bid;
    auction.highest_bidder = None;
    auction.highest_bid = 0;
    auction.extension_count = 0;
    auction.bid_count = 0;
    auction.settled = false;
    auction.created_at = clock.unix_timestamp;
    auction.bump = ctx.bumps.auction;

    let listing = &mut ctx.accounts.listing;
    listing.item_mint = ctx.accounts.item_mint.key();
    listing.auction = auction.key();
    listing.bump = ctx.bumps.listing;

    house.auction_count += 1;

    emit!(AuctionCreated {
        auction_id: auction.id,
        item_mint: auction.item_mint,
        start_time: auction.start_time,
        end_time: auction.end_time,
        min_bid: auction.min_bid,
    });
    msg!(
        "Auction #{} created for item {}; ends at {}",
        auction.id,
        auction.item_mint,
        auction.end_time
    );

    Ok(())
}

pub fn validate_params(params: &CreateAuctionParams) -> Result<()> {
    require!(params.duration > 0, AuctionError::ZeroDuration);
    require!(
        params.min_bid <= MAX_BID_LAMPORTS,
        AuctionError::BidAboveCap
    );
    Ok(())
}

#[error_code]
pub enum AuctionError {
    #[msg("Auction duration must be positive")]
    ZeroDuration,

    #[msg("Computed end time is not in the future")]
    EndNotInFuture,

    #[msg("Item is not held under the custody authority")]
    ItemNotInCustody,

    #[msg("An active listing already exists for this item")]
    DuplicateListing,

    #[msg("Listing does not belong to this auction")]
    ListingMismatch,

    #[msg("Auction has not started")]
    AuctionNotStarted,

    #[msg("Auction has ended")]
    AuctionEnded,

    #[msg("Auction has not ended")]
    AuctionNotEnded,

    #[msg("Auction is already settled")]
    AlreadySettled,

    #[msg("Bid is below the auction minimum")]
    BidBelowMinimum,

    #[msg("Bid does not clear the required raise over the standing bid")]
    BidBelowRaiseThreshold,

    #[msg("Bid exceeds the protocol ceiling")]
    BidAboveCap,

    #[msg("Caller already holds the highest bid")]
    AlreadyHighestBidder,

    #[msg("Displaced bidder refund needs their wallet or pending account")]
    MissingRefundAccount,

    #[msg("Winner account does not match the recorded highest bidder")]
    WinnerAccountMismatch,

    #[msg("Receiving token account is missing or not owned by the winner")]
    ReceiverNotVerified,

    #[msg("Auction already has bids")]
    AuctionHasBids,

    #[msg("Nothing to withdraw")]
    NothingToWithdraw,

    #[msg("Requested amount exceeds realized proceeds")]
    ProceedsUnavailable,

    #[msg("Force settlement grace period has not elapsed")]
    GracePeriodNotElapsed,

    #[msg("No pending balance recorded for this user")]
    NoPendingBalance,

    #[msg("Nothing to sweep")]
    NothingToSweep,

    #[msg("Batch exceeds the size cap")]
    BatchTooLarge,

    #[msg("Batch is empty")]
    EmptyBatch,

    #[msg("Batch account list does not match the expected shape")]
    MalformedBatch,
}
