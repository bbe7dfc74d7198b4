use anchor_lang::prelude::*;
use anchor_spl::token_interface::TokenAccount;

use crate::constants::{
    AUCTION_HOUSE_SEED, AUCTION_SEED, CREATE_BATCH_ACCOUNTS_PER_ITEM, CUSTODY_SEED,
    ITEM_LISTING_SEED, MAX_CREATE_BATCH,
};
use crate::errors::AtelierError;
use crate::events::AuctionCreated;
use crate::instructions::auction::create_auction::{validate_params, AuctionError, CreateAuctionParams};
use crate::state::{Auction, AuctionHouse, ItemListing};
use crate::util::{create_pda_account, write_account};

// Atomic batch: identical timing and minimum bid for every item, validated
// end to end before anything is written; any item failing a precondition
// reverts the whole call.
//
// remaining_accounts, per item:
//   [item_mint, item_vault, auction (uninitialized), listing (uninitialized)]

#[derive(AnchorSerialize, AnchorDeserialize)]
pub struct BatchCreateParams {
    pub start_time: i64,
    pub duration: i64,
    pub min_bid: u64,
    pub count: u8,
}

#[derive(Accounts)]
pub struct BatchCreateAuctions<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [AUCTION_HOUSE_SEED],
        bump = house.bump,
        has_one = authority @ AtelierError::Unauthorized,
    )]
    pub house: Account<'info, AuctionHouse>,

    /// CHECK: custody signing authority, validated by seeds
    #[account(seeds = [CUSTODY_SEED], bump = house.custody_bump)]
    pub custody: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
}

pub fn handler<'info>(
    ctx: Context<'_, '_, 'info, 'info, BatchCreateAuctions<'info>>,
    params: BatchCreateParams,
) -> Result<()> {
    let clock = Clock::get()?;
    let house = &mut ctx.accounts.house;

    require!(!house.paused, AtelierError::Paused);
    require!(params.count > 0, AuctionError::EmptyBatch);
    require!(
        params.count as usize <= MAX_CREATE_BATCH,
        AuctionError::BatchTooLarge
    );
    validate_params(&CreateAuctionParams {
        start_time: params.start_time,
        duration: params.duration,
        min_bid: params.min_bid,
    })?;
    require!(
        ctx.remaining_accounts.len()
            == params.count as usize * CREATE_BATCH_ACCOUNTS_PER_ITEM,
        AuctionError::MalformedBatch
    );

    let start = params.start_time.max(clock.unix_timestamp);
    let end = start
        .checked_add(params.duration)
        .ok_or(AtelierError::MathOverflow)?;
    require!(end > clock.unix_timestamp, AuctionError::EndNotInFuture);

    let custody_key = ctx.accounts.custody.key();
    let authority_info = ctx.accounts.authority.to_account_info();
    let system_info = ctx.accounts.system_program.to_account_info();

    for (i, chunk) in ctx
        .remaining_accounts
        .chunks(CREATE_BATCH_ACCOUNTS_PER_ITEM)
        .enumerate()
    {
        let [mint_info, vault_info, auction_info, listing_info] = chunk else {
            return err!(AuctionError::MalformedBatch);
        };

        let vault_ta = InterfaceAccount::<TokenAccount>::try_from(vault_info)?;
        require!(
            vault_ta.mint == mint_info.key()
                && vault_ta.owner == custody_key
                && vault_ta.amount == 1,
            AuctionError::ItemNotInCustody
        );
        require!(listing_info.data_is_empty(), AuctionError::DuplicateListing);

        let id = house
            .auction_count
            .checked_add(i as u64)
            .ok_or(AtelierError::MathOverflow)?;
        let id_bytes = id.to_le_bytes();
        let (auction_key, auction_bump) =
            Pubkey::find_program_address(&[AUCTION_SEED, &id_bytes], &crate::ID);
        let mint_key = mint_info.key();
        let (listing_key, listing_bump) =
            Pubkey::find_program_address(&[ITEM_LISTING_SEED, mint_key.as_ref()], &crate::ID);
        require!(
            auction_info.key() == auction_key && listing_info.key() == listing_key,
            AuctionError::MalformedBatch
        );

        create_pda_account(
            &authority_info,
            auction_info,
            &system_info,
            Auction::SIZE,
            &[AUCTION_SEED, &id_bytes, &[auction_bump]],
        )?;
        create_pda_account(
            &authority_info,
            listing_info,
            &system_info,
            ItemListing::SIZE,
            &[ITEM_LISTING_SEED, mint_key.as_ref(), &[listing_bump]],
        )?;

        write_account(
            &Auction {
                id,
                item_mint: mint_key,
                item_vault: vault_info.key(),
                start_time: start,
                end_time: end,
                min_bid: params.min_bid,
                highest_bidder: None,
                highest_bid: 0,
                extension_count: 0,
                bid_count: 0,
                settled: false,
                created_at: clock.unix_timestamp,
                bump: auction_bump,
            },
            auction_info,
        )?;
        write_account(
            &ItemListing {
                item_mint: mint_key,
                auction: auction_key,
                bump: listing_bump,
            },
            listing_info,
        )?;

        emit!(AuctionCreated {
            auction_id: id,
            item_mint: mint_key,
            start_time: start,
            end_time: end,
            min_bid: params.min_bid,
        });
    }

    house.auction_count = house
        .auction_count
        .checked_add(params.count as u64)
        .ok_or(AtelierError::MathOverflow)?;

    msg!("Created {} auctions in batch", params.count);

    Ok(())
}
