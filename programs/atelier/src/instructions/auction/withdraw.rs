use anchor_lang::prelude::*;

use crate::constants::{AUCTION_HOUSE_SEED, PENDING_SEED, VAULT_SEED};
use crate::errors::AtelierError;
use crate::events::{FundsWithdrawn, ProceedsWithdrawn};
use crate::instructions::auction::create_auction::AuctionError;
use crate::state::{AuctionHouse, PendingWithdrawal, Vault};
use crate::util::move_lamports;

#[derive(Accounts)]
pub struct Withdraw<'info> {
    #[account(mut)]
    pub user: Signer<'info>,

    #[account(mut, seeds = [AUCTION_HOUSE_SEED], bump = house.bump)]
    pub house: Account<'info, AuctionHouse>,

    #[account(mut, seeds = [VAULT_SEED], bump = house.vault_bump)]
    pub vault: Account<'info, Vault>,

    #[account(
        mut,
        seeds = [PENDING_SEED, user.key().as_ref()],
        bump = pending.bump,
        constraint = pending.user == user.key() @ AuctionError::NoPendingBalance,
    )]
    pub pending: Account<'info, PendingWithdrawal>,
}

/// Pull-pattern claim of a previously credited refund. The balance is
/// zeroed before the payout; transaction atomicity restores it if the
/// payout cannot complete, so a repeat claim can never double-pay.
pub fn handler(ctx: Context<Withdraw>) -> Result<()> {
    let house = &mut ctx.accounts.house;
    let pending = &mut ctx.accounts.pending;

    require!(!house.paused, AtelierError::Paused);

    let amount = pending.amount;
    require!(amount > 0, AuctionError::NothingToWithdraw);

    pending.amount = 0;
    house.pending_release(amount)?;

    move_lamports(
        &ctx.accounts.vault.to_account_info(),
        &ctx.accounts.user.to_account_info(),
        amount,
    )?;

    emit!(FundsWithdrawn {
        user: ctx.accounts.user.key(),
        amount,
        pending_total: house.total_pending_withdrawals,
        by_operator: false,
    });
    msg!("Withdrew {} for {}", amount, ctx.accounts.user.key());

    Ok(())
}

#[derive(Accounts)]
pub struct WithdrawProceeds<'info> {
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

    /// CHECK: must be the configured payout destination
    #[account(
        mut,
        constraint = payout_destination.key() == house.payout_address
            @ AtelierError::InvalidPayoutAddress,
    )]
    pub payout_destination: UncheckedAccount<'info>,
}

pub fn withdraw_proceeds(ctx: Context<WithdrawProceeds>, amount: u64) -> Result<()> {
    let house = &mut ctx.accounts.house;

    require!(!house.paused, AtelierError::Paused);
    require!(amount > 0, AtelierError::InvalidParameter);
    require!(
        amount <= house.realized_proceeds,
        AuctionError::ProceedsUnavailable
    );

    house.realized_release(amount)?;

    move_lamports(
        &ctx.accounts.vault.to_account_info(),
        &ctx.accounts.payout_destination.to_account_info(),
        amount,
    )?;

    emit!(ProceedsWithdrawn {
        amount,
        realized_total: house.realized_proceeds,
    });
    msg!("Realized proceeds withdrawn: {}", amount);

    Ok(())
}
