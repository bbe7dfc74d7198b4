use anchor_lang::prelude::*;

use crate::constants::{AUCTION_HOUSE_SEED, PENDING_SEED, VAULT_SEED};
use crate::errors::AtelierError;
use crate::events::{AccountingCorrected, ExcessSwept, FundsWithdrawn, StuckFundsRecovered};
use crate::instructions::auction::create_auction::AuctionError;
use crate::state::{AuctionHouse, PendingWithdrawal, Vault};
use crate::util::move_lamports;

// Recovery operations for states the normal paths cannot reach: balance the
// ledgers cannot attribute, pending entries whose owner is unreachable, or
// pools knocked out of line by an operational incident. All of them require
// the paused state, so their blast radius stays bounded to an explicit
// maintenance window, and every one emits the data needed to audit it.

#[derive(Accounts)]
pub struct SweepExcess<'info> {
    pub authority: Signer<'info>,

    #[account(
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

/// Move vault balance unaccounted by the three pools to the payout address.
pub fn sweep_excess(ctx: Context<SweepExcess>) -> Result<()> {
    let house = &ctx.accounts.house;
    require!(house.paused, AtelierError::NotPaused);

    let rent_floor = Rent::get()?.minimum_balance(Vault::SIZE);
    let vault_info = ctx.accounts.vault.to_account_info();
    let excess = house.surplus(vault_info.lamports(), rent_floor)?;
    require!(excess > 0, AuctionError::NothingToSweep);

    move_lamports(
        &vault_info,
        &ctx.accounts.payout_destination.to_account_info(),
        excess,
    )?;

    emit!(ExcessSwept { amount: excess });
    msg!("Swept {} unattributed lamports", excess);

    Ok(())
}

#[derive(Accounts)]
#[instruction(user: Pubkey)]
pub struct RecoverStuckFunds<'info> {
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
        seeds = [PENDING_SEED, user.as_ref()],
        bump = pending.bump,
        constraint = pending.user == user @ AuctionError::NoPendingBalance,
    )]
    pub pending: Account<'info, PendingWithdrawal>,

    /// CHECK: the user's wallet, tried first
    #[account(mut)]
    pub user_wallet: Option<UncheckedAccount<'info>>,

    /// CHECK: fallback destination; must be the configured payout address
    #[account(
        mut,
        constraint = payout_destination.key() == house.payout_address
            @ AtelierError::InvalidPayoutAddress,
    )]
    pub payout_destination: UncheckedAccount<'info>,
}

/// Clear a pending entry whose owner cannot or will not withdraw. The user
/// is paid directly when their wallet is usable; otherwise the amount is
/// redirected to the payout address.
pub fn recover_stuck_funds(ctx: Context<RecoverStuckFunds>, user: Pubkey) -> Result<()> {
    let house = &mut ctx.accounts.house;
    require!(house.paused, AtelierError::NotPaused);

    let pending = &mut ctx.accounts.pending;
    let amount = pending.amount;
    require!(amount > 0, AuctionError::NoPendingBalance);

    pending.amount = 0;
    house.pending_release(amount)?;

    let user_target = ctx
        .accounts
        .user_wallet
        .as_ref()
        .filter(|info| info.key() == user && info.is_writable);
    let redirected = user_target.is_none();

    let destination = match user_target {
        Some(wallet) => wallet.to_account_info(),
        None => ctx.accounts.payout_destination.to_account_info(),
    };
    move_lamports(&ctx.accounts.vault.to_account_info(), &destination, amount)?;

    emit!(StuckFundsRecovered {
        user,
        amount,
        redirected_to_payout: redirected,
        pending_total: house.total_pending_withdrawals,
    });
    msg!(
        "Recovered {} stuck lamports for {} ({})",
        amount,
        user,
        if redirected { "redirected to payout" } else { "paid to user" }
    );

    Ok(())
}

#[derive(Accounts)]
#[instruction(user: Pubkey)]
pub struct OwnerWithdrawFor<'info> {
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
        seeds = [PENDING_SEED, user.as_ref()],
        bump = pending.bump,
        constraint = pending.user == user @ AuctionError::NoPendingBalance,
    )]
    pub pending: Account<'info, PendingWithdrawal>,

    /// CHECK: the owed user's wallet; the only destination this path allows
    #[account(mut, constraint = user_wallet.key() == user @ AtelierError::InvalidParameter)]
    pub user_wallet: UncheckedAccount<'info>,
}

/// Operator-triggered withdrawal on a user's behalf. Funds can only go to
/// the user themselves.
pub fn owner_withdraw_for(ctx: Context<OwnerWithdrawFor>, user: Pubkey) -> Result<()> {
    let house = &mut ctx.accounts.house;
    let pending = &mut ctx.accounts.pending;

    let amount = pending.amount;
    require!(amount > 0, AuctionError::NothingToWithdraw);

    pending.amount = 0;
    house.pending_release(amount)?;

    move_lamports(
        &ctx.accounts.vault.to_account_info(),
        &ctx.accounts.user_wallet.to_account_info(),
        amount,
    )?;

    emit!(FundsWithdrawn {
        user,
        amount,
        pending_total: house.total_pending_withdrawals,
        by_operator: true,
    });
    msg!("Operator withdrew {} for {}", amount, user);

    Ok(())
}

#[derive(Accounts)]
pub struct CorrectAccounting<'info> {
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [AUCTION_HOUSE_SEED],
        bump = house.bump,
        has_one = authority @ AtelierError::Unauthorized,
    )]
    pub house: Account<'info, AuctionHouse>,
}

/// Manual pool override for incident recovery. The event carries both
/// sides so the correction itself stays auditable.
pub fn correct_accounting(
    ctx: Context<CorrectAccounting>,
    escrowed: u64,
    pending: u64,
    realized: u64,
) -> Result<()> {
    let house = &mut ctx.accounts.house;
    require!(house.paused, AtelierError::NotPaused);

    let before = (
        house.escrowed_active_bids,
        house.total_pending_withdrawals,
        house.realized_proceeds,
    );
    house.escrowed_active_bids = escrowed;
    house.total_pending_withdrawals = pending;
    house.realized_proceeds = realized;
    house.accounted()?;

    emit!(AccountingCorrected {
        escrowed_before: before.0,
        pending_before: before.1,
        realized_before: before.2,
        escrowed_after: escrowed,
        pending_after: pending,
        realized_after: realized,
    });
    msg!(
        "Accounting corrected: escrowed {}->{}, pending {}->{}, realized {}->{}",
        before.0,
        escrowed,
        before.1,
        pending,
        before.2,
        realized
    );

    Ok(())
}
