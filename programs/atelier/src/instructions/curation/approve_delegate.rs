use anchor_lang::prelude::*;

use crate::constants::DELEGATE_SEED;
use crate::events::DelegateApprovalSet;
use crate::state::DelegateApproval;

#[derive(Accounts)]
pub struct ApproveDelegate<'info> {
    #[account(mut)]
    pub owner: Signer<'info>,

    /// CHECK: the delegate being approved; any address
    pub delegate: UncheckedAccount<'info>,

    #[account(
        init_if_needed,
        payer = owner,
        space = DelegateApproval::SIZE,
        seeds = [DELEGATE_SEED, owner.key().as_ref(), delegate.key().as_ref()],
        bump
    )]
    pub approval: Account<'info, DelegateApproval>,

    pub system_program: Program<'info, System>,
}

/// Grant or withdraw permission for `delegate` to submit blessings on the
/// owner's behalf.
pub fn handler(ctx: Context<ApproveDelegate>, approved: bool) -> Result<()> {
    let approval = &mut ctx.accounts.approval;
    approval.owner = ctx.accounts.owner.key();
    approval.delegate = ctx.accounts.delegate.key();
    approval.approved = approved;
    approval.bump = ctx.bumps.approval;

    emit!(DelegateApprovalSet {
        owner: approval.owner,
        delegate: approval.delegate,
        approved,
    });
    msg!(
        "Delegate {} {} for {}",
        approval.delegate,
        if approved { "approved" } else { "revoked" },
        approval.owner
    );

    Ok(())
}
