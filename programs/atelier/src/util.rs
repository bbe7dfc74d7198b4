//! Account plumbing shared by the batch paths.

use anchor_lang::prelude::*;
use anchor_lang::solana_program::program::{invoke, invoke_signed};
use anchor_lang::solana_program::system_instruction;
use anchor_lang::system_program;

use crate::errors::AtelierError;

/// Move lamports between accounts the program already holds writable.
/// Used for all outbound payments: no recipient code runs, so a push can
/// only "fail" by the target account being absent from the transaction.
pub fn move_lamports<'info>(
    from: &AccountInfo<'info>,
    to: &AccountInfo<'info>,
    amount: u64,
) -> Result<()> {
    {
        let mut from_lamports = from.try_borrow_mut_lamports()?;
        **from_lamports = (**from_lamports)
            .checked_sub(amount)
            .ok_or(AtelierError::MathOverflow)?;
    }
    {
        let mut to_lamports = to.try_borrow_mut_lamports()?;
        **to_lamports = (**to_lamports)
            .checked_add(amount)
            .ok_or(AtelierError::MathOverflow)?;
    }
    Ok(())
}

/// Create a program-owned PDA account outside the account-macro path (the
/// batch instructions receive their per-item accounts through
/// `remaining_accounts`). Handles the pre-funded-address case the same way
/// the framework does: top up, allocate, assign.
pub fn create_pda_account<'info>(
    payer: &AccountInfo<'info>,
    new_account: &AccountInfo<'info>,
    system_program: &AccountInfo<'info>,
    space: usize,
    signer_seeds: &[&[u8]],
) -> Result<()> {
    let rent = Rent::get()?;
    let required = rent.minimum_balance(space);

    if new_account.lamports() == 0 {
        invoke_signed(
            &system_instruction::create_account(
                payer.key,
                new_account.key,
                required,
                space as u64,
                &crate::ID,
            ),
            &[payer.clone(), new_account.clone(), system_program.clone()],
            &[signer_seeds],
        )?;
    } else {
        let shortfall = required.saturating_sub(new_account.lamports());
        if shortfall > 0 {
            invoke(
                &system_instruction::transfer(payer.key, new_account.key, shortfall),
                &[payer.clone(), new_account.clone(), system_program.clone()],
            )?;
        }
        invoke_signed(
            &system_instruction::allocate(new_account.key, space as u64),
            &[new_account.clone(), system_program.clone()],
            &[signer_seeds],
        )?;
        invoke_signed(
            &system_instruction::assign(new_account.key, &crate::ID),
            &[new_account.clone(), system_program.clone()],
            &[signer_seeds],
        )?;
    }
    Ok(())
}

/// Serialize an account value (discriminator included) into an existing
/// program-owned account.
pub fn write_account<'info, T: AccountSerialize>(
    value: &T,
    info: &AccountInfo<'info>,
) -> Result<()> {
    let mut data = info.try_borrow_mut_data()?;
    value.try_serialize(&mut &mut data[..])?;
    Ok(())
}

/// Close a program-owned account outside the account-macro path, returning
/// its rent to `destination`.
pub fn close_pda_account<'info>(
    info: &AccountInfo<'info>,
    destination: &AccountInfo<'info>,
) -> Result<()> {
    let amount = info.lamports();
    move_lamports(info, destination, amount)?;
    info.assign(&system_program::ID);
    info.realloc(0, false)?;
    Ok(())
}
