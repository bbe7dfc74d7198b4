use anchor_lang::prelude::*;

use crate::constants::{
    AUCTION_HOUSE_SEED, BLESSING_RECORD_SEED, BLESS_BATCH_ACCOUNTS_PER_ITEM,
    CURATION_CONFIG_SEED, MAX_BLESS_BATCH, QUOTA_SEED, VAULT_SEED,
};
use crate::errors::AtelierError;
use crate::events::{BlessSkipReason, BlessingSkipped, SeedBlessed};
use crate::instructions::curation::bless::{apply_blessing, charge_cost, BlessFailure};
use crate::instructions::curation::submit_seed::CurationError;
use crate::state::{AuctionHouse, BlessingQuota, BlessingRecord, CurationConfig, Seed, Vault};
use crate::util::{create_pda_account, write_account};

// Bulk relayer submission. Every item carries its own proof and is verified
// independently; a failing item is skipped and reported so the relayer
// keeps its partial progress. Quota accounts are created on the fly, paid
// by the relayer.
//
// remaining_accounts, per item:
//   [seed, quota, record (uninitialized)]

#[derive(AnchorSerialize, AnchorDeserialize)]
pub struct BlessItem {
    pub endorser: Pubkey,
    pub claimed_ids: Vec<u64>,
    pub proof: Vec<[u8; 32]>,
}

#[derive(Accounts)]
pub struct BatchBlessFor<'info> {
    #[account(mut)]
    pub acting: Signer<'info>,

    #[account(mut, seeds = [CURATION_CONFIG_SEED], bump = config.bump)]
    pub config: Account<'info, CurationConfig>,

    #[account(mut, seeds = [AUCTION_HOUSE_SEED], bump = house.bump)]
    pub house: Account<'info, AuctionHouse>,

    #[account(mut, seeds = [VAULT_SEED], bump = house.vault_bump)]
    pub vault: Account<'info, Vault>,

    pub system_program: Program<'info, System>,
}

pub fn handler<'info>(
    ctx: Context<'_, '_, 'info, 'info, BatchBlessFor<'info>>,
    items: Vec<BlessItem>,
) -> Result<()> {
    let clock = Clock::get()?;
    let now = clock.unix_timestamp;
    let config = &ctx.accounts.config;
    let acting = ctx.accounts.acting.key();

    require!(acting == config.relayer, CurationError::NotRelayer);
    require!(config.commitment_is_set(), CurationError::CommitmentNotSet);
    require!(!items.is_empty(), CurationError::MalformedBatch);
    require!(items.len() <= MAX_BLESS_BATCH, CurationError::BatchTooLarge);
    require!(
        ctx.remaining_accounts.len() == items.len() * BLESS_BATCH_ACCOUNTS_PER_ITEM,
        CurationError::MalformedBatch
    );

    let acting_info = ctx.accounts.acting.to_account_info();
    let system_info = ctx.accounts.system_program.to_account_info();

    let mut applied = 0u32;
    let mut skipped = 0u32;
    let mut total_cost = 0u64;

    for (i, (item, chunk)) in items
        .iter()
        .zip(ctx.remaining_accounts.chunks(BLESS_BATCH_ACCOUNTS_PER_ITEM))
        .enumerate()
    {
        let index = i as u32;
        let [seed_info, quota_info, record_info] = chunk else {
            return err!(CurationError::MalformedBatch);
        };

        let skip = |reason: BlessSkipReason| {
            emit!(BlessingSkipped {
                index,
                endorser: item.endorser,
                reason,
            });
        };

        // Per-item account validation.
        let Ok(seed_account) = Account::<Seed>::try_from(seed_info) else {
            skip(BlessSkipReason::Malformed);
            skipped += 1;
            continue;
        };
        let mut seed = seed_account.into_inner();
        if !seed_info.is_writable {
            skip(BlessSkipReason::Malformed);
            skipped += 1;
            continue;
        }

        let (quota_key, quota_bump) = Pubkey::find_program_address(
            &[QUOTA_SEED, item.endorser.as_ref()],
            &crate::ID,
        );
        let seed_key = seed_info.key();
        let index_bytes = seed.blessing_count.to_le_bytes();
        let (record_key, record_bump) = Pubkey::find_program_address(
            &[BLESSING_RECORD_SEED, seed_key.as_ref(), &index_bytes],
            &crate::ID,
        );
        if quota_info.key() != quota_key
            || record_info.key() != record_key
            || !quota_info.is_writable
            || !record_info.is_writable
            || !record_info.data_is_empty()
        {
            skip(BlessSkipReason::Malformed);
            skipped += 1;
            continue;
        }

        // Load or create the endorser's day-bucketed quota.
        let mut quota = if quota_info.data_is_empty() {
            create_pda_account(
                &acting_info,
                quota_info,
                &system_info,
                BlessingQuota::SIZE,
                &[QUOTA_SEED, item.endorser.as_ref(), &[quota_bump]],
            )?;
            BlessingQuota {
                endorser: item.endorser,
                epoch_day: 0,
                used: 0,
                bump: quota_bump,
            }
        } else {
            match Account::<BlessingQuota>::try_from(quota_info) {
                Ok(q) if q.endorser == item.endorser => q.into_inner(),
                _ => {
                    skip(BlessSkipReason::Malformed);
                    skipped += 1;
                    continue;
                }
            }
        };

        match apply_blessing(
            config,
            &mut seed,
            &mut quota,
            &item.endorser,
            &item.claimed_ids,
            &item.proof,
            now,
        ) {
            Ok(outcome) => {
                create_pda_account(
                    &acting_info,
                    record_info,
                    &system_info,
                    BlessingRecord::SIZE,
                    &[BLESSING_RECORD_SEED, seed_key.as_ref(), &index_bytes, &[record_bump]],
                )?;
                write_account(
                    &BlessingRecord {
                        seed: seed_key,
                        index: outcome.blessing_index,
                        endorser: item.endorser,
                        acting,
                        weight: outcome.weight,
                        timestamp: now,
                        delegated: true,
                        bump: record_bump,
                    },
                    record_info,
                )?;
                write_account(&seed, seed_info)?;
                write_account(&quota, quota_info)?;

                total_cost = total_cost
                    .checked_add(config.bless_cost)
                    .ok_or(AtelierError::MathOverflow)?;

                emit!(SeedBlessed {
                    seed_id: seed.id,
                    endorser: item.endorser,
                    acting,
                    weight: outcome.weight,
                    delegated: true,
                    blessing_count: seed.blessing_count,
                    score: outcome.score,
                    quota_used: outcome.quota_used,
                    quota_allowance: outcome.allowance,
                });
                applied += 1;
            }
            Err(failure) => {
                // A freshly created quota account stays behind with its
                // zeroed counter; that is just rent the relayer spent.
                write_account(&quota, quota_info)?;
                skip(match failure {
                    BlessFailure::SeedNotOpen => BlessSkipReason::SeedNotOpen,
                    BlessFailure::InvalidProof => BlessSkipReason::InvalidProof,
                    BlessFailure::QuotaExceeded => BlessSkipReason::QuotaExceeded,
                    BlessFailure::EmptyClaim => BlessSkipReason::EmptyClaim,
                    BlessFailure::ClaimTooLarge | BlessFailure::ProofTooDeep => {
                        BlessSkipReason::Malformed
                    }
                });
                skipped += 1;
            }
        }
    }

    if total_cost > 0 {
        charge_cost(
            total_cost,
            &acting_info,
            &ctx.accounts.vault.to_account_info(),
            &system_info,
            &mut ctx.accounts.house,
        )?;
    }

    msg!("Batch blessing: {} applied, {} skipped", applied, skipped);

    Ok(())
}
