use anchor_lang::prelude::*;

use crate::constants::CURATION_CONFIG_SEED;
use crate::errors::AtelierError;
use crate::events::{RoundSkipped, WinnerSelected};
use crate::instructions::curation::submit_seed::CurationError;
use crate::state::{
    pick_winner, seed_score, Candidate, CurationConfig, DeadlockPolicy, ScopeMode, Seed,
    SeedStatus,
};
use crate::util::write_account;

// Period finalization. The off-chain orchestrator supplies the candidate
// seed accounts; filtering, scoring, tie-breaking and the deadlock policy
// run on-chain, so the orchestrator can at worst withhold candidates, never
// forge a score.
//
// remaining_accounts: the candidate seed accounts.

#[derive(Accounts)]
pub struct SelectWinner<'info> {
    pub caller: Signer<'info>,

    #[account(
        mut,
        seeds = [CURATION_CONFIG_SEED],
        bump = config.bump,
        constraint = caller.key() == config.authority || caller.key() == config.relayer
            @ AtelierError::Unauthorized,
    )]
    pub config: Account<'info, CurationConfig>,
}

pub fn handler<'info>(ctx: Context<'_, '_, 'info, 'info, SelectWinner<'info>>) -> Result<()> {
    let clock = Clock::get()?;
    let now = clock.unix_timestamp;
    let config = &mut ctx.accounts.config;

    require!(config.period_elapsed(now), CurationError::PeriodNotEnded);

    // Parse and filter the candidate set.
    let decay = config.decay_fp(now);
    let mut seeds: Vec<Seed> = Vec::with_capacity(ctx.remaining_accounts.len());
    let mut candidates: Vec<Candidate> = Vec::new();
    for (index, info) in ctx.remaining_accounts.iter().enumerate() {
        let seed = Account::<Seed>::try_from(info)
            .map_err(|_| error!(CurationError::InvalidCandidate))?
            .into_inner();

        let eligible = seed.status == SeedStatus::Open
            && match config.scope {
                ScopeMode::CurrentRound => seed.submitted_round == config.current_round,
                ScopeMode::AllOutstanding => true,
            };
        if eligible {
            candidates.push(Candidate {
                index,
                seed_id: seed.id,
                created_at: seed.created_at,
                score: seed_score(seed.blessing_count, decay),
            });
        }
        seeds.push(seed);
    }

    let entropy = clock.slot ^ now as u64;
    let best = pick_winner(&candidates, config.tie_break, entropy);

    let round = config.current_round;
    let Some(winner) = best.filter(|c| c.score > 0) else {
        return match config.deadlock {
            DeadlockPolicy::FailClosed => err!(CurationError::NoEligibleSeeds),
            DeadlockPolicy::SkipRound => {
                config.current_round += 1;
                config.period_start = now;
                emit!(RoundSkipped {
                    round,
                    next_round: config.current_round,
                    next_period_start: config.period_start,
                });
                msg!("Round {} skipped: no seed scored above zero", round);
                Ok(())
            }
        };
    };

    let winner_info = &ctx.remaining_accounts[winner.index];
    require!(winner_info.is_writable, CurationError::InvalidCandidate);

    let seed = &mut seeds[winner.index];
    seed.status = SeedStatus::Won;
    seed.winning_round = Some(round);
    write_account(&*seed, winner_info)?;

    config.current_round += 1;
    config.period_start = now;

    emit!(WinnerSelected {
        round,
        seed_id: seed.id,
        creator: seed.creator,
        content_ref: seed.content_ref,
        score: winner.score,
        blessing_count: seed.blessing_count,
        next_round: config.current_round,
        next_period_start: config.period_start,
    });
    msg!(
        "Round {} winner: seed #{} (score {}, {} blessings)",
        round,
        seed.id,
        winner.score,
        seed.blessing_count
    );

    Ok(())
}
