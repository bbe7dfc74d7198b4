use anchor_lang::prelude::*;

use crate::constants::{
    DECAY_MAX_FP, DECAY_MIN_FP, SECONDS_PER_DAY,
};

// =============================================================================
// CURATION STATE
// =============================================================================
//
// Seeds are community-submitted content proposals. Holders of external
// tokens (attested through a published ownership commitment) endorse them
// with rate-limited blessings; a decay-weighted, sub-linear score ranks the
// seeds, and each voting period one winner is handed to the external
// minting collaborator.
// =============================================================================

/// Deterministic rule applied when several seeds share the maximum score.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum TieBreakPolicy {
    LowestSeedId,
    EarliestSubmission,
    /// Derived from the clock slot. Weak: validators influence the slot at
    /// which the selection lands, so ties can be steered. Kept as an
    /// explicit opt-in, never the default.
    SlotDerived,
}

/// What `select_winner` does when no candidate scores above zero.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum DeadlockPolicy {
    /// Reject the call; the round blocks until some blessing lands.
    FailClosed,
    /// Advance the period with no winner. Does not by itself create new
    /// eligible content; the skip event is the orchestrator's signal to
    /// inject some.
    SkipRound,
}

/// Which seeds are candidates at selection time.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum ScopeMode {
    CurrentRound,
    AllOutstanding,
}

#[account]
pub struct CurationConfig {
    pub authority: Pubkey,
    /// Global relayer allowed to submit blessings on behalf of any holder.
    pub relayer: Pubkey,

    // === Trust anchor for gating proofs ===
    /// Root of the external token-ownership snapshot. All-zero means
    /// uninitialized; blessings are rejected until the first publication.
    pub ownership_root: [u8; 32],
    pub root_published_at: i64,

    pub seed_count: u64,

    // === Round state ===
    pub current_round: u64,
    pub period_start: i64,
    pub period_duration: i64,

    // === Endorsement economics ===
    /// Blessings allowed per claimed token id per day.
    pub quota_per_id: u16,
    /// Lamports charged per blessing, accrued to realized proceeds.
    pub bless_cost: u64,

    pub tie_break: TieBreakPolicy,
    pub deadlock: DeadlockPolicy,
    pub scope: ScopeMode,

    pub bump: u8,
}

impl CurationConfig {
    pub const SIZE: usize = 8 +  // discriminator
        32 +                     // authority
        32 +                     // relayer
        32 +                     // ownership_root
        8 +                      // root_published_at
        8 +                      // seed_count
        8 +                      // current_round
        8 +                      // period_start
        8 +                      // period_duration
        2 +                      // quota_per_id
        8 +                      // bless_cost
        1 +                      // tie_break
        1 +                      // deadlock
        1 +                      // scope
        1;                       // bump

    pub fn commitment_is_set(&self) -> bool {
        self.ownership_root != [0u8; 32]
    }

    pub fn period_end(&self) -> i64 {
        self.period_start.saturating_add(self.period_duration)
    }

    pub fn period_elapsed(&self, now: i64) -> bool {
        now >= self.period_end()
    }

    /// Decay weight at `now` within the current period.
    pub fn decay_fp(&self, now: i64) -> u64 {
        decay_fp(now.saturating_sub(self.period_start), self.period_duration)
    }
}

/// Seed lifecycle. Retraction and winning are distinct terminal states, so
/// a retracted seed can never be confused with a past winner.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum SeedStatus {
    Open,
    Retracted,
    Won,
}

#[account]
pub struct Seed {
    pub id: u64,
    pub creator: Pubkey,
    /// Opaque content-addressed reference; never interpreted here.
    pub content_ref: [u8; 32],
    /// Monotonic while the seed is open.
    pub blessing_count: u64,
    /// Cached fixed-point score as of the latest blessing.
    pub score: u64,
    pub created_at: i64,
    pub submitted_round: u64,
    pub status: SeedStatus,
    pub winning_round: Option<u64>,
    pub bump: u8,
}

impl Seed {
    pub const SIZE: usize = 8 +  // discriminator
        8 +                      // id
        32 +                     // creator
        32 +                     // content_ref
        8 +                      // blessing_count
        8 +                      // score
        8 +                      // created_at
        8 +                      // submitted_round
        1 +                      // status
        9 +                      // winning_round
        1;                       // bump
}

// =============================================================================
// BLESSING RECORD
// =============================================================================
// Append-only; one account per blessing, addressable by (seed, index).
// Quotas are enforced by the day-bucketed counter below, not by the record.
// =============================================================================

#[account]
pub struct BlessingRecord {
    pub seed: Pubkey,
    pub index: u64,
    /// Token holder whose ownership gated this blessing.
    pub endorser: Pubkey,
    /// Transaction submitter; differs from the endorser on delegated paths.
    pub acting: Pubkey,
    pub weight: u32,
    pub timestamp: i64,
    pub delegated: bool,
    pub bump: u8,
}

impl BlessingRecord {
    pub const SIZE: usize = 8 + 32 + 8 + 32 + 32 + 4 + 8 + 1 + 1;
}

/// Per-endorser daily usage. The bucket rolls forward lazily: a blessing on
/// a later day resets the counter before charging it.
#[account]
pub struct BlessingQuota {
    pub endorser: Pubkey,
    pub epoch_day: u64,
    pub used: u32,
    pub bump: u8,
}

impl BlessingQuota {
    pub const SIZE: usize = 8 + 32 + 8 + 4 + 1;

    /// Charge one blessing against `allowance` for `day`. Returns the new
    /// usage count, or None when the quota is exhausted.
    pub fn charge(&mut self, day: u64, allowance: u32) -> Option<u32> {
        if self.epoch_day != day {
            self.epoch_day = day;
            self.used = 0;
        }
        if self.used >= allowance {
            return None;
        }
        self.used += 1;
        Some(self.used)
    }
}

#[account]
pub struct DelegateApproval {
    pub owner: Pubkey,
    pub delegate: Pubkey,
    pub approved: bool,
    pub bump: u8,
}

impl DelegateApproval {
    pub const SIZE: usize = 8 + 32 + 32 + 1 + 1;
}

/// Authority-granted capability to submit seeds.
#[account]
pub struct CreatorCapability {
    pub wallet: Pubkey,
    pub granted_by: Pubkey,
    pub granted_at: i64,
    pub revoked: bool,
    pub bump: u8,
}

impl CreatorCapability {
    pub const SIZE: usize = 8 + 32 + 32 + 8 + 1 + 1;
}

// =============================================================================
// SCORING
// =============================================================================
// score(b, t) = isqrt(b) * decay_fp(t), kept in DECAY_PRECISION fixed-point.
// The product is never divided back down: with decay_fp >= DECAY_MIN_FP > 0,
// a single blessing always keeps a seed strictly above zero.
// =============================================================================

/// Integer square root (floor).
pub fn isqrt(n: u64) -> u64 {
    if n < 2 {
        return n;
    }
    let n = n as u128;
    let mut x = n;
    let mut y = (x + 1) / 2;
    while y < x {
        x = y;
        y = (x + n / x) / 2;
    }
    x as u64
}

/// Linear decay from DECAY_MAX_FP at period start to DECAY_MIN_FP at period
/// end, clamped outside the period.
pub fn decay_fp(elapsed: i64, duration: i64) -> u64 {
    if duration <= 0 || elapsed >= duration {
        return DECAY_MIN_FP;
    }
    if elapsed <= 0 {
        return DECAY_MAX_FP;
    }
    let span = DECAY_MAX_FP - DECAY_MIN_FP;
    let falloff = (span as u128) * (elapsed as u128) / (duration as u128);
    DECAY_MAX_FP - falloff as u64
}

/// Decay-weighted, sub-linear seed score in fixed-point units.
pub fn seed_score(blessing_count: u64, decay: u64) -> u64 {
    let product = (isqrt(blessing_count) as u128) * (decay as u128);
    u64::try_from(product).unwrap_or(u64::MAX)
}

pub fn epoch_day(now: i64) -> u64 {
    (now / SECONDS_PER_DAY).max(0) as u64
}

pub fn quota_allowance(weight: u32, quota_per_id: u16) -> u32 {
    weight.saturating_mul(quota_per_id as u32)
}

// =============================================================================
// WINNER SELECTION
// =============================================================================

pub struct Candidate {
    /// Position in the caller-supplied account list.
    pub index: usize,
    pub seed_id: u64,
    pub created_at: i64,
    pub score: u64,
}

/// Pick the maximum-score candidate, breaking ties with `policy`.
/// `entropy` only matters for the slot-derived policy.
pub fn pick_winner(
    candidates: &[Candidate],
    policy: TieBreakPolicy,
    entropy: u64,
) -> Option<&Candidate> {
    let best_score = candidates.iter().map(|c| c.score).max()?;
    let mut ties: Vec<&Candidate> = candidates
        .iter()
        .filter(|c| c.score == best_score)
        .collect();
    match policy {
        TieBreakPolicy::LowestSeedId => {
            ties.sort_by_key(|c| c.seed_id);
            ties.first().copied()
        }
        TieBreakPolicy::EarliestSubmission => {
            ties.sort_by_key(|c| (c.created_at, c.seed_id));
            ties.first().copied()
        }
        TieBreakPolicy::SlotDerived => {
            // Weak randomness; see TieBreakPolicy docs.
            ties.sort_by_key(|c| c.seed_id);
            let pick = (entropy as usize) % ties.len();
            ties.get(pick).copied()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DECAY_PRECISION;

    #[test]
    fn isqrt_basics() {
        assert_eq!(isqrt(0), 0);
        assert_eq!(isqrt(1), 1);
        assert_eq!(isqrt(2), 1);
        assert_eq!(isqrt(3), 1);
        assert_eq!(isqrt(4), 2);
        assert_eq!(isqrt(99), 9);
        assert_eq!(isqrt(100), 10);
        assert_eq!(isqrt(u64::MAX), 4_294_967_295);
    }

    #[test]
    fn decay_interpolates_between_bounds() {
        let d = 10_000i64;
        assert_eq!(decay_fp(0, d), DECAY_MAX_FP);
        assert_eq!(decay_fp(d, d), DECAY_MIN_FP);
        assert_eq!(decay_fp(d / 2, d), DECAY_MAX_FP - (DECAY_MAX_FP - DECAY_MIN_FP) / 2);
        // clamps outside the period
        assert_eq!(decay_fp(-5, d), DECAY_MAX_FP);
        assert_eq!(decay_fp(d + 5, d), DECAY_MIN_FP);
    }

    #[test]
    fn zero_blessings_zero_score() {
        for decay in DECAY_MIN_FP..=DECAY_MAX_FP {
            assert_eq!(seed_score(0, decay), 0);
        }
    }

    #[test]
    fn blessed_seed_never_scores_zero() {
        // Regression: an earlier rendition divided the decayed square root
        // back down by the precision, truncating small counts to zero at
        // low decay. The score must stay positive for every decay in range.
        for decay in DECAY_MIN_FP..=DECAY_MAX_FP {
            for count in [1u64, 2, 3, 10, 1_000] {
                assert!(
                    seed_score(count, decay) > 0,
                    "score collapsed to zero at count={count} decay={decay}"
                );
            }
        }
    }

    #[test]
    fn score_is_sublinear_in_count() {
        let decay = DECAY_MAX_FP;
        assert_eq!(seed_score(1, decay), DECAY_PRECISION);
        assert_eq!(seed_score(4, decay), 2 * DECAY_PRECISION);
        assert_eq!(seed_score(100, decay), 10 * DECAY_PRECISION);
    }

    #[test]
    fn two_endorsers_scenario() {
        // two holders each bless once; the count of 2 must stay strictly
        // positive at minimum decay
        let count = 2u64;
        assert!(seed_score(count, DECAY_MIN_FP) > 0);
        assert_eq!(seed_score(count, DECAY_MIN_FP), DECAY_MIN_FP);
    }

    #[test]
    fn quota_charge_enforces_weight_times_allowance() {
        let mut quota = BlessingQuota {
            endorser: Pubkey::new_unique(),
            epoch_day: 10,
            used: 0,
            bump: 255,
        };
        let allowance = quota_allowance(3, 2); // 3 ids, 2 per id
        assert_eq!(allowance, 6);
        for i in 1..=6 {
            assert_eq!(quota.charge(10, allowance), Some(i));
        }
        // the seventh attempt that day is refused
        assert_eq!(quota.charge(10, allowance), None);
        // next day the bucket rolls over
        assert_eq!(quota.charge(11, allowance), Some(1));
    }

    #[test]
    fn epoch_day_buckets() {
        assert_eq!(epoch_day(0), 0);
        assert_eq!(epoch_day(SECONDS_PER_DAY - 1), 0);
        assert_eq!(epoch_day(SECONDS_PER_DAY), 1);
        assert_eq!(epoch_day(-5), 0);
    }

    fn candidate(index: usize, seed_id: u64, created_at: i64, score: u64) -> Candidate {
        Candidate { index, seed_id, created_at, score }
    }

    #[test]
    fn pick_winner_prefers_max_score() {
        let cands = vec![
            candidate(0, 7, 100, 5_000),
            candidate(1, 3, 50, 9_000),
            candidate(2, 9, 10, 1_000),
        ];
        let w = pick_winner(&cands, TieBreakPolicy::LowestSeedId, 0).unwrap();
        assert_eq!(w.seed_id, 3);
    }

    #[test]
    fn tie_break_lowest_id() {
        let cands = vec![
            candidate(0, 7, 100, 5_000),
            candidate(1, 3, 200, 5_000),
        ];
        let w = pick_winner(&cands, TieBreakPolicy::LowestSeedId, 0).unwrap();
        assert_eq!(w.seed_id, 3);
    }

    #[test]
    fn tie_break_earliest_submission() {
        let cands = vec![
            candidate(0, 3, 200, 5_000),
            candidate(1, 7, 100, 5_000),
        ];
        let w = pick_winner(&cands, TieBreakPolicy::EarliestSubmission, 0).unwrap();
        assert_eq!(w.seed_id, 7);
    }

    #[test]
    fn tie_break_slot_derived_is_deterministic_per_entropy() {
        let cands = vec![
            candidate(0, 3, 200, 5_000),
            candidate(1, 7, 100, 5_000),
        ];
        let a = pick_winner(&cands, TieBreakPolicy::SlotDerived, 4).unwrap();
        let b = pick_winner(&cands, TieBreakPolicy::SlotDerived, 4).unwrap();
        assert_eq!(a.seed_id, b.seed_id);
        let c = pick_winner(&cands, TieBreakPolicy::SlotDerived, 5).unwrap();
        assert_ne!(a.seed_id, c.seed_id);
    }

    #[test]
    fn pick_winner_empty_is_none() {
        assert!(pick_winner(&[], TieBreakPolicy::LowestSeedId, 0).is_none());
    }
}
