use anchor_lang::prelude::*;

use crate::constants::{BPS_DENOMINATOR, MAX_EXTENSIONS, MIN_RAISE_BPS};
use crate::errors::AtelierError;

// =============================================================================
// AUCTION HOUSE
// =============================================================================
//
// Process-wide singleton for the auction engine. Tracks the three disjoint
// currency pools backing the vault:
//
//   escrowed_active_bids     sum of highest_bid over all unsettled auctions
//   total_pending_withdrawals  sum of per-user pull-ledger balances
//   realized_proceeds        completed-sale funds, operator-withdrawable
//
// Invariant, checked wherever the vault is debited:
//
//   vault balance - rent floor >= escrowed + pending + realized
//
// Any surplus above the pools is unattributed dust, reachable only through
// the paused-state sweep.
// =============================================================================

#[account]
pub struct AuctionHouse {
    /// Operator of the auction engine.
    pub authority: Pubkey,
    /// Destination for proceeds pushes, sweeps and redirected recoveries.
    pub payout_address: Pubkey,
    /// Gate for the recovery operations; blocks normal operations while set.
    pub paused: bool,
    /// Monotonic id source for auctions.
    pub auction_count: u64,

    // === Currency pools ===
    pub escrowed_active_bids: u64,
    pub total_pending_withdrawals: u64,
    pub realized_proceeds: u64,

    // === Anti-snipe configuration ===
    /// Remaining time below this triggers an extension.
    pub extension_window: i64,
    /// A triggered extension moves the end to now + this.
    pub extension_duration: i64,

    pub vault_bump: u8,
    pub custody_bump: u8,
    pub bump: u8,
}

impl AuctionHouse {
    pub const SIZE: usize = 8 +  // discriminator
        32 +                     // authority
        32 +                     // payout_address
        1 +                      // paused
        8 +                      // auction_count
        8 +                      // escrowed_active_bids
        8 +                      // total_pending_withdrawals
        8 +                      // realized_proceeds
        8 +                      // extension_window
        8 +                      // extension_duration
        1 +                      // vault_bump
        1 +                      // custody_bump
        1;                       // bump

    /// Sum of the three pools.
    pub fn accounted(&self) -> Result<u64> {
        self.escrowed_active_bids
            .checked_add(self.total_pending_withdrawals)
            .and_then(|s| s.checked_add(self.realized_proceeds))
            .ok_or_else(|| error!(AtelierError::MathOverflow))
    }

    /// Vault balance not attributed to any pool. Errors if the balance
    /// invariant is broken.
    pub fn surplus(&self, vault_lamports: u64, rent_floor: u64) -> Result<u64> {
        vault_lamports
            .checked_sub(rent_floor)
            .and_then(|b| b.checked_sub(self.accounted().ok()?))
            .ok_or_else(|| error!(AtelierError::MathOverflow))
    }

    pub fn escrow_add(&mut self, amount: u64) -> Result<()> {
        self.escrowed_active_bids = self
            .escrowed_active_bids
            .checked_add(amount)
            .ok_or(AtelierError::MathOverflow)?;
        Ok(())
    }

    pub fn escrow_release(&mut self, amount: u64) -> Result<()> {
        self.escrowed_active_bids = self
            .escrowed_active_bids
            .checked_sub(amount)
            .ok_or(AtelierError::MathOverflow)?;
        Ok(())
    }

    pub fn pending_add(&mut self, amount: u64) -> Result<()> {
        self.total_pending_withdrawals = self
            .total_pending_withdrawals
            .checked_add(amount)
            .ok_or(AtelierError::MathOverflow)?;
        Ok(())
    }

    pub fn pending_release(&mut self, amount: u64) -> Result<()> {
        self.total_pending_withdrawals = self
            .total_pending_withdrawals
            .checked_sub(amount)
            .ok_or(AtelierError::MathOverflow)?;
        Ok(())
    }

    pub fn realized_add(&mut self, amount: u64) -> Result<()> {
        self.realized_proceeds = self
            .realized_proceeds
            .checked_add(amount)
            .ok_or(AtelierError::MathOverflow)?;
        Ok(())
    }

    pub fn realized_release(&mut self, amount: u64) -> Result<()> {
        self.realized_proceeds = self
            .realized_proceeds
            .checked_sub(amount)
            .ok_or(AtelierError::MathOverflow)?;
        Ok(())
    }
}

// =============================================================================
// VAULT
// =============================================================================
// Program-owned lamport store backing all three pools. Credited through
// system-program transfers, debited through direct lamport arithmetic.
// =============================================================================

#[account]
pub struct Vault {
    pub bump: u8,
}

impl Vault {
    pub const SIZE: usize = 8 + 1;
}

// =============================================================================
// AUCTION
// =============================================================================

#[account]
pub struct Auction {
    pub id: u64,
    /// Mint of the collectible being sold.
    pub item_mint: Pubkey,
    /// Token account holding the item under the custody authority.
    pub item_vault: Pubkey,
    pub start_time: i64,
    /// Non-decreasing; moved forward only by anti-snipe extensions.
    pub end_time: i64,
    pub min_bid: u64,
    pub highest_bidder: Option<Pubkey>,
    /// Non-decreasing over the auction's lifetime.
    pub highest_bid: u64,
    pub extension_count: u8,
    pub bid_count: u64,
    /// One-way latch; set by settlement, cancellation or force-settlement.
    pub settled: bool,
    pub created_at: i64,
    pub bump: u8,
}

impl Auction {
    pub const SIZE: usize = 8 +  // discriminator
        8 +                      // id
        32 +                     // item_mint
        32 +                     // item_vault
        8 +                      // start_time
        8 +                      // end_time
        8 +                      // min_bid
        33 +                     // highest_bidder
        8 +                      // highest_bid
        1 +                      // extension_count
        8 +                      // bid_count
        1 +                      // settled
        8 +                      // created_at
        1;                       // bump

    pub fn is_ended(&self, now: i64) -> bool {
        now >= self.end_time
    }

    /// Smallest amount the next bid must reach. The first bid only has to
    /// meet the reserve; raises must clear the standing bid by 5% (and by
    /// at least one unit, so a tiny standing bid cannot be matched).
    pub fn min_acceptable_bid(&self) -> u64 {
        match self.highest_bidder {
            None => self.min_bid.max(1),
            Some(_) => required_raise(self.highest_bid),
        }
    }

    /// New end time if this bid lands inside the extension window, with the
    /// extension count still under its cap. The returned end never moves
    /// backwards.
    pub fn extension(&self, now: i64, window: i64, duration: i64) -> Option<i64> {
        if self.extension_count >= MAX_EXTENSIONS {
            return None;
        }
        if self.end_time.saturating_sub(now) < window {
            Some(self.end_time.max(now.saturating_add(duration)))
        } else {
            None
        }
    }
}

/// Minimum amount that displaces a standing bid of `old`.
pub fn required_raise(old: u64) -> u64 {
    let scaled = (old as u128) * ((BPS_DENOMINATOR + MIN_RAISE_BPS) as u128)
        / (BPS_DENOMINATOR as u128);
    (scaled as u64).max(old.saturating_add(1))
}

// =============================================================================
// ITEM LISTING
// =============================================================================
// Existence marker: at most one live auction per item. Closed when the
// auction settles or is cancelled, freeing the item for relisting.
// =============================================================================

#[account]
pub struct ItemListing {
    pub item_mint: Pubkey,
    pub auction: Pubkey,
    pub bump: u8,
}

impl ItemListing {
    pub const SIZE: usize = 8 + 32 + 32 + 1;
}

// =============================================================================
// BID RECORD
// =============================================================================
// Append-only audit trail, one account per bid, addressable by
// (auction, index). Never mutated after creation.
// =============================================================================

#[account]
pub struct BidRecord {
    pub auction: Pubkey,
    pub index: u64,
    pub bidder: Pubkey,
    pub amount: u64,
    pub timestamp: i64,
    pub bump: u8,
}

impl BidRecord {
    pub const SIZE: usize = 8 + 32 + 8 + 32 + 8 + 8 + 1;
}

// =============================================================================
// PENDING WITHDRAWAL
// =============================================================================
// Pull-ledger entry owed to a user after a payment could not be pushed.
// Mutated only by the credit paths, `withdraw`, and the paused-state
// recovery operations.
// =============================================================================

#[account]
pub struct PendingWithdrawal {
    pub user: Pubkey,
    pub amount: u64,
    pub bump: u8,
}

impl PendingWithdrawal {
    pub const SIZE: usize = 8 + 32 + 8 + 1;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh_auction(min_bid: u64) -> Auction {
        Auction {
            id: 0,
            item_mint: Pubkey::new_unique(),
            item_vault: Pubkey::new_unique(),
            start_time: 0,
            end_time: 3_600,
            min_bid,
            highest_bidder: None,
            highest_bid: 0,
            extension_count: 0,
            bid_count: 0,
            settled: false,
            created_at: 0,
            bump: 255,
        }
    }

    fn house() -> AuctionHouse {
        AuctionHouse {
            authority: Pubkey::new_unique(),
            payout_address: Pubkey::new_unique(),
            paused: false,
            auction_count: 0,
            escrowed_active_bids: 0,
            total_pending_withdrawals: 0,
            realized_proceeds: 0,
            extension_window: 300,
            extension_duration: 300,
            vault_bump: 255,
            custody_bump: 255,
            bump: 255,
        }
    }

    #[test]
    fn first_bid_meets_reserve_exactly() {
        let auction = fresh_auction(100);
        assert_eq!(auction.min_acceptable_bid(), 100);
    }

    #[test]
    fn zero_reserve_still_rejects_zero_bids() {
        let auction = fresh_auction(0);
        assert_eq!(auction.min_acceptable_bid(), 1);
    }

    #[test]
    fn raise_threshold_is_five_percent() {
        // a 100 bid stands; 104 is a 4% raise and fails, 105 clears
        let mut auction = fresh_auction(0);
        auction.highest_bidder = Some(Pubkey::new_unique());
        auction.highest_bid = 100;
        assert_eq!(auction.min_acceptable_bid(), 105);
        assert!(104 < auction.min_acceptable_bid());
        assert!(105 >= auction.min_acceptable_bid());
    }

    #[test]
    fn raise_on_tiny_bid_still_strictly_increases() {
        // 5% of 10 floors to 10; the one-unit rule keeps the raise strict
        assert_eq!(required_raise(10), 11);
        assert_eq!(required_raise(0), 1);
        assert_eq!(required_raise(1_000), 1_050);
    }

    #[test]
    fn extension_fires_only_inside_window() {
        let auction = fresh_auction(0);
        // end 3600, window 300: a bid at 3590 moves the end to 3890
        assert_eq!(auction.extension(3_590, 300, 300), Some(3_890));
        // well before the window: no extension
        assert_eq!(auction.extension(3_000, 300, 300), None);
        // boundary: exactly window remaining does not trigger
        assert_eq!(auction.extension(3_300, 300, 300), None);
    }

    #[test]
    fn extension_never_moves_end_backwards() {
        let mut auction = fresh_auction(0);
        auction.end_time = 3_600;
        // a short duration inside the window must not shrink the auction
        assert_eq!(auction.extension(3_599, 300, 1), Some(3_600));
    }

    #[test]
    fn extension_stops_at_cap() {
        let mut auction = fresh_auction(0);
        auction.extension_count = MAX_EXTENSIONS;
        assert_eq!(auction.extension(3_590, 300, 300), None);
    }

    #[test]
    fn pools_sum_and_surplus() {
        let mut h = house();
        h.escrow_add(500).unwrap();
        h.pending_add(200).unwrap();
        h.realized_add(50).unwrap();
        assert_eq!(h.accounted().unwrap(), 750);
        // vault holds pools + rent floor + 25 dust
        assert_eq!(h.surplus(750 + 100 + 25, 100).unwrap(), 25);
        // invariant breach surfaces as an error, not a silent wrap
        assert!(h.surplus(700, 100).is_err());
    }

    #[test]
    fn escrow_counts_each_standing_bid_once() {
        let mut h = house();
        // first bid escrows the full amount, a raise only the delta
        h.escrow_add(100).unwrap();
        h.escrow_add(105 - 100).unwrap();
        assert_eq!(h.escrowed_active_bids, 105);
        // settlement releases exactly the standing bid
        h.escrow_release(105).unwrap();
        assert_eq!(h.escrowed_active_bids, 0);
    }

    #[test]
    fn pool_underflow_is_rejected() {
        let mut h = house();
        assert!(h.escrow_release(1).is_err());
        assert!(h.pending_release(1).is_err());
        assert!(h.realized_release(1).is_err());
    }
}
