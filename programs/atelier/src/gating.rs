//! Ownership-gating proofs.
//!
//! An off-chain job periodically snapshots external token ownership into a
//! merkle commitment whose root is published through the curation config.
//! A caller proves control of a claimed id set by presenting the inclusion
//! proof for `keccak(account || ids)`. The proof grants no exclusivity:
//! the caller chooses which ids to present, and voting weight is simply
//! the count presented.

use anchor_lang::prelude::*;
use anchor_lang::solana_program::keccak;

/// Leaf commitment binding an account to the exact claimed id set.
pub fn leaf_hash(account: &Pubkey, claimed_ids: &[u64]) -> [u8; 32] {
    let mut bytes = Vec::with_capacity(32 + claimed_ids.len() * 8);
    bytes.extend_from_slice(account.as_ref());
    for id in claimed_ids {
        bytes.extend_from_slice(&id.to_le_bytes());
    }
    keccak::hashv(&[&bytes]).0
}

/// Sorted-pair merkle walk. Pair ordering is canonicalized so proofs carry
/// no left/right flags.
pub fn verify_inclusion(root: &[u8; 32], leaf: [u8; 32], proof: &[[u8; 32]]) -> bool {
    let mut node = leaf;
    for sibling in proof {
        node = if node <= *sibling {
            keccak::hashv(&[node.as_ref(), sibling.as_ref()]).0
        } else {
            keccak::hashv(&[sibling.as_ref(), node.as_ref()]).0
        };
    }
    node == *root
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(a: [u8; 32], b: [u8; 32]) -> [u8; 32] {
        if a <= b {
            keccak::hashv(&[a.as_ref(), b.as_ref()]).0
        } else {
            keccak::hashv(&[b.as_ref(), a.as_ref()]).0
        }
    }

    #[test]
    fn single_leaf_tree() {
        let account = Pubkey::new_unique();
        let leaf = leaf_hash(&account, &[1, 2, 3]);
        assert!(verify_inclusion(&leaf, leaf, &[]));
    }

    #[test]
    fn two_leaf_tree() {
        let alice = Pubkey::new_unique();
        let bob = Pubkey::new_unique();
        let a = leaf_hash(&alice, &[1, 2, 3]);
        let b = leaf_hash(&bob, &[4, 5, 6]);
        let root = pair(a, b);

        assert!(verify_inclusion(&root, a, &[b]));
        assert!(verify_inclusion(&root, b, &[a]));
        // proof for the wrong account fails
        assert!(!verify_inclusion(&root, leaf_hash(&alice, &[4, 5, 6]), &[a]));
    }

    #[test]
    fn four_leaf_tree() {
        let keys: Vec<Pubkey> = (0..4).map(|_| Pubkey::new_unique()).collect();
        let leaves: Vec<[u8; 32]> = keys
            .iter()
            .enumerate()
            .map(|(i, k)| leaf_hash(k, &[i as u64]))
            .collect();
        let left = pair(leaves[0], leaves[1]);
        let right = pair(leaves[2], leaves[3]);
        let root = pair(left, right);

        assert!(verify_inclusion(&root, leaves[0], &[leaves[1], right]));
        assert!(verify_inclusion(&root, leaves[3], &[leaves[2], left]));
        // truncated proof fails
        assert!(!verify_inclusion(&root, leaves[0], &[leaves[1]]));
        // reordered proof fails
        assert!(!verify_inclusion(&root, leaves[0], &[right, leaves[1]]));
    }

    #[test]
    fn leaf_binds_the_exact_id_set() {
        let account = Pubkey::new_unique();
        assert_ne!(leaf_hash(&account, &[1, 2]), leaf_hash(&account, &[2, 1]));
        assert_ne!(leaf_hash(&account, &[1]), leaf_hash(&account, &[1, 1]));
    }
}
