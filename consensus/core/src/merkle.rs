use crate::tx::Transaction;
use genix_hashes::{Hash, Hasher, HasherBase, MerkleBranchHash, ZERO_HASH};

pub fn calc_hash_merkle_root<'a>(txs: impl ExactSizeIterator<Item = &'a Transaction>) -> Hash {
    calc_merkle_root(txs.map(|tx| tx.id()))
}

/// Bitcoin-style merkle root: odd levels pair their last node with itself.
///
/// A single leaf is its own root and an empty set yields the zero hash.
pub fn calc_merkle_root(hashes: impl ExactSizeIterator<Item = Hash>) -> Hash {
    let mut level: Vec<Hash> = hashes.collect();
    if level.is_empty() {
        return ZERO_HASH;
    }
    while level.len() > 1 {
        level = level
            .chunks(2)
            .map(|pair| {
                let right = pair.get(1).unwrap_or(&pair[0]);
                merkle_hash(pair[0], *right)
            })
            .collect();
    }
    level[0]
}

pub fn merkle_hash(left: Hash, right: Hash) -> Hash {
    let mut hasher = MerkleBranchHash::new();
    hasher.update(left).update(right);
    Hasher::finalize(hasher)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::iter;

    fn leaf(n: u8) -> Hash {
        Hash::from_bytes([n; 32])
    }

    #[test]
    fn test_empty_returns_zero_hash() {
        assert_eq!(calc_merkle_root(iter::empty()), ZERO_HASH);
    }

    #[test]
    fn test_single_leaf_is_root() {
        assert_eq!(calc_merkle_root(iter::once(leaf(7))), leaf(7));
    }

    #[test]
    fn test_odd_leaf_is_duplicated() {
        let root = calc_merkle_root([leaf(1), leaf(2), leaf(3)].into_iter());
        let expected = merkle_hash(merkle_hash(leaf(1), leaf(2)), merkle_hash(leaf(3), leaf(3)));
        assert_eq!(root, expected);

        let even = calc_merkle_root([leaf(1), leaf(2), leaf(3), leaf(3)].into_iter());
        assert_eq!(even, root);
    }
}
