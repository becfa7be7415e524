use genix_hashes::Hash;
use serde::Serialize;

/// Extra cost of verifying blocks past the last checkpoint, where signatures are checked
pub const SIGCHECK_VERIFICATION_FACTOR: f64 = 5.0;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Hard-coded block pins plus the chain statistics at the last of them
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Checkpoints {
    /// Pinned `(height, hash)` pairs in ascending height order
    pub entries: &'static [(u64, Hash)],
    /// UNIX timestamp of the last checkpoint block
    pub last_checkpoint_time: i64,
    /// Total number of transactions between genesis and the last checkpoint
    pub transactions_last_checkpoint: u64,
    /// Estimated number of transactions per day after the checkpoint
    pub transactions_per_day: f64,
}

impl Checkpoints {
    pub fn get(&self, height: u64) -> Option<Hash> {
        self.entries.binary_search_by_key(&height, |(h, _)| *h).ok().map(|i| self.entries[i].1)
    }

    pub fn last_checkpoint(&self) -> Option<(u64, Hash)> {
        self.entries.last().copied()
    }

    /// Highest checkpoint whose block is known to the caller
    pub fn last_checkpoint_in<F>(&self, is_known: F) -> Option<(u64, Hash)>
    where
        F: Fn(&Hash) -> bool,
    {
        self.entries.iter().rev().find(|(_, hash)| is_known(hash)).copied()
    }

    /// A block is inconsistent only when its height is pinned to another hash
    pub fn is_consistent(&self, height: u64, hash: &Hash) -> bool {
        self.get(height).is_none_or(|pinned| pinned == *hash)
    }

    /// Estimates the fraction of total validation work done once a block is connected.
    ///
    /// `chain_tx` is the number of transactions up to and including the block, `block_time` its
    /// timestamp and `now` the current time. Work past the last checkpoint is weighted by
    /// [`SIGCHECK_VERIFICATION_FACTOR`] when `sigchecks` is set.
    pub fn guess_verification_progress(&self, chain_tx: u64, block_time: i64, now: i64, sigchecks: bool) -> f64 {
        let factor = if sigchecks { SIGCHECK_VERIFICATION_FACTOR } else { 1.0 };
        let checkpoint_tx = self.transactions_last_checkpoint;

        let (work_before, work_after) = if chain_tx <= checkpoint_tx {
            let cheap_before = chain_tx as f64;
            let cheap_after = (checkpoint_tx - chain_tx) as f64;
            let expensive_after = (now - self.last_checkpoint_time) as f64 / SECONDS_PER_DAY * self.transactions_per_day;
            (cheap_before, cheap_after + expensive_after * factor)
        } else {
            let cheap_before = checkpoint_tx as f64;
            let expensive_before = (chain_tx - checkpoint_tx) as f64;
            let expensive_after = (now - block_time) as f64 / SECONDS_PER_DAY * self.transactions_per_day;
            (cheap_before + expensive_before * factor, expensive_after * factor)
        };

        let total = work_before + work_after;
        if total <= 0.0 { 1.0 } else { work_before / total }
    }
}
