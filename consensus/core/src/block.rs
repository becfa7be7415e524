use crate::{header::Header, merkle::calc_hash_merkle_root, tx::Transaction};
use genix_hashes::Hash;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub header: Header,
    pub transactions: Arc<Vec<Transaction>>,
}

impl Block {
    pub fn new(header: Header, transactions: Vec<Transaction>) -> Self {
        Self { header, transactions: Arc::new(transactions) }
    }

    /// Builds the header over the given transactions, deriving the merkle root from them
    pub fn from_transactions(version: i32, prev_block_hash: Hash, timestamp: u32, bits: u32, nonce: u32, txs: Vec<Transaction>) -> Self {
        let merkle_root = calc_hash_merkle_root(txs.iter());
        Self::new(Header::new_finalized(version, prev_block_hash, merkle_root, timestamp, bits, nonce), txs)
    }

    pub fn hash(&self) -> Hash {
        self.header.hash
    }

    pub fn tx_count(&self) -> usize {
        self.transactions.len()
    }
}
