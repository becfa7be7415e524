use crate::hashing;
use genix_hashes::{Hash, ZERO_HASH};
use serde::{Deserialize, Serialize};

/// Serialized size of a block header
pub const HEADER_SIZE: usize = 80;

/// Legacy 80-byte block header with its identity hash cached
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Header {
    /// Cached hash
    #[serde(skip)]
    pub hash: Hash,
    pub version: i32,
    pub prev_block_hash: Hash,
    pub hash_merkle_root: Hash,
    /// Unix timestamp in seconds
    pub timestamp: u32,
    pub bits: u32,
    pub nonce: u32,
}

impl Header {
    pub fn new_finalized(version: i32, prev_block_hash: Hash, hash_merkle_root: Hash, timestamp: u32, bits: u32, nonce: u32) -> Self {
        let mut header = Self { hash: ZERO_HASH, version, prev_block_hash, hash_merkle_root, timestamp, bits, nonce };
        header.finalize();
        header
    }

    /// Finalizes the header and recomputes the header hash
    pub fn finalize(&mut self) {
        self.hash = hashing::header::hash(self);
    }
}

/// The per-block data consulted by difficulty and deployment evaluation
pub trait HeaderView {
    fn version(&self) -> i32;
    fn timestamp(&self) -> i64;
    fn bits(&self) -> u32;
}

impl HeaderView for Header {
    fn version(&self) -> i32 {
        self.version
    }

    fn timestamp(&self) -> i64 {
        self.timestamp as i64
    }

    fn bits(&self) -> u32 {
        self.bits
    }
}

/// A compact header summary, convenient for synthetic histories
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompactHeaderData {
    pub version: i32,
    pub timestamp: i64,
    pub bits: u32,
}

impl CompactHeaderData {
    pub const fn new(version: i32, timestamp: i64, bits: u32) -> Self {
        Self { version, timestamp, bits }
    }
}

impl HeaderView for CompactHeaderData {
    fn version(&self) -> i32 {
        self.version
    }

    fn timestamp(&self) -> i64 {
        self.timestamp
    }

    fn bits(&self) -> u32 {
        self.bits
    }
}

impl From<&Header> for CompactHeaderData {
    fn from(header: &Header) -> Self {
        Self { version: header.version, timestamp: header.timestamp as i64, bits: header.bits }
    }
}
