use crate::hashing;
use genix_hashes::{Hash, ZERO_HASH};
use serde::{Deserialize, Serialize};

pub type TransactionId = Hash;

/// Base units per coin
pub const COIN: u64 = 100_000_000;

/// Represents a reference to a previous transaction output
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Hash)]
#[serde(rename_all = "camelCase")]
pub struct TransactionOutpoint {
    pub transaction_id: TransactionId,
    pub index: u32,
}

impl TransactionOutpoint {
    pub const fn new(transaction_id: TransactionId, index: u32) -> Self {
        Self { transaction_id, index }
    }

    /// The outpoint spent by coinbase inputs
    pub const fn null() -> Self {
        Self { transaction_id: ZERO_HASH, index: u32::MAX }
    }

    pub fn is_null(&self) -> bool {
        self.index == u32::MAX && self.transaction_id.is_zero()
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TransactionInput {
    pub previous_outpoint: TransactionOutpoint,
    #[serde(with = "hex::serde")]
    pub signature_script: Vec<u8>,
    pub sequence: u32,
}

impl TransactionInput {
    pub fn new(previous_outpoint: TransactionOutpoint, signature_script: Vec<u8>, sequence: u32) -> Self {
        Self { previous_outpoint, signature_script, sequence }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TransactionOutput {
    pub value: u64,
    #[serde(with = "hex::serde")]
    pub script_public_key: Vec<u8>,
}

impl TransactionOutput {
    pub fn new(value: u64, script_public_key: Vec<u8>) -> Self {
        Self { value, script_public_key }
    }
}

/// A legacy (pre-segwit) transaction with its id cached at construction
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub version: i32,
    pub inputs: Vec<TransactionInput>,
    pub outputs: Vec<TransactionOutput>,
    pub lock_time: u32,

    #[serde(skip)]
    id: TransactionId,
}

impl Transaction {
    pub fn new(version: i32, inputs: Vec<TransactionInput>, outputs: Vec<TransactionOutput>, lock_time: u32) -> Self {
        let mut tx = Self { version, inputs, outputs, lock_time, id: ZERO_HASH };
        tx.finalize();
        tx
    }

    /// Recomputes the cached id; call after mutating any field
    pub fn finalize(&mut self) {
        self.id = hashing::tx::id(self);
    }

    #[inline(always)]
    pub fn id(&self) -> TransactionId {
        self.id
    }

    pub fn is_coinbase(&self) -> bool {
        self.inputs.len() == 1 && self.inputs[0].previous_outpoint.is_null()
    }

    pub fn total_output_value(&self) -> u64 {
        self.outputs.iter().map(|output| output.value).sum()
    }
}
