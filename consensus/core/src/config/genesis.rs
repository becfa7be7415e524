use super::constants::genesis::{GENESIS_COINBASE_EXTRA_NONCE, GENESIS_COINBASE_HEIGHT_MARKER, GENESIS_COINBASE_MESSAGE, GENESIS_OUTPUT_PUBKEY};
use crate::{
    block::Block,
    errors::config::{ConfigError, ConfigResult, GenesisField},
    network::NetworkType,
    tx::{COIN, Transaction, TransactionInput, TransactionOutpoint, TransactionOutput},
};
use genix_hashes::{Hash, ZERO_HASH};

const OP_PUSHDATA1: u8 = 0x4c;
const OP_PUSHDATA2: u8 = 0x4d;
const OP_CHECKSIG: u8 = 0xac;

/// Identity values a built genesis block must reproduce
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GenesisCommitment {
    pub hash: Hash,
    pub hash_merkle_root: Hash,
}

/// The fixed inputs of a network's first block
#[derive(Clone, Copy, Debug)]
pub struct GenesisBlock {
    pub version: i32,
    pub timestamp: u32,
    pub bits: u32,
    pub nonce: u32,
    pub reward: u64,
    pub coinbase_message: &'static str,
    pub output_pubkey: &'static [u8],
    /// `None` for networks whose genesis is not checked against pinned values
    pub expected: Option<GenesisCommitment>,
}

impl GenesisBlock {
    pub fn output_script(&self) -> Vec<u8> {
        pay_to_pubkey_script(self.output_pubkey)
    }

    pub fn build(&self) -> Block {
        build_genesis(self.timestamp, self.nonce, self.bits, self.version, self.reward, self.coinbase_message, &self.output_script())
    }

    /// Compares a built block with the pinned commitment, merkle root first
    pub fn verify(&self, network: NetworkType, block: &Block) -> ConfigResult<()> {
        let Some(expected) = self.expected else {
            return Ok(());
        };
        if block.header.hash_merkle_root != expected.hash_merkle_root {
            return Err(ConfigError::GenesisMismatch {
                network,
                field: GenesisField::MerkleRoot,
                expected: expected.hash_merkle_root,
                computed: block.header.hash_merkle_root,
            });
        }
        if block.hash() != expected.hash {
            return Err(ConfigError::GenesisMismatch { network, field: GenesisField::Hash, expected: expected.hash, computed: block.hash() });
        }
        Ok(())
    }

    pub fn build_verified(&self, network: NetworkType) -> ConfigResult<Block> {
        let block = self.build();
        self.verify(network, &block)?;
        Ok(block)
    }
}

/// Builds a genesis block: one coinbase input carrying the height marker and `coinbase_message`,
/// one output paying `reward` to `output_script`, and a null previous hash.
pub fn build_genesis(
    timestamp: u32,
    nonce: u32,
    bits: u32,
    version: i32,
    reward: u64,
    coinbase_message: &str,
    output_script: &[u8],
) -> Block {
    let coinbase = genesis_coinbase_transaction(coinbase_message, output_script, reward);
    Block::from_transactions(version, ZERO_HASH, timestamp, bits, nonce, vec![coinbase])
}

pub fn genesis_coinbase_transaction(coinbase_message: &str, output_script: &[u8], reward: u64) -> Transaction {
    let input = TransactionInput::new(TransactionOutpoint::null(), coinbase_signature_script(coinbase_message), u32::MAX);
    let output = TransactionOutput::new(reward, output_script.to_vec());
    Transaction::new(1, vec![input], vec![output], 0)
}

fn coinbase_signature_script(coinbase_message: &str) -> Vec<u8> {
    let mut script = Vec::with_capacity(coinbase_message.len() + 10);
    push_data(&mut script, &GENESIS_COINBASE_HEIGHT_MARKER.to_le_bytes());
    push_data(&mut script, &[GENESIS_COINBASE_EXTRA_NONCE]);
    push_data(&mut script, coinbase_message.as_bytes());
    script
}

fn pay_to_pubkey_script(pubkey: &[u8]) -> Vec<u8> {
    let mut script = Vec::with_capacity(pubkey.len() + 3);
    push_data(&mut script, pubkey);
    script.push(OP_CHECKSIG);
    script
}

fn push_data(script: &mut Vec<u8>, data: &[u8]) {
    match data.len() {
        len @ 0..0x4c => script.push(len as u8),
        len @ 0x4c..=0xff => script.extend([OP_PUSHDATA1, len as u8]),
        len => {
            script.push(OP_PUSHDATA2);
            script.extend_from_slice(&(len as u16).to_le_bytes());
        }
    }
    script.extend_from_slice(data);
}

pub const GENESIS: GenesisBlock = GenesisBlock {
    version: 1,
    timestamp: 1549043100,
    bits: 0x1e0ffff0,
    nonce: 2084844903,
    reward: 50 * COIN,
    coinbase_message: GENESIS_COINBASE_MESSAGE,
    output_pubkey: &GENESIS_OUTPUT_PUBKEY,
    expected: Some(GenesisCommitment {
        hash: Hash::from_static_hex("000006874678aa53f78b7676ced0f443cd22ae8917199b5ec14d0b7b7df7b93d"),
        hash_merkle_root: Hash::from_static_hex("3ed2fa1e72f3c4160cc9b4870cc91aa8e8b90db08274d2fec8565ed5c8e87311"),
    }),
};

pub const TESTNET_GENESIS: GenesisBlock = GENESIS;

pub const REGTEST_GENESIS: GenesisBlock = GenesisBlock { reward: 150_000 * COIN, expected: None, ..GENESIS };

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genesis_hashes() {
        for (network, genesis) in [(NetworkType::Mainnet, GENESIS), (NetworkType::Testnet, TESTNET_GENESIS)] {
            let block = genesis.build_verified(network).unwrap();
            let expected = genesis.expected.unwrap();
            assert_eq!(block.hash(), expected.hash, "{network}");
            assert_eq!(block.header.hash_merkle_root, expected.hash_merkle_root, "{network}");
        }
    }

    #[test]
    fn test_genesis_build_is_deterministic() {
        for genesis in [GENESIS, TESTNET_GENESIS, REGTEST_GENESIS] {
            let first = genesis.build();
            let second = genesis.build();
            assert_eq!(first, second);
            assert_eq!(first.header.prev_block_hash, ZERO_HASH);
            assert_eq!(first.tx_count(), 1);
            // a single transaction is its own merkle root
            assert_eq!(first.header.hash_merkle_root, first.transactions[0].id());
        }
    }

    #[test]
    fn test_genesis_coinbase_serialization() {
        let block = GENESIS.build();
        let coinbase = &block.transactions[0];
        assert!(coinbase.is_coinbase());
        assert_eq!(hex::encode(&coinbase.inputs[0].signature_script), "04ffff001d0104064a756e696f72");
        assert_eq!(coinbase.outputs[0].script_public_key.len(), 67);
        assert_eq!(coinbase.outputs[0].script_public_key[0], 0x41);
        assert_eq!(coinbase.outputs[0].script_public_key[66], OP_CHECKSIG);
        assert_eq!(
            hex::encode(crate::hashing::tx::serialize(coinbase)),
            concat!(
                "01000000010000000000000000000000000000000000000000000000000000000000000000ffffffff0e04ffff001d0104064a756e696f72ffffffff",
                "0100f2052a01000000434103289c0933f7ed53fc996de0c252cd6bbf9e9b8161dcda7615c2503dbd5d48f02bdb72bd216af26b6815e0b2f50381",
                "100916a7eb7b1a88aeb8debb0803250d8401ac00000000"
            )
        );
    }

    #[test]
    fn test_regtest_genesis() {
        let block = build_genesis(1549043100, 2084844903, 0x1e0ffff0, 1, 150_000 * COIN, GENESIS_COINBASE_MESSAGE, &REGTEST_GENESIS.output_script());
        assert_eq!(block, REGTEST_GENESIS.build());
        assert_eq!(block.header.prev_block_hash, ZERO_HASH);
        assert_eq!(block.tx_count(), 1);
        assert_eq!(block.transactions[0].total_output_value(), 150_000 * COIN);
        assert_eq!(block.header.hash_merkle_root, Hash::from_static_hex("7941a59fef7b3af3f7b83f74ada44f31826213c5b4fa37168d6ff67f4775da7d"));
        // same header fields as main, only the coinbase differs
        assert_ne!(block.hash(), GENESIS.build().hash());
        assert_eq!(REGTEST_GENESIS.verify(NetworkType::Regtest, &block), Ok(()));
    }

    #[test]
    fn test_genesis_mismatch() {
        let tampered = GenesisBlock { nonce: GENESIS.nonce + 1, ..GENESIS };
        let err = tampered.build_verified(NetworkType::Mainnet).unwrap_err();
        match err {
            ConfigError::GenesisMismatch { network, field, expected, .. } => {
                assert_eq!(network, NetworkType::Mainnet);
                assert_eq!(field, GenesisField::Hash);
                assert_eq!(expected, GENESIS.expected.unwrap().hash);
            }
            other => panic!("unexpected error {other}"),
        }
        assert!(tampered.build_verified(NetworkType::Mainnet).unwrap_err().is_fatal());

        let tampered = GenesisBlock { coinbase_message: "Senior", ..GENESIS };
        assert!(matches!(
            tampered.build_verified(NetworkType::Testnet),
            Err(ConfigError::GenesisMismatch { field: GenesisField::MerkleRoot, .. })
        ));
    }

    #[test]
    fn test_push_data_opcodes() {
        let mut script = vec![];
        push_data(&mut script, &[0xaa; 0x4b]);
        assert_eq!(script[0], 0x4b);
        script.clear();
        push_data(&mut script, &[0xaa; 0x4c]);
        assert_eq!(&script[..2], &[OP_PUSHDATA1, 0x4c]);
        script.clear();
        push_data(&mut script, &[0xaa; 0x100]);
        assert_eq!(&script[..3], &[OP_PUSHDATA2, 0x00, 0x01]);
        assert_eq!(script.len(), 0x103);
    }
}
