pub use super::{
    checkpoints::Checkpoints,
    constants::consensus::*,
    deployments::{Deployment, DeploymentId, Deployments},
    genesis::{GENESIS, GenesisBlock, REGTEST_GENESIS, TESTNET_GENESIS},
};
use crate::{
    errors::config::{ConfigError, ConfigResult},
    network::{NetworkMagic, NetworkType},
};
use genix_addresses::Base58Prefixes;
use genix_hashes::{Hash, ZERO_HASH};
use genix_math::Uint256;

/// Height and hash from which coinbase transactions must commit to their block height
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bip34Activation {
    pub height: u64,
    pub hash: Hash,
}

/// Retargeting algorithm used while retargeting is enabled
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DifficultyAlgorithm {
    DarkGravityWave,
    ZawyLwma,
}

/// Consensus parameters. Contains settings and configurations which are consensus-sensitive.
/// Changing one of these on a network node would exclude and prevent it from reaching consensus
/// with the other unmodified nodes.
#[derive(Clone, Debug)]
pub struct Params {
    pub net: NetworkType,
    pub genesis: GenesisBlock,

    //
    // Subsidy, masternodes and governance
    //
    pub subsidy_halving_interval: u64,
    pub masternode_payments_start_block: u64,
    pub masternode_payments_increase_block: u64,
    pub masternode_payments_increase_period: u64,
    /// Confirmations after which an InstantSend lock is released
    pub instantsend_keep_lock: u64,
    pub budget_payments_start_block: u64,
    pub budget_payments_cycle_blocks: u64,
    pub budget_payments_window_blocks: u64,
    /// Seconds a proposal must exist before it may be funded
    pub budget_proposal_establishing_time: i64,
    pub superblock_start_block: u64,
    pub superblock_cycle: u64,
    pub governance_min_quorum: u32,
    pub governance_filter_elements: u32,
    pub masternode_minimum_confirmations: u32,

    //
    // Legacy majority upgrade rules
    //
    pub majority_enforce_block_upgrade: u64,
    pub majority_reject_block_outdated: u64,
    pub majority_window: u64,

    /// `None` when coinbase height commitments are never required
    pub bip34: Option<Bip34Activation>,

    //
    // Proof of work
    //
    pub pow_limit: Uint256,
    /// Seconds
    pub pow_target_timespan: u64,
    /// Seconds between blocks; always positive
    pub pow_target_spacing: u64,
    pub pow_allow_min_difficulty_blocks: bool,
    pub pow_no_retargeting: bool,
    pub use_dark_gravity_wave: bool,
    pub zawy_lwma_averaging_window: u64,
    pub zawy_lwma_adjusted_weight: u64,

    //
    // Versionbits
    //
    pub rule_change_activation_threshold: u64,
    pub miner_confirmation_window: u64,
    pub deployments: Deployments,

    pub minimum_chain_work: Uint256,
    pub default_assume_valid: Hash,
    pub checkpoints: Checkpoints,

    //
    // Networking and key encoding
    //
    pub magic: NetworkMagic,
    pub default_p2p_port: u16,
    pub prune_after_height: u64,
    pub dns_seeds: &'static [&'static str],
    pub base58_prefixes: Base58Prefixes,
    /// BIP44 coin type
    pub ext_coin_type: u32,
}

impl Params {
    pub fn network_name(&self) -> &'static str {
        self.net.name()
    }

    pub fn difficulty_algorithm(&self) -> DifficultyAlgorithm {
        if self.use_dark_gravity_wave { DifficultyAlgorithm::DarkGravityWave } else { DifficultyAlgorithm::ZawyLwma }
    }

    /// Number of blocks per target timespan
    pub fn difficulty_adjustment_interval(&self) -> u64 {
        self.pow_target_timespan / self.pow_target_spacing
    }

    pub fn deployment(&self, id: DeploymentId) -> &Deployment {
        self.deployments.get(id)
    }

    pub fn is_bip34_enforced(&self, height: u64) -> bool {
        self.bip34.is_some_and(|bip34| height >= bip34.height)
    }

    /// Checks the structural invariants every parameter set must hold
    pub fn validate(&self) -> ConfigResult<()> {
        if self.pow_target_spacing == 0 {
            return Err(ConfigError::ZeroTargetSpacing(self.net));
        }
        let (window, threshold) = (self.miner_confirmation_window, self.rule_change_activation_threshold);
        if window == 0 {
            return Err(ConfigError::ZeroConfirmationWindow(self.net));
        }
        if threshold > window {
            return Err(ConfigError::ThresholdAboveWindow { network: self.net, threshold, window });
        }
        self.deployments.validate(self.net)?;
        for (deployment, params) in self.deployments.iter() {
            let (window, threshold) = (params.period(window), params.threshold(threshold));
            if threshold > window {
                return Err(ConfigError::DeploymentThresholdAboveWindow { network: self.net, deployment, threshold, window });
            }
        }
        self.base58_prefixes.validate()?;
        Ok(())
    }
}

impl From<NetworkType> for Params {
    fn from(value: NetworkType) -> Self {
        match value {
            NetworkType::Mainnet => MAINNET_PARAMS,
            NetworkType::Testnet => TESTNET_PARAMS,
            NetworkType::Regtest => REGTEST_PARAMS,
        }
    }
}

/// X11 identity of the main genesis block as deployed, pinned as checkpoint and assume-valid data
const X11_GENESIS_HASH: Hash = Hash::from_static_hex("000006874678aa53f78b7676ced0f443cd22ae8917199b5ec14d0b7b7df7b93d");

const MAINNET_CHECKPOINTS: [(u64, Hash); 1] = [(0, X11_GENESIS_HASH)];

// Regtest genesis is not pinned, so nothing can be checkpointed against it
const REGTEST_CHECKPOINTS: [(u64, Hash); 0] = [];

const MAINNET_BASE58_PREFIXES: Base58Prefixes = Base58Prefixes {
    // 'g'
    pubkey_address: &[98],
    script_address: &[11],
    secret_key: &[127],
    // xpub
    ext_public_key: &[0x04, 0x88, 0xb2, 0x1e],
    // xprv
    ext_secret_key: &[0x04, 0x88, 0xad, 0xe4],
};

const REGTEST_BASE58_PREFIXES: Base58Prefixes = Base58Prefixes {
    // 'o'
    pubkey_address: &[115],
    script_address: &[83],
    secret_key: &[239],
    // tpub
    ext_public_key: &[0x04, 0x35, 0x87, 0xcf],
    // tprv
    ext_secret_key: &[0x04, 0x35, 0x83, 0x94],
};

pub const MAINNET_PARAMS: Params = Params {
    net: NetworkType::Mainnet,
    genesis: GENESIS,

    subsidy_halving_interval: 210_240,
    masternode_payments_start_block: 2100,
    masternode_payments_increase_block: 4030,
    masternode_payments_increase_period: 10,
    instantsend_keep_lock: 6,
    budget_payments_start_block: 4100,
    budget_payments_cycle_blocks: 50,
    budget_payments_window_blocks: 10,
    budget_proposal_establishing_time: 60 * 60 * 2,
    superblock_start_block: 4200,
    superblock_cycle: 24,
    governance_min_quorum: 1,
    governance_filter_elements: 500,
    masternode_minimum_confirmations: 1,

    majority_enforce_block_upgrade: 75,
    majority_reject_block_outdated: 95,
    majority_window: 1000,

    bip34: Some(Bip34Activation { height: 0, hash: X11_GENESIS_HASH }),

    pow_limit: MAINNET_POW_LIMIT,
    pow_target_timespan: 60,
    pow_target_spacing: 30,
    pow_allow_min_difficulty_blocks: false,
    pow_no_retargeting: false,
    use_dark_gravity_wave: true,
    zawy_lwma_averaging_window: 6,
    zawy_lwma_adjusted_weight: 39,

    rule_change_activation_threshold: 19,
    miner_confirmation_window: 20,
    deployments: Deployments {
        // January 1, 2008 to December 31, 2008
        test_dummy: Deployment::new(28, 1199145601, 1230767999),
        csv: Deployment::new(0, 1556872256, 1587909567),
        dip0001: Deployment::new(1, 1556872256, 1559168819).with_window(400, 320),
    },

    minimum_chain_work: Uint256::ZERO,
    default_assume_valid: X11_GENESIS_HASH,
    checkpoints: Checkpoints {
        entries: &MAINNET_CHECKPOINTS,
        last_checkpoint_time: 1549043100,
        transactions_last_checkpoint: 0,
        transactions_per_day: 250.0,
    },

    magic: NetworkMagic::new([0xcf, 0x4e, 0x3b, 0x49]),
    default_p2p_port: 32538,
    prune_after_height: 1000,
    dns_seeds: &[],
    base58_prefixes: MAINNET_BASE58_PREFIXES,
    ext_coin_type: 5,
};

pub const TESTNET_PARAMS: Params = Params {
    net: NetworkType::Testnet,
    genesis: TESTNET_GENESIS,
    magic: NetworkMagic::new([0xcf, 0x4e, 0x3b, 0x4a]),
    default_p2p_port: 32539,
    dns_seeds: &["161.43.201.255"],
    ..MAINNET_PARAMS
};

pub const REGTEST_PARAMS: Params = Params {
    net: NetworkType::Regtest,
    genesis: REGTEST_GENESIS,

    subsidy_halving_interval: 150,
    masternode_payments_start_block: 2,
    masternode_payments_increase_block: 999,
    masternode_payments_increase_period: 999,
    instantsend_keep_lock: 6,
    budget_payments_start_block: 1000,
    budget_payments_cycle_blocks: 50,
    budget_payments_window_blocks: 10,
    budget_proposal_establishing_time: 60 * 20,
    superblock_start_block: 1500,
    superblock_cycle: 10,
    governance_min_quorum: 1,
    governance_filter_elements: 100,
    masternode_minimum_confirmations: 1,

    majority_enforce_block_upgrade: 750,
    majority_reject_block_outdated: 950,
    majority_window: 1000,

    bip34: None,

    pow_limit: REGTEST_POW_LIMIT,
    pow_target_timespan: 60 * 60,
    pow_target_spacing: 2 * 60,
    pow_allow_min_difficulty_blocks: true,
    pow_no_retargeting: true,
    use_dark_gravity_wave: false,
    zawy_lwma_averaging_window: 65,
    zawy_lwma_adjusted_weight: 3927,

    rule_change_activation_threshold: 108,
    miner_confirmation_window: 144,
    deployments: Deployments {
        test_dummy: Deployment::new(28, 0, 999999999999),
        csv: Deployment::new(0, 0, 999999999999),
        dip0001: Deployment::new(1, 0, 999999999999),
    },

    minimum_chain_work: Uint256::ZERO,
    default_assume_valid: ZERO_HASH,
    checkpoints: Checkpoints {
        entries: &REGTEST_CHECKPOINTS,
        last_checkpoint_time: 1549043100,
        transactions_last_checkpoint: 0,
        transactions_per_day: 0.0,
    },

    magic: NetworkMagic::new([0xf4, 0xaf, 0xbf, 0xf5]),
    default_p2p_port: 17978,
    prune_after_height: 1000,
    dns_seeds: &[],
    base58_prefixes: REGTEST_BASE58_PREFIXES,
    ext_coin_type: 1,
};
