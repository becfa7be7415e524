use crate::{config::deployments::DeploymentId, network::NetworkType};
use genix_addresses::AddressError;
use genix_hashes::Hash;
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// The genesis field found to differ from its pinned value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenesisField {
    Hash,
    MerkleRoot,
}

impl Display for GenesisField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GenesisField::Hash => f.write_str("block hash"),
            GenesisField::MerkleRoot => f.write_str("merkle root"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown chain {0}")]
    UnknownChain(String),

    #[error("network parameters were accessed before a network was selected")]
    Uninitialized,

    #[error("{network} genesis {field} mismatch: expected {expected}, computed {computed}")]
    GenesisMismatch { network: NetworkType, field: GenesisField, expected: Hash, computed: Hash },

    #[error("{network}: deployments {first:?} and {second:?} both use bit {bit}")]
    DuplicateDeploymentBit { network: NetworkType, bit: u8, first: DeploymentId, second: DeploymentId },

    #[error("{network}: deployment {deployment:?} uses bit {bit} outside the versionbits range")]
    InvalidDeploymentBit { network: NetworkType, deployment: DeploymentId, bit: u8 },

    #[error("{0}: target spacing must be positive")]
    ZeroTargetSpacing(NetworkType),

    #[error("{0}: miner confirmation window must be positive")]
    ZeroConfirmationWindow(NetworkType),

    #[error("{network}: activation threshold {threshold} exceeds the confirmation window {window}")]
    ThresholdAboveWindow { network: NetworkType, threshold: u64, window: u64 },

    #[error("{network}: deployment {deployment:?} threshold {threshold} exceeds its window {window}")]
    DeploymentThresholdAboveWindow { network: NetworkType, deployment: DeploymentId, threshold: u64, window: u64 },

    #[error("address prefixes: {0}")]
    AddressPrefix(#[from] AddressError),

    #[error("Configuration: --testnet and --regtest cannot be used together")]
    MixedNetworks,

    #[error("Configuration: --logdir and --nologfiles cannot be used together")]
    MixedLogDirAndNoLogFiles,
}

impl ConfigError {
    /// Whether the node must refuse to start when this error surfaces during initialization
    pub fn is_fatal(&self) -> bool {
        matches!(self, ConfigError::GenesisMismatch { .. })
    }
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
