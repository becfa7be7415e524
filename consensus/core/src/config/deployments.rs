use super::constants::consensus::VERSIONBITS_NUM_BITS;
use crate::{
    errors::config::{ConfigError, ConfigResult},
    network::NetworkType,
};
use serde::{Deserialize, Serialize};

/// Soft forks voted on through versionbits
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentId {
    TestDummy,
    /// BIP68, BIP112 and BIP113
    Csv,
    /// Block size increase to 2MB
    Dip0001,
}

impl DeploymentId {
    pub const ALL: [DeploymentId; 3] = [DeploymentId::TestDummy, DeploymentId::Csv, DeploymentId::Dip0001];

    pub fn name(&self) -> &'static str {
        match self {
            DeploymentId::TestDummy => "testdummy",
            DeploymentId::Csv => "csv",
            DeploymentId::Dip0001 => "dip0001",
        }
    }
}

/// A single versionbits deployment.
///
/// `window_size` and `threshold` of zero fall back to the network-wide miner confirmation
/// window and rule change activation threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployment {
    pub bit: u8,
    /// Median time past at which signaling may begin
    pub start_time: i64,
    /// Median time past at which the deployment fails unless locked in
    pub timeout: i64,
    pub window_size: u64,
    pub threshold: u64,
}

impl Deployment {
    pub const fn new(bit: u8, start_time: i64, timeout: i64) -> Self {
        Self { bit, start_time, timeout, window_size: 0, threshold: 0 }
    }

    pub const fn with_window(mut self, window_size: u64, threshold: u64) -> Self {
        self.window_size = window_size;
        self.threshold = threshold;
        self
    }

    pub fn mask(&self) -> u32 {
        1u32 << self.bit
    }

    pub fn period(&self, default_window: u64) -> u64 {
        if self.window_size == 0 { default_window } else { self.window_size }
    }

    pub fn threshold(&self, default_threshold: u64) -> u64 {
        if self.threshold == 0 { default_threshold } else { self.threshold }
    }
}

/// The deployment table of one network
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployments {
    pub test_dummy: Deployment,
    pub csv: Deployment,
    pub dip0001: Deployment,
}

impl Deployments {
    pub fn get(&self, id: DeploymentId) -> &Deployment {
        match id {
            DeploymentId::TestDummy => &self.test_dummy,
            DeploymentId::Csv => &self.csv,
            DeploymentId::Dip0001 => &self.dip0001,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (DeploymentId, &Deployment)> + '_ {
        DeploymentId::ALL.into_iter().map(|id| (id, self.get(id)))
    }

    /// Checks that every bit is within the versionbits range and used by one deployment only
    pub fn validate(&self, network: NetworkType) -> ConfigResult<()> {
        for (i, (id, deployment)) in self.iter().enumerate() {
            if deployment.bit >= VERSIONBITS_NUM_BITS {
                return Err(ConfigError::InvalidDeploymentBit { network, deployment: id, bit: deployment.bit });
            }
            if let Some((other, _)) = self.iter().skip(i + 1).find(|(_, other)| other.bit == deployment.bit) {
                return Err(ConfigError::DuplicateDeploymentBit { network, bit: deployment.bit, first: id, second: other });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Deployments {
        Deployments {
            test_dummy: Deployment::new(28, 0, 10),
            csv: Deployment::new(0, 0, 10),
            dip0001: Deployment::new(1, 0, 10).with_window(400, 320),
        }
    }

    #[test]
    fn test_window_fallback() {
        let deployments = table();
        assert_eq!(deployments.csv.period(20), 20);
        assert_eq!(deployments.csv.threshold(19), 19);
        assert_eq!(deployments.dip0001.period(20), 400);
        assert_eq!(deployments.dip0001.threshold(19), 320);
        assert_eq!(deployments.test_dummy.mask(), 0x1000_0000);
        assert_eq!(deployments.csv.mask(), 1);
    }

    #[test]
    fn test_bit_validation() {
        struct Test {
            name: &'static str,
            deployments: Deployments,
            expected: ConfigResult<()>,
        }

        let mut colliding = table();
        colliding.dip0001.bit = 0;
        let mut out_of_range = table();
        out_of_range.test_dummy.bit = 29;

        let tests = vec![
            Test { name: "distinct bits", deployments: table(), expected: Ok(()) },
            Test {
                name: "shared bit",
                deployments: colliding,
                expected: Err(ConfigError::DuplicateDeploymentBit {
                    network: NetworkType::Testnet,
                    bit: 0,
                    first: DeploymentId::Csv,
                    second: DeploymentId::Dip0001,
                }),
            },
            Test {
                name: "bit past the top mask",
                deployments: out_of_range,
                expected: Err(ConfigError::InvalidDeploymentBit {
                    network: NetworkType::Testnet,
                    deployment: DeploymentId::TestDummy,
                    bit: 29,
                }),
            },
        ];

        for test in tests {
            assert_eq!(test.deployments.validate(NetworkType::Testnet), test.expected, "{}", test.name);
        }
    }
}
