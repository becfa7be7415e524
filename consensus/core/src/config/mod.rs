pub mod checkpoints;
pub mod constants;
pub mod deployments;
pub mod genesis;
pub mod params;
pub mod registry;

use std::ops::Deref;

use {
    constants::policy::{MAINNET_POLICY, PolicyParams, REGTEST_POLICY, TESTNET_POLICY},
    params::Params,
};

use crate::network::NetworkType;

/// Consensus parameters bundled with the node policy defaults of their network. Use `Config::new`
/// for directly building from a `Params` instance. For anything more complex it is recommended to
/// use `ConfigBuilder`. NOTE: this struct can be implicitly de-refed into `Params`
#[derive(Clone, Debug)]
pub struct Config {
    /// Consensus params
    pub params: Params,
    /// Policy params
    pub policy: PolicyParams,

    /// Build the genesis block and compare it with its pinned identity when selected
    pub check_genesis: bool,
}

impl Config {
    pub fn new(params: Params) -> Self {
        let policy = match params.net {
            NetworkType::Mainnet => MAINNET_POLICY,
            NetworkType::Testnet => TESTNET_POLICY,
            NetworkType::Regtest => REGTEST_POLICY,
        };
        Self { params, policy, check_genesis: true }
    }

    pub fn to_builder(&self) -> ConfigBuilder {
        ConfigBuilder { config: self.clone() }
    }
}

impl From<NetworkType> for Config {
    fn from(net: NetworkType) -> Self {
        Self::new(net.into())
    }
}

impl AsRef<Params> for Config {
    fn as_ref(&self) -> &Params {
        &self.params
    }
}

impl Deref for Config {
    type Target = Params;

    fn deref(&self) -> &Self::Target {
        &self.params
    }
}

pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new(params: Params) -> Self {
        Self { config: Config::new(params) }
    }

    pub fn set_policy_params(mut self, policy: PolicyParams) -> Self {
        self.config.policy = policy;
        self
    }

    pub fn edit_consensus_params<F>(mut self, edit_func: F) -> Self
    where
        F: Fn(&mut Params),
    {
        edit_func(&mut self.config.params);
        self
    }

    pub fn apply_args<F>(mut self, edit_func: F) -> Self
    where
        F: Fn(&mut Config),
    {
        edit_func(&mut self.config);
        self
    }

    pub fn skip_genesis_check(mut self) -> Self {
        self.config.check_genesis = false;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
