//! The process-wide active network.
//!
//! Node entry points select a network once at startup; consumers then either receive the
//! resulting [`ActiveNetwork`] by injection or read it back through [`active_params`].

use super::Config;
use crate::{
    block::Block,
    errors::config::{ConfigError, ConfigResult},
    network::NetworkType,
};
use arc_swap::ArcSwapOption;
use genix_core::log::{error, info};
use std::{ops::Deref, sync::Arc, sync::OnceLock};

/// A validated configuration together with its genesis block
#[derive(Debug)]
pub struct ActiveNetwork {
    pub config: Config,
    pub genesis: Block,
}

impl Deref for ActiveNetwork {
    type Target = Config;

    fn deref(&self) -> &Self::Target {
        &self.config
    }
}

/// Holds at most one active configuration. Readers never block.
#[derive(Default)]
pub struct NetworkParameterRegistry {
    active: ArcSwapOption<ActiveNetwork>,
}

impl NetworkParameterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Activates one of the chains `main`, `test` or `regtest`.
    ///
    /// Any failure leaves the currently active network in place.
    pub fn select_network(&self, name: &str) -> ConfigResult<Arc<ActiveNetwork>> {
        let net = NetworkType::iter().find(|net| net.name() == name).ok_or_else(|| ConfigError::UnknownChain(name.to_string()))?;
        self.select(Config::from(net))
    }

    /// Validates `config`, builds its genesis block and makes it the active network
    pub fn select(&self, config: Config) -> ConfigResult<Arc<ActiveNetwork>> {
        config.validate()?;
        let genesis = if config.check_genesis {
            config.genesis.build_verified(config.net).inspect_err(|err| error!("Refusing to activate {}: {err}", config.net))?
        } else {
            config.genesis.build()
        };
        info!("Selected network {} with genesis {}", config.net, genesis.hash());

        let active = Arc::new(ActiveNetwork { config, genesis });
        self.active.store(Some(active.clone()));
        Ok(active)
    }

    pub fn active_params(&self) -> ConfigResult<Arc<ActiveNetwork>> {
        self.active.load_full().ok_or(ConfigError::Uninitialized)
    }

    pub fn is_selected(&self) -> bool {
        self.active.load().is_some()
    }
}

fn global() -> &'static NetworkParameterRegistry {
    static REGISTRY: OnceLock<NetworkParameterRegistry> = OnceLock::new();
    REGISTRY.get_or_init(NetworkParameterRegistry::new)
}

/// Selects the network of this process. See [`NetworkParameterRegistry::select_network`].
pub fn select_network(name: &str) -> ConfigResult<Arc<ActiveNetwork>> {
    global().select_network(name)
}

/// Selects an explicitly built configuration for this process
pub fn select_config(config: Config) -> ConfigResult<Arc<ActiveNetwork>> {
    global().select(config)
}

/// The network selected for this process
pub fn active_params() -> ConfigResult<Arc<ActiveNetwork>> {
    global().active_params()
}
