use crate::args::Args;
use genix_consensus::processes::{difficulty::DifficultyManager, versionbits::VersionBitsManager};
use genix_consensus_core::{
    config::{
        Config, ConfigBuilder,
        registry::{self, ActiveNetwork, NetworkParameterRegistry},
    },
    errors::{
        config::{ConfigError, ConfigResult},
        difficulty::DifficultyError,
    },
    header::CompactHeaderData,
    network::NetworkType,
};
use genix_core::log::{LogError, info, init_logger};
use std::{path::PathBuf, sync::Arc};
use thiserror::Error;

const DEFAULT_LOG_DIR: &str = "logs";

#[derive(Error, Debug)]
pub enum DaemonError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Log(#[from] LogError),

    #[error(transparent)]
    Difficulty(#[from] DifficultyError),
}

impl DaemonError {
    pub fn is_fatal(&self) -> bool {
        match self {
            DaemonError::Config(err) => err.is_fatal(),
            _ => false,
        }
    }
}

pub type DaemonResult<T> = std::result::Result<T, DaemonError>;

fn get_home_dir() -> PathBuf {
    #[cfg(target_os = "windows")]
    return dirs::data_local_dir().unwrap_or_default();
    #[cfg(not(target_os = "windows"))]
    return dirs::home_dir().unwrap_or_default();
}

/// Get the default application directory.
pub fn get_app_dir() -> PathBuf {
    #[cfg(target_os = "windows")]
    return get_home_dir().join("genix");
    #[cfg(not(target_os = "windows"))]
    return get_home_dir().join(".genix");
}

pub fn validate_args(args: &Args) -> ConfigResult<()> {
    args.network()?;
    if args.logdir.is_some() && args.no_log_files {
        return Err(ConfigError::MixedLogDirAndNoLogFiles);
    }
    Ok(())
}

fn expand_home(path: &str) -> String {
    path.replace('~', &get_home_dir().to_string_lossy())
}

/// Get the application directory from the supplied [`Args`].
pub fn get_app_dir_from_args(args: &Args) -> PathBuf {
    let app_dir = args.appdir.as_deref().map(expand_home).unwrap_or_default();
    if app_dir.is_empty() { get_app_dir() } else { PathBuf::from(app_dir) }
}

/// Get the log directory from the supplied [`Args`], `None` when file logging is disabled.
///
/// Logs go under `<appdir>/<network>/logs` unless a directory is given explicitly.
pub fn get_log_dir(args: &Args) -> Option<String> {
    if args.no_log_files {
        return None;
    }
    let log_dir = args.logdir.as_deref().map(expand_home).unwrap_or_default();
    let log_dir = if log_dir.is_empty() {
        let network = args.network().unwrap_or(NetworkType::Mainnet);
        get_app_dir_from_args(args).join(network.name()).join(DEFAULT_LOG_DIR)
    } else {
        PathBuf::from(log_dir)
    };
    log_dir.to_str().map(String::from)
}

fn config_from_args(args: &Args) -> ConfigResult<Config> {
    Ok(ConfigBuilder::new(args.network()?.into()).apply_args(|config| args.apply_to_config(config)).build())
}

/// Selects the network described by `args` in `registry`, verifying its genesis block.
pub fn select_network(registry: &NetworkParameterRegistry, args: &Args) -> DaemonResult<Arc<ActiveNetwork>> {
    let active = registry.select(config_from_args(args)?)?;
    log_summary(&active)?;
    Ok(active)
}

fn log_summary(active: &ActiveNetwork) -> DaemonResult<()> {
    let genesis = [CompactHeaderData::from(&active.genesis.header)];
    let next_bits = DifficultyManager::new(active).calculate_difficulty_bits(0, &genesis, genesis[0].timestamp + active.pow_target_spacing as i64)?;
    let next_version = VersionBitsManager::new(active).compute_block_version(&genesis);

    info!("Network {} (magic {}, p2p port {})", active.network_name(), active.magic, active.default_p2p_port);
    info!("Genesis {} at {}", active.genesis.hash(), active.genesis.header.timestamp);
    info!("Difficulty algorithm {:?}, next block bits {next_bits:#010x}, version {next_version:#010x}", active.difficulty_algorithm());
    info!("Require standard: {}, max tip age: {}s", active.policy.require_standard, active.policy.max_tip_age);
    Ok(())
}

/// Validates the arguments, installs the logger and selects the network of this process,
/// which is then readable through [`registry::active_params`].
pub fn start(args: &Args) -> DaemonResult<Arc<ActiveNetwork>> {
    validate_args(args)?;
    init_logger(get_log_dir(args).as_deref(), &args.log_level)?;
    info!("genixd v{}", env!("CARGO_PKG_VERSION"));
    let active = registry::select_config(config_from_args(args)?)?;
    log_summary(&active)?;
    Ok(active)
}
