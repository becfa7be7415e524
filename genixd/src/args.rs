use clap::{Arg, Command, arg};
use genix_consensus_core::{
    config::Config,
    errors::config::{ConfigError, ConfigResult},
    network::NetworkType,
};
use serde::Deserialize;
use std::{ffi::OsString, fs};
use toml::from_str;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Args {
    // NOTE: it is best if property names match config file fields
    pub appdir: Option<String>,
    pub logdir: Option<String>,
    #[serde(rename = "nologfiles")]
    pub no_log_files: bool,
    #[serde(rename = "loglevel")]
    pub log_level: String,
    pub testnet: bool,
    pub regtest: bool,
    /// Overrides the network's standardness policy when set
    #[serde(rename = "acceptnonstdtxn")]
    pub accept_non_std_txn: Option<bool>,
    #[serde(rename = "maxtipage")]
    pub max_tip_age: Option<i64>,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            appdir: None,
            logdir: None,
            no_log_files: false,
            log_level: "info".into(),
            testnet: false,
            regtest: false,
            accept_non_std_txn: None,
            max_tip_age: None,
        }
    }
}

impl Args {
    pub fn network(&self) -> ConfigResult<NetworkType> {
        match (self.testnet, self.regtest) {
            (false, false) => Ok(NetworkType::Mainnet),
            (true, false) => Ok(NetworkType::Testnet),
            (false, true) => Ok(NetworkType::Regtest),
            (true, true) => Err(ConfigError::MixedNetworks),
        }
    }

    pub fn apply_to_config(&self, config: &mut Config) {
        if let Some(accept) = self.accept_non_std_txn {
            config.policy.require_standard = !accept;
        }
        if let Some(max_tip_age) = self.max_tip_age {
            config.policy.max_tip_age = max_tip_age;
        }
    }
}

pub fn cli() -> Command {
    Command::new("genixd")
        .about(format!("{} v{}", env!("CARGO_PKG_DESCRIPTION"), env!("CARGO_PKG_VERSION")))
        .version(env!("CARGO_PKG_VERSION"))
        .arg(arg!(-C --configfile <CONFIG_FILE> "Path of config file."))
        .arg(arg!(-b --appdir <DATA_DIR> "Directory to store data."))
        .arg(arg!(--logdir <LOG_DIR> "Directory to log output."))
        .arg(arg!(--nologfiles "Disable logging to files."))
        .arg(
            Arg::new("log_level")
                .short('d')
                .long("loglevel")
                .env("GENIXD_LOG_LEVEL")
                .value_name("LEVEL")
                .default_value("info")
                .require_equals(true)
                .help("Logging level for all subsystems {off, error, warn, info, debug, trace}\n-- You may also specify <subsystem>=<level>,<subsystem2>=<level>,... to set the log level for individual subsystems.".to_string()),
        )
        .arg(arg!(--testnet "Use the test network"))
        .arg(arg!(--regtest "Use the regression test network"))
        .arg(
            Arg::new("acceptnonstdtxn")
                .long("acceptnonstdtxn")
                .env("GENIXD_ACCEPT_NON_STD_TXN")
                .value_name("BOOL")
                .num_args(0..=1)
                .require_equals(true)
                .default_missing_value("true")
                .value_parser(clap::value_parser!(bool))
                .help("Relay and mine non-standard transactions (default: false on main and test, true on regtest)."),
        )
        .arg(
            Arg::new("maxtipage")
                .long("maxtipage")
                .env("GENIXD_MAX_TIP_AGE")
                .value_name("SECONDS")
                .require_equals(true)
                .value_parser(clap::value_parser!(i64))
                .help("Maximum tip age in seconds to consider the node in initial block download."),
        )
}

pub fn parse_args() -> Args {
    match Args::parse(std::env::args_os()) {
        Ok(args) => args,
        Err(err) => {
            println!("{err}");
            std::process::exit(1);
        }
    }
}

impl Args {
    pub fn parse<I, T>(itr: I) -> Result<Args, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let m: clap::ArgMatches = cli().try_get_matches_from(itr)?;
        let mut defaults: Args = Default::default();

        if let Some(config_file) = m.get_one::<String>("configfile") {
            let config_str = fs::read_to_string(config_file)?;
            defaults = from_str(&config_str).map_err(|toml_error| {
                clap::Error::raw(
                    clap::error::ErrorKind::ValueValidation,
                    format!("failed parsing config file, reason: {}", toml_error.message()),
                )
            })?;
        }

        let args = Args {
            appdir: m.get_one::<String>("appdir").cloned().or(defaults.appdir),
            logdir: m.get_one::<String>("logdir").cloned().or(defaults.logdir),
            no_log_files: arg_match_unwrap_or::<bool>(&m, "nologfiles", defaults.no_log_files),
            log_level: arg_match_unwrap_or::<String>(&m, "log_level", defaults.log_level),
            testnet: arg_match_unwrap_or::<bool>(&m, "testnet", defaults.testnet),
            regtest: arg_match_unwrap_or::<bool>(&m, "regtest", defaults.regtest),
            accept_non_std_txn: m.get_one::<bool>("acceptnonstdtxn").copied().or(defaults.accept_non_std_txn),
            max_tip_age: m.get_one::<i64>("maxtipage").copied().or(defaults.max_tip_age),
        };

        Ok(args)
    }
}

use clap::parser::ValueSource::DefaultValue;
use std::marker::{Send, Sync};
fn arg_match_unwrap_or<T: Clone + Send + Sync + 'static>(m: &clap::ArgMatches, arg_id: &str, default: T) -> T {
    m.get_one::<T>(arg_id).cloned().filter(|_| m.value_source(arg_id) != Some(DefaultValue)).unwrap_or(default)
}
