//! Logger setup for GENIX binaries.
//!
//! Library crates log through the re-exported `log` macros; binaries call [`init_logger`]
//! once at startup to route records to the console and, optionally, to rolling files.

pub use log::{Level, LevelFilter};
pub use log::{debug, error, info, log_enabled, trace, warn};

mod appender;
pub mod consts;
mod filters;

use appender::AppenderSpec;
use consts::{CONSOLE_APPENDER, DEFAULT_LOGGER_ENV, ERR_LOG_FILE_APPENDER, ERR_LOG_FILE_NAME, LOG_FILE_APPENDER, LOG_FILE_NAME};
pub use filters::LogFilters;
use log4rs::config::{Config, Root};
use std::{env, path::Path};
use thiserror::Error;

#[derive(Clone, Debug, Error)]
pub enum LogError {
    #[error("invalid log filter entry '{0}'")]
    ParseFilter(String),

    #[error("log directory '{0}' is not a valid path")]
    InvalidLogDir(String),

    #[error("failed building appender {0}: {1}")]
    Appender(&'static str, String),

    #[error("invalid logger configuration: {0}")]
    Config(String),

    #[error("a logger is already installed: {0}")]
    AlreadyInitialized(String),
}

pub type LogResult<T> = std::result::Result<T, LogError>;

/// Installs the global logger.
///
/// `filters` is merged over the `RUST_LOG` environment variable, so explicit filters win.
/// When `log_dir` is set, all records also go to a rolling log file and records of level
/// `warn` and above are duplicated into a separate error log.
pub fn init_logger(log_dir: Option<&str>, filters: &str) -> LogResult<()> {
    let env_filters = env::var(DEFAULT_LOGGER_ENV).unwrap_or_default();
    let filters = LogFilters::parse_lenient(&[env_filters.as_str(), filters].join(","));

    let mut specs = vec![AppenderSpec::console(CONSOLE_APPENDER, None)];
    if let Some(log_dir) = log_dir {
        let log_dir = Path::new(log_dir);
        specs.push(AppenderSpec::rolling_file(LOG_FILE_APPENDER, None, log_dir, LOG_FILE_NAME)?);
        specs.push(AppenderSpec::rolling_file(ERR_LOG_FILE_APPENDER, Some(LevelFilter::Warn), log_dir, ERR_LOG_FILE_NAME)?);
    }
    let names = specs.iter().map(|spec| spec.name).collect::<Vec<_>>();

    let config = Config::builder()
        .appenders(specs.into_iter().map(AppenderSpec::into_appender))
        .loggers(filters.loggers(&names))
        .build(Root::builder().appenders(names.iter().map(|x| x.to_string())).build(filters.root_level()))
        .map_err(|err| LogError::Config(err.to_string()))?;

    log4rs::init_config(config).map_err(|err| LogError::AlreadyInitialized(err.to_string()))?;
    Ok(())
}
