use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;
use tracing::Level;

use crate::constants::{
    DEFAULT_IDLE_THRESHOLD, DEFAULT_POLL_INTERVAL, DEFAULT_SERVER, DEFAULT_STATE_FILE,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("poll interval ({poll:?}) must be shorter than the idle threshold ({idle:?})")]
    PollNotShorterThanIdle { poll: Duration, idle: Duration },
    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),
    #[error("server address must start with http:// or https://, got {0:?}")]
    InvalidServer(String),
}

#[derive(Debug, Clone, Parser)]
#[command(
    name = "dmnt-sync",
    version,
    about = "Edit dmnt cheat code and its disassembly side by side."
)]
pub struct Cli {
    /// Base URL of the translation service.
    #[arg(long, default_value = DEFAULT_SERVER)]
    pub server: String,

    /// Quiet period before the active pane is translated, in milliseconds.
    #[arg(long = "idle-ms", default_value_t = DEFAULT_IDLE_THRESHOLD.as_millis() as u64)]
    pub idle_ms: u64,

    /// Idle poll cadence, in milliseconds.
    #[arg(long = "poll-ms", default_value_t = DEFAULT_POLL_INTERVAL.as_millis() as u64)]
    pub poll_ms: u64,

    /// Per-request timeout, in seconds.
    #[arg(long = "timeout-secs", default_value_t = 10)]
    pub timeout_secs: u64,

    /// Where pane contents are saved between sessions.
    #[arg(long = "state-file", default_value = DEFAULT_STATE_FILE)]
    pub state_file: PathBuf,

    /// Keep the session in memory only.
    #[arg(long = "no-persist")]
    pub no_persist: bool,

    /// Import a cheat file into the cheat pane at start-up.
    #[arg(long)]
    pub source: Option<PathBuf>,

    /// Import a disassembly file into the disassembly pane at start-up.
    #[arg(long)]
    pub derived: Option<PathBuf>,

    /// Directory that Ctrl+S writes into.
    #[arg(long = "export-dir", default_value = ".")]
    pub export_dir: PathBuf,

    /// Do not load the example cheats into an empty session.
    #[arg(long = "no-example")]
    pub no_example: bool,

    /// Maximum log level written to the debug log.
    #[arg(long = "log-level", default_value_t = Level::DEBUG)]
    pub log_level: Level,
}

#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub server: String,
    pub idle_threshold: Duration,
    pub poll_interval: Duration,
    pub timeout: Duration,
    pub state_file: Option<PathBuf>,
    pub source_import: Option<PathBuf>,
    pub derived_import: Option<PathBuf>,
    pub export_dir: PathBuf,
    pub seed_example: bool,
    pub log_level: Level,
}

impl TryFrom<Cli> for SyncConfig {
    type Error = ConfigError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let config = Self {
            server: cli.server,
            idle_threshold: Duration::from_millis(cli.idle_ms),
            poll_interval: Duration::from_millis(cli.poll_ms),
            timeout: Duration::from_secs(cli.timeout_secs),
            state_file: (!cli.no_persist).then_some(cli.state_file),
            source_import: cli.source,
            derived_import: cli.derived,
            export_dir: cli.export_dir,
            seed_example: !cli.no_example,
            log_level: cli.log_level,
        };
        config.validate()?;
        Ok(config)
    }
}

impl SyncConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval.is_zero() {
            return Err(ConfigError::ZeroDuration("poll interval"));
        }
        if self.idle_threshold.is_zero() {
            return Err(ConfigError::ZeroDuration("idle threshold"));
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::ZeroDuration("request timeout"));
        }
        if self.poll_interval >= self.idle_threshold {
            return Err(ConfigError::PollNotShorterThanIdle {
                poll: self.poll_interval,
                idle: self.idle_threshold,
            });
        }
        if !(self.server.starts_with("http://") || self.server.starts_with("https://")) {
            return Err(ConfigError::InvalidServer(self.server.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<SyncConfig, ConfigError> {
        let mut argv = vec!["dmnt-sync"];
        argv.extend_from_slice(args);
        SyncConfig::try_from(Cli::parse_from(argv))
    }

    #[test]
    fn defaults_are_valid() {
        let config = parse(&[]).unwrap();
        assert_eq!(config.idle_threshold, DEFAULT_IDLE_THRESHOLD);
        assert_eq!(config.poll_interval, DEFAULT_POLL_INTERVAL);
        assert_eq!(config.state_file, Some(PathBuf::from(DEFAULT_STATE_FILE)));
        assert!(config.seed_example);
    }

    #[test]
    fn poll_must_be_shorter_than_idle() {
        let err = parse(&["--idle-ms", "500", "--poll-ms", "500"]).unwrap_err();
        assert!(matches!(err, ConfigError::PollNotShorterThanIdle { .. }));
    }

    #[test]
    fn zero_poll_is_rejected() {
        let err = parse(&["--poll-ms", "0"]).unwrap_err();
        assert_eq!(err, ConfigError::ZeroDuration("poll interval"));
    }

    #[test]
    fn server_scheme_is_checked() {
        let err = parse(&["--server", "localhost:5000"]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidServer(_)));
    }

    #[test]
    fn no_persist_drops_state_file() {
        let config = parse(&["--no-persist", "--no-example"]).unwrap();
        assert!(config.state_file.is_none());
        assert!(!config.seed_example);
    }
}
