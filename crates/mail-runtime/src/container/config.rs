//! # Runtime Configuration
//!
//! Unified configuration for all subsystems and runtime parameters.
//!
//! Every value has a default and can be overridden from the environment:
//!
//! | Variable | Section | Meaning |
//! |----------|---------|---------|
//! | `TS_LOOKUP_LATENCY_MS` | directory | Simulated delay per directory call |
//! | `TS_SEED_IDENTITIES` | directory | `owner=key,owner=key` registered at startup |
//! | `TS_DATA_DIR` | storage | JSON mailbox directory |
//! | `TS_WATCH_INTERVAL_MS` | storage | External change polling interval |
//! | `TS_LOOKUP_ATTEMPTS` | verification | Directory attempts per verification |
//! | `TS_RETRY_BACKOFF_MS` | verification | Pause between attempts |
//! | `TS_LEGACY_IDENTITY_CHECK` | verification | `true` for substring identity matching |
//! | `TS_LOG_LEVEL` / `RUST_LOG` | logging | Filter directive |

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use ts_04_verification::{IdentityCheck, VerifierConfig};

/// Complete runtime configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Identity directory configuration.
    pub directory: DirectoryConfig,
    /// Message store configuration.
    pub storage: StorageConfig,
    /// Verifier configuration.
    pub verification: VerificationConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable could not be parsed.
    #[error("Invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },

    /// A parsed value is out of range.
    #[error("Invalid configuration: {0}")]
    OutOfRange(&'static str),
}

impl RuntimeConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(ms) = parse(&lookup, "TS_LOOKUP_LATENCY_MS")? {
            config.directory.lookup_latency_ms = ms;
        }
        if let Some(raw) = lookup("TS_SEED_IDENTITIES") {
            config.directory.seed_identities = parse_seeds(&raw)?;
        }

        if let Some(dir) = lookup("TS_DATA_DIR") {
            config.storage.data_dir = PathBuf::from(dir);
        }
        if let Some(ms) = parse(&lookup, "TS_WATCH_INTERVAL_MS")? {
            config.storage.watch_interval_ms = ms;
        }

        if let Some(attempts) = parse(&lookup, "TS_LOOKUP_ATTEMPTS")? {
            config.verification.lookup_attempts = attempts;
        }
        if let Some(ms) = parse(&lookup, "TS_RETRY_BACKOFF_MS")? {
            config.verification.retry_backoff_ms = ms;
        }
        if let Some(flag) = parse(&lookup, "TS_LEGACY_IDENTITY_CHECK")? {
            config.verification.legacy_identity_check = flag;
        }

        if let Some(level) = lookup("TS_LOG_LEVEL").or_else(|| lookup("RUST_LOG")) {
            config.logging.level = level;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject values the subsystems cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.verification.lookup_attempts == 0 {
            return Err(ConfigError::OutOfRange("lookup_attempts must be at least 1"));
        }
        if self.storage.watch_interval_ms == 0 {
            return Err(ConfigError::OutOfRange("watch_interval_ms must be positive"));
        }
        if self.storage.bus_capacity == 0 {
            return Err(ConfigError::OutOfRange("bus_capacity must be positive"));
        }
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::OutOfRange("log level must not be empty"));
        }
        Ok(())
    }

    /// Verifier settings derived from this configuration.
    pub fn verifier_config(&self) -> VerifierConfig {
        VerifierConfig {
            lookup_attempts: self.verification.lookup_attempts,
            retry_backoff: Duration::from_millis(self.verification.retry_backoff_ms),
            identity_check: if self.verification.legacy_identity_check {
                IdentityCheck::LegacySubstring
            } else {
                IdentityCheck::Exact
            },
        }
    }
}

fn parse<F, T>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(var) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { var, value }),
    }
}

fn parse_seeds(raw: &str) -> Result<Vec<(String, String)>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((owner, key)) => Ok((owner.trim().to_string(), key.trim().to_string())),
            None => Err(ConfigError::InvalidValue {
                var: "TS_SEED_IDENTITIES",
                value: pair.to_string(),
            }),
        })
        .collect()
}

/// Identity directory configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryConfig {
    /// Simulated round trip per directory call, in milliseconds.
    pub lookup_latency_ms: u64,
    /// `(owner, signer_key)` pairs registered at startup.
    pub seed_identities: Vec<(String, String)>,
}

impl DirectoryConfig {
    pub fn lookup_latency(&self) -> Duration {
        Duration::from_millis(self.lookup_latency_ms)
    }
}

/// Message store configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// Directory holding one JSON mailbox per user.
    pub data_dir: PathBuf,
    /// How often the watcher scans for external edits, in milliseconds.
    pub watch_interval_ms: u64,
    /// Events buffered per subscriber.
    pub bus_capacity: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./mail-data"),
            watch_interval_ms: 1000,
            bus_capacity: shared_bus::DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl StorageConfig {
    pub fn watch_interval(&self) -> Duration {
        Duration::from_millis(self.watch_interval_ms)
    }
}

/// Verifier configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationConfig {
    /// Directory attempts per verification.
    pub lookup_attempts: u32,
    /// Pause between transient directory failures, in milliseconds.
    pub retry_backoff_ms: u64,
    /// Match the owner anywhere in the original envelope instead of
    /// comparing it with the claimed sender.
    pub legacy_identity_check: bool,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            lookup_attempts: 3,
            retry_backoff_ms: 50,
            legacy_identity_check: false,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive.
    pub level: String,
    /// Include the event target in log lines.
    pub with_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            with_target: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = RuntimeConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.verification.lookup_attempts, 3);
        assert_eq!(config.verifier_config().identity_check, IdentityCheck::Exact);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_env_overrides() {
        let config = RuntimeConfig::from_lookup(env(&[
            ("TS_LOOKUP_LATENCY_MS", "250"),
            ("TS_DATA_DIR", "/tmp/mail"),
            ("TS_LOOKUP_ATTEMPTS", "5"),
            ("TS_LEGACY_IDENTITY_CHECK", "true"),
            ("RUST_LOG", "debug"),
            (
                "TS_SEED_IDENTITIES",
                "alice@x.com=0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa, ",
            ),
        ]))
        .unwrap();

        assert_eq!(config.directory.lookup_latency(), Duration::from_millis(250));
        assert_eq!(config.storage.data_dir, PathBuf::from("/tmp/mail"));
        assert_eq!(config.verification.lookup_attempts, 5);
        assert_eq!(
            config.verifier_config().identity_check,
            IdentityCheck::LegacySubstring
        );
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.directory.seed_identities.len(), 1);
    }

    #[test]
    fn test_ts_log_level_wins_over_rust_log() {
        let config =
            RuntimeConfig::from_lookup(env(&[("TS_LOG_LEVEL", "warn"), ("RUST_LOG", "trace")]))
                .unwrap();
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = RuntimeConfig::from_lookup(env(&[("TS_LOOKUP_ATTEMPTS", "many")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { var: "TS_LOOKUP_ATTEMPTS", .. }));

        let err = RuntimeConfig::from_lookup(env(&[("TS_LOOKUP_ATTEMPTS", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange(_)));

        let err =
            RuntimeConfig::from_lookup(env(&[("TS_SEED_IDENTITIES", "alice@x.com")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }
}
