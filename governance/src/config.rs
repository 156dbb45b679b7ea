//! Ledger configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tally_types::{Address, LedgerParams, Weight};
use tally_utils::LogFormat;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Configuration for a voting ledger instance.
///
/// Can be loaded from a TOML file via [`LedgerConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Address allowed to assign weights and pause voting.
    #[serde(default = "default_owner")]
    pub owner: Address,

    /// Minimum total weighted votes before a proposal can be counted.
    #[serde(default = "default_quorum_threshold")]
    pub quorum_threshold: u64,

    /// Weight of addresses with no explicit assignment.
    #[serde(default = "default_weight")]
    pub default_weight: u64,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_owner() -> Address {
    Address::new("owner")
}

fn default_quorum_threshold() -> u64 {
    2
}

fn default_weight() -> u64 {
    1
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl LedgerConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn params(&self) -> LedgerParams {
        LedgerParams {
            quorum_threshold: Weight::new(u128::from(self.quorum_threshold)),
            default_weight: Weight::new(u128::from(self.default_weight)),
        }
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            owner: default_owner(),
            quorum_threshold: default_quorum_threshold(),
            default_weight: default_weight(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
        }
    }
}
