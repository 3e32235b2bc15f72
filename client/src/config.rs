//! Client configuration with TOML file support.

use std::path::{Path, PathBuf};

use mychain_types::{Amount, FeeMode, GasPrice, ValidationError, DEFAULT_DENOM};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::logging::LogFormat;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(#[from] ValidationError),

    #[error("invalid config: account_count must be at least 1")]
    NoAccounts,
}

/// Configuration for a [`crate::MyChainClient`].
///
/// Every field has a default, so an empty file is a valid configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Node RPC endpoint.
    pub rpc_endpoint: String,

    pub chain_id: String,

    /// Denom used when an action does not name one.
    pub denom: String,

    /// Gas price bound to every signing connection.
    pub gas_price: GasPrice,

    /// Fee policy applied to every broadcast.
    pub fee: FeeMode,

    pub memos: ActionMemos,

    /// Accounts derived per identity; only the first one signs. At least 1.
    pub account_count: u32,

    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    pub log_level: String,
}

/// Memo attached to each domain action's transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionMemos {
    pub create_user: String,
    pub transfer_tokens: String,
    pub mint_tokens: String,
    pub register_miner: String,
}

impl Default for ActionMemos {
    fn default() -> Self {
        Self {
            create_user: "Create new user".to_string(),
            transfer_tokens: "Transfer tokens".to_string(),
            mint_tokens: "Mint tokens".to_string(),
            register_miner: "Register as miner".to_string(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            rpc_endpoint: "http://localhost:26657".to_string(),
            chain_id: "mychain-1".to_string(),
            denom: DEFAULT_DENOM.to_string(),
            gas_price: GasPrice {
                amount: "0.1".to_string(),
                denom: "umychain".to_string(),
            },
            fee: FeeMode::Auto,
            memos: ActionMemos::default(),
            account_count: 1,
            log_format: LogFormat::Human,
            log_level: "info".to_string(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.account_count == 0 {
            return Err(ConfigError::NoAccounts);
        }
        if let FeeMode::Fixed { amount, .. } = &self.fee {
            Amount::new(amount.value.clone(), amount.denom.clone())?;
        }
        if !mychain_types::amount::is_valid_denom(&self.denom) {
            return Err(ValidationError::InvalidDenom {
                value: self.denom.clone(),
            }
            .into());
        }
        Ok(())
    }
}
