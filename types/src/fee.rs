//! Fee policy and per-transaction options.

use serde::{Deserialize, Serialize};

use crate::amount::Amount;

/// How the fee for a broadcast is determined.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum FeeMode {
    /// Simulate the transaction and let the transport derive gas and fee
    /// from the connection's gas price.
    #[default]
    Auto,
    /// Pay exactly `amount` with an explicit gas limit.
    Fixed {
        #[serde(flatten)]
        amount: Amount,
        gas_limit: u64,
    },
}

impl FeeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeeMode::Auto => "auto",
            FeeMode::Fixed { .. } => "fixed",
        }
    }
}

/// Options attached to a single broadcast.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOptions {
    #[serde(default)]
    pub fee: FeeMode,
    /// Free-text annotation stored with the transaction.
    #[serde(default)]
    pub memo: String,
}

impl TxOptions {
    /// Automatic fee with the given memo.
    pub fn with_memo(memo: impl Into<String>) -> Self {
        Self {
            fee: FeeMode::Auto,
            memo: memo.into(),
        }
    }
}
