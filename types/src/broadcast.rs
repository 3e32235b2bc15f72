//! The chain's synchronous answer to a broadcast.

use serde::{Deserialize, Serialize};

/// Result of a sign-and-broadcast round trip.
///
/// `code == 0` means the chain accepted the transaction; any other value is
/// a rejection whose reason is in `raw_log`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastResult {
    pub code: u32,
    #[serde(rename = "txhash")]
    pub transaction_hash: String,
    #[serde(default)]
    pub raw_log: String,
}

impl BroadcastResult {
    pub fn is_success(&self) -> bool {
        self.code == 0
    }
}
