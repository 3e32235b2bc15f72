//! Read-only chain queries.

use mychain_transport::NodeTransport;
use mychain_types::amount::is_valid_denom;
use mychain_types::{ValidationError, WalletAddress};
use tracing::debug;

use crate::connection::ConnectionManager;
use crate::error::{ClientError, ConnectionError};

/// Queries through the read-only handle of a [`ConnectionManager`].
///
/// Works in both the read-only and the signing state.
pub struct ChainReader<'a, T: NodeTransport> {
    connection: &'a ConnectionManager<T>,
}

impl<'a, T: NodeTransport> ChainReader<'a, T> {
    pub fn new(connection: &'a ConnectionManager<T>) -> Self {
        Self { connection }
    }

    /// Latest block height.
    pub async fn height(&self) -> Result<u64, ClientError> {
        let session = self.connection.read_session()?;
        let height = self
            .connection
            .transport()
            .height(&session.handle)
            .await
            .map_err(|source| ConnectionError::Transport {
                endpoint: session.endpoint,
                source,
            })?;
        debug!(height, "queried height");
        Ok(height)
    }

    /// Balance of `address` in `denom` as a decimal string; `"0"` when the
    /// account holds none.
    ///
    /// The address is validated before the connection is looked at.
    pub async fn balance(&self, address: &str, denom: &str) -> Result<String, ClientError> {
        let address = WalletAddress::parse(address)?;
        if !is_valid_denom(denom) {
            return Err(ValidationError::InvalidDenom {
                value: denom.to_string(),
            }
            .into());
        }
        let session = self.connection.read_session()?;
        let amount = self
            .connection
            .transport()
            .balance(&session.handle, address.as_str(), denom)
            .await
            .map_err(|source| ConnectionError::Transport {
                endpoint: session.endpoint,
                source,
            })?;
        debug!(%address, %amount, "queried balance");
        Ok(amount.value)
    }
}
