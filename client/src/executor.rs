//! Sign, broadcast, classify.

use mychain_transport::NodeTransport;
use mychain_types::{ChainMessage, TxOptions, ValidationError, WalletAddress};
use tracing::{debug, info, warn};

use crate::connection::ConnectionManager;
use crate::error::{ClientError, ConnectionError};

/// Broadcasts built messages through the signing connection of a
/// [`ConnectionManager`].
///
/// Each call makes at most one broadcast attempt. Nothing is retried here:
/// the chain does not guarantee the message types are idempotent.
pub struct TransactionExecutor<'a, T: NodeTransport> {
    connection: &'a ConnectionManager<T>,
}

impl<'a, T: NodeTransport> TransactionExecutor<'a, T> {
    pub fn new(connection: &'a ConnectionManager<T>) -> Self {
        Self { connection }
    }

    /// Sign `message` as `signer`, broadcast it and return the transaction
    /// hash once the chain has accepted it (status code 0).
    ///
    /// `signer` must be the primary address of the identity bound to the
    /// signing connection, and the message must be signed by that account.
    /// A nonzero status code becomes [`ClientError::Transaction`]; its hash
    /// is dropped.
    pub async fn execute(
        &self,
        message: ChainMessage,
        signer: &WalletAddress,
        options: &TxOptions,
    ) -> Result<String, ClientError> {
        let session = self.connection.signing_session()?;
        let active = session.identity.primary_address()?;
        if active != signer {
            return Err(mismatch(active, signer));
        }
        if message.signer() != signer {
            return Err(mismatch(signer, message.signer()));
        }

        debug!(
            envelope = %message.to_envelope(),
            fee = options.fee.as_str(),
            "broadcasting"
        );
        let result = self
            .connection
            .transport()
            .sign_and_broadcast(
                &session.handle,
                signer.as_str(),
                std::slice::from_ref(&message),
                &options.fee,
                &options.memo,
            )
            .await
            .map_err(|source| ConnectionError::Transport {
                endpoint: session.endpoint.clone(),
                source,
            })?;

        if !result.is_success() {
            warn!(
                message = message.name(),
                code = result.code,
                raw_log = %result.raw_log,
                "transaction rejected"
            );
            return Err(ClientError::Transaction {
                code: result.code,
                raw_log: result.raw_log,
            });
        }
        info!(
            message = message.name(),
            hash = %result.transaction_hash,
            "transaction accepted"
        );
        Ok(result.transaction_hash)
    }
}

fn mismatch(expected: &WalletAddress, actual: &WalletAddress) -> ClientError {
    ValidationError::SignerMismatch {
        expected: expected.to_string(),
        actual: actual.to_string(),
    }
    .into()
}
