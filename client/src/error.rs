use mychain_crypto::IdentityError;
use mychain_transport::TransportError;
use mychain_types::ValidationError;
use thiserror::Error;

/// The connection was missing, in the wrong state, or failed underneath us.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectionError {
    #[error("not connected to a node")]
    NotConnected,

    #[error("operation requires a signing connection")]
    SigningUnavailable,

    #[error("transport failure at {endpoint}: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: TransportError,
    },
}

/// Every failure a public client operation can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The chain answered the broadcast with a nonzero status code.
    #[error("transaction rejected with code {code}: {raw_log}")]
    Transaction { code: u32, raw_log: String },
}
