//! Validation errors raised before anything is sent to the chain.

use thiserror::Error;

/// A domain argument was rejected locally.
///
/// Every variant carries the offending field or value so callers can
/// branch on it without parsing the message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("required field `{field}` is empty")]
    EmptyField { field: &'static str },

    #[error("field `{field}` is not a valid address: {value:?}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("amount {value:?} is not a non-negative integer")]
    InvalidAmount { value: String },

    #[error("invalid denom {value:?}")]
    InvalidDenom { value: String },

    #[error("commission {value:?} must be a decimal between 0 and 1")]
    InvalidCommission { value: String },

    #[error("invalid gas price {value:?}")]
    InvalidGasPrice { value: String },

    #[error("signer {actual} does not match the connected account {expected}")]
    SignerMismatch { expected: String, actual: String },
}
