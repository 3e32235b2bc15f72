use thiserror::Error;

/// Errors arising while deriving or using a signing identity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("invalid secret phrase: {0}")]
    InvalidSecret(String),

    #[error("unsupported word count {0}, expected 12, 15, 18, 21 or 24")]
    UnsupportedWordCount(usize),

    #[error("invalid address prefix {0:?}")]
    InvalidPrefix(String),

    #[error("key derivation failed: {0}")]
    Derivation(String),

    #[error("identity has no derivable account")]
    NoAccounts,

    #[error("entropy source failed: {0}")]
    Entropy(String),
}
