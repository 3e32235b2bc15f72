//! Account address type and the fixed-shape address predicate.
//!
//! Addresses are bech32 strings with the human-readable part `mychain`:
//! `mychain` + `1` + 32 data characters (20-byte account id) + 6 checksum
//! characters, 46 characters in total.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;

/// Human-readable part of every account address.
pub const ADDRESS_HRP: &str = "mychain";

/// Human-readable part followed by the bech32 separator.
pub const ADDRESS_PREFIX: &str = "mychain1";

/// Total length of an account address in characters.
pub const ADDRESS_LEN: usize = 46;

/// Returns `true` iff `address` starts with [`ADDRESS_PREFIX`] and is exactly
/// [`ADDRESS_LEN`] characters long.
///
/// Total over all strings: empty and non-ASCII input simply yield `false`.
/// This is a shape check only; checksum verification lives in
/// `mychain_crypto::decode_address`.
pub fn is_valid_address(address: &str) -> bool {
    address.starts_with(ADDRESS_PREFIX) && address.chars().count() == ADDRESS_LEN
}

/// A validated MyChain account address.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WalletAddress(String);

impl WalletAddress {
    /// Parse a raw string, rejecting anything [`is_valid_address`] refuses.
    pub fn parse(raw: impl Into<String>) -> Result<Self, ValidationError> {
        Self::parse_field("address", raw)
    }

    /// Like [`WalletAddress::parse`] but reports `field` in the error.
    pub fn parse_field(
        field: &'static str,
        raw: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let s = raw.into();
        if s.is_empty() {
            return Err(ValidationError::EmptyField { field });
        }
        if !is_valid_address(&s) {
            return Err(ValidationError::InvalidAddress { field, value: s });
        }
        Ok(Self(s))
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for WalletAddress {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl From<WalletAddress> for String {
    fn from(addr: WalletAddress) -> Self {
        addr.0
    }
}

impl AsRef<str> for WalletAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for WalletAddress {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for WalletAddress {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
