//! Secret phrases and the signing identity derived from them.

use mychain_crypto::{HdDerivation, Identity, IdentityError, KeyDerivation, DEFAULT_WORD_COUNT};
use mychain_types::{WalletAddress, ADDRESS_HRP};
use tracing::debug;

/// Generate a fresh 12-word secret phrase for the `mychain` prefix.
pub fn generate_mnemonic() -> Result<String, IdentityError> {
    HdDerivation::default().generate_secret(DEFAULT_WORD_COUNT, ADDRESS_HRP)
}

/// Derives identities through a [`KeyDerivation`] and exposes their active
/// account.
///
/// Only the first derived account is ever the active sender; further
/// accounts are listed but not addressable as signers.
#[derive(Debug, Default)]
pub struct IdentityProvider<D = HdDerivation> {
    derivation: D,
}

impl<D: KeyDerivation> IdentityProvider<D> {
    pub fn new(derivation: D) -> Self {
        Self { derivation }
    }

    pub fn derivation(&self) -> &D {
        &self.derivation
    }

    /// Deterministically derive the identity behind `phrase`.
    pub fn from_secret(&self, phrase: &str, prefix: &str) -> Result<Identity, IdentityError> {
        let identity = self.derivation.derive_from_secret(phrase, prefix)?;
        debug!(
            accounts = self.derivation.list_accounts(&identity).len(),
            "identity loaded"
        );
        Ok(identity)
    }

    /// A fresh 12-word phrase accepted by [`IdentityProvider::from_secret`].
    pub fn generate_secret(&self, prefix: &str) -> Result<String, IdentityError> {
        self.derivation.generate_secret(DEFAULT_WORD_COUNT, prefix)
    }

    /// Address of the first derived account.
    pub fn primary_address(&self, identity: &Identity) -> Result<WalletAddress, IdentityError> {
        self.derivation
            .list_accounts(identity)
            .first()
            .map(|account| account.address.clone())
            .ok_or(IdentityError::NoAccounts)
    }
}
