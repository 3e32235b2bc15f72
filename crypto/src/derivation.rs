//! The key-derivation seam consumed by the client.

use mychain_types::ADDRESS_HRP;
use tracing::debug;

use crate::address::is_valid_hrp;
use crate::error::IdentityError;
use crate::identity::{Account, Identity};
use crate::mnemonic::{account_parent, derive_account_key, generate_mnemonic, seed_from_mnemonic};

/// Derives signing identities from secret phrases.
pub trait KeyDerivation: Send + Sync {
    /// Deterministically derive an identity from `phrase`.
    fn derive_from_secret(&self, phrase: &str, prefix: &str) -> Result<Identity, IdentityError>;

    /// Produce a fresh phrase of `word_count` words suitable for
    /// [`KeyDerivation::derive_from_secret`].
    fn generate_secret(&self, word_count: usize, prefix: &str) -> Result<String, IdentityError>;

    /// Accounts of `identity`, in derivation order.
    fn list_accounts<'a>(&self, identity: &'a Identity) -> &'a [Account] {
        identity.accounts()
    }
}

/// BIP39 + BIP32 derivation of `account_count` secp256k1 accounts along
/// `m/44'/118'/0'/0/i`.
#[derive(Clone, Debug)]
pub struct HdDerivation {
    account_count: u32,
}

impl HdDerivation {
    pub fn new(account_count: u32) -> Self {
        Self { account_count }
    }

    pub fn account_count(&self) -> u32 {
        self.account_count
    }
}

impl Default for HdDerivation {
    fn default() -> Self {
        Self::new(1)
    }
}

fn check_prefix(prefix: &str) -> Result<(), IdentityError> {
    if !is_valid_hrp(prefix) || prefix != ADDRESS_HRP {
        return Err(IdentityError::InvalidPrefix(prefix.to_string()));
    }
    Ok(())
}

impl KeyDerivation for HdDerivation {
    fn derive_from_secret(&self, phrase: &str, prefix: &str) -> Result<Identity, IdentityError> {
        check_prefix(prefix)?;
        let seed = seed_from_mnemonic(phrase)?;
        let parent = account_parent(&seed)?;
        let pairs = (0..self.account_count)
            .map(|index| derive_account_key(&parent, index))
            .collect::<Result<Vec<_>, _>>()?;
        let identity = Identity::from_keypairs(pairs)?;
        debug!(accounts = identity.accounts().len(), "derived identity");
        Ok(identity)
    }

    fn generate_secret(&self, word_count: usize, prefix: &str) -> Result<String, IdentityError> {
        check_prefix(prefix)?;
        generate_mnemonic(word_count)
    }
}
