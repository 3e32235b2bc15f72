//! Nullable key derivation: fixed key material, no BIP39 work.

use std::sync::Mutex;

use mychain_crypto::{keypair_from_secret, Identity, IdentityError, KeyDerivation};

/// Phrase handed out by [`NullDerivation::generate_secret`].
pub const NULL_PHRASE: &str = "null null null null null null null null null null null null";

/// A key derivation that builds identities from fixed secrets.
///
/// Account `i` uses the 32-byte secret scalar `[i + 1; 32]`. Phrases are accepted
/// unless they are empty or were registered with [`NullDerivation::reject`].
pub struct NullDerivation {
    account_count: u8,
    rejected: Mutex<Vec<String>>,
}

impl NullDerivation {
    pub fn with_accounts(account_count: u8) -> Self {
        Self {
            account_count,
            rejected: Mutex::new(Vec::new()),
        }
    }

    /// Every derived identity has zero accounts.
    pub fn without_accounts() -> Self {
        Self::with_accounts(0)
    }

    /// Treat `phrase` as malformed.
    pub fn reject(&self, phrase: impl Into<String>) {
        self.rejected.lock().unwrap().push(phrase.into());
    }
}

impl Default for NullDerivation {
    fn default() -> Self {
        Self::with_accounts(1)
    }
}

impl KeyDerivation for NullDerivation {
    fn derive_from_secret(&self, phrase: &str, _prefix: &str) -> Result<Identity, IdentityError> {
        if phrase.trim().is_empty() || self.rejected.lock().unwrap().iter().any(|p| p == phrase) {
            return Err(IdentityError::InvalidSecret("rejected by null derivation".into()));
        }
        let pairs = (0..self.account_count)
            .map(|i| keypair_from_secret(&[i + 1; 32]))
            .collect::<Result<Vec<_>, _>>()?;
        Identity::from_keypairs(pairs)
    }

    fn generate_secret(&self, _word_count: usize, _prefix: &str) -> Result<String, IdentityError> {
        Ok(NULL_PHRASE.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accounts_follow_configuration() {
        let identity = NullDerivation::with_accounts(3)
            .derive_from_secret("anything", "mychain")
            .unwrap();
        assert_eq!(identity.accounts().len(), 3);
        assert!(NullDerivation::without_accounts()
            .derive_from_secret("anything", "mychain")
            .unwrap()
            .accounts()
            .is_empty());
    }

    #[test]
    fn rejected_phrases_fail() {
        let d = NullDerivation::default();
        d.reject("bad phrase");
        assert!(d.derive_from_secret("bad phrase", "mychain").is_err());
        assert!(d.derive_from_secret("", "mychain").is_err());
        assert!(d.derive_from_secret(NULL_PHRASE, "mychain").is_ok());
    }
}
