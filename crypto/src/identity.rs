//! Signing identity: key material plus the accounts derived from it.

use std::fmt;

use k256::ecdsa::SigningKey;
use mychain_types::{PublicKey, WalletAddress};

use crate::address::derive_address;
use crate::error::IdentityError;
use crate::keys::KeyPair;

/// One derived account.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Account {
    pub address: WalletAddress,
    pub public_key: PublicKey,
}

/// Secret key material and the ordered list of accounts derived from it.
///
/// Only the first account is ever used as the active sender. The signing
/// keys are zeroized on drop and never printed.
pub struct Identity {
    accounts: Vec<Account>,
    keys: Vec<SigningKey>,
}

impl Identity {
    /// Build an identity from derived key pairs, in derivation order.
    pub fn from_keypairs(pairs: Vec<KeyPair>) -> Result<Self, IdentityError> {
        let mut accounts = Vec::with_capacity(pairs.len());
        let mut keys = Vec::with_capacity(pairs.len());
        for pair in pairs {
            let address = derive_address(&pair.public)
                .map_err(|e| IdentityError::Derivation(e.to_string()))?;
            accounts.push(Account {
                address,
                public_key: pair.public,
            });
            keys.push(pair.secret);
        }
        Ok(Self { accounts, keys })
    }

    /// An identity with no derivable account.
    pub fn empty() -> Self {
        Self {
            accounts: Vec::new(),
            keys: Vec::new(),
        }
    }

    /// All derived accounts, in derivation order.
    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    /// The first derived account.
    pub fn primary(&self) -> Result<&Account, IdentityError> {
        self.accounts.first().ok_or(IdentityError::NoAccounts)
    }

    /// Address of the first derived account.
    pub fn primary_address(&self) -> Result<&WalletAddress, IdentityError> {
        Ok(&self.primary()?.address)
    }

    /// Signing key of the first derived account, for transports that sign
    /// transactions locally.
    pub fn primary_signing_key(&self) -> Result<&SigningKey, IdentityError> {
        self.keys.first().ok_or(IdentityError::NoAccounts)
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("accounts", &self.accounts)
            .finish_non_exhaustive()
    }
}
