//! BIP39 secret phrases and BIP32 account key derivation.
//!
//! A phrase's 64-byte BIP39 seed (empty passphrase) is the BIP32 master
//! seed. Account `i` is the secp256k1 key at `m/44'/118'/0'/0/i`, the Cosmos
//! coin type, so a phrase yields the same accounts here as in any Cosmos
//! wallet.

use bip39::Mnemonic;
use coins_bip32::xkeys::{Parent, XPriv};
use k256::ecdsa::SigningKey;
use zeroize::Zeroizing;

use crate::error::IdentityError;
use crate::keys::KeyPair;

/// Word count of freshly generated phrases (128 bits of entropy).
pub const DEFAULT_WORD_COUNT: usize = 12;

const HARDENED: u32 = 0x8000_0000;

/// `m/44'/118'/0'/0`; the account index is the last, unhardened step.
const ACCOUNT_PARENT_PATH: [u32; 4] = [44 | HARDENED, 118 | HARDENED, HARDENED, 0];

/// Generate a fresh BIP39 phrase of `word_count` words from the OS CSPRNG.
pub fn generate_mnemonic(word_count: usize) -> Result<String, IdentityError> {
    let entropy_len = match word_count {
        12 | 15 | 18 | 21 | 24 => word_count * 4 / 3,
        other => return Err(IdentityError::UnsupportedWordCount(other)),
    };
    let mut entropy = Zeroizing::new([0u8; 32]);
    getrandom::getrandom(&mut entropy[..entropy_len])
        .map_err(|e| IdentityError::Entropy(e.to_string()))?;
    let mnemonic = Mnemonic::from_entropy(&entropy[..entropy_len])
        .map_err(|e| IdentityError::InvalidSecret(e.to_string()))?;
    Ok(mnemonic.to_string())
}

/// Validate that a phrase is a well-formed BIP39 mnemonic (word list and checksum).
pub fn validate_mnemonic(phrase: &str) -> bool {
    Mnemonic::parse_normalized(phrase).is_ok()
}

/// Parse a phrase and compute its BIP39 seed.
pub(crate) fn seed_from_mnemonic(phrase: &str) -> Result<Zeroizing<[u8; 64]>, IdentityError> {
    let mnemonic = Mnemonic::parse_normalized(phrase)
        .map_err(|e| IdentityError::InvalidSecret(e.to_string()))?;
    Ok(Zeroizing::new(mnemonic.to_seed_normalized("")))
}

/// The extended key every account is a child of.
pub(crate) fn account_parent(seed: &[u8; 64]) -> Result<XPriv, IdentityError> {
    let mut key = XPriv::root_from_seed(seed, None).map_err(derivation_error)?;
    for index in ACCOUNT_PARENT_PATH {
        key = key.derive_child(index).map_err(derivation_error)?;
    }
    Ok(key)
}

/// Derive the key pair of account `index` under `parent`.
pub(crate) fn derive_account_key(parent: &XPriv, index: u32) -> Result<KeyPair, IdentityError> {
    if index >= HARDENED {
        return Err(IdentityError::Derivation(format!(
            "account index {index} is out of range"
        )));
    }
    let child = parent.derive_child(index).map_err(derivation_error)?;
    let key: &SigningKey = child.as_ref();
    KeyPair::from_signing_key(key.clone())
}

fn derivation_error(e: coins_bip32::Bip32Error) -> IdentityError {
    IdentityError::Derivation(e.to_string())
}
