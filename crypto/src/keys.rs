//! secp256k1 key pairs.

use k256::ecdsa::SigningKey;
use mychain_types::{PublicKey, PUBLIC_KEY_LEN};

use crate::error::IdentityError;

/// A secp256k1 signing key and its compressed public key.
///
/// The signing key zeroizes itself on drop.
pub struct KeyPair {
    pub public: PublicKey,
    pub secret: SigningKey,
}

impl KeyPair {
    pub fn from_signing_key(secret: SigningKey) -> Result<Self, IdentityError> {
        let point = secret.verifying_key().to_encoded_point(true);
        let bytes: [u8; PUBLIC_KEY_LEN] = point
            .as_bytes()
            .try_into()
            .map_err(|_| IdentityError::Derivation("public key is not compressed".into()))?;
        Ok(Self {
            public: PublicKey(bytes),
            secret,
        })
    }
}

/// Build a key pair from a raw 32-byte secret scalar.
///
/// Fails for zero or for values not below the curve order.
pub fn keypair_from_secret(secret: &[u8; 32]) -> Result<KeyPair, IdentityError> {
    let key = SigningKey::from_slice(secret)
        .map_err(|e| IdentityError::Derivation(e.to_string()))?;
    KeyPair::from_signing_key(key)
}
