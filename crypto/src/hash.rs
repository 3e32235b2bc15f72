//! SHA-256 / RIPEMD-160 hashing and account id derivation.

use mychain_types::PUBLIC_KEY_LEN;
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// Length of an account id in bytes.
pub const ACCOUNT_ID_LEN: usize = 20;

/// Compute the SHA-256 digest of arbitrary data.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// Compute the RIPEMD-160 digest of arbitrary data.
pub fn ripemd160(data: &[u8]) -> [u8; ACCOUNT_ID_LEN] {
    Ripemd160::digest(data).into()
}

/// The 20-byte account id of a compressed secp256k1 public key:
/// `ripemd160(sha256(key))`.
pub fn account_id(public_key: &[u8; PUBLIC_KEY_LEN]) -> [u8; ACCOUNT_ID_LEN] {
    ripemd160(&sha256(public_key))
}
