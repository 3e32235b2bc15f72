//! Public key material of a derived account.

/// Length of a SEC1-compressed secp256k1 public key.
pub const PUBLIC_KEY_LEN: usize = 33;

/// A SEC1-compressed secp256k1 public key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PublicKey(pub [u8; PUBLIC_KEY_LEN]);

impl PublicKey {
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LEN] {
        &self.0
    }
}
