//! Cryptographic primitives for the MyChain client.
//!
//! - **BIP39** secret phrases (generation and validation)
//! - **BIP32** secp256k1 account keys along the Cosmos path `m/44'/118'/0'/0/i`
//! - **RIPEMD-160(SHA-256)** account ids and **bech32** addresses with the
//!   `mychain` prefix
//! - [`Identity`], the signing key material plus its derived accounts, and the
//!   [`KeyDerivation`] seam through which the client obtains one

pub mod address;
pub mod derivation;
pub mod error;
pub mod hash;
pub mod identity;
pub mod keys;
pub mod mnemonic;

pub use address::{
    decode_address, decode_bech32, derive_address, encode_address, encode_bech32, is_valid_hrp,
};
pub use derivation::{HdDerivation, KeyDerivation};
pub use error::IdentityError;
pub use hash::{account_id, ripemd160, sha256};
pub use identity::{Account, Identity};
pub use keys::{keypair_from_secret, KeyPair};
pub use mnemonic::{generate_mnemonic, validate_mnemonic, DEFAULT_WORD_COUNT};
