//! Argon2id encrypted keystore for secret phrases.
//!
//! Encrypts a secret phrase with a user-chosen password:
//! 1. Argon2id derives a 32-byte encryption key from the password + random salt
//! 2. AES-256-GCM encrypts the phrase with a random nonce
//! 3. The result is stored as a JSON file with all parameters for future decryption

use std::path::Path;

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use argon2::{Algorithm, Argon2, Params, Version};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use zeroize::Zeroizing;

/// Argon2id parameters: 64 MB memory, 3 iterations, 1 lane.
const ARGON2_MEMORY_KIB: u32 = 65536;
const ARGON2_ITERATIONS: u32 = 3;
const ARGON2_PARALLELISM: u32 = 1;
const KEY_LEN: usize = 32;

/// Upper bounds accepted from a keystore file: 1 GiB, 16 passes, 8 lanes.
const MAX_MEMORY_KIB: u32 = 1 << 20;
const MAX_ITERATIONS: u32 = 16;
const MAX_PARALLELISM: u32 = 8;

const SALT_LEN: usize = 32;
/// AES-GCM nonce length in bytes (96 bits).
const NONCE_LEN: usize = 12;

const KEYSTORE_VERSION: u32 = 1;
const CIPHER: &str = "aes-256-gcm";
const KDF: &str = "argon2id";

#[derive(Debug, Error)]
pub enum KeystoreError {
    #[error("unsupported keystore version {0}")]
    UnsupportedVersion(u32),

    #[error("unsupported {kind} {name:?}")]
    UnsupportedAlgorithm { kind: &'static str, name: String },

    #[error("malformed keystore field `{field}`")]
    Malformed { field: &'static str },

    #[error("kdf parameter `{name}` = {value} exceeds the limit of {limit}")]
    KdfLimit {
        name: &'static str,
        value: u32,
        limit: u32,
    },

    #[error("decryption failed: wrong password or corrupted data")]
    Decrypt,

    #[error("key derivation failed: {0}")]
    Kdf(String),

    #[error("encryption failed: {0}")]
    Cipher(String),

    #[error("entropy source failed: {0}")]
    Entropy(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// The keystore file, serializable to/from JSON.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeystoreFile {
    pub version: u32,
    pub crypto: KeystoreCrypto,
}

/// All parameters needed to decrypt the phrase again.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeystoreCrypto {
    pub cipher: String,
    pub kdf: String,
    pub kdf_params: KdfParams,
    /// Hex-encoded salt.
    pub salt: String,
    /// Hex-encoded nonce.
    pub nonce: String,
    /// Hex-encoded ciphertext (phrase plus GCM tag).
    pub ciphertext: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    pub memory: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

/// Encrypt `phrase` under `password`.
pub fn encrypt_keystore(phrase: &str, password: &str) -> Result<KeystoreFile, KeystoreError> {
    let mut salt = [0u8; SALT_LEN];
    let mut nonce_bytes = [0u8; NONCE_LEN];
    getrandom::getrandom(&mut salt).map_err(|e| KeystoreError::Entropy(e.to_string()))?;
    getrandom::getrandom(&mut nonce_bytes).map_err(|e| KeystoreError::Entropy(e.to_string()))?;

    let kdf_params = KdfParams {
        memory: ARGON2_MEMORY_KIB,
        iterations: ARGON2_ITERATIONS,
        parallelism: ARGON2_PARALLELISM,
    };
    let key = derive_key(password, &salt, &kdf_params)?;
    let cipher = Aes256Gcm::new_from_slice(&key[..])
        .map_err(|e| KeystoreError::Cipher(e.to_string()))?;
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce_bytes), phrase.as_bytes())
        .map_err(|e| KeystoreError::Cipher(e.to_string()))?;

    Ok(KeystoreFile {
        version: KEYSTORE_VERSION,
        crypto: KeystoreCrypto {
            cipher: CIPHER.to_string(),
            kdf: KDF.to_string(),
            kdf_params,
            salt: hex::encode(salt),
            nonce: hex::encode(nonce_bytes),
            ciphertext: hex::encode(ciphertext),
        },
    })
}

/// Decrypt a keystore, returning the secret phrase.
pub fn decrypt_keystore(
    keystore: &KeystoreFile,
    password: &str,
) -> Result<Zeroizing<String>, KeystoreError> {
    if keystore.version != KEYSTORE_VERSION {
        return Err(KeystoreError::UnsupportedVersion(keystore.version));
    }
    let crypto = &keystore.crypto;
    if crypto.cipher != CIPHER {
        return Err(KeystoreError::UnsupportedAlgorithm {
            kind: "cipher",
            name: crypto.cipher.clone(),
        });
    }
    if crypto.kdf != KDF {
        return Err(KeystoreError::UnsupportedAlgorithm {
            kind: "kdf",
            name: crypto.kdf.clone(),
        });
    }

    let salt = decode_field("salt", &crypto.salt)?;
    let nonce_bytes = decode_field("nonce", &crypto.nonce)?;
    let ciphertext = decode_field("ciphertext", &crypto.ciphertext)?;
    if nonce_bytes.len() != NONCE_LEN {
        return Err(KeystoreError::Malformed { field: "nonce" });
    }

    check_kdf_limits(&crypto.kdf_params)?;
    let key = derive_key(password, &salt, &crypto.kdf_params)?;
    let cipher = Aes256Gcm::new_from_slice(&key[..])
        .map_err(|e| KeystoreError::Cipher(e.to_string()))?;
    let plaintext = Zeroizing::new(
        cipher
            .decrypt(Nonce::from_slice(&nonce_bytes), ciphertext.as_slice())
            .map_err(|_| KeystoreError::Decrypt)?,
    );
    let phrase = std::str::from_utf8(&plaintext).map_err(|_| KeystoreError::Decrypt)?;
    Ok(Zeroizing::new(phrase.to_string()))
}

/// Save a keystore as pretty-printed JSON.
pub fn save_keystore(keystore: &KeystoreFile, path: &Path) -> Result<(), KeystoreError> {
    let json = serde_json::to_string_pretty(keystore)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Load a keystore from a JSON file.
pub fn load_keystore(path: &Path) -> Result<KeystoreFile, KeystoreError> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

fn check_kdf_limits(params: &KdfParams) -> Result<(), KeystoreError> {
    for (name, value, limit) in [
        ("memory", params.memory, MAX_MEMORY_KIB),
        ("iterations", params.iterations, MAX_ITERATIONS),
        ("parallelism", params.parallelism, MAX_PARALLELISM),
    ] {
        if value > limit {
            return Err(KeystoreError::KdfLimit { name, value, limit });
        }
    }
    Ok(())
}

fn derive_key(
    password: &str,
    salt: &[u8],
    params: &KdfParams,
) -> Result<Zeroizing<[u8; KEY_LEN]>, KeystoreError> {
    let params = Params::new(
        params.memory,
        params.iterations,
        params.parallelism,
        Some(KEY_LEN),
    )
    .map_err(|e| KeystoreError::Kdf(e.to_string()))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut output = Zeroizing::new([0u8; KEY_LEN]);
    argon2
        .hash_password_into(password.as_bytes(), salt, &mut output[..])
        .map_err(|e| KeystoreError::Kdf(e.to_string()))?;
    Ok(output)
}

fn decode_field(field: &'static str, value: &str) -> Result<Vec<u8>, KeystoreError> {
    hex::decode(value).map_err(|_| KeystoreError::Malformed { field })
}
