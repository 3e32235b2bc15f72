//! Bech32 account addresses.
//!
//! Address format: `mychain` + `1` + base32(account_id, 32 chars) + checksum (6 chars).
//!
//! The account id is 20 bytes (see [`crate::hash::account_id`]). The checksum is
//! the BIP-173 BCH code over the expanded human-readable part and the data.
//! Total address length: 7 + 1 + 32 + 6 = 46 characters.

use mychain_types::{PublicKey, ValidationError, WalletAddress, ADDRESS_HRP};

use crate::hash::{account_id, ACCOUNT_ID_LEN};

/// Bech32 alphabet (32 chars, no `1`, `b`, `i`, `o`).
const CHARSET: &[u8; 32] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";

/// Reverse lookup table: ASCII byte → 5-bit value (0xFF = invalid).
const CHARSET_DECODE: [u8; 128] = {
    let mut table = [0xFFu8; 128];
    let mut i = 0;
    while i < 32 {
        table[CHARSET[i] as usize] = i as u8;
        i += 1;
    }
    table
};

/// Generator coefficients of the bech32 checksum polynomial.
const GENERATOR: [u32; 5] = [0x3b6a57b2, 0x26508e6d, 0x1ea119fa, 0x3d4233dd, 0x2a1462b3];

const CHECKSUM_LEN: usize = 6;
/// Number of 5-bit groups for a 20-byte payload (160 bits → 32).
const DATA_CHARS: usize = 32;

fn polymod(values: impl IntoIterator<Item = u8>) -> u32 {
    let mut chk: u32 = 1;
    for v in values {
        let top = chk >> 25;
        chk = ((chk & 0x1ff_ffff) << 5) ^ v as u32;
        for (i, g) in GENERATOR.iter().enumerate() {
            if (top >> i) & 1 == 1 {
                chk ^= g;
            }
        }
    }
    chk
}

fn hrp_expand(hrp: &str) -> impl Iterator<Item = u8> + '_ {
    hrp.bytes()
        .map(|b| b >> 5)
        .chain(std::iter::once(0))
        .chain(hrp.bytes().map(|b| b & 0x1f))
}

fn checksum(hrp: &str, data: &[u8]) -> [u8; CHECKSUM_LEN] {
    let pm = polymod(
        hrp_expand(hrp)
            .chain(data.iter().copied())
            .chain([0u8; CHECKSUM_LEN]),
    ) ^ 1;
    let mut out = [0u8; CHECKSUM_LEN];
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = ((pm >> (5 * (5 - i))) & 0x1f) as u8;
    }
    out
}

/// Regroup 8-bit bytes into 5-bit groups, zero-padding the tail.
fn to_base32(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity((bytes.len() * 8).div_ceil(5));
    let mut buffer: u32 = 0;
    let mut bits = 0;
    for &byte in bytes {
        buffer = (buffer << 8) | byte as u32;
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            out.push(((buffer >> bits) & 0x1f) as u8);
        }
    }
    if bits > 0 {
        out.push(((buffer << (5 - bits)) & 0x1f) as u8);
    }
    out
}

/// Regroup 5-bit groups into bytes. Rejects non-zero padding.
fn from_base32<const N: usize>(groups: &[u8]) -> Option<[u8; N]> {
    let mut out = [0u8; N];
    let mut pos = 0;
    let mut buffer: u32 = 0;
    let mut bits = 0;
    for &g in groups {
        buffer = (buffer << 5) | g as u32;
        bits += 5;
        if bits >= 8 {
            bits -= 8;
            *out.get_mut(pos)? = (buffer >> bits) as u8;
            pos += 1;
        }
    }
    if pos != N || bits >= 5 || (buffer & ((1 << bits) - 1)) != 0 {
        return None;
    }
    Some(out)
}

/// Encode an arbitrary payload under `hrp`.
///
/// `hrp` must be lowercase ASCII; the caller validates it.
pub fn encode_bech32(hrp: &str, payload: &[u8]) -> String {
    let data = to_base32(payload);
    let sum = checksum(hrp, &data);
    let mut out = String::with_capacity(hrp.len() + 1 + data.len() + CHECKSUM_LEN);
    out.push_str(hrp);
    out.push('1');
    for g in data.iter().chain(sum.iter()) {
        out.push(CHARSET[*g as usize] as char);
    }
    out
}

/// Returns `true` for a bech32 human-readable part this client can emit.
pub fn is_valid_hrp(hrp: &str) -> bool {
    !hrp.is_empty()
        && hrp.len() <= 83
        && hrp
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
}

/// Encode a 20-byte account id as a `mychain` address.
pub fn encode_address(id: &[u8; ACCOUNT_ID_LEN]) -> Result<WalletAddress, ValidationError> {
    WalletAddress::parse(encode_bech32(ADDRESS_HRP, id))
}

/// Derive the `mychain` address of a compressed secp256k1 public key.
pub fn derive_address(public_key: &PublicKey) -> Result<WalletAddress, ValidationError> {
    encode_address(&account_id(public_key.as_bytes()))
}

/// Decode an address under any prefix into `(hrp, 20-byte id)`.
///
/// Returns `None` for mixed case, unknown characters, a bad checksum or a
/// payload that is not exactly 20 bytes.
pub fn decode_bech32(address: &str) -> Option<(String, [u8; ACCOUNT_ID_LEN])> {
    if !address.is_ascii() {
        return None;
    }
    let has_lower = address.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = address.bytes().any(|b| b.is_ascii_uppercase());
    if has_lower && has_upper {
        return None;
    }
    let lowered = address.to_ascii_lowercase();
    let sep = lowered.rfind('1')?;
    let (hrp, rest) = (&lowered[..sep], &lowered[sep + 1..]);
    if !is_valid_hrp(hrp) || rest.len() != DATA_CHARS + CHECKSUM_LEN {
        return None;
    }

    let mut groups = Vec::with_capacity(rest.len());
    for c in rest.bytes() {
        let val = CHARSET_DECODE[c as usize];
        if val == 0xFF {
            return None;
        }
        groups.push(val);
    }
    if polymod(hrp_expand(hrp).chain(groups.iter().copied())) != 1 {
        return None;
    }

    let id = from_base32::<ACCOUNT_ID_LEN>(&groups[..DATA_CHARS])?;
    Some((hrp.to_string(), id))
}

/// Decode a `mychain` address into its account id, verifying the checksum.
pub fn decode_address(address: &str) -> Result<[u8; ACCOUNT_ID_LEN], ValidationError> {
    match decode_bech32(address) {
        Some((hrp, id)) if hrp == ADDRESS_HRP => Ok(id),
        _ => Err(ValidationError::InvalidAddress {
            field: "address",
            value: address.to_string(),
        }),
    }
}
