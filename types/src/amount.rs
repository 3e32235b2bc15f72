//! Token amounts and gas prices.
//!
//! Amounts are carried as decimal strings, never floating point, so that
//! arbitrarily large integers survive the trip to the chain unchanged.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// The chain's native token, used whenever a caller does not name a denom.
pub const DEFAULT_DENOM: &str = "mychain";

/// Longest denom the bank module accepts.
const MAX_DENOM_LEN: usize = 128;

/// A token amount: a non-negative decimal integer plus its denom.
///
/// Serializes in the chain's coin shape, `{"denom": .., "amount": ..}`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Amount {
    pub denom: String,
    #[serde(rename = "amount")]
    pub value: String,
}

impl Amount {
    /// Validate and build an amount.
    pub fn new(value: impl Into<String>, denom: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let denom = denom.into();
        if value.is_empty() {
            return Err(ValidationError::EmptyField { field: "amount" });
        }
        if !is_integer_string(&value) {
            return Err(ValidationError::InvalidAmount { value });
        }
        if denom.is_empty() {
            return Err(ValidationError::EmptyField { field: "denom" });
        }
        if !is_valid_denom(&denom) {
            return Err(ValidationError::InvalidDenom { value: denom });
        }
        Ok(Self { denom, value })
    }

    /// An amount of the native denom.
    pub fn native(value: impl Into<String>) -> Result<Self, ValidationError> {
        Self::new(value, DEFAULT_DENOM)
    }

    /// The zero amount of `denom`, as reported for accounts holding none of it.
    pub fn zero(denom: impl Into<String>) -> Self {
        Self {
            denom: denom.into(),
            value: "0".to_string(),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.value.bytes().all(|b| b == b'0')
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.denom)
    }
}

/// Returns `true` for a non-empty string of ASCII digits.
pub fn is_integer_string(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Returns `true` for a non-negative decimal such as `"0.1"` or `"25"`.
pub fn is_decimal_string(s: &str) -> bool {
    match s.split_once('.') {
        Some((int, frac)) => is_integer_string(int) && is_integer_string(frac),
        None => is_integer_string(s),
    }
}

/// Bank module denom rule: 3..=128 chars, a leading ASCII letter, then
/// ASCII alphanumerics or one of `/ : . _ -`.
pub fn is_valid_denom(denom: &str) -> bool {
    let bytes = denom.as_bytes();
    if bytes.len() < 3 || bytes.len() > MAX_DENOM_LEN {
        return false;
    }
    bytes[0].is_ascii_alphabetic()
        && bytes[1..]
            .iter()
            .all(|&b| b.is_ascii_alphanumeric() || matches!(b, b'/' | b':' | b'.' | b'_' | b'-'))
}

/// Price paid per unit of gas, written `<decimal><denom>` (e.g. `0.1umychain`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GasPrice {
    pub amount: String,
    pub denom: String,
}

impl FromStr for GasPrice {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidGasPrice {
            value: s.to_string(),
        };
        let split = s
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .ok_or_else(invalid)?;
        let (amount, denom) = s.split_at(split);
        if !is_decimal_string(amount) || !is_valid_denom(denom) {
            return Err(invalid());
        }
        Ok(Self {
            amount: amount.to_string(),
            denom: denom.to_string(),
        })
    }
}

impl TryFrom<String> for GasPrice {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<GasPrice> for String {
    fn from(price: GasPrice) -> Self {
        price.to_string()
    }
}

impl fmt::Display for GasPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_accepts_integer_strings() {
        let amount = Amount::new("100", "mychain").unwrap();
        assert_eq!(amount.value, "100");
        assert_eq!(amount.denom, "mychain");
        assert_eq!(amount.to_string(), "100mychain");
        assert!(Amount::new("0", "mychain").unwrap().is_zero());
    }

    #[test]
    fn amount_accepts_values_beyond_u128() {
        let huge = "340282366920938463463374607431768211456000";
        assert!(Amount::native(huge).is_ok());
    }

    #[test]
    fn amount_rejects_non_integers() {
        for bad in ["-1", "1.5", "1e3", " 1", "abc", "+7"] {
            assert_eq!(
                Amount::native(bad).unwrap_err(),
                ValidationError::InvalidAmount { value: bad.into() },
                "{bad} should be rejected"
            );
        }
        assert_eq!(
            Amount::native("").unwrap_err(),
            ValidationError::EmptyField { field: "amount" }
        );
    }

    #[test]
    fn amount_rejects_bad_denoms() {
        assert!(matches!(
            Amount::new("1", "").unwrap_err(),
            ValidationError::EmptyField { field: "denom" }
        ));
        for bad in ["ab", "1abc", "my chain", "ümychain"] {
            assert!(Amount::new("1", bad).is_err(), "{bad} should be rejected");
        }
        assert!(Amount::new("1", "ibc/27394FB0").is_ok());
    }

    #[test]
    fn amount_serializes_as_coin() {
        let json = serde_json::to_value(Amount::native("5").unwrap()).unwrap();
        assert_eq!(json, serde_json::json!({"denom": "mychain", "amount": "5"}));
    }

    #[test]
    fn gas_price_parses() {
        let price: GasPrice = "0.1umychain".parse().unwrap();
        assert_eq!(price.amount, "0.1");
        assert_eq!(price.denom, "umychain");
        assert_eq!(price.to_string(), "0.1umychain");
    }

    #[test]
    fn gas_price_rejects_garbage() {
        for bad in ["", "umychain", "0.1", "0..1umychain", ".1umychain", "1.umychain", "0.1u"] {
            assert!(bad.parse::<GasPrice>().is_err(), "{bad} should be rejected");
        }
    }
}
