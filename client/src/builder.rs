//! Domain actions mapped to typed chain messages.
//!
//! Building is pure: every argument is validated locally and nothing touches
//! the network, so a malformed action fails before any round-trip.

use mychain_types::amount::is_integer_string;
use mychain_types::{
    Amount, ChainMessage, MsgCreateUser, MsgMintTokens, MsgRegisterMiner, MsgTransferTokens,
    ValidationError, WalletAddress, DEFAULT_DENOM,
};
use tracing::debug;

/// Most fractional digits a commission rate may carry (`sdk.Dec` precision).
const COMMISSION_PRECISION: usize = 18;

/// Builds [`ChainMessage`]s, filling in the default denom where a caller
/// does not name one.
#[derive(Clone, Debug)]
pub struct TransactionBuilder {
    default_denom: String,
}

impl Default for TransactionBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_DENOM)
    }
}

impl TransactionBuilder {
    pub fn new(default_denom: impl Into<String>) -> Self {
        Self {
            default_denom: default_denom.into(),
        }
    }

    pub fn default_denom(&self) -> &str {
        &self.default_denom
    }

    pub fn create_user(
        &self,
        creator: &str,
        name: &str,
        email: &str,
    ) -> Result<ChainMessage, ValidationError> {
        let msg = MsgCreateUser {
            creator: WalletAddress::parse_field("creator", creator)?,
            name: required("name", name)?,
            email: required("email", email)?,
        };
        Ok(self.built(ChainMessage::CreateUser(msg)))
    }

    pub fn transfer_tokens(
        &self,
        sender: &str,
        receiver: &str,
        amount: &str,
        denom: Option<&str>,
    ) -> Result<ChainMessage, ValidationError> {
        let msg = MsgTransferTokens {
            sender: WalletAddress::parse_field("sender", sender)?,
            receiver: WalletAddress::parse_field("receiver", receiver)?,
            amount: vec![self.amount(amount, denom)?],
        };
        Ok(self.built(ChainMessage::TransferTokens(msg)))
    }

    pub fn mint_tokens(
        &self,
        minter: &str,
        amount: &str,
        denom: Option<&str>,
    ) -> Result<ChainMessage, ValidationError> {
        let msg = MsgMintTokens {
            minter: WalletAddress::parse_field("minter", minter)?,
            amount: vec![self.amount(amount, denom)?],
        };
        Ok(self.built(ChainMessage::MintTokens(msg)))
    }

    pub fn register_miner(
        &self,
        miner: &str,
        description: &str,
        commission: &str,
    ) -> Result<ChainMessage, ValidationError> {
        let msg = MsgRegisterMiner {
            miner: WalletAddress::parse_field("miner", miner)?,
            description: required("description", description)?,
            commission: commission_rate(commission)?,
        };
        Ok(self.built(ChainMessage::RegisterMiner(msg)))
    }

    fn amount(&self, value: &str, denom: Option<&str>) -> Result<Amount, ValidationError> {
        Amount::new(value, denom.unwrap_or(&self.default_denom))
    }

    fn built(&self, msg: ChainMessage) -> ChainMessage {
        debug!(type_url = %msg.type_url(), signer = %msg.signer(), "built message");
        msg
    }
}

fn required(field: &'static str, value: &str) -> Result<String, ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::EmptyField { field });
    }
    Ok(value.to_string())
}

/// A decimal in `[0, 1]` with at most 18 fractional digits.
fn commission_rate(value: &str) -> Result<String, ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::EmptyField {
            field: "commission",
        });
    }
    let invalid = || ValidationError::InvalidCommission {
        value: value.to_string(),
    };
    let (int, frac) = value.split_once('.').unwrap_or((value, ""));
    if !is_integer_string(int) || frac.len() > COMMISSION_PRECISION {
        return Err(invalid());
    }
    if value.contains('.') && !is_integer_string(frac) {
        return Err(invalid());
    }
    let whole = int.trim_start_matches('0');
    let in_range = match whole {
        "" => true,
        "1" => frac.bytes().all(|b| b == b'0'),
        _ => false,
    };
    if !in_range {
        return Err(invalid());
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: &str = "mychain19rl4cm2hmr8afy4kldpxz3fka4jguq0asw70kh";
    const BOB: &str = "mychain1jrkmdcwgq94uaamx6zax2luewlhf7u4ksk4rlq";

    #[test]
    fn create_user_envelope() {
        let msg = TransactionBuilder::default()
            .create_user(ALICE, "alice", "alice@example.com")
            .unwrap();
        assert_eq!(msg.type_url(), "/mychain.mychain.MsgCreateUser");
        let envelope = msg.to_envelope();
        assert_eq!(envelope["value"]["creator"], ALICE);
        assert_eq!(envelope["value"]["name"], "alice");
        assert_eq!(envelope["value"]["email"], "alice@example.com");
    }

    #[test]
    fn transfer_defaults_denom() {
        let msg = TransactionBuilder::default()
            .transfer_tokens(ALICE, BOB, "100", None)
            .unwrap();
        assert_eq!(msg.type_url(), "/mychain.mychain.MsgTransferTokens");
        let envelope = msg.to_envelope();
        assert_eq!(envelope["value"]["receiver"], BOB);
        assert_eq!(
            envelope["value"]["amount"],
            serde_json::json!([{ "denom": "mychain", "amount": "100" }])
        );
    }

    #[test]
    fn configured_default_denom_applies() {
        let msg = TransactionBuilder::new("stake")
            .mint_tokens(ALICE, "5", None)
            .unwrap();
        match msg {
            ChainMessage::MintTokens(m) => assert_eq!(m.amount[0].denom, "stake"),
            other => panic!("unexpected message {other:?}"),
        }
    }

    #[test]
    fn explicit_denom_wins() {
        let msg = TransactionBuilder::default()
            .mint_tokens(ALICE, "5", Some("umychain"))
            .unwrap();
        assert_eq!(msg.to_envelope()["value"]["amount"][0]["denom"], "umychain");
    }

    #[test]
    fn register_miner_envelope() {
        let msg = TransactionBuilder::default()
            .register_miner(ALICE, "gpu rig", "0.05")
            .unwrap();
        assert_eq!(msg.type_url(), "/mychain.mychain.MsgRegisterMiner");
        assert_eq!(msg.to_envelope()["value"]["commission"], "0.05");
    }

    #[test]
    fn empty_fields_are_named() {
        let b = TransactionBuilder::default();
        assert_eq!(
            b.create_user("", "a", "b").unwrap_err(),
            ValidationError::EmptyField { field: "creator" }
        );
        assert_eq!(
            b.create_user(ALICE, "", "b").unwrap_err(),
            ValidationError::EmptyField { field: "name" }
        );
        assert_eq!(
            b.create_user(ALICE, "a", "").unwrap_err(),
            ValidationError::EmptyField { field: "email" }
        );
        assert_eq!(
            b.transfer_tokens("", BOB, "1", None).unwrap_err(),
            ValidationError::EmptyField { field: "sender" }
        );
        assert_eq!(
            b.transfer_tokens(ALICE, BOB, "", None).unwrap_err(),
            ValidationError::EmptyField { field: "amount" }
        );
        assert_eq!(
            b.transfer_tokens(ALICE, BOB, "1", Some("")).unwrap_err(),
            ValidationError::EmptyField { field: "denom" }
        );
        assert_eq!(
            b.mint_tokens("", "1", None).unwrap_err(),
            ValidationError::EmptyField { field: "minter" }
        );
        assert_eq!(
            b.mint_tokens(ALICE, "1", Some("")).unwrap_err(),
            ValidationError::EmptyField { field: "denom" }
        );
        assert_eq!(
            b.register_miner("", "rig", "0.1").unwrap_err(),
            ValidationError::EmptyField { field: "miner" }
        );
        assert_eq!(
            b.transfer_tokens(ALICE, "", "1", None).unwrap_err(),
            ValidationError::EmptyField { field: "receiver" }
        );
        assert_eq!(
            b.mint_tokens(ALICE, "", None).unwrap_err(),
            ValidationError::EmptyField { field: "amount" }
        );
        assert_eq!(
            b.register_miner(ALICE, "", "0.1").unwrap_err(),
            ValidationError::EmptyField {
                field: "description"
            }
        );
        assert_eq!(
            b.register_miner(ALICE, "rig", "").unwrap_err(),
            ValidationError::EmptyField {
                field: "commission"
            }
        );
    }

    #[test]
    fn malformed_amounts_rejected() {
        let b = TransactionBuilder::default();
        for bad in ["-1", "1.5", "1e3", " 1", "abc"] {
            assert_eq!(
                b.transfer_tokens(ALICE, BOB, bad, None).unwrap_err(),
                ValidationError::InvalidAmount { value: bad.into() }
            );
        }
        assert!(matches!(
            b.transfer_tokens(ALICE, BOB, "1", Some("X")).unwrap_err(),
            ValidationError::InvalidDenom { .. }
        ));
    }

    #[test]
    fn malformed_address_rejected() {
        let err = TransactionBuilder::default()
            .transfer_tokens(ALICE, "cosmos1notours", "1", None)
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidAddress {
                field: "receiver",
                value: "cosmos1notours".into()
            }
        );
    }

    #[test]
    fn commission_bounds() {
        for ok in ["0", "1", "0.5", "1.000", "00.25", "0.000000000000000001"] {
            assert_eq!(commission_rate(ok).unwrap(), ok);
        }
        for bad in [
            "1.01",
            "2",
            "-0.1",
            ".5",
            "0.",
            "0.5.1",
            "abc",
            "0.0000000000000000001",
        ] {
            assert_eq!(
                commission_rate(bad).unwrap_err(),
                ValidationError::InvalidCommission { value: bad.into() }
            );
        }
    }
}
