//! The closed set of messages this client can put on the chain.
//!
//! Each action is its own strongly-typed struct; [`ChainMessage`] is the
//! tagged union over them. Serialized, a message is an envelope of the form
//! `{"typeUrl": "/mychain.mychain.MsgTransferTokens", "value": {..}}`.

use serde::{Deserialize, Serialize};

use crate::address::WalletAddress;
use crate::amount::Amount;

/// Prefix shared by every type identifier of the mychain module.
pub const TYPE_URL_PREFIX: &str = "/mychain.mychain.";

/// Register a new user profile for `creator`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgCreateUser {
    pub creator: WalletAddress,
    pub name: String,
    pub email: String,
}

/// Move tokens from `sender` to `receiver`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgTransferTokens {
    pub sender: WalletAddress,
    pub receiver: WalletAddress,
    pub amount: Vec<Amount>,
}

/// Mint new tokens to `minter`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgMintTokens {
    pub minter: WalletAddress,
    pub amount: Vec<Amount>,
}

/// Register `miner` with a description and a commission rate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgRegisterMiner {
    pub miner: WalletAddress,
    pub description: String,
    pub commission: String,
}

/// A message ready for signing and broadcast.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "typeUrl", content = "value")]
pub enum ChainMessage {
    #[serde(rename = "/mychain.mychain.MsgCreateUser")]
    CreateUser(MsgCreateUser),
    #[serde(rename = "/mychain.mychain.MsgTransferTokens")]
    TransferTokens(MsgTransferTokens),
    #[serde(rename = "/mychain.mychain.MsgMintTokens")]
    MintTokens(MsgMintTokens),
    #[serde(rename = "/mychain.mychain.MsgRegisterMiner")]
    RegisterMiner(MsgRegisterMiner),
}

impl ChainMessage {
    /// Short message name, e.g. `MsgTransferTokens`.
    pub fn name(&self) -> &'static str {
        match self {
            ChainMessage::CreateUser(_) => "MsgCreateUser",
            ChainMessage::TransferTokens(_) => "MsgTransferTokens",
            ChainMessage::MintTokens(_) => "MsgMintTokens",
            ChainMessage::RegisterMiner(_) => "MsgRegisterMiner",
        }
    }

    /// Full type identifier, e.g. `/mychain.mychain.MsgTransferTokens`.
    pub fn type_url(&self) -> String {
        format!("{TYPE_URL_PREFIX}{}", self.name())
    }

    /// The account that must sign this message.
    pub fn signer(&self) -> &WalletAddress {
        match self {
            ChainMessage::CreateUser(m) => &m.creator,
            ChainMessage::TransferTokens(m) => &m.sender,
            ChainMessage::MintTokens(m) => &m.minter,
            ChainMessage::RegisterMiner(m) => &m.miner,
        }
    }

    /// The envelope as JSON (`typeUrl` plus `value` payload).
    pub fn to_envelope(&self) -> serde_json::Value {
        // Every field is a string or a list of string pairs.
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr() -> WalletAddress {
        WalletAddress::parse("mychain1qqqsyqcyq5rqwzqfpg9scrgwpugpzysnr4ygsv").unwrap()
    }

    #[test]
    fn type_url_matches_serde_tag() {
        let msgs = [
            ChainMessage::CreateUser(MsgCreateUser {
                creator: addr(),
                name: "alice".into(),
                email: "alice@example.com".into(),
            }),
            ChainMessage::TransferTokens(MsgTransferTokens {
                sender: addr(),
                receiver: addr(),
                amount: vec![Amount::native("1").unwrap()],
            }),
            ChainMessage::MintTokens(MsgMintTokens {
                minter: addr(),
                amount: vec![Amount::native("1").unwrap()],
            }),
            ChainMessage::RegisterMiner(MsgRegisterMiner {
                miner: addr(),
                description: "rig".into(),
                commission: "0.1".into(),
            }),
        ];
        for msg in msgs {
            let envelope = msg.to_envelope();
            assert_eq!(envelope["typeUrl"], msg.type_url());
            assert!(envelope["value"].is_object());
            assert_eq!(msg.signer(), &addr());
        }
    }

    #[test]
    fn transfer_envelope_shape() {
        let msg = ChainMessage::TransferTokens(MsgTransferTokens {
            sender: addr(),
            receiver: addr(),
            amount: vec![Amount::native("100").unwrap()],
        });
        assert_eq!(
            msg.to_envelope(),
            serde_json::json!({
                "typeUrl": "/mychain.mychain.MsgTransferTokens",
                "value": {
                    "sender": addr().as_str(),
                    "receiver": addr().as_str(),
                    "amount": [{"denom": "mychain", "amount": "100"}],
                }
            })
        );
    }

    #[test]
    fn envelope_roundtrips_through_serde() {
        let msg = ChainMessage::MintTokens(MsgMintTokens {
            minter: addr(),
            amount: vec![Amount::new("7", "umychain").unwrap()],
        });
        let back: ChainMessage = serde_json::from_value(msg.to_envelope()).unwrap();
        assert_eq!(back, msg);
    }
}
