//! Fundamental types for the MyChain client.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! addresses, amounts, gas prices, fee policy, the closed set of chain messages,
//! broadcast results, account public keys and the validation error.

pub mod address;
pub mod amount;
pub mod broadcast;
pub mod error;
pub mod fee;
pub mod keys;
pub mod message;

pub use address::{is_valid_address, WalletAddress, ADDRESS_HRP, ADDRESS_LEN, ADDRESS_PREFIX};
pub use amount::{Amount, GasPrice, DEFAULT_DENOM};
pub use broadcast::BroadcastResult;
pub use error::ValidationError;
pub use fee::{FeeMode, TxOptions};
pub use keys::{PublicKey, PUBLIC_KEY_LEN};
pub use message::{
    ChainMessage, MsgCreateUser, MsgMintTokens, MsgRegisterMiner, MsgTransferTokens,
    TYPE_URL_PREFIX,
};
