//! Client core for the MyChain blockchain.
//!
//! Provides everything an application needs to talk to a MyChain node:
//! - [`ConnectionManager`]: the disconnected / read-only / signing state machine
//! - [`IdentityProvider`]: secret phrases and the signing identity derived from them
//! - [`TransactionBuilder`]: domain actions mapped to typed chain messages
//! - [`TransactionExecutor`]: sign + broadcast with result classification
//! - [`ChainReader`]: block height and balance queries
//! - [`MyChainClient`]: the facade bundling all of the above with a [`ClientConfig`]
//!
//! The node transport and key derivation are consumed through the
//! `mychain_transport::NodeTransport` and `mychain_crypto::KeyDerivation` traits.

pub mod builder;
pub mod client;
pub mod config;
pub mod connection;
pub mod error;
pub mod executor;
pub mod identity;
pub mod keystore;
pub mod logging;
pub mod reader;

pub use builder::TransactionBuilder;
pub use client::MyChainClient;
pub use config::{ActionMemos, ClientConfig, ConfigError};
pub use connection::{ConnectionManager, ConnectionState};
pub use error::{ClientError, ConnectionError};
pub use executor::TransactionExecutor;
pub use identity::{generate_mnemonic, IdentityProvider};
pub use keystore::{
    decrypt_keystore, encrypt_keystore, load_keystore, save_keystore, KeystoreError,
    KeystoreFile,
};
pub use logging::{init_logging, LogFormat};
pub use reader::ChainReader;

pub use mychain_types::is_valid_address;
