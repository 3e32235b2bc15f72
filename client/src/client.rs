//! The application-facing facade.

use std::sync::Arc;

use mychain_crypto::{HdDerivation, KeyDerivation};
use mychain_transport::NodeTransport;
use mychain_types::{ChainMessage, TxOptions, WalletAddress, ADDRESS_HRP};
use tracing::info;

use crate::builder::TransactionBuilder;
use crate::config::ClientConfig;
use crate::connection::ConnectionManager;
use crate::error::{ClientError, ConnectionError};
use crate::executor::TransactionExecutor;
use crate::identity::IdentityProvider;
use crate::reader::ChainReader;

/// A MyChain client: one connection, one identity, one configuration.
///
/// Domain actions sign as the primary account of the identity given to
/// [`MyChainClient::connect_with_mnemonic`], pay fees according to
/// [`ClientConfig::fee`] and carry the per-action memo from
/// [`ClientConfig::memos`].
pub struct MyChainClient<T: NodeTransport, D = HdDerivation> {
    config: ClientConfig,
    connection: ConnectionManager<T>,
    identities: IdentityProvider<D>,
    builder: TransactionBuilder,
}

impl<T: NodeTransport> MyChainClient<T> {
    /// A client deriving `config.account_count` accounts per identity.
    pub fn new(config: ClientConfig, transport: T) -> Self {
        let derivation = HdDerivation::new(config.account_count);
        Self::with_derivation(config, transport, derivation)
    }
}

impl<T: NodeTransport, D: KeyDerivation> MyChainClient<T, D> {
    pub fn with_derivation(config: ClientConfig, transport: T, derivation: D) -> Self {
        Self {
            connection: ConnectionManager::new(transport, config.gas_price.clone()),
            identities: IdentityProvider::new(derivation),
            builder: TransactionBuilder::new(config.denom.clone()),
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn connection(&self) -> &ConnectionManager<T> {
        &self.connection
    }

    pub fn identities(&self) -> &IdentityProvider<D> {
        &self.identities
    }

    /// Open a read-only connection to the configured endpoint.
    pub async fn connect(&self) -> Result<(), ClientError> {
        Ok(self.connection.connect(&self.config.rpc_endpoint).await?)
    }

    /// Derive the identity behind `phrase`, open a signing connection with it
    /// and return its primary address.
    pub async fn connect_with_mnemonic(&self, phrase: &str) -> Result<WalletAddress, ClientError> {
        let identity = self.identities.from_secret(phrase, ADDRESS_HRP)?;
        let address = self.identities.primary_address(&identity)?;
        self.connection
            .connect_with_identity(&self.config.rpc_endpoint, Arc::new(identity))
            .await?;
        info!(%address, chain_id = %self.config.chain_id, "signing as");
        Ok(address)
    }

    /// Primary address of the connected identity.
    pub fn address(&self) -> Result<WalletAddress, ClientError> {
        let identity = self
            .connection
            .identity()
            .ok_or_else(|| self.signing_unavailable())?;
        Ok(self.identities.primary_address(&identity)?)
    }

    pub async fn create_user(&self, name: &str, email: &str) -> Result<String, ClientError> {
        let sender = self.address()?;
        let msg = self.builder.create_user(sender.as_str(), name, email)?;
        self.submit(msg, &sender, &self.config.memos.create_user)
            .await
    }

    /// Send `amount` to `receiver`; `denom` defaults to the configured one.
    pub async fn transfer_tokens(
        &self,
        receiver: &str,
        amount: &str,
        denom: Option<&str>,
    ) -> Result<String, ClientError> {
        let sender = self.address()?;
        let msg = self
            .builder
            .transfer_tokens(sender.as_str(), receiver, amount, denom)?;
        self.submit(msg, &sender, &self.config.memos.transfer_tokens)
            .await
    }

    pub async fn mint_tokens(&self, amount: &str, denom: Option<&str>) -> Result<String, ClientError> {
        let sender = self.address()?;
        let msg = self.builder.mint_tokens(sender.as_str(), amount, denom)?;
        self.submit(msg, &sender, &self.config.memos.mint_tokens)
            .await
    }

    pub async fn register_miner(
        &self,
        description: &str,
        commission: &str,
    ) -> Result<String, ClientError> {
        let sender = self.address()?;
        let msg = self
            .builder
            .register_miner(sender.as_str(), description, commission)?;
        self.submit(msg, &sender, &self.config.memos.register_miner)
            .await
    }

    pub async fn current_height(&self) -> Result<u64, ClientError> {
        ChainReader::new(&self.connection).height().await
    }

    /// Balance of `address`; `denom` defaults to the configured one.
    pub async fn balance(&self, address: &str, denom: Option<&str>) -> Result<String, ClientError> {
        let denom = denom.unwrap_or(&self.config.denom);
        ChainReader::new(&self.connection)
            .balance(address, denom)
            .await
    }

    pub fn disconnect(&self) {
        self.connection.disconnect();
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_connected()
    }

    pub async fn reconnect(&self) -> Result<(), ClientError> {
        self.connection.reconnect().await
    }

    async fn submit(
        &self,
        msg: ChainMessage,
        sender: &WalletAddress,
        memo: &str,
    ) -> Result<String, ClientError> {
        let options = TxOptions {
            fee: self.config.fee.clone(),
            memo: memo.to_string(),
        };
        TransactionExecutor::new(&self.connection)
            .execute(msg, sender, &options)
            .await
    }

    fn signing_unavailable(&self) -> ClientError {
        if self.connection.is_connected() {
            ConnectionError::SigningUnavailable.into()
        } else {
            ConnectionError::NotConnected.into()
        }
    }
}
