//! Connection lifecycle: disconnected, read-only, or signing.
//!
//! The read-only handle, the signing handle and the identity live together in
//! one [`ConnectionState`] value behind a single mutex, so no caller can ever
//! observe a signing handle without its identity. Transport calls are made
//! without holding the lock: operations snapshot the handles they need and
//! then await, which lets an in-flight broadcast finish (or fail on its own)
//! after a concurrent `disconnect()`.

use std::mem;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use mychain_crypto::Identity;
use mychain_transport::NodeTransport;
use mychain_types::GasPrice;
use tracing::{debug, info};

use crate::error::{ClientError, ConnectionError};

/// Where a [`ConnectionManager`] currently stands.
#[derive(Clone, Debug)]
pub enum ConnectionState<H> {
    Disconnected,
    ReadOnly {
        endpoint: String,
        read_only: H,
    },
    Signing {
        endpoint: String,
        read_only: H,
        signing: H,
        identity: Arc<Identity>,
    },
}

impl<H> ConnectionState<H> {
    pub fn is_disconnected(&self) -> bool {
        matches!(self, ConnectionState::Disconnected)
    }

    pub fn is_signing(&self) -> bool {
        matches!(self, ConnectionState::Signing { .. })
    }

    /// Endpoint of the open connection, if any.
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            ConnectionState::Disconnected => None,
            ConnectionState::ReadOnly { endpoint, .. }
            | ConnectionState::Signing { endpoint, .. } => Some(endpoint),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::ReadOnly { .. } => "read-only",
            ConnectionState::Signing { .. } => "signing",
        }
    }
}

/// What a query needs: a live handle and where it points.
#[derive(Clone, Debug)]
pub(crate) struct ReadSession<H> {
    pub endpoint: String,
    pub handle: H,
}

/// What a broadcast needs: the signing handle and the identity bound to it.
#[derive(Clone, Debug)]
pub(crate) struct SigningSession<H> {
    pub endpoint: String,
    pub handle: H,
    pub identity: Arc<Identity>,
}

/// Owns the node handles of one client instance.
pub struct ConnectionManager<T: NodeTransport> {
    transport: T,
    gas_price: GasPrice,
    state: Mutex<ConnectionState<T::Handle>>,
}

impl<T: NodeTransport> ConnectionManager<T> {
    /// A disconnected manager whose signing handles price gas at `gas_price`.
    pub fn new(transport: T, gas_price: GasPrice) -> Self {
        Self {
            transport,
            gas_price,
            state: Mutex::new(ConnectionState::Disconnected),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn gas_price(&self) -> &GasPrice {
        &self.gas_price
    }

    /// Snapshot of the current state.
    pub fn current_state(&self) -> ConnectionState<T::Handle> {
        self.lock().clone()
    }

    /// `true` in the read-only and signing states.
    pub fn is_connected(&self) -> bool {
        !self.lock().is_disconnected()
    }

    /// The identity bound to the signing connection, if any.
    pub fn identity(&self) -> Option<Arc<Identity>> {
        match &*self.lock() {
            ConnectionState::Signing { identity, .. } => Some(Arc::clone(identity)),
            _ => None,
        }
    }

    /// Open a read-only connection to `endpoint`.
    ///
    /// Any connection already held is closed once the new handle is open. On
    /// failure the previous state is left untouched.
    pub async fn connect(&self, endpoint: &str) -> Result<(), ConnectionError> {
        let read_only = self
            .transport
            .open_read_only(endpoint)
            .await
            .map_err(|source| ConnectionError::Transport {
                endpoint: endpoint.to_string(),
                source,
            })?;

        let previous = self.replace(ConnectionState::ReadOnly {
            endpoint: endpoint.to_string(),
            read_only,
        });
        self.release(previous, false);
        info!(endpoint, "connected (read-only)");
        Ok(())
    }

    /// Open a signing connection to `endpoint` bound to `identity`.
    ///
    /// A read-only handle already open to the same endpoint is kept; otherwise
    /// one is opened alongside the signing handle. Fails with an identity
    /// error, before any transport call, when `identity` has no account.
    pub async fn connect_with_identity(
        &self,
        endpoint: &str,
        identity: Arc<Identity>,
    ) -> Result<(), ClientError> {
        let signer = identity.primary_address()?.clone();

        let existing = match &*self.lock() {
            ConnectionState::ReadOnly {
                endpoint: current,
                read_only,
            }
            | ConnectionState::Signing {
                endpoint: current,
                read_only,
                ..
            } if current == endpoint => Some(read_only.clone()),
            _ => None,
        };
        let reused = existing.is_some();
        let read_only = match existing {
            Some(handle) => handle,
            None => self
                .transport
                .open_read_only(endpoint)
                .await
                .map_err(|source| ConnectionError::Transport {
                    endpoint: endpoint.to_string(),
                    source,
                })?,
        };

        let signing = match self
            .transport
            .open_signing(endpoint, &identity, &self.gas_price)
            .await
        {
            Ok(handle) => handle,
            Err(source) => {
                if !reused {
                    self.transport.close(&read_only);
                }
                return Err(ConnectionError::Transport {
                    endpoint: endpoint.to_string(),
                    source,
                }
                .into());
            }
        };

        let previous = self.replace(ConnectionState::Signing {
            endpoint: endpoint.to_string(),
            read_only,
            signing,
            identity,
        });
        self.release(previous, reused);
        info!(endpoint, %signer, "connected (signing)");
        Ok(())
    }

    /// Close every handle and forget the identity. Safe from any state.
    pub fn disconnect(&self) {
        let previous = self.replace(ConnectionState::Disconnected);
        if !previous.is_disconnected() {
            info!(endpoint = previous.endpoint(), "disconnected");
        }
        self.release(previous, false);
    }

    /// Reopen the connection held now, with fresh handles.
    ///
    /// A signing connection is reopened with the same identity. The old
    /// handles are closed first; if reopening fails the manager stays
    /// disconnected.
    pub async fn reconnect(&self) -> Result<(), ClientError> {
        let previous = self.current_state();
        debug!(from = previous.label(), "reconnecting");
        match previous {
            ConnectionState::Disconnected => Err(ConnectionError::NotConnected.into()),
            ConnectionState::ReadOnly { endpoint, .. } => {
                self.disconnect();
                Ok(self.connect(&endpoint).await?)
            }
            ConnectionState::Signing {
                endpoint, identity, ..
            } => {
                self.disconnect();
                self.connect_with_identity(&endpoint, identity).await
            }
        }
    }

    pub(crate) fn read_session(&self) -> Result<ReadSession<T::Handle>, ConnectionError> {
        match &*self.lock() {
            ConnectionState::Disconnected => Err(ConnectionError::NotConnected),
            ConnectionState::ReadOnly {
                endpoint,
                read_only,
            }
            | ConnectionState::Signing {
                endpoint,
                read_only,
                ..
            } => Ok(ReadSession {
                endpoint: endpoint.clone(),
                handle: read_only.clone(),
            }),
        }
    }

    pub(crate) fn signing_session(&self) -> Result<SigningSession<T::Handle>, ConnectionError> {
        match &*self.lock() {
            ConnectionState::Disconnected => Err(ConnectionError::NotConnected),
            ConnectionState::ReadOnly { .. } => Err(ConnectionError::SigningUnavailable),
            ConnectionState::Signing {
                endpoint,
                signing,
                identity,
                ..
            } => Ok(SigningSession {
                endpoint: endpoint.clone(),
                handle: signing.clone(),
                identity: Arc::clone(identity),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ConnectionState<T::Handle>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn replace(&self, next: ConnectionState<T::Handle>) -> ConnectionState<T::Handle> {
        mem::replace(&mut *self.lock(), next)
    }

    /// Close the handles of a state that has just been replaced.
    fn release(&self, previous: ConnectionState<T::Handle>, keep_read_only: bool) {
        match previous {
            ConnectionState::Disconnected => {}
            ConnectionState::ReadOnly { read_only, .. } => {
                if !keep_read_only {
                    self.transport.close(&read_only);
                }
            }
            ConnectionState::Signing {
                read_only, signing, ..
            } => {
                self.transport.close(&signing);
                if !keep_read_only {
                    self.transport.close(&read_only);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mychain_crypto::{keypair_from_secret, IdentityError};
    use mychain_nullables::{HandleKind, NullTransport};
    use mychain_transport::TransportError;

    const NODE: &str = "http://localhost:26657";

    fn manager() -> (NullTransport, ConnectionManager<NullTransport>) {
        let transport = NullTransport::new();
        let price: GasPrice = "0.1umychain".parse().unwrap();
        (transport.clone(), ConnectionManager::new(transport, price))
    }

    fn identity() -> Arc<Identity> {
        let pair = keypair_from_secret(&[3u8; 32]).unwrap();
        Arc::new(Identity::from_keypairs(vec![pair]).unwrap())
    }

    #[tokio::test]
    async fn starts_disconnected() {
        let (_, mgr) = manager();
        assert!(mgr.current_state().is_disconnected());
        assert!(!mgr.is_connected());
        assert!(mgr.identity().is_none());
    }

    #[tokio::test]
    async fn connect_moves_to_read_only() {
        let (transport, mgr) = manager();
        mgr.connect(NODE).await.unwrap();
        assert!(matches!(
            mgr.current_state(),
            ConnectionState::ReadOnly { ref endpoint, .. } if endpoint == NODE
        ));
        assert!(mgr.is_connected());
        assert_eq!(transport.opened().len(), 1);
    }

    #[tokio::test]
    async fn failed_connect_stays_disconnected() {
        let (transport, mgr) = manager();
        transport.fail_endpoint(NODE);
        let err = mgr.connect(NODE).await.unwrap_err();
        assert_eq!(
            err,
            ConnectionError::Transport {
                endpoint: NODE.into(),
                source: TransportError::Unreachable(NODE.into()),
            }
        );
        assert!(mgr.current_state().is_disconnected());
    }

    #[tokio::test]
    async fn connect_with_identity_moves_to_signing() {
        let (transport, mgr) = manager();
        let id = identity();
        mgr.connect_with_identity(NODE, Arc::clone(&id)).await.unwrap();
        assert!(mgr.current_state().is_signing());
        assert!(Arc::ptr_eq(&mgr.identity().unwrap(), &id));

        let opened = transport.opened();
        assert_eq!(opened.len(), 2);
        assert_eq!(opened[0].kind, HandleKind::ReadOnly);
        assert!(matches!(
            opened[1].kind,
            HandleKind::Signing { ref gas_price, .. } if gas_price.to_string() == "0.1umychain"
        ));
    }

    #[tokio::test]
    async fn identity_without_accounts_is_rejected_before_transport() {
        let (transport, mgr) = manager();
        let err = mgr
            .connect_with_identity(NODE, Arc::new(Identity::empty()))
            .await
            .unwrap_err();
        assert_eq!(err, ClientError::Identity(IdentityError::NoAccounts));
        assert!(mgr.current_state().is_disconnected());
        assert!(transport.opened().is_empty());
    }

    #[tokio::test]
    async fn signing_upgrade_reuses_read_only_handle() {
        let (transport, mgr) = manager();
        mgr.connect(NODE).await.unwrap();
        mgr.connect_with_identity(NODE, identity()).await.unwrap();
        assert_eq!(transport.opened().len(), 2);
        assert!(transport.closed().is_empty());
        assert_eq!(transport.live_handles(), 2);
    }

    #[tokio::test]
    async fn failed_signing_open_keeps_previous_state() {
        let (transport, mgr) = manager();
        mgr.connect(NODE).await.unwrap();
        transport.fail_endpoint(NODE);
        let err = mgr.connect_with_identity(NODE, identity()).await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Connection(ConnectionError::Transport { .. })
        ));
        assert!(matches!(mgr.current_state(), ConnectionState::ReadOnly { .. }));
        assert_eq!(transport.live_handles(), 1);
    }

    #[tokio::test]
    async fn disconnect_is_idempotent() {
        let (transport, mgr) = manager();
        mgr.disconnect();
        assert!(mgr.current_state().is_disconnected());

        mgr.connect_with_identity(NODE, identity()).await.unwrap();
        mgr.disconnect();
        mgr.disconnect();
        assert!(mgr.current_state().is_disconnected());
        assert!(mgr.identity().is_none());
        assert_eq!(transport.closed().len(), 2);
        assert_eq!(transport.live_handles(), 0);
    }

    #[tokio::test]
    async fn sessions_follow_state() {
        let (_, mgr) = manager();
        assert_eq!(
            mgr.read_session().unwrap_err(),
            ConnectionError::NotConnected
        );
        assert_eq!(
            mgr.signing_session().unwrap_err(),
            ConnectionError::NotConnected
        );

        mgr.connect(NODE).await.unwrap();
        assert!(mgr.read_session().is_ok());
        assert_eq!(
            mgr.signing_session().unwrap_err(),
            ConnectionError::SigningUnavailable
        );

        mgr.connect_with_identity(NODE, identity()).await.unwrap();
        assert!(mgr.signing_session().is_ok());
    }

    #[tokio::test]
    async fn reconnect_from_disconnected_fails() {
        let (_, mgr) = manager();
        assert_eq!(
            mgr.reconnect().await.unwrap_err(),
            ClientError::Connection(ConnectionError::NotConnected)
        );
    }

    #[tokio::test]
    async fn reconnect_reopens_signing_connection() {
        let (transport, mgr) = manager();
        let id = identity();
        mgr.connect_with_identity(NODE, Arc::clone(&id)).await.unwrap();
        mgr.reconnect().await.unwrap();

        assert!(mgr.current_state().is_signing());
        assert!(Arc::ptr_eq(&mgr.identity().unwrap(), &id));
        assert_eq!(transport.opened().len(), 4);
        assert_eq!(transport.closed().len(), 2);
        assert_eq!(transport.live_handles(), 2);
    }

    #[tokio::test]
    async fn reconnect_failure_leaves_disconnected() {
        let (transport, mgr) = manager();
        mgr.connect(NODE).await.unwrap();
        transport.fail_endpoint(NODE);
        assert!(mgr.reconnect().await.is_err());
        assert!(mgr.current_state().is_disconnected());
    }
}
