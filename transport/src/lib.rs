//! The node transport consumed by the MyChain client.
//!
//! The client never speaks to a node directly. It opens handles, queries and
//! broadcasts through a [`NodeTransport`], so the wire protocol (Tendermint
//! RPC, websocket, gRPC) and the transaction encoding stay outside the core.
//! Tests plug in `mychain_nullables::NullTransport`.

use std::fmt::Debug;
use std::future::Future;

use mychain_crypto::Identity;
use mychain_types::{Amount, BroadcastResult, ChainMessage, FeeMode, GasPrice};
use thiserror::Error;

/// Failures reported by a transport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("endpoint unreachable: {0}")]
    Unreachable(String),

    #[error("handshake rejected: {0}")]
    Handshake(String),

    #[error("handle is closed")]
    Closed,

    #[error("request failed: {0}")]
    Request(String),
}

/// Everything the client needs from a node connection.
///
/// Handles are cheap to clone; a clone refers to the same underlying
/// connection. No method enforces a timeout of its own.
pub trait NodeTransport: Send + Sync {
    type Handle: Clone + Debug + Send + Sync;

    /// Open a query-only connection to `endpoint`.
    fn open_read_only(
        &self,
        endpoint: &str,
    ) -> impl Future<Output = Result<Self::Handle, TransportError>> + Send;

    /// Open a connection able to sign with `identity`, pricing gas at `gas_price`.
    fn open_signing(
        &self,
        endpoint: &str,
        identity: &Identity,
        gas_price: &GasPrice,
    ) -> impl Future<Output = Result<Self::Handle, TransportError>> + Send;

    /// Release a handle. Closing twice is harmless.
    ///
    /// Calls already in flight on a clone of `handle` are not aborted: they
    /// finish (or fail) on their own. Calls started after the close fail with
    /// [`TransportError::Closed`].
    fn close(&self, handle: &Self::Handle);

    /// Latest block height.
    fn height(
        &self,
        handle: &Self::Handle,
    ) -> impl Future<Output = Result<u64, TransportError>> + Send;

    /// Balance of `address` in `denom`; a zero amount when the account holds none.
    fn balance(
        &self,
        handle: &Self::Handle,
        address: &str,
        denom: &str,
    ) -> impl Future<Output = Result<Amount, TransportError>> + Send;

    /// Sign `messages` as `sender`, broadcast them and wait for the
    /// synchronous check result (not block inclusion).
    fn sign_and_broadcast(
        &self,
        handle: &Self::Handle,
        sender: &str,
        messages: &[ChainMessage],
        fee: &FeeMode,
        memo: &str,
    ) -> impl Future<Output = Result<BroadcastResult, TransportError>> + Send;
}
