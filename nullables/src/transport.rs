//! Nullable node transport: scripted answers, recorded calls.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use mychain_crypto::Identity;
use tokio::sync::Notify;
use mychain_transport::{NodeTransport, TransportError};
use mychain_types::{Amount, BroadcastResult, ChainMessage, FeeMode, GasPrice};

/// What a [`NullHandle`] was opened for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HandleKind {
    ReadOnly,
    Signing { signer: String, gas_price: GasPrice },
}

/// A handle issued by [`NullTransport`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NullHandle {
    pub id: u64,
    pub endpoint: String,
    pub kind: HandleKind,
}

/// One recorded `sign_and_broadcast` call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BroadcastCall {
    pub handle: u64,
    pub sender: String,
    pub messages: Vec<ChainMessage>,
    pub fee: FeeMode,
    pub memo: String,
}

#[derive(Default)]
struct State {
    next_id: u64,
    unreachable: HashSet<String>,
    height: u64,
    balances: HashMap<(String, String), String>,
    broadcast_results: VecDeque<Result<BroadcastResult, TransportError>>,
    broadcasts: Vec<BroadcastCall>,
    opened: Vec<NullHandle>,
    closed: Vec<NullHandle>,
    live: HashSet<u64>,
    gate: Option<Arc<Notify>>,
}

/// A test transport that never touches the network.
///
/// Clones share state, so a test can keep one copy for assertions while the
/// client owns another. Broadcasts succeed with a generated hash unless a
/// result has been queued with [`NullTransport::push_broadcast_result`].
///
/// Closing a handle does not abort a broadcast already past its liveness
/// check: it completes with its scripted answer.
#[derive(Clone, Default)]
pub struct NullTransport {
    state: Arc<Mutex<State>>,
}

impl NullTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every open against `endpoint` fail as unreachable.
    pub fn fail_endpoint(&self, endpoint: impl Into<String>) {
        self.state.lock().unwrap().unreachable.insert(endpoint.into());
    }

    /// Make `endpoint` reachable again.
    pub fn restore_endpoint(&self, endpoint: &str) {
        self.state.lock().unwrap().unreachable.remove(endpoint);
    }

    pub fn set_height(&self, height: u64) {
        self.state.lock().unwrap().height = height;
    }

    pub fn set_balance(&self, address: &str, denom: &str, value: &str) {
        self.state
            .lock()
            .unwrap()
            .balances
            .insert((address.to_string(), denom.to_string()), value.to_string());
    }

    /// Queue the answer for the next broadcast.
    pub fn push_broadcast_result(&self, result: BroadcastResult) {
        self.state
            .lock()
            .unwrap()
            .broadcast_results
            .push_back(Ok(result));
    }

    /// Queue a transport failure for the next broadcast.
    pub fn push_broadcast_error(&self, error: TransportError) {
        self.state
            .lock()
            .unwrap()
            .broadcast_results
            .push_back(Err(error));
    }

    /// Hold every later broadcast after it has been recorded until the
    /// returned gate is notified once per call.
    pub fn gate_broadcasts(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.state.lock().unwrap().gate = Some(gate.clone());
        gate
    }

    /// All broadcasts attempted so far.
    pub fn broadcasts(&self) -> Vec<BroadcastCall> {
        self.state.lock().unwrap().broadcasts.clone()
    }

    /// Every handle ever opened, in order.
    pub fn opened(&self) -> Vec<NullHandle> {
        self.state.lock().unwrap().opened.clone()
    }

    /// Every close call, in order (duplicates included).
    pub fn closed(&self) -> Vec<NullHandle> {
        self.state.lock().unwrap().closed.clone()
    }

    /// Number of handles opened and not yet closed.
    pub fn live_handles(&self) -> usize {
        self.state.lock().unwrap().live.len()
    }

    fn open(&self, endpoint: &str, kind: HandleKind) -> Result<NullHandle, TransportError> {
        let mut state = self.state.lock().unwrap();
        if state.unreachable.contains(endpoint) {
            return Err(TransportError::Unreachable(endpoint.to_string()));
        }
        state.next_id += 1;
        let handle = NullHandle {
            id: state.next_id,
            endpoint: endpoint.to_string(),
            kind,
        };
        state.live.insert(handle.id);
        state.opened.push(handle.clone());
        Ok(handle)
    }

    fn ensure_live(&self, handle: &NullHandle) -> Result<(), TransportError> {
        if self.state.lock().unwrap().live.contains(&handle.id) {
            Ok(())
        } else {
            Err(TransportError::Closed)
        }
    }
}

impl NodeTransport for NullTransport {
    type Handle = NullHandle;

    async fn open_read_only(&self, endpoint: &str) -> Result<NullHandle, TransportError> {
        self.open(endpoint, HandleKind::ReadOnly)
    }

    async fn open_signing(
        &self,
        endpoint: &str,
        identity: &Identity,
        gas_price: &GasPrice,
    ) -> Result<NullHandle, TransportError> {
        identity
            .primary_signing_key()
            .map_err(|e| TransportError::Handshake(e.to_string()))?;
        let signer = identity
            .primary_address()
            .map_err(|e| TransportError::Handshake(e.to_string()))?
            .to_string();
        self.open(
            endpoint,
            HandleKind::Signing {
                signer,
                gas_price: gas_price.clone(),
            },
        )
    }

    fn close(&self, handle: &NullHandle) {
        let mut state = self.state.lock().unwrap();
        state.live.remove(&handle.id);
        state.closed.push(handle.clone());
    }

    async fn height(&self, handle: &NullHandle) -> Result<u64, TransportError> {
        self.ensure_live(handle)?;
        Ok(self.state.lock().unwrap().height)
    }

    async fn balance(
        &self,
        handle: &NullHandle,
        address: &str,
        denom: &str,
    ) -> Result<Amount, TransportError> {
        self.ensure_live(handle)?;
        let state = self.state.lock().unwrap();
        Ok(
            match state.balances.get(&(address.to_string(), denom.to_string())) {
                Some(value) => Amount {
                    denom: denom.to_string(),
                    value: value.clone(),
                },
                None => Amount::zero(denom),
            },
        )
    }

    async fn sign_and_broadcast(
        &self,
        handle: &NullHandle,
        sender: &str,
        messages: &[ChainMessage],
        fee: &FeeMode,
        memo: &str,
    ) -> Result<BroadcastResult, TransportError> {
        self.ensure_live(handle)?;
        let (sequence, gate) = {
            let mut state = self.state.lock().unwrap();
            state.broadcasts.push(BroadcastCall {
                handle: handle.id,
                sender: sender.to_string(),
                messages: messages.to_vec(),
                fee: fee.clone(),
                memo: memo.to_string(),
            });
            (state.broadcasts.len(), state.gate.clone())
        };
        if let Some(gate) = gate {
            gate.notified().await;
        }
        let mut state = self.state.lock().unwrap();
        state.broadcast_results.pop_front().unwrap_or_else(|| {
            Ok(BroadcastResult {
                code: 0,
                transaction_hash: format!("{sequence:064X}"),
                raw_log: String::new(),
            })
        })
    }
}
