//! In-process wallet for tests and the demo binary
//!
//! Scriptable: failure switches per call, counters, and gates that hold a
//! call open until the test releases it.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tokio::sync::Notify;
use uuid::Uuid;

use super::{TxHandle, WalletError, WalletProvider, WalletSession};
use crate::registry::ChainId;

/// Default mock account
pub const MOCK_ADDRESS: &str = "0x5B38Da6a701c568545dCfcB03FcB875f56beddC4";

/// Provider calls that can be gated or scripted to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockCall {
    Connect,
    SwitchChain,
    SendNative,
    SendToken,
}

/// A transfer the mock accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentTx {
    Native {
        chain_id: Option<ChainId>,
        to: String,
        amount: u128,
        hash: String,
    },
    Token {
        chain_id: Option<ChainId>,
        contract: String,
        to: String,
        amount: u128,
        hash: String,
    },
}

/// Held call; see [`MockWallet::hold`]
#[derive(Clone)]
pub struct Gate {
    entered: Arc<Notify>,
    release: Arc<Notify>,
}

impl Gate {
    fn new() -> Self {
        Self {
            entered: Arc::new(Notify::new()),
            release: Arc::new(Notify::new()),
        }
    }

    /// Resolves once the gated call has started
    pub async fn entered(&self) {
        self.entered.notified().await;
    }

    /// Let the gated call continue
    pub fn release(&self) {
        self.release.notify_one();
    }
}

#[derive(Default)]
struct Behaviour {
    session: WalletSession,
    failures: HashMap<MockCall, WalletError>,
    gates: HashMap<MockCall, Gate>,
    /// connect() returns Ok without establishing a session
    silent_connect: bool,
    /// switch_chain() returns Ok without moving
    silent_switch: bool,
    sent: Vec<SentTx>,
}

pub struct MockWallet {
    state: Mutex<Behaviour>,
    connect_count: AtomicUsize,
    switch_count: AtomicUsize,
    native_count: AtomicUsize,
    token_count: AtomicUsize,
}

impl MockWallet {
    fn with_session(session: WalletSession) -> Self {
        Self {
            state: Mutex::new(Behaviour {
                session,
                ..Default::default()
            }),
            connect_count: AtomicUsize::new(0),
            switch_count: AtomicUsize::new(0),
            native_count: AtomicUsize::new(0),
            token_count: AtomicUsize::new(0),
        }
    }

    /// Wallet installed but not yet connected; it will sit on `chain_id`
    pub fn disconnected(chain_id: ChainId) -> Self {
        Self::with_session(WalletSession {
            is_connected: false,
            address: None,
            active_chain_id: Some(chain_id),
        })
    }

    pub fn connected(chain_id: ChainId) -> Self {
        Self::with_session(WalletSession {
            is_connected: true,
            address: Some(MOCK_ADDRESS.to_string()),
            active_chain_id: Some(chain_id),
        })
    }

    fn state(&self) -> MutexGuard<'_, Behaviour> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Script `call` to fail with `error` until cleared
    pub fn fail(&self, call: MockCall, error: WalletError) {
        self.state().failures.insert(call, error);
    }

    pub fn fail_connect(&self, error: WalletError) {
        self.fail(MockCall::Connect, error);
    }

    pub fn fail_switch(&self, error: WalletError) {
        self.fail(MockCall::SwitchChain, error);
    }

    pub fn fail_native(&self, error: WalletError) {
        self.fail(MockCall::SendNative, error);
    }

    pub fn fail_token(&self, error: WalletError) {
        self.fail(MockCall::SendToken, error);
    }

    pub fn clear_failure(&self, call: MockCall) {
        self.state().failures.remove(&call);
    }

    pub fn set_connect_is_silent(&self, silent: bool) {
        self.state().silent_connect = silent;
    }

    pub fn set_switch_is_silent(&self, silent: bool) {
        self.state().silent_switch = silent;
    }

    /// Hold the next `call` open until the returned gate is released
    pub fn hold(&self, call: MockCall) -> Gate {
        let gate = Gate::new();
        self.state().gates.insert(call, gate.clone());
        gate
    }

    /// Move the wallet as if the user changed network in the wallet UI
    pub fn set_active_chain(&self, chain_id: ChainId) {
        self.state().session.active_chain_id = Some(chain_id);
    }

    pub fn disconnect(&self) {
        let mut state = self.state();
        state.session.is_connected = false;
        state.session.address = None;
    }

    pub fn sent(&self) -> Vec<SentTx> {
        self.state().sent.clone()
    }

    pub fn connect_count(&self) -> usize {
        self.connect_count.load(Ordering::SeqCst)
    }

    pub fn switch_count(&self) -> usize {
        self.switch_count.load(Ordering::SeqCst)
    }

    pub fn native_count(&self) -> usize {
        self.native_count.load(Ordering::SeqCst)
    }

    pub fn token_count(&self) -> usize {
        self.token_count.load(Ordering::SeqCst)
    }

    /// Wait on the gate for `call`, if one is set; then report scripted failure
    async fn enter(&self, call: MockCall) -> Result<(), WalletError> {
        let gate = self.state().gates.remove(&call);
        if let Some(gate) = gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
        match self.state().failures.get(&call) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

fn fake_tx_hash() -> String {
    format!("0x{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

#[async_trait]
impl WalletProvider for MockWallet {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn session(&self) -> WalletSession {
        self.state().session.clone()
    }

    async fn connect(&self) -> Result<(), WalletError> {
        self.connect_count.fetch_add(1, Ordering::SeqCst);
        self.enter(MockCall::Connect).await?;

        let mut state = self.state();
        if !state.silent_connect {
            state.session.is_connected = true;
            state.session.address = Some(MOCK_ADDRESS.to_string());
        }
        Ok(())
    }

    async fn switch_chain(&self, chain_id: ChainId) -> Result<(), WalletError> {
        self.switch_count.fetch_add(1, Ordering::SeqCst);
        self.enter(MockCall::SwitchChain).await?;

        let mut state = self.state();
        if !state.silent_switch {
            state.session.active_chain_id = Some(chain_id);
        }
        Ok(())
    }

    async fn send_native(&self, to: &str, amount: u128) -> Result<TxHandle, WalletError> {
        self.native_count.fetch_add(1, Ordering::SeqCst);
        self.enter(MockCall::SendNative).await?;

        let hash = fake_tx_hash();
        let mut state = self.state();
        let chain_id = state.session.active_chain_id;
        state.sent.push(SentTx::Native {
            chain_id,
            to: to.to_string(),
            amount,
            hash: hash.clone(),
        });
        Ok(TxHandle::new(hash))
    }

    async fn send_token_transfer(
        &self,
        contract: &str,
        to: &str,
        amount: u128,
    ) -> Result<TxHandle, WalletError> {
        self.token_count.fetch_add(1, Ordering::SeqCst);
        self.enter(MockCall::SendToken).await?;

        let hash = fake_tx_hash();
        let mut state = self.state();
        let chain_id = state.session.active_chain_id;
        state.sent.push(SentTx::Token {
            chain_id,
            contract: contract.to_string(),
            to: to.to_string(),
            amount,
            hash: hash.clone(),
        });
        Ok(TxHandle::new(hash))
    }
}
