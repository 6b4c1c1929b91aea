//! Transfer Orchestrator
//!
//! Drives one transfer attempt at a time through the FSM:
//! connect (if needed) -> switch chain (if needed) -> submit -> terminal.
//!
//! State lives behind a short-lived `Mutex` that is never held across an
//! await. Every publication is tagged with the attempt id; a result whose
//! tag no longer matches the current attempt is discarded.
//!
//! Observers get two views: [`TransferOrchestrator::watch`] holds only the
//! latest snapshot, [`TransferOrchestrator::events`] delivers every
//! transition in order.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::{broadcast, watch};
use tracing::{debug, error, info, warn};

use super::error::{FailureKind, TransferError};
use super::intent::{Selection, TransferIntent};
use super::state::TransferState;
use crate::money;
use crate::registry::{
    AssetSelection, AssetSpec, ChainId, ChainRegistry, RegistryError, is_evm_address,
    short_address,
};
use crate::submission::{self, SubmissionError, SubmissionPlan};
use crate::wallet::{TxHandle, WalletError, WalletSessionAdapter};

/// Monotonic attempt identifier
pub type AttemptId = u64;

/// Transitions buffered per `events()` receiver before it lags
pub const EVENT_CAPACITY: usize = 64;

/// What observers receive on every transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSnapshot {
    pub attempt_id: AttemptId,
    pub state: TransferState,
}

/// Result of a `start()` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    /// Ran an attempt to its terminal state
    Finished {
        attempt_id: AttemptId,
        state: TransferState,
    },
    /// Another attempt was in flight; nothing happened
    Ignored { active_attempt: AttemptId },
}

impl StartOutcome {
    pub fn state(&self) -> Option<&TransferState> {
        match self {
            StartOutcome::Finished { state, .. } => Some(state),
            StartOutcome::Ignored { .. } => None,
        }
    }
}

struct Inner {
    selection: Selection,
    attempt_id: AttemptId,
    state: TransferState,
}

/// Why a step stopped short of the next transition
enum Interrupt {
    Failed(TransferError),
    /// Attempt is no longer current
    Stale,
}

impl From<TransferError> for Interrupt {
    fn from(e: TransferError) -> Self {
        Interrupt::Failed(e)
    }
}

pub struct TransferOrchestrator {
    registry: Arc<ChainRegistry>,
    wallet: WalletSessionAdapter,
    recipient: String,
    inner: Mutex<Inner>,
    latest: watch::Sender<StateSnapshot>,
    events: broadcast::Sender<StateSnapshot>,
}

impl TransferOrchestrator {
    /// Fails when `recipient` is not a `0x` + 40-hex address
    pub fn new(
        registry: Arc<ChainRegistry>,
        wallet: WalletSessionAdapter,
        recipient: impl Into<String>,
    ) -> Result<Self, SubmissionError> {
        let recipient = recipient.into();
        if !is_evm_address(&recipient) {
            return Err(SubmissionError::InvalidRecipient(recipient));
        }

        let selection = Selection::default_for(&registry);
        let (latest, _rx) = watch::channel(StateSnapshot {
            attempt_id: 0,
            state: TransferState::Idle,
        });
        let (events, _rx) = broadcast::channel(EVENT_CAPACITY);
        Ok(Self {
            registry,
            wallet,
            recipient,
            inner: Mutex::new(Inner {
                selection,
                attempt_id: 0,
                state: TransferState::Idle,
            }),
            latest,
            events,
        })
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ------------------------------------------------------------------
    // Observation
    // ------------------------------------------------------------------

    /// Latest snapshot only; intermediate transitions may be coalesced
    pub fn watch(&self) -> watch::Receiver<StateSnapshot> {
        self.latest.subscribe()
    }

    /// Every transition published after this call, in order
    pub fn events(&self) -> broadcast::Receiver<StateSnapshot> {
        self.events.subscribe()
    }

    pub fn snapshot(&self) -> StateSnapshot {
        let inner = self.lock();
        StateSnapshot {
            attempt_id: inner.attempt_id,
            state: inner.state.clone(),
        }
    }

    pub fn state(&self) -> TransferState {
        self.lock().state.clone()
    }

    pub fn selection(&self) -> Selection {
        self.lock().selection.clone()
    }

    pub fn registry(&self) -> &ChainRegistry {
        &self.registry
    }

    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    /// `0x9264...98fd`
    pub fn short_recipient(&self) -> String {
        short_address(&self.recipient)
    }

    fn selected_asset(&self) -> Result<AssetSpec, RegistryError> {
        let selection = self.selection();
        self.registry.get_asset(selection.chain_id, &selection.asset)
    }

    /// Symbol of the selected asset ("USDT", "BNB")
    pub fn display_symbol(&self) -> String {
        self.selected_asset()
            .map(|spec| spec.symbol)
            .unwrap_or_default()
    }

    /// Fixed amount of the selected asset as a decimal string
    pub fn display_amount(&self) -> String {
        self.selected_asset()
            .ok()
            .and_then(|spec| {
                money::parse_amount(&spec.fixed_amount, spec.decimals)
                    .ok()
                    .map(|units| money::display_amount(units, spec.decimals))
            })
            .unwrap_or_default()
    }

    // ------------------------------------------------------------------
    // Selection handlers
    // ------------------------------------------------------------------

    /// Select a chain; the asset is re-validated and falls back to the
    /// chain's default when the new chain lacks it
    pub fn select_chain(&self, chain_id: ChainId) -> Result<Selection, RegistryError> {
        let mut inner = self.lock();
        let selection = inner.selection.with_chain(&self.registry, chain_id)?;
        if selection.asset != inner.selection.asset {
            debug!(
                chain_id,
                from = %inner.selection.asset,
                to = %selection.asset,
                "Asset not on new chain, falling back to default"
            );
        }
        inner.selection = selection.clone();
        self.clear_terminal(&mut inner);
        info!(chain_id, asset = %selection.asset, "Chain selected");
        Ok(selection)
    }

    pub fn select_asset(&self, asset: AssetSelection) -> Result<Selection, RegistryError> {
        let mut inner = self.lock();
        let selection = inner.selection.with_asset(&self.registry, asset)?;
        inner.selection = selection.clone();
        self.clear_terminal(&mut inner);
        info!(chain_id = selection.chain_id, asset = %selection.asset, "Asset selected");
        Ok(selection)
    }

    /// Terminal -> Idle, clearing the previous hash or error
    fn clear_terminal(&self, inner: &mut Inner) {
        if inner.state.is_terminal() {
            inner.state = TransferState::Idle;
            self.publish(inner);
        }
    }

    /// Called with the lock held, so both channels see transitions in order
    fn publish(&self, inner: &Inner) {
        let snapshot = StateSnapshot {
            attempt_id: inner.attempt_id,
            state: inner.state.clone(),
        };
        // No receivers is fine
        let _ = self.events.send(snapshot.clone());
        self.latest.send_replace(snapshot);
    }

    // ------------------------------------------------------------------
    // Attempt lifecycle
    // ------------------------------------------------------------------

    /// Run one transfer attempt for the current selection.
    ///
    /// No-op while another attempt is in flight. From a terminal state the
    /// machine resets to `Idle` first. Dropping the returned future before it
    /// completes fails the attempt with the kind of the phase it was in.
    pub async fn start(&self) -> StartOutcome {
        let (attempt_id, intent) = {
            let mut inner = self.lock();
            if inner.state.is_active() {
                debug!(
                    attempt_id = inner.attempt_id,
                    state = %inner.state,
                    "Start ignored, attempt in flight"
                );
                return StartOutcome::Ignored {
                    active_attempt: inner.attempt_id,
                };
            }
            self.clear_terminal(&mut inner);

            inner.attempt_id += 1;
            let attempt_id = inner.attempt_id;

            let resolved =
                TransferIntent::resolve(&self.registry, &inner.selection, &self.recipient);
            let intent = match resolved {
                Ok(intent) => intent,
                Err(e) => {
                    error!(attempt_id, error = %e, "Selection does not resolve against registry");
                    let err = TransferError::from(e);
                    inner.state = TransferState::Failed {
                        kind: err.kind(),
                        message: err.message(),
                    };
                    self.publish(&inner);
                    return StartOutcome::Finished {
                        attempt_id,
                        state: inner.state.clone(),
                    };
                }
            };

            let session = self.wallet.get_session();
            inner.state = if !session.is_connected {
                TransferState::AwaitingConnection
            } else if !session.is_on(intent.chain_id) {
                TransferState::AwaitingChainSwitch
            } else {
                TransferState::Submitting
            };
            info!(
                attempt_id,
                wallet = self.wallet.provider_name(),
                chain_id = intent.chain_id,
                asset = %intent.asset,
                amount = %intent.amount,
                state = %inner.state,
                "Transfer attempt started"
            );
            self.publish(&inner);
            (attempt_id, intent)
        };

        let mut guard = AttemptGuard {
            orchestrator: self,
            attempt_id,
            armed: true,
        };

        let result = self.run(attempt_id, &intent).await;
        guard.armed = false;

        match result {
            Ok(handle) => {
                // Pending then immediately Succeeded: "accepted for broadcast"
                if self.advance(attempt_id, TransferState::Pending(handle.hash.clone())) {
                    self.advance(attempt_id, TransferState::Succeeded(handle.hash));
                }
            }
            Err(Interrupt::Failed(e)) => {
                warn!(attempt_id, code = e.code(), error = %e, "Transfer attempt failed");
                self.advance(
                    attempt_id,
                    TransferState::Failed {
                        kind: e.kind(),
                        message: e.message(),
                    },
                );
            }
            Err(Interrupt::Stale) => {
                debug!(attempt_id, "Stale attempt result discarded");
            }
        }

        StartOutcome::Finished {
            attempt_id,
            state: self.state(),
        }
    }

    async fn run(
        &self,
        attempt_id: AttemptId,
        intent: &TransferIntent,
    ) -> Result<TxHandle, Interrupt> {
        // Step 1: connection
        if !self.wallet.get_session().is_connected {
            self.wallet.connect().await.map_err(TransferError::Connection)?;
        }
        let session = self.wallet.get_session();
        if !session.is_connected {
            return Err(disconnected());
        }

        // Step 2: chain sync
        if !session.is_on(intent.chain_id) {
            self.step(attempt_id, TransferState::AwaitingChainSwitch)?;
            self.wallet
                .switch_chain(intent.chain_id)
                .await
                .map_err(TransferError::ChainSwitch)?;

            let session = self.wallet.get_session();
            if !session.is_connected {
                return Err(disconnected());
            }
        }

        // Step 3: submit
        self.step(attempt_id, TransferState::Submitting)?;
        let chain = self
            .registry
            .get_chain(intent.chain_id)
            .map_err(TransferError::from)?;
        let plan = submission::build_plan(chain, &intent.asset, &intent.recipient)
            .map_err(TransferError::from)?;

        let handle = match &plan {
            SubmissionPlan::Native(native) => {
                self.wallet.send_native(&native.to, native.amount).await
            }
            SubmissionPlan::Token(token) => {
                self.wallet
                    .send_token_transfer(&token.contract, &token.to, token.amount)
                    .await
            }
        }
        .map_err(TransferError::Submission)?;

        Ok(handle)
    }

    /// Move the current attempt to `state` unless it is already there
    fn step(&self, attempt_id: AttemptId, state: TransferState) -> Result<(), Interrupt> {
        let mut inner = self.lock();
        if inner.attempt_id != attempt_id || !inner.state.is_active() {
            return Err(Interrupt::Stale);
        }
        if inner.state != state {
            info!(attempt_id, from = %inner.state, to = %state, "Transfer state transition");
            inner.state = state;
            self.publish(&inner);
        }
        Ok(())
    }

    /// Apply a transition for `attempt_id`; false when the attempt is stale
    fn advance(&self, attempt_id: AttemptId, state: TransferState) -> bool {
        let mut inner = self.lock();
        if inner.attempt_id != attempt_id || !inner.state.is_active() {
            debug!(
                attempt_id,
                current = inner.attempt_id,
                discarded = %state,
                "Discarding stale transition"
            );
            return false;
        }
        info!(attempt_id, from = %inner.state, to = %state, "Transfer state transition");
        inner.state = state;
        self.publish(&inner);
        true
    }

    fn abandon(&self, attempt_id: AttemptId) {
        let mut inner = self.lock();
        if inner.attempt_id != attempt_id {
            return;
        }
        let Some(kind) = inner.state.abandon_kind() else {
            return;
        };
        warn!(attempt_id, phase = %inner.state, "Transfer attempt dropped before completion");
        let err = TransferError::Abandoned(kind);
        inner.state = TransferState::Failed {
            kind,
            message: err.message(),
        };
        self.publish(&inner);
    }
}

fn disconnected() -> Interrupt {
    TransferError::Connection(WalletError::ConnectionUnavailable(None)).into()
}

/// Fails the attempt if `start()` is dropped mid-flight
struct AttemptGuard<'a> {
    orchestrator: &'a TransferOrchestrator,
    attempt_id: AttemptId,
    armed: bool,
}

impl Drop for AttemptGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.orchestrator.abandon(self.attempt_id);
        }
    }
}
