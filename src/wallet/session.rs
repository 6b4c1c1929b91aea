//! Wallet Session Adapter

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{TxHandle, WalletError, WalletProvider, WalletSession};
use crate::registry::{ChainId, short_address};

/// Narrow facade over a `WalletProvider`
///
/// The adapter never caches session state: every read goes to the provider.
#[derive(Clone)]
pub struct WalletSessionAdapter {
    provider: Arc<dyn WalletProvider>,
}

impl WalletSessionAdapter {
    pub fn new(provider: Arc<dyn WalletProvider>) -> Self {
        Self { provider }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    pub fn get_session(&self) -> WalletSession {
        let session = self.provider.session();
        debug!(
            provider = self.provider.name(),
            connected = session.is_connected,
            chain_id = ?session.active_chain_id,
            "Wallet session read"
        );
        session
    }

    /// Connect, then confirm the provider actually reports a session
    pub async fn connect(&self) -> Result<(), WalletError> {
        info!(provider = self.provider.name(), "Requesting wallet connection");
        if let Err(e) = self.provider.connect().await {
            warn!(provider = self.provider.name(), error = %e, "Wallet connection failed");
            return Err(e);
        }

        let session = self.provider.session();
        if !session.is_connected {
            warn!(
                provider = self.provider.name(),
                "Provider accepted connect but session is still disconnected"
            );
            return Err(WalletError::ConnectionUnavailable(Some(
                "wallet reported no session after connect".to_string(),
            )));
        }

        info!(
            provider = self.provider.name(),
            address = %session.address.as_deref().map(short_address).unwrap_or_default(),
            chain_id = ?session.active_chain_id,
            "Wallet connected"
        );
        Ok(())
    }

    /// Ok only when the wallet ends up on `chain_id`
    pub async fn switch_chain(&self, chain_id: ChainId) -> Result<(), WalletError> {
        info!(provider = self.provider.name(), chain_id, "Requesting chain switch");
        if let Err(e) = self.provider.switch_chain(chain_id).await {
            warn!(provider = self.provider.name(), chain_id, error = %e, "Chain switch failed");
            return Err(e);
        }

        let session = self.provider.session();
        if !session.is_on(chain_id) {
            warn!(
                provider = self.provider.name(),
                requested = chain_id,
                active = ?session.active_chain_id,
                "Wallet did not land on requested chain"
            );
            return Err(WalletError::ChainUnsupported(Some(format!(
                "wallet remained on chain {}",
                session
                    .active_chain_id
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| "none".to_string())
            ))));
        }

        info!(provider = self.provider.name(), chain_id, "Chain switched");
        Ok(())
    }

    pub async fn send_native(&self, to: &str, amount: u128) -> Result<TxHandle, WalletError> {
        info!(
            provider = self.provider.name(),
            to = %short_address(to),
            amount = %amount,
            "Submitting native transfer"
        );
        let result = self.provider.send_native(to, amount).await;
        log_submission("native", &result);
        result
    }

    pub async fn send_token_transfer(
        &self,
        contract: &str,
        to: &str,
        amount: u128,
    ) -> Result<TxHandle, WalletError> {
        info!(
            provider = self.provider.name(),
            contract = %short_address(contract),
            to = %short_address(to),
            amount = %amount,
            "Submitting token transfer"
        );
        let result = self.provider.send_token_transfer(contract, to, amount).await;
        log_submission("token", &result);
        result
    }
}

fn log_submission(kind: &'static str, result: &Result<TxHandle, WalletError>) {
    match result {
        Ok(handle) => info!(kind, tx_hash = %handle.hash, "Transaction accepted for broadcast"),
        Err(e) => warn!(kind, error = %e, code = e.code(), "Transaction submission failed"),
    }
}
