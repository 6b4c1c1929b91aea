//! Wallet Session
//!
//! The wallet (signer, session holder, RPC transport) is an external
//! capability. `WalletProvider` is the seam the rest of the crate talks
//! through; `WalletSessionAdapter` wraps any provider with logging and the
//! post-call session checks the orchestrator relies on.

pub mod error;
#[cfg(any(test, feature = "mock-wallet"))]
pub mod mock;
pub mod session;

pub use error::WalletError;
#[cfg(any(test, feature = "mock-wallet"))]
pub use mock::{MockCall, MockWallet, SentTx};
pub use session::WalletSessionAdapter;

use async_trait::async_trait;

use crate::registry::ChainId;

/// Snapshot of the externally owned wallet session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalletSession {
    pub is_connected: bool,
    pub address: Option<String>,
    pub active_chain_id: Option<ChainId>,
}

impl WalletSession {
    pub fn is_on(&self, chain_id: ChainId) -> bool {
        self.active_chain_id == Some(chain_id)
    }
}

/// Handle for a transaction the wallet accepted for broadcast
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxHandle {
    pub hash: String,
}

impl TxHandle {
    pub fn new(hash: impl Into<String>) -> Self {
        Self { hash: hash.into() }
    }
}

/// External wallet capability
///
/// Calls may take unbounded time (the user is looking at a signing prompt).
/// Implementations must not block the runtime while waiting.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Provider name for logging
    fn name(&self) -> &'static str;

    /// Current session; never suspends
    fn session(&self) -> WalletSession;

    async fn connect(&self) -> Result<(), WalletError>;

    async fn switch_chain(&self, chain_id: ChainId) -> Result<(), WalletError>;

    /// Plain value transfer in the chain's native currency
    async fn send_native(&self, to: &str, amount: u128) -> Result<TxHandle, WalletError>;

    /// ERC-20 `transfer(to, amount)` on `contract`
    async fn send_token_transfer(
        &self,
        contract: &str,
        to: &str,
        amount: u128,
    ) -> Result<TxHandle, WalletError>;
}
