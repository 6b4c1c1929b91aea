//! Multi-Chain Transfer FSM
//!
//! Pays a fixed invoice from a connected wallet on one of the registered
//! chains, in the chain's native currency or one of its tokens.
//!
//! # State Machine
//!
//! ```text
//! IDLE → AWAITING_CONNECTION → AWAITING_CHAIN_SWITCH → SUBMITTING → PENDING → SUCCEEDED
//!              ↓                        ↓                   ↓
//!           FAILED                   FAILED              FAILED
//! ```
//!
//! Connection and chain-switch steps are skipped when the wallet session
//! already satisfies them.
//!
//! # Invariants
//!
//! 1. **One attempt at a time**: `start` while an attempt is in flight is a no-op
//! 2. **Snapshot intent**: selection changes never affect a running attempt
//! 3. **Broadcast = success**: `SUCCEEDED` means the wallet accepted the
//!    transaction for broadcast, not that it is confirmed
//! 4. **Never parked**: a dropped attempt fails with its phase's kind
//! 5. **Ordered delivery**: `events()` sees every transition, including
//!    `PENDING` and the reset to `IDLE` before a retry

pub mod error;
pub mod intent;
mod integration_tests;
pub mod orchestrator;
pub mod state;

// Re-exports for convenience
pub use error::{FailureKind, TransferError};
pub use intent::{Selection, TransferIntent};
pub use orchestrator::{
    AttemptId, EVENT_CAPACITY, StartOutcome, StateSnapshot, TransferOrchestrator,
};
pub use state::TransferState;
