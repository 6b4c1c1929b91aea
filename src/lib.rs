//! chainpay - Multi-Chain Invoice Payments
//!
//! Pays a fixed-size invoice from a connected wallet on one of several EVM
//! chains, in the chain's native currency or a registered ERC-20 token.
//!
//! # Modules
//!
//! - [`money`] - Exact decimal string <-> base-unit conversion
//! - [`registry`] - Supported chains, tokens and fixed amounts
//! - [`wallet`] - Wallet-provider seam and session adapter
//! - [`submission`] - Native send vs. token call planning
//! - [`transfer`] - Transfer FSM / orchestrator
//! - [`market`] - Cached USD price and history proxy
//! - [`gateway`] - HTTP surface for the market-data proxy
//! - [`config`] / [`logging`] - Ambient setup

pub mod config;
pub mod gateway;
pub mod logging;
pub mod market;
pub mod money;
pub mod registry;
pub mod submission;
pub mod transfer;
pub mod wallet;

// Convenient re-exports at crate root
pub use registry::{AssetSelection, Chain, ChainId, ChainRegistry};
pub use submission::{NativePlan, SubmissionPlan, TokenPlan, build_plan};
pub use transfer::{FailureKind, StartOutcome, TransferOrchestrator, TransferState};
pub use wallet::{WalletError, WalletProvider, WalletSession, WalletSessionAdapter};
