//! Wallet Error Types
//!
//! Every variant carries the provider's human-readable reason when it gave
//! one; the orchestrator falls back to a generic message otherwise.

use thiserror::Error;

fn suffix(reason: &Option<String>) -> String {
    match reason {
        Some(r) if !r.is_empty() => format!(": {}", r),
        _ => String::new(),
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WalletError {
    // === Session ===
    #[error("Connection rejected{}", suffix(.0))]
    ConnectionRejected(Option<String>),

    #[error("Wallet unavailable{}", suffix(.0))]
    ConnectionUnavailable(Option<String>),

    #[error("Chain switch rejected{}", suffix(.0))]
    SwitchRejected(Option<String>),

    #[error("Chain not supported by wallet{}", suffix(.0))]
    ChainUnsupported(Option<String>),

    // === Submission ===
    #[error("User rejected the request{}", suffix(.0))]
    UserRejected(Option<String>),

    #[error("Insufficient funds{}", suffix(.0))]
    InsufficientFunds(Option<String>),

    #[error("Submission failed{}", suffix(.0))]
    SubmissionFailed(Option<String>),

    #[error("Contract call reverted{}", suffix(.0))]
    ContractCallReverted(Option<String>),
}

impl WalletError {
    /// Provider-supplied reason, if any
    pub fn reason(&self) -> Option<&str> {
        let reason = match self {
            WalletError::ConnectionRejected(r)
            | WalletError::ConnectionUnavailable(r)
            | WalletError::SwitchRejected(r)
            | WalletError::ChainUnsupported(r)
            | WalletError::UserRejected(r)
            | WalletError::InsufficientFunds(r)
            | WalletError::SubmissionFailed(r)
            | WalletError::ContractCallReverted(r) => r,
        };
        reason.as_deref().filter(|r| !r.is_empty())
    }

    pub fn code(&self) -> &'static str {
        match self {
            WalletError::ConnectionRejected(_) => "CONNECTION_REJECTED",
            WalletError::ConnectionUnavailable(_) => "CONNECTION_UNAVAILABLE",
            WalletError::SwitchRejected(_) => "SWITCH_REJECTED",
            WalletError::ChainUnsupported(_) => "CHAIN_UNSUPPORTED",
            WalletError::UserRejected(_) => "USER_REJECTED",
            WalletError::InsufficientFunds(_) => "INSUFFICIENT_FUNDS",
            WalletError::SubmissionFailed(_) => "SUBMISSION_FAILED",
            WalletError::ContractCallReverted(_) => "CONTRACT_CALL_REVERTED",
        }
    }
}
