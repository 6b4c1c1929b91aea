//! Transfer Error Types
//!
//! `FailureKind` is the closed taxonomy a failed attempt ends in. Every
//! error the orchestrator can meet maps onto exactly one kind.

use std::fmt;

use thiserror::Error;

use crate::registry::RegistryError;
use crate::submission::SubmissionError;
use crate::wallet::WalletError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    ConnectionError,
    ChainSwitchError,
    UserRejectedSignature,
    InsufficientFunds,
    ContractCallReverted,
    SubmissionFailed,
    /// Internal consistency fault: selection not in the registry
    UnknownAssetForChain,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::ConnectionError => "CONNECTION_ERROR",
            FailureKind::ChainSwitchError => "CHAIN_SWITCH_ERROR",
            FailureKind::UserRejectedSignature => "USER_REJECTED_SIGNATURE",
            FailureKind::InsufficientFunds => "INSUFFICIENT_FUNDS",
            FailureKind::ContractCallReverted => "CONTRACT_CALL_REVERTED",
            FailureKind::SubmissionFailed => "SUBMISSION_FAILED",
            FailureKind::UnknownAssetForChain => "UNKNOWN_ASSET_FOR_CHAIN",
        }
    }

    /// Message shown when the wallet gave no reason
    pub fn fallback_message(&self) -> &'static str {
        match self {
            FailureKind::ConnectionError => "Failed to connect wallet. Please try again.",
            FailureKind::ChainSwitchError => "Failed to switch network. Please switch manually.",
            FailureKind::UserRejectedSignature => "Transaction was rejected in the wallet.",
            FailureKind::InsufficientFunds => "Insufficient funds for this transfer.",
            FailureKind::ContractCallReverted => "Token contract rejected the transfer.",
            FailureKind::SubmissionFailed => "Transaction failed. Please try again.",
            FailureKind::UnknownAssetForChain => {
                "Selected asset is not available on this network."
            }
        }
    }

    /// One-to-one wallet error mapping
    pub fn from_wallet(error: &WalletError) -> Self {
        match error {
            WalletError::ConnectionRejected(_) | WalletError::ConnectionUnavailable(_) => {
                FailureKind::ConnectionError
            }
            WalletError::SwitchRejected(_) | WalletError::ChainUnsupported(_) => {
                FailureKind::ChainSwitchError
            }
            WalletError::UserRejected(_) => FailureKind::UserRejectedSignature,
            WalletError::InsufficientFunds(_) => FailureKind::InsufficientFunds,
            WalletError::ContractCallReverted(_) => FailureKind::ContractCallReverted,
            WalletError::SubmissionFailed(_) => FailureKind::SubmissionFailed,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug, Clone)]
pub enum TransferError {
    /// Connect step failed, whatever the wallet called it
    #[error("Connection failed: {0}")]
    Connection(WalletError),

    /// Switch step failed, whatever the wallet called it
    #[error("Chain switch failed: {0}")]
    ChainSwitch(WalletError),

    #[error("Submission failed: {0}")]
    Submission(WalletError),

    #[error(transparent)]
    Plan(#[from] SubmissionError),

    #[error("Registry lookup failed: {0}")]
    Registry(String),

    /// Attempt future dropped mid-flight
    #[error("Transfer attempt abandoned")]
    Abandoned(FailureKind),
}

impl From<RegistryError> for TransferError {
    fn from(e: RegistryError) -> Self {
        TransferError::Registry(e.to_string())
    }
}

impl TransferError {
    pub fn kind(&self) -> FailureKind {
        match self {
            TransferError::Connection(_) => FailureKind::ConnectionError,
            TransferError::ChainSwitch(_) => FailureKind::ChainSwitchError,
            TransferError::Submission(e) => FailureKind::from_wallet(e),
            TransferError::Plan(SubmissionError::InvalidRecipient(_)) => {
                FailureKind::SubmissionFailed
            }
            TransferError::Plan(_) | TransferError::Registry(_) => {
                FailureKind::UnknownAssetForChain
            }
            TransferError::Abandoned(kind) => *kind,
        }
    }

    /// Error code for API responses and logs
    pub fn code(&self) -> &'static str {
        self.kind().as_str()
    }

    /// User-facing message: the wallet's reason when present, else the
    /// kind's fallback
    pub fn message(&self) -> String {
        let reason = match self {
            TransferError::Connection(e)
            | TransferError::ChainSwitch(e)
            | TransferError::Submission(e) => e.reason(),
            TransferError::Plan(_) | TransferError::Registry(_) | TransferError::Abandoned(_) => {
                None
            }
        };
        reason
            .map(str::to_string)
            .unwrap_or_else(|| self.kind().fallback_message().to_string())
    }
}
