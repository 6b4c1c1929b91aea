//! Transfer FSM State Definitions

use std::fmt;

use super::error::FailureKind;

/// Transfer attempt lifecycle
///
/// `Idle -> [AwaitingConnection] -> [AwaitingChainSwitch] -> Submitting
///  -> Pending(hash) -> Succeeded(hash)`, or `Failed` from any active step.
/// Terminal states: `Succeeded`, `Failed`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TransferState {
    Idle,

    /// Waiting on the wallet's connect prompt
    AwaitingConnection,

    /// Waiting on the wallet's network switch prompt
    AwaitingChainSwitch,

    /// Plan built, waiting on the signature prompt
    Submitting,

    /// Wallet returned a hash; accepted for broadcast
    Pending(String),

    /// Terminal: broadcast accepted (not confirmed on-chain)
    Succeeded(String),

    /// Terminal
    Failed { kind: FailureKind, message: String },
}

impl TransferState {
    /// Check if this is a terminal state (no more transitions possible)
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TransferState::Succeeded(_) | TransferState::Failed { .. }
        )
    }

    /// An attempt is running
    #[inline]
    pub fn is_active(&self) -> bool {
        !self.is_terminal() && *self != TransferState::Idle
    }

    pub fn tx_hash(&self) -> Option<&str> {
        match self {
            TransferState::Pending(hash) | TransferState::Succeeded(hash) => Some(hash),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<(FailureKind, &str)> {
        match self {
            TransferState::Failed { kind, message } => Some((*kind, message)),
            _ => None,
        }
    }

    /// Failure kind for an attempt abandoned in this state
    pub(crate) fn abandon_kind(&self) -> Option<FailureKind> {
        match self {
            TransferState::AwaitingConnection => Some(FailureKind::ConnectionError),
            TransferState::AwaitingChainSwitch => Some(FailureKind::ChainSwitchError),
            TransferState::Submitting | TransferState::Pending(_) => {
                Some(FailureKind::SubmissionFailed)
            }
            _ => None,
        }
    }

    /// Get human-readable state name
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferState::Idle => "IDLE",
            TransferState::AwaitingConnection => "AWAITING_CONNECTION",
            TransferState::AwaitingChainSwitch => "AWAITING_CHAIN_SWITCH",
            TransferState::Submitting => "SUBMITTING",
            TransferState::Pending(_) => "PENDING",
            TransferState::Succeeded(_) => "SUCCEEDED",
            TransferState::Failed { .. } => "FAILED",
        }
    }
}

impl fmt::Display for TransferState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferState::Pending(hash) | TransferState::Succeeded(hash) => {
                write!(f, "{}({})", self.as_str(), hash)
            }
            TransferState::Failed { kind, message } => {
                write!(f, "{}({}: {})", self.as_str(), kind, message)
            }
            _ => write!(f, "{}", self.as_str()),
        }
    }
}
