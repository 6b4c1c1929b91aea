//! Submission Strategy
//!
//! Decides, for a (chain, asset) pair, whether the invoice is paid with a
//! plain native-value send or an ERC-20 `transfer` call, and computes the
//! exact base-unit amount from the registry's fixed decimal string.

pub mod erc20;

use thiserror::Error;

use crate::money::{self, MoneyError};
use crate::registry::{AssetSelection, Chain, ChainId, is_evm_address};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("Asset {asset} is not registered on chain {chain_id}")]
    UnknownAssetForChain { chain_id: ChainId, asset: String },

    #[error("Registry amount for {asset} on chain {chain_id} is invalid: {source}")]
    InvalidAmount {
        chain_id: ChainId,
        asset: String,
        source: MoneyError,
    },

    #[error("Invalid recipient address: {0}")]
    InvalidRecipient(String),
}

/// Native-currency value transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativePlan {
    pub chain_id: ChainId,
    pub to: String,
    /// Base units (wei)
    pub amount: u128,
}

/// ERC-20 `transfer(to, amount)` on `contract`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPlan {
    pub chain_id: ChainId,
    pub contract: String,
    pub to: String,
    /// Base units at `decimals`
    pub amount: u128,
    pub decimals: u32,
}

impl TokenPlan {
    pub fn calldata(&self) -> Result<String, SubmissionError> {
        erc20::encode_transfer(&self.to, self.amount)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionPlan {
    Native(NativePlan),
    Token(TokenPlan),
}

impl SubmissionPlan {
    pub fn chain_id(&self) -> ChainId {
        match self {
            SubmissionPlan::Native(p) => p.chain_id,
            SubmissionPlan::Token(p) => p.chain_id,
        }
    }

    pub fn amount(&self) -> u128 {
        match self {
            SubmissionPlan::Native(p) => p.amount,
            SubmissionPlan::Token(p) => p.amount,
        }
    }

    pub fn is_native(&self) -> bool {
        matches!(self, SubmissionPlan::Native(_))
    }
}

/// Build the call for paying `recipient` the chain's fixed amount of `selection`
pub fn build_plan(
    chain: &Chain,
    selection: &AssetSelection,
    recipient: &str,
) -> Result<SubmissionPlan, SubmissionError> {
    if !is_evm_address(recipient) {
        return Err(SubmissionError::InvalidRecipient(recipient.to_string()));
    }

    let spec = chain
        .asset(selection)
        .ok_or_else(|| SubmissionError::UnknownAssetForChain {
            chain_id: chain.id,
            asset: selection.to_string(),
        })?;

    let amount = money::parse_amount(&spec.fixed_amount, spec.decimals).map_err(|source| {
        SubmissionError::InvalidAmount {
            chain_id: chain.id,
            asset: spec.symbol.clone(),
            source,
        }
    })?;

    let plan = match spec.address {
        None => SubmissionPlan::Native(NativePlan {
            chain_id: chain.id,
            to: recipient.to_string(),
            amount,
        }),
        Some(contract) => SubmissionPlan::Token(TokenPlan {
            chain_id: chain.id,
            contract,
            to: recipient.to_string(),
            amount,
            decimals: spec.decimals,
        }),
    };
    Ok(plan)
}
