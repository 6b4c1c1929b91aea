use thiserror::Error;

use super::chain::ChainId;
use crate::money::MoneyError;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Chain not found: {0}")]
    ChainNotFound(ChainId),

    #[error("Asset {asset} is not registered on chain {chain_id}")]
    AssetNotFound { chain_id: ChainId, asset: String },

    #[error("Registry must contain at least one chain")]
    Empty,

    #[error("Duplicate chain id: {0}")]
    DuplicateChain(ChainId),

    #[error("Duplicate asset {asset} on chain {chain_id}")]
    DuplicateAsset { chain_id: ChainId, asset: String },

    #[error("Invalid fixed amount for {asset} on chain {chain_id}: {source}")]
    InvalidAmount {
        chain_id: ChainId,
        asset: String,
        source: MoneyError,
    },

    #[error("Invalid contract address for {asset} on chain {chain_id}: {address}")]
    InvalidAddress {
        chain_id: ChainId,
        asset: String,
        address: String,
    },

    #[error("Unsupported decimals for {asset} on chain {chain_id}: {decimals}")]
    UnsupportedDecimals {
        chain_id: ChainId,
        asset: String,
        decimals: u32,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}
