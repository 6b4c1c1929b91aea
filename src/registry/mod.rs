//! Chain Registry
//!
//! Fixed, ordered catalog of the chains an invoice can be paid on, their
//! native currency and their fungible tokens. Built once at startup (from
//! the built-in table or a YAML file) and read-only afterwards.
//!
//! Lookups that miss return `RegistryError`. A miss means the caller offered
//! a (chain, asset) pair the registry never listed; it is a logic error, not
//! a runtime condition to retry.

pub mod chain;
pub mod error;
pub mod validation;

pub use chain::{AssetSelection, AssetSpec, Chain, ChainId, TokenSpec};
pub use error::RegistryError;
pub use validation::{is_evm_address, short_address};

use serde::Deserialize;
use tracing::info;

/// BNB Smart Chain (fast/low-fee)
pub const BSC_CHAIN_ID: ChainId = 56;
/// Ethereum mainnet (canonical)
pub const ETHEREUM_CHAIN_ID: ChainId = 1;

/// On-disk registry layout (`config/chains.yaml`)
#[derive(Debug, Deserialize)]
struct RegistryFile {
    chains: Vec<Chain>,
}

#[derive(Debug, Clone)]
pub struct ChainRegistry {
    chains: Vec<Chain>,
}

impl ChainRegistry {
    /// Build a registry from an ordered chain list, validating every entry
    pub fn new(chains: Vec<Chain>) -> Result<Self, RegistryError> {
        validation::validate_chains(&chains)?;
        Ok(Self { chains })
    }

    /// Load registry from YAML file
    pub fn from_file(path: &str) -> Result<Self, RegistryError> {
        let content = std::fs::read_to_string(path)?;
        let registry = Self::from_yaml(&content)?;
        info!(
            path = path,
            chains = registry.chains.len(),
            "Chain registry loaded"
        );
        Ok(registry)
    }

    pub fn from_yaml(content: &str) -> Result<Self, RegistryError> {
        let file: RegistryFile =
            serde_yaml::from_str(content).map_err(|e| RegistryError::Parse(e.to_string()))?;
        Self::new(file.chains)
    }

    /// BNB Smart Chain + Ethereum with USDT/USDC
    pub fn builtin() -> Self {
        Self {
            chains: vec![
                Chain {
                    id: BSC_CHAIN_ID,
                    name: "BNB Smart Chain".to_string(),
                    native_currency: "BNB".to_string(),
                    native_decimals: 18,
                    native_amount: "0.033".to_string(),
                    tokens: vec![
                        TokenSpec {
                            symbol: "USDT".to_string(),
                            address: "0x55d398326f99059fF775485246999027B3197955".to_string(),
                            decimals: 18,
                            amount: "20".to_string(),
                        },
                        TokenSpec {
                            symbol: "USDC".to_string(),
                            address: "0x8AC76a51cc950d9822D68b83fE1Ad97B32Cd580d".to_string(),
                            decimals: 18,
                            amount: "20".to_string(),
                        },
                    ],
                },
                Chain {
                    id: ETHEREUM_CHAIN_ID,
                    name: "Ethereum".to_string(),
                    native_currency: "ETH".to_string(),
                    native_decimals: 18,
                    native_amount: "0.01".to_string(),
                    tokens: vec![
                        TokenSpec {
                            symbol: "USDT".to_string(),
                            address: "0xdAC17F958D2ee523a2206206994597C13D831ec7".to_string(),
                            decimals: 6,
                            amount: "20".to_string(),
                        },
                        TokenSpec {
                            symbol: "USDC".to_string(),
                            address: "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48".to_string(),
                            decimals: 6,
                            amount: "20".to_string(),
                        },
                    ],
                },
            ],
        }
    }

    /// All chains in display order
    pub fn list_chains(&self) -> &[Chain] {
        &self.chains
    }

    /// First chain; the default selection
    pub fn default_chain(&self) -> &Chain {
        // validate_chains rejects an empty list
        &self.chains[0]
    }

    pub fn get_chain(&self, id: ChainId) -> Result<&Chain, RegistryError> {
        self.chains
            .iter()
            .find(|c| c.id == id)
            .ok_or(RegistryError::ChainNotFound(id))
    }

    pub fn get_asset(
        &self,
        chain_id: ChainId,
        selection: &AssetSelection,
    ) -> Result<AssetSpec, RegistryError> {
        let chain = self.get_chain(chain_id)?;
        chain
            .asset(selection)
            .ok_or_else(|| RegistryError::AssetNotFound {
                chain_id,
                asset: selection.to_string(),
            })
    }
}

impl Default for ChainRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_passes_validation() {
        let builtin = ChainRegistry::builtin();
        let rebuilt = ChainRegistry::new(builtin.list_chains().to_vec());
        assert!(rebuilt.is_ok());
    }

    #[test]
    fn test_list_order_is_stable() {
        let registry = ChainRegistry::builtin();
        let ids: Vec<ChainId> = registry.list_chains().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![BSC_CHAIN_ID, ETHEREUM_CHAIN_ID]);
        assert_eq!(registry.default_chain().id, BSC_CHAIN_ID);
    }

    #[test]
    fn test_get_chain_not_found() {
        let registry = ChainRegistry::builtin();
        assert!(matches!(
            registry.get_chain(137),
            Err(RegistryError::ChainNotFound(137))
        ));
    }

    #[test]
    fn test_get_asset_per_chain_decimals() {
        let registry = ChainRegistry::builtin();

        let bsc_usdt = registry
            .get_asset(BSC_CHAIN_ID, &AssetSelection::token("USDT"))
            .unwrap();
        assert_eq!(bsc_usdt.decimals, 18);

        let eth_usdt = registry
            .get_asset(ETHEREUM_CHAIN_ID, &AssetSelection::token("USDT"))
            .unwrap();
        assert_eq!(eth_usdt.decimals, 6);
        assert_eq!(
            eth_usdt.address.as_deref(),
            Some("0xdAC17F958D2ee523a2206206994597C13D831ec7")
        );
    }

    #[test]
    fn test_get_asset_not_found() {
        let registry = ChainRegistry::builtin();
        let err = registry
            .get_asset(ETHEREUM_CHAIN_ID, &AssetSelection::token("DAI"))
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::AssetNotFound { chain_id: 1, .. }
        ));
    }

    #[test]
    fn test_rejects_empty_and_duplicates() {
        assert!(matches!(
            ChainRegistry::new(vec![]),
            Err(RegistryError::Empty)
        ));

        let bsc = ChainRegistry::builtin().list_chains()[0].clone();
        assert!(matches!(
            ChainRegistry::new(vec![bsc.clone(), bsc]),
            Err(RegistryError::DuplicateChain(56))
        ));
    }

    #[test]
    fn test_rejects_amount_finer_than_decimals() {
        let yaml = r#"
chains:
  - id: 1
    name: "Ethereum"
    native_currency: "ETH"
    native_amount: "0.01"
    tokens:
      - symbol: "USDT"
        address: "0xdAC17F958D2ee523a2206206994597C13D831ec7"
        decimals: 6
        amount: "0.0000001"
"#;
        let err = ChainRegistry::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidAmount { .. }));
    }

    #[test]
    fn test_rejects_bad_address() {
        let yaml = r#"
chains:
  - id: 1
    name: "Ethereum"
    native_currency: "ETH"
    native_amount: "0.01"
    tokens:
      - symbol: "USDT"
        address: "not-an-address"
        decimals: 6
        amount: "20"
"#;
        let err = ChainRegistry::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidAddress { .. }));
    }

    #[test]
    fn test_from_yaml_keeps_order() {
        let yaml = r#"
chains:
  - id: 1
    name: "Ethereum"
    native_currency: "ETH"
    native_amount: "0.01"
  - id: 56
    name: "BNB Smart Chain"
    native_currency: "BNB"
    native_amount: "0.033"
"#;
        let registry = ChainRegistry::from_yaml(yaml).unwrap();
        assert_eq!(registry.default_chain().id, ETHEREUM_CHAIN_ID);
        assert_eq!(registry.list_chains()[1].id, BSC_CHAIN_ID);
    }
}
