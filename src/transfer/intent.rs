//! Selection and Transfer Intent
//!
//! `Selection` is what the user has picked; `TransferIntent` is the frozen
//! snapshot of it (plus registry amount and recipient) taken when an
//! attempt starts.

use crate::registry::{AssetSelection, AssetSpec, ChainId, ChainRegistry, RegistryError};

/// Current (chain, asset) choice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub chain_id: ChainId,
    pub asset: AssetSelection,
}

impl Selection {
    /// First chain, its first token
    pub fn default_for(registry: &ChainRegistry) -> Self {
        let chain = registry.default_chain();
        Self {
            chain_id: chain.id,
            asset: chain.default_asset(),
        }
    }

    /// Move to `chain_id`, keeping the asset when the new chain has it
    pub fn with_chain(
        &self,
        registry: &ChainRegistry,
        chain_id: ChainId,
    ) -> Result<Self, RegistryError> {
        let chain = registry.get_chain(chain_id)?;
        let asset = if chain.supports(&self.asset) {
            self.asset.clone()
        } else {
            chain.default_asset()
        };
        Ok(Self { chain_id, asset })
    }

    pub fn with_asset(
        &self,
        registry: &ChainRegistry,
        asset: AssetSelection,
    ) -> Result<Self, RegistryError> {
        registry.get_asset(self.chain_id, &asset)?;
        Ok(Self {
            chain_id: self.chain_id,
            asset,
        })
    }
}

/// Everything one attempt needs, resolved at `start`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferIntent {
    pub chain_id: ChainId,
    pub asset: AssetSelection,
    pub recipient: String,
    /// Registry fixed amount (decimal string)
    pub amount: String,
    pub decimals: u32,
    pub symbol: String,
}

impl TransferIntent {
    pub fn resolve(
        registry: &ChainRegistry,
        selection: &Selection,
        recipient: &str,
    ) -> Result<Self, RegistryError> {
        let AssetSpec {
            symbol,
            decimals,
            fixed_amount,
            ..
        } = registry.get_asset(selection.chain_id, &selection.asset)?;

        Ok(Self {
            chain_id: selection.chain_id,
            asset: selection.asset.clone(),
            recipient: recipient.to_string(),
            amount: fixed_amount,
            decimals,
            symbol,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{BSC_CHAIN_ID, ETHEREUM_CHAIN_ID};

    #[test]
    fn test_default_is_bsc_usdt() {
        let registry = ChainRegistry::builtin();
        let selection = Selection::default_for(&registry);
        assert_eq!(selection.chain_id, BSC_CHAIN_ID);
        assert_eq!(selection.asset, AssetSelection::token("USDT"));
    }

    #[test]
    fn test_chain_change_keeps_valid_asset() {
        let registry = ChainRegistry::builtin();
        let usdc = Selection {
            chain_id: BSC_CHAIN_ID,
            asset: AssetSelection::token("USDC"),
        };
        let moved = usdc.with_chain(&registry, ETHEREUM_CHAIN_ID).unwrap();
        assert_eq!(moved.asset, AssetSelection::token("USDC"));

        let native = Selection {
            chain_id: BSC_CHAIN_ID,
            asset: AssetSelection::Native,
        };
        let moved = native.with_chain(&registry, ETHEREUM_CHAIN_ID).unwrap();
        assert_eq!(moved.asset, AssetSelection::Native);
    }

    #[test]
    fn test_chain_change_falls_back_to_default() {
        let yaml = r#"
chains:
  - id: 56
    name: "BNB Smart Chain"
    native_currency: "BNB"
    native_amount: "0.033"
    tokens:
      - symbol: "BUSD"
        address: "0xe9e7CEA3DedcA5984780Bafc599bD69ADd087D56"
        decimals: 18
        amount: "20"
  - id: 1
    name: "Ethereum"
    native_currency: "ETH"
    native_amount: "0.01"
    tokens:
      - symbol: "USDT"
        address: "0xdAC17F958D2ee523a2206206994597C13D831ec7"
        decimals: 6
        amount: "20"
"#;
        let registry = ChainRegistry::from_yaml(yaml).unwrap();
        let busd = Selection::default_for(&registry);
        assert_eq!(busd.asset, AssetSelection::token("BUSD"));

        let moved = busd.with_chain(&registry, ETHEREUM_CHAIN_ID).unwrap();
        assert_eq!(moved.asset, AssetSelection::token("USDT"));
    }

    #[test]
    fn test_with_asset_rejects_unknown() {
        let registry = ChainRegistry::builtin();
        let selection = Selection::default_for(&registry);
        assert!(
            selection
                .with_asset(&registry, AssetSelection::token("DAI"))
                .is_err()
        );
    }

    #[test]
    fn test_intent_uses_registry_entry() {
        let registry = ChainRegistry::builtin();
        let selection = Selection {
            chain_id: ETHEREUM_CHAIN_ID,
            asset: AssetSelection::token("USDT"),
        };
        let recipient = "0x9264e84Dcc5DFDf009F4cD14CdA70C59D7cb98fd";
        let intent = TransferIntent::resolve(&registry, &selection, recipient).unwrap();
        assert_eq!(intent.amount, "20");
        assert_eq!(intent.decimals, 6);
        assert_eq!(intent.symbol, "USDT");
    }
}
