//! Chain and asset models

use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric EVM chain identifier (EIP-155)
pub type ChainId = u64;

fn default_native_decimals() -> u32 {
    18
}

/// Fungible token registered on a chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSpec {
    pub symbol: String,
    /// Contract address (`0x` + 40 hex)
    pub address: String,
    pub decimals: u32,
    /// Fixed invoice amount as a decimal string
    pub amount: String,
}

/// Supported chain with its native currency and token table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chain {
    pub id: ChainId,
    pub name: String,
    pub native_currency: String,
    #[serde(default = "default_native_decimals")]
    pub native_decimals: u32,
    /// Fixed invoice amount in native currency
    pub native_amount: String,
    /// Registered tokens, in display order
    #[serde(default)]
    pub tokens: Vec<TokenSpec>,
}

impl Chain {
    pub fn token(&self, symbol: &str) -> Option<&TokenSpec> {
        self.tokens.iter().find(|t| t.symbol == symbol)
    }

    /// Whether this chain can resolve the selection
    pub fn supports(&self, selection: &AssetSelection) -> bool {
        match selection {
            AssetSelection::Native => true,
            AssetSelection::Token(symbol) => self.token(symbol).is_some(),
        }
    }

    /// First registered token, or native when the chain has none
    pub fn default_asset(&self) -> AssetSelection {
        self.tokens
            .first()
            .map(|t| AssetSelection::Token(t.symbol.clone()))
            .unwrap_or(AssetSelection::Native)
    }

    /// Every selection this chain can resolve: tokens first, then native
    pub fn selections(&self) -> Vec<AssetSelection> {
        self.tokens
            .iter()
            .map(|t| AssetSelection::Token(t.symbol.clone()))
            .chain(std::iter::once(AssetSelection::Native))
            .collect()
    }

    /// Resolve a selection against this chain's table
    pub fn asset(&self, selection: &AssetSelection) -> Option<AssetSpec> {
        match selection {
            AssetSelection::Native => Some(AssetSpec {
                symbol: self.native_currency.clone(),
                address: None,
                decimals: self.native_decimals,
                fixed_amount: self.native_amount.clone(),
            }),
            AssetSelection::Token(symbol) => self.token(symbol).map(|t| AssetSpec {
                symbol: t.symbol.clone(),
                address: Some(t.address.clone()),
                decimals: t.decimals,
                fixed_amount: t.amount.clone(),
            }),
        }
    }
}

/// Which asset of the selected chain the invoice is paid in
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AssetSelection {
    /// The chain's native currency (BNB, ETH)
    Native,
    /// A registered fungible token, by symbol
    Token(String),
}

impl AssetSelection {
    pub fn token(symbol: impl Into<String>) -> Self {
        AssetSelection::Token(symbol.into())
    }

    pub fn is_native(&self) -> bool {
        matches!(self, AssetSelection::Native)
    }
}

impl fmt::Display for AssetSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetSelection::Native => write!(f, "NATIVE"),
            AssetSelection::Token(symbol) => write!(f, "{}", symbol),
        }
    }
}

/// Resolved (chain, asset) entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetSpec {
    /// Display symbol (native currency symbol for native selections)
    pub symbol: String,
    /// Contract address; `None` for native currency
    pub address: Option<String>,
    pub decimals: u32,
    pub fixed_amount: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_chain() -> Chain {
        Chain {
            id: 56,
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
        }
    }

    #[test]
    fn test_default_asset_is_first_token() {
        let chain = sample_chain();
        assert_eq!(chain.default_asset(), AssetSelection::token("USDT"));

        let bare = Chain {
            tokens: vec![],
            ..sample_chain()
        };
        assert_eq!(bare.default_asset(), AssetSelection::Native);
    }

    #[test]
    fn test_native_asset_has_no_address() {
        let spec = sample_chain().asset(&AssetSelection::Native).unwrap();
        assert_eq!(spec.symbol, "BNB");
        assert_eq!(spec.address, None);
        assert_eq!(spec.fixed_amount, "0.033");
    }

    #[test]
    fn test_unknown_token_is_unsupported() {
        let chain = sample_chain();
        assert!(!chain.supports(&AssetSelection::token("DAI")));
        assert!(chain.asset(&AssetSelection::token("DAI")).is_none());
        assert!(chain.supports(&AssetSelection::Native));
    }

    #[test]
    fn test_selections_order() {
        let selections = sample_chain().selections();
        assert_eq!(
            selections,
            vec![
                AssetSelection::token("USDT"),
                AssetSelection::token("USDC"),
                AssetSelection::Native
            ]
        );
    }

    #[test]
    fn test_chain_yaml_defaults_native_decimals() {
        let yaml = r#"
id: 1
name: "Ethereum"
native_currency: "ETH"
native_amount: "0.01"
"#;
        let chain: Chain = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(chain.native_decimals, 18);
        assert!(chain.tokens.is_empty());
    }
}
