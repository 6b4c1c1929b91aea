//! Registry validation
//!
//! Every check runs once when the registry is built, so lookups and plan
//! building never see a malformed entry.

use std::collections::HashSet;

use super::chain::{Chain, ChainId};
use super::error::RegistryError;
use crate::money;

/// Largest decimals accepted for a registered asset
pub const MAX_ASSET_DECIMALS: u32 = 36;

/// `0x` followed by 20 bytes of hex (case-insensitive, no checksum check)
pub fn is_evm_address(address: &str) -> bool {
    let Some(body) = address.strip_prefix("0x") else {
        return false;
    };
    body.len() == 40 && hex::decode(body).is_ok()
}

/// Shorten an address for display: `0x9264...98fd`
///
/// Strings that cannot be cut on a char boundary come back whole.
pub fn short_address(address: &str) -> String {
    if address.len() <= 10 {
        return address.to_string();
    }
    match (address.get(..6), address.get(address.len() - 4..)) {
        (Some(head), Some(tail)) => format!("{}...{}", head, tail),
        _ => address.to_string(),
    }
}

pub(crate) fn validate_chains(chains: &[Chain]) -> Result<(), RegistryError> {
    if chains.is_empty() {
        return Err(RegistryError::Empty);
    }

    let mut seen: HashSet<ChainId> = HashSet::new();
    for chain in chains {
        if !seen.insert(chain.id) {
            return Err(RegistryError::DuplicateChain(chain.id));
        }
        validate_chain(chain)?;
    }
    Ok(())
}

fn validate_chain(chain: &Chain) -> Result<(), RegistryError> {
    check_amount(
        chain.id,
        &chain.native_currency,
        &chain.native_amount,
        chain.native_decimals,
    )?;

    let mut symbols: HashSet<&str> = HashSet::new();
    for token in &chain.tokens {
        if !symbols.insert(token.symbol.as_str()) {
            return Err(RegistryError::DuplicateAsset {
                chain_id: chain.id,
                asset: token.symbol.clone(),
            });
        }
        if !is_evm_address(&token.address) {
            return Err(RegistryError::InvalidAddress {
                chain_id: chain.id,
                asset: token.symbol.clone(),
                address: token.address.clone(),
            });
        }
        check_amount(chain.id, &token.symbol, &token.amount, token.decimals)?;
    }
    Ok(())
}

fn check_amount(
    chain_id: ChainId,
    asset: &str,
    amount: &str,
    decimals: u32,
) -> Result<(), RegistryError> {
    if decimals > MAX_ASSET_DECIMALS {
        return Err(RegistryError::UnsupportedDecimals {
            chain_id,
            asset: asset.to_string(),
            decimals,
        });
    }
    money::parse_amount(amount, decimals)
        .map(|_| ())
        .map_err(|source| RegistryError::InvalidAmount {
            chain_id,
            asset: asset.to_string(),
            source,
        })
}
