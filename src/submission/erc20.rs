//! ERC-20 call data
//!
//! `transfer(address,uint256)`: 4-byte selector, then each argument as a
//! 32-byte word (address left-padded, amount big-endian).

use super::SubmissionError;
use crate::registry::is_evm_address;

/// keccak256("transfer(address,uint256)")[..4]
pub const TRANSFER_SELECTOR: [u8; 4] = [0xa9, 0x05, 0x9c, 0xbb];

/// Hex call data (`0x`-prefixed) for `transfer(to, amount)`
pub fn encode_transfer(to: &str, amount: u128) -> Result<String, SubmissionError> {
    if !is_evm_address(to) {
        return Err(SubmissionError::InvalidRecipient(to.to_string()));
    }
    let recipient = to.trim_start_matches("0x").to_lowercase();

    Ok(format!(
        "0x{}{:0>64}{:064x}",
        hex::encode(TRANSFER_SELECTOR),
        recipient,
        amount
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_transfer_layout() {
        let to = "0x9264e84Dcc5DFDf009F4cD14CdA70C59D7cb98fd";
        let data = encode_transfer(to, 20_000_000).unwrap();

        // 0x + selector + 2 words
        assert_eq!(data.len(), 2 + 8 + 64 + 64);
        assert!(data.starts_with("0xa9059cbb"));
        assert_eq!(
            &data[10..74],
            "0000000000000000000000009264e84dcc5dfdf009f4cd14cda70c59d7cb98fd"
        );
        assert_eq!(
            &data[74..],
            "0000000000000000000000000000000000000000000000000000000001312d00"
        );
    }

    #[test]
    fn test_encode_transfer_eighteen_decimals() {
        let amount = 20 * 10u128.pow(18);
        let data = encode_transfer("0x9264e84Dcc5DFDf009F4cD14CdA70C59D7cb98fd", amount).unwrap();
        let word = u128::from_str_radix(&data[74 + 32..], 16).unwrap();
        assert_eq!(word, amount);
    }

    #[test]
    fn test_encode_transfer_rejects_bad_recipient() {
        assert!(matches!(
            encode_transfer("0x1234", 1),
            Err(SubmissionError::InvalidRecipient(_))
        ));
    }
}
