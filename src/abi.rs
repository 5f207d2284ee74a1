//! Calldata encoding and return-data decoding for the marketplace calls
//!
//! The contract surface is four functions with `uint256` and `string`
//! arguments; this covers the head/tail word layout those two types need.
//! Selectors are derived from the canonical signature at call time.

#![cfg(feature = "server")]

use alloy_primitives::{U256, keccak256};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AbiError {
    #[error("return data ends before word {0}")]
    Truncated(usize),
    #[error("dynamic offset {0} points outside the return data")]
    BadOffset(usize),
    #[error("string length {0} does not fit the return data")]
    BadLength(usize),
    #[error("string payload is not valid UTF-8")]
    BadUtf8,
}

/// One argument of a contract call.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Uint(U256),
    Str(String),
}

/// First four bytes of the keccak-256 of a canonical signature such as
/// `publishProduct(string,string,uint256,string)`.
pub fn selector(signature: &str) -> [u8; 4] {
    let digest = keccak256(signature.as_bytes());
    [digest[0], digest[1], digest[2], digest[3]]
}

/// Encodes a call as selector plus the standard argument layout: one head
/// word per argument, dynamic strings stored length-prefixed in the tail and
/// referenced by their offset from the start of the argument block.
pub fn encode_call(signature: &str, args: &[Token]) -> Vec<u8> {
    let head_len = args.len() * 32;
    let mut head = Vec::with_capacity(head_len);
    let mut tail: Vec<u8> = Vec::new();

    for arg in args {
        match arg {
            Token::Uint(value) => head.extend_from_slice(&value.to_be_bytes::<32>()),
            Token::Str(value) => {
                let offset = U256::from(head_len + tail.len());
                head.extend_from_slice(&offset.to_be_bytes::<32>());
                tail.extend_from_slice(&U256::from(value.len()).to_be_bytes::<32>());
                tail.extend_from_slice(value.as_bytes());
                let padding = (32 - value.len() % 32) % 32;
                tail.extend(std::iter::repeat(0u8).take(padding));
            }
        }
    }

    let mut call = Vec::with_capacity(4 + head_len + tail.len());
    call.extend_from_slice(&selector(signature));
    call.extend_from_slice(&head);
    call.extend_from_slice(&tail);
    call
}

fn word(data: &[u8], slot: usize) -> Result<&[u8], AbiError> {
    let start = slot * 32;
    data.get(start..start + 32).ok_or(AbiError::Truncated(slot))
}

/// Reads the `uint256` stored in a head slot of the return data.
pub fn decode_uint(data: &[u8], slot: usize) -> Result<U256, AbiError> {
    Ok(U256::from_be_slice(word(data, slot)?))
}

/// Follows the offset stored in a head slot to the length-prefixed string it
/// points at.
pub fn decode_string(data: &[u8], slot: usize) -> Result<String, AbiError> {
    let offset = decode_uint(data, slot)?;
    let offset = usize::try_from(offset).map_err(|_| AbiError::BadOffset(slot))?;

    let length_end = offset.checked_add(32).ok_or(AbiError::BadOffset(offset))?;
    let length_word = data.get(offset..length_end).ok_or(AbiError::BadOffset(offset))?;
    let length = U256::from_be_slice(length_word);
    let length = usize::try_from(length).map_err(|_| AbiError::BadLength(offset))?;

    let payload_end = length_end.checked_add(length).ok_or(AbiError::BadLength(length))?;
    let payload = data.get(length_end..payload_end).ok_or(AbiError::BadLength(length))?;
    String::from_utf8(payload.to_vec()).map_err(|_| AbiError::BadUtf8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_matches_known_erc20_value() {
        // the well-known ERC-20 transfer selector
        assert_eq!(selector("transfer(address,uint256)"), [0xa9, 0x05, 0x9c, 0xbb]);
    }

    #[test]
    fn test_encode_call_no_arguments_is_selector_only() {
        assert_eq!(encode_call("productCount()", &[]).len(), 4);
    }

    #[test]
    fn test_encode_call_head_and_tail_layout() {
        let call = encode_call(
            "publishProduct(string,string,uint256,string)",
            &[
                Token::Str("ab".to_string()),
                Token::Str("cd".to_string()),
                Token::Uint(U256::from(5u64)),
                Token::Str("ef".to_string()),
            ],
        );
        // 4 selector bytes, 4 head words, three 64-byte string tails
        assert_eq!(call.len(), 4 + 128 + 192);
        assert_eq!(&call[..4], &selector("publishProduct(string,string,uint256,string)"));

        let body = &call[4..];
        assert_eq!(decode_uint(body, 0).unwrap(), U256::from(128u64));
        assert_eq!(decode_uint(body, 1).unwrap(), U256::from(192u64));
        assert_eq!(decode_uint(body, 2).unwrap(), U256::from(5u64));
        assert_eq!(decode_uint(body, 3).unwrap(), U256::from(256u64));
        assert_eq!(decode_string(body, 0).unwrap(), "ab");
        assert_eq!(decode_string(body, 3).unwrap(), "ef");
    }

    #[test]
    fn test_encode_call_pads_strings_to_word_boundary() {
        let call = encode_call("f(string)", &[Token::Str("a".repeat(32))]);
        // exactly two tail words for a 32-byte string: length plus payload
        assert_eq!(call.len(), 4 + 32 + 64);
    }

    #[test]
    fn test_decode_hand_built_tuple() {
        // (string "hi", uint 7) laid out by hand
        let mut data = Vec::new();
        data.extend_from_slice(&U256::from(64u64).to_be_bytes::<32>());
        data.extend_from_slice(&U256::from(7u64).to_be_bytes::<32>());
        data.extend_from_slice(&U256::from(2u64).to_be_bytes::<32>());
        let mut payload = [0u8; 32];
        payload[..2].copy_from_slice(b"hi");
        data.extend_from_slice(&payload);

        assert_eq!(decode_string(&data, 0).unwrap(), "hi");
        assert_eq!(decode_uint(&data, 1).unwrap(), U256::from(7u64));
    }

    #[test]
    fn test_decode_uint_truncated() {
        assert_eq!(decode_uint(&[0u8; 32], 1), Err(AbiError::Truncated(1)));
    }

    #[test]
    fn test_decode_string_offset_out_of_range() {
        let data = U256::from(512u64).to_be_bytes::<32>();
        assert_eq!(decode_string(&data, 0), Err(AbiError::BadOffset(512)));
    }

    #[test]
    fn test_decode_string_length_overruns_data() {
        let mut data = Vec::new();
        data.extend_from_slice(&U256::from(32u64).to_be_bytes::<32>());
        data.extend_from_slice(&U256::from(99u64).to_be_bytes::<32>());
        assert_eq!(decode_string(&data, 0), Err(AbiError::BadLength(99)));
    }

    #[test]
    fn test_decode_string_rejects_bad_utf8() {
        let mut data = Vec::new();
        data.extend_from_slice(&U256::from(32u64).to_be_bytes::<32>());
        data.extend_from_slice(&U256::from(2u64).to_be_bytes::<32>());
        let mut payload = [0u8; 32];
        payload[0] = 0xff;
        payload[1] = 0xfe;
        data.extend_from_slice(&payload);
        assert_eq!(decode_string(&data, 0), Err(AbiError::BadUtf8));
    }
}
