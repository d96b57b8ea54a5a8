//! Recursive Length Prefix encoding
//!
//! Canonical Ethereum serialization for byte strings, unsigned integers and
//! (nested) lists. Integers are written as minimal big-endian byte strings,
//! so zero and the empty byte string both encode as `0x80`.

use ethers_core::types::U256;

/// Offset for short byte strings
const STRING_OFFSET: u8 = 0x80;

/// Offset for short lists
const LIST_OFFSET: u8 = 0xc0;

/// Payloads up to this length use the single-byte prefix form
const SHORT_PAYLOAD_MAX: usize = 55;

/// An item that can be RLP-encoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RlpItem {
    Bytes(Vec<u8>),
    List(Vec<RlpItem>),
}

impl RlpItem {
    /// Encode this item (recursively for lists)
    pub fn encode(&self) -> Vec<u8> {
        match self {
            RlpItem::Bytes(bytes) => encode_bytes(bytes),
            RlpItem::List(items) => {
                let encoded: Vec<Vec<u8>> = items.iter().map(RlpItem::encode).collect();
                encode_list(&encoded)
            }
        }
    }

    /// Empty byte string, the canonical encoding of zero
    pub fn empty() -> Self {
        RlpItem::Bytes(Vec::new())
    }
}

impl From<U256> for RlpItem {
    fn from(value: U256) -> Self {
        RlpItem::Bytes(u256_to_minimal_bytes(value))
    }
}

impl From<u64> for RlpItem {
    fn from(value: u64) -> Self {
        RlpItem::Bytes(trim_leading_zeros(&value.to_be_bytes()).to_vec())
    }
}

impl From<&[u8]> for RlpItem {
    fn from(bytes: &[u8]) -> Self {
        RlpItem::Bytes(bytes.to_vec())
    }
}

impl From<Vec<u8>> for RlpItem {
    fn from(bytes: Vec<u8>) -> Self {
        RlpItem::Bytes(bytes)
    }
}

impl From<Vec<RlpItem>> for RlpItem {
    fn from(items: Vec<RlpItem>) -> Self {
        RlpItem::List(items)
    }
}

/// RLP encode a byte string
pub fn encode_bytes(data: &[u8]) -> Vec<u8> {
    if data.len() == 1 && data[0] < STRING_OFFSET {
        return vec![data[0]];
    }

    let mut encoded = length_prefix(data.len(), STRING_OFFSET);
    encoded.extend_from_slice(data);
    encoded
}

/// RLP encode an unsigned 256-bit integer
pub fn encode_u256(value: U256) -> Vec<u8> {
    encode_bytes(&u256_to_minimal_bytes(value))
}

/// RLP encode a list whose elements are already encoded
pub fn encode_list(items: &[Vec<u8>]) -> Vec<u8> {
    let content_len: usize = items.iter().map(Vec::len).sum();

    let mut encoded = length_prefix(content_len, LIST_OFFSET);
    encoded.reserve(content_len);
    for item in items {
        encoded.extend_from_slice(item);
    }
    encoded
}

/// Strip leading zero bytes; an all-zero input yields an empty slice
pub fn trim_leading_zeros(data: &[u8]) -> &[u8] {
    let start = data.iter().position(|&b| b != 0).unwrap_or(data.len());
    &data[start..]
}

fn u256_to_minimal_bytes(value: U256) -> Vec<u8> {
    let mut buf = [0u8; 32];
    value.to_big_endian(&mut buf);
    trim_leading_zeros(&buf).to_vec()
}

fn length_prefix(len: usize, offset: u8) -> Vec<u8> {
    if len <= SHORT_PAYLOAD_MAX {
        vec![offset + len as u8]
    } else {
        let len_bytes = encode_length(len);
        // long form: 0xb7 / 0xf7 plus the length of the length
        let mut prefix = vec![offset + SHORT_PAYLOAD_MAX as u8 + len_bytes.len() as u8];
        prefix.extend_from_slice(&len_bytes);
        prefix
    }
}

fn encode_length(len: usize) -> Vec<u8> {
    trim_leading_zeros(&(len as u64).to_be_bytes()).to_vec()
}
