//! Shared types for the signer
//!
//! Transaction data crossing module boundaries lives here so every stage of
//! the pipeline agrees on one serialization.

use std::fmt;
use std::str::FromStr;

use ethers_core::types::U256;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::crypto::ecdsa::Signature;
use crate::crypto::keys::address_from_public_key;
use crate::crypto::recovery::{recover_public_key, recovery_id_from_v};
use crate::error::{SignerError, SignerResult};
use crate::tx::digest::signing_hash;
use crate::utils::crypto::{strip_hex_prefix, to_checksum_address, to_prefixed_hex};

// =============================================================================
// Address
// =============================================================================

/// A 20-byte account address
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Address(pub [u8; 20]);

impl Address {
    pub const LEN: usize = 20;

    /// Build from a byte slice, which must be exactly 20 bytes
    pub fn from_slice(bytes: &[u8]) -> SignerResult<Self> {
        let arr: [u8; 20] = bytes.try_into().map_err(|_| {
            SignerError::invalid_address(format!("Expected 20 bytes, got {}", bytes.len()))
        })?;
        Ok(Self(arr))
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// EIP-55 mixed-case form
    pub fn to_checksum(&self) -> String {
        to_checksum_address(&self.0)
    }
}

impl FromStr for Address {
    type Err = SignerError;

    /// Accepts 40 hex characters, optionally `0x`-prefixed, in any case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = strip_hex_prefix(s.trim());
        if digits.len() != Address::LEN * 2 {
            return Err(SignerError::invalid_address(format!(
                "Expected 40 hex characters, got {}",
                digits.len()
            )));
        }
        let bytes = hex::decode(digits)
            .map_err(|e| SignerError::invalid_address(format!("Invalid hex: {}", e)))?;
        Address::from_slice(&bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", to_prefixed_hex(&self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Transactions
// =============================================================================

/// A legacy (EIP-155) transaction with every field resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnsignedTransaction {
    pub nonce: u64,
    pub gas_price: U256,
    pub gas_limit: U256,
    pub to: Address,
    pub value: U256,
    #[serde(with = "crate::serde_bytes::hex_vec")]
    pub input: Vec<u8>,
    pub chain_id: u64,
}

impl UnsignedTransaction {
    /// Reject field combinations that can never be signed
    pub fn validate(&self) -> SignerResult<()> {
        if self.chain_id == 0 {
            return Err(SignerError::InvalidChainId(self.chain_id));
        }
        // v = chain_id * 2 + 36 must stay representable
        if self
            .chain_id
            .checked_mul(2)
            .and_then(|c| c.checked_add(36))
            .is_none()
        {
            return Err(SignerError::overflow(format!(
                "chain id {} too large for EIP-155 v",
                self.chain_id
            )));
        }
        Ok(())
    }
}

/// A fully signed transaction, ready for raw submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedTransaction {
    #[serde(flatten)]
    pub tx: UnsignedTransaction,
    pub v: u64,
    #[serde(with = "crate::serde_bytes::hex32")]
    pub r: [u8; 32],
    #[serde(with = "crate::serde_bytes::hex32")]
    pub s: [u8; 32],
    #[serde(with = "crate::serde_bytes::hex32")]
    pub message_hash: [u8; 32],
    #[serde(with = "crate::serde_bytes::hex_vec")]
    pub raw_transaction: Vec<u8>,
    #[serde(with = "crate::serde_bytes::hex32")]
    pub transaction_hash: [u8; 32],
}

impl SignedTransaction {
    /// The `0x`-prefixed payload for a raw-transaction submission call
    pub fn raw_transaction_hex(&self) -> String {
        to_prefixed_hex(&self.raw_transaction)
    }

    pub fn transaction_hash_hex(&self) -> String {
        to_prefixed_hex(&self.transaction_hash)
    }

    pub fn message_hash_hex(&self) -> String {
        to_prefixed_hex(&self.message_hash)
    }

    /// Recovery id carried by `v` under EIP-155
    pub fn recovery_id(&self) -> Option<u8> {
        recovery_id_from_v(self.v, self.tx.chain_id)
    }

    /// Re-derive the sender from `(v, r, s)` over the recomputed signing hash
    pub fn recover_sender(&self) -> SignerResult<Address> {
        let recovery_id = self.recovery_id().ok_or(SignerError::RecoveryFailed)?;
        let signature = Signature::from_parts(self.r, self.s)?;
        let digest = signing_hash(&self.tx);
        let public_key = recover_public_key(&digest, &signature, recovery_id)?
            .ok_or(SignerError::RecoveryFailed)?;
        Ok(address_from_public_key(&public_key))
    }
}

// =============================================================================
// Quantity parsing
// =============================================================================

/// Parse a non-negative quantity given as decimal or `0x`-hex
pub fn parse_quantity(s: &str) -> SignerResult<U256> {
    let s = s.trim();
    if s.is_empty() {
        return Err(SignerError::overflow("empty quantity"));
    }
    if s.starts_with('-') {
        return Err(SignerError::overflow(format!("negative quantity {}", s)));
    }

    if s.starts_with("0x") || s.starts_with("0X") {
        let digits = strip_hex_prefix(s);
        // JSON-RPC quantities need at least one digit
        if digits.is_empty() {
            return Err(SignerError::overflow(format!("no digits in quantity {}", s)));
        }
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(SignerError::InvalidHex(format!("invalid quantity {}", s)));
        }
        let significant = digits.trim_start_matches('0');
        if significant.is_empty() {
            return Ok(U256::zero());
        }
        if significant.len() > 64 {
            return Err(SignerError::overflow(format!("{} exceeds 256 bits", s)));
        }
        return U256::from_str_radix(significant, 16)
            .map_err(|e| SignerError::overflow(format!("{}: {:?}", s, e)));
    }

    if !s.chars().all(|c| c.is_ascii_digit()) {
        return Err(SignerError::overflow(format!("not an unsigned integer: {}", s)));
    }
    U256::from_dec_str(s).map_err(|_| SignerError::overflow(format!("{} exceeds 256 bits", s)))
}

/// Parse a quantity that must fit in 64 bits (nonce, chain id)
pub fn parse_u64_quantity(s: &str) -> SignerResult<u64> {
    let value = parse_quantity(s)?;
    if value > U256::from(u64::MAX) {
        return Err(SignerError::overflow(format!("{} exceeds 64 bits", s)));
    }
    Ok(value.as_u64())
}

/// Decode call data; an empty string is an empty payload
pub fn parse_input(s: &str) -> SignerResult<Vec<u8>> {
    Ok(hex::decode(strip_hex_prefix(s.trim()))?)
}
