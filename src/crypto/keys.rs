//! Private keys, public keys and address derivation
//!
//! Public keys are kept as the 64-byte `X || Y` concatenation without the
//! SEC1 `0x04` tag. The address is the last 20 bytes of its Keccak-256.

use std::fmt;

use rand::rngs::OsRng;
use rand::RngCore;
use secp256k1::{PublicKey, Secp256k1, SecretKey};
use serde::Serialize;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{SignerError, SignerResult};
use crate::types::Address;
use crate::utils::crypto::{keccak256, strip_hex_prefix};

/// Length of an uncompressed public key without its format byte
pub const PUBLIC_KEY_LEN: usize = 64;

/// A secp256k1 scalar in `[1, n-1]`, zeroed on drop
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey([u8; 32]);

impl PrivateKey {
    /// Validate a raw 32-byte scalar
    pub fn from_bytes(bytes: &[u8]) -> SignerResult<Self> {
        if bytes.len() != 32 {
            return Err(SignerError::invalid_private_key(format!(
                "Expected 32 bytes, got {}",
                bytes.len()
            )));
        }
        // rejects zero and anything >= n
        SecretKey::from_slice(bytes)?;

        let mut key = [0u8; 32];
        key.copy_from_slice(bytes);
        Ok(Self(key))
    }

    /// Parse 64 hex characters, optionally `0x`-prefixed.
    ///
    /// Longer strings are rejected rather than truncated.
    pub fn from_hex(s: &str) -> SignerResult<Self> {
        let digits = strip_hex_prefix(s.trim());
        if digits.len() != 64 {
            return Err(SignerError::invalid_private_key(format!(
                "Expected 64 hex characters, got {}",
                digits.len()
            )));
        }
        let mut bytes = hex::decode(digits)
            .map_err(|_| SignerError::invalid_private_key("not valid hex"))?;
        let key = Self::from_bytes(&bytes);
        bytes.zeroize();
        key
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub(crate) fn secret_key(&self) -> SignerResult<SecretKey> {
        Ok(SecretKey::from_slice(&self.0)?)
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey([REDACTED])")
    }
}

/// Scalar-multiply the generator by `private_key`
pub fn public_key_from_private_key(private_key: &PrivateKey) -> SignerResult<[u8; 64]> {
    let secp = Secp256k1::new();
    let secret = private_key.secret_key()?;
    let public = PublicKey::from_secret_key(&secp, &secret);
    Ok(strip_format_byte(&public))
}

/// Last 20 bytes of `keccak256(X || Y)`
pub fn address_from_public_key(public_key: &[u8; 64]) -> Address {
    let hash = keccak256(public_key);
    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    Address(address)
}

/// Address for a private key
pub fn address_from_private_key(private_key: &PrivateKey) -> SignerResult<Address> {
    Ok(address_from_public_key(&public_key_from_private_key(private_key)?))
}

pub(crate) fn strip_format_byte(public: &PublicKey) -> [u8; 64] {
    let uncompressed = public.serialize_uncompressed();
    let mut out = [0u8; 64];
    out.copy_from_slice(&uncompressed[1..]);
    out
}

pub(crate) fn parse_public_key(public_key: &[u8; 64]) -> SignerResult<PublicKey> {
    let mut tagged = [0u8; 65];
    tagged[0] = 0x04;
    tagged[1..].copy_from_slice(public_key);
    PublicKey::from_slice(&tagged)
        .map_err(|e| SignerError::InvalidSignature(format!("bad public key: {}", e)))
}

/// Private key with its derived public key and address
#[derive(Clone, Debug)]
pub struct KeyPair {
    private_key: PrivateKey,
    public_key: [u8; 64],
    address: Address,
}

impl KeyPair {
    pub fn from_private_key(private_key: PrivateKey) -> SignerResult<Self> {
        let public_key = public_key_from_private_key(&private_key)?;
        let address = address_from_public_key(&public_key);
        Ok(Self {
            private_key,
            public_key,
            address,
        })
    }

    pub fn from_hex(s: &str) -> SignerResult<Self> {
        Self::from_private_key(PrivateKey::from_hex(s)?)
    }

    /// Fresh key from the operating system RNG
    pub fn generate() -> SignerResult<Self> {
        let mut secret_bytes = [0u8; 32];
        OsRng.fill_bytes(&mut secret_bytes);
        let key = PrivateKey::from_bytes(&secret_bytes);
        secret_bytes.zeroize();
        Self::from_private_key(key?)
    }

    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    pub fn public_key(&self) -> &[u8; 64] {
        &self.public_key
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Lowercase `0x` form
    pub fn address_hex(&self) -> String {
        self.address.to_string()
    }

    /// EIP-55 form
    pub fn checksum_address(&self) -> String {
        self.address.to_checksum()
    }

    /// Exportable view including the secret, for key generation output
    pub fn export(&self) -> ExportedKeyPair {
        ExportedKeyPair {
            private_key: format!("0x{}", hex::encode(self.private_key.as_bytes())),
            public_key: self.public_key,
            address: self.address,
            checksum_address: self.checksum_address(),
        }
    }
}

/// Serializable key material
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedKeyPair {
    pub private_key: String,
    #[serde(with = "crate::serde_bytes::hex64")]
    pub public_key: [u8; 64],
    pub address: Address,
    pub checksum_address: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const EIP155_KEY: &str = "0x4646464646464646464646464646464646464646464646464646464646464646";

    #[test]
    fn test_eip155_key_address() {
        let pair = KeyPair::from_hex(EIP155_KEY).unwrap();
        assert_eq!(pair.address_hex(), "0x9d8a62f656a8d1615c1294fd71e9cfb3e4855a4f");
        assert_eq!(pair.checksum_address(), "0x9d8A62f656a8d1615C1294fd71e9CFb3E4855A4F");
    }

    #[test]
    fn test_scalar_one_address() {
        let mut bytes = [0u8; 32];
        bytes[31] = 1;
        let key = PrivateKey::from_bytes(&bytes).unwrap();
        assert_eq!(
            address_from_private_key(&key).unwrap().to_string(),
            "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf"
        );
    }

    #[test]
    fn test_public_key_is_64_bytes_on_curve() {
        let pair = KeyPair::from_hex(EIP155_KEY).unwrap();
        assert_eq!(pair.public_key().len(), PUBLIC_KEY_LEN);
        assert!(parse_public_key(pair.public_key()).is_ok());
    }

    #[test]
    fn test_zero_key_rejected() {
        let err = PrivateKey::from_bytes(&[0u8; 32]).unwrap_err();
        assert!(matches!(err, SignerError::InvalidPrivateKey(_)));
    }

    #[test]
    fn test_curve_order_rejected() {
        let order = secp256k1::constants::CURVE_ORDER;
        assert!(matches!(
            PrivateKey::from_bytes(&order),
            Err(SignerError::InvalidPrivateKey(_))
        ));
        assert!(PrivateKey::from_bytes(&[0xff; 32]).is_err());
    }

    #[test]
    fn test_66_hex_char_key_rejected() {
        let key = format!("0x{}", "46".repeat(33));
        assert!(matches!(
            PrivateKey::from_hex(&key),
            Err(SignerError::InvalidPrivateKey(_))
        ));
    }

    #[test]
    fn test_non_hex_key_rejected() {
        let key = "zz".repeat(32);
        assert!(matches!(
            PrivateKey::from_hex(&key),
            Err(SignerError::InvalidPrivateKey(_))
        ));
    }

    #[test]
    fn test_debug_does_not_leak_key() {
        let key = PrivateKey::from_hex(EIP155_KEY).unwrap();
        let debug = format!("{:?}", key);
        assert!(!debug.contains("4646"));
    }

    #[test]
    fn test_generated_keys_differ() {
        let a = KeyPair::generate().unwrap();
        let b = KeyPair::generate().unwrap();
        assert_ne!(a.address(), b.address());
    }

    #[test]
    fn test_export_json() {
        let pair = KeyPair::from_hex(EIP155_KEY).unwrap();
        let json = serde_json::to_value(pair.export()).unwrap();
        assert_eq!(json["address"], "0x9d8a62f656a8d1615c1294fd71e9cfb3e4855a4f");
        assert_eq!(json["publicKey"].as_str().unwrap().len(), 2 + 128);
    }
}
