//! secp256k1 ECDSA signing over 32-byte digests
//!
//! Nonces come from RFC 6979 (HMAC-SHA256), so the same digest and key
//! always produce the same `(r, s)`. Output is normalized to low-s.

use secp256k1::{ecdsa, Message, Secp256k1};
use serde::{Deserialize, Serialize};

use super::keys::{parse_public_key, PrivateKey};
use crate::error::{SignerError, SignerResult};

/// Group order `n` of secp256k1, big-endian
pub const CURVE_ORDER: [u8; 32] = secp256k1::constants::CURVE_ORDER;

/// `n / 2`, the largest canonical `s`
pub const HALF_CURVE_ORDER: [u8; 32] = [
    0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0x5d, 0x57, 0x6e, 0x73, 0x57, 0xa4, 0x50, 0x1d, 0xdf, 0xe9, 0x2f, 0x46, 0x68, 0x1b, 0x20, 0xa0,
];

/// Raw ECDSA signature, both scalars in `[1, n-1]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    #[serde(with = "crate::serde_bytes::hex32")]
    pub r: [u8; 32],
    #[serde(with = "crate::serde_bytes::hex32")]
    pub s: [u8; 32],
}

impl Signature {
    /// Build from big-endian scalars, rejecting zero and anything >= n
    pub fn from_parts(r: [u8; 32], s: [u8; 32]) -> SignerResult<Self> {
        check_scalar("r", &r)?;
        check_scalar("s", &s)?;
        Ok(Self { r, s })
    }

    /// `r || s`
    pub fn to_compact(&self) -> [u8; 64] {
        let mut out = [0u8; 64];
        out[..32].copy_from_slice(&self.r);
        out[32..].copy_from_slice(&self.s);
        out
    }

    /// Whether `s <= n/2`
    pub fn is_low_s(&self) -> bool {
        self.s <= HALF_CURVE_ORDER
    }

    fn to_secp(self) -> SignerResult<ecdsa::Signature> {
        Ok(ecdsa::Signature::from_compact(&self.to_compact())?)
    }
}

fn check_scalar(name: &str, value: &[u8; 32]) -> SignerResult<()> {
    if value.iter().all(|&b| b == 0) {
        return Err(SignerError::InvalidSignature(format!("{} is zero", name)));
    }
    // big-endian byte order compares like the integers
    if *value >= CURVE_ORDER {
        return Err(SignerError::InvalidSignature(format!(
            "{} is not below the curve order",
            name
        )));
    }
    Ok(())
}

/// Sign a 32-byte digest
pub fn sign_digest(digest: &[u8; 32], private_key: &PrivateKey) -> SignerResult<Signature> {
    let secp = Secp256k1::new();
    let secret = private_key.secret_key()?;
    let message = Message::from_digest(*digest);

    let mut signature = secp.sign_ecdsa(&message, &secret);
    signature.normalize_s();

    let compact = signature.serialize_compact();
    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&compact[..32]);
    s.copy_from_slice(&compact[32..]);

    Signature::from_parts(r, s)
}

/// Check `signature` over `digest` against a 64-byte public key
pub fn verify_digest(
    digest: &[u8; 32],
    signature: &Signature,
    public_key: &[u8; 64],
) -> SignerResult<bool> {
    let secp = Secp256k1::verification_only();
    let public = parse_public_key(public_key)?;
    let message = Message::from_digest(*digest);
    Ok(secp
        .verify_ecdsa(&message, &signature.to_secp()?, &public)
        .is_ok())
}
