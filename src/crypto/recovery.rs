//! Recovery id search and EIP-155 `v`
//!
//! For each of the four candidate ids the curve point `R` is rebuilt from
//! `r` (plus `n` for ids 2 and 3) with the y-parity given by the id's low bit,
//! then `Q = r^-1 (s R - e G)` is compared against the known public key.
//! The first candidate that reproduces it wins.

use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{Message, Secp256k1};

use super::ecdsa::Signature;
use super::keys::strip_format_byte;
use crate::error::{SignerError, SignerResult};

/// Every recovery id a secp256k1 signature can carry
pub const RECOVERY_IDS: [u8; 4] = [0, 1, 2, 3];

/// `p - n`; ids 2 and 3 need `r + n < p`, i.e. `r < p - n`
const FIELD_MINUS_ORDER: [u8; 32] = [
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01,
    0x45, 0x51, 0x23, 0x19, 0x50, 0xb7, 0x5f, 0xc4, 0x40, 0x2d, 0xa1, 0x72, 0x2f, 0xc9, 0xba, 0xee,
];

/// EIP-155 offset added to `recovery_id + chain_id * 2`
pub const EIP155_V_OFFSET: u64 = 35;

/// Reconstruct the public key for one candidate id.
///
/// Returns `None` when the candidate does not name a valid curve point.
pub fn recover_public_key(
    digest: &[u8; 32],
    signature: &Signature,
    recovery_id: u8,
) -> SignerResult<Option<[u8; 64]>> {
    if recovery_id >= 2 && signature.r >= FIELD_MINUS_ORDER {
        return Ok(None);
    }

    let id = RecoveryId::from_i32(i32::from(recovery_id))
        .map_err(|e| SignerError::InvalidSignature(format!("recovery id {}: {}", recovery_id, e)))?;

    let recoverable = match RecoverableSignature::from_compact(&signature.to_compact(), id) {
        Ok(sig) => sig,
        Err(_) => return Ok(None),
    };

    let secp = Secp256k1::verification_only();
    let message = Message::from_digest(*digest);
    match secp.recover_ecdsa(&message, &recoverable) {
        Ok(public) => Ok(Some(strip_format_byte(&public))),
        Err(_) => Ok(None),
    }
}

/// Find the id whose reconstructed key equals `known_public_key`
pub fn find_recovery_id(
    digest: &[u8; 32],
    signature: &Signature,
    known_public_key: &[u8; 64],
) -> SignerResult<u8> {
    for recovery_id in RECOVERY_IDS {
        if let Some(candidate) = recover_public_key(digest, signature, recovery_id)? {
            if &candidate == known_public_key {
                return Ok(recovery_id);
            }
        }
    }
    Err(SignerError::RecoveryFailed)
}

/// `recovery_id + chain_id * 2 + 35`.
///
/// Legacy transactions can only carry y-parity, so ids 2 and 3 are rejected.
pub fn eip155_v(recovery_id: u8, chain_id: u64) -> SignerResult<u64> {
    if recovery_id > 1 {
        return Err(SignerError::RecoveryFailed);
    }
    chain_id
        .checked_mul(2)
        .and_then(|c| c.checked_add(EIP155_V_OFFSET))
        .and_then(|c| c.checked_add(u64::from(recovery_id)))
        .ok_or_else(|| SignerError::overflow(format!("v for chain id {}", chain_id)))
}

/// Resolve the EIP-155 `v` for a signature made by `known_public_key`
pub fn resolve_v(
    signature: &Signature,
    digest: &[u8; 32],
    known_public_key: &[u8; 64],
    chain_id: u64,
) -> SignerResult<u64> {
    let recovery_id = find_recovery_id(digest, signature, known_public_key)?;
    eip155_v(recovery_id, chain_id)
}

/// Inverse of [`eip155_v`]: the recovery id encoded in `v`
pub fn recovery_id_from_v(v: u64, chain_id: u64) -> Option<u8> {
    let base = chain_id.checked_mul(2)?.checked_add(EIP155_V_OFFSET)?;
    match v.checked_sub(base)? {
        id @ (0 | 1) => Some(id as u8),
        _ => None,
    }
}
