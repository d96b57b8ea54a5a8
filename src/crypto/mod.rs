//! secp256k1 Cryptography
//!
//! - **keys**: private key validation, public key and address derivation
//! - **ecdsa**: deterministic digest signing and verification
//! - **recovery**: recovery id search and EIP-155 `v`

pub mod ecdsa;
pub mod keys;
pub mod recovery;

pub use ecdsa::{sign_digest, verify_digest, Signature};
pub use keys::{
    address_from_private_key, address_from_public_key, public_key_from_private_key, KeyPair,
    PrivateKey,
};
pub use recovery::{find_recovery_id, recover_public_key, resolve_v, RECOVERY_IDS};
