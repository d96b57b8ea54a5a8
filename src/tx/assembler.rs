//! Signed transaction assembly
//!
//! `rlp([nonce, gasPrice, gasLimit, to, value, input, v, r, s])` is the raw
//! transaction; its Keccak-256 is the transaction hash.

use crate::crypto::ecdsa::Signature;
use crate::rlp::{trim_leading_zeros, RlpItem};
use crate::types::{SignedTransaction, UnsignedTransaction};
use crate::utils::crypto::keccak256;

use super::digest::base_fields;

/// RLP payload of the signed transaction
pub fn signed_payload(tx: &UnsignedTransaction, v: u64, signature: &Signature) -> Vec<u8> {
    let mut fields = base_fields(tx);
    fields.push(RlpItem::from(v));
    fields.push(RlpItem::from(trim_leading_zeros(&signature.r)));
    fields.push(RlpItem::from(trim_leading_zeros(&signature.s)));
    RlpItem::List(fields).encode()
}

/// Build the final [`SignedTransaction`]
pub fn assemble_signed_transaction(
    tx: &UnsignedTransaction,
    message_hash: [u8; 32],
    v: u64,
    signature: &Signature,
) -> SignedTransaction {
    let raw_transaction = signed_payload(tx, v, signature);
    let transaction_hash = keccak256(&raw_transaction);

    SignedTransaction {
        tx: tx.clone(),
        v,
        r: signature.r,
        s: signature.s,
        message_hash,
        raw_transaction,
        transaction_hash,
    }
}
