//! EIP-155 signing digest
//!
//! `keccak256(rlp([nonce, gasPrice, gasLimit, to, value, input, chainId, 0, 0]))`

use ethers_core::types::U256;

use crate::rlp::RlpItem;
use crate::types::UnsignedTransaction;
use crate::utils::crypto::keccak256;

/// The six fields shared by the unsigned and signed encodings
pub(crate) fn base_fields(tx: &UnsignedTransaction) -> Vec<RlpItem> {
    vec![
        RlpItem::from(tx.nonce),
        RlpItem::from(tx.gas_price),
        RlpItem::from(tx.gas_limit),
        RlpItem::from(&tx.to.0[..]),
        RlpItem::from(tx.value),
        // empty input encodes exactly like integer zero
        RlpItem::from(tx.input.clone()),
    ]
}

/// RLP payload that gets hashed for signing
pub fn signing_payload(tx: &UnsignedTransaction) -> Vec<u8> {
    let mut fields = base_fields(tx);
    fields.push(RlpItem::from(tx.chain_id));
    fields.push(RlpItem::from(U256::zero()));
    fields.push(RlpItem::from(U256::zero()));
    RlpItem::List(fields).encode()
}

/// The 32-byte message the signer operates on
pub fn signing_hash(tx: &UnsignedTransaction) -> [u8; 32] {
    keccak256(&signing_payload(tx))
}
