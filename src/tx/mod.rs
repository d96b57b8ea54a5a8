//! Transaction Module
//!
//! Everything between a request and a raw transaction:
//! - **request**: optional fields and defaulting through a provider
//! - **digest**: EIP-155 signing payload and hash
//! - **assembler**: signed payload and transaction hash
//! - **signer**: the signing pipeline and its explicit context

pub mod assembler;
pub mod digest;
pub mod request;
pub mod signer;

pub use assembler::{assemble_signed_transaction, signed_payload};
pub use digest::{signing_hash, signing_payload};
pub use request::{RequestStrings, TransactionRequest};
pub use signer::{sign_transaction, SigningContext};
