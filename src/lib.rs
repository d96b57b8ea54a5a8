//! EVM Transaction Signer
//!
//! Offline signing of legacy Ethereum transactions with EIP-155 replay
//! protection.
//!
//! # Architecture
//!
//! This crate provides:
//! - **rlp**: Recursive Length Prefix encoding
//! - **utils**: Keccak-256, EIP-55 formatting, redacting logger
//! - **crypto**: Private keys, ECDSA over secp256k1, recovery id resolution
//! - **tx**: Requests, signing digest, assembly and the signing pipeline
//! - **provider**: Chain state lookups for omitted nonce / gas price / chain id
//! - **config**: Per-context settings
//!
//! # Security
//!
//! Private keys are held in [`crypto::PrivateKey`], which zeroes its bytes
//! on drop and never prints them through `Debug`. Signing uses RFC 6979
//! nonces, so identical inputs always produce identical bytes.
//!
//! # Example
//!
//! ```rust,ignore
//! use evm_tx_signer::{SigningContext, TransactionRequest, StaticProvider};
//!
//! let ctx = SigningContext::from_hex("0x4646...4646")?;
//! let request = TransactionRequest::new()
//!     .nonce(9)
//!     .gas_price(20_000_000_000u64)
//!     .gas_limit(21_000u64)
//!     .to("0x3535353535353535353535353535353535353535".parse()?)
//!     .value(1_000_000_000_000_000_000u64)
//!     .chain_id(1);
//! let signed = ctx.sign_request(request, &StaticProvider::new())?;
//! println!("{}", signed.raw_transaction_hex());
//! ```

pub mod config;
pub mod crypto;
pub mod error;
pub mod provider;
pub mod rlp;
pub mod serde_bytes;
pub mod tx;
pub mod types;
pub mod utils;

pub use config::SignerSettings;
pub use crypto::{KeyPair, PrivateKey, Signature};
pub use error::{ErrorCode, ErrorReport, SignerError, SignerResult};
pub use provider::{ChainStateProvider, StaticProvider};
pub use tx::{sign_transaction, RequestStrings, SigningContext, TransactionRequest};
pub use types::{Address, SignedTransaction, UnsignedTransaction};
pub use utils::crypto::{keccak256, to_checksum_address};
