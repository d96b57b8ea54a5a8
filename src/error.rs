//! Unified error types for the signer
//!
//! Every failure in the signing pipeline is fatal to the current attempt and
//! surfaces here as a typed variant. Nothing is ever defaulted silently.

use serde::{Deserialize, Serialize};

/// Main error type for all signing operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignerError {
    #[error("Invalid address format: {0}")]
    InvalidAddressFormat(String),

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("No recovery id reconstructs the signing public key")]
    RecoveryFailed,

    #[error("Encoding overflow: {0}")]
    EncodingOverflow(String),

    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    #[error("Invalid chain id: {0}")]
    InvalidChainId(u64),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Chain state provider failed: {0}")]
    Provider(String),
}

impl SignerError {
    /// Machine-readable category for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            SignerError::InvalidAddressFormat(_) => ErrorCode::InvalidAddressFormat,
            SignerError::InvalidPrivateKey(_) => ErrorCode::InvalidPrivateKey,
            SignerError::RecoveryFailed => ErrorCode::RecoveryFailed,
            SignerError::EncodingOverflow(_) => ErrorCode::EncodingOverflow,
            SignerError::InvalidSignature(_) => ErrorCode::InvalidSignature,
            SignerError::InvalidHex(_) => ErrorCode::InvalidHex,
            SignerError::InvalidChainId(_) => ErrorCode::InvalidChainId,
            SignerError::MissingField(_) => ErrorCode::MissingField,
            SignerError::Provider(_) => ErrorCode::ProviderError,
        }
    }

    pub fn invalid_address(msg: impl Into<String>) -> Self {
        SignerError::InvalidAddressFormat(msg.into())
    }

    pub fn invalid_private_key(msg: impl Into<String>) -> Self {
        SignerError::InvalidPrivateKey(msg.into())
    }

    pub fn overflow(msg: impl Into<String>) -> Self {
        SignerError::EncodingOverflow(msg.into())
    }

    pub fn provider(msg: impl Into<String>) -> Self {
        SignerError::Provider(msg.into())
    }
}

/// Error codes for categorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    // Input errors
    InvalidAddressFormat,
    InvalidPrivateKey,
    InvalidHex,
    InvalidChainId,
    MissingField,

    // Encoding errors
    EncodingOverflow,

    // Crypto errors
    InvalidSignature,
    RecoveryFailed,

    // Collaborator errors
    ProviderError,
}

/// Serializable error report, used by the CLI's JSON output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    pub code: ErrorCode,
    pub message: String,
}

impl From<&SignerError> for ErrorReport {
    fn from(e: &SignerError) -> Self {
        Self {
            code: e.code(),
            message: e.to_string(),
        }
    }
}

/// Result type alias for signing operations
pub type SignerResult<T> = Result<T, SignerError>;

// Conversions from common error types

impl From<hex::FromHexError> for SignerError {
    fn from(e: hex::FromHexError) -> Self {
        SignerError::InvalidHex(e.to_string())
    }
}

impl From<secp256k1::Error> for SignerError {
    fn from(e: secp256k1::Error) -> Self {
        match e {
            secp256k1::Error::InvalidSecretKey => {
                SignerError::InvalidPrivateKey("scalar outside [1, n-1]".to_string())
            }
            other => SignerError::InvalidSignature(format!("Secp256k1 error: {}", other)),
        }
    }
}
