//! # Error Types
//!
//! Errors raised while decoding identifiers or deriving digests and
//! signatures over chain entities.

use shared_crypto::CryptoError;
use thiserror::Error;

/// Errors that can occur while handling chain entities.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypesError {
    /// Canonical encoding failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A hex string could not be decoded.
    #[error("Invalid hex for {what}: {reason}")]
    InvalidHex { what: &'static str, reason: String },

    /// Decoded bytes have the wrong width.
    #[error("Invalid length for {what}: expected {expected} bytes, got {actual}")]
    InvalidLength {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Underlying signature primitive failed.
    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

impl From<bincode::Error> for TypesError {
    fn from(err: bincode::Error) -> Self {
        TypesError::Serialization(err.to_string())
    }
}
