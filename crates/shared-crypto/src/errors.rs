//! Crypto error types.

use thiserror::Error;

/// Failures while parsing keys or producing and checking signatures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Decoded private key has the wrong size.
    #[error("private key must be {expected} bytes, got {actual}")]
    InvalidKeyLength {
        /// Required size.
        expected: usize,
        /// Size found.
        actual: usize,
    },

    /// Key text is not valid hex.
    #[error("key is not valid hex: {0}")]
    InvalidHex(String),

    /// Scalar is zero or not below the curve order.
    #[error("private key is not a valid secp256k1 scalar")]
    InvalidPrivateKey,

    /// Bytes are not a compressed SEC1 point.
    #[error("public key is not a valid compressed secp256k1 point")]
    InvalidPublicKey,

    /// Signature bytes are not a valid (r, s) pair.
    #[error("signature bytes are malformed")]
    InvalidSignature,

    /// Signature does not verify.
    #[error("signature does not match digest and public key")]
    SignatureVerificationFailed,

    /// Backend signing error.
    #[error("signing failed: {0}")]
    SigningFailed(String),
}
