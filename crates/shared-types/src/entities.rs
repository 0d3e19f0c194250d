//! # Core Identifiers
//!
//! Fixed-width byte values that appear on the wire. All of them encode as
//! raw bytes in bincode and as lowercase hex in human-readable formats
//! (the JSON block dumps), which also lets public keys act as JSON map keys.
//!
//! ## Clusters
//!
//! - **Chain**: `ChainId`, `BlockId`, `TransactionId`, `Digest`
//! - **Keys**: `PublicKey`, `Signature`

use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, serde_as, Bytes, IfIsHumanReadable};
use shared_crypto::{Secp256k1PublicKey, Secp256k1Signature};

use crate::errors::TypesError;

/// Account names are plain strings.
pub type AccountName = String;

macro_rules! fixed_bytes {
    ($(#[$meta:meta])* $name:ident, $len:expr, $what:literal) => {
        $(#[$meta])*
        #[serde_as]
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(#[serde_as(as = "IfIsHumanReadable<Hex, Bytes>")] pub [u8; $len]);

        impl $name {
            /// Width in bytes.
            pub const LEN: usize = $len;

            /// Raw bytes.
            pub fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }

            /// Decode from a hex string of exactly `LEN` bytes.
            pub fn from_hex(encoded: &str) -> Result<Self, TypesError> {
                let decoded = hex::decode(encoded.trim()).map_err(|e| TypesError::InvalidHex {
                    what: $what,
                    reason: e.to_string(),
                })?;
                let bytes: [u8; $len] =
                    decoded
                        .as_slice()
                        .try_into()
                        .map_err(|_| TypesError::InvalidLength {
                            what: $what,
                            expected: $len,
                            actual: decoded.len(),
                        })?;
                Ok(Self(bytes))
            }

            /// Lowercase hex.
            pub fn to_hex(&self) -> String {
                hex::encode(self.0)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self([0u8; $len])
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.to_hex())
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({})", stringify!($name), self.to_hex())
            }
        }
    };
}

fixed_bytes!(
    /// Identifier of the chain a signature is bound to.
    ChainId,
    32,
    "chain id"
);

fixed_bytes!(
    /// A 32-byte SHA-256 digest (merkle roots, signature digests, PoW inputs).
    Digest,
    32,
    "digest"
);

fixed_bytes!(
    /// Transaction identifier: digest of the unsigned transaction body.
    TransactionId,
    32,
    "transaction id"
);

fixed_bytes!(
    /// Block identifier: digest of the signed header with the block number
    /// written big-endian over the first four bytes.
    BlockId,
    32,
    "block id"
);

fixed_bytes!(
    /// Compressed secp256k1 public key as it appears inside authorities.
    PublicKey,
    33,
    "public key"
);

fixed_bytes!(
    /// Compact (r||s) secp256k1 signature.
    Signature,
    64,
    "signature"
);

impl BlockId {
    /// Build an id from a header digest, embedding `block_num`.
    pub fn from_digest(digest: [u8; 32], block_num: u32) -> Self {
        let mut bytes = digest;
        bytes[..4].copy_from_slice(&block_num.to_be_bytes());
        Self(bytes)
    }

    /// Block number embedded in the id. The zero id (before block 1) is 0.
    pub fn block_num(&self) -> u32 {
        u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }

    /// Reference prefix used by transactions that point at this block.
    pub fn ref_prefix(&self) -> u32 {
        u32::from_le_bytes([self.0[4], self.0[5], self.0[6], self.0[7]])
    }
}

impl From<Secp256k1PublicKey> for PublicKey {
    fn from(key: Secp256k1PublicKey) -> Self {
        Self(*key.as_bytes())
    }
}

impl TryFrom<PublicKey> for Secp256k1PublicKey {
    type Error = TypesError;

    fn try_from(key: PublicKey) -> Result<Self, Self::Error> {
        Ok(Secp256k1PublicKey::from_bytes(key.0)?)
    }
}

impl From<Secp256k1Signature> for Signature {
    fn from(sig: Secp256k1Signature) -> Self {
        Self(*sig.as_bytes())
    }
}

impl From<Signature> for Secp256k1Signature {
    fn from(sig: Signature) -> Self {
        Secp256k1Signature::from_bytes(sig.0)
    }
}
