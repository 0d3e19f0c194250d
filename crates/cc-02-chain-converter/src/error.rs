//! Error types for chain conversion

use cc_01_block_log::BlockLogError;
use shared_types::{AuthorityClass, TypesError};
use thiserror::Error;

/// Result type alias for conversion operations
pub type Result<T> = std::result::Result<T, ConversionError>;

/// Errors that can occur while converting a chain
#[derive(Debug, Error)]
pub enum ConversionError {
    /// No replacement key configured for an authority class
    #[error("No {0} key configured for the second authority")]
    MissingKey(AuthorityClass),

    /// A configuration value could not be parsed or is inconsistent
    #[error("Invalid configuration: {field}: {reason}")]
    InvalidConfig {
        /// Offending setting
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },

    /// The input block log could not be opened
    #[error("Input block log unavailable: {0}")]
    InputUnavailable(#[source] BlockLogError),

    /// Source head claims a block it cannot produce
    #[error("Block {block_num} is missing from the input")]
    MissingBlock {
        /// Missing block number
        block_num: u32,
    },

    /// A colliding transaction id could not be made unique
    #[error(
        "Transaction {position} in block {block_num} keeps colliding after {attempts} perturbations"
    )]
    UnresolvableCollision {
        /// Block being converted
        block_num: u32,
        /// Zero-based position inside the block
        position: usize,
        /// Perturbations tried
        attempts: u32,
    },

    /// Rewriting one operation failed
    #[error("Block {block_num}, transaction {position}, operation {index} ({op}): {source}")]
    Operation {
        /// Block being converted
        block_num: u32,
        /// Zero-based transaction position inside the block
        position: usize,
        /// Zero-based operation index inside the transaction
        index: usize,
        /// Operation variant name
        op: &'static str,
        /// Underlying failure
        #[source]
        source: Box<ConversionError>,
    },

    /// No key available to sign a transaction
    #[error("Block {block_num}, transaction {position}: cannot sign: {source}")]
    Signing {
        /// Block being converted
        block_num: u32,
        /// Zero-based position inside the block
        position: usize,
        /// Underlying failure
        #[source]
        source: Box<ConversionError>,
    },

    /// Hashing, encoding or signing failed for a transaction
    #[error("Transaction {position} in block {block_num}: {source}")]
    Transaction {
        /// Block being converted
        block_num: u32,
        /// Zero-based position inside the block
        position: usize,
        /// Underlying failure
        #[source]
        source: TypesError,
    },

    /// Hashing, encoding or signing failed for a block header
    #[error("Block {block_num}: {source}")]
    Block {
        /// Block being converted
        block_num: u32,
        /// Underlying failure
        #[source]
        source: TypesError,
    },

    /// Block log read or write failure
    #[error("Block log error: {0}")]
    BlockLog(#[from] BlockLogError),

    /// JSON rendering of a block for diagnostics failed
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ConversionError {
    /// Check if the error was raised before any block was converted
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::MissingKey(_) | Self::InvalidConfig { .. } | Self::InputUnavailable(_)
        )
    }

    /// Check if the error must stop the run
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Serialization(_))
    }

    pub(crate) fn invalid_config(field: &'static str, reason: impl ToString) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.to_string(),
        }
    }
}
