//! # Block Log Errors

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by block log adapters.
#[derive(Debug, Error)]
pub enum BlockLogError {
    /// The log file does not exist.
    #[error("block log not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Underlying I/O failure.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A stored record does not match its checksum.
    #[error("block {block_num} is corrupt: checksum {actual:#010x}, expected {expected:#010x}")]
    Corrupt {
        block_num: u32,
        expected: u32,
        actual: u32,
    },

    /// Bytes after the last complete record that do not form a record.
    #[error("{} is truncated after block {after_block}: {trailing} unreadable bytes", path.display())]
    Truncated {
        path: PathBuf,
        after_block: u32,
        trailing: u64,
    },

    /// A record passed its checksum but does not decode as a block.
    #[error("block {block_num} could not be decoded: {reason}")]
    Decode { block_num: u32, reason: String },

    /// A block could not be encoded.
    #[error("block {block_num} could not be encoded: {reason}")]
    Encode { block_num: u32, reason: String },

    /// Encoded block does not fit a record.
    #[error("block {block_num} is too large for a record ({size} bytes)")]
    TooLarge { block_num: u32, size: usize },

    /// Write attempted on a log opened read-only.
    #[error("block log is read-only: {}", .0.display())]
    ReadOnly(PathBuf),

    /// Appended block does not directly follow the head.
    #[error("cannot append block {actual}: next block must be {expected}")]
    NonSequential { expected: u32, actual: u32 },
}

impl BlockLogError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }

    /// True for errors caused by stored data rather than the environment.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            Self::Corrupt { .. }
                | Self::Truncated { .. }
                | Self::Decode { .. }
                | Self::NonSequential { .. }
        )
    }
}
