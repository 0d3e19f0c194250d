//! # Block Log (cc-01)
//!
//! Append-only storage for converted and unconverted chains.
//!
//! ## On-disk Format
//!
//! A log is one file of back-to-back records:
//!
//! ```text
//! [payload_len: u32 LE][crc32(payload): u32 LE][payload: bincode(SignedBlock)]
//! ```
//!
//! Record `i` (zero-based) holds block `i + 1`. Opening a log scans the record
//! headers once to build an offset index; payloads are only read (and their
//! checksums verified) on demand.
//!
//! ## Invariants
//!
//! - Blocks are appended strictly in sequence: the block number of an
//!   appended block must be `head + 1`.
//! - A record is visible only once it has been written completely. A torn
//!   record at the tail (interrupted write) is dropped when the log is opened
//!   for writing; a read-only open refuses the file instead.
//! - Every read verifies the record checksum.
//!
//! ## Crate Structure
//!
//! - `domain/` - record framing and errors
//! - `adapters/` - file-backed and in-memory logs
//!
//! ## Usage
//!
//! ```ignore
//! use cc_01_block_log::{BlockLog, FileBlockLog};
//!
//! let mut log = FileBlockLog::open("chain.log")?;
//! log.append(&block)?;
//! let first = log.read_block(1)?;
//! ```

pub mod adapters;
pub mod domain;

pub use adapters::file::FileBlockLog;
pub use adapters::memory::InMemoryBlockLog;
pub use domain::errors::BlockLogError;
pub use domain::record::{RecordHeader, RECORD_HEADER_LEN};

use shared_types::SignedBlock;

/// Block log access.
///
/// Block numbers start at 1. A log with no blocks has head number 0.
pub trait BlockLog: Send {
    /// Number of the last stored block, 0 if empty.
    fn head_block_num(&self) -> u32;

    /// Read block `block_num`. `None` if it is past the head or 0.
    fn read_block(&self, block_num: u32) -> Result<Option<SignedBlock>, BlockLogError>;

    /// Append a block. Its number must be `head_block_num() + 1`.
    fn append(&mut self, block: &SignedBlock) -> Result<(), BlockLogError>;

    /// Make appended blocks durable.
    fn flush(&mut self) -> Result<(), BlockLogError>;

    /// The last stored block.
    fn head(&self) -> Result<Option<SignedBlock>, BlockLogError> {
        match self.head_block_num() {
            0 => Ok(None),
            num => self.read_block(num),
        }
    }

    /// True if the log holds no blocks.
    fn is_empty(&self) -> bool {
        self.head_block_num() == 0
    }
}

/// Check that `block` may follow a log whose head is `head_block_num`.
pub(crate) fn check_sequence(head_block_num: u32, block: &SignedBlock) -> Result<(), BlockLogError> {
    let expected = head_block_num + 1;
    let actual = block.block_num();
    if actual != expected {
        return Err(BlockLogError::NonSequential { expected, actual });
    }
    Ok(())
}
