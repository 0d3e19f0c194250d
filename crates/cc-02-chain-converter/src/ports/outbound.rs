//! # Outbound Ports (Driven Ports)
//!
//! Where unconverted blocks come from and where converted blocks go.

use shared_types::{BlockId, SignedBlock};

use crate::error::Result;

/// Random access to the input chain.
pub trait BlockSource {
    /// Number of the last available block, 0 if none.
    fn head_block_num(&self) -> Result<u32>;

    /// Read block `block_num`; `None` if it does not exist.
    fn read_block(&self, block_num: u32) -> Result<Option<SignedBlock>>;
}

/// Append-only destination for converted blocks.
pub trait BlockSink {
    /// Number and id of the last appended block.
    ///
    /// A converter resumes from here.
    fn head(&self) -> Result<Option<(u32, BlockId)>>;

    /// Append a fully converted block.
    fn append(&mut self, block: &SignedBlock) -> Result<()>;

    /// Persist everything appended so far.
    fn flush(&mut self) -> Result<()>;
}
