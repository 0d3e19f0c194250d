//! # Block Log Adapters
//!
//! Wrap any [`BlockLog`] as a [`BlockSource`] or [`BlockSink`].

use cc_01_block_log::{BlockLog, FileBlockLog};
use shared_types::{BlockId, SignedBlock};
use std::path::Path;

use crate::error::{ConversionError, Result};
use crate::ports::{BlockSink, BlockSource};

/// Input side of a conversion.
pub struct LogSource<L> {
    log: L,
}

impl<L: BlockLog> LogSource<L> {
    pub fn new(log: L) -> Self {
        Self { log }
    }

    pub fn into_inner(self) -> L {
        self.log
    }
}

impl LogSource<FileBlockLog> {
    /// Open an existing input log read-only.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        FileBlockLog::open_read_only(path)
            .map(Self::new)
            .map_err(ConversionError::InputUnavailable)
    }
}

impl<L: BlockLog> BlockSource for LogSource<L> {
    fn head_block_num(&self) -> Result<u32> {
        Ok(self.log.head_block_num())
    }

    fn read_block(&self, block_num: u32) -> Result<Option<SignedBlock>> {
        Ok(self.log.read_block(block_num)?)
    }
}

/// Output side of a conversion.
pub struct LogSink<L> {
    log: L,
}

impl<L: BlockLog> LogSink<L> {
    pub fn new(log: L) -> Self {
        Self { log }
    }

    pub fn get_ref(&self) -> &L {
        &self.log
    }

    pub fn into_inner(self) -> L {
        self.log
    }
}

impl LogSink<FileBlockLog> {
    /// Open or create the output log.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(FileBlockLog::open(path)?))
    }
}

impl<L: BlockLog> BlockSink for LogSink<L> {
    fn head(&self) -> Result<Option<(u32, BlockId)>> {
        let Some(block) = self.log.head()? else {
            return Ok(None);
        };
        let block_num = block.block_num();
        let id = block
            .id()
            .map_err(|source| ConversionError::Block { block_num, source })?;
        Ok(Some((block_num, id)))
    }

    fn append(&mut self, block: &SignedBlock) -> Result<()> {
        Ok(self.log.append(block)?)
    }

    fn flush(&mut self) -> Result<()> {
        Ok(self.log.flush()?)
    }
}
