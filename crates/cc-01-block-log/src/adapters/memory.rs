//! # In-memory Block Log

use shared_types::SignedBlock;

use crate::domain::errors::BlockLogError;
use crate::{check_sequence, BlockLog};

/// Block log held in a `Vec`, for tests and dry runs.
#[derive(Debug, Default, Clone)]
pub struct InMemoryBlockLog {
    blocks: Vec<SignedBlock>,
}

impl InMemoryBlockLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a log from blocks that are already in sequence.
    pub fn from_blocks(blocks: Vec<SignedBlock>) -> Result<Self, BlockLogError> {
        let mut log = Self::new();
        for block in blocks {
            log.append(&block)?;
        }
        Ok(log)
    }

    /// Stored blocks in order.
    pub fn blocks(&self) -> &[SignedBlock] {
        &self.blocks
    }

    pub fn into_blocks(self) -> Vec<SignedBlock> {
        self.blocks
    }
}

impl BlockLog for InMemoryBlockLog {
    fn head_block_num(&self) -> u32 {
        self.blocks.len() as u32
    }

    fn read_block(&self, block_num: u32) -> Result<Option<SignedBlock>, BlockLogError> {
        Ok(block_num
            .checked_sub(1)
            .and_then(|index| self.blocks.get(index as usize))
            .cloned())
    }

    fn append(&mut self, block: &SignedBlock) -> Result<(), BlockLogError> {
        check_sequence(self.head_block_num(), block)?;
        self.blocks.push(block.clone());
        Ok(())
    }

    fn flush(&mut self) -> Result<(), BlockLogError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::BlockId;

    fn block(num: u32) -> SignedBlock {
        let mut block = SignedBlock::default();
        block.header.previous = BlockId::from_digest([0xAB; 32], num - 1);
        block
    }

    #[test]
    fn test_sequence_and_head() {
        let mut log = InMemoryBlockLog::new();
        assert!(log.is_empty());
        assert_eq!(log.head().unwrap(), None);

        log.append(&block(1)).unwrap();
        log.append(&block(2)).unwrap();
        assert_eq!(log.head_block_num(), 2);
        assert_eq!(log.head().unwrap(), Some(block(2)));
        assert!(log.append(&block(2)).is_err());
    }

    #[test]
    fn test_from_blocks_rejects_gaps() {
        assert!(InMemoryBlockLog::from_blocks(vec![block(1), block(2)]).is_ok());
        assert!(InMemoryBlockLog::from_blocks(vec![block(2)]).is_err());
    }
}
