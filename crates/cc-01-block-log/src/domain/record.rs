//! # Record Framing
//!
//! `[payload_len: u32 LE][crc32: u32 LE][payload]`

use shared_types::SignedBlock;

use super::errors::BlockLogError;

/// Size of the fixed record header.
pub const RECORD_HEADER_LEN: usize = 8;

/// Fixed header preceding each payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    pub payload_len: u32,
    pub checksum: u32,
}

impl RecordHeader {
    pub fn to_bytes(self) -> [u8; RECORD_HEADER_LEN] {
        let mut out = [0u8; RECORD_HEADER_LEN];
        out[..4].copy_from_slice(&self.payload_len.to_le_bytes());
        out[4..].copy_from_slice(&self.checksum.to_le_bytes());
        out
    }

    pub fn from_bytes(bytes: [u8; RECORD_HEADER_LEN]) -> Self {
        let [a, b, c, d, e, f, g, h] = bytes;
        Self {
            payload_len: u32::from_le_bytes([a, b, c, d]),
            checksum: u32::from_le_bytes([e, f, g, h]),
        }
    }

    /// Total record size including the header.
    pub fn record_len(&self) -> u64 {
        RECORD_HEADER_LEN as u64 + u64::from(self.payload_len)
    }
}

/// Frame `block` as a complete record.
pub fn encode_record(block: &SignedBlock) -> Result<Vec<u8>, BlockLogError> {
    let block_num = block.block_num();
    let payload = bincode::serialize(block).map_err(|e| BlockLogError::Encode {
        block_num,
        reason: e.to_string(),
    })?;
    let payload_len = u32::try_from(payload.len()).map_err(|_| BlockLogError::TooLarge {
        block_num,
        size: payload.len(),
    })?;

    let header = RecordHeader {
        payload_len,
        checksum: crc32fast::hash(&payload),
    };
    let mut record = Vec::with_capacity(RECORD_HEADER_LEN + payload.len());
    record.extend_from_slice(&header.to_bytes());
    record.extend_from_slice(&payload);
    Ok(record)
}

/// Verify and decode the payload of block `block_num`.
pub fn decode_payload(
    block_num: u32,
    header: RecordHeader,
    payload: &[u8],
) -> Result<SignedBlock, BlockLogError> {
    let actual = crc32fast::hash(payload);
    if actual != header.checksum {
        return Err(BlockLogError::Corrupt {
            block_num,
            expected: header.checksum,
            actual,
        });
    }
    bincode::deserialize(payload).map_err(|e| BlockLogError::Decode {
        block_num,
        reason: e.to_string(),
    })
}
