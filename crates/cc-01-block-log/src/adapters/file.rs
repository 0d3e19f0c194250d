//! # File-backed Block Log

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use shared_types::SignedBlock;
use tracing::{debug, info, warn};

use crate::domain::errors::BlockLogError;
use crate::domain::record::{decode_payload, encode_record, RecordHeader, RECORD_HEADER_LEN};
use crate::{check_sequence, BlockLog};

/// Block log persisted to a single file.
pub struct FileBlockLog {
    path: PathBuf,
    file: File,
    /// Byte offset of the record holding block `i + 1`.
    offsets: Vec<u64>,
    /// End of the last complete record.
    end: u64,
    writable: bool,
}

impl FileBlockLog {
    /// Open `path` for reading and appending, creating it if missing.
    ///
    /// A torn record at the tail is truncated away.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, BlockLogError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(BlockLogError::io(parent))?;
        }
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(BlockLogError::io(&path))?;
        Self::load(path, file, true)
    }

    /// Open an existing log without write access.
    ///
    /// Unlike [`Self::open`], bytes past the last complete record are an
    /// error: a read-only log is an input and must be read in full.
    pub fn open_read_only(path: impl AsRef<Path>) -> Result<Self, BlockLogError> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(BlockLogError::NotFound(path));
        }
        let file = File::open(&path).map_err(BlockLogError::io(&path))?;
        Self::load(path, file, false)
    }

    fn load(path: PathBuf, file: File, writable: bool) -> Result<Self, BlockLogError> {
        let file_len = file.metadata().map_err(BlockLogError::io(&path))?.len();
        let (offsets, end) = scan(&file, &path, file_len)?;

        if end < file_len {
            let after_block = offsets.len() as u32;
            let trailing = file_len - end;
            if !writable {
                return Err(BlockLogError::Truncated {
                    path,
                    after_block,
                    trailing,
                });
            }
            warn!(
                "[cc-01] {} has {} trailing bytes after block {}",
                path.display(),
                trailing,
                after_block
            );
            file.set_len(end).map_err(BlockLogError::io(&path))?;
            info!("[cc-01] Truncated torn record from {}", path.display());
        }

        debug!(
            "[cc-01] Opened {} with {} blocks",
            path.display(),
            offsets.len()
        );
        Ok(Self {
            path,
            file,
            offsets,
            end,
            writable,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_header(&self, offset: u64) -> Result<RecordHeader, BlockLogError> {
        let mut raw = [0u8; RECORD_HEADER_LEN];
        let mut file = &self.file;
        file.seek(SeekFrom::Start(offset))
            .and_then(|_| file.read_exact(&mut raw))
            .map_err(BlockLogError::io(&self.path))?;
        Ok(RecordHeader::from_bytes(raw))
    }
}

/// Walk record headers, returning record offsets and the end of the last
/// complete record.
fn scan(file: &File, path: &Path, file_len: u64) -> Result<(Vec<u64>, u64), BlockLogError> {
    let mut offsets = Vec::new();
    let mut pos = 0u64;
    let mut reader = file;

    while pos + RECORD_HEADER_LEN as u64 <= file_len {
        let mut raw = [0u8; RECORD_HEADER_LEN];
        reader
            .seek(SeekFrom::Start(pos))
            .and_then(|_| reader.read_exact(&mut raw))
            .map_err(BlockLogError::io(path))?;
        let next = pos + RecordHeader::from_bytes(raw).record_len();
        if next > file_len {
            break;
        }
        offsets.push(pos);
        pos = next;
    }

    Ok((offsets, pos))
}

impl BlockLog for FileBlockLog {
    fn head_block_num(&self) -> u32 {
        self.offsets.len() as u32
    }

    fn read_block(&self, block_num: u32) -> Result<Option<SignedBlock>, BlockLogError> {
        let Some(&offset) = block_num
            .checked_sub(1)
            .and_then(|index| self.offsets.get(index as usize))
        else {
            return Ok(None);
        };

        let header = self.read_header(offset)?;
        let mut payload = vec![0u8; header.payload_len as usize];
        (&self.file)
            .read_exact(&mut payload)
            .map_err(BlockLogError::io(&self.path))?;

        decode_payload(block_num, header, &payload).map(Some)
    }

    fn append(&mut self, block: &SignedBlock) -> Result<(), BlockLogError> {
        if !self.writable {
            return Err(BlockLogError::ReadOnly(self.path.clone()));
        }
        check_sequence(self.head_block_num(), block)?;

        let record = encode_record(block)?;
        self.file
            .seek(SeekFrom::Start(self.end))
            .and_then(|_| self.file.write_all(&record))
            .map_err(BlockLogError::io(&self.path))?;

        self.offsets.push(self.end);
        self.end += record.len() as u64;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), BlockLogError> {
        if self.writable {
            self.file
                .flush()
                .and_then(|_| self.file.sync_data())
                .map_err(BlockLogError::io(&self.path))?;
        }
        Ok(())
    }
}
