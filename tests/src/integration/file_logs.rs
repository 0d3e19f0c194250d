//! # File-backed Runs
//!
//! Conversion from one block log file into another, including interrupted
//! and resumed runs and configuration resolution.

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::atomic::AtomicBool;

    use cc_01_block_log::{BlockLog, BlockLogError, FileBlockLog, RECORD_HEADER_LEN};
    use cc_02_chain_converter::{
        BlockSink, BlockSource, ChainConverter, ConversionError, ConverterConfig, LogSink,
        LogSource, RunOptions, RunSummary,
    };
    use shared_types::SignedBlock;
    use tempfile::TempDir;

    use crate::fixtures::*;

    fn write_input(path: &Path, blocks: &[SignedBlock]) {
        let mut log = FileBlockLog::open(path).unwrap();
        for block in blocks {
            log.append(block).unwrap();
        }
        log.flush().unwrap();
    }

    fn run(input: &Path, output: &Path, stop: &AtomicBool) -> RunSummary {
        let source = LogSource::open(input).unwrap();
        let mut sink = LogSink::open(output).unwrap();
        converter()
            .run(&source, &mut sink, &RunOptions::default(), stop)
            .unwrap()
    }

    /// Sink that raises the stop flag after a number of appends.
    struct StopAfter<'a, S> {
        inner: S,
        remaining: u32,
        stop: &'a AtomicBool,
    }

    impl<S: BlockSink> BlockSink for StopAfter<'_, S> {
        fn head(&self) -> cc_02_chain_converter::Result<Option<(u32, shared_types::BlockId)>> {
            self.inner.head()
        }

        fn append(&mut self, block: &SignedBlock) -> cc_02_chain_converter::Result<()> {
            self.inner.append(block)?;
            self.remaining = self.remaining.saturating_sub(1);
            if self.remaining == 0 {
                self.stop.store(true, std::sync::atomic::Ordering::SeqCst);
            }
            Ok(())
        }

        fn flush(&mut self) -> cc_02_chain_converter::Result<()> {
            self.inner.flush()
        }
    }

    #[test]
    fn test_full_run_between_files() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("block_log");
        let output = dir.path().join("block_log_out");
        write_input(&input, &input_chain(6));

        let summary = run(&input, &output, &AtomicBool::new(false));
        assert_eq!(summary.first_block, 1);
        assert_eq!(summary.last_block, 6);
        assert_eq!(summary.blocks_converted, 6);
        assert!(!summary.interrupted);

        let out = FileBlockLog::open_read_only(&output).unwrap();
        assert_eq!(out.head_block_num(), 6);
        let mut previous = shared_types::BlockId::default();
        for num in 1..=6 {
            let block = out.read_block(num).unwrap().unwrap();
            assert_eq!(block.header.previous, previous);
            assert!(block.verify_witness(&key(WITNESS_SEED).public_key()).is_ok());
            previous = block.id().unwrap();
        }
        assert_eq!(summary.head_id, previous);
    }

    #[test]
    fn test_interrupted_run_resumes_to_same_output() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("block_log");
        let resumed = dir.path().join("resumed");
        let straight = dir.path().join("straight");
        write_input(&input, &input_chain(5));

        // First run stops after two blocks.
        let stop = AtomicBool::new(false);
        let source = LogSource::open(&input).unwrap();
        let mut sink = StopAfter {
            inner: LogSink::open(&resumed).unwrap(),
            remaining: 2,
            stop: &stop,
        };
        let partial = converter()
            .run(&source, &mut sink, &RunOptions::default(), &stop)
            .unwrap();
        assert!(partial.interrupted);
        assert_eq!(partial.last_block, 2);
        drop(sink);

        // Second run picks up at block 3 from the file alone.
        let rest = run(&input, &resumed, &AtomicBool::new(false));
        assert_eq!(rest.first_block, 3);
        assert_eq!(rest.last_block, 5);

        let full = run(&input, &straight, &AtomicBool::new(false));
        assert_eq!(full.head_id, rest.head_id);
        assert_eq!(
            std::fs::read(&resumed).unwrap(),
            std::fs::read(&straight).unwrap()
        );
    }

    #[test]
    fn test_rerun_on_complete_output_is_noop() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("block_log");
        let output = dir.path().join("out");
        write_input(&input, &input_chain(2));

        let first = run(&input, &output, &AtomicBool::new(false));
        let again = run(&input, &output, &AtomicBool::new(false));
        assert_eq!(again.blocks_converted, 0);
        assert_eq!(again.first_block, 0);
        assert_eq!(again.last_block, 2);
        assert_eq!(again.head_id, first.head_id);
    }

    #[test]
    fn test_config_drives_a_run() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("block_log");
        write_input(&input, &input_chain(3));

        let config = ConverterConfig {
            chain_id: chain_id().to_hex(),
            witness_key: key(WITNESS_SEED).to_hex(),
            owner_key: Some(key(OWNER_SEED).to_hex()),
            input: input.clone(),
            log_specific: 2,
            ..Default::default()
        };
        let resolved = config.resolve().unwrap();
        assert_eq!(resolved.output, dir.path().join("block_log_out"));

        let source = LogSource::open(&resolved.input).unwrap();
        let mut sink = LogSink::open(&resolved.output).unwrap();
        let summary = ChainConverter::from_config(&resolved)
            .run(&source, &mut sink, &resolved.options, &AtomicBool::new(false))
            .unwrap();
        assert_eq!(summary.blocks_converted, 3);

        // Transactions are signed by the configured owner key.
        let block = sink.get_ref().read_block(1).unwrap().unwrap();
        block.transactions[0]
            .verify_signatures(&key(OWNER_SEED).public_key(), &chain_id())
            .unwrap();
        assert_eq!(source.head_block_num().unwrap(), 3);
    }

    #[test]
    fn test_missing_input_fails_before_conversion() {
        let dir = TempDir::new().unwrap();
        let err = match LogSource::open(dir.path().join("nope")) {
            Err(err) => err,
            Ok(_) => panic!("missing input opened"),
        };
        assert!(err.is_configuration());
        assert!(matches!(err, ConversionError::InputUnavailable(_)));
    }

    #[test]
    fn test_corrupt_input_aborts_with_block_number() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("block_log");
        let output = dir.path().join("out");
        write_input(&input, &input_chain(2));

        let mut bytes = std::fs::read(&input).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xFF;
        std::fs::write(&input, bytes).unwrap();

        let source = LogSource::open(&input).unwrap();
        let mut sink = LogSink::open(&output).unwrap();
        let err = converter()
            .run(&source, &mut sink, &RunOptions::default(), &AtomicBool::new(false))
            .unwrap_err();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("block 2"));

        // Block 1 was written and stays valid.
        assert_eq!(sink.get_ref().head_block_num(), 1);
    }

    #[test]
    fn test_input_with_overlong_record_is_rejected() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("block_log");
        let output = dir.path().join("out");
        write_input(&input, &input_chain(3));

        // Point record 2's length far past the end of the file.
        let mut bytes = std::fs::read(&input).unwrap();
        let first_len = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize;
        let second = RECORD_HEADER_LEN + first_len;
        bytes[second..second + 4].copy_from_slice(&0x7FFF_FFFFu32.to_le_bytes());
        std::fs::write(&input, bytes).unwrap();

        let err = match LogSource::open(&input) {
            Err(err) => err,
            Ok(_) => panic!("truncated input opened"),
        };
        assert!(err.is_fatal());
        assert!(err.to_string().contains("after block 1"));
        assert!(matches!(
            err,
            ConversionError::InputUnavailable(BlockLogError::Truncated { after_block: 1, .. })
        ));

        // Nothing was converted.
        assert!(!output.exists());
    }
}
