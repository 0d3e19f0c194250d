//! # Chain Converter Service
//!
//! Converts one block at a time and drives a whole run from a
//! [`BlockSource`] into a [`BlockSink`].
//!
//! ## Per-block Steps
//!
//! 1. Point `previous` at the last converted block.
//! 2. Rewrite the operations of every transaction, then link, sign and
//!    deduplicate the transaction.
//! 3. Recompute the transaction merkle root.
//! 4. Sign the header with the witness key.
//! 5. Remember the new block id for the next block.

use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use shared_crypto::{Secp256k1KeyPair, Secp256k1PublicKey};
use shared_types::{BlockId, ChainId, SignedBlock, TypesError};
use tracing::{debug, info, warn};

use crate::config::{ResolvedConfig, RunOptions};
use crate::domain::{AuthorityKeyRegistry, MinedAccount, OperationRewriter, TransactionResigner};
use crate::error::{ConversionError, Result};
use crate::ports::{BlockSink, BlockSource};

/// Outcome of converting one block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedBlock {
    pub block_num: u32,
    /// Id of the converted block; the next block links to it.
    pub id: BlockId,
    /// Accounts created by proof of work in this block.
    pub mined_accounts: Vec<MinedAccount>,
    /// Id collisions resolved while re-signing.
    pub collisions: u32,
}

/// Outcome of a conversion run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// First block converted in this run, 0 if none.
    pub first_block: u32,
    /// Last block written to the sink (including earlier runs).
    pub last_block: u32,
    pub blocks_converted: u32,
    /// True if the run stopped at the interrupt flag.
    pub interrupted: bool,
    /// Id of the sink head after the run.
    pub head_id: BlockId,
}

/// Re-signs blocks under a new chain id and witness key.
pub struct ChainConverter {
    witness_key: Secp256k1KeyPair,
    chain_id: ChainId,
    registry: AuthorityKeyRegistry,
    previous: BlockId,
}

impl ChainConverter {
    pub fn new(
        witness_key: Secp256k1KeyPair,
        chain_id: ChainId,
        registry: AuthorityKeyRegistry,
    ) -> Self {
        Self {
            witness_key,
            chain_id,
            registry,
            previous: BlockId::default(),
        }
    }

    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self::new(
            config.witness_key.clone(),
            config.chain_id,
            config.registry.clone(),
        )
    }

    pub fn chain_id(&self) -> &ChainId {
        &self.chain_id
    }

    pub fn witness_public_key(&self) -> Secp256k1PublicKey {
        self.witness_key.public_key()
    }

    pub fn registry(&self) -> &AuthorityKeyRegistry {
        &self.registry
    }

    /// Id the next converted block will link to.
    pub fn previous_block_id(&self) -> &BlockId {
        &self.previous
    }

    /// Continue a chain whose last converted block is `previous`.
    pub fn set_previous_block_id(&mut self, previous: BlockId) {
        self.previous = previous;
    }

    /// Convert `block` in place and advance the cursor to its new id.
    ///
    /// On error the cursor is left unchanged.
    pub fn convert_block(&mut self, block: &mut SignedBlock) -> Result<ConvertedBlock> {
        let previous = self.previous;
        block.header.previous = previous;
        let block_num = block.block_num();

        let mut rewriter = OperationRewriter::new(&self.registry, &self.witness_key, previous);
        let mut resigner = TransactionResigner::new(&self.registry, &self.chain_id, previous);

        for (position, tx) in block.transactions.iter_mut().enumerate() {
            for (index, op) in tx.operations.iter_mut().enumerate() {
                let name = op.name();
                rewriter
                    .rewrite(op)
                    .map_err(|source| ConversionError::Operation {
                        block_num,
                        position,
                        index,
                        op: name,
                        source: Box::new(source),
                    })?;
            }
            resigner.resign(tx, position)?;
        }
        let collisions = resigner.collisions();
        let mined_accounts = rewriter.into_mined_accounts();

        let block_err = |source: TypesError| ConversionError::Block { block_num, source };
        block.header.transaction_merkle_root = block.calculate_merkle_root().map_err(block_err)?;
        block.sign(&self.witness_key).map_err(block_err)?;
        let id = block.id().map_err(block_err)?;

        debug!(
            "[cc-02] Converted block {} ({} transactions) -> {}",
            block_num,
            block.transactions.len(),
            id
        );
        self.previous = id;

        Ok(ConvertedBlock {
            block_num,
            id,
            mined_accounts,
            collisions,
        })
    }

    /// Convert every block of `source` not yet in `sink`.
    ///
    /// Resumes after the sink head. `stop` is checked between blocks; a set
    /// flag ends the run after the block in flight has been appended.
    pub fn run<S, K>(
        &mut self,
        source: &S,
        sink: &mut K,
        options: &RunOptions,
        stop: &AtomicBool,
    ) -> Result<RunSummary>
    where
        S: BlockSource + ?Sized,
        K: BlockSink + ?Sized,
    {
        let (mut last_block, head_id) = sink.head()?.unwrap_or_default();
        self.previous = head_id;
        let target = source.head_block_num()?;
        let first = last_block + 1;

        if last_block > 0 {
            info!(
                "[cc-02] Resuming after block {} ({})",
                last_block, self.previous
            );
        }
        info!("[cc-02] Converting blocks {}..={}", first, target);

        let mut converted = 0u32;
        let mut interrupted = false;

        for block_num in first..=target {
            if stop.load(Ordering::SeqCst) {
                interrupted = true;
                break;
            }

            let mut block = source
                .read_block(block_num)?
                .ok_or(ConversionError::MissingBlock { block_num })?;

            let dump = options.should_dump(block_num);
            if dump {
                log_block("before conversion", block_num, &block);
            }

            let result = self.convert_block(&mut block)?;
            for mined in &result.mined_accounts {
                info!(
                    "[cc-02] Block {}: mined account {} now also controlled by the second authority",
                    block_num, mined.account
                );
            }

            sink.append(&block)?;
            last_block = block_num;
            converted += 1;

            if dump {
                log_block("after conversion", block_num, &block);
            }
            if options.should_report_progress(block_num) {
                info!(
                    "[cc-02] [ {}% ]: {}/{} blocks rewritten",
                    progress_percent(block_num, target),
                    block_num,
                    target
                );
            }
        }

        sink.flush()?;

        if interrupted {
            warn!(
                "[cc-02] Interrupted after block {}; rerun to resume at block {}",
                last_block,
                last_block + 1
            );
        } else {
            info!("[cc-02] Conversion complete: {} blocks converted", converted);
        }

        Ok(RunSummary {
            first_block: if converted > 0 { first } else { 0 },
            last_block,
            blocks_converted: converted,
            interrupted,
            head_id: self.previous,
        })
    }
}

fn progress_percent(block_num: u32, target: u32) -> u64 {
    if target == 0 {
        return 100;
    }
    u64::from(block_num) * 100 / u64::from(target)
}

fn log_block(stage: &str, block_num: u32, block: &SignedBlock) {
    match render_json(block) {
        Ok(json) => info!("[cc-02] Block {} {}: {}", block_num, stage, json),
        Err(err) => warn!("[cc-02] Block {}: {}", block_num, err),
    }
}

fn render_json(block: &SignedBlock) -> Result<String> {
    serde_json::to_string(block).map_err(|e| ConversionError::Serialization(e.to_string()))
}
