//! # Chain Converter (cc-02)
//!
//! Rewrites an append-only chain of signed blocks so that it validates under
//! a different signing context: a new chain id, a new witness key, and a
//! "second authority" keyset added to every authority an operation carries.
//!
//! ## Output Guarantees
//!
//! For every converted block:
//!
//! 1. **Unique ids**: transaction ids within the block are pairwise distinct.
//! 2. **Merkle integrity**: the merkle root matches the transaction ids.
//! 3. **Transaction signatures**: every signature verifies against the
//!    second authority owner key under the new chain id.
//! 4. **Witness signature**: the header verifies under the witness key.
//! 5. **Linkage**: `previous` is the id of the preceding converted block.
//!
//! Conversion is deterministic: the same input, keys and chain id always
//! produce byte-identical output.
//!
//! ## Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Adapters                                           │
//! │  - LogSource / LogSink over cc-01 block logs        │
//! └─────────────────────────────────────────────────────┘
//!                         │
//! ┌─────────────────────────────────────────────────────┐
//! │  Ports                                              │
//! │  - Outbound: BlockSource, BlockSink                 │
//! └─────────────────────────────────────────────────────┘
//!                         │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain                                             │
//! │  - AuthorityKeyRegistry                             │
//! │  - OperationRewriter                                │
//! │  - TransactionResigner                              │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! [`ChainConverter`] sits on top: it converts single blocks and drives a
//! resumable run from a source into a sink.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! let resolved = config.resolve()?;
//! let source = LogSource::open(&resolved.input)?;
//! let mut sink = LogSink::open(&resolved.output)?;
//!
//! let mut converter = ChainConverter::from_config(&resolved);
//! let summary = converter.run(&source, &mut sink, &resolved.options, &stop)?;
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

mod config;
mod error;

pub use adapters::{LogSink, LogSource};
pub use config::{ConverterConfig, ResolvedConfig, RunOptions};
pub use domain::{
    AuthorityKeyRegistry, MinedAccount, OperationRewriter, TransactionResigner,
    MAX_COLLISION_ATTEMPTS,
};
pub use error::{ConversionError, Result};
pub use ports::{BlockSink, BlockSource};
pub use service::{ChainConverter, ConvertedBlock, RunSummary};

/// Chain id used when none is configured (Hive mainnet).
pub const DEFAULT_CHAIN_ID: &str =
    "beeab0de00000000000000000000000000000000000000000000000000000000";

/// Blocks between progress lines.
pub const DEFAULT_PROGRESS_INTERVAL: u32 = 1000;
