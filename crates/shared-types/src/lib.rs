//! # Shared Types Crate
//!
//! Chain entities for the block converter.
//!
//! ## Design Principles
//!
//! - **Content addressing**: transaction ids, block ids and merkle roots are
//!   always computed from content, never stored alongside it.
//! - **Canonical encoding**: every digest is SHA-256 over the bincode
//!   encoding of the relevant struct; ordered containers (`BTreeMap`,
//!   `BTreeSet`) keep that encoding deterministic.
//! - **Signatures outside the id**: a transaction id covers everything except
//!   its signatures, so re-signing never changes the id.

pub mod authority;
pub mod block;
pub mod entities;
pub mod errors;
pub mod merkle;
pub mod operations;
pub mod transaction;

pub use authority::{Authority, AuthorityClass};
pub use block::{BlockHeader, SignedBlock, SignedBlockHeader};
pub use entities::*;
pub use errors::TypesError;
pub use merkle::merkle_root;
pub use operations::*;
pub use transaction::SignedTransaction;
