//! Port definitions for the converter.

pub mod outbound;

pub use outbound::{BlockSink, BlockSource};
