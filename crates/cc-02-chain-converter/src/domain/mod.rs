//! Domain logic: the second-authority key registry, the operation rewriter
//! and the transaction re-signer.

pub mod registry;
pub mod resigner;
pub mod rewriter;

pub use registry::AuthorityKeyRegistry;
pub use resigner::{TransactionResigner, MAX_COLLISION_ATTEMPTS};
pub use rewriter::{MinedAccount, OperationRewriter};
