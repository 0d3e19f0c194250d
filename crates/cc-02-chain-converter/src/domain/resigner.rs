//! # Transaction Re-signing
//!
//! Each transaction of a block is linked to the previous output block,
//! signed with the second authority owner key and checked against the ids
//! already produced in the same block. A collision is resolved by pushing
//! the expiration forward by the transaction's position and signing again,
//! which repeats until the id is unique.

use std::collections::HashSet;

use shared_crypto::Secp256k1KeyPair;
use shared_types::{
    AuthorityClass, BlockId, ChainId, SignedTransaction, TransactionId, TypesError,
};
use tracing::warn;

use super::registry::AuthorityKeyRegistry;
use crate::error::{ConversionError, Result};

/// Perturbations allowed for one transaction before giving up.
pub const MAX_COLLISION_ATTEMPTS: u32 = 1024;

/// Re-signs the transactions of one block, in order.
pub struct TransactionResigner<'a> {
    registry: &'a AuthorityKeyRegistry,
    chain_id: &'a ChainId,
    previous: BlockId,
    block_num: u32,
    seen: HashSet<TransactionId>,
    collisions: u32,
}

impl<'a> TransactionResigner<'a> {
    pub fn new(
        registry: &'a AuthorityKeyRegistry,
        chain_id: &'a ChainId,
        previous: BlockId,
    ) -> Self {
        Self {
            registry,
            chain_id,
            previous,
            block_num: previous.block_num() + 1,
            seen: HashSet::new(),
            collisions: 0,
        }
    }

    fn signing_key(&self, position: usize) -> Result<&'a Secp256k1KeyPair> {
        self.registry
            .get(AuthorityClass::Owner)
            .map_err(|source| ConversionError::Signing {
                block_num: self.block_num,
                position,
                source: Box::new(source),
            })
    }

    /// Link, sign and deduplicate the transaction at `position`. Returns its
    /// final id.
    pub fn resign(
        &mut self,
        tx: &mut SignedTransaction,
        position: usize,
    ) -> Result<TransactionId> {
        let block_num = self.block_num;
        let tx_err = |source: TypesError| ConversionError::Transaction {
            block_num,
            position,
            source,
        };

        let signing_key = self.signing_key(position)?;
        tx.set_reference_block(&self.previous);
        tx.resign_slots(signing_key, self.chain_id).map_err(tx_err)?;
        let mut id = tx.id().map_err(tx_err)?;

        let mut attempts = 0u32;
        while self.seen.contains(&id) {
            let step = u32::try_from(position).ok().filter(|step| *step > 0);
            let expiration = step.and_then(|step| tx.expiration.checked_add(step));
            let Some(expiration) = expiration.filter(|_| attempts < MAX_COLLISION_ATTEMPTS) else {
                return Err(ConversionError::UnresolvableCollision {
                    block_num,
                    position,
                    attempts,
                });
            };
            attempts += 1;

            tx.expiration = expiration;
            tx.resign_slots(signing_key, self.chain_id).map_err(tx_err)?;
            let new_id = tx.id().map_err(tx_err)?;
            warn!(
                "[cc-02] Duplicate transaction [{}] in block {}: {} -> {}",
                position, block_num, id, new_id
            );
            id = new_id;
        }

        self.collisions += attempts;
        self.seen.insert(id);
        Ok(id)
    }

    /// Total perturbations applied in this block.
    pub fn collisions(&self) -> u32 {
        self.collisions
    }
}
