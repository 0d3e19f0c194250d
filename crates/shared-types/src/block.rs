//! # Blocks
//!
//! ## Derived values
//!
//! - `header digest` = sha256(bincode(header)); the witness signs this.
//! - `block id` = sha256(bincode(header, witness_signature)) with the block
//!   number written over its first four bytes.
//! - `transaction_merkle_root` = [`merkle_root`] over the transaction ids.

use serde::{Deserialize, Serialize};
use shared_crypto::{sha256, Secp256k1KeyPair, Secp256k1PublicKey};

use crate::entities::{AccountName, BlockId, Digest, Signature, TransactionId};
use crate::errors::TypesError;
use crate::merkle::merkle_root;
use crate::transaction::SignedTransaction;

/// Unsigned block header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    /// Id of the parent block (creates the chain linkage).
    pub previous: BlockId,
    /// Unix timestamp (seconds).
    pub timestamp: u32,
    /// Witness that produced the block.
    pub witness: AccountName,
    /// Merkle root of the transaction ids.
    pub transaction_merkle_root: Digest,
}

impl BlockHeader {
    /// Height of this block, derived from `previous`.
    pub fn block_num(&self) -> u32 {
        self.previous.block_num() + 1
    }

    /// Digest the witness signature commits to.
    pub fn digest(&self) -> Result<Digest, TypesError> {
        Ok(Digest(sha256(&bincode::serialize(self)?)))
    }

    /// Id of a block carrying this header and `witness_signature`.
    pub fn id_with_signature(&self, witness_signature: &Signature) -> Result<BlockId, TypesError> {
        let bytes = bincode::serialize(&(self, witness_signature))?;
        Ok(BlockId::from_digest(sha256(&bytes), self.block_num()))
    }

    /// Produce a witness signature over this header.
    pub fn sign(&self, witness_key: &Secp256k1KeyPair) -> Result<Signature, TypesError> {
        let digest = self.digest()?;
        Ok(witness_key.sign_prehash(digest.as_bytes())?.into())
    }

    /// Check `witness_signature` against `witness`.
    pub fn verify_signee(
        &self,
        witness_signature: &Signature,
        witness: &Secp256k1PublicKey,
    ) -> Result<(), TypesError> {
        let digest = self.digest()?;
        witness.verify_prehash(digest.as_bytes(), &(*witness_signature).into())?;
        Ok(())
    }
}

/// Header plus witness signature, as embedded in over-production reports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedBlockHeader {
    pub header: BlockHeader,
    pub witness_signature: Signature,
}

impl SignedBlockHeader {
    /// Replace the witness signature.
    pub fn sign(&mut self, witness_key: &Secp256k1KeyPair) -> Result<(), TypesError> {
        self.witness_signature = self.header.sign(witness_key)?;
        Ok(())
    }

    pub fn id(&self) -> Result<BlockId, TypesError> {
        self.header.id_with_signature(&self.witness_signature)
    }
}

/// A full block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedBlock {
    pub header: BlockHeader,
    pub witness_signature: Signature,
    pub transactions: Vec<SignedTransaction>,
}

impl SignedBlock {
    /// Block height.
    pub fn block_num(&self) -> u32 {
        self.header.block_num()
    }

    /// Block id. Computed on every call; not cached.
    pub fn id(&self) -> Result<BlockId, TypesError> {
        self.header.id_with_signature(&self.witness_signature)
    }

    /// Transaction ids in block order.
    pub fn transaction_ids(&self) -> Result<Vec<TransactionId>, TypesError> {
        self.transactions.iter().map(SignedTransaction::id).collect()
    }

    /// Merkle root over the current transactions.
    pub fn calculate_merkle_root(&self) -> Result<Digest, TypesError> {
        Ok(merkle_root(&self.transaction_ids()?))
    }

    /// Re-sign the header with `witness_key`.
    pub fn sign(&mut self, witness_key: &Secp256k1KeyPair) -> Result<(), TypesError> {
        self.witness_signature = self.header.sign(witness_key)?;
        Ok(())
    }

    /// Check the witness signature.
    pub fn verify_witness(&self, witness: &Secp256k1PublicKey) -> Result<(), TypesError> {
        self.header.verify_signee(&self.witness_signature, witness)
    }
}
