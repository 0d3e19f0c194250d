//! # Transactions
//!
//! A transaction's id is the SHA-256 of its unsigned body. Its signature
//! digest additionally commits to the chain id, which is what binds a
//! signature to one chain.

use serde::{Deserialize, Serialize};
use shared_crypto::{sha256, sha256_many, Secp256k1KeyPair, Secp256k1PublicKey};

use crate::entities::{BlockId, ChainId, Digest, Signature, TransactionId};
use crate::errors::TypesError;
use crate::operations::Operation;

/// A transaction together with its signatures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    /// Low 16 bits of the referenced block number.
    pub ref_block_num: u16,
    /// Bytes 4..8 of the referenced block id.
    pub ref_block_prefix: u32,
    /// Expiration time in seconds.
    pub expiration: u32,
    /// Ordered operations.
    pub operations: Vec<Operation>,
    /// One signature per signing slot.
    pub signatures: Vec<Signature>,
}

/// Borrowed view of everything a transaction id covers.
#[derive(Serialize)]
struct TransactionBody<'a> {
    ref_block_num: u16,
    ref_block_prefix: u32,
    expiration: u32,
    operations: &'a [Operation],
}

impl SignedTransaction {
    fn body_bytes(&self) -> Result<Vec<u8>, TypesError> {
        let body = TransactionBody {
            ref_block_num: self.ref_block_num,
            ref_block_prefix: self.ref_block_prefix,
            expiration: self.expiration,
            operations: &self.operations,
        };
        Ok(bincode::serialize(&body)?)
    }

    /// Content id; signatures are not covered.
    pub fn id(&self) -> Result<TransactionId, TypesError> {
        Ok(TransactionId(sha256(&self.body_bytes()?)))
    }

    /// Digest that signatures commit to: `sha256(chain_id || body)`.
    pub fn sig_digest(&self, chain_id: &ChainId) -> Result<Digest, TypesError> {
        let body = self.body_bytes()?;
        Ok(Digest(sha256_many(&[chain_id.as_bytes().as_slice(), body.as_slice()])))
    }

    /// Point the transaction at `block_id` for expiration/replay protection.
    pub fn set_reference_block(&mut self, block_id: &BlockId) {
        self.ref_block_num = (block_id.block_num() & 0xFFFF) as u16;
        self.ref_block_prefix = block_id.ref_prefix();
    }

    /// Replace every existing signature slot with a signature by `key`.
    pub fn resign_slots(
        &mut self,
        key: &Secp256k1KeyPair,
        chain_id: &ChainId,
    ) -> Result<(), TypesError> {
        if self.signatures.is_empty() {
            return Ok(());
        }
        let digest = self.sig_digest(chain_id)?;
        let signature: Signature = key.sign_prehash(digest.as_bytes())?.into();
        for slot in &mut self.signatures {
            *slot = signature;
        }
        Ok(())
    }

    /// Check that every signature was produced by `signer` under `chain_id`.
    pub fn verify_signatures(
        &self,
        signer: &Secp256k1PublicKey,
        chain_id: &ChainId,
    ) -> Result<(), TypesError> {
        let digest = self.sig_digest(chain_id)?;
        for signature in &self.signatures {
            signer.verify_prehash(digest.as_bytes(), &(*signature).into())?;
        }
        Ok(())
    }
}
