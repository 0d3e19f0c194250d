//! # Operation Rewriter
//!
//! Visits every operation of a transaction and moves it into the new signing
//! context:
//!
//! - account creation and update variants gain the second authority key of
//!   the matching class (weight 1) on every authority they carry
//! - account recovery variants gain the second authority owner key
//! - proof-of-work variants are re-pointed at the previous output block, and
//!   the authority their worker would receive is synthesized and reported
//! - custom binary operations lose their required authorities
//! - over-production reports have both headers re-signed by the witness key
//!
//! Everything else is left untouched.

use serde::Serialize;
use shared_crypto::Secp256k1KeyPair;
use shared_types::{
    AccountName, Authority, AuthorityClass, BlockId, Operation, Pow2Payload, PublicKey,
};
use tracing::{debug, warn};

use super::registry::AuthorityKeyRegistry;
use crate::error::{ConversionError, Result};

/// Authorities synthesized for an account created by proof of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MinedAccount {
    pub account: AccountName,
    pub owner: Authority,
    pub active: Authority,
    pub posting: Authority,
}

/// Rewrites the operations of one block.
pub struct OperationRewriter<'a> {
    registry: &'a AuthorityKeyRegistry,
    witness_key: &'a Secp256k1KeyPair,
    previous: BlockId,
    mined: Vec<MinedAccount>,
}

impl<'a> OperationRewriter<'a> {
    /// `previous` is the id of the last converted block.
    pub fn new(
        registry: &'a AuthorityKeyRegistry,
        witness_key: &'a Secp256k1KeyPair,
        previous: BlockId,
    ) -> Self {
        Self {
            registry,
            witness_key,
            previous,
            mined: Vec::new(),
        }
    }

    fn block_num(&self) -> u32 {
        self.previous.block_num() + 1
    }

    /// Rewrite `op` in place.
    pub fn rewrite(&mut self, op: &mut Operation) -> Result<()> {
        match op {
            Operation::AccountCreate(op) => {
                self.add_all(&mut op.owner, &mut op.active, &mut op.posting)?;
            }
            Operation::AccountCreateWithDelegation(op) => {
                self.add_all(&mut op.owner, &mut op.active, &mut op.posting)?;
            }
            Operation::CreateClaimedAccount(op) => {
                self.add_all(&mut op.owner, &mut op.active, &mut op.posting)?;
            }
            Operation::AccountUpdate(op) => {
                self.add_present(&mut op.owner, &mut op.active, &mut op.posting)?;
            }
            Operation::AccountUpdate2(op) => {
                self.add_present(&mut op.owner, &mut op.active, &mut op.posting)?;
            }
            Operation::CustomBinary(op) => {
                op.required_auths.clear();
                warn!(
                    "[cc-02] Clearing custom_binary required_auths in block {}",
                    self.block_num()
                );
            }
            Operation::Pow(op) => {
                op.block_id = self.previous;
                let mined = self.mine(op.worker_account.clone(), op.work.worker)?;
                self.mined.push(mined);
            }
            Operation::Pow2(op) => {
                if let Some(key) = op.new_owner_key {
                    let mined = self.mine(op.work.worker_account().clone(), key)?;
                    self.mined.push(mined);
                }
                match &mut op.work {
                    Pow2Payload::Pow2(work) => work.input.prev_block = self.previous,
                    Pow2Payload::Equihash(work) => work.prev_block = self.previous,
                }
            }
            Operation::ReportOverProduction(op) => {
                let block_num = self.block_num();
                for header in [&mut op.first_block, &mut op.second_block] {
                    header
                        .sign(self.witness_key)
                        .map_err(|source| ConversionError::Block { block_num, source })?;
                }
            }
            Operation::RequestAccountRecovery(op) => {
                self.add_key(&mut op.new_owner_authority, AuthorityClass::Owner)?;
            }
            Operation::RecoverAccount(op) => {
                self.add_key(&mut op.new_owner_authority, AuthorityClass::Owner)?;
                self.add_key(&mut op.recent_owner_authority, AuthorityClass::Owner)?;
            }
            Operation::Vote(_)
            | Operation::Comment(_)
            | Operation::Transfer(_)
            | Operation::CustomJson(_) => {}
        }
        Ok(())
    }

    /// Accounts created by proof of work in the operations seen so far.
    pub fn mined_accounts(&self) -> &[MinedAccount] {
        &self.mined
    }

    pub fn into_mined_accounts(self) -> Vec<MinedAccount> {
        self.mined
    }

    fn add_key(&self, authority: &mut Authority, class: AuthorityClass) -> Result<()> {
        authority.add_key(self.registry.public_key(class)?, 1);
        Ok(())
    }

    fn add_all(
        &self,
        owner: &mut Authority,
        active: &mut Authority,
        posting: &mut Authority,
    ) -> Result<()> {
        self.add_key(owner, AuthorityClass::Owner)?;
        self.add_key(active, AuthorityClass::Active)?;
        self.add_key(posting, AuthorityClass::Posting)
    }

    fn add_present(
        &self,
        owner: &mut Option<Authority>,
        active: &mut Option<Authority>,
        posting: &mut Option<Authority>,
    ) -> Result<()> {
        for (authority, class) in [
            (owner, AuthorityClass::Owner),
            (active, AuthorityClass::Active),
            (posting, AuthorityClass::Posting),
        ] {
            if let Some(authority) = authority {
                self.add_key(authority, class)?;
            }
        }
        Ok(())
    }

    /// Threshold-1 authority over the worker key, extended with every second
    /// authority key and installed as all three classes.
    fn mine(&self, account: AccountName, worker: PublicKey) -> Result<MinedAccount> {
        let mut working = Authority::from_key(1, worker, 1);
        for class in AuthorityClass::ALL {
            self.add_key(&mut working, class)?;
        }
        debug!(
            "[cc-02] Synthesized authority for mined account {} in block {}",
            account,
            self.block_num()
        );
        Ok(MinedAccount {
            account,
            owner: working.clone(),
            active: working.clone(),
            posting: working,
        })
    }
}
