//! # Operations
//!
//! The closed set of operation variants a transaction may carry. Variants
//! that embed authorities or block references have dedicated structs; the
//! rest are carried through conversion untouched.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::authority::Authority;
use crate::block::SignedBlockHeader;
use crate::entities::{AccountName, BlockId, Digest, PublicKey, Signature};

/// An amount of some asset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// Amount in the asset's smallest unit.
    pub amount: i64,
    /// Ticker, e.g. `HIVE`.
    pub symbol: String,
}

impl Asset {
    /// Construct an asset amount.
    pub fn new(amount: i64, symbol: impl Into<String>) -> Self {
        Self {
            amount,
            symbol: symbol.into(),
        }
    }
}

/// Operation tagged union.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Vote(VoteOperation),
    Comment(CommentOperation),
    Transfer(TransferOperation),
    AccountCreate(AccountCreateOperation),
    AccountUpdate(AccountUpdateOperation),
    Pow(PowOperation),
    ReportOverProduction(ReportOverProductionOperation),
    CustomJson(CustomJsonOperation),
    CustomBinary(CustomBinaryOperation),
    AccountCreateWithDelegation(AccountCreateWithDelegationOperation),
    RequestAccountRecovery(RequestAccountRecoveryOperation),
    RecoverAccount(RecoverAccountOperation),
    Pow2(Pow2Operation),
    CreateClaimedAccount(CreateClaimedAccountOperation),
    AccountUpdate2(AccountUpdate2Operation),
}

impl Operation {
    /// Short variant name for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Vote(_) => "vote",
            Self::Comment(_) => "comment",
            Self::Transfer(_) => "transfer",
            Self::AccountCreate(_) => "account_create",
            Self::AccountUpdate(_) => "account_update",
            Self::Pow(_) => "pow",
            Self::ReportOverProduction(_) => "report_over_production",
            Self::CustomJson(_) => "custom_json",
            Self::CustomBinary(_) => "custom_binary",
            Self::AccountCreateWithDelegation(_) => "account_create_with_delegation",
            Self::RequestAccountRecovery(_) => "request_account_recovery",
            Self::RecoverAccount(_) => "recover_account",
            Self::Pow2(_) => "pow2",
            Self::CreateClaimedAccount(_) => "create_claimed_account",
            Self::AccountUpdate2(_) => "account_update2",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteOperation {
    pub voter: AccountName,
    pub author: AccountName,
    pub permlink: String,
    pub weight: i16,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentOperation {
    pub parent_author: AccountName,
    pub parent_permlink: String,
    pub author: AccountName,
    pub permlink: String,
    pub title: String,
    pub body: String,
    pub json_metadata: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferOperation {
    pub from: AccountName,
    pub to: AccountName,
    pub amount: Asset,
    pub memo: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountCreateOperation {
    pub fee: Asset,
    pub creator: AccountName,
    pub new_account_name: AccountName,
    pub owner: Authority,
    pub active: Authority,
    pub posting: Authority,
    pub memo_key: PublicKey,
    pub json_metadata: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountCreateWithDelegationOperation {
    pub fee: Asset,
    pub delegation: Asset,
    pub creator: AccountName,
    pub new_account_name: AccountName,
    pub owner: Authority,
    pub active: Authority,
    pub posting: Authority,
    pub memo_key: PublicKey,
    pub json_metadata: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateClaimedAccountOperation {
    pub creator: AccountName,
    pub new_account_name: AccountName,
    pub owner: Authority,
    pub active: Authority,
    pub posting: Authority,
    pub memo_key: PublicKey,
    pub json_metadata: String,
}

/// Account update; every authority is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountUpdateOperation {
    pub account: AccountName,
    pub owner: Option<Authority>,
    pub active: Option<Authority>,
    pub posting: Option<Authority>,
    pub memo_key: PublicKey,
    pub json_metadata: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountUpdate2Operation {
    pub account: AccountName,
    pub owner: Option<Authority>,
    pub active: Option<Authority>,
    pub posting: Option<Authority>,
    pub memo_key: Option<PublicKey>,
    pub json_metadata: String,
    pub posting_json_metadata: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomJsonOperation {
    pub required_auths: BTreeSet<AccountName>,
    pub required_posting_auths: BTreeSet<AccountName>,
    pub id: String,
    pub json: String,
}

/// Opaque application payload that may demand arbitrary authorities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomBinaryOperation {
    pub required_owner_auths: BTreeSet<AccountName>,
    pub required_active_auths: BTreeSet<AccountName>,
    pub required_posting_auths: BTreeSet<AccountName>,
    pub required_auths: Vec<Authority>,
    pub id: String,
    pub data: Vec<u8>,
}

/// Proof of work (first generation).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowWork {
    pub worker: PublicKey,
    pub input: Digest,
    pub signature: Signature,
    pub work: Digest,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowOperation {
    pub worker_account: AccountName,
    pub block_id: BlockId,
    pub nonce: u64,
    pub work: PowWork,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pow2Input {
    pub worker_account: AccountName,
    pub prev_block: BlockId,
    pub nonce: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pow2Work {
    pub input: Pow2Input,
    pub pow_summary: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquihashProof {
    pub n: u32,
    pub k: u32,
    pub seed: Digest,
    pub inputs: Vec<u32>,
}

/// Equihash work carries its own block reference next to the input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquihashPow {
    pub input: Pow2Input,
    pub proof: EquihashProof,
    pub prev_block: BlockId,
    pub pow_summary: u32,
}

/// The two work payload shapes of a second-generation proof of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pow2Payload {
    Pow2(Pow2Work),
    Equihash(EquihashPow),
}

impl Pow2Payload {
    /// Account credited with the work.
    pub fn worker_account(&self) -> &AccountName {
        match self {
            Self::Pow2(work) => &work.input.worker_account,
            Self::Equihash(work) => &work.input.worker_account,
        }
    }

    /// The block reference the work was computed against.
    pub fn prev_block(&self) -> &BlockId {
        match self {
            Self::Pow2(work) => &work.input.prev_block,
            Self::Equihash(work) => &work.prev_block,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pow2Operation {
    pub work: Pow2Payload,
    pub new_owner_key: Option<PublicKey>,
}

/// Evidence that a witness signed two different blocks at the same height.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportOverProductionOperation {
    pub reporter: AccountName,
    pub first_block: SignedBlockHeader,
    pub second_block: SignedBlockHeader,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestAccountRecoveryOperation {
    pub recovery_account: AccountName,
    pub account_to_recover: AccountName,
    pub new_owner_authority: Authority,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoverAccountOperation {
    pub account_to_recover: AccountName,
    pub new_owner_authority: Authority,
    pub recent_owner_authority: Authority,
}
