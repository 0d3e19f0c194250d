//! Shared fixtures for the integration suite.

use cc_02_chain_converter::{AuthorityKeyRegistry, ChainConverter};
use shared_crypto::Secp256k1KeyPair;
use shared_types::{
    Asset, AuthorityClass, BlockId, ChainId, Operation, PublicKey, Signature, SignedBlock,
    SignedTransaction, TransferOperation,
};

pub const WITNESS_SEED: u8 = 0x09;
pub const OWNER_SEED: u8 = 0x01;
pub const ACTIVE_SEED: u8 = 0x02;
pub const POSTING_SEED: u8 = 0x03;

pub fn key(seed: u8) -> Secp256k1KeyPair {
    Secp256k1KeyPair::from_bytes([seed; 32]).expect("fixture key is valid")
}

pub fn public_key(seed: u8) -> PublicKey {
    key(seed).public_key().into()
}

pub fn chain_id() -> ChainId {
    ChainId([0x18; 32])
}

pub fn registry() -> AuthorityKeyRegistry {
    let mut registry = AuthorityKeyRegistry::new();
    registry.set(AuthorityClass::Owner, key(OWNER_SEED));
    registry.set(AuthorityClass::Active, key(ACTIVE_SEED));
    registry.set(AuthorityClass::Posting, key(POSTING_SEED));
    registry
}

pub fn converter() -> ChainConverter {
    ChainConverter::new(key(WITNESS_SEED), chain_id(), registry())
}

/// A signed transaction carrying `operations`, with one signature slot.
pub fn transaction(expiration: u32, operations: Vec<Operation>) -> SignedTransaction {
    SignedTransaction {
        ref_block_num: 0xBEEF,
        ref_block_prefix: 0xDEAD_BEEF,
        expiration,
        operations,
        signatures: vec![Signature([0x5C; 64])],
    }
}

pub fn transfer(from: &str, amount: i64) -> Operation {
    Operation::Transfer(TransferOperation {
        from: from.into(),
        to: "exchange".into(),
        amount: Asset::new(amount, "HIVE"),
        memo: String::new(),
    })
}

/// Block `num` of a pre-conversion chain. `previous` points into the old
/// chain, so it only carries the right block number.
pub fn input_block(num: u32, transactions: Vec<SignedTransaction>) -> SignedBlock {
    let mut block = SignedBlock {
        transactions,
        ..Default::default()
    };
    block.header.previous = BlockId::from_digest([0xD1; 32], num - 1);
    block.header.timestamp = 1_458_835_200 + num * 3;
    block.header.witness = "initminer".into();
    block.witness_signature = Signature([0x66; 64]);
    block
}

/// `count` blocks with one transfer each.
pub fn input_chain(count: u32) -> Vec<SignedBlock> {
    (1..=count)
        .map(|num| input_block(num, vec![transaction(num, vec![transfer("alice", num as i64)])]))
        .collect()
}
