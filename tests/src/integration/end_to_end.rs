//! # End-to-end Conversion
//!
//! Whole blocks through [`ChainConverter`], checked against the output
//! guarantees: unique ids, merkle integrity, signature validity, linkage and
//! determinism.
//!
//! [`ChainConverter`]: cc_02_chain_converter::ChainConverter

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::atomic::AtomicBool;

    use cc_01_block_log::InMemoryBlockLog;
    use cc_02_chain_converter::{LogSink, LogSource, OperationRewriter, RunOptions};
    use shared_types::{
        merkle_root, AccountCreateOperation, AccountUpdateOperation, Authority,
        CustomBinaryOperation, Operation, PowOperation, PowWork, PublicKey, SignedBlock,
    };

    use crate::fixtures::*;

    // =============================================================================
    // HELPERS
    // =============================================================================

    fn assert_block_valid(block: &SignedBlock) {
        let ids = block.transaction_ids().unwrap();
        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len(), "duplicate transaction ids");

        assert_eq!(block.header.transaction_merkle_root, merkle_root(&ids));
        block
            .verify_witness(&key(WITNESS_SEED).public_key())
            .expect("witness signature");
        for tx in &block.transactions {
            tx.verify_signatures(&key(OWNER_SEED).public_key(), &chain_id())
                .expect("transaction signature");
        }
    }

    fn empty_authority() -> Authority {
        Authority::new(1)
    }

    // =============================================================================
    // SCENARIOS
    // =============================================================================

    /// Account creation receives exactly the second authority keys.
    #[test]
    fn test_account_creation_gets_second_authority() {
        let op = Operation::AccountCreate(AccountCreateOperation {
            creator: "initminer".into(),
            new_account_name: "alice".into(),
            owner: empty_authority(),
            active: empty_authority(),
            posting: empty_authority(),
            memo_key: PublicKey([0x02; 33]),
            ..Default::default()
        });
        let mut block = input_block(1, vec![transaction(10, vec![op])]);

        converter().convert_block(&mut block).unwrap();
        assert_block_valid(&block);

        let Operation::AccountCreate(op) = &block.transactions[0].operations[0] else {
            panic!("variant changed");
        };
        for (authority, seed) in [
            (&op.owner, OWNER_SEED),
            (&op.active, ACTIVE_SEED),
            (&op.posting, POSTING_SEED),
        ] {
            assert_eq!(authority.key_auths.len(), 1);
            assert_eq!(authority.key_weight(&public_key(seed)), Some(1));
            assert!(authority.account_auths.is_empty());
        }
        assert_eq!(op.memo_key, PublicKey([0x02; 33]));
    }

    /// Two transactions that end up identical get distinct ids.
    #[test]
    fn test_identical_transactions_are_separated() {
        let tx = transaction(500, vec![transfer("bob", 7)]);
        let mut other = tx.clone();
        // Different linkage in the input; identical after re-linking.
        other.ref_block_num = 1;
        let mut block = input_block(1, vec![tx, other]);

        converter().convert_block(&mut block).unwrap();
        assert_block_valid(&block);

        assert_eq!(block.transactions[0].expiration, 500);
        assert_eq!(block.transactions[1].expiration, 501);
        assert_ne!(
            block.transactions[0].id().unwrap(),
            block.transactions[1].id().unwrap()
        );
    }

    /// Three identical transactions need chained perturbations.
    #[test]
    fn test_multiple_collisions_in_one_block() {
        let tx = transaction(900, vec![transfer("carol", 1)]);
        let mut block = input_block(1, vec![tx.clone(), tx.clone(), tx.clone(), tx]);

        let result = converter().convert_block(&mut block).unwrap();
        assert_block_valid(&block);
        assert_eq!(result.collisions, 3);
    }

    /// Custom binary operations lose every required authority.
    #[test]
    fn test_custom_binary_required_auths_cleared() {
        let op = Operation::CustomBinary(CustomBinaryOperation {
            required_active_auths: ["alice".to_string()].into(),
            required_auths: vec![
                Authority::from_key(1, PublicKey([0x02; 33]), 1),
                Authority::from_key(2, PublicKey([0x03; 33]), 2),
            ],
            id: "game".into(),
            data: vec![0xCA, 0xFE],
            ..Default::default()
        });
        let mut block = input_block(1, vec![transaction(10, vec![op])]);

        converter().convert_block(&mut block).unwrap();
        assert_block_valid(&block);

        let Operation::CustomBinary(op) = &block.transactions[0].operations[0] else {
            panic!("variant changed");
        };
        assert!(op.required_auths.is_empty());
        assert_eq!(op.data, vec![0xCA, 0xFE]);
    }

    /// Proof of work points at the previous converted block and reports the
    /// synthesized authority for all three classes.
    #[test]
    fn test_pow_links_to_previous_output_block() {
        let mut converter = converter();
        let mut first = input_block(1, vec![]);
        let first_id = converter.convert_block(&mut first).unwrap().id;

        let worker = PublicKey([0x02; 33]);
        let op = Operation::Pow(PowOperation {
            worker_account: "miner".into(),
            block_id: first.header.previous,
            nonce: 42,
            work: PowWork {
                worker,
                ..Default::default()
            },
        });
        let mut second = input_block(2, vec![transaction(10, vec![op])]);
        let result = converter.convert_block(&mut second).unwrap();
        assert_block_valid(&second);

        let Operation::Pow(op) = &second.transactions[0].operations[0] else {
            panic!("variant changed");
        };
        assert_eq!(op.block_id, first_id);

        assert_eq!(result.mined_accounts.len(), 1);
        let mined = &result.mined_accounts[0];
        assert_eq!(mined.account, "miner");
        for authority in [&mined.owner, &mined.active, &mined.posting] {
            assert_eq!(authority.weight_threshold, 1);
            assert_eq!(authority.key_weight(&worker), Some(1));
        }
        assert_eq!(mined.owner, mined.posting);
    }

    /// Block 3 links to the recomputed id of converted block 2.
    #[test]
    fn test_three_block_chain_linkage() {
        let mut converter = converter();
        let mut blocks = input_chain(3);
        for block in &mut blocks {
            converter.convert_block(block).unwrap();
            assert_block_valid(block);
        }

        assert_eq!(blocks[0].header.previous, shared_types::BlockId::default());
        assert_eq!(blocks[1].header.previous, blocks[0].id().unwrap());
        assert_eq!(blocks[2].header.previous, blocks[1].id().unwrap());
        assert_eq!(blocks[2].block_num(), 3);
        assert_eq!(converter.previous_block_id(), &blocks[2].id().unwrap());
    }

    // =============================================================================
    // PROPERTIES
    // =============================================================================

    #[test]
    fn test_conversion_is_byte_identical_across_runs() {
        let convert = || {
            let source = LogSource::new(InMemoryBlockLog::from_blocks(input_chain(5)).unwrap());
            let mut sink = LogSink::new(InMemoryBlockLog::new());
            converter()
                .run(&source, &mut sink, &RunOptions::default(), &AtomicBool::new(false))
                .unwrap();
            sink.into_inner().into_blocks()
        };

        let a = convert();
        let b = convert();
        assert_eq!(a.len(), 5);
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_chain_ids_diverge() {
        let mut a = input_chain(1).remove(0);
        let mut b = a.clone();
        converter().convert_block(&mut a).unwrap();
        cc_02_chain_converter::ChainConverter::new(
            key(WITNESS_SEED),
            shared_types::ChainId([0x99; 32]),
            registry(),
        )
        .convert_block(&mut b)
        .unwrap();

        // Same content, different signatures.
        assert_eq!(a.transactions[0].id().unwrap(), b.transactions[0].id().unwrap());
        assert_ne!(a.transactions[0].signatures, b.transactions[0].signatures);
    }

    /// Rewriting twice keeps the second authority key exactly once at weight 1
    /// and leaves prior entries alone.
    #[test]
    fn test_rewrite_twice_with_overlapping_keys() {
        let registry = registry();
        let witness = key(WITNESS_SEED);
        let mut owner = Authority::new(1);
        owner.add_key(PublicKey([0x02; 33]), 1);
        owner.add_key(public_key(OWNER_SEED), 3);

        let mut op = Operation::AccountUpdate(AccountUpdateOperation {
            account: "alice".into(),
            owner: Some(owner),
            ..Default::default()
        });
        let mut rewriter = OperationRewriter::new(&registry, &witness, Default::default());
        rewriter.rewrite(&mut op).unwrap();
        let once = op.clone();
        rewriter.rewrite(&mut op).unwrap();
        assert_eq!(op, once);

        let Operation::AccountUpdate(op) = op else {
            panic!("variant changed");
        };
        let owner = op.owner.unwrap();
        assert_eq!(owner.key_auths.len(), 2);
        assert_eq!(owner.key_weight(&public_key(OWNER_SEED)), Some(1));
        assert_eq!(owner.key_weight(&PublicKey([0x02; 33])), Some(1));
    }
}
