//! # Transaction Merkle Root
//!
//! Binary hash tree over transaction ids where each parent is
//! `sha256(left || right)`.
//!
//! - Leaves are padded to the next power of two (minimum two) with the
//!   all-zero sentinel.
//! - An empty block has the all-zero root.

use shared_crypto::sha256_many;

use crate::entities::{Digest, TransactionId};

/// Padding value for empty leaf slots.
pub const SENTINEL_HASH: [u8; 32] = [0u8; 32];

/// Compute the merkle root of `ids` in order.
pub fn merkle_root(ids: &[TransactionId]) -> Digest {
    if ids.is_empty() {
        return Digest(SENTINEL_HASH);
    }

    let padded = ids.len().next_power_of_two().max(2);
    let mut level: Vec<[u8; 32]> = ids.iter().map(|id| id.0).collect();
    level.resize(padded, SENTINEL_HASH);

    while level.len() > 1 {
        level = level
            .chunks_exact(2)
            .map(|pair| hash_pair(&pair[0], &pair[1]))
            .collect();
    }

    Digest(level[0])
}

fn hash_pair(left: &[u8; 32], right: &[u8; 32]) -> [u8; 32] {
    sha256_many(&[left.as_slice(), right.as_slice()])
}
