//! # Authorities
//!
//! A weighted threshold set of keys and accounts, classified as owner,
//! active or posting.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entities::{AccountName, PublicKey};

/// Privilege tier of an authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorityClass {
    /// Account ownership (recovery, key rotation).
    Owner,
    /// Financial operations.
    Active,
    /// Social operations.
    Posting,
}

impl AuthorityClass {
    /// All classifications, in owner -> active -> posting order.
    pub const ALL: [AuthorityClass; 3] = [Self::Owner, Self::Active, Self::Posting];

    /// Lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Active => "active",
            Self::Posting => "posting",
        }
    }
}

impl std::fmt::Display for AuthorityClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Weighted threshold authority.
///
/// Entries are kept in ordered maps, so an entry is unique per key or
/// account and the canonical encoding does not depend on insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authority {
    /// Sum of entry weights needed to satisfy the authority.
    pub weight_threshold: u32,
    /// Account entries (delegated authority).
    pub account_auths: BTreeMap<AccountName, u16>,
    /// Key entries.
    pub key_auths: BTreeMap<PublicKey, u16>,
}

impl Authority {
    /// Empty authority with the given threshold.
    pub fn new(weight_threshold: u32) -> Self {
        Self {
            weight_threshold,
            ..Default::default()
        }
    }

    /// Single-key authority.
    pub fn from_key(weight_threshold: u32, key: PublicKey, weight: u16) -> Self {
        let mut authority = Self::new(weight_threshold);
        authority.add_key(key, weight);
        authority
    }

    /// Add a key entry. Re-adding a key that is already present sets its
    /// weight instead of creating a second entry; other entries are untouched.
    pub fn add_key(&mut self, key: PublicKey, weight: u16) {
        self.key_auths.insert(key, weight);
    }

    /// Add an account entry with the same overwrite rule as [`Self::add_key`].
    pub fn add_account(&mut self, account: impl Into<AccountName>, weight: u16) {
        self.account_auths.insert(account.into(), weight);
    }

    /// Weight of `key`, if present.
    pub fn key_weight(&self, key: &PublicKey) -> Option<u16> {
        self.key_auths.get(key).copied()
    }

    /// Total number of entries.
    pub fn num_auths(&self) -> usize {
        self.account_auths.len() + self.key_auths.len()
    }

    /// True when the entries can never reach the threshold.
    pub fn is_impossible(&self) -> bool {
        let total: u64 = self
            .account_auths
            .values()
            .chain(self.key_auths.values())
            .map(|w| u64::from(*w))
            .sum();
        total < u64::from(self.weight_threshold)
    }
}
