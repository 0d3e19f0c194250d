//! # Second Authority Keys
//!
//! One replacement private key per authority class. The registry is filled
//! once from configuration and then only read.

use shared_crypto::Secp256k1KeyPair;
use shared_types::{AuthorityClass, PublicKey};

use crate::error::{ConversionError, Result};

#[derive(Debug, Clone, Default)]
pub struct AuthorityKeyRegistry {
    owner: Option<Secp256k1KeyPair>,
    active: Option<Secp256k1KeyPair>,
    posting: Option<Secp256k1KeyPair>,
}

impl AuthorityKeyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry using one key for every class.
    pub fn with_single_key(key: Secp256k1KeyPair) -> Self {
        Self {
            owner: Some(key.clone()),
            active: Some(key.clone()),
            posting: Some(key),
        }
    }

    fn slot(&self, class: AuthorityClass) -> &Option<Secp256k1KeyPair> {
        match class {
            AuthorityClass::Owner => &self.owner,
            AuthorityClass::Active => &self.active,
            AuthorityClass::Posting => &self.posting,
        }
    }

    /// Private key for `class`.
    pub fn get(&self, class: AuthorityClass) -> Result<&Secp256k1KeyPair> {
        self.slot(class)
            .as_ref()
            .ok_or(ConversionError::MissingKey(class))
    }

    pub fn set(&mut self, class: AuthorityClass, key: Secp256k1KeyPair) {
        let slot = match class {
            AuthorityClass::Owner => &mut self.owner,
            AuthorityClass::Active => &mut self.active,
            AuthorityClass::Posting => &mut self.posting,
        };
        *slot = Some(key);
    }

    /// Public key for `class`, in the form embedded into authorities.
    pub fn public_key(&self, class: AuthorityClass) -> Result<PublicKey> {
        Ok(self.get(class)?.public_key().into())
    }

    /// True once every class has a key.
    pub fn is_complete(&self) -> bool {
        AuthorityClass::ALL
            .iter()
            .all(|class| self.slot(*class).is_some())
    }
}
