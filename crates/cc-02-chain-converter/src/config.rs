//! Configuration types for chain conversion

use std::path::{Path, PathBuf};

use serde::Deserialize;
use shared_crypto::Secp256k1KeyPair;
use shared_types::{AuthorityClass, ChainId};
use tracing::{info, warn};

use crate::domain::AuthorityKeyRegistry;
use crate::error::{ConversionError, Result};

/// Raw converter settings as supplied by the command line or environment.
///
/// Keys and the chain id are hex strings; nothing is validated until
/// [`ConverterConfig::resolve`].
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Chain id the output is signed for (64 hex chars)
    pub chain_id: String,

    /// Witness private key (64 hex chars)
    pub witness_key: String,

    /// Second authority owner key; falls back to another provided key
    pub owner_key: Option<String>,

    /// Second authority active key
    pub active_key: Option<String>,

    /// Second authority posting key
    pub posting_key: Option<String>,

    /// Input block log
    pub input: PathBuf,

    /// Output block log (default: `<input>_out`)
    pub output: Option<PathBuf>,

    /// Dump every n-th block as JSON before and after conversion (0 = off)
    pub log_per_block: u32,

    /// Dump only this block as JSON (0 = off)
    pub log_specific: u32,

    /// Log progress every n blocks (0 = off)
    pub progress_interval: u32,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            chain_id: crate::DEFAULT_CHAIN_ID.to_string(),
            witness_key: String::new(),
            owner_key: None,
            active_key: None,
            posting_key: None,
            input: PathBuf::new(),
            output: None,
            log_per_block: 0,
            log_specific: 0,
            progress_interval: crate::DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

/// When to dump blocks as JSON.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub log_per_block: u32,
    pub log_specific: u32,
    pub progress_interval: u32,
}

impl RunOptions {
    /// True if block `block_num` should be dumped.
    pub fn should_dump(&self, block_num: u32) -> bool {
        (self.log_per_block > 0 && block_num % self.log_per_block == 0)
            || (self.log_specific != 0 && self.log_specific == block_num)
    }

    /// True if progress should be reported after block `block_num`.
    pub fn should_report_progress(&self, block_num: u32) -> bool {
        self.progress_interval > 0 && block_num % self.progress_interval == 0
    }
}

/// Validated configuration, ready to build a converter from.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub chain_id: ChainId,
    pub witness_key: Secp256k1KeyPair,
    pub registry: AuthorityKeyRegistry,
    /// Classes whose key was generated rather than provided.
    pub generated: Vec<AuthorityClass>,
    pub input: PathBuf,
    pub output: PathBuf,
    pub options: RunOptions,
}

impl ConverterConfig {
    /// Output path, defaulting to the input path with `_out` appended.
    pub fn output_path(&self) -> PathBuf {
        match &self.output {
            Some(output) => output.clone(),
            None => {
                let mut name = self.input.clone().into_os_string();
                name.push("_out");
                PathBuf::from(name)
            }
        }
    }

    fn key_for(&self, class: AuthorityClass) -> Option<&str> {
        match class {
            AuthorityClass::Owner => self.owner_key.as_deref(),
            AuthorityClass::Active => self.active_key.as_deref(),
            AuthorityClass::Posting => self.posting_key.as_deref(),
        }
        .filter(|key| !key.trim().is_empty())
    }

    /// Parse and validate every setting.
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        let chain_id = ChainId::from_hex(&self.chain_id)
            .map_err(|e| ConversionError::invalid_config("chain_id", e))?;

        if self.witness_key.trim().is_empty() {
            return Err(ConversionError::invalid_config(
                "witness_key",
                "a witness private key is required",
            ));
        }
        let witness_key = Secp256k1KeyPair::from_hex(&self.witness_key)
            .map_err(|e| ConversionError::invalid_config("witness_key", e))?;

        if self.input.as_os_str().is_empty() {
            return Err(ConversionError::invalid_config(
                "input",
                "an input block log is required",
            ));
        }
        let output = self.output_path();
        if same_file(&self.input, &output) {
            return Err(ConversionError::invalid_config(
                "output",
                "output must differ from input",
            ));
        }

        let (registry, generated) = self.resolve_authority_keys()?;

        Ok(ResolvedConfig {
            chain_id,
            witness_key,
            registry,
            generated,
            input: self.input.clone(),
            output,
            options: RunOptions {
                log_per_block: self.log_per_block,
                log_specific: self.log_specific,
                progress_interval: self.progress_interval,
            },
        })
    }

    /// Fill the second authority registry.
    ///
    /// A class without a key takes the first provided key in owner, active,
    /// posting order. If no key is provided at all, every class gets a fresh
    /// random key.
    fn resolve_authority_keys(&self) -> Result<(AuthorityKeyRegistry, Vec<AuthorityClass>)> {
        let mut provided = Vec::new();
        for class in AuthorityClass::ALL {
            if let Some(encoded) = self.key_for(class) {
                let key = Secp256k1KeyPair::from_hex(encoded)
                    .map_err(|e| ConversionError::invalid_config(field_name(class), e))?;
                provided.push((class, key));
            }
        }

        let mut registry = AuthorityKeyRegistry::new();
        let mut generated = Vec::new();
        let fallback = provided.first().map(|(class, key)| (*class, key.clone()));

        for class in AuthorityClass::ALL {
            let key = match provided.iter().find(|(c, _)| *c == class) {
                Some((_, key)) => key.clone(),
                None => match &fallback {
                    Some((source, key)) => {
                        info!("[cc-02] Using the {} key as the {} key", source, class);
                        key.clone()
                    }
                    None => {
                        warn!("[cc-02] No {} key provided, generating one", class);
                        generated.push(class);
                        Secp256k1KeyPair::generate()
                    }
                },
            };
            registry.set(class, key);
        }

        Ok((registry, generated))
    }
}

fn field_name(class: AuthorityClass) -> &'static str {
    match class {
        AuthorityClass::Owner => "owner_key",
        AuthorityClass::Active => "active_key",
        AuthorityClass::Posting => "posting_key",
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
