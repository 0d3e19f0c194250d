//! cc-convert: block log converter
//!
//! Re-signs every block of an input block log for a new chain id and
//! witness key, adds a second authority to every account, and appends the
//! result to an output block log. Interrupting with Ctrl+C stops after the
//! current block; running again resumes from the output head.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cc_02_chain_converter::{
    ChainConverter, ConverterConfig, LogSink, LogSource, ResolvedConfig, RunSummary,
    DEFAULT_CHAIN_ID, DEFAULT_PROGRESS_INTERVAL,
};
use shared_types::AuthorityClass;

/// Converts a block log and adds a second authority to all accounts.
#[derive(Parser, Debug)]
#[command(name = "cc-convert", version)]
#[command(about = "Re-signs a block log under a new chain id and witness key")]
struct Args {
    /// New chain id (hex)
    #[arg(short, long, env = "CC_CHAIN_ID", default_value = DEFAULT_CHAIN_ID)]
    chain_id: String,

    /// Witness private key (hex) used to sign every block header
    #[arg(short = 'k', long, env = "CC_PRIVATE_KEY", hide_env_values = true)]
    private_key: String,

    /// Input block log
    #[arg(short, long, env = "CC_INPUT")]
    input: PathBuf,

    /// Output block log [default: <input>_out]
    #[arg(short, long, env = "CC_OUTPUT")]
    output: Option<PathBuf>,

    /// Dump every n-th block as JSON before and after conversion
    #[arg(short = 'l', long, default_value_t = 0, num_args = 0..=1, default_missing_value = "1")]
    log_per_block: u32,

    /// Dump only the block with this number
    #[arg(short = 's', long, default_value_t = 0)]
    log_specific: u32,

    /// Blocks between progress lines (0 disables)
    #[arg(long, env = "CC_PROGRESS_INTERVAL", default_value_t = DEFAULT_PROGRESS_INTERVAL)]
    progress_interval: u32,

    /// Owner key of the second authority (hex)
    #[arg(long, env = "CC_OWNER_KEY", hide_env_values = true)]
    owner_key: Option<String>,

    /// Active key of the second authority (hex)
    #[arg(long, env = "CC_ACTIVE_KEY", hide_env_values = true)]
    active_key: Option<String>,

    /// Posting key of the second authority (hex)
    #[arg(long, env = "CC_POSTING_KEY", hide_env_values = true)]
    posting_key: Option<String>,
}

impl From<Args> for ConverterConfig {
    fn from(args: Args) -> Self {
        Self {
            chain_id: args.chain_id,
            witness_key: args.private_key,
            owner_key: args.owner_key,
            active_key: args.active_key,
            posting_key: args.posting_key,
            input: args.input,
            output: args.output,
            log_per_block: args.log_per_block,
            log_specific: args.log_specific,
            progress_interval: args.progress_interval,
        }
    }
}

fn convert(resolved: &ResolvedConfig, stop: &AtomicBool) -> Result<RunSummary> {
    let source = LogSource::open(&resolved.input)
        .with_context(|| format!("opening input {}", resolved.input.display()))?;
    let mut sink = LogSink::open(&resolved.output)
        .with_context(|| format!("opening output {}", resolved.output.display()))?;

    let mut converter = ChainConverter::from_config(resolved);
    let summary = converter
        .run(&source, &mut sink, &resolved.options, stop)
        .context("block log conversion failed")?;
    Ok(summary)
}

fn print_keys(resolved: &ResolvedConfig) -> Result<()> {
    println!("Second authority private keys:");
    for class in AuthorityClass::ALL {
        let key = resolved.registry.get(class)?;
        let note = if resolved.generated.contains(&class) {
            " (generated)"
        } else {
            ""
        };
        println!("  {:<8} {}{}", format!("{}:", class), key.to_hex(), note);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = ConverterConfig::from(Args::parse());
    let resolved = config.resolve().context("invalid configuration")?;
    info!(
        "[cc-02] Converting {} -> {} for chain {}",
        resolved.input.display(),
        resolved.output.display(),
        resolved.chain_id
    );

    let stop = Arc::new(AtomicBool::new(false));
    let signal_flag = Arc::clone(&stop);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("[cc-02] User interrupt detected, finishing the current block");
            signal_flag.store(true, Ordering::SeqCst);
        }
    });

    let worker_stop = Arc::clone(&stop);
    let worker_config = resolved.clone();
    let summary = tokio::task::spawn_blocking(move || convert(&worker_config, &worker_stop))
        .await
        .context("conversion task panicked")??;

    println!(
        "Converted blocks {}..={} ({} this run), head {}",
        summary.first_block, summary.last_block, summary.blocks_converted, summary.head_id
    );
    if summary.interrupted {
        println!("Interrupted: rerun to resume at block {}", summary.last_block + 1);
    }
    print_keys(&resolved)?;
    println!("block log conversion completed");

    Ok(())
}
