//! Process boundary: argument and environment intake, component wiring,
//! and the sequential per-block run loop.
//!
//! Addresses stream to stdout, one per line; every diagnostic goes to the
//! tracing subscriber on stderr, so the two streams never interleave.

use std::io::{self, Write};
use std::sync::Arc;

use tracing::{debug, info};

use crate::blocks::BlockStore;
use crate::compress;
use crate::config::{Config, NetworkTable, ProcessEnv};
use crate::errors::AddrscanError;
use crate::extract;
use crate::fetcher::{BlockFetcher, TokioDelay};
use crate::provider::RpcBlockSource;

/// Main entry point for the application.
///
/// Blocks are processed strictly one at a time in ascending order; the full
/// per-block pipeline (cache lookup, retries, extraction, output) completes
/// before the next block begins. Per-block failures are contained — the
/// error returned here is always a setup failure (arguments, credential, or
/// head resolution).
pub async fn run() -> Result<(), AddrscanError> {
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let env = ProcessEnv::capture();
    let table = NetworkTable::bundled();
    let config = Config::build(&args, &env, &table)?;

    info!(
        chain = %config.chain,
        range = %config.range,
        cache_root = %config.cache_root.display(),
        "starting address extraction"
    );

    let source = Arc::new(RpcBlockSource::connect(config.endpoint.clone()));
    let range = config.range.resolve(source.as_ref()).await?;

    let compressor = compress::detect().await;
    let fetcher = BlockFetcher::new(source, config.chain, Arc::new(TokioDelay));
    let store = BlockStore::new(config.chain, config.cache_root, compressor, fetcher);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    for number in range.iter() {
        // Unavailable blocks are already logged with attempt counts.
        let Some(block) = store.get(number).await else {
            continue;
        };

        debug!(
            block = number,
            transactions = block.tx_count(),
            "extracting participant addresses"
        );
        for address in extract::participant_addresses(&block) {
            writeln!(out, "{address}")?;
        }
    }
    out.flush()?;

    info!(stats = %store.stats().await, blocks = range.count(), "run complete");
    Ok(())
}
