// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Tiered block lookup: memory, sharded disk, remote fetch.

use std::path::PathBuf;
use std::sync::Arc;

use alloy_chains::NamedChain;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::cache::{CacheKey, CacheStats, DiskCache, MemoryCache};
use super::BlockRecord;
use crate::compress::Compressor;
use crate::fetcher::{BlockFetcher, FetchOutcome};
use crate::tracing::spans;

/// Three-tier block store with write-through on successful fetch.
///
/// Lookup order is memory, disk, remote. A remote success is written to the
/// memory tier unconditionally and to disk best-effort; disk failures are
/// logged and never block the next lookup. One store serves one network.
pub struct BlockStore {
    chain: NamedChain,
    memory: MemoryCache,
    disk: DiskCache,
    fetcher: BlockFetcher,
    stats: Mutex<CacheStats>,
}

impl BlockStore {
    /// Creates a store over a cache root and a fetcher.
    ///
    /// The compression capability must already be probed; the store never
    /// branches on its presence beyond what [`DiskCache`] does internally.
    pub fn new(
        chain: NamedChain,
        cache_root: impl Into<PathBuf>,
        compressor: Arc<dyn Compressor>,
        fetcher: BlockFetcher,
    ) -> Self {
        Self {
            chain,
            memory: MemoryCache::new(),
            disk: DiskCache::new(cache_root, chain, compressor),
            fetcher,
            stats: Mutex::new(CacheStats::default()),
        }
    }

    /// Looks a block up through the tiers.
    ///
    /// `None` means the block is unavailable after the fetcher exhausted its
    /// retry ceiling; the failure is already logged and the caller should
    /// continue with the next block number.
    pub async fn get(&self, number: u64) -> Option<Arc<BlockRecord>> {
        let span = spans::store_get(self.chain, number);
        let _guard = span.enter();

        let key = CacheKey::new(self.chain, number);

        if let Some(block) = self.memory.get(&key).await {
            debug!(key = %key, "cache hit (memory)");
            self.stats.lock().await.memory_hits += 1;
            return Some(block);
        }

        if let Some(block) = self.disk.get(&key).await {
            self.stats.lock().await.disk_hits += 1;
            let block = Arc::new(block);
            self.memory.insert(key, Arc::clone(&block)).await;
            return Some(block);
        }

        match self.fetcher.fetch(number).await {
            FetchOutcome::Fetched(block) => {
                self.stats.lock().await.fetched += 1;
                let block = Arc::new(block);
                self.memory.insert(key, Arc::clone(&block)).await;

                if let Err(e) = self.disk.insert(&key, &block).await {
                    warn!(
                        key = %key,
                        error = %e,
                        "best-effort disk write failed, continuing"
                    );
                }

                Some(block)
            }
            FetchOutcome::Unavailable => {
                self.stats.lock().await.unavailable += 1;
                None
            }
        }
    }

    /// Per-run lookup counters.
    pub async fn stats(&self) -> CacheStats {
        self.stats.lock().await.clone()
    }
}
