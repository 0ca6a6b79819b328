//! Sharded disk cache tier with dual-representation entries.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use alloy_chains::NamedChain;
use tracing::{debug, warn};

use super::CacheKey;
use crate::blocks::BlockRecord;
use crate::codec;
use crate::compress::Compressor;
use crate::config::constants::SHARD_SPAN;
use crate::errors::CacheError;

/// Persistent block cache, sharded by block number.
///
/// Layout: `<root>/<chain>/<shard>/block-<N>.json` or `block-<N>.json.zst`,
/// with `shard = N / 1_000_000` bounding per-directory entry count. A given
/// key may exist in either representation, never guaranteed which — earlier
/// runs may have lacked the compression capability — so reads probe the
/// compressed file first (when the capability is active) and fall back to
/// the uncompressed one. Shard directories are created lazily on first
/// write, and entries are never rewritten or deleted.
pub struct DiskCache {
    root: PathBuf,
    chain: NamedChain,
    compressor: Arc<dyn Compressor>,
}

impl DiskCache {
    /// Creates a disk cache rooted at `root` for one network.
    ///
    /// No I/O happens here; directories appear on first write.
    pub fn new(root: impl Into<PathBuf>, chain: NamedChain, compressor: Arc<dyn Compressor>) -> Self {
        Self {
            root: root.into(),
            chain,
            compressor,
        }
    }

    fn shard_dir(&self, number: u64) -> PathBuf {
        self.root
            .join(self.chain.to_string())
            .join((number / SHARD_SPAN).to_string())
    }

    fn plain_path(&self, number: u64) -> PathBuf {
        self.shard_dir(number).join(format!("block-{number}.json"))
    }

    fn compressed_path(&self, number: u64) -> PathBuf {
        self.shard_dir(number)
            .join(format!("block-{number}.json.zst"))
    }

    /// Probes both representations for the key.
    ///
    /// Any read, decompression, or decode failure is logged and treated as
    /// a miss; the caller falls through to the remote tier.
    pub async fn get(&self, key: &CacheKey) -> Option<BlockRecord> {
        if self.compressor.active() {
            if let Some(block) = self.read_compressed(key).await {
                return Some(block);
            }
        }
        self.read_plain(key).await
    }

    async fn read_compressed(&self, key: &CacheKey) -> Option<BlockRecord> {
        let path = self.compressed_path(key.number);
        let bytes = read_optional(&path).await?;

        let decompressed = match self.compressor.decompress(&bytes).await {
            Ok(decompressed) => decompressed,
            Err(e) => {
                warn!(
                    key = %key,
                    path = %path.display(),
                    error = %e,
                    "failed to decompress cache entry, treating as miss"
                );
                return None;
            }
        };

        self.decode_entry(key, &path, &decompressed)
    }

    async fn read_plain(&self, key: &CacheKey) -> Option<BlockRecord> {
        let path = self.plain_path(key.number);
        let bytes = read_optional(&path).await?;
        self.decode_entry(key, &path, &bytes)
    }

    fn decode_entry(&self, key: &CacheKey, path: &Path, bytes: &[u8]) -> Option<BlockRecord> {
        match codec::decode(bytes) {
            Ok(block) => {
                debug!(key = %key, path = %path.display(), "cache hit (disk)");
                Some(block)
            }
            Err(e) => {
                warn!(
                    key = %key,
                    path = %path.display(),
                    error = %e,
                    "cache entry failed to decode, ignoring"
                );
                None
            }
        }
    }

    /// Persists a block in the representation the active capability selects.
    ///
    /// Best-effort from the store's perspective: the caller logs the error
    /// and keeps going. The entry is written to a temp file and renamed so
    /// a concurrent run never observes a partial entry.
    pub async fn insert(&self, key: &CacheKey, block: &BlockRecord) -> Result<(), CacheError> {
        let encoded = codec::encode(block)?;

        let shard = self.shard_dir(key.number);
        tokio::fs::create_dir_all(&shard)
            .await
            .map_err(|e| CacheError::io(shard.display().to_string(), e))?;

        let (path, payload) = if self.compressor.active() {
            (
                self.compressed_path(key.number),
                self.compressor.compress(&encoded).await?,
            )
        } else {
            (self.plain_path(key.number), encoded)
        };

        let temp_path = path.with_extension("tmp");
        tokio::fs::write(&temp_path, &payload)
            .await
            .map_err(|e| CacheError::io(temp_path.display().to_string(), e))?;
        tokio::fs::rename(&temp_path, &path)
            .await
            .map_err(|e| CacheError::io(path.display().to_string(), e))?;

        debug!(key = %key, path = %path.display(), bytes = payload.len(), "persisted cache entry");
        Ok(())
    }
}

/// Reads a file, mapping absence to `None` and logging any other failure.
async fn read_optional(path: &Path) -> Option<Vec<u8>> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Some(bytes),
        Err(e) if e.kind() == ErrorKind::NotFound => None,
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "cache read failed, treating as miss"
            );
            None
        }
    }
}
