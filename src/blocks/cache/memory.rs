// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! In-memory block cache tier.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use super::CacheKey;
use crate::blocks::BlockRecord;

/// Append-only in-memory block cache.
///
/// Entries live for the process lifetime; there is no eviction, expiry, or
/// invalidation. A key is written at most once per run — the store only
/// inserts after a memory miss — so a hit never observes a different block
/// than an earlier hit did.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<CacheKey, Arc<BlockRecord>>>,
}

impl MemoryCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact-key lookup; no I/O.
    pub async fn get(&self, key: &CacheKey) -> Option<Arc<BlockRecord>> {
        self.entries.lock().await.get(key).cloned()
    }

    /// Inserts a block. First write for a key wins.
    pub async fn insert(&self, key: CacheKey, block: Arc<BlockRecord>) {
        let mut entries = self.entries.lock().await;
        if entries.contains_key(&key) {
            debug!(key = %key, "memory entry already present, keeping first write");
            return;
        }
        entries.insert(key, block);
    }

    /// Number of resident entries.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// Whether the cache holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}
