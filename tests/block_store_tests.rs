// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Tier-precedence and containment tests for the block store.

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use alloy_chains::NamedChain;
use tempfile::TempDir;

use addrscan::{BlockFetcher, BlockStore, Passthrough};
use helpers::{addr, rpc_block, MockBlockSource, RecordingDelay};

fn store_over(
    source: Arc<MockBlockSource>,
    cache_root: &std::path::Path,
    delay: Arc<RecordingDelay>,
) -> BlockStore {
    let fetcher = BlockFetcher::new(source, NamedChain::Mainnet, delay);
    BlockStore::new(
        NamedChain::Mainnet,
        cache_root,
        Arc::new(Passthrough),
        fetcher,
    )
}

#[tokio::test]
async fn memory_tier_answers_repeat_lookups() {
    let dir = TempDir::new().unwrap();
    let source = Arc::new(
        MockBlockSource::new(1_000).with_block(100, rpc_block(100, &[(addr(1), Some(addr(2)))])),
    );
    let store = store_over(Arc::clone(&source), dir.path(), Arc::new(RecordingDelay::new()));

    let first = store.get(100).await.unwrap();
    let second = store.get(100).await.unwrap();
    assert_eq!(first.number, second.number);

    // One provider call total: the second lookup never left memory.
    assert_eq!(source.attempts(100), 1);

    let stats = store.stats().await;
    assert_eq!(stats.fetched, 1);
    assert_eq!(stats.memory_hits, 1);
}

#[tokio::test]
async fn disk_entry_prevents_remote_call() {
    let dir = TempDir::new().unwrap();

    // First run fetches and writes through to disk.
    {
        let source = Arc::new(
            MockBlockSource::new(1_000)
                .with_block(100, rpc_block(100, &[(addr(1), Some(addr(2)))])),
        );
        let store = store_over(source, dir.path(), Arc::new(RecordingDelay::new()));
        assert!(store.get(100).await.is_some());
    }

    // Second run: the provider would fail, but the disk tier answers first.
    let source = Arc::new(MockBlockSource::new(1_000).with_failing(100));
    let store = store_over(Arc::clone(&source), dir.path(), Arc::new(RecordingDelay::new()));

    let block = store.get(100).await.unwrap();
    assert_eq!(block.number, 100);
    assert_eq!(source.attempts(100), 0);

    let stats = store.stats().await;
    assert_eq!(stats.disk_hits, 1);
    assert_eq!(stats.fetched, 0);
}

#[tokio::test]
async fn permanently_failing_block_makes_exactly_three_attempts() {
    let dir = TempDir::new().unwrap();
    let source = Arc::new(MockBlockSource::new(1_000).with_failing(100));
    let delay = Arc::new(RecordingDelay::new());
    let store = store_over(Arc::clone(&source), dir.path(), Arc::clone(&delay));

    assert!(store.get(100).await.is_none());
    assert_eq!(source.attempts(100), 3);

    // Two backoffs between three attempts, doubling from the 1s transport base.
    assert_eq!(
        delay.recorded(),
        vec![Duration::from_secs(1), Duration::from_secs(2)]
    );

    let stats = store.stats().await;
    assert_eq!(stats.unavailable, 1);
}

#[tokio::test]
async fn null_response_exhausts_retries_with_empty_result_backoff() {
    let dir = TempDir::new().unwrap();
    // Head says 1000 but block 100 answers null on every attempt.
    let source = Arc::new(MockBlockSource::new(1_000));
    let delay = Arc::new(RecordingDelay::new());
    let store = store_over(Arc::clone(&source), dir.path(), Arc::clone(&delay));

    assert!(store.get(100).await.is_none());
    assert_eq!(source.attempts(100), 3);
    assert_eq!(
        delay.recorded(),
        vec![Duration::from_secs(1), Duration::from_secs(2)]
    );
}

#[tokio::test]
async fn unavailable_block_does_not_poison_later_lookups() {
    let dir = TempDir::new().unwrap();
    let source = Arc::new(
        MockBlockSource::new(1_000)
            .with_failing(100)
            .with_block(101, rpc_block(101, &[(addr(5), None)])),
    );
    let store = store_over(Arc::clone(&source), dir.path(), Arc::new(RecordingDelay::new()));

    assert!(store.get(100).await.is_none());
    let block = store.get(101).await.unwrap();
    assert_eq!(block.number, 101);
}

#[tokio::test]
async fn disk_write_failure_is_contained() {
    // Use a regular file as the cache root so shard creation fails.
    let dir = TempDir::new().unwrap();
    let bogus_root = dir.path().join("not-a-directory");
    std::fs::write(&bogus_root, b"occupied").unwrap();

    let source = Arc::new(
        MockBlockSource::new(1_000).with_block(100, rpc_block(100, &[(addr(1), Some(addr(2)))])),
    );
    let store = store_over(Arc::clone(&source), &bogus_root, Arc::new(RecordingDelay::new()));

    // The block still flows to the caller and lands in memory.
    assert!(store.get(100).await.is_some());
    assert!(store.get(100).await.is_some());
    assert_eq!(source.attempts(100), 1);
}
