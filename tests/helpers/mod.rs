// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Test helpers for addrscan integration tests
//!
//! Provides mock implementations of traits to enable testing without
//! real blockchain connections, real timers, or a real compressor binary.

// Each integration test binary compiles this module; not every binary uses
// every helper.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use alloy_primitives::Address;
use alloy_transport::{TransportError, TransportErrorKind};
use async_trait::async_trait;
use serde_json::{json, Value};

use addrscan::{BlockSource, CacheError, Compressor, Delay};

/// Scripted [`BlockSource`] with per-block attempt counters.
///
/// Unknown block numbers answer `null`, matching provider behavior for
/// heights beyond the head.
pub struct MockBlockSource {
    head: u64,
    blocks: HashMap<u64, Value>,
    always_fail: HashSet<u64>,
    attempts: Mutex<HashMap<u64, u32>>,
    head_queries: AtomicU32,
}

impl MockBlockSource {
    pub fn new(head: u64) -> Self {
        Self {
            head,
            blocks: HashMap::new(),
            always_fail: HashSet::new(),
            attempts: Mutex::new(HashMap::new()),
            head_queries: AtomicU32::new(0),
        }
    }

    /// Serves the given response for a block number.
    pub fn with_block(mut self, number: u64, block: Value) -> Self {
        self.blocks.insert(number, block);
        self
    }

    /// Makes every attempt for a block number fail at the transport level.
    pub fn with_failing(mut self, number: u64) -> Self {
        self.always_fail.insert(number);
        self
    }

    /// Provider attempts observed for a block number.
    pub fn attempts(&self, number: u64) -> u32 {
        self.attempts
            .lock()
            .unwrap()
            .get(&number)
            .copied()
            .unwrap_or(0)
    }

    /// Head queries observed.
    pub fn head_queries(&self) -> u32 {
        self.head_queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BlockSource for MockBlockSource {
    async fn block_by_number(&self, number: u64) -> Result<Value, TransportError> {
        *self.attempts.lock().unwrap().entry(number).or_insert(0) += 1;

        if self.always_fail.contains(&number) {
            return Err(TransportErrorKind::custom_str("connection refused"));
        }
        Ok(self.blocks.get(&number).cloned().unwrap_or(Value::Null))
    }

    async fn head_number(&self) -> Result<u64, TransportError> {
        self.head_queries.fetch_add(1, Ordering::SeqCst);
        Ok(self.head)
    }
}

/// [`Delay`] that records requested durations instead of sleeping.
#[derive(Default)]
pub struct RecordingDelay {
    slept: Mutex<Vec<Duration>>,
}

impl RecordingDelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recorded(&self) -> Vec<Duration> {
        self.slept.lock().unwrap().clone()
    }
}

#[async_trait]
impl Delay for RecordingDelay {
    async fn sleep(&self, duration: Duration) {
        self.slept.lock().unwrap().push(duration);
    }
}

/// Reversible fake compressor: prefixes a magic marker.
///
/// Stands in for the external binary so dual-representation cache behavior
/// is testable everywhere.
pub struct FakeCompressor;

const MAGIC: &[u8] = b"FAKEZ";

#[async_trait]
impl Compressor for FakeCompressor {
    fn active(&self) -> bool {
        true
    }

    async fn compress(&self, bytes: &[u8]) -> Result<Vec<u8>, CacheError> {
        let mut out = Vec::with_capacity(MAGIC.len() + bytes.len());
        out.extend_from_slice(MAGIC);
        out.extend_from_slice(bytes);
        Ok(out)
    }

    async fn decompress(&self, bytes: &[u8]) -> Result<Vec<u8>, CacheError> {
        bytes
            .strip_prefix(MAGIC)
            .map(<[u8]>::to_vec)
            .ok_or_else(|| CacheError::compress("fake", "missing magic prefix"))
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

/// Deterministic test address.
pub fn addr(byte: u8) -> Address {
    Address::repeat_byte(byte)
}

/// Builds a provider-shaped block response with hex quantities and full
/// transaction objects.
pub fn rpc_block(number: u64, txs: &[(Address, Option<Address>)]) -> Value {
    let transactions: Vec<Value> = txs
        .iter()
        .enumerate()
        .map(|(i, (from, to))| {
            json!({
                "hash": format!("0x{:064x}", i + 1),
                "from": from,
                "to": to,
                "value": "0xde0b6b3a7640000",
                "gasPrice": "0x3b9aca00",
                "nonce": format!("0x{i:x}"),
                "input": "0x",
                "blockNumber": format!("0x{number:x}"),
            })
        })
        .collect();

    json!({
        "number": format!("0x{number:x}"),
        "hash": format!("0x{number:064x}"),
        "parentHash": format!("0x{:064x}", number.saturating_sub(1)),
        "timestamp": "0x65f0d100",
        "transactions": transactions,
    })
}
