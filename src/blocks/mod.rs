// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Block records and the tiered block cache.
//!
//! This module provides:
//! - [`BlockRecord`] / [`TxRecord`]: the retained representation of one block
//! - [`cache`]: memory and sharded-disk cache tiers
//! - [`store`]: the tiered lookup orchestrator (memory, disk, remote)

use alloy_primitives::{Address, B256};
use serde::{Deserialize, Serialize};

use crate::codec::{quantity, BigInt};

pub mod cache;
pub mod store;

// Re-export public API
pub use cache::{CacheKey, CacheStats, DiskCache, MemoryCache};
pub use store::BlockStore;

/// One transaction of a retained block.
///
/// Only the fields the extraction pipeline needs are kept; the provider's
/// remaining transaction fields are dropped at parse time. `to` is absent
/// for contract-creation transactions. `value`, `gas_price`, and `nonce`
/// may exceed 64-bit range and are held as [`BigInt`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxRecord {
    /// Transaction hash
    pub hash: B256,
    /// Sender address
    pub from: Address,
    /// Recipient address; `None` for contract creation
    #[serde(default)]
    pub to: Option<Address>,
    /// Transferred value in wei
    pub value: BigInt,
    /// Legacy gas price; absent on some fee-market transactions
    #[serde(default)]
    pub gas_price: Option<BigInt>,
    /// Sender account nonce
    pub nonce: BigInt,
}

/// The retained representation of one block.
///
/// Parsed from the provider's `eth_getBlockByNumber` response (with full
/// transaction objects) and from cached payloads; the serde surface accepts
/// both encodings. See [`crate::codec`] for the persisted form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockRecord {
    /// Block height
    #[serde(with = "quantity")]
    pub number: u64,
    /// Block hash
    pub hash: B256,
    /// Block timestamp in seconds
    #[serde(with = "quantity")]
    pub timestamp: u64,
    /// Transactions in block order
    pub transactions: Vec<TxRecord>,
}

impl BlockRecord {
    /// Number of transactions in this block.
    pub fn tx_count(&self) -> usize {
        self.transactions.len()
    }
}
