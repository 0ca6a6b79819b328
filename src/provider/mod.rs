// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! The JSON-RPC provider seam.
//!
//! The rest of the crate needs exactly two provider operations: fetch one
//! block with full transaction objects, and read the current head height.
//! [`BlockSource`] captures that surface so the fetcher and range resolver
//! can be tested against mocks without a network.

use async_trait::async_trait;
use alloy_primitives::U64;
use alloy_rpc_client::{ClientBuilder, RpcClient};
use alloy_transport::TransportError;
use tracing::debug;
use url::Url;

/// The two provider operations addrscan depends on.
///
/// `block_by_number` returns the raw JSON response rather than a typed
/// block: response-shape validation belongs to the fetcher's failure
/// classification, not to the transport.
#[async_trait]
pub trait BlockSource: Send + Sync {
    /// `eth_getBlockByNumber` with full transaction objects.
    async fn block_by_number(&self, number: u64) -> Result<serde_json::Value, TransportError>;

    /// `eth_blockNumber`: the provider's current head height.
    async fn head_number(&self) -> Result<u64, TransportError>;
}

/// [`BlockSource`] over an HTTP JSON-RPC endpoint.
#[derive(Debug, Clone)]
pub struct RpcBlockSource {
    client: RpcClient,
}

impl RpcBlockSource {
    /// Connects to the given endpoint.
    pub fn connect(endpoint: Url) -> Self {
        let client = ClientBuilder::default().http(endpoint);
        Self { client }
    }
}

#[async_trait]
impl BlockSource for RpcBlockSource {
    async fn block_by_number(&self, number: u64) -> Result<serde_json::Value, TransportError> {
        let tag = format!("0x{number:x}");
        debug!(block = number, "requesting block with full transactions");
        self.client
            .request("eth_getBlockByNumber", (tag, true))
            .await
    }

    async fn head_number(&self) -> Result<u64, TransportError> {
        let head: U64 = self.client.request_noparams("eth_blockNumber").await?;
        Ok(head.to::<u64>())
    }
}
