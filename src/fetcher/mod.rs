// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Retrying remote block fetcher.
//!
//! Each fetch walks the state machine
//! `Requesting -> {Success | EmptyResult | TransportError} -> RetryDecision
//! -> Requesting | GiveUp`, bounded by [`MAX_FETCH_ATTEMPTS`]. The moving
//! parts are pure functions — [`classify`] maps raw transport errors onto
//! the failure taxonomy, [`backoff_delay`] and [`retry_decision`] map
//! (attempt, class) onto the next move — so retry behavior is unit-testable
//! without a network or real timers. Sleeping goes through the injected
//! [`Delay`] trait for the same reason.
//!
//! An exhausted fetch yields [`FetchOutcome::Unavailable`] rather than an
//! error; the caller skips that block and continues.

use std::sync::Arc;
use std::time::Duration;

use alloy_chains::NamedChain;
use alloy_json_rpc::{ErrorPayload, RpcError};
use alloy_transport::{TransportError, TransportErrorKind};
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::blocks::BlockRecord;
use crate::config::constants::{
    EMPTY_RESULT_BASE_DELAY, EMPTY_RESULT_MAX_DELAY, MAX_FETCH_ATTEMPTS, RATE_LIMIT_BASE_DELAY,
    RATE_LIMIT_MAX_DELAY, TRANSPORT_BASE_DELAY, TRANSPORT_MAX_DELAY,
};
use crate::provider::BlockSource;
use crate::tracing::spans;

/// How one fetch attempt failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// The response was null or not block-shaped.
    EmptyResult,
    /// The provider signaled rate limiting.
    RateLimited,
    /// Any other transport-level failure.
    Transport,
}

impl std::fmt::Display for FailureClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FailureClass::EmptyResult => "empty-result",
            FailureClass::RateLimited => "rate-limited",
            FailureClass::Transport => "transport",
        };
        f.write_str(name)
    }
}

/// The next move after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Back off for the given duration, then request again.
    Retry(Duration),
    /// The retry ceiling is exhausted.
    GiveUp,
}

/// Result of a bounded fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// A well-formed block was retrieved.
    Fetched(BlockRecord),
    /// All attempts failed; the block is skipped, not fatal.
    Unavailable,
}

/// Classifies a raw provider error into the failure taxonomy.
///
/// Rate-limit signals are distinguished from other transport failures so
/// they can be backed off harder: HTTP 429, the common provider error codes
/// `-32005`/`-32029`, and rate-limit message text all count.
pub fn classify(error: &TransportError) -> FailureClass {
    match error {
        RpcError::NullResp => FailureClass::EmptyResult,
        RpcError::DeserError { .. } => FailureClass::EmptyResult,
        RpcError::ErrorResp(payload) => classify_error_payload(payload),
        RpcError::Transport(kind) => classify_transport_kind(kind),
        _ => FailureClass::Transport,
    }
}

fn classify_error_payload(payload: &ErrorPayload) -> FailureClass {
    const RATE_LIMIT_CODES: [i64; 3] = [429, -32005, -32029];
    if RATE_LIMIT_CODES.contains(&payload.code) {
        return FailureClass::RateLimited;
    }

    let message = payload.message.to_lowercase();
    if message.contains("rate limit") || message.contains("too many requests") {
        FailureClass::RateLimited
    } else {
        FailureClass::Transport
    }
}

fn classify_transport_kind(kind: &TransportErrorKind) -> FailureClass {
    match kind {
        TransportErrorKind::HttpError(http) if http.is_rate_limit_err() => {
            FailureClass::RateLimited
        }
        _ => FailureClass::Transport,
    }
}

/// Backoff before the attempt after `attempt` failures.
///
/// Doubles per attempt from a class-specific base, capped per class:
/// empty results and generic transport failures start at 1s and cap at 30s,
/// rate-limit signals start at 5s and cap at 60s.
pub fn backoff_delay(class: FailureClass, attempt: u32) -> Duration {
    let (base, cap) = match class {
        FailureClass::EmptyResult => (EMPTY_RESULT_BASE_DELAY, EMPTY_RESULT_MAX_DELAY),
        FailureClass::RateLimited => (RATE_LIMIT_BASE_DELAY, RATE_LIMIT_MAX_DELAY),
        FailureClass::Transport => (TRANSPORT_BASE_DELAY, TRANSPORT_MAX_DELAY),
    };

    let exponent = attempt.saturating_sub(1);
    let multiplier = 2u64.saturating_pow(exponent);
    let delay_ms = base.as_millis().saturating_mul(u128::from(multiplier));
    let capped_ms = delay_ms.min(cap.as_millis()) as u64;
    Duration::from_millis(capped_ms)
}

/// Decides the next move after `attempt` completed attempts failed with
/// `class`.
pub fn retry_decision(attempt: u32, class: FailureClass) -> RetryDecision {
    if attempt >= MAX_FETCH_ATTEMPTS {
        RetryDecision::GiveUp
    } else {
        RetryDecision::Retry(backoff_delay(class, attempt))
    }
}

/// Suspension point injected into the fetcher.
///
/// Production uses [`TokioDelay`]; tests record requested durations instead
/// of sleeping.
#[async_trait]
pub trait Delay: Send + Sync {
    /// Suspends the current flow for the given duration.
    async fn sleep(&self, duration: Duration);
}

/// [`Delay`] over the tokio timer.
pub struct TokioDelay;

#[async_trait]
impl Delay for TokioDelay {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Fetches single blocks from a [`BlockSource`] with bounded retries.
pub struct BlockFetcher {
    source: Arc<dyn BlockSource>,
    chain: NamedChain,
    delay: Arc<dyn Delay>,
}

impl BlockFetcher {
    /// Creates a fetcher for one network.
    pub fn new(source: Arc<dyn BlockSource>, chain: NamedChain, delay: Arc<dyn Delay>) -> Self {
        Self {
            source,
            chain,
            delay,
        }
    }

    /// Fetches one block, retrying up to the ceiling.
    ///
    /// Never fails the run: after [`MAX_FETCH_ATTEMPTS`] exhausted attempts
    /// the outcome is [`FetchOutcome::Unavailable`] and the caller moves on
    /// to the next block number.
    pub async fn fetch(&self, number: u64) -> FetchOutcome {
        let span = spans::fetch_block(self.chain, number);
        let _guard = span.enter();

        let mut attempt = 0u32;
        loop {
            attempt += 1;

            let class = match self.attempt(number).await {
                Ok(block) => {
                    if attempt > 1 {
                        debug!(
                            chain = %self.chain,
                            block = number,
                            attempt,
                            "block fetch succeeded after retry"
                        );
                    }
                    return FetchOutcome::Fetched(block);
                }
                Err(class) => class,
            };

            match retry_decision(attempt, class) {
                RetryDecision::Retry(delay) => {
                    warn!(
                        chain = %self.chain,
                        block = number,
                        attempt,
                        class = %class,
                        delay_ms = delay.as_millis() as u64,
                        "block fetch failed, backing off"
                    );
                    self.delay.sleep(delay).await;
                }
                RetryDecision::GiveUp => {
                    warn!(
                        chain = %self.chain,
                        block = number,
                        attempts = attempt,
                        class = %class,
                        "block unavailable after retry ceiling"
                    );
                    return FetchOutcome::Unavailable;
                }
            }
        }
    }

    async fn attempt(&self, number: u64) -> Result<BlockRecord, FailureClass> {
        match self.source.block_by_number(number).await {
            Ok(value) => parse_block_response(&value).map_err(|class| {
                debug!(
                    chain = %self.chain,
                    block = number,
                    "provider response is not a block with transactions"
                );
                class
            }),
            Err(error) => {
                debug!(chain = %self.chain, block = number, error = %error, "provider call failed");
                Err(classify(&error))
            }
        }
    }
}

/// Validates the response shape and parses it into a [`BlockRecord`].
///
/// A response counts as success only when it is non-null and exposes a
/// transactions array (possibly empty); anything else is an empty result.
pub(crate) fn parse_block_response(value: &Value) -> Result<BlockRecord, FailureClass> {
    if value.is_null() {
        return Err(FailureClass::EmptyResult);
    }

    let has_transactions = value
        .get("transactions")
        .map(Value::is_array)
        .unwrap_or(false);
    if !has_transactions {
        return Err(FailureClass::EmptyResult);
    }

    serde_json::from_value(value.clone()).map_err(|_| FailureClass::EmptyResult)
}
