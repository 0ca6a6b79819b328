//! Span creation helpers for addrscan operations.
//!
//! Telemetry concerns stay separated from business logic: instead of
//! `#[instrument]` attributes, each instrumented operation has a
//! corresponding span helper here.
//!
//! Usage pattern:
//! ```rust,ignore
//! pub async fn my_operation(&self, param: Type) -> Result<T> {
//!     let span = spans::my_operation(param_value);
//!     let _guard = span.enter();
//!     // Business logic here
//! }
//! ```

use alloy_chains::NamedChain;
use tracing::Span;

use crate::range::RangeSpec;

/// Create span for a tiered block-store lookup.
///
/// Parent: per-block processing in the run loop
/// Children: fetch_block span when both cache tiers miss
#[inline]
pub(crate) fn store_get(chain: NamedChain, number: u64) -> Span {
    tracing::debug_span!("addrscan.store_get", chain = %chain, block = number)
}

/// Create span for one bounded remote fetch (all attempts).
///
/// Parent: store_get span
/// Children: provider RPC calls, one per attempt
#[inline]
pub(crate) fn fetch_block(chain: NamedChain, number: u64) -> Span {
    tracing::debug_span!("addrscan.fetch_block", chain = %chain, block = number)
}

/// Create span for range resolution, including the optional head query.
///
/// Parent: None (root span for this operation)
#[inline]
pub(crate) fn resolve_range(spec: &RangeSpec) -> Span {
    tracing::debug_span!("addrscan.resolve_range", spec = %spec)
}
