// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Block range parsing and resolution.
//!
//! A range argument is one of `<int>`, `<int>-<int>`, `<int>-latest`, or
//! `latest`. Parsing is pure; resolution substitutes the provider's current
//! head for every `latest` occurrence using exactly one live query per run,
//! and clamps concrete endpoints that exceed the observed head.

use std::fmt;

use tracing::{debug, warn};

use crate::errors::{AddrscanError, FetchError, ValidationError};
use crate::provider::BlockSource;
use crate::tracing::spans;

/// One side of a range argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeEndpoint {
    /// A concrete block height.
    Number(u64),
    /// The provider's current head, resolved once per run.
    Latest,
}

impl fmt::Display for RangeEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeEndpoint::Number(n) => write!(f, "{n}"),
            RangeEndpoint::Latest => f.write_str("latest"),
        }
    }
}

/// A validated but not yet resolved range argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeSpec {
    start: RangeEndpoint,
    end: RangeEndpoint,
}

impl fmt::Display for RangeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Resolved inclusive block bounds, always ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRange {
    /// First block height (inclusive)
    pub start: u64,
    /// Last block height (inclusive)
    pub end: u64,
}

impl BlockRange {
    /// Number of blocks covered.
    pub fn count(&self) -> u64 {
        self.end - self.start + 1
    }

    /// Ascending iterator over the covered heights.
    pub fn iter(&self) -> impl Iterator<Item = u64> {
        self.start..=self.end
    }
}

impl RangeSpec {
    /// Parses a raw range argument.
    ///
    /// Each dash side must independently parse as a non-negative integer or
    /// the literal `latest`. A pair of concrete descending endpoints is
    /// rejected here, before any network activity.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let (start, end) = match input.split_once('-') {
            None => {
                let endpoint = parse_endpoint(input, input)?;
                (endpoint, endpoint)
            }
            Some((left, right)) => {
                if right.contains('-') {
                    return Err(ValidationError::invalid_range(
                        input,
                        "expected at most one dash",
                    ));
                }
                (parse_endpoint(left, input)?, parse_endpoint(right, input)?)
            }
        };

        if let (RangeEndpoint::Number(s), RangeEndpoint::Number(e)) = (start, end) {
            if s > e {
                return Err(ValidationError::invalid_range(
                    input,
                    format!("start {s} is greater than end {e}"),
                ));
            }
        }

        Ok(Self { start, end })
    }

    /// Whether resolution requires a live head query.
    pub fn needs_head(&self) -> bool {
        self.start == RangeEndpoint::Latest || self.end == RangeEndpoint::Latest
    }

    /// Resolves the spec against the provider.
    ///
    /// Issues at most one head query, reused for every `latest` occurrence
    /// and for clamping. Concrete endpoints beyond the observed head are
    /// clamped down with a warning rather than rejected. A head-query
    /// failure is fatal: there is no block to skip yet.
    pub async fn resolve(&self, source: &dyn BlockSource) -> Result<BlockRange, AddrscanError> {
        let span = spans::resolve_range(self);
        let _guard = span.enter();

        let range = match (self.start, self.end) {
            // Fully concrete: no head query, no clamping reference.
            (RangeEndpoint::Number(start), RangeEndpoint::Number(end)) => {
                BlockRange { start, end }
            }
            (start, end) => {
                let head = source
                    .head_number()
                    .await
                    .map_err(FetchError::head_query)?;
                debug!(head, "observed current head for range resolution");

                BlockRange {
                    start: clamp_to_head(concrete(start, head), head),
                    end: clamp_to_head(concrete(end, head), head),
                }
            }
        };

        if range.start > range.end {
            return Err(ValidationError::invalid_range(
                self.to_string(),
                format!(
                    "resolves to descending bounds {}-{}",
                    range.start, range.end
                ),
            )
            .into());
        }

        debug!(start = range.start, end = range.end, blocks = range.count(), "resolved range");
        Ok(range)
    }
}

fn parse_endpoint(side: &str, input: &str) -> Result<RangeEndpoint, ValidationError> {
    if side == "latest" {
        return Ok(RangeEndpoint::Latest);
    }
    side.parse::<u64>().map(RangeEndpoint::Number).map_err(|_| {
        ValidationError::invalid_range(
            input,
            format!("'{side}' is neither a non-negative integer nor 'latest'"),
        )
    })
}

fn concrete(endpoint: RangeEndpoint, head: u64) -> u64 {
    match endpoint {
        RangeEndpoint::Number(n) => n,
        RangeEndpoint::Latest => head,
    }
}

fn clamp_to_head(value: u64, head: u64) -> u64 {
    if value > head {
        warn!(requested = value, head, "endpoint beyond current head, clamping");
        head
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_transport::{TransportError, TransportErrorKind};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Source that answers head queries with a fixed value and counts them.
    struct FixedHead {
        head: u64,
        head_queries: AtomicU32,
        fail_head: bool,
    }

    impl FixedHead {
        fn new(head: u64) -> Self {
            Self {
                head,
                head_queries: AtomicU32::new(0),
                fail_head: false,
            }
        }

        fn failing() -> Self {
            Self {
                head: 0,
                head_queries: AtomicU32::new(0),
                fail_head: true,
            }
        }
    }

    #[async_trait]
    impl BlockSource for FixedHead {
        async fn block_by_number(&self, _number: u64) -> Result<serde_json::Value, TransportError> {
            Ok(serde_json::Value::Null)
        }

        async fn head_number(&self) -> Result<u64, TransportError> {
            self.head_queries.fetch_add(1, Ordering::SeqCst);
            if self.fail_head {
                Err(TransportErrorKind::custom_str("head query refused"))
            } else {
                Ok(self.head)
            }
        }
    }

    #[test]
    fn parses_single_number() {
        let spec = RangeSpec::parse("42").unwrap();
        assert!(!spec.needs_head());
        assert_eq!(spec.to_string(), "42");
    }

    #[test]
    fn parses_pair_and_latest_forms() {
        assert!(!RangeSpec::parse("100-200").unwrap().needs_head());
        assert!(RangeSpec::parse("100-latest").unwrap().needs_head());
        assert!(RangeSpec::parse("latest").unwrap().needs_head());
    }

    #[test]
    fn rejects_garbage() {
        assert!(RangeSpec::parse("abc").is_err());
        assert!(RangeSpec::parse("10-abc").is_err());
        assert!(RangeSpec::parse("").is_err());
        assert!(RangeSpec::parse("1-2-3").is_err());
        assert!(RangeSpec::parse("-5").is_err());
    }

    #[test]
    fn rejects_descending_concrete_pair() {
        let error = RangeSpec::parse("200-100").unwrap_err();
        assert!(error.to_string().contains("greater than"));
    }

    #[tokio::test]
    async fn concrete_range_needs_no_head_query() {
        let source = FixedHead::new(1_000);
        let range = RangeSpec::parse("100-102")
            .unwrap()
            .resolve(&source)
            .await
            .unwrap();

        assert_eq!(range, BlockRange { start: 100, end: 102 });
        assert_eq!(range.count(), 3);
        assert_eq!(source.head_queries.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn latest_resolves_with_one_query() {
        let source = FixedHead::new(500);
        let range = RangeSpec::parse("latest")
            .unwrap()
            .resolve(&source)
            .await
            .unwrap();

        assert_eq!(range, BlockRange { start: 500, end: 500 });
        assert_eq!(source.head_queries.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn open_ended_range_shares_the_observed_head() {
        let source = FixedHead::new(500);
        let range = RangeSpec::parse("490-latest")
            .unwrap()
            .resolve(&source)
            .await
            .unwrap();

        assert_eq!(range, BlockRange { start: 490, end: 500 });
        assert_eq!(source.head_queries.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn clamps_endpoint_beyond_head() {
        let source = FixedHead::new(500);
        let range = RangeSpec::parse("600-latest")
            .unwrap()
            .resolve(&source)
            .await
            .unwrap();

        // 600 exceeds the observed head and is clamped, not rejected.
        assert_eq!(range, BlockRange { start: 500, end: 500 });
    }

    #[tokio::test]
    async fn head_failure_is_fatal() {
        let source = FixedHead::failing();
        let result = RangeSpec::parse("latest").unwrap().resolve(&source).await;
        assert!(matches!(
            result,
            Err(AddrscanError::Fetch(crate::errors::FetchError::HeadQuery { .. }))
        ));
    }

    #[tokio::test]
    async fn range_count_matches_bounds() {
        for (input, head, expected) in [("0-0", 10, 1), ("3-7", 10, 5), ("8-latest", 10, 3)] {
            let source = FixedHead::new(head);
            let range = RangeSpec::parse(input).unwrap().resolve(&source).await.unwrap();
            assert_eq!(range.count(), expected, "range {input}");

            let numbers: Vec<u64> = range.iter().collect();
            assert_eq!(numbers.len() as u64, expected);
            assert!(numbers.windows(2).all(|w| w[1] == w[0] + 1));
        }
    }
}
