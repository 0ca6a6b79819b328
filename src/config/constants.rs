//! Tuning constants for retries, sharding, and the cache layout.
//!
//! This module centralizes magic constants used throughout the addrscan
//! crate, improving discoverability and maintainability.

use std::time::Duration;

/// Total attempts per block number, including the first.
///
/// Bounding retries per block bounds worst-case run latency against shared,
/// rate-limited endpoints.
pub const MAX_FETCH_ATTEMPTS: u32 = 3;

/// Base backoff after a structurally empty or null block response.
pub const EMPTY_RESULT_BASE_DELAY: Duration = Duration::from_secs(1);
/// Backoff cap for empty-result failures.
pub const EMPTY_RESULT_MAX_DELAY: Duration = Duration::from_secs(30);

/// Base backoff after a rate-limit signal from the provider.
pub const RATE_LIMIT_BASE_DELAY: Duration = Duration::from_secs(5);
/// Backoff cap for rate-limited failures.
pub const RATE_LIMIT_MAX_DELAY: Duration = Duration::from_secs(60);

/// Base backoff after any other transport failure.
pub const TRANSPORT_BASE_DELAY: Duration = Duration::from_secs(1);
/// Backoff cap for other transport failures.
pub const TRANSPORT_MAX_DELAY: Duration = Duration::from_secs(30);

/// Block numbers per disk-cache shard directory.
pub const SHARD_SPAN: u64 = 1_000_000;

/// Default cache root when no override is configured.
pub const DEFAULT_CACHE_ROOT: &str = "block-cache";

/// Environment variable holding the required provider credential.
pub const API_KEY_ENV: &str = "ALCHEMY_API_KEY";

/// Environment variable overriding the cache root directory.
pub const CACHE_ROOT_ENV: &str = "BLOCK_CACHE_DIR";

/// Name of the external compressor binary.
pub const ZSTD_PROGRAM: &str = "zstd";
