//! Error types for the addrscan crate.
//!
//! This module provides strongly-typed errors for all public APIs. It follows
//! a hybrid approach:
//!
//! - **Module-specific errors** for fine-grained error handling
//!   ([`ValidationError`], [`ConfigError`], [`CacheError`], [`CodecError`],
//!   [`FetchError`])
//! - **Unified error type** ([`AddrscanError`]) for the orchestration layer,
//!   where the only distinction that matters is fatal versus contained
//!
//! # Containment
//!
//! Only validation, configuration, and head-resolution failures abort a run.
//! Cache and codec errors are logged where they occur and demote the
//! affected tier to a miss; transport failures are retried and then
//! downgraded to a per-block skip.

mod args;
mod cache;
mod codec;
mod config;
mod fetch;

pub use args::ValidationError;
pub use cache::CacheError;
pub use codec::CodecError;
pub use config::ConfigError;
pub use fetch::FetchError;

/// Unified error type for all addrscan operations.
///
/// Module-specific error types convert automatically via `From`, so `?`
/// propagates them naturally through [`crate::bootstrap::run`]. Any variant
/// reaching the binary entry point exits the process with code 1.
#[derive(Debug, thiserror::Error)]
pub enum AddrscanError {
    /// Malformed network or range argument.
    #[error("argument validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Missing or unusable run configuration.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Disk cache failure that escaped containment (setup only).
    #[error("cache error: {0}")]
    Cache(#[from] CacheError),

    /// Codec failure that escaped containment (setup only).
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// Provider failure that cannot be downgraded to a skip.
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// The address output stream could not be written.
    #[error("output stream error: {0}")]
    Output(#[from] std::io::Error),
}
