//! Errors from the remote fetcher.
//!
//! Per-block fetch failures never surface as errors: the fetcher retries and
//! then yields an unavailable outcome. The only error here is the head query,
//! which is fatal when `latest` resolution is required.

/// Errors from provider queries that cannot be downgraded to a skip.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The provider's current head block number could not be obtained.
    ///
    /// Raised while resolving a `latest` range endpoint. There is no block
    /// to skip at this point, so the run aborts.
    #[error("failed to query current head block number")]
    HeadQuery {
        /// The underlying provider error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl FetchError {
    /// Create a `HeadQuery` error from any provider error.
    pub fn head_query(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        FetchError::HeadQuery {
            source: Box::new(source),
        }
    }
}
