//! Errors from the disk cache tier.
//!
//! Cache failures are contained: a failed read is a miss, a failed write is
//! logged and the fetched block still flows to the caller.

use super::CodecError;

/// Errors reading from or writing to the sharded disk cache.
///
/// Every variant is non-fatal for the run. The disk tier is treated as
/// absent for the operation that produced the error.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Filesystem I/O failure on a cache path.
    #[error("cache I/O error at {path}: {source}")]
    Io {
        /// Path to the file or directory that caused the error
        path: String,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The external compressor failed or produced no output.
    #[error("compressor '{program}' failed: {details}")]
    Compress {
        /// Name of the compressor program
        program: String,
        /// What went wrong
        details: String,
    },

    /// A cached payload failed to parse.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl CacheError {
    /// Create an `Io` error from a path and I/O failure.
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        CacheError::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a `Compress` error with details.
    pub fn compress(program: impl Into<String>, details: impl Into<String>) -> Self {
        CacheError::Compress {
            program: program.into(),
            details: details.into(),
        }
    }
}
