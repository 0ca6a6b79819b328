//! Errors from the block serialization codec.

/// Errors encoding or decoding the persisted block representation.
///
/// Decode failures on cached entries are never fatal: the cache logs them
/// and falls through to the next tier.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// A block record could not be serialized to its persisted byte form.
    #[error("failed to encode block record")]
    Encode {
        /// The underlying serialization error
        #[source]
        source: serde_json::Error,
    },

    /// A persisted payload could not be parsed back into a block record.
    #[error("failed to decode block record: {details}")]
    Decode {
        /// Details about what failed to parse
        details: String,
    },
}

impl CodecError {
    /// Create an `Encode` error from a serialization failure.
    pub fn encode(source: serde_json::Error) -> Self {
        CodecError::Encode { source }
    }

    /// Create a `Decode` error with details.
    pub fn decode(details: impl Into<String>) -> Self {
        CodecError::Decode {
            details: details.into(),
        }
    }
}
