//! Validation errors for command-line arguments.
//!
//! These errors are fatal and reported before any network activity happens.

/// Errors produced while validating the `<network> <range>` invocation.
///
/// # Examples
///
/// ```rust
/// use addrscan::ValidationError;
///
/// let error = ValidationError::invalid_range("abc", "neither an integer nor 'latest'");
/// println!("Error: {}", error);
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// The range argument does not parse as `<int>`, `<int>-<int>`,
    /// `<int>-latest`, or `latest`, or describes a descending span.
    #[error("invalid range '{input}': {reason}")]
    InvalidRange {
        /// The raw range argument as given on the command line
        input: String,
        /// Why it was rejected
        reason: String,
    },

    /// The network argument is not one of the supported networks.
    #[error("unknown network '{name}' (supported: {supported})")]
    UnknownNetwork {
        /// The raw network argument as given on the command line
        name: String,
        /// Comma-separated list of supported network names
        supported: String,
    },

    /// The invocation did not supply exactly `<network> <range>`.
    #[error("expected arguments: <network> <range>, got {count}")]
    WrongArgCount {
        /// Number of arguments actually supplied
        count: usize,
    },
}

impl ValidationError {
    /// Create an `InvalidRange` error for a raw argument.
    pub fn invalid_range(input: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidRange {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Create an `UnknownNetwork` error listing the supported set.
    pub fn unknown_network(name: impl Into<String>, supported: impl Into<String>) -> Self {
        ValidationError::UnknownNetwork {
            name: name.into(),
            supported: supported.into(),
        }
    }
}
