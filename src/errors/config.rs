//! Configuration errors raised at the process boundary.

/// Errors assembling the run configuration from the environment.
///
/// These are fatal: the process exits before any network activity.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required credential environment variable is missing or empty.
    #[error("missing required credential: set {var}")]
    MissingCredential {
        /// Name of the environment variable that must be set
        var: &'static str,
    },

    /// The endpoint URL for a network could not be constructed.
    ///
    /// The templates are fixed, so this points at an unusable credential.
    #[error("could not build endpoint URL for {network}: {details}")]
    InvalidEndpoint {
        /// The network whose endpoint failed to build
        network: String,
        /// Why URL construction failed
        details: String,
    },
}

impl ConfigError {
    /// Create a `MissingCredential` error for an environment variable.
    pub fn missing_credential(var: &'static str) -> Self {
        ConfigError::MissingCredential { var }
    }
}
