//! Run configuration assembled once at the process boundary.
//!
//! Core components never read the environment or argv themselves: the
//! binary captures a [`ProcessEnv`] snapshot, [`Config::build`] validates it
//! together with the arguments, and the resulting value is threaded
//! explicitly into the provider, fetcher, and store constructors. The
//! network/endpoint mapping is an immutable [`NetworkTable`] built at
//! startup rather than ambient global state.

use std::path::PathBuf;

use alloy_chains::NamedChain;
use url::Url;

use crate::errors::{AddrscanError, ConfigError, ValidationError};
use crate::range::RangeSpec;

pub mod constants;

use constants::{API_KEY_ENV, CACHE_ROOT_ENV, DEFAULT_CACHE_ROOT};

/// Snapshot of the environment variables addrscan reads.
///
/// Captured exactly once, in the binary. Empty values count as unset.
#[derive(Debug, Clone, Default)]
pub struct ProcessEnv {
    /// Provider credential, required for every run
    pub api_key: Option<String>,
    /// Override for the cache root directory
    pub cache_root: Option<String>,
}

impl ProcessEnv {
    /// Reads the process environment. The only environment access in the
    /// crate.
    pub fn capture() -> Self {
        Self {
            api_key: read_nonempty(API_KEY_ENV),
            cache_root: read_nonempty(CACHE_ROOT_ENV),
        }
    }
}

fn read_nonempty(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|value| !value.trim().is_empty())
}

/// One supported network and its endpoint template component.
#[derive(Debug, Clone, Copy)]
struct NetworkEntry {
    chain: NamedChain,
    subdomain: &'static str,
}

/// Immutable mapping from supported networks to endpoint templates.
///
/// The set is fixed at build time; endpoints follow the Alchemy URL scheme
/// `https://<subdomain>.g.alchemy.com/v2/<key>`.
#[derive(Debug, Clone)]
pub struct NetworkTable {
    entries: Vec<NetworkEntry>,
}

impl NetworkTable {
    /// The bundled network set.
    pub fn bundled() -> Self {
        Self {
            entries: vec![
                NetworkEntry {
                    chain: NamedChain::Mainnet,
                    subdomain: "eth-mainnet",
                },
                NetworkEntry {
                    chain: NamedChain::Sepolia,
                    subdomain: "eth-sepolia",
                },
                NetworkEntry {
                    chain: NamedChain::Polygon,
                    subdomain: "polygon-mainnet",
                },
                NetworkEntry {
                    chain: NamedChain::Arbitrum,
                    subdomain: "arb-mainnet",
                },
                NetworkEntry {
                    chain: NamedChain::Optimism,
                    subdomain: "opt-mainnet",
                },
                NetworkEntry {
                    chain: NamedChain::Base,
                    subdomain: "base-mainnet",
                },
            ],
        }
    }

    /// Resolves a network argument to a supported chain.
    pub fn lookup(&self, name: &str) -> Option<NamedChain> {
        let chain = name.parse::<NamedChain>().ok()?;
        self.entries
            .iter()
            .any(|entry| entry.chain == chain)
            .then_some(chain)
    }

    /// Comma-separated supported network names, for error messages.
    pub fn supported(&self) -> String {
        self.entries
            .iter()
            .map(|entry| entry.chain.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Builds the endpoint URL for a supported chain.
    pub fn endpoint(&self, chain: NamedChain, api_key: &str) -> Result<Url, ConfigError> {
        let entry = self
            .entries
            .iter()
            .find(|entry| entry.chain == chain)
            .ok_or_else(|| ConfigError::InvalidEndpoint {
                network: chain.to_string(),
                details: "network not in table".to_string(),
            })?;

        format!("https://{}.g.alchemy.com/v2/{api_key}", entry.subdomain)
            .parse()
            .map_err(|e| ConfigError::InvalidEndpoint {
                network: chain.to_string(),
                details: format!("{e}"),
            })
    }
}

/// Everything a run needs, validated and immutable.
#[derive(Debug, Clone)]
pub struct Config {
    /// Selected network
    pub chain: NamedChain,
    /// Parsed but unresolved range argument
    pub range: RangeSpec,
    /// Provider endpoint with credential applied
    pub endpoint: Url,
    /// Root directory of the disk cache
    pub cache_root: PathBuf,
}

impl Config {
    /// Validates arguments and environment into a run configuration.
    ///
    /// Fails with a [`ValidationError`] on malformed arguments and a
    /// [`ConfigError`] on a missing credential, both before any network
    /// activity.
    pub fn build(
        args: &[String],
        env: &ProcessEnv,
        table: &NetworkTable,
    ) -> Result<Self, AddrscanError> {
        let [network, range] = args else {
            return Err(ValidationError::WrongArgCount { count: args.len() }.into());
        };

        let chain = table
            .lookup(network)
            .ok_or_else(|| ValidationError::unknown_network(network, table.supported()))?;
        let range = RangeSpec::parse(range)?;

        let api_key = env
            .api_key
            .as_deref()
            .ok_or(ConfigError::MissingCredential { var: API_KEY_ENV })?;
        let endpoint = table.endpoint(chain, api_key)?;

        let cache_root = env
            .cache_root
            .clone()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_ROOT));

        Ok(Self {
            chain,
            range,
            endpoint,
            cache_root,
        })
    }
}
