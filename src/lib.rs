pub mod blocks;
pub mod bootstrap;
pub mod codec;
pub mod compress;
pub mod config;
pub mod errors;
pub mod extract;
pub mod fetcher;
pub mod provider;
pub mod range;
mod tracing;

pub use blocks::{BlockRecord, BlockStore, CacheKey, CacheStats, DiskCache, MemoryCache, TxRecord};
pub use codec::BigInt;
pub use compress::{Compressor, Passthrough, ZstdCli};
pub use config::{Config, NetworkTable, ProcessEnv};
pub use errors::{
    AddrscanError, CacheError, CodecError, ConfigError, FetchError, ValidationError,
};
pub use extract::participant_addresses;
pub use fetcher::{BlockFetcher, Delay, FailureClass, FetchOutcome, RetryDecision, TokioDelay};
pub use provider::{BlockSource, RpcBlockSource};
pub use range::{BlockRange, RangeEndpoint, RangeSpec};
