// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Optional compression capability for the disk cache tier.
//!
//! Compression is delegated to the external `zstd` binary, driven through
//! piped stdio. Availability is probed exactly once per run at startup; when
//! the binary is missing the [`Passthrough`] implementation is selected, so
//! [`crate::blocks::store::BlockStore`] never branches on compression
//! presence. Pre-existing compressed cache entries simply stay unreadable
//! until a later run where the capability is back.

use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::config::constants::ZSTD_PROGRAM;
use crate::errors::CacheError;

/// A byte-stream compress/decompress pair for cached payloads.
///
/// Implementations must be stateless transforms: `decompress(compress(x))`
/// reproduces `x` exactly. The cache consults [`active`](Self::active) to
/// pick the on-disk representation, never to skip calling the transform.
#[async_trait]
pub trait Compressor: Send + Sync {
    /// Whether this compressor produces a compressed representation.
    ///
    /// When `false`, the disk tier writes and probes the uncompressed
    /// form exclusively.
    fn active(&self) -> bool;

    /// Compresses a payload.
    async fn compress(&self, bytes: &[u8]) -> Result<Vec<u8>, CacheError>;

    /// Decompresses a payload.
    async fn decompress(&self, bytes: &[u8]) -> Result<Vec<u8>, CacheError>;

    /// Human-readable name for logging.
    fn name(&self) -> &'static str;
}

/// Compressor backed by the external `zstd` binary.
pub struct ZstdCli {
    program: &'static str,
}

impl ZstdCli {
    /// Probes for a working `zstd` binary.
    ///
    /// Returns `None` when the binary is absent or does not answer
    /// `--version`; the caller degrades to [`Passthrough`].
    pub async fn detect() -> Option<Self> {
        let status = Command::new(ZSTD_PROGRAM)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        match status {
            Ok(status) if status.success() => Some(Self {
                program: ZSTD_PROGRAM,
            }),
            Ok(status) => {
                warn!(program = ZSTD_PROGRAM, %status, "compressor probe exited nonzero");
                None
            }
            Err(e) => {
                debug!(program = ZSTD_PROGRAM, error = %e, "compressor not found");
                None
            }
        }
    }

    /// Runs the binary as a stdin-to-stdout filter.
    async fn run_filter(&self, args: &[&str], input: &[u8]) -> Result<Vec<u8>, CacheError> {
        let mut child = Command::new(self.program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| CacheError::compress(self.program, format!("failed to spawn: {e}")))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| CacheError::compress(self.program, "stdin not captured"))?;

        // Feed stdin from a separate task so a filled pipe buffer on either
        // side cannot deadlock the filter.
        let payload = input.to_vec();
        let writer = tokio::spawn(async move {
            stdin.write_all(&payload).await?;
            stdin.shutdown().await
        });

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| CacheError::compress(self.program, format!("wait failed: {e}")))?;

        match writer.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                return Err(CacheError::compress(
                    self.program,
                    format!("stdin write failed: {e}"),
                ))
            }
            Err(e) => {
                return Err(CacheError::compress(
                    self.program,
                    format!("stdin writer panicked: {e}"),
                ))
            }
        }

        if !output.status.success() {
            return Err(CacheError::compress(
                self.program,
                format!("exited with {}", output.status),
            ));
        }

        Ok(output.stdout)
    }
}

#[async_trait]
impl Compressor for ZstdCli {
    fn active(&self) -> bool {
        true
    }

    async fn compress(&self, bytes: &[u8]) -> Result<Vec<u8>, CacheError> {
        self.run_filter(&["-q", "-c"], bytes).await
    }

    async fn decompress(&self, bytes: &[u8]) -> Result<Vec<u8>, CacheError> {
        self.run_filter(&["-q", "-d", "-c"], bytes).await
    }

    fn name(&self) -> &'static str {
        "zstd"
    }
}

/// No-op compressor selected when the capability probe fails.
///
/// Both transforms return their input unchanged.
pub struct Passthrough;

#[async_trait]
impl Compressor for Passthrough {
    fn active(&self) -> bool {
        false
    }

    async fn compress(&self, bytes: &[u8]) -> Result<Vec<u8>, CacheError> {
        Ok(bytes.to_vec())
    }

    async fn decompress(&self, bytes: &[u8]) -> Result<Vec<u8>, CacheError> {
        Ok(bytes.to_vec())
    }

    fn name(&self) -> &'static str {
        "passthrough"
    }
}

/// Probes the compression capability once and returns the selected
/// implementation.
pub async fn detect() -> Arc<dyn Compressor> {
    match ZstdCli::detect().await {
        Some(zstd) => {
            info!(compressor = zstd.name(), "compression capability detected");
            Arc::new(zstd)
        }
        None => {
            info!("compression capability unavailable, using uncompressed cache entries");
            Arc::new(Passthrough)
        }
    }
}
