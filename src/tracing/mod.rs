//! Observability and tracing utilities.
//!
//! This module provides structured tracing support for addrscan operations.

pub(crate) mod spans;
