//! Threadmap OTBR - border router REST transport
//!
//! This crate owns all network I/O against the OpenThread Border Router's
//! REST API: the reusable polling client and the one-shot setup probe used
//! to validate a target URL before any configuration is persisted.

pub mod client;
pub mod error;
pub mod probe;

pub use client::{OtbrClient, ENDPOINT_DIAGNOSTICS, ENDPOINT_NODE};
pub use error::OtbrError;
pub use probe::{probe_url, ProbeError, ProbeReport};
