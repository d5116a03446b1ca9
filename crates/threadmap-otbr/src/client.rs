//! Polling client for the OTBR REST API

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::time::Duration;
use threadmap_core::{DiagnosticRecord, NodeSummary};
use tracing::debug;

use crate::error::OtbrError;

/// Node-summary endpoint
pub const ENDPOINT_NODE: &str = "/node";
/// Per-device diagnostics endpoint
pub const ENDPOINT_DIAGNOSTICS: &str = "/diagnostics";

/// Reusable HTTP client bound to one border router.
///
/// The underlying connection pool is shared across refresh cycles; each
/// request carries the configured timeout independently.
pub struct OtbrClient {
    client: reqwest::Client,
    base_url: String,
}

impl OtbrClient {
    /// Create a client for the given base URL with a per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// The border router base URL this client polls.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, OtbrError> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!(url = %url, "Fetching OTBR endpoint");

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(OtbrError::Status(response.status().as_u16()));
        }
        Ok(response.json::<T>().await?)
    }

    /// Fetch the network-level node summary.
    pub async fn fetch_node(&self) -> Result<NodeSummary, OtbrError> {
        self.get_json(ENDPOINT_NODE).await
    }

    /// Fetch the per-device diagnostics list.
    pub async fn fetch_diagnostics(&self) -> Result<Vec<DiagnosticRecord>, OtbrError> {
        self.get_json(ENDPOINT_DIAGNOSTICS).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = OtbrClient::new("http://otbr.local:8081/", Duration::from_secs(10)).unwrap();
        assert_eq!(client.base_url(), "http://otbr.local:8081");

        let client = OtbrClient::new("http://otbr.local:8081", Duration::from_secs(10)).unwrap();
        assert_eq!(client.base_url(), "http://otbr.local:8081");
    }
}
