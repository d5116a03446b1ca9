//! Setup-time URL validation
//!
//! One GET against the node endpoint with a short timeout, run before any
//! configuration is accepted. The reported network name doubles as the
//! uniqueness key for the configured instance.

use std::time::Duration;
use thiserror::Error;
use threadmap_core::NodeSummary;
use tracing::info;

use crate::client::ENDPOINT_NODE;

/// Successful probe of a border router URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    /// Network name reported by the router; uniqueness key for the setup
    pub network_name: String,
}

/// Classified probe failure, surfaced to the setup flow as-is.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("cannot_connect")]
    CannotConnect,
    #[error("timeout")]
    Timeout,
}

impl From<reqwest::Error> for ProbeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProbeError::Timeout
        } else {
            ProbeError::CannotConnect
        }
    }
}

/// Validate that `url` hosts a reachable border router API.
pub async fn probe_url(url: &str, timeout: Duration) -> Result<ProbeReport, ProbeError> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|_| ProbeError::CannotConnect)?;

    let endpoint = format!("{}{}", url.trim_end_matches('/'), ENDPOINT_NODE);
    let response = client.get(&endpoint).send().await?;

    if !response.status().is_success() {
        return Err(ProbeError::CannotConnect);
    }

    let node: NodeSummary = response.json().await.map_err(ProbeError::from)?;
    let network_name = if node.network_name.is_empty() {
        "Thread Network".to_string()
    } else {
        node.network_name
    };

    info!(url = %url, network = %network_name, "Border router probe succeeded");
    Ok(ProbeReport { network_name })
}
