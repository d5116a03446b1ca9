//! Transport error taxonomy

use thiserror::Error;

/// Failure talking to the border router.
///
/// These abort the refresh cycle; the poller keeps the previous topology
/// and marks it stale.
#[derive(Debug, Error)]
pub enum OtbrError {
    #[error("request to border router timed out")]
    Timeout,
    #[error("cannot connect to border router: {0}")]
    Connect(String),
    #[error("border router returned HTTP status {0}")]
    Status(u16),
    #[error("failed to decode border router response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for OtbrError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            OtbrError::Timeout
        } else if err.is_decode() {
            OtbrError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            OtbrError::Status(status.as_u16())
        } else {
            OtbrError::Connect(err.to_string())
        }
    }
}
