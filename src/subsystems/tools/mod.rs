//! Tools subsystem — thin clients for the external HTTP APIs.
//!
//! Each client is built once at startup from config and holds its own
//! `reqwest::Client`. Calendar operations are *guarded*: they never return
//! an error, every failure becomes a `❌`-prefixed reply. Weather is
//! *unguarded* and hands [`ToolError`] back to the caller.

pub mod calendar;
pub mod weather;

pub use calendar::CalendarClient;
pub use weather::WeatherClient;

use std::time::Duration;

use reqwest::Client;
use thiserror::Error;
use tracing::error;

/// Prefix on every user-facing failure reply.
pub const FAILURE_MARKER: &str = "❌";

#[derive(Debug, Error)]
pub enum ToolError {
    /// Transport-level failure (DNS, connect, timeout) or client setup.
    #[error("request failed: {0}")]
    Request(String),
    /// Provider answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    /// Body did not have the expected shape.
    #[error("malformed response: {0}")]
    Malformed(String),
}

pub(crate) fn build_http_client(timeout_seconds: u64) -> Result<Client, ToolError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .build()
        .map_err(|e| ToolError::Request(format!("failed to build HTTP client: {e}")))
}

/// Return the response if successful, otherwise consume it into
/// [`ToolError::Status`] carrying the raw body.
pub(crate) async fn check_status(
    response: reqwest::Response,
) -> Result<reqwest::Response, ToolError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<failed to read error body>".to_string());
    error!(%status, %body, "provider returned HTTP error");
    Err(ToolError::Status { status: status.as_u16(), body })
}

/// Decode a JSON body, mapping failures to [`ToolError::Malformed`].
pub(crate) async fn decode<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ToolError> {
    response
        .json::<T>()
        .await
        .map_err(|e| ToolError::Malformed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_display_keeps_body() {
        let e = ToolError::Status { status: 404, body: "{\"message\":\"nope\"}".into() };
        assert_eq!(e.to_string(), "HTTP 404: {\"message\":\"nope\"}");
    }

    #[test]
    fn malformed_display() {
        let e = ToolError::Malformed("missing field `resource`".into());
        assert!(e.to_string().starts_with("malformed response"));
    }

    #[test]
    fn client_builds() {
        assert!(build_http_client(1).is_ok());
    }
}
