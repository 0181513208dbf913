use reqwest::StatusCode;
use thiserror::Error;

/// Failure categories for one folder listing. Nothing here is retried or
/// recovered internally; each entry point maps these onto its own response.
#[derive(Debug, Error)]
pub enum FetchError {
    /// A required configuration value is absent. Raised before any network I/O
    /// so a misconfigured deployment is distinguishable from a degraded
    /// upstream.
    #[error("server configuration error: missing {0}")]
    Configuration(&'static str),

    /// The Drive API answered with a non-success status. The raw error body is
    /// kept verbatim for diagnostics.
    #[error("drive api error: status {status}: {body}")]
    Upstream { status: StatusCode, body: String },

    /// The Drive API could not be reached.
    #[error("drive api request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The Drive API answered with success but the body was not valid JSON.
    #[error("drive api returned malformed json: {0}")]
    MalformedResponse(#[from] serde_json::Error),
}

impl FetchError {
    /// Status reported to HTTP callers: upstream failures pass the original
    /// status through, everything else is a 500.
    pub fn status(&self) -> StatusCode {
        match self {
            FetchError::Upstream { status, .. } => *status,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
