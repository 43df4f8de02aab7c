use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Central error type for the whole service core.
/// Every module returns `Result<T, ApiError>`.
#[derive(Debug, Error)]
pub enum ApiError {
    // ── Input ───────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ── Server status protocol ──────────────────────────
    /// Also covers refused or unresolvable targets.
    #[error("Connection to {host}:{port} timed out after {after:?}")]
    Timeout {
        host: String,
        port: u16,
        after: Duration,
    },

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    // ── Upstream platforms ──────────────────────────────
    #[error("{platform} unavailable: {reason}")]
    UpstreamUnavailable { platform: String, reason: String },

    // ── Network ─────────────────────────────────────────
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    // ── Parsing ─────────────────────────────────────────
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::DeError),

    // ── IO ──────────────────────────────────────────────
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    // ── Generic ─────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn upstream(platform: &str, reason: impl Into<String>) -> Self {
        ApiError::UpstreamUnavailable {
            platform: platform.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<std::io::Error> for ApiError {
    fn from(source: std::io::Error) -> Self {
        ApiError::Io {
            path: PathBuf::new(),
            source,
        }
    }
}

// ── Serialization for the HTTP layer ────────────────────
// Handlers return errors as JSON strings.
impl serde::Serialize for ApiError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
