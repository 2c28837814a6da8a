//! Error types for the Gate client
//!
//! Gate has no structured error code for most conditions, so the
//! classification predicates below are the only place that knows how a
//! condition shows up on the wire.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when using the Gate client
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response (connection, TLS, timeout)
    #[error("{0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Gate answered with a status the operation does not accept
    #[error("{message}, Code: {status}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from Gate, or the raw body
        message: String,
    },

    /// Response body could not be decoded
    #[error("failed to decode response body: {0}")]
    ParseError(String),

    /// Request could not be built
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Client settings or the Gate config file are unusable
    #[error("invalid client configuration: {0}")]
    Config(String),
}

static PIPELINE_ALREADY_EXISTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r".*A pipeline with name .* already exists.*")
        .expect("PIPELINE_ALREADY_EXISTS is a valid regex pattern")
});

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// HTTP status carried by the error, if Gate responded at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ApiError { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Check if Gate reported the resource as missing
    ///
    /// Only a response with status 404 qualifies; errors without a response
    /// never do.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ApiError { status: 404, .. })
    }

    /// Check if Gate refused a pipeline save because the name is taken
    pub fn is_pipeline_already_exists(&self) -> bool {
        PIPELINE_ALREADY_EXISTS.is_match(&self.to_string())
    }

    /// Check if Gate answered with an empty or truncated body
    ///
    /// Gate does this instead of a 404 for some missing pipelines.
    pub fn is_unexpected_eof(&self) -> bool {
        self.to_string().contains("EOF")
    }
}
