//! Provider error types

use spinnaker_client::ClientError;
use spinnaker_core::{PipelineError, TemplateError};
use std::sync::Arc;
use thiserror::Error;

/// Result type alias for provider operations
pub type Result<T> = std::result::Result<T, ProviderError>;

/// Errors returned to the host by resource operations
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Provider settings are missing or malformed
    #[error("invalid provider configuration: {0}")]
    Config(String),

    /// Building the shared Gate client failed; every later caller sees the
    /// same error
    #[error("failed to initialize Gate client: {0}")]
    ClientInit(Arc<ClientError>),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    /// A Gate call failed; `context` names the resource
    #[error("{context}: {source}")]
    Remote {
        context: String,
        #[source]
        source: ClientError,
    },
}

impl ProviderError {
    pub(crate) fn remote(context: impl Into<String>, source: ClientError) -> Self {
        Self::Remote {
            context: context.into(),
            source,
        }
    }

    /// The Gate error behind a failed call, if any
    pub fn client_error(&self) -> Option<&ClientError> {
        match self {
            Self::Remote { source, .. } => Some(source),
            Self::ClientInit(source) => Some(source),
            _ => None,
        }
    }
}
