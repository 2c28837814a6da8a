//! Spinnaker Provider
//!
//! Reconciles declared pipelines and V2 pipeline templates against Gate.
//!
//! The host drives each resource through create/read/update/delete/exists
//! (see [`Resource`]). All operations share one [`Provider`], which owns
//! the Gate client and builds it on first use. Existing pipelines can also
//! be looked up read-only through [`PipelineDataSource`].
//!
//! # Example
//!
//! ```no_run
//! use spinnaker_provider::{PipelineResource, PipelineState, Provider, ProviderConfig, Resource};
//!
//! # async fn example() -> spinnaker_provider::Result<()> {
//! let provider = Provider::new(ProviderConfig::new("https://gate.example.com"));
//! let mut state = PipelineState::new("myapp", "deploy", r#"{"stages": []}"#);
//!
//! PipelineResource.create(&provider, &mut state).await?;
//! println!("created pipeline {}", state.pipeline_id);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod resource;
pub mod resources;
pub mod state;

pub use config::ProviderConfig;
pub use error::{ProviderError, Result};
pub use resource::{DataSource, Resource};
pub use resources::{PipelineDataSource, PipelineResource, PipelineTemplateV2Resource};
pub use state::{PipelineState, PipelineTemplateState};

use spinnaker_client::{ClientError, GateClient};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{error, info};

/// Resource type names declared to the host
pub const RESOURCE_TYPES: [&str; 2] = [
    resources::pipeline::TYPE_NAME,
    resources::pipeline_template_v2::TYPE_NAME,
];

/// Data source type names declared to the host
pub const DATA_SOURCE_TYPES: [&str; 1] = [resources::pipeline::TYPE_NAME];

/// Provider instance shared by every resource operation
///
/// The Gate client is built at most once. If building it fails, the failure
/// is kept and handed to every later caller; nothing retries it.
#[derive(Debug)]
pub struct Provider {
    config: ProviderConfig,
    client: OnceCell<std::result::Result<GateClient, Arc<ClientError>>>,
}

impl Provider {
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            config,
            client: OnceCell::new(),
        }
    }

    /// Shared Gate client, built on the first call
    ///
    /// Concurrent first callers wait for the single initialization and all
    /// observe its outcome.
    pub async fn client(&self) -> Result<&GateClient> {
        let outcome = self
            .client
            .get_or_init(|| async { self.connect() })
            .await;

        outcome
            .as_ref()
            .map_err(|e| ProviderError::ClientInit(Arc::clone(e)))
    }

    fn connect(&self) -> std::result::Result<GateClient, Arc<ClientError>> {
        let result = self
            .config
            .client_config()
            .and_then(|config| GateClient::from_config(&config));

        match &result {
            Ok(client) => info!(endpoint = client.base_url(), "Gate client initialized"),
            Err(e) => error!(error = %e, "Failed to initialize Gate client"),
        }

        result.map_err(Arc::new)
    }
}
