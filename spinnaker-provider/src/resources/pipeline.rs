//! `spinnaker_pipeline` resource and data source
//!
//! Addressed by application and pipeline name. Gate reports "already
//! exists" both on create and, oddly, on update; either way the pipeline is
//! deleted and saved again.

use async_trait::async_trait;
use serde_json::Value;
use spinnaker_core::domain::pipeline::{self, PipelineDocument, assign_identity, parse_pipeline};
use tracing::{debug, info, warn};

use crate::Provider;
use crate::error::{ProviderError, Result};
use crate::resource::{DataSource, Resource};
use crate::state::PipelineState;

pub const TYPE_NAME: &str = "spinnaker_pipeline";

/// Reconciler for single pipelines
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineResource;

/// Read-only lookup of an existing pipeline
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineDataSource;

fn describe(state: &PipelineState) -> String {
    format!(
        "pipeline {:?} for application {:?}",
        state.name, state.application
    )
}

/// Store a fetched document in normalized form, along with its Gate ID
fn store_remote(state: &mut PipelineState, document: PipelineDocument) -> Result<()> {
    let pipeline_id = document
        .get("id")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    state.pipeline = pipeline::normalize(document)?;
    state.pipeline_id = pipeline_id.clone();
    state.id = pipeline_id;

    Ok(())
}

#[async_trait]
impl Resource for PipelineResource {
    type State = PipelineState;

    fn validate(&self, state: &PipelineState) -> Result<()> {
        parse_pipeline(&state.pipeline)?;
        Ok(())
    }

    fn diff_suppressed(&self, old: &str, new: &str) -> bool {
        pipeline::diff_suppressed(old, new)
    }

    async fn create(&self, provider: &Provider, state: &mut PipelineState) -> Result<()> {
        let client = provider.client().await?;

        let mut document = parse_pipeline(&state.pipeline)?;
        assign_identity(&mut document, &state.application, &state.name, None);

        let mut outcome = client.create_pipeline(&document).await;
        if matches!(&outcome, Err(e) if e.is_pipeline_already_exists()) {
            warn!(
                application = %state.application,
                pipeline = %state.name,
                "Pipeline already exists, recreating it"
            );
            outcome = client
                .recreate_pipeline(&state.application, &state.name, &document)
                .await;
        }

        outcome.map_err(|source| {
            ProviderError::remote(format!("failed to create {}", describe(state)), source)
        })?;

        info!(application = %state.application, pipeline = %state.name, "Pipeline created");

        self.read(provider, state).await
    }

    async fn read(&self, provider: &Provider, state: &mut PipelineState) -> Result<()> {
        let client = provider.client().await?;

        let document = match client.get_pipeline(&state.application, &state.name).await {
            Ok(document) => document,
            Err(e) if e.is_not_found() => {
                debug!(application = %state.application, pipeline = %state.name, "Pipeline is gone");
                state.id.clear();
                return Ok(());
            }
            Err(source) => {
                return Err(ProviderError::remote(
                    format!("failed to fetch {}", describe(state)),
                    source,
                ));
            }
        };

        store_remote(state, document)
    }

    async fn update(&self, provider: &Provider, state: &mut PipelineState) -> Result<()> {
        let client = provider.client().await?;

        let mut document = parse_pipeline(&state.pipeline)?;
        assign_identity(
            &mut document,
            &state.application,
            &state.name,
            Some(state.pipeline_id.as_str()),
        );

        let mut outcome = client.update_pipeline(&state.pipeline_id, &document).await;
        if matches!(&outcome, Err(e) if e.is_pipeline_already_exists()) {
            warn!(
                application = %state.application,
                pipeline = %state.name,
                "Gate reported a name collision on update, recreating pipeline"
            );
            outcome = client
                .recreate_pipeline(&state.application, &state.name, &document)
                .await;
        }

        outcome.map_err(|source| {
            ProviderError::remote(format!("failed to update {}", describe(state)), source)
        })?;

        info!(application = %state.application, pipeline = %state.name, "Pipeline updated");

        self.read(provider, state).await
    }

    async fn delete(&self, provider: &Provider, state: &mut PipelineState) -> Result<()> {
        let client = provider.client().await?;

        match client.delete_pipeline(&state.application, &state.name).await {
            Ok(()) => {
                info!(application = %state.application, pipeline = %state.name, "Pipeline deleted");
            }
            Err(e) if e.is_not_found() => {
                debug!(application = %state.application, pipeline = %state.name, "Pipeline already absent");
            }
            Err(source) => {
                return Err(ProviderError::remote(
                    format!("failed to delete {}", describe(state)),
                    source,
                ));
            }
        }

        state.id.clear();
        Ok(())
    }

    async fn exists(&self, provider: &Provider, state: &PipelineState) -> Result<bool> {
        let client = provider.client().await?;

        match client.get_pipeline(&state.application, &state.name).await {
            Ok(_) => Ok(true),
            // Gate sometimes answers with an empty body instead of a 404
            Err(e) if e.is_not_found() || e.is_unexpected_eof() => Ok(false),
            Err(source) => Err(ProviderError::remote(
                format!("failed to fetch {}", describe(state)),
                source,
            )),
        }
    }
}

#[async_trait]
impl DataSource for PipelineDataSource {
    type State = PipelineState;

    /// Unlike the resource read, a missing pipeline is an error here
    async fn read(&self, provider: &Provider, state: &mut PipelineState) -> Result<()> {
        let client = provider.client().await?;

        let document = client
            .get_pipeline(&state.application, &state.name)
            .await
            .map_err(|source| {
                ProviderError::remote(format!("failed to fetch {}", describe(state)), source)
            })?;

        debug!(application = %state.application, pipeline = %state.name, "Pipeline looked up");

        store_remote(state, document)
    }
}
