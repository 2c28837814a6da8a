//! `spinnaker_pipeline_template_v2` resource
//!
//! See <https://spinnaker.io/reference/pipeline/templates/>. The template ID
//! lives in its own attribute, so it is assigned before every write and
//! blanked after every read.

use async_trait::async_trait;
use spinnaker_core::domain::template::{parse_pipeline_template_v2, template_reference};
use spinnaker_core::json::are_equal_json;
use tracing::{debug, info};

use crate::Provider;
use crate::error::{ProviderError, Result};
use crate::resource::Resource;
use crate::state::PipelineTemplateState;

pub const TYPE_NAME: &str = "spinnaker_pipeline_template_v2";

/// Reconciler for V2 pipeline templates
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineTemplateV2Resource;

#[async_trait]
impl Resource for PipelineTemplateV2Resource {
    type State = PipelineTemplateState;

    fn validate(&self, state: &PipelineTemplateState) -> Result<()> {
        parse_pipeline_template_v2(&state.template)?;
        Ok(())
    }

    fn diff_suppressed(&self, old: &str, new: &str) -> bool {
        are_equal_json(old, new).unwrap_or(false)
    }

    async fn create(&self, provider: &Provider, state: &mut PipelineTemplateState) -> Result<()> {
        let client = provider.client().await?;

        let mut template = parse_pipeline_template_v2(&state.template)?;
        template.id = state.template_id.clone();

        client
            .create_pipeline_template(&template)
            .await
            .map_err(|source| ProviderError::remote("failed to create pipeline template", source))?;

        info!(template_id = %template.id, "Pipeline template created");
        state.id = template.id;

        self.read(provider, state).await
    }

    async fn read(&self, provider: &Provider, state: &mut PipelineTemplateState) -> Result<()> {
        let client = provider.client().await?;

        let mut template = match client.get_pipeline_template(&state.template_id).await {
            Ok(template) => template,
            Err(e) if e.is_not_found() => {
                debug!(template_id = %state.template_id, "Pipeline template is gone");
                state.id.clear();
                return Ok(());
            }
            Err(source) => {
                return Err(ProviderError::remote(
                    format!("failed to fetch pipeline template {:?}", state.template_id),
                    source,
                ));
            }
        };

        // The ID is tracked in `template_id`; keeping it in the document
        // would show up as a change against the user's input.
        template.id.clear();

        state.template = template.to_json()?;
        state.reference = template_reference(&state.template_id);
        state.id = state.template_id.clone();

        Ok(())
    }

    async fn update(&self, provider: &Provider, state: &mut PipelineTemplateState) -> Result<()> {
        let client = provider.client().await?;

        let mut template = parse_pipeline_template_v2(&state.template)?;
        template.id = state.template_id.clone();

        client
            .update_pipeline_template(&template)
            .await
            .map_err(|source| {
                ProviderError::remote(
                    format!("failed to update pipeline template {:?}", template.id),
                    source,
                )
            })?;

        info!(template_id = %template.id, "Pipeline template updated");
        state.id = template.id;

        self.read(provider, state).await
    }

    async fn delete(&self, provider: &Provider, state: &mut PipelineTemplateState) -> Result<()> {
        let client = provider.client().await?;

        let mut versions = client
            .list_pipeline_template_versions()
            .await
            .map_err(|source| {
                ProviderError::remote("failed to list pipeline template versions", source)
            })?;

        let versions = versions.remove(&state.template_id).unwrap_or_default();

        for version in &versions {
            match client
                .delete_pipeline_template(&version.id, &version.selector())
                .await
            {
                Ok(()) => {
                    info!(
                        template_id = %version.id,
                        tag = %version.tag,
                        digest = %version.digest,
                        "Pipeline template version deleted"
                    );
                }
                Err(e) if e.is_not_found() => {
                    debug!(template_id = %version.id, tag = %version.tag, "Pipeline template version already absent");
                }
                Err(source) => {
                    return Err(ProviderError::remote(
                        format!(
                            "failed to delete pipeline template {:?} (tag: {:?}, digest: {:?})",
                            version.id, version.tag, version.digest
                        ),
                        source,
                    ));
                }
            }
        }

        state.id.clear();
        Ok(())
    }

    async fn exists(&self, provider: &Provider, state: &PipelineTemplateState) -> Result<bool> {
        let client = provider.client().await?;

        match client.get_pipeline_template(&state.template_id).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(source) => Err(ProviderError::remote(
                format!("failed to fetch pipeline template {:?}", state.template_id),
                source,
            )),
        }
    }
}
