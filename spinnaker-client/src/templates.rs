//! V2 pipeline template endpoints

use crate::GateClient;
use crate::error::Result;
use reqwest::StatusCode;
use spinnaker_core::{PipelineTemplateV2, PipelineTemplateVersion, VersionSelector};
use std::collections::HashMap;

impl GateClient {
    // =============================================================================
    // Pipeline Templates (V2)
    // =============================================================================

    /// Create a pipeline template under `template.id`
    pub async fn create_pipeline_template(&self, template: &PipelineTemplateV2) -> Result<()> {
        let url = self.endpoint(&["v2", "pipelineTemplates", "create"])?;
        let response = self
            .send("create_pipeline_template", || {
                self.client.post(url.clone()).json(template)
            })
            .await?;

        self.handle_empty_response(response, &[StatusCode::OK, StatusCode::CREATED])
            .await
    }

    /// Get the latest version of a pipeline template
    pub async fn get_pipeline_template(&self, template_id: &str) -> Result<PipelineTemplateV2> {
        let url = self.endpoint(&["v2", "pipelineTemplates", template_id])?;
        let response = self
            .send("get_pipeline_template", || self.client.get(url.clone()))
            .await?;

        self.handle_response(response, &[StatusCode::OK]).await
    }

    /// Replace the pipeline template stored under `template.id`
    pub async fn update_pipeline_template(&self, template: &PipelineTemplateV2) -> Result<()> {
        let url = self.endpoint(&["v2", "pipelineTemplates", "update", template.id.as_str()])?;
        let response = self
            .send("update_pipeline_template", || {
                self.client.post(url.clone()).json(template)
            })
            .await?;

        self.handle_empty_response(response, &[StatusCode::OK, StatusCode::CREATED])
            .await
    }

    /// Delete one version of a pipeline template
    pub async fn delete_pipeline_template(
        &self,
        template_id: &str,
        selector: &VersionSelector,
    ) -> Result<()> {
        let mut url = self.endpoint(&["v2", "pipelineTemplates", template_id])?;
        match selector {
            VersionSelector::Digest(digest) => {
                url.query_pairs_mut().append_pair("digest", digest);
            }
            VersionSelector::Tag(tag) => {
                url.query_pairs_mut().append_pair("tag", tag);
            }
            VersionSelector::Latest => {}
        }

        let response = self
            .send("delete_pipeline_template", || self.client.delete(url.clone()))
            .await?;

        self.handle_empty_response(response, &[StatusCode::OK, StatusCode::NO_CONTENT])
            .await
    }

    /// List the versions of every stored template, keyed by template ID
    pub async fn list_pipeline_template_versions(
        &self,
    ) -> Result<HashMap<String, Vec<PipelineTemplateVersion>>> {
        let url = self.endpoint(&["v2", "pipelineTemplates", "versions"])?;
        let response = self
            .send("list_pipeline_template_versions", || {
                self.client.get(url.clone())
            })
            .await?;

        self.handle_response(response, &[StatusCode::OK]).await
    }
}
