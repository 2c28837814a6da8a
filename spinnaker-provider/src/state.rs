//! Persisted resource state
//!
//! An empty `id` means the resource does not exist (or no longer does);
//! the host drops such resources from its state.

use serde::{Deserialize, Serialize};

/// State of a `spinnaker_pipeline` resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineState {
    #[serde(default)]
    pub id: String,
    /// Owning application (changing it forces a new resource)
    pub application: String,
    /// Pipeline name (changing it forces a new resource)
    pub name: String,
    /// Pipeline JSON; normalized after every read
    pub pipeline: String,
    /// ID assigned by Gate
    #[serde(default)]
    pub pipeline_id: String,
}

impl PipelineState {
    pub fn new(
        application: impl Into<String>,
        name: impl Into<String>,
        pipeline: impl Into<String>,
    ) -> Self {
        Self {
            application: application.into(),
            name: name.into(),
            pipeline: pipeline.into(),
            ..Default::default()
        }
    }

    pub fn exists(&self) -> bool {
        !self.id.is_empty()
    }
}

/// State of a `spinnaker_pipeline_template_v2` resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineTemplateState {
    #[serde(default)]
    pub id: String,
    /// ID of the template (changing it forces a new resource)
    pub template_id: String,
    /// Template JSON, without its `id` field
    pub template: String,
    /// URI for referencing the template in a pipeline instance
    #[serde(default)]
    pub reference: String,
}

impl PipelineTemplateState {
    pub fn new(template_id: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            template_id: template_id.into(),
            template: template.into(),
            ..Default::default()
        }
    }

    pub fn exists(&self) -> bool {
        !self.id.is_empty()
    }
}
