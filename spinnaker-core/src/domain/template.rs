//! V2 pipeline templates
//!
//! See <https://spinnaker.io/reference/pipeline/templates/> for the
//! document format. Templates are versioned by Gate independently of the
//! document content, so a single template ID can map to several deletable
//! versions.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Schema tag every V2 template must carry
pub const TEMPLATE_SCHEMA_V2: &str = "v2";

/// Treat an explicit `null` like an absent field, so it is reported by
/// [`PipelineTemplateV2::validate`] instead of failing to decode
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// V2 pipeline template document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineTemplateV2 {
    /// Assigned from the resource's template ID, never by the user
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: TemplateMetadata,
    /// Opaque pipeline body
    #[serde(default)]
    pub pipeline: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protect: Option<bool>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub schema: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub variables: Vec<TemplateVariable>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateMetadata {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub scopes: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateVariable {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        rename = "defaultValue",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub default_value: Option<Value>,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub variable_type: String,
}

/// One addressable version of a stored template, as returned by the
/// versions listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineTemplateVersion {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub digest: String,
    #[serde(default)]
    pub tag: String,
}

/// How a delete request picks a template version. Gate accepts a digest
/// or a tag, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSelector {
    Digest(String),
    Tag(String),
    /// Neither is known; Gate deletes the untagged version
    Latest,
}

impl PipelineTemplateVersion {
    /// Selector for deleting this version, preferring the digest
    pub fn selector(&self) -> VersionSelector {
        if !self.digest.is_empty() {
            VersionSelector::Digest(self.digest.clone())
        } else if !self.tag.is_empty() {
            VersionSelector::Tag(self.tag.clone())
        } else {
            VersionSelector::Latest
        }
    }
}

/// Every violation found in a template, reported together
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<String>);

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let noun = if self.0.len() == 1 { "error" } else { "errors" };
        writeln!(f, "{} {} occurred:", self.0.len(), noun)?;
        for error in &self.0 {
            writeln!(f, "\t* {}", error)?;
        }
        writeln!(f)
    }
}

impl std::error::Error for ValidationErrors {}

/// Errors raised while handling template documents
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("invalid template json: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("invalid template: {0}")]
    Invalid(#[from] ValidationErrors),

    #[error("failed to marshal template: {0}")]
    Encode(#[source] serde_json::Error),
}

impl PipelineTemplateV2 {
    /// Check the document, collecting every violation
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = Vec::new();

        if !self.id.is_empty() {
            errors.push("field 'id' must not be set as they will be computed".to_string());
        }

        if self.schema != TEMPLATE_SCHEMA_V2 {
            errors.push(format!(
                "field 'schema' must be set to '{}'",
                TEMPLATE_SCHEMA_V2
            ));
        }

        if self.pipeline.is_none() {
            errors.push("field 'pipeline' missing".to_string());
        }

        if self.metadata.name.is_empty() {
            errors.push("field 'metadata.name' must not be empty".to_string());
        }

        if self.metadata.description.is_empty() {
            errors.push("field 'metadata.description' must not be empty".to_string());
        }

        if self.metadata.scopes.is_empty() {
            errors.push("field 'metadata.scopes' must contain at least one scope".to_string());
        }

        for (i, variable) in self.variables.iter().enumerate() {
            if variable.name.is_empty() {
                errors.push(format!("field 'variables[{}].name' must not be empty", i));
            }

            if variable.variable_type.is_empty() {
                errors.push(format!("field 'variables[{}].type' must not be empty", i));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(errors))
        }
    }

    /// Encode the document as stored in resource state
    pub fn to_json(&self) -> Result<String, TemplateError> {
        serde_json::to_string(self).map_err(TemplateError::Encode)
    }
}

/// Parse and validate a user-supplied template
pub fn parse_pipeline_template_v2(raw: &str) -> Result<PipelineTemplateV2, TemplateError> {
    let template: PipelineTemplateV2 =
        serde_json::from_str(raw).map_err(TemplateError::InvalidJson)?;

    template.validate()?;

    Ok(template)
}

/// URI a pipeline uses to reference a stored template
pub fn template_reference(template_id: &str) -> String {
    format!("spinnaker://{}", template_id)
}
