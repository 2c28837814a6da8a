//! Spinnaker Core
//!
//! Document types and pure reconciliation logic for the Spinnaker provider.
//!
//! This crate contains:
//! - Domain types: pipeline documents, V2 pipeline templates and their versions
//! - Normalization: stripping Gate-managed fields before documents are stored or compared
//! - Validation: aggregated checks on user-supplied template documents
//!
//! Nothing in here performs I/O; the HTTP side lives in `spinnaker-client`.

pub mod domain;
pub mod json;

pub use domain::pipeline::{PipelineDocument, PipelineError};
pub use domain::template::{
    PipelineTemplateV2, PipelineTemplateVersion, TemplateError, TemplateMetadata,
    TemplateVariable, ValidationErrors, VersionSelector,
};
