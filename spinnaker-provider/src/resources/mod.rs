//! Resource implementations

pub mod pipeline;
pub mod pipeline_template_v2;

pub use pipeline::{PipelineDataSource, PipelineResource};
pub use pipeline_template_v2::PipelineTemplateV2Resource;
