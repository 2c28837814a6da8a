//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod pipeline;
mod template;

pub use pipeline::PipelineCommands;
pub use template::TemplateCommands;

use anyhow::Result;
use clap::Subcommand;
use tracing::debug;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Pipeline management (spinnaker_pipeline)
    Pipeline {
        #[command(subcommand)]
        command: PipelineCommands,
    },
    /// V2 pipeline template management (spinnaker_pipeline_template_v2)
    Template {
        #[command(subcommand)]
        command: TemplateCommands,
    },
}

/// Route the command to the appropriate handler module
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    debug!(server = %config.server, config_path = ?config.config_path, "Running command");

    match command {
        Commands::Pipeline { command } => pipeline::handle_pipeline_command(command, config).await,
        Commands::Template { command } => template::handle_template_command(command, config).await,
    }
}
