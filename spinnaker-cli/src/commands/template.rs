//! Pipeline template command handlers

use anyhow::{Context, Result, bail};
use clap::Subcommand;
use colored::*;
use spinnaker_core::domain::template::parse_pipeline_template_v2;
use spinnaker_provider::{PipelineTemplateState, PipelineTemplateV2Resource, Provider, Resource};
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::state;

/// Pipeline template subcommands
#[derive(Subcommand)]
pub enum TemplateCommands {
    /// Create or update a V2 pipeline template
    Apply {
        /// Path to the state file
        #[arg(short, long)]
        state: PathBuf,

        /// Template ID (defaults to the stored one)
        #[arg(short, long)]
        template_id: Option<String>,

        /// Path to the template JSON (defaults to the stored document)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Refresh the stored template from Gate
    Read {
        #[arg(short, long)]
        state: PathBuf,
    },
    /// Delete every version of the template
    Delete {
        #[arg(short, long)]
        state: PathBuf,
    },
    /// Check whether the template exists in Gate
    Exists {
        #[arg(short, long)]
        state: PathBuf,
    },
    /// Validate a template document without contacting Gate
    Validate {
        file: PathBuf,
    },
}

/// Handle pipeline template commands
pub async fn handle_template_command(command: TemplateCommands, config: &Config) -> Result<()> {
    match command {
        TemplateCommands::Apply {
            state,
            template_id,
            file,
        } => apply(&config.provider()?, &state, template_id, file.as_deref()).await,
        TemplateCommands::Read { state } => read(&config.provider()?, &state).await,
        TemplateCommands::Delete { state } => delete(&config.provider()?, &state).await,
        TemplateCommands::Exists { state } => exists(&config.provider()?, &state).await,
        TemplateCommands::Validate { file } => validate(&file),
    }
}

async fn apply(
    provider: &Provider,
    path: &Path,
    template_id: Option<String>,
    file: Option<&Path>,
) -> Result<()> {
    let prior: Option<PipelineTemplateState> =
        state::load::<PipelineTemplateState>(path)?.filter(|prior| prior.exists());

    let template_id = template_id
        .or_else(|| prior.as_ref().map(|p| p.template_id.clone()))
        .context("--template-id is required for a new template")?;
    let document = match (file, &prior) {
        (Some(file), _) => state::read_document(file)?,
        (None, Some(prior)) => prior.template.clone(),
        (None, None) => bail!("--file is required for a new template"),
    };

    let mut desired = PipelineTemplateState::new(template_id, document);
    PipelineTemplateV2Resource.validate(&desired)?;

    match prior {
        Some(mut prior) if prior.template_id != desired.template_id => {
            PipelineTemplateV2Resource.delete(provider, &mut prior).await?;
            println!(
                "{}",
                format!("- Template {} deleted", prior.template_id).yellow()
            );

            PipelineTemplateV2Resource.create(provider, &mut desired).await?;
            print_applied("replaced", &desired);
        }
        Some(mut prior)
            if PipelineTemplateV2Resource.diff_suppressed(&prior.template, &desired.template) =>
        {
            PipelineTemplateV2Resource.read(provider, &mut prior).await?;
            desired = prior;
            println!("{}", "No changes.".dimmed());
        }
        Some(prior) => {
            desired.id = prior.id;
            PipelineTemplateV2Resource.update(provider, &mut desired).await?;
            print_applied("updated", &desired);
        }
        None => {
            PipelineTemplateV2Resource.create(provider, &mut desired).await?;
            print_applied("created", &desired);
        }
    }

    state::save(path, &desired)
}

async fn read(provider: &Provider, path: &Path) -> Result<()> {
    let mut current: PipelineTemplateState = state::load_existing(path)?;

    PipelineTemplateV2Resource.read(provider, &mut current).await?;
    state::save(path, &current)?;

    if current.exists() {
        print_template_details(&current);
    } else {
        println!(
            "{}",
            format!("Template {} no longer exists.", current.template_id).yellow()
        );
    }

    Ok(())
}

async fn delete(provider: &Provider, path: &Path) -> Result<()> {
    let mut current: PipelineTemplateState = state::load_existing(path)?;

    PipelineTemplateV2Resource.delete(provider, &mut current).await?;
    state::save(path, &current)?;

    println!(
        "{}",
        format!("✓ Template {} deleted successfully!", current.template_id)
            .green()
            .bold()
    );

    Ok(())
}

async fn exists(provider: &Provider, path: &Path) -> Result<()> {
    let current: PipelineTemplateState = state::load_existing(path)?;

    if PipelineTemplateV2Resource.exists(provider, &current).await? {
        println!("{}", "true".green());
    } else {
        println!("{}", "false".red());
    }

    Ok(())
}

fn validate(file: &Path) -> Result<()> {
    let document = state::read_document(file)?;
    let template = parse_pipeline_template_v2(&document)?;

    println!("{}", "✓ Template is valid".green().bold());
    println!("  Name:   {}", template.metadata.name.bold());
    if !template.variables.is_empty() {
        println!("  Variables:");
        for variable in &template.variables {
            println!("    - {}: {}", variable.name.cyan(), variable.variable_type.dimmed());
        }
    }

    Ok(())
}

fn print_applied(action: &str, state: &PipelineTemplateState) {
    println!(
        "{}",
        format!("✓ Template {} successfully!", action).green().bold()
    );
    print_template_details(state);
}

fn print_template_details(state: &PipelineTemplateState) {
    println!("  ID:        {}", state.template_id.cyan());
    println!("  Reference: {}", state.reference);
}
