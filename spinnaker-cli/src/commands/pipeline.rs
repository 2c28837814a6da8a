//! Pipeline command handlers
//!
//! Applies, refreshes and destroys a single `spinnaker_pipeline` resource
//! whose state lives in a local file.

use anyhow::{Context, Result, bail};
use clap::Subcommand;
use colored::*;
use spinnaker_provider::{
    DataSource, PipelineDataSource, PipelineResource, PipelineState, Provider, Resource,
};
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::state;

/// Pipeline subcommands
#[derive(Subcommand)]
pub enum PipelineCommands {
    /// Create or update a pipeline
    Apply {
        /// Path to the state file
        #[arg(short, long)]
        state: PathBuf,

        /// Application owning the pipeline (defaults to the stored one)
        #[arg(short, long)]
        application: Option<String>,

        /// Pipeline name (defaults to the stored one)
        #[arg(short, long)]
        name: Option<String>,

        /// Path to the pipeline JSON (defaults to the stored document)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Refresh the stored pipeline from Gate
    Read {
        #[arg(short, long)]
        state: PathBuf,
    },
    /// Delete the pipeline
    Delete {
        #[arg(short, long)]
        state: PathBuf,
    },
    /// Check whether the pipeline exists in Gate
    Exists {
        #[arg(short, long)]
        state: PathBuf,
    },
    /// Look up an existing pipeline without tracking it
    Show {
        #[arg(short, long)]
        application: String,

        #[arg(short, long)]
        name: String,
    },
    /// Compare two pipeline documents the way apply does
    Diff {
        old: PathBuf,
        new: PathBuf,
    },
}

/// What `apply` has to do to reach the desired state
#[derive(Debug, PartialEq, Eq)]
enum Plan {
    Create,
    /// Application or name changed; the old pipeline goes first
    Replace,
    Update,
    /// Nothing to change, only read back
    Refresh,
}

fn plan(prior: Option<&PipelineState>, desired: &PipelineState) -> Plan {
    let Some(prior) = prior.filter(|prior| prior.exists()) else {
        return Plan::Create;
    };

    if prior.application != desired.application || prior.name != desired.name {
        Plan::Replace
    } else if PipelineResource.diff_suppressed(&prior.pipeline, &desired.pipeline) {
        Plan::Refresh
    } else {
        Plan::Update
    }
}

/// Handle pipeline commands
pub async fn handle_pipeline_command(command: PipelineCommands, config: &Config) -> Result<()> {
    match command {
        PipelineCommands::Apply {
            state,
            application,
            name,
            file,
        } => {
            let provider = config.provider()?;
            apply(&provider, &state, application, name, file.as_deref()).await
        }
        PipelineCommands::Read { state } => read(&config.provider()?, &state).await,
        PipelineCommands::Delete { state } => delete(&config.provider()?, &state).await,
        PipelineCommands::Exists { state } => exists(&config.provider()?, &state).await,
        PipelineCommands::Show { application, name } => {
            show(&config.provider()?, application, name).await
        }
        PipelineCommands::Diff { old, new } => diff(&old, &new),
    }
}

async fn apply(
    provider: &Provider,
    path: &Path,
    application: Option<String>,
    name: Option<String>,
    file: Option<&Path>,
) -> Result<()> {
    let prior: Option<PipelineState> = state::load(path)?;

    let application = application
        .or_else(|| prior.as_ref().map(|p| p.application.clone()))
        .context("--application is required for a new pipeline")?;
    let name = name
        .or_else(|| prior.as_ref().map(|p| p.name.clone()))
        .context("--name is required for a new pipeline")?;
    let document = match file {
        Some(file) => state::read_document(file)?,
        None => match &prior {
            Some(prior) => prior.pipeline.clone(),
            None => bail!("--file is required for a new pipeline"),
        },
    };

    let mut desired = PipelineState::new(application, name, document);
    PipelineResource.validate(&desired)?;

    match (plan(prior.as_ref(), &desired), prior) {
        (Plan::Replace, Some(mut prior)) => {
            PipelineResource.delete(provider, &mut prior).await?;
            println!("{}", format!("- Pipeline {} deleted", prior.name).yellow());

            PipelineResource.create(provider, &mut desired).await?;
            print_applied("replaced", &desired);
        }
        (Plan::Update, Some(prior)) => {
            desired.id = prior.id;
            desired.pipeline_id = prior.pipeline_id;

            PipelineResource.update(provider, &mut desired).await?;
            print_applied("updated", &desired);
        }
        (Plan::Refresh, Some(mut prior)) => {
            PipelineResource.read(provider, &mut prior).await?;
            desired = prior;
            println!("{}", "No changes.".dimmed());
        }
        _ => {
            PipelineResource.create(provider, &mut desired).await?;
            print_applied("created", &desired);
        }
    }

    state::save(path, &desired)
}

async fn read(provider: &Provider, path: &Path) -> Result<()> {
    let mut current: PipelineState = state::load_existing(path)?;

    PipelineResource.read(provider, &mut current).await?;
    state::save(path, &current)?;

    if current.exists() {
        print_pipeline_details(&current);
    } else {
        println!(
            "{}",
            format!("Pipeline {} no longer exists.", current.name).yellow()
        );
    }

    Ok(())
}

async fn delete(provider: &Provider, path: &Path) -> Result<()> {
    let mut current: PipelineState = state::load_existing(path)?;

    PipelineResource.delete(provider, &mut current).await?;
    state::save(path, &current)?;

    println!(
        "{}",
        format!("✓ Pipeline {} deleted successfully!", current.name)
            .green()
            .bold()
    );

    Ok(())
}

async fn exists(provider: &Provider, path: &Path) -> Result<()> {
    let current: PipelineState = state::load_existing(path)?;

    if PipelineResource.exists(provider, &current).await? {
        println!("{}", "true".green());
    } else {
        println!("{}", "false".red());
    }

    Ok(())
}

async fn show(provider: &Provider, application: String, name: String) -> Result<()> {
    let mut found = PipelineState::new(application, name, String::new());
    PipelineDataSource.read(provider, &mut found).await?;

    let document: serde_json::Value =
        serde_json::from_str(&found.pipeline).context("Failed to decode pipeline")?;

    print_pipeline_details(&found);
    println!("\n{}", serde_json::to_string_pretty(&document)?);

    Ok(())
}

fn diff(old: &Path, new: &Path) -> Result<()> {
    let old = state::read_document(old)?;
    let new = state::read_document(new)?;

    if PipelineResource.diff_suppressed(&old, &new) {
        println!("{}", "No changes.".green());
    } else {
        println!("{}", "Pipelines differ.".yellow());
    }

    Ok(())
}

fn print_applied(action: &str, state: &PipelineState) {
    println!(
        "{}",
        format!("✓ Pipeline {} successfully!", action).green().bold()
    );
    print_pipeline_details(state);
}

fn print_pipeline_details(state: &PipelineState) {
    println!("  ID:          {}", state.pipeline_id.cyan());
    println!("  Application: {}", state.application);
    println!("  Name:        {}", state.name.bold());
}
