//! Spinnaker provider CLI
//!
//! Drives the pipeline and pipeline template resources against Gate from
//! the command line, keeping resource state in a local JSON file.

mod commands;
mod config;
mod state;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use spinnaker_provider::config::{CONFIG_PATH_ENV, GATE_URL_ENV};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "spinnaker-tf")]
#[command(about = "Manage Spinnaker pipelines and pipeline templates", long_about = None)]
struct Cli {
    /// URL for Spinnaker Gate
    #[arg(long, env = GATE_URL_ENV, default_value = "")]
    server: String,

    /// Path to the spin config file
    #[arg(long, env = CONFIG_PATH_ENV)]
    config: Option<PathBuf>,

    /// Ignore certificate errors from Gate
    #[arg(long)]
    ignore_cert_errors: bool,

    /// Headers passed on each request, e.g. "X-Team=infra,X-Env=prod"
    #[arg(long, default_value = "")]
    default_headers: String,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so command output stays pipeable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "spinnaker_cli=info,spinnaker_provider=info,spinnaker_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config {
        server: cli.server,
        config_path: cli.config,
        ignore_cert_errors: cli.ignore_cert_errors,
        default_headers: cli.default_headers,
    };

    handle_command(cli.command, &config).await
}
