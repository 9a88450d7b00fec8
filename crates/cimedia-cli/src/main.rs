//! cimedia - Ci media cloud command-line client

use anyhow::Context;
use cimedia_cli::{run, CliSettings, Command};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "cimedia")]
#[command(about = "Browse, inspect and upload to a Ci media cloud workspace")]
#[command(version)]
struct Args {
    /// YAML credentials file
    #[arg(short, long, default_value = "ci.yml", env = "CIMEDIA_SETTINGS")]
    settings: PathBuf,

    /// Override the workspace from the settings file
    #[arg(short, long, env = "CIMEDIA_WORKSPACE")]
    workspace: Option<String>,

    /// Enable debug logging
    #[arg(short, long, env = "CIMEDIA_DEBUG")]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Logs go to stderr so command output stays pipeable
    let log_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("cimedia={0},cimedia_cli={0},cimedia_client={0}", log_level).into()
    });
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut settings = CliSettings::load(&args.settings)
        .with_context(|| format!("Loading {}", args.settings.display()))?;
    if let Some(workspace) = args.workspace {
        settings.workspace_id = workspace;
    }
    tracing::debug!("Using workspace {}", settings.workspace_id);

    run(&settings, args.command).await
}
