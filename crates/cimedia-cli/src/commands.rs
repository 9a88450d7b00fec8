//! Subcommands

use anyhow::{Context, Result};
use crate::settings::CliSettings;
use cimedia_client::{
    authenticate, AssetRecord, CiClient, UploadLog, UploadProgress, DEFAULT_LIST_LIMIT,
};
use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in and print an access token
    Login,

    /// Upload files into the workspace, logging each committed upload
    Upload {
        /// Files to upload
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Tab-separated log that receives one line per upload
        #[arg(short, long, default_value = "uploads.log", env = "CIMEDIA_UPLOAD_LOG")]
        log: PathBuf,
    },

    /// Print one window of the workspace as JSON lines
    List {
        #[arg(short, long, default_value_t = DEFAULT_LIST_LIMIT)]
        limit: u32,

        #[arg(short, long, default_value_t = 0)]
        offset: u64,
    },

    /// Print item names in the first window
    Names,

    /// Print every item in the workspace as JSON lines
    Walk,

    /// Print full metadata for one asset
    Detail { asset_id: String },

    /// Print selected fields for several assets
    Details {
        #[arg(required = true)]
        asset_ids: Vec<String>,

        /// Comma separated field names
        #[arg(short, long, value_delimiter = ',', default_value = "name,size")]
        fields: Vec<String>,
    },

    /// Delete assets
    Delete {
        #[arg(required = true)]
        asset_ids: Vec<String>,
    },
}

/// Log in (unless the settings already carry a token) and run `command`
pub async fn run(settings: &CliSettings, command: Command) -> Result<()> {
    let config = settings.client_config();
    let token = match &settings.access_token {
        Some(token) => token.clone(),
        None => {
            let credentials = settings.credentials()?;
            authenticate(&config, &credentials)
                .await
                .context("Login failed")?
                .access_token
        }
    };

    let client = CiClient::new(config.with_token(token))?;
    execute(&client, command).await
}

/// Run a command against an authenticated client
pub async fn execute(client: &CiClient, command: Command) -> Result<()> {
    match command {
        Command::Login => {
            println!("{}", client.config().access_token.as_deref().unwrap_or_default());
        }
        Command::Upload { files, log } => {
            let uploader = client.uploader().with_progress(Box::new(report_progress));
            let upload_log = UploadLog::open(&log)
                .await
                .with_context(|| format!("Cannot open upload log {}", log.display()))?;
            for file in files {
                let asset_id = uploader
                    .upload(&file, &upload_log)
                    .await
                    .with_context(|| format!("Upload of {} failed", file.display()))?;
                println!("{}\t{}", file.display(), asset_id);
            }
        }
        Command::List { limit, offset } => {
            for record in client.list(limit, offset).await? {
                print_record(&record)?;
            }
        }
        Command::Names => {
            for name in client.list_names().await? {
                println!("{}", name);
            }
        }
        Command::Walk => {
            let mut pager = client.pager();
            while let Some(record) = pager.next().await? {
                print_record(&record)?;
            }
            tracing::debug!("Walked workspace in {} pages", pager.pages_fetched());
        }
        Command::Detail { asset_id } => {
            let detail = client
                .detail(&asset_id)
                .await
                .with_context(|| format!("No detail for {}", asset_id))?;
            println!("{}", serde_json::to_string_pretty(&detail)?);
        }
        Command::Details { asset_ids, fields } => {
            let details = client.multi_details(&asset_ids, &fields).await?;
            println!("{}", serde_json::to_string_pretty(&details)?);
        }
        Command::Delete { asset_ids } => {
            for asset_id in asset_ids {
                client
                    .delete(&asset_id)
                    .await
                    .with_context(|| format!("Delete of {} failed", asset_id))?;
                tracing::info!("Deleted {}", asset_id);
            }
        }
    }
    Ok(())
}

fn print_record(record: &AssetRecord) -> Result<()> {
    println!("{}", serde_json::to_string(record)?);
    Ok(())
}

fn report_progress(progress: UploadProgress) {
    tracing::info!(
        "Progress: {:.1}% - Part {}/{}",
        progress.percentage(),
        progress.current_part,
        progress.total_parts
    );
}
