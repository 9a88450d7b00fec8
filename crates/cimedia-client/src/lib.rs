//! # Ci Media Cloud Client
//!
//! A client for the Ci media cloud REST API: log in, browse a workspace,
//! read or delete asset metadata, and upload files of any size with a local
//! append-only record of every committed upload.
//!
//! ## Example
//!
//! ```rust,ignore
//! use cimedia_client::{authenticate, CiClient, Config, Credentials};
//! use futures::TryStreamExt;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::new("my-workspace-id");
//!     let token = authenticate(&config, &credentials).await?;
//!     let client = CiClient::new(config.with_token(token.access_token))?;
//!
//!     // Files of 5 MiB or more go through the multipart protocol
//!     let asset_id = client.upload("movie.mov", "uploads.log").await?;
//!
//!     // Walk the whole workspace five records at a time
//!     let names: Vec<_> = client
//!         .each()
//!         .map_ok(|asset| asset.name().unwrap_or_default().to_string())
//!         .try_collect()
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

mod auth;
mod client;
mod config;
mod directory;
mod error;
mod pager;
mod transport;
mod types;
mod upload;
mod upload_log;

pub use auth::{authenticate, AccessToken, Credentials};
pub use client::{CiClient, DEFAULT_LIST_LIMIT};
pub use config::{
    Config, ThresholdPolicy, CHUNK_SIZE, DEFAULT_API_ENDPOINT, DEFAULT_IO_ENDPOINT, SIZE_THRESHOLD,
};
pub use directory::AssetDirectory;
pub use error::{ClientError, Result};
pub use pager::{WorkspacePager, PAGE_WINDOW};
pub use transport::Transport;
pub use types::{AssetRecord, WorkspaceContents, WORKSPACE_SELF_NAME};
pub use upload::{
    part_count, ProgressCallback, TransferStrategy, UploadProgress, UploadReceipt, UploadState,
    Uploader,
};
pub use upload_log::{LogRecord, UploadLog};
