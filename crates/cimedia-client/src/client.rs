//! Main client implementation

use crate::{
    directory::AssetDirectory,
    pager::WorkspacePager,
    transport::Transport,
    types::{AssetRecord, WORKSPACE_SELF_NAME},
    upload::{UploadReceipt, Uploader},
    upload_log::UploadLog,
    Config, Result,
};
use futures::Stream;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::instrument;

/// Default window for one-shot listings
pub const DEFAULT_LIST_LIMIT: u32 = 50;

/// Ci workspace client.
///
/// Every operation object it hands out shares one [`Transport`], and
/// through it one immutable [`Config`].
#[derive(Clone, Debug)]
pub struct CiClient {
    transport: Arc<Transport>,
}

impl CiClient {
    /// Create a new client with the given configuration
    pub fn new(config: Config) -> Result<Self> {
        let transport = Arc::new(Transport::new(config)?);
        Ok(Self { transport })
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        self.transport.config()
    }

    /// Metadata operations
    pub fn directory(&self) -> AssetDirectory {
        AssetDirectory::new(Arc::clone(&self.transport))
    }

    /// Upload coordinator, for callers that want progress reporting
    pub fn uploader(&self) -> Uploader {
        Uploader::new(Arc::clone(&self.transport))
    }

    // ==================== Upload ====================

    /// Upload a file into the workspace and log it; small and large files
    /// are handled alike from the caller's side
    pub async fn upload(
        &self,
        file_path: impl AsRef<Path>,
        log_path: impl AsRef<Path>,
    ) -> Result<String> {
        Ok(self.upload_with_receipt(file_path, log_path).await?.asset_id)
    }

    /// Upload and report strategy, part count and fetched detail
    pub async fn upload_with_receipt(
        &self,
        file_path: impl AsRef<Path>,
        log_path: impl AsRef<Path>,
    ) -> Result<UploadReceipt> {
        let log = UploadLog::open(log_path).await?;
        self.uploader().upload_with_receipt(file_path, &log).await
    }

    // ==================== Listing ====================

    /// Names of items in the first window, without the workspace's own entry.
    /// May include directories.
    #[instrument(skip(self))]
    pub async fn list_names(&self) -> Result<Vec<String>> {
        let items = self.list(DEFAULT_LIST_LIMIT, 0).await?;
        Ok(items
            .iter()
            .filter_map(AssetRecord::name)
            .filter(|name| *name != WORKSPACE_SELF_NAME)
            .map(str::to_string)
            .collect())
    }

    /// Full metadata for one window of items
    pub async fn list(&self, limit: u32, offset: u64) -> Result<Vec<AssetRecord>> {
        self.directory().list_page(limit, offset).await
    }

    /// Pager over every item in the workspace
    pub fn pager(&self) -> WorkspacePager {
        WorkspacePager::new(self.directory())
    }

    /// Every item in the workspace as a stream
    pub fn each(&self) -> impl Stream<Item = Result<AssetRecord>> {
        self.pager().into_stream()
    }

    // ==================== Metadata ====================

    /// Delete an asset
    pub async fn delete(&self, asset_id: &str) -> Result<()> {
        self.directory().delete(asset_id).await
    }

    /// Detailed metadata for an asset
    pub async fn detail(&self, asset_id: &str) -> Result<AssetRecord> {
        self.directory().get_detail(asset_id).await
    }

    /// Selected fields for several assets, keyed by asset id
    pub async fn multi_details(
        &self,
        asset_ids: &[String],
        fields: &[String],
    ) -> Result<HashMap<String, AssetRecord>> {
        self.directory().get_details_bulk(asset_ids, fields).await
    }
}
