//! Stateless asset metadata operations

use crate::{
    transport::Transport,
    types::{AssetRecord, BulkDetailsRequest, BulkDetailsResponse, WorkspaceContents},
    ClientError, Result,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::instrument;

/// Detail, bulk detail, delete and single-page listing.
#[derive(Clone, Debug)]
pub struct AssetDirectory {
    transport: Arc<Transport>,
}

impl AssetDirectory {
    pub fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    /// Full metadata for one asset
    #[instrument(skip(self))]
    pub async fn get_detail(&self, asset_id: &str) -> Result<AssetRecord> {
        let url = self.transport.api_url(&format!("/assets/{}", asset_id));
        let body = self.transport.get(&url, None).await?;
        into_record(body)
    }

    /// Metadata for several assets, restricted to `fields`, keyed by asset id
    #[instrument(skip(self))]
    pub async fn get_details_bulk(
        &self,
        asset_ids: &[String],
        fields: &[String],
    ) -> Result<HashMap<String, AssetRecord>> {
        let url = self.transport.api_url("/assets/details/bulk");
        let request = BulkDetailsRequest { asset_ids, fields };
        let body = self.transport.post_json(&url, &request).await?;
        let parsed: BulkDetailsResponse = serde_json::from_value(body)?;
        Ok(parsed.into_map())
    }

    /// Delete an asset
    #[instrument(skip(self))]
    pub async fn delete(&self, asset_id: &str) -> Result<()> {
        let url = self.transport.api_url(&format!("/assets/{}", asset_id));
        self.transport.delete(&url).await
    }

    /// One window of the configured workspace's contents
    #[instrument(skip(self))]
    pub async fn list_page(&self, limit: u32, offset: u64) -> Result<Vec<AssetRecord>> {
        let workspace_id = &self.transport.config().workspace_id;
        let url = self
            .transport
            .api_url(&format!("/workspaces/{}/contents", workspace_id));
        let query = [("limit", limit.to_string()), ("offset", offset.to_string())];
        let body = self.transport.get(&url, Some(&query)).await?;
        let contents: WorkspaceContents = serde_json::from_value(body)?;
        Ok(contents.items)
    }
}

fn into_record(body: serde_json::Value) -> Result<AssetRecord> {
    match body {
        serde_json::Value::Object(fields) => Ok(AssetRecord::new(fields)),
        other => Err(ClientError::InvalidResponse(format!(
            "Expected asset object, got {}",
            other
        ))),
    }
}
