//! Single-shot and multipart uploads
//!
//! Small files go up in one multipart-form POST. Large files use a
//! three-phase protocol: initiate (which assigns the asset id), one PUT per
//! chunk in ascending part order, then complete. Any failure aborts the
//! whole upload and nothing is logged.
//!
//! Two limitations are inherent to the remote protocol:
//! - a failed or dropped multipart transfer cannot be resumed; retrying
//!   allocates a new asset id and the partial asset stays behind;
//! - if the transfer commits but the follow-up detail fetch fails, the
//!   upload is reported as failed even though the asset exists unlogged.

use crate::{
    config::Config,
    directory::AssetDirectory,
    transport::Transport,
    types::{AssetIdResponse, AssetRecord, InitiateMultipartRequest, SingleUploadMetadata},
    upload_log::{LogRecord, UploadLog},
    ClientError, Result,
};
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use std::io;
use std::path::Path;
use std::sync::Arc;
use tokio::{fs::File, io::AsyncReadExt};
use tracing::{debug, info, instrument, warn};

const OCTET_STREAM: &str = "application/octet-stream";
const SINGLE_UPLOAD_PATH: &str = "/upload";
const MULTIPART_UPLOAD_PATH: &str = "/upload/multipart";

/// Progress callback type
pub type ProgressCallback = Box<dyn Fn(UploadProgress) + Send + Sync>;

/// Upload progress information
#[derive(Clone, Debug)]
pub struct UploadProgress {
    /// Bytes uploaded so far
    pub bytes_uploaded: u64,
    /// Total bytes to upload
    pub total_bytes: u64,
    /// Current part number
    pub current_part: u32,
    /// Total number of parts
    pub total_parts: u32,
}

impl UploadProgress {
    /// Get percentage complete
    pub fn percentage(&self) -> f64 {
        if self.total_bytes == 0 {
            return 100.0;
        }
        (self.bytes_uploaded as f64 / self.total_bytes as f64) * 100.0
    }
}

/// How a file's bytes are sent
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransferStrategy {
    /// One multipart-form POST
    Single,
    /// Initiate, N part PUTs, complete
    Multipart,
}

impl TransferStrategy {
    /// Pick the strategy for a file of `size` bytes
    pub fn select(size: u64, config: &Config) -> Self {
        if config
            .threshold_policy
            .is_multipart(size, config.multipart_threshold)
        {
            Self::Multipart
        } else {
            Self::Single
        }
    }
}

/// Number of parts a multipart transfer of `size` bytes sends; `None` for a
/// zero chunk size
pub fn part_count(size: u64, chunk_size: u64) -> Option<u64> {
    (chunk_size != 0).then(|| size.div_ceil(chunk_size))
}

/// Where a multipart transaction stands
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UploadState {
    /// Sending parts; `part` is how many have been accepted so far
    Uploading { part: u32 },
    /// All bytes sent, waiting on the complete call
    Completing,
    /// Remote asset committed
    Done,
}

/// What a successful upload produced
#[derive(Clone, Debug)]
pub struct UploadReceipt {
    pub asset_id: String,
    pub strategy: TransferStrategy,
    /// Bytes sent
    pub size: u64,
    /// Requests that carried file bytes (1 for single-shot)
    pub parts: u32,
    /// Detail metadata fetched after the transfer
    pub detail: AssetRecord,
}

/// Drives uploads into the configured workspace and logs each one.
pub struct Uploader {
    transport: Arc<Transport>,
    directory: AssetDirectory,
    progress: Option<ProgressCallback>,
}

impl Uploader {
    pub fn new(transport: Arc<Transport>) -> Self {
        let directory = AssetDirectory::new(Arc::clone(&transport));
        Self {
            transport,
            directory,
            progress: None,
        }
    }

    /// Report progress after every transferred part
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    /// Upload `file_path` and append a record to `log`; returns the asset id
    pub async fn upload(&self, file_path: impl AsRef<Path>, log: &UploadLog) -> Result<String> {
        Ok(self.upload_with_receipt(file_path, log).await?.asset_id)
    }

    /// Like [`upload`](Self::upload) but reports how the transfer went
    #[instrument(skip(self, file_path, log), fields(path = %file_path.as_ref().display()))]
    pub async fn upload_with_receipt(
        &self,
        file_path: impl AsRef<Path>,
        log: &UploadLog,
    ) -> Result<UploadReceipt> {
        let path = file_path.as_ref();
        let name = file_name(path)?;
        let metadata = tokio::fs::metadata(path).await?;
        if !metadata.is_file() {
            return Err(ClientError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a regular file", path.display()),
            )));
        }
        let size = metadata.len();
        let strategy = TransferStrategy::select(size, self.transport.config());
        debug!(size, ?strategy, "Selected transfer strategy");

        let (asset_id, parts) = match strategy {
            TransferStrategy::Single => (self.single_upload(path, &name, size).await?, 1),
            TransferStrategy::Multipart => self.multipart_upload(path, &name, size).await?,
        };

        let detail = match self.directory.get_detail(&asset_id).await {
            Ok(detail) => detail,
            Err(e) => {
                warn!(%asset_id, error = %e, "Upload committed but detail fetch failed; not logged");
                return Err(e);
            }
        };

        log.append(&LogRecord::new(name.as_str(), asset_id.as_str(), &detail))
            .await?;
        info!(%asset_id, size, parts, "Upload committed");

        Ok(UploadReceipt {
            asset_id,
            strategy,
            size,
            parts,
            detail,
        })
    }

    async fn single_upload(&self, path: &Path, name: &str, size: u64) -> Result<String> {
        let content = tokio::fs::read(path).await?;
        let metadata = serde_json::to_string(&SingleUploadMetadata {
            workspace_id: &self.transport.config().workspace_id,
        })?;

        let form = Form::new()
            .part("filename", Part::bytes(content).file_name(name.to_string()))
            .text("metadata", metadata);

        let url = self.transport.io_url(SINGLE_UPLOAD_PATH);
        let body = self.transport.post_form(&url, form).await?;
        let asset_id = asset_id_from(body)?;

        self.report(UploadProgress {
            bytes_uploaded: size,
            total_bytes: size,
            current_part: 1,
            total_parts: 1,
        });

        Ok(asset_id)
    }

    async fn multipart_upload(&self, path: &Path, name: &str, size: u64) -> Result<(String, u32)> {
        let mut file = File::open(path).await?;
        let chunk_size = self.transport.config().multipart_chunk_size;
        let total_parts = part_count(size, chunk_size)
            .ok_or_else(|| ClientError::Config("multipart chunk size must be non-zero".to_string()))?
            as u32;

        let mut txn = MultipartTransaction::initiate(&self.transport, name, size).await?;
        let mut bytes_uploaded = 0u64;

        while txn.state != UploadState::Done {
            if let Some(sent) = txn.advance(&mut file, chunk_size).await? {
                bytes_uploaded += sent;
                if let UploadState::Uploading { part } = txn.state {
                    self.report(UploadProgress {
                        bytes_uploaded,
                        total_bytes: size,
                        current_part: part,
                        total_parts,
                    });
                }
            }
        }

        Ok((txn.asset_id, txn.parts_sent))
    }

    fn report(&self, progress: UploadProgress) {
        if let Some(ref cb) = self.progress {
            cb(progress);
        }
    }
}

/// State of one in-flight multipart upload. Lives only for the duration of
/// a single [`Uploader::upload`] call.
struct MultipartTransaction<'a> {
    transport: &'a Transport,
    asset_id: String,
    state: UploadState,
    parts_sent: u32,
}

impl<'a> MultipartTransaction<'a> {
    async fn initiate(transport: &'a Transport, name: &str, size: u64) -> Result<Self> {
        let request = InitiateMultipartRequest {
            name,
            size,
            workspace_id: &transport.config().workspace_id,
        };
        let url = transport.io_url(MULTIPART_UPLOAD_PATH);
        let body = transport.post_json(&url, &request).await?;
        let asset_id = asset_id_from(body)?;
        debug!(%asset_id, "Initiated multipart upload");

        Ok(Self {
            transport,
            asset_id,
            state: UploadState::Uploading { part: 0 },
            parts_sent: 0,
        })
    }

    /// Run one step of the protocol. Returns the bytes sent when the step
    /// transferred a part.
    async fn advance(&mut self, file: &mut File, chunk_size: u64) -> Result<Option<u64>> {
        match self.state {
            UploadState::Uploading { part } => {
                let chunk = read_chunk(file, chunk_size).await?;
                if chunk.is_empty() {
                    self.state = UploadState::Completing;
                    return Ok(None);
                }
                let sent = chunk.len() as u64;
                self.put_part(part + 1, chunk).await?;
                self.parts_sent = part + 1;
                self.state = UploadState::Uploading { part: part + 1 };
                Ok(Some(sent))
            }
            UploadState::Completing => {
                let url = self.transport.io_url(&format!(
                    "{}/{}/complete",
                    MULTIPART_UPLOAD_PATH, self.asset_id
                ));
                self.transport.post_empty(&url).await?;
                self.state = UploadState::Done;
                Ok(None)
            }
            UploadState::Done => Ok(None),
        }
    }

    async fn put_part(&self, part_number: u32, chunk: Bytes) -> Result<()> {
        let url = self.transport.io_url(&format!(
            "{}/{}/{}",
            MULTIPART_UPLOAD_PATH, self.asset_id, part_number
        ));
        debug!(part_number, len = chunk.len(), "Uploading part");
        self.transport.put_bytes(&url, chunk, OCTET_STREAM).await?;
        Ok(())
    }
}

/// Read up to `chunk_size` bytes from the current offset
async fn read_chunk(file: &mut File, chunk_size: u64) -> Result<Bytes> {
    let mut buf = Vec::with_capacity(chunk_size.min(usize::MAX as u64) as usize);
    file.take(chunk_size).read_to_end(&mut buf).await?;
    Ok(Bytes::from(buf))
}

fn asset_id_from(body: Value) -> Result<String> {
    let parsed: AssetIdResponse = serde_json::from_value(body)?;
    parsed
        .asset_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ClientError::InvalidResponse("Missing assetId".to_string()))
}

fn file_name(path: &Path) -> Result<String> {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| {
            ClientError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} has no file name", path.display()),
            ))
        })
}
