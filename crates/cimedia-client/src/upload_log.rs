//! Append-only record of committed uploads

use crate::{types::AssetRecord, Result};
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tokio::{
    fs::{File, OpenOptions},
    io::AsyncWriteExt,
    sync::Mutex,
};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// One line of the upload log
#[derive(Clone, Debug, PartialEq)]
pub struct LogRecord {
    pub timestamp: DateTime<Local>,
    /// Base name of the uploaded local file
    pub filename: String,
    pub asset_id: String,
    /// Detail metadata serialized onto one line
    pub detail: String,
}

impl LogRecord {
    /// Record stamped with the current time
    pub fn new(filename: impl Into<String>, asset_id: impl Into<String>, detail: &AssetRecord) -> Self {
        Self {
            timestamp: Local::now(),
            filename: filename.into(),
            asset_id: asset_id.into(),
            detail: detail.to_single_line(),
        }
    }

    /// Tab-separated line, newline terminated
    pub fn to_line(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}\n",
            self.timestamp.format(TIMESTAMP_FORMAT),
            clean_field(&self.filename),
            clean_field(&self.asset_id),
            clean_field(&self.detail),
        )
    }
}

/// Tabs and newlines inside a field would break the line format
fn clean_field(field: &str) -> String {
    field.replace(['\t', '\n', '\r'], " ")
}

/// Log file opened for append.
///
/// Each record is written with one `write_all` followed by a flush while
/// holding the lock, so uploads sharing a log never interleave lines.
#[derive(Debug)]
pub struct UploadLog {
    path: PathBuf,
    file: Mutex<File>,
}

impl UploadLog {
    /// Open `path` for append, creating it if missing
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;

        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record and flush it
    pub async fn append(&self, record: &LogRecord) -> Result<()> {
        let line = record.to_line();
        let mut file = self.file.lock().await;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}
