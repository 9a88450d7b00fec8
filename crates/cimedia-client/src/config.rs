//! Client configuration

use std::time::Duration;

/// Default metadata API endpoint
pub const DEFAULT_API_ENDPOINT: &str = "https://api.cimediacloud.com";

/// Default upload endpoint
pub const DEFAULT_IO_ENDPOINT: &str = "https://io.cimediacloud.com";

/// Files at or above this size go through the multipart protocol (5 MiB)
pub const SIZE_THRESHOLD: u64 = 5 * 1024 * 1024;

/// Bytes per multipart part (10 MiB)
pub const CHUNK_SIZE: u64 = 10 * 1024 * 1024;

/// How the multipart threshold boundary is compared
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ThresholdPolicy {
    /// `size >= threshold` uses multipart
    #[default]
    Inclusive,
    /// `size > threshold` uses multipart
    Exclusive,
}

impl ThresholdPolicy {
    /// Whether a file of `size` bytes crosses `threshold`
    pub fn is_multipart(&self, size: u64, threshold: u64) -> bool {
        match self {
            Self::Inclusive => size >= threshold,
            Self::Exclusive => size > threshold,
        }
    }
}

/// Session configuration shared by every operation of a client.
///
/// Built once and handed to [`crate::CiClient::new`]; the client never
/// mutates it afterwards.
#[derive(Clone, Debug)]
pub struct Config {
    /// Metadata API base URL
    pub api_endpoint: String,
    /// Upload base URL
    pub io_endpoint: String,
    /// Bearer token from [`crate::authenticate`]
    pub access_token: Option<String>,
    /// Workspace that uploads and listings target
    pub workspace_id: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
    /// Multipart upload threshold (bytes)
    pub multipart_threshold: u64,
    /// Multipart chunk size (bytes)
    pub multipart_chunk_size: u64,
    /// Boundary comparison for the threshold
    pub threshold_policy: ThresholdPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
            io_endpoint: DEFAULT_IO_ENDPOINT.to_string(),
            access_token: None,
            workspace_id: String::new(),
            timeout: Duration::from_secs(30),
            user_agent: format!("cimedia-client/{}", env!("CARGO_PKG_VERSION")),
            multipart_threshold: SIZE_THRESHOLD,
            multipart_chunk_size: CHUNK_SIZE,
            threshold_policy: ThresholdPolicy::default(),
        }
    }
}

impl Config {
    /// Create a config targeting `workspace_id` on the public service
    pub fn new(workspace_id: impl Into<String>) -> Self {
        Self {
            workspace_id: workspace_id.into(),
            ..Default::default()
        }
    }

    /// Set the access token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Set the workspace
    pub fn with_workspace(mut self, workspace_id: impl Into<String>) -> Self {
        self.workspace_id = workspace_id.into();
        self
    }

    /// Point both API and upload traffic at one host (used against mocks)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        self.api_endpoint = endpoint.clone();
        self.io_endpoint = endpoint;
        self
    }

    /// Set the metadata API endpoint
    pub fn with_api_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.api_endpoint = endpoint.into();
        self
    }

    /// Set the upload endpoint
    pub fn with_io_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.io_endpoint = endpoint.into();
        self
    }

    /// Set timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the multipart threshold
    pub fn with_multipart_threshold(mut self, bytes: u64) -> Self {
        self.multipart_threshold = bytes;
        self
    }

    /// Set the multipart chunk size
    pub fn with_chunk_size(mut self, bytes: u64) -> Self {
        self.multipart_chunk_size = bytes;
        self
    }

    /// Set the threshold boundary policy
    pub fn with_threshold_policy(mut self, policy: ThresholdPolicy) -> Self {
        self.threshold_policy = policy;
        self
    }

    /// Metadata API base URL without a trailing slash
    pub fn api_url(&self) -> &str {
        self.api_endpoint.trim_end_matches('/')
    }

    /// Upload base URL without a trailing slash
    pub fn io_url(&self) -> &str {
        self.io_endpoint.trim_end_matches('/')
    }

    pub(crate) fn validate(&self) -> crate::Result<()> {
        if self.multipart_chunk_size == 0 {
            return Err(crate::ClientError::Config(
                "multipart chunk size must be non-zero".to_string(),
            ));
        }
        if self.workspace_id.is_empty() {
            return Err(crate::ClientError::Config(
                "workspace id is required".to_string(),
            ));
        }
        Ok(())
    }
}
