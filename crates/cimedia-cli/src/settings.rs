//! Credentials file and environment settings

use anyhow::{anyhow, Context, Result};
use cimedia_client::{Config, Credentials, DEFAULT_API_ENDPOINT, DEFAULT_IO_ENDPOINT};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable prefix, e.g. `CIMEDIA_WORKSPACE_ID`
pub const ENV_PREFIX: &str = "CIMEDIA";

/// Settings read from a YAML credentials file, overridden by environment
#[derive(Clone, Serialize, Deserialize)]
pub struct CliSettings {
    pub username: Option<String>,
    pub password: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub workspace_id: String,
    /// Skip login when a token is already at hand
    pub access_token: Option<String>,
    #[serde(default = "default_api_endpoint")]
    pub api_endpoint: String,
    #[serde(default = "default_io_endpoint")]
    pub io_endpoint: String,
}

fn default_api_endpoint() -> String {
    DEFAULT_API_ENDPOINT.to_string()
}

fn default_io_endpoint() -> String {
    DEFAULT_IO_ENDPOINT.to_string()
}

impl std::fmt::Debug for CliSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CliSettings")
            .field("username", &self.username)
            .field("client_id", &self.client_id)
            .field("workspace_id", &self.workspace_id)
            .field("api_endpoint", &self.api_endpoint)
            .field("io_endpoint", &self.io_endpoint)
            .finish_non_exhaustive()
    }
}

impl CliSettings {
    /// Load `path` (YAML) and layer `CIMEDIA_*` variables on top.
    /// A missing file is fine as long as the environment fills the gaps.
    pub fn load(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(
                config::File::from(path.to_path_buf())
                    .format(config::FileFormat::Yaml)
                    .required(false),
            )
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;

        settings
            .try_deserialize()
            .with_context(|| format!("Invalid settings in {}", path.display()))
    }

    /// Credentials for the password grant
    pub fn credentials(&self) -> Result<Credentials> {
        let field = |value: &Option<String>, name: &str| {
            value
                .clone()
                .ok_or_else(|| anyhow!("Missing `{}` in settings", name))
        };
        Ok(Credentials {
            username: field(&self.username, "username")?,
            password: field(&self.password, "password")?,
            client_id: field(&self.client_id, "client_id")?,
            client_secret: field(&self.client_secret, "client_secret")?,
        })
    }

    /// Client session without a token
    pub fn client_config(&self) -> Config {
        Config::new(self.workspace_id.clone())
            .with_api_endpoint(self.api_endpoint.clone())
            .with_io_endpoint(self.io_endpoint.clone())
    }
}
