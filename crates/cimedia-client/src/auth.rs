//! OAuth2 password-grant login

use crate::{ClientError, Config, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Account and API-key credentials
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub client_id: String,
    pub client_secret: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

/// Token issued by the service
#[derive(Clone, Debug, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Exchange credentials for a bearer token.
///
/// The returned token is attached with [`Config::with_token`].
#[instrument(skip(config, credentials), fields(username = %credentials.username))]
pub async fn authenticate(config: &Config, credentials: &Credentials) -> Result<AccessToken> {
    let http = Client::builder()
        .timeout(config.timeout)
        .user_agent(config.user_agent.as_str())
        .build()?;

    let url = format!("{}/oauth2/token", config.api_url());
    debug!("Requesting access token from {}", url);

    let response = http
        .post(&url)
        .basic_auth(&credentials.username, Some(&credentials.password))
        .form(&[
            ("grant_type", "password"),
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
        ])
        .send()
        .await?;

    let status = response.status();
    let text = response.text().await?;
    if !status.is_success() {
        return Err(ClientError::from_status(status, text, &url));
    }

    let token: AccessToken = serde_json::from_str(&text)?;
    if token.access_token.is_empty() {
        return Err(ClientError::InvalidResponse("Empty access_token".to_string()));
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_debug_hides_secrets() {
        let credentials = Credentials {
            username: "me@example.com".to_string(),
            password: "hunter2".to_string(),
            client_id: "cid".to_string(),
            client_secret: "shh".to_string(),
        };
        let printed = format!("{:?}", credentials);
        assert!(printed.contains("me@example.com"));
        assert!(!printed.contains("hunter2"));
        assert!(!printed.contains("shh"));
    }
}
