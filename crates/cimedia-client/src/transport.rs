//! Authenticated HTTP transport shared by every operation

use crate::{ClientError, Config, Result};
use bytes::Bytes;
use reqwest::{header, multipart::Form, Client, Method, RequestBuilder, Response};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// Thin wrapper over a reqwest client that attaches session headers and
/// turns non-2xx responses into [`ClientError`]s.
#[derive(Debug)]
pub struct Transport {
    config: Config,
    http: Client,
}

impl Transport {
    /// Create a transport for the given session
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let mut headers = header::HeaderMap::new();
        let user_agent = config
            .user_agent
            .parse()
            .map_err(|_| ClientError::Config(format!("Invalid user agent: {}", config.user_agent)))?;
        headers.insert(header::USER_AGENT, user_agent);

        let http = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(ClientError::Http)?;

        Ok(Self { config, http })
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Full URL on the metadata API
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_url(), path)
    }

    /// Full URL on the upload host
    pub fn io_url(&self, path: &str) -> String {
        format!("{}{}", self.config.io_url(), path)
    }

    /// GET and parse the JSON body
    pub async fn get(&self, url: &str, query: Option<&[(&str, String)]>) -> Result<Value> {
        let mut req = self.request(Method::GET, url);
        if let Some(q) = query {
            req = req.query(q);
        }
        let response = self.send(req, "GET", url).await?;
        parse_body(response).await
    }

    /// POST a JSON document
    pub async fn post_json<B: Serialize + ?Sized>(&self, url: &str, body: &B) -> Result<Value> {
        let req = self.request(Method::POST, url).json(body);
        let response = self.send(req, "POST", url).await?;
        parse_body(response).await
    }

    /// POST a multipart form
    pub async fn post_form(&self, url: &str, form: Form) -> Result<Value> {
        let req = self.request(Method::POST, url).multipart(form);
        let response = self.send(req, "POST", url).await?;
        parse_body(response).await
    }

    /// POST with no body; only the status is checked
    pub async fn post_empty(&self, url: &str) -> Result<()> {
        let req = self.request(Method::POST, url);
        self.send(req, "POST", url).await?;
        Ok(())
    }

    /// PUT raw bytes; only the status is checked
    pub async fn put_bytes(&self, url: &str, body: Bytes, content_type: &str) -> Result<()> {
        let req = self
            .request(Method::PUT, url)
            .header(header::CONTENT_TYPE, content_type)
            .body(body);
        self.send(req, "PUT", url).await?;
        Ok(())
    }

    /// DELETE a resource
    pub async fn delete(&self, url: &str) -> Result<()> {
        let req = self.request(Method::DELETE, url);
        self.send(req, "DELETE", url).await?;
        Ok(())
    }

    // ==================== Helper Methods ====================

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let req = self.http.request(method, url);
        match &self.config.access_token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn send(&self, req: RequestBuilder, method: &str, url: &str) -> Result<Response> {
        debug!("Sending {} request to {}", method, url);
        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            debug!("{} {} failed with {}", method, url, status);
            return Err(ClientError::from_status(status, text, url));
        }

        Ok(response)
    }
}

/// Parse a JSON body; empty bodies become `Value::Null`
async fn parse_body(response: Response) -> Result<Value> {
    let text = response.text().await?;
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(&text)?)
}
