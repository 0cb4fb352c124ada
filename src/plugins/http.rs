use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::config::{usable_key, ServiceConfig};
use crate::error::{LexiError, Result};

pub fn build_client(timeout: Option<Duration>) -> Result<Client> {
    let mut builder = Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| LexiError::Config(format!("http client: {e}")))
}

/// Credential and host for one provider.
#[derive(Debug, Clone)]
pub struct Endpoint {
    api_key: Option<String>,
    base_url: String,
}

impl Endpoint {
    pub fn new(config: Option<&ServiceConfig>, default_base_url: &str) -> Self {
        let api_key = config
            .and_then(|c| usable_key(c.api_key.as_ref()))
            .map(str::to_string);
        let base_url = config
            .and_then(|c| c.base_url.as_deref())
            .map(|url| url.trim().trim_end_matches('/'))
            .filter(|url| !url.is_empty())
            .unwrap_or(default_base_url)
            .to_string();
        Self { api_key, base_url }
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

/// Upstream text, or the placeholder when the field is missing or blank.
pub fn text_or(value: Option<String>, placeholder: &str) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| placeholder.to_string())
}

/// Sends the request and decodes a 2xx JSON body. Any other status is an `Http` error.
pub async fn fetch_json<T: DeserializeOwned>(request: RequestBuilder, what: &str) -> Result<T> {
    let response = request
        .send()
        .await
        .map_err(|e| LexiError::Http(format!("{what} request failed: {e}")))?;
    decode_json(response, what).await
}

pub async fn decode_json<T: DeserializeOwned>(response: Response, what: &str) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        return Err(LexiError::Http(format!("{what} failed: {}", status.as_u16())));
    }
    response
        .json::<T>()
        .await
        .map_err(|e| LexiError::Serialization(format!("{what} decode failed: {e}")))
}
