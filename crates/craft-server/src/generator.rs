//! Passthrough client for the text-to-voxel asset generation provider.
//!
//! The provider is treated as an opaque function from a text prompt to an
//! asset descriptor. Request bodies are forwarded verbatim and the
//! provider's status code and body come back verbatim, success or not.
//! No state, no retries.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Url};
use serde_json::Value;
use thiserror::Error;

use crate::config::ProviderConfig;

const TEXT_TO_VOXEL: &str = "text-to-voxel";

#[derive(Debug, Error)]
pub enum GeneratorError {
    /// The provider answered with a non-success status.
    #[error("provider returned status {status}")]
    Status { status: u16, body: Value },

    /// The provider could not be reached or timed out.
    #[error("provider request failed: {0}")]
    Unreachable(String),

    /// The provider's response body could not be read.
    #[error("provider response read failed: {0}")]
    InvalidResponse(String),

    /// Client construction or URL building failed.
    #[error("provider client error: {0}")]
    Client(String),
}

/// A successful provider response, passed through unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetResponse {
    pub status: u16,
    pub body: Value,
}

pub struct AssetGenerator {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
}

impl AssetGenerator {
    pub fn new(config: &ProviderConfig) -> Result<Self, GeneratorError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GeneratorError::Client(e.to_string()))?;
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| GeneratorError::Client(format!("invalid base url: {}", e)))?;
        Ok(AssetGenerator {
            client,
            base_url,
            api_key: config.api_key.clone(),
        })
    }

    /// Starts a generation task. `request` is forwarded as the JSON body.
    pub async fn generate(&self, request: &Value) -> Result<AssetResponse, GeneratorError> {
        let url = self.endpoint(&[TEXT_TO_VOXEL])?;
        self.forward(self.client.post(url).json(request)).await
    }

    /// Fetches a generation task (and its asset URLs once finished) by id.
    pub async fn fetch_generated(&self, id: &str) -> Result<AssetResponse, GeneratorError> {
        let url = self.endpoint(&[TEXT_TO_VOXEL, id])?;
        self.forward(self.client.get(url)).await
    }

    /// Appends path segments to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, GeneratorError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| GeneratorError::Client("base url cannot take a path".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn forward(&self, mut req: RequestBuilder) -> Result<AssetResponse, GeneratorError> {
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        let response = req
            .send()
            .await
            .map_err(|e| GeneratorError::Unreachable(e.to_string()))?;
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| GeneratorError::InvalidResponse(e.to_string()))?;
        let body = parse_body(text);

        if (200..300).contains(&status) {
            Ok(AssetResponse { status, body })
        } else {
            Err(GeneratorError::Status { status, body })
        }
    }
}

/// JSON if the provider sent JSON, the raw text otherwise.
fn parse_body(text: String) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(&text).unwrap_or(Value::String(text))
}
