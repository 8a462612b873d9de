//! Giphy random GIF client.
//!
//! Fetches a random celebration GIF to post after a composed message.

use std::time::Duration;

use reqwest::Client;

use crate::config::GiphyConfig;

/// Client for the Giphy random endpoint.
pub struct GiphyClient {
    client: Client,
    config: GiphyConfig,
}

/// Error type for Giphy operations.
#[derive(Debug, thiserror::Error)]
pub enum GiphyError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Giphy API error ({status}): {body}")]
    ApiError { status: u16, body: String },

    #[error("Giphy returned no GIF for tag '{0}'")]
    NoResult(String),

    #[error("Giphy is not enabled")]
    NotEnabled,
}

impl GiphyClient {
    /// Create a new Giphy client.
    ///
    /// # Errors
    /// Returns an error if Giphy is disabled or the HTTP client cannot be built.
    pub fn new(config: GiphyConfig) -> Result<Self, GiphyError> {
        if !config.enabled {
            return Err(GiphyError::NotEnabled);
        }

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self { client, config })
    }

    /// Fetch the original-size URL of a random GIF for the configured tag.
    pub async fn random_gif_url(&self) -> Result<String, GiphyError> {
        let url = format!(
            "{}/gifs/random",
            self.config.api_base_url.trim_end_matches('/')
        );

        let response = self
            .client
            .get(&url)
            .query(&[
                ("api_key", self.config.api_key.as_str()),
                ("tag", self.config.tag.as_str()),
                ("rating", self.config.rating.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(GiphyError::ApiError { status, body });
        }

        let body: serde_json::Value = response.json().await?;
        extract_gif_url(&body).ok_or_else(|| GiphyError::NoResult(self.config.tag.clone()))
    }
}

/// Extract `data.images.original.url` from a random-endpoint response.
///
/// Giphy answers with `"data": []` when nothing matches the tag.
pub fn extract_gif_url(body: &serde_json::Value) -> Option<String> {
    body.pointer("/data/images/original/url")
        .and_then(|url| url.as_str())
        .filter(|url| !url.is_empty())
        .map(str::to_string)
}
