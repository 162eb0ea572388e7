use reqwest::Client;
use thiserror::Error;
use url::Url;

use super::models::{ApiConfig, EmbedResponse, VideoInfo};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    #[error("Could not fetch video info{}", .0.as_deref().map(|e| format!(": {e}")).unwrap_or_default())]
    MissingTitle(Option<String>),
}

impl ApiError {
    /// Text shown to the user. Transport failures get an `Error:` prefix,
    /// a well-formed answer without a title is reported as is.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::MissingTitle(_) => self.to_string(),
            other => format!("Error: {}", other),
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Clone)]
pub struct ApiClient {
    config: ApiConfig,
    http: Client,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    fn embed_url(&self, video_url: &str) -> Result<Url> {
        Ok(Url::parse_with_params(
            &self.config.embed_endpoint,
            &[("url", video_url)],
        )?)
    }

    /// Fetch embed metadata for `video_url` without downloading anything.
    pub async fn fetch_video_info(&self, video_url: &str) -> Result<VideoInfo> {
        let url = self.embed_url(video_url)?;
        tracing::debug!("Requesting embed info: {}", url);

        let response = self
            .http
            .get(url)
            .timeout(self.config.timeout)
            .send()
            .await?;

        let status = response.status();
        let json: EmbedResponse = response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("JSON decode error: {}", e)))?;

        if json.title.is_none() {
            tracing::warn!("Embed info without title (HTTP {})", status);
            return Err(ApiError::MissingTitle(json.error_text()));
        }

        Ok(VideoInfo::from_response(&json))
    }
}
