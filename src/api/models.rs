use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Placeholder shown for metadata fields the endpoint did not return.
pub const NOT_AVAILABLE: &str = "N/A";

/// Response from the embed-info endpoint. Every field is optional; the
/// endpoint reports unsupported URLs through `error` instead of a status code.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EmbedResponse {
    #[serde(default)]
    pub title: Option<Value>,
    #[serde(default)]
    pub author_name: Option<Value>,
    #[serde(default)]
    pub duration: Option<Value>,
    #[serde(default)]
    pub views: Option<Value>,
    #[serde(default)]
    pub upload_date: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
}

impl EmbedResponse {
    /// The endpoint's own explanation of a failure, whatever its JSON type.
    pub fn error_text(&self) -> Option<String> {
        match &self.error {
            None | Some(Value::Null) => None,
            Some(_) => Some(display_field(&self.error)),
        }
    }
}

/// Metadata shown by the info app, already rendered for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoInfo {
    pub title: String,
    pub author: String,
    pub duration: String,
    pub views: String,
    pub upload_date: String,
}

impl VideoInfo {
    pub fn from_response(response: &EmbedResponse) -> Self {
        Self {
            title: display_field(&response.title),
            author: display_field(&response.author_name),
            duration: display_field(&response.duration),
            views: display_field(&response.views),
            upload_date: display_field(&response.upload_date),
        }
    }

    /// Multi-line block for the info label.
    pub fn summary(&self) -> String {
        format!(
            "📹 Title: {}\n👤 Author: {}\n🕒 Duration: {}\n👁️ Views: {}\n📅 Upload Date: {}\n\n✅ Video information fetched successfully!",
            self.title, self.author, self.duration, self.views, self.upload_date
        )
    }
}

fn display_field(value: &Option<Value>) -> String {
    match value {
        None | Some(Value::Null) => NOT_AVAILABLE.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub embed_endpoint: String,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            embed_endpoint: "https://noembed.com/embed".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}
