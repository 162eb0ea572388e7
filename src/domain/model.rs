use std::fmt;
use std::time::Instant;

use super::AppError;

/// Substrings that mark a URL as belonging to a supported site.
pub const HOST_MARKERS: &[&str] = &["youtube.com", "youtu.be"];

/// A trimmed, non-empty URL pointing at a supported host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoUrl(String);

impl VideoUrl {
    pub fn parse(input: &str) -> Result<Self, AppError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(AppError::EmptyInput);
        }
        if !HOST_MARKERS.iter().any(|marker| trimmed.contains(marker)) {
            return Err(AppError::InvalidUrl);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One moment of a download's lifecycle, as seen by the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    Downloading { percent: f32, label: String },
    Finished,
    Failed { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Running,
    Succeeded,
    Failed,
}

/// One user-initiated download attempt.
#[derive(Debug, Clone)]
pub struct DownloadSession {
    pub id: SessionId,
    pub url: VideoUrl,
    pub started_at: Instant,
    pub state: SessionState,
}

impl DownloadSession {
    pub fn start(id: SessionId, url: VideoUrl) -> Self {
        Self {
            id,
            url,
            started_at: Instant::now(),
            state: SessionState::Running,
        }
    }

    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogRequest {
    pub title: String,
    pub body: String,
}

impl DialogRequest {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

impl From<&AppError> for DialogRequest {
    fn from(error: &AppError) -> Self {
        Self::new(error.dialog_title(), error.to_string())
    }
}
