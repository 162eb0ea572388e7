//! Seam to the external download engine.
//!
//! The engine does the actual network download, format negotiation and
//! muxing. All we see of it is a blocking call that reports progress through
//! a hook receiving raw status dictionaries, the same shape yt-dlp hands to
//! its progress hooks (`status`, `_percent_str`, `error`, ...).

pub mod ytdlp;

use std::path::PathBuf;

use serde_json::{Map, Value};
use thiserror::Error;

pub use ytdlp::YtDlpEngine;

/// One progress report from the engine, untouched.
pub type RawStatus = Map<String, Value>;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The engine ran and reported failure; `message` is its own wording.
    #[error("{message}")]
    Failed { code: Option<i32>, message: String },

    #[error("Download engine crashed: {0}")]
    Panicked(String),
}

/// A blocking download engine. `download` only returns once the engine is
/// done, calling `hook` for every status report along the way.
pub trait DownloadEngine: Send + Sync {
    fn download(
        &self,
        url: &str,
        hook: &mut dyn FnMut(&RawStatus),
    ) -> Result<(), EngineError>;
}

/// Fixed engine options.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub program: String,
    pub max_height: u32,
    pub merge_format: String,
    pub output_template: String,
    /// `None` downloads into the process working directory.
    pub output_dir: Option<PathBuf>,
}

impl EngineConfig {
    /// Best video up to `max_height` plus best audio, else best single file.
    pub fn format_selector(&self) -> String {
        format!("bestvideo[height<={}]+bestaudio/best", self.max_height)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            program: if cfg!(target_os = "windows") {
                "yt-dlp.exe".to_string()
            } else {
                "yt-dlp".to_string()
            },
            max_height: 1080,
            merge_format: "mp4".to_string(),
            output_template: "%(title)s.%(ext)s".to_string(),
            output_dir: None,
        }
    }
}
