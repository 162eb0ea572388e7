use std::any::Any;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use regex::Regex;
use serde_json::Value;

use super::bridge::UiDispatcher;
use crate::{
    domain::{ProgressEvent, SessionId, VideoUrl},
    engine::{DownloadEngine, EngineError, RawStatus},
    utils::strip_ansi,
};

const UNKNOWN_ERROR: &str = "Unknown error";

/// Parse an engine percentage such as `" 45.2%"`. `None` when the text is
/// not a number; values outside `0..=100` are clamped.
pub fn parse_percent(text: &str) -> Option<f32> {
    let re = Regex::new(r"^\s*(\d+(?:\.\d+)?)\s*%?\s*$").ok()?;
    let caps = re.captures(text)?;
    let value: f32 = caps[1].parse().ok()?;
    value.is_finite().then(|| value.clamp(0.0, 100.0))
}

/// Turns raw engine statuses into progress events for one session.
///
/// The engine reports `finished` once per downloaded stream (video and audio
/// separately when they get merged), so `Finished` is held back until the
/// engine call itself returns. At most one terminal event is produced.
#[derive(Debug, Default)]
pub struct StatusClassifier {
    finish_reported: bool,
    terminal_sent: bool,
}

impl StatusClassifier {
    pub fn classify(&mut self, raw: &RawStatus) -> Option<ProgressEvent> {
        if self.terminal_sent {
            return None;
        }

        match raw.get("status").and_then(Value::as_str) {
            Some("downloading") => {
                let percent_str = raw.get("_percent_str").and_then(Value::as_str)?;
                let shown = strip_ansi(percent_str).trim().to_string();
                let percent = parse_percent(&shown).unwrap_or_else(|| {
                    tracing::debug!("Unparsable percentage {:?}, showing 0", percent_str);
                    0.0
                });
                Some(ProgressEvent::Downloading {
                    percent,
                    label: format!("⬇️ Downloading... {}", shown),
                })
            }
            Some("finished") => {
                self.finish_reported = true;
                None
            }
            Some("error") => {
                self.terminal_sent = true;
                let message = match raw.get("error") {
                    Some(Value::String(s)) => s.clone(),
                    Some(Value::Null) | None => UNKNOWN_ERROR.to_string(),
                    Some(other) => other.to_string(),
                };
                Some(ProgressEvent::Failed { message })
            }
            other => {
                tracing::trace!("Ignoring engine status {:?}", other);
                None
            }
        }
    }

    /// Terminal event for the engine's return value, unless one was already
    /// produced.
    pub fn complete(&mut self, outcome: Result<(), EngineError>) -> Option<ProgressEvent> {
        if self.terminal_sent {
            return None;
        }
        self.terminal_sent = true;

        match outcome {
            Ok(()) => {
                if !self.finish_reported {
                    tracing::debug!("Engine returned without reporting finished");
                }
                Some(ProgressEvent::Finished)
            }
            Err(e) => Some(ProgressEvent::Failed {
                message: e.to_string(),
            }),
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        UNKNOWN_ERROR.to_string()
    }
}

/// Download `url` with `engine`, reporting through `emit`. Blocks until the
/// engine is done. Every failure, panics included, ends up as a `Failed`
/// event; nothing is returned to the caller.
pub fn run(url: &VideoUrl, engine: &dyn DownloadEngine, mut emit: impl FnMut(ProgressEvent)) {
    let mut classifier = StatusClassifier::default();

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        engine.download(url.as_str(), &mut |raw| {
            if let Some(event) = classifier.classify(raw) {
                emit(event);
            }
        })
    }))
    .unwrap_or_else(|payload| Err(EngineError::Panicked(panic_message(payload))));

    if let Err(e) = &outcome {
        tracing::warn!("Download of {} failed: {}", url, e);
    }

    if let Some(event) = classifier.complete(outcome) {
        emit(event);
    }
}

/// Run a download for `session` on its own thread, posting every event
/// through `dispatcher`.
pub fn spawn(
    session: SessionId,
    url: VideoUrl,
    engine: Arc<dyn DownloadEngine>,
    dispatcher: UiDispatcher,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name(format!("download-worker-{}", session.0))
        .spawn(move || {
            tracing::info!("Worker for session {} downloading {}", session, url);
            run(&url, engine.as_ref(), |event| {
                dispatcher.post(session, event);
            });
        })
}
