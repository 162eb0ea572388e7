use crate::{
    domain::{
        AppError, DialogRequest, DownloadSession, ProgressEvent, SessionId, SessionState,
        VideoUrl,
    },
    ui::dialog::DialogPresenter,
};

pub const STATUS_READY: &str = "Ready to download";
pub const STATUS_STARTING: &str = "🔄 Starting download...";
pub const STATUS_COMPLETE: &str = "✅ Download Complete!";
pub const STATUS_FAILED: &str = "❌ Download Failed!";

/// What the app needs to launch a worker for a freshly started session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTicket {
    pub session: SessionId,
    pub url: VideoUrl,
}

/// UI-facing state of the downloader. Only ever mutated from the UI context.
#[derive(Debug)]
pub struct DownloadController {
    url_input: String,
    trigger_enabled: bool,
    status_text: String,
    progress: f32,
    session: Option<DownloadSession>,
    next_session: u64,
    dialogs: DialogPresenter,
}

impl Default for DownloadController {
    fn default() -> Self {
        Self::new()
    }
}

impl DownloadController {
    pub fn new() -> Self {
        Self {
            url_input: String::new(),
            trigger_enabled: true,
            status_text: STATUS_READY.to_string(),
            progress: 0.0,
            session: None,
            next_session: 1,
            dialogs: DialogPresenter::default(),
        }
    }

    pub fn url_input(&self) -> &str {
        &self.url_input
    }

    pub fn set_url_input(&mut self, input: String) {
        self.url_input = input;
    }

    pub fn trigger_enabled(&self) -> bool {
        self.trigger_enabled
    }

    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    /// Progress in percent, `0..=100`.
    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn state(&self) -> SessionState {
        self.session
            .as_ref()
            .map(|s| s.state)
            .unwrap_or(SessionState::Idle)
    }

    pub fn dialog(&self) -> Option<&DialogRequest> {
        self.dialogs.live()
    }

    pub fn dismiss_dialog(&mut self) {
        self.dialogs.dismiss();
    }

    /// Validate the input and move to `Running`. A second start while a
    /// session is running is refused whatever the trigger control shows.
    pub fn request_start(&mut self) -> Result<StartTicket, AppError> {
        if self.session.as_ref().is_some_and(DownloadSession::is_running) {
            tracing::warn!("Start requested while a download is running");
            return Err(AppError::DownloadInProgress);
        }

        let url = match VideoUrl::parse(&self.url_input) {
            Ok(url) => url,
            Err(e) => {
                tracing::info!("Rejected input {:?}: {}", self.url_input, e);
                self.dialogs.show(DialogRequest::from(&e));
                return Err(e);
            }
        };

        let id = SessionId(self.next_session);
        self.next_session += 1;

        self.trigger_enabled = false;
        self.progress = 0.0;
        self.status_text = STATUS_STARTING.to_string();
        self.session = Some(DownloadSession::start(id, url.clone()));
        tracing::info!("Session {} started for {}", id, url);

        Ok(StartTicket { session: id, url })
    }

    /// Apply one event from the worker of `session`. Events from a session
    /// that is not the running one are ignored.
    pub fn apply(&mut self, session: SessionId, event: ProgressEvent) {
        let current = match self.session.as_mut() {
            Some(current) if current.id == session && current.is_running() => current,
            _ => {
                tracing::debug!("Ignoring {:?} for inactive session {}", event, session);
                return;
            }
        };

        match event {
            ProgressEvent::Downloading { percent, label } => {
                self.progress = percent;
                self.status_text = label;
            }
            ProgressEvent::Finished => {
                current.state = SessionState::Succeeded;
                tracing::info!(
                    "Session {} finished in {:.1?}",
                    session,
                    current.started_at.elapsed()
                );
                self.progress = 100.0;
                self.status_text = STATUS_COMPLETE.to_string();
                self.trigger_enabled = true;
                self.url_input.clear();
                self.dialogs.show(DialogRequest::new(
                    "Success",
                    "Video downloaded successfully!",
                ));
            }
            ProgressEvent::Failed { message } => {
                current.state = SessionState::Failed;
                tracing::warn!("Session {} failed: {}", session, message);
                self.progress = 0.0;
                self.status_text = STATUS_FAILED.to_string();
                self.trigger_enabled = true;
                self.dialogs.show(DialogRequest::new("Error", message));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{bridge, worker, worker::tests::ScriptedEngine};
    use serde_json::json;
    use std::sync::Arc;

    fn controller_with(input: &str) -> DownloadController {
        let mut controller = DownloadController::new();
        controller.set_url_input(input.to_string());
        controller
    }

    fn downloading(percent: f32) -> ProgressEvent {
        ProgressEvent::Downloading {
            percent,
            label: format!("{percent}%"),
        }
    }

    /// Drive a whole session through a scripted engine and the bridge,
    /// returning the progress value seen after each applied event.
    fn run_session(controller: &mut DownloadController, engine: ScriptedEngine) -> Vec<f32> {
        let ticket = controller.request_start().unwrap();
        let (dispatcher, mut receiver) = bridge::dispatcher();
        worker::spawn(ticket.session, ticket.url, Arc::new(engine), dispatcher)
            .unwrap()
            .join()
            .unwrap();

        receiver
            .drain()
            .into_iter()
            .map(|item| {
                controller.apply(item.session, item.event);
                controller.progress()
            })
            .collect()
    }

    #[test]
    fn test_empty_input_stays_idle() {
        for input in ["", "   "] {
            let mut controller = controller_with(input);
            assert_eq!(controller.request_start(), Err(AppError::EmptyInput));
            assert_eq!(controller.state(), SessionState::Idle);
            assert!(controller.trigger_enabled());
            assert_eq!(controller.dialog().unwrap().title, "Input Error");
        }
    }

    #[test]
    fn test_foreign_url_stays_idle() {
        let mut controller = controller_with("https://example.com/video");
        assert_eq!(controller.request_start(), Err(AppError::InvalidUrl));
        assert_eq!(controller.state(), SessionState::Idle);
        assert_eq!(controller.dialog().unwrap().title, "Invalid URL");
        assert_eq!(controller.status_text(), STATUS_READY);
    }

    #[test]
    fn test_valid_start_disables_trigger() {
        let mut controller = controller_with("https://youtu.be/abc123");
        let ticket = controller.request_start().unwrap();

        assert_eq!(ticket.url.as_str(), "https://youtu.be/abc123");
        assert_eq!(controller.state(), SessionState::Running);
        assert!(!controller.trigger_enabled());
        assert_eq!(controller.progress(), 0.0);
        assert_eq!(controller.status_text(), STATUS_STARTING);
        assert!(controller.dialog().is_none());
    }

    #[test]
    fn test_second_start_rejected_while_running() {
        let mut controller = controller_with("https://youtu.be/abc123");
        let ticket = controller.request_start().unwrap();

        assert_eq!(
            controller.request_start(),
            Err(AppError::DownloadInProgress)
        );
        assert_eq!(controller.state(), SessionState::Running);

        controller.apply(ticket.session, ProgressEvent::Finished);
        controller.set_url_input("https://youtu.be/next".to_string());
        let next = controller.request_start().unwrap();
        assert_ne!(next.session, ticket.session);
    }

    #[test]
    fn test_last_percent_wins() {
        let mut controller = controller_with("https://youtu.be/abc123");
        let ticket = controller.request_start().unwrap();

        for percent in [10.0, 60.0, 30.0, 0.0, 55.5] {
            controller.apply(ticket.session, downloading(percent));
        }
        assert_eq!(controller.progress(), 55.5);
        assert_eq!(controller.status_text(), "55.5%");
        assert_eq!(controller.state(), SessionState::Running);
    }

    #[test]
    fn test_failed_resets_progress() {
        let mut controller = controller_with("https://youtu.be/abc123");
        let ticket = controller.request_start().unwrap();
        controller.apply(ticket.session, downloading(70.0));
        controller.apply(
            ticket.session,
            ProgressEvent::Failed {
                message: "disk full".to_string(),
            },
        );

        assert_eq!(controller.state(), SessionState::Failed);
        assert_eq!(controller.progress(), 0.0);
        assert!(controller.trigger_enabled());
        let dialog = controller.dialog().unwrap();
        assert_eq!(dialog.title, "Error");
        assert_eq!(dialog.body, "disk full");
        assert_eq!(controller.url_input(), "https://youtu.be/abc123");
    }

    #[test]
    fn test_stale_events_ignored() {
        let mut controller = controller_with("https://youtu.be/abc123");
        let ticket = controller.request_start().unwrap();
        controller.apply(ticket.session, ProgressEvent::Finished);

        controller.apply(ticket.session, downloading(12.0));
        controller.apply(SessionId(99), ProgressEvent::Finished);
        assert_eq!(controller.progress(), 100.0);
        assert_eq!(controller.state(), SessionState::Succeeded);
    }

    #[test]
    fn test_scenario_download_succeeds() {
        let mut controller = controller_with("https://youtu.be/abc123");
        let mut statuses = ScriptedEngine::progress(&["45.2%", "87.0%"]);
        statuses.push(json!({"status": "finished"}));

        let seen = run_session(
            &mut controller,
            ScriptedEngine {
                statuses,
                result: Ok(()),
            },
        );

        assert_eq!(seen, vec![45.2, 87.0, 100.0]);
        assert_eq!(controller.state(), SessionState::Succeeded);
        assert_eq!(controller.url_input(), "");
        assert!(controller.trigger_enabled());
        assert_eq!(controller.status_text(), STATUS_COMPLETE);
        assert_eq!(controller.dialog().unwrap().title, "Success");
    }

    #[test]
    fn test_scenario_engine_raises() {
        let mut controller = controller_with("https://youtu.be/abc123");

        let seen = run_session(
            &mut controller,
            ScriptedEngine {
                statuses: Vec::new(),
                result: Err("HTTP 403".to_string()),
            },
        );

        assert_eq!(seen, vec![0.0]);
        assert_eq!(controller.state(), SessionState::Failed);
        assert!(controller.trigger_enabled());
        assert!(controller.dialog().unwrap().body.contains("HTTP 403"));
    }

    #[test]
    fn test_dismiss_dialog() {
        let mut controller = controller_with("");
        let _ = controller.request_start();
        controller.dismiss_dialog();
        assert!(controller.dialog().is_none());
    }
}
