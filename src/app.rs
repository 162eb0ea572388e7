use std::sync::Arc;

use iced::Task;

use crate::application::{bridge, worker, Dispatched, DownloadController, StartTicket};
use crate::domain::ProgressEvent;
use crate::engine::{DownloadEngine, EngineConfig, YtDlpEngine};
use crate::ui::{self, DownloadMessage};

pub struct DownloadApp {
    controller: DownloadController,
    engine: Arc<dyn DownloadEngine>,
}

impl Default for DownloadApp {
    fn default() -> Self {
        Self::new(Arc::new(YtDlpEngine::new(EngineConfig::default())))
    }
}

impl DownloadApp {
    pub fn new(engine: Arc<dyn DownloadEngine>) -> Self {
        Self {
            controller: DownloadController::new(),
            engine,
        }
    }

    pub fn controller(&self) -> &DownloadController {
        &self.controller
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    UiMessage(DownloadMessage),
    /// Event posted by a download worker, applied on the UI context.
    Progress(Dispatched),
}

pub fn update(app: &mut DownloadApp, message: Message) -> Task<Message> {
    match message {
        Message::UiMessage(DownloadMessage::UrlChanged(url)) => {
            app.controller.set_url_input(url);
        }
        Message::UiMessage(DownloadMessage::DownloadPressed) => {
            if let Ok(ticket) = app.controller.request_start() {
                return start_worker(app, ticket);
            }
        }
        Message::UiMessage(DownloadMessage::DialogDismissed) => {
            app.controller.dismiss_dialog();
        }
        Message::Progress(Dispatched { session, event }) => {
            app.controller.apply(session, event);
        }
    }
    Task::none()
}

/// The worker blocks on its own thread; its events come back as a message
/// stream that iced feeds into `update` in order.
fn start_worker(app: &mut DownloadApp, ticket: StartTicket) -> Task<Message> {
    let (dispatcher, receiver) = bridge::dispatcher();
    let session = ticket.session;

    match worker::spawn(session, ticket.url, Arc::clone(&app.engine), dispatcher) {
        Ok(_handle) => Task::run(receiver.into_stream(), Message::Progress),
        Err(e) => {
            tracing::error!("Could not spawn download worker: {}", e);
            app.controller.apply(
                session,
                ProgressEvent::Failed {
                    message: format!("Failed to start download: {}", e),
                },
            );
            Task::none()
        }
    }
}

pub fn view(app: &DownloadApp) -> iced::Element<'_, Message> {
    ui::download_view(&app.controller).map(Message::UiMessage)
}
