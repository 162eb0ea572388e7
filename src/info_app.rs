use iced::Task;

use crate::api::{ApiClient, ApiConfig, VideoInfo};
use crate::application::InfoController;
use crate::ui::{self, InfoMessage};

pub struct InfoApp {
    controller: InfoController,
    api_client: ApiClient,
}

impl Default for InfoApp {
    fn default() -> Self {
        Self::new(ApiClient::new(ApiConfig::default()))
    }
}

impl InfoApp {
    pub fn new(api_client: ApiClient) -> Self {
        Self {
            controller: InfoController::default(),
            api_client,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    UiMessage(InfoMessage),
    InfoFetched(Result<VideoInfo, String>),
}

pub fn update(app: &mut InfoApp, message: Message) -> Task<Message> {
    match message {
        Message::UiMessage(InfoMessage::UrlChanged(url)) => {
            app.controller.set_url_input(url);
        }
        Message::UiMessage(InfoMessage::FetchPressed) => {
            if let Ok(url) = app.controller.request_fetch() {
                let api_client = app.api_client.clone();

                // iced Task::perform runs in the background tokio executor
                return Task::perform(
                    async move {
                        api_client
                            .fetch_video_info(&url)
                            .await
                            .map_err(|e| e.user_message())
                    },
                    Message::InfoFetched,
                );
            }
        }
        Message::UiMessage(InfoMessage::DialogDismissed) => {
            app.controller.dismiss_dialog();
        }
        Message::InfoFetched(result) => {
            app.controller.apply_result(result);
        }
    }
    Task::none()
}

pub fn view(app: &InfoApp) -> iced::Element<'_, Message> {
    ui::info_view(&app.controller).map(Message::UiMessage)
}
