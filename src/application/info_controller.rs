use crate::{
    api::VideoInfo,
    domain::{AppError, DialogRequest},
    ui::dialog::DialogPresenter,
};

pub const INFO_PROMPT: &str = "Enter YouTube URL to get video information";
pub const INFO_FETCHING: &str = "🔄 Fetching video information...";

/// UI-facing state of the metadata viewer.
#[derive(Debug)]
pub struct InfoController {
    url_input: String,
    info_text: String,
    fetching: bool,
    dialogs: DialogPresenter,
}

impl Default for InfoController {
    fn default() -> Self {
        Self {
            url_input: String::new(),
            info_text: INFO_PROMPT.to_string(),
            fetching: false,
            dialogs: DialogPresenter::default(),
        }
    }
}

impl InfoController {
    pub fn url_input(&self) -> &str {
        &self.url_input
    }

    pub fn set_url_input(&mut self, input: String) {
        self.url_input = input;
    }

    pub fn info_text(&self) -> &str {
        &self.info_text
    }

    pub fn trigger_enabled(&self) -> bool {
        !self.fetching
    }

    pub fn button_label(&self) -> &'static str {
        if self.fetching {
            "FETCHING INFO..."
        } else {
            "GET VIDEO INFO"
        }
    }

    pub fn dialog(&self) -> Option<&DialogRequest> {
        self.dialogs.live()
    }

    pub fn dismiss_dialog(&mut self) {
        self.dialogs.dismiss();
    }

    /// Returns the trimmed URL to fetch. Any non-empty text is accepted; the
    /// embed service reports what it can't handle.
    pub fn request_fetch(&mut self) -> Result<String, AppError> {
        if self.fetching {
            return Err(AppError::FetchInProgress);
        }

        let url = self.url_input.trim();
        if url.is_empty() {
            let error = AppError::EmptyInput;
            self.dialogs.show(DialogRequest::from(&error));
            return Err(error);
        }

        self.fetching = true;
        self.info_text = INFO_FETCHING.to_string();
        tracing::info!("Fetching video info for {}", url);
        Ok(url.to_string())
    }

    /// Apply the outcome of a fetch started by `request_fetch`.
    pub fn apply_result(&mut self, result: Result<VideoInfo, String>) {
        if !self.fetching {
            tracing::debug!("Ignoring fetch result with no fetch in flight");
            return;
        }
        self.fetching = false;

        match result {
            Ok(info) => {
                tracing::info!("Fetched info for {:?}", info.title);
                self.info_text = info.summary();
                self.dialogs.show(DialogRequest::new(
                    "Success",
                    "Video information fetched successfully!",
                ));
            }
            Err(message) => {
                tracing::warn!("Video info fetch failed: {}", message);
                self.info_text = format!("❌ {}", message);
                self.dialogs.show(DialogRequest::new("Error", message));
            }
        }
    }
}
