use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("Please enter a YouTube URL")]
    EmptyInput,

    #[error("Please enter a valid YouTube URL")]
    InvalidUrl,

    #[error("A download is already running")]
    DownloadInProgress,

    #[error("Video information is already being fetched")]
    FetchInProgress,
}

impl AppError {
    /// Dialog title shown for input errors.
    pub fn dialog_title(&self) -> &'static str {
        match self {
            AppError::EmptyInput => "Input Error",
            AppError::InvalidUrl => "Invalid URL",
            AppError::DownloadInProgress | AppError::FetchInProgress => "Busy",
        }
    }
}
