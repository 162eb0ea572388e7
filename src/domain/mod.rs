pub mod error;
pub mod model;

pub use error::AppError;
pub use model::{
    DialogRequest, DownloadSession, ProgressEvent, SessionId, SessionState, VideoUrl,
};
