pub mod bridge;
pub mod download_controller;
pub mod info_controller;
pub mod worker;

pub use bridge::{Dispatched, UiDispatcher, UiReceiver};
pub use download_controller::{DownloadController, StartTicket};
pub use info_controller::InfoController;
