use video_grabber::{app, utils};

fn main() -> iced::Result {
    utils::init_tracing();

    iced::application(app::DownloadApp::default, app::update, app::view)
        .title("YouTube Downloader")
        .run()
}
