use video_grabber::{info_app, utils};

fn main() -> iced::Result {
    utils::init_tracing();

    iced::application(info_app::InfoApp::default, info_app::update, info_app::view)
        .title("YouTube Video Info")
        .run()
}
