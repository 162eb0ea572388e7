pub mod dialog;

use iced::{
    widget::{button, column, container, progress_bar, text, text_input, Column, Space},
    Element, Length,
};

use crate::{
    application::{DownloadController, InfoController},
    domain::DialogRequest,
};

#[derive(Debug, Clone)]
pub enum DownloadMessage {
    UrlChanged(String),
    DownloadPressed,
    DialogDismissed,
}

#[derive(Debug, Clone)]
pub enum InfoMessage {
    UrlChanged(String),
    FetchPressed,
    DialogDismissed,
}

pub fn download_view(controller: &DownloadController) -> Element<'_, DownloadMessage> {
    let label = if controller.trigger_enabled() {
        "START DOWNLOAD"
    } else {
        "DOWNLOADING..."
    };

    let content = column![
        text("🎬 Download YouTube Videos").size(32),
        Space::new().height(Length::Fixed(20.0)),
        text_input("Paste YouTube URL here...", controller.url_input())
            .on_input(DownloadMessage::UrlChanged)
            .padding(10),
        button(label)
            .on_press_maybe(
                controller
                    .trigger_enabled()
                    .then_some(DownloadMessage::DownloadPressed)
            )
            .padding([10, 20]),
        Space::new().height(Length::Fixed(10.0)),
        progress_bar(0.0..=100.0, controller.progress()),
        text(controller.status_text()).size(14),
        text("📁 Download Location: Current Folder").size(12),
    ];

    with_dialog(content, controller.dialog(), DownloadMessage::DialogDismissed)
}

pub fn info_view(controller: &InfoController) -> Element<'_, InfoMessage> {
    let content = column![
        text("🎬 Get YouTube Video Info").size(32),
        Space::new().height(Length::Fixed(20.0)),
        text_input("Paste YouTube URL here...", controller.url_input())
            .on_input(InfoMessage::UrlChanged)
            .padding(10),
        button(controller.button_label())
            .on_press_maybe(
                controller
                    .trigger_enabled()
                    .then_some(InfoMessage::FetchPressed)
            )
            .padding([10, 20]),
        Space::new().height(Length::Fixed(10.0)),
        text(controller.info_text()).size(14),
    ];

    with_dialog(content, controller.dialog(), InfoMessage::DialogDismissed)
}

/// Appends the live dialog, if any, with its OK button.
fn with_dialog<'a, M: Clone + 'a>(
    content: Column<'a, M>,
    dialog: Option<&'a DialogRequest>,
    on_ok: M,
) -> Element<'a, M> {
    let content = match dialog {
        Some(dialog) => content.push(
            container(
                column![
                    text(&dialog.title).size(20),
                    text(&dialog.body),
                    button("OK").on_press(on_ok).padding([6, 16]),
                ]
                .spacing(10),
            )
            .padding(20),
        ),
        None => content,
    };

    content.padding(20).spacing(10).into()
}
