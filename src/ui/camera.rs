/// Full-window camera overlay
///
/// Shows the live preview (once the stream delivers frames) with capture
/// and close controls underneath.

use iced::widget::image::Handle;
use iced::widget::{button, column, container, image as image_widget, row, text};
use iced::{Alignment, Element, Length};

use crate::Message;

pub fn view(preview: Option<&Handle>) -> Element<'static, Message> {
    let feed: Element<'static, Message> = match preview {
        Some(handle) => image_widget(handle.clone()).width(Length::Fill).into(),
        None => text("Starting camera...").size(16).into(),
    };

    let controls = row![
        button("Close").on_press(Message::CloseCamera).padding(10),
        button("Capture").on_press(Message::CapturePhoto).padding(10),
    ]
    .spacing(12);

    container(
        column![feed, controls]
            .spacing(16)
            .align_x(Alignment::Center),
    )
    .width(Length::Fill)
    .height(Length::Fill)
    .center_x(Length::Fill)
    .center_y(Length::Fill)
    .into()
}
