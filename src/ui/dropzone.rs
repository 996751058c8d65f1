/// Image intake area: drag-and-drop target, file picker, camera trigger

use iced::widget::{button, column, container, text};
use iced::{Alignment, Element, Length};

use crate::Message;

pub fn view(drag_active: bool) -> Element<'static, Message> {
    let prompt = if drag_active {
        "Drop the image to select it"
    } else {
        "Drag & drop a food photo here, or pick one below"
    };

    let content = column![
        text(prompt).size(16),
        button("Browse Files").on_press(Message::PickImage).padding(10),
        button("Take Photo").on_press(Message::OpenCamera).padding(10),
    ]
    .spacing(12)
    .align_x(Alignment::Center);

    container(content)
        .width(Length::Fill)
        .padding(24)
        .center_x(Length::Fill)
        .style(container::bordered_box)
        .into()
}
