/// Result cards
///
/// One card per recognized food, in the order the service returned them:
/// heading, the four nutrient stats, then the free-text details.

use iced::widget::{column, container, row, text, Column};
use iced::{Alignment, Element, Length};

use crate::api::model::{FoodResult, Nutrient};
use crate::Message;

pub fn view(results: &[FoodResult]) -> Element<'_, Message> {
    let mut cards: Column<Message> = column![].spacing(16).width(Length::Fill);

    for result in results {
        cards = cards.push(card(result));
    }

    cards.into()
}

fn card(result: &FoodResult) -> Element<'_, Message> {
    let nutrition = &result.nutritional_info;

    let stats = row![
        stat("Calories", &nutrition.calories),
        stat("Protein", &nutrition.protein),
        stat("Carbs", &nutrition.carbs),
        stat("Fat", &nutrition.fat),
    ]
    .spacing(12);

    let mut body = column![text(&result.food_item).size(26), stats].spacing(12);

    if !nutrition.details.is_empty() {
        body = body.push(text(&nutrition.details).size(14));
    }

    container(body)
        .width(Length::Fill)
        .padding(16)
        .style(container::bordered_box)
        .into()
}

fn stat<'a>(label: &'a str, value: &Nutrient) -> Element<'a, Message> {
    container(
        column![text(label).size(13), text(value.to_string()).size(22)]
            .spacing(4)
            .align_x(Alignment::Center),
    )
    .padding(10)
    .into()
}
