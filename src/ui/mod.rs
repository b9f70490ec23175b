//! Panel presentation
//!
//! Everything here only reads `PanelState`; all decisions (what is visible,
//! expanded, previewed, or allowed to load) are made in `state`.

pub mod gallery;
pub mod toolbar;

use iced::widget::{button, column, container, image, row, text};
use iced::{Color, Element, Length};
use std::collections::HashSet;

use crate::state::data::ImageRecord;
use crate::state::{LoadState, PanelState};
use crate::Message;

/// Whole panel: toolbar on top, then the gallery or an empty/error state.
pub fn panel<'a>(state: &'a PanelState, loaded: &'a HashSet<String>) -> Element<'a, Message> {
    if let Some(record) = state.preview() {
        return preview(record, state.background_color());
    }

    let body: Element<Message> = match state.load_state() {
        LoadState::BeforeFetch => placeholder("Loading images…"),
        LoadState::Failed(message) if state.catalog().version() == 0 => failure(message),
        _ if state.view().is_empty() => placeholder("No images found"),
        _ => gallery::groups(state, loaded),
    };

    let mut content = column![toolbar::view(state)].spacing(8).padding(20);
    if let LoadState::Failed(message) = state.load_state() {
        if state.catalog().version() > 0 {
            content = content.push(text(format!("⚠️  Refresh failed: {message}")).size(13));
        }
    }
    if *state.load_state() == LoadState::Loading {
        content = content.push(text("Refreshing…").size(13));
    }

    content.push(body).into()
}

fn placeholder(label: &str) -> Element<'_, Message> {
    container(text(label).size(16))
        .width(Length::Fill)
        .padding(40)
        .center_x(Length::Fill)
        .into()
}

fn failure(message: &str) -> Element<'_, Message> {
    container(
        column![
            text(format!("Could not load images: {message}")).size(16),
            button("Retry").on_press(Message::Refresh).padding(8),
        ]
        .spacing(12),
    )
    .width(Length::Fill)
    .padding(40)
    .center_x(Length::Fill)
    .into()
}

fn preview<'a>(record: &'a ImageRecord, background: &str) -> Element<'a, Message> {
    let color = parse_hex(background);
    let picture = container(
        image(image::Handle::from_path(&record.full_path))
            .width(Length::Fill)
            .height(Length::Fill),
    )
    .style(move |_theme| container::Style {
        background: Some(color.into()),
        ..container::Style::default()
    })
    .width(Length::Fill)
    .height(Length::Fill);

    column![
        row![
            text(record.path.as_str()).size(14).width(Length::Fill),
            button("Close").on_press(Message::ClosePreview).padding(6),
        ]
        .spacing(8),
        picture,
    ]
    .spacing(8)
    .padding(20)
    .into()
}

/// `#rrggbb` to a color; anything unparsable renders mid-grey
pub fn parse_hex(hex: &str) -> Color {
    let digits = hex.trim_start_matches('#');
    let channel = |i: usize| {
        digits
            .get(i..i + 2)
            .and_then(|s| u8::from_str_radix(s, 16).ok())
    };
    match (digits.len(), channel(0), channel(2), channel(4)) {
        (6, Some(r), Some(g), Some(b)) => Color::from_rgb8(r, g, b),
        _ => Color::from_rgb8(0xcc, 0xcc, 0xcc),
    }
}
