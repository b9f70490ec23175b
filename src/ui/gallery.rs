use iced::widget::{button, column, container, image, row, scrollable, text, Column};
use iced::{Alignment, Border, Color, Element, Length};
use iced_aw::Wrap;
use std::collections::HashSet;

use super::parse_hex;
use crate::state::data::ImageRecord;
use crate::state::{GroupView, PanelState};
use crate::Message;

/// Directory groups inside one scrollable
pub fn groups<'a>(state: &'a PanelState, loaded: &'a HashSet<String>) -> Element<'a, Message> {
    let content = state
        .groups()
        .into_iter()
        .fold(Column::new().spacing(6), |column, group| {
            column.push(group_panel(state, group, loaded))
        });

    scrollable(content)
        .on_scroll(|_viewport| Message::Scrolled)
        .height(Length::Fill)
        .into()
}

fn group_panel<'a>(
    state: &'a PanelState,
    group: GroupView<'a>,
    loaded: &'a HashSet<String>,
) -> Element<'a, Message> {
    let key = group.key.to_string();
    let marker = if group.expanded { "▾" } else { "▸" };
    let header = row![
        button(text(format!("{marker} {}", group.key)))
            .style(button::text)
            .on_press(Message::ToggleGroup(key.clone()))
            .width(Length::Fill),
        text(format!("({})", group.count())).size(13),
        button(text("📂").size(13))
            .style(button::text)
            .on_press(Message::OpenFolder(key)),
    ]
    .spacing(6)
    .align_y(Alignment::Center);

    if !group.expanded {
        return header.into();
    }

    let thumbnails = group
        .records
        .into_iter()
        .map(|record| thumbnail(state, record, loaded))
        .collect();

    column![header, Wrap::with_elements(thumbnails).spacing(8.0).line_spacing(8.0)]
        .spacing(4)
        .into()
}

/// One thumbnail with its caption and delete action.
///
/// While scrolling, thumbnails that were never fetched render as
/// placeholders; the image is only requested once scrolling settles.
fn thumbnail<'a>(
    state: &'a PanelState,
    record: &'a ImageRecord,
    loaded: &'a HashSet<String>,
) -> Element<'a, Message> {
    let size = f32::from(state.image_size().applied());
    let color = parse_hex(state.background_color());
    let fetch = !state.is_scrolling() || loaded.contains(&record.full_path);

    let picture: Element<Message> = if fetch {
        image(image::Handle::from_path(&record.full_path))
            .width(Length::Fixed(size))
            .height(Length::Fixed(size))
            .into()
    } else {
        container(text(""))
            .width(Length::Fixed(size))
            .height(Length::Fixed(size))
            .into()
    };

    // The record the host focused gets an outline
    let focused = state.focus_target() == Some(record.full_path.as_str());
    let frame = container(picture).padding(2).style(move |_theme| container::Style {
        background: Some(color.into()),
        border: Border {
            width: if focused { 2.0 } else { 0.0 },
            color: Color::from_rgb8(0x19, 0x76, 0xd2),
            radius: 2.0.into(),
        },
        ..container::Style::default()
    });

    column![
        button(frame)
            .padding(0)
            .style(button::text)
            .on_press(Message::Preview(record.full_path.clone())),
        row![
            text(record.file_name.as_str()).size(11).width(Length::Fill),
            button(text("✕").size(11))
                .padding(0)
                .style(button::text)
                .on_press(Message::Remove(record.full_path.clone())),
        ]
        .width(Length::Fixed(size.max(60.0)))
        .align_y(Alignment::Center),
        text(format_size(record.size)).size(10),
    ]
    .spacing(2)
    .into()
}

fn format_size(bytes: u64) -> String {
    match bytes {
        b if b >= 1024 * 1024 => format!("{:.1} MB", b as f64 / 1024.0 / 1024.0),
        b if b >= 1024 => format!("{:.1} KB", b as f64 / 1024.0),
        b => format!("{b} B"),
    }
}
