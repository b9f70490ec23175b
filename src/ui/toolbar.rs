use iced::widget::{button, checkbox, column, container, row, slider, text, text_input, Row};
use iced::{Alignment, Border, Element, Length};

use super::parse_hex;
use crate::state::PanelState;
use crate::Message;

/// Search, type filter, background, size, expand/collapse, scope tag
pub fn view(state: &PanelState) -> Element<'_, Message> {
    let config = state.config();

    let search = row![
        text_input("image path/name", state.keyword())
            .on_input(Message::KeywordChanged)
            .padding(6)
            .width(Length::Fill),
        button("Reload").on_press(Message::Refresh).padding(6),
        button("Open Project").on_press(Message::OpenProject).padding(6),
    ]
    .spacing(8)
    .align_y(Alignment::Center);

    // ========== Type ==========
    let types = state
        .type_options()
        .into_iter()
        .fold(Row::new().spacing(12), |row, (ext, count)| {
            let label = if ext.is_empty() {
                format!("(none) ({count})")
            } else {
                format!("{ext} ({count})")
            };
            let enabled = state.is_type_enabled(&ext);
            row.push(checkbox(label, enabled).on_toggle(move |on| Message::TypeToggled(ext.clone(), on)))
        });
    let type_row = row![
        text("Type:"),
        types.width(Length::Fill),
        text(total_label(state)),
    ]
    .spacing(8)
    .align_y(Alignment::Center);

    // ========== Background ==========
    let swatches = config
        .background_colors
        .iter()
        .enumerate()
        .fold(Row::new().spacing(4), |row, (index, hex)| {
            let color = parse_hex(hex);
            let selected = index == state.background();
            row.push(
                button(container(text("")).width(16).height(16))
                    .padding(0)
                    .style(move |_theme, _status| button::Style {
                        background: Some(color.into()),
                        border: Border {
                            width: if selected { 2.0 } else { 1.0 },
                            color: if selected {
                                iced::Color::from_rgb8(0x19, 0x76, 0xd2)
                            } else {
                                iced::Color::from_rgb8(0xdd, 0xdd, 0xdd)
                            },
                            radius: 2.0.into(),
                        },
                        ..button::Style::default()
                    })
                    .on_press(Message::BackgroundSelected(index)),
            )
        });

    // ========== Size ==========
    let size = state.image_size();
    let size_row = row![
        text("Size:"),
        slider(
            config.min_image_size..=config.max_image_size,
            size.displayed(),
            Message::SizeDragged,
        )
        .step(config.image_size_step)
        .on_release(Message::SizeReleased)
        .width(Length::Fill),
        text(format!("{}px", size.displayed())),
    ]
    .spacing(8)
    .align_y(Alignment::Center);

    // ========== Expand / Collapse ==========
    let mut summary = row![
        text(format!("Search result: {}", state.visible_count())),
        button("Expand All").on_press(Message::ExpandAll).padding(4),
        button("Collapse All").on_press(Message::CollapseAll).padding(4),
    ]
    .spacing(12)
    .align_y(Alignment::Center);
    if state.lazy_load() {
        summary = summary.push(text("lazy loading").size(12));
    }

    let mut content = column![
        search,
        type_row,
        row![text("Background:"), swatches].spacing(8).align_y(Alignment::Center),
        size_row,
        summary,
    ]
    .spacing(6);

    if !state.scope().is_empty() {
        content = content.push(
            row![
                text(format!("Search in: {}", state.scope())),
                button("×").on_press(Message::ClearScope).padding(2),
            ]
            .spacing(4)
            .align_y(Alignment::Center),
        );
    }

    content.into()
}

fn total_label(state: &PanelState) -> String {
    match state.catalog().refreshed_at() {
        Some(at) => format!(
            "Total count: {} (as of {})",
            state.total_count(),
            at.with_timezone(&chrono::Local).format("%H:%M:%S")
        ),
        None => format!("Total count: {}", state.total_count()),
    }
}
