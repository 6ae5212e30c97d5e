use ratatui::{
    prelude::Span,
    style::{Color, Modifier, Style},
};

use crate::constants::PROGRESS_COLORS;

pub(super) fn progress_color(percent: u32) -> Color {
    let band = (percent.min(100) as usize * PROGRESS_COLORS.len() / 101).min(PROGRESS_COLORS.len() - 1);
    PROGRESS_COLORS[band]
}

pub(super) fn checkbox_span(completed: bool) -> Span<'static> {
    if completed {
        Span::styled("[x] ", Style::default().fg(Color::Green))
    } else {
        Span::styled("[ ] ", Style::default().fg(Color::Gray))
    }
}

pub(super) fn task_text_style(completed: bool) -> Style {
    if completed {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default().fg(Color::White)
    }
}

pub(super) fn key_hint_span(key: &str, label: &str) -> Vec<Span<'static>> {
    vec![
        Span::styled(
            key.to_string(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" {}  ", label), Style::default().fg(Color::Gray)),
    ]
}
