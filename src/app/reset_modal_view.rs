use ratatui::prelude::{Line, Span};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use crate::constants::RESET_PROMPT;

use super::App;

impl App {
    pub(super) fn render_reset_modal(&self, f: &mut Frame, terminal_size: Rect) {
        let modal_rect = self.modal_rect(terminal_size);
        let completed = self.tracker.dashboard().overall.completed;

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(
                Line::from(Span::styled(
                    "reset progress",
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ))
                .alignment(Alignment::Center),
            )
            .title_bottom(
                Line::from(vec![
                    Span::styled("y", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
                    Span::styled(" reset · ", Style::default().fg(Color::Gray)),
                    Span::styled("n", Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
                    Span::styled(" keep", Style::default().fg(Color::Gray)),
                ])
                .alignment(Alignment::Center),
            )
            .border_style(Style::default().fg(Color::Red));

        let body = vec![
            Line::from(Span::styled(RESET_PROMPT, Style::default().fg(Color::White))),
            Line::from(""),
            Line::from(Span::styled(
                format!("{} completed task(s) will be cleared.", completed),
                Style::default().fg(Color::Gray),
            )),
        ];

        f.render_widget(Clear, modal_rect);
        f.render_widget(
            Paragraph::new(body)
                .block(block)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            modal_rect,
        );
    }
}
