use ratatui::prelude::{Line, Span};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, BorderType, Borders, Gauge, List, ListItem, ListState, Paragraph},
};

use crate::constants::MILESTONE_COLOR;

use super::{App, NoticeKind, Row, ui_helpers, view_style};

const PHASE_BAR_WIDTH: usize = 12;

impl App {
    pub(super) fn draw_frame(&mut self, f: &mut Frame) {
        let size = f.size();
        let footer_height = if self.show_help { 2 } else { 1 };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(3),
                Constraint::Length(footer_height),
            ])
            .split(size);

        self.render_header(f, chunks[0]);
        self.render_checklist(f, chunks[1]);
        self.render_footer(f, chunks[2]);

        if self.in_reset_modal() {
            self.render_reset_modal(f, size);
        }
    }

    fn render_header(&self, f: &mut Frame, area: Rect) {
        let dashboard = self.tracker.dashboard();
        let overall = dashboard.overall;
        let color = view_style::progress_color(overall.percent);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(
                Line::from(Span::styled(
                    self.tracker.roadmap().title.as_str(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ))
                .alignment(Alignment::Left),
            )
            .title(
                Line::from(Span::styled(
                    format!(
                        "saved {}",
                        ui_helpers::format_last_saved(self.tracker.snapshot().last_saved)
                    ),
                    Style::default().fg(Color::Gray),
                ))
                .alignment(Alignment::Right),
            )
            .border_style(Style::default().fg(color));

        let inner = block.inner(area);
        f.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1)])
            .split(inner);

        let stats_line = Line::from(vec![
            Span::styled("Tasks ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{}/{}", overall.completed, overall.total),
                Style::default().fg(Color::White),
            ),
            Span::styled("   Milestones ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!(
                    "{}/{}",
                    dashboard.milestones.completed, dashboard.milestones.total
                ),
                Style::default().fg(MILESTONE_COLOR),
            ),
            Span::styled("   Overall ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{}%", overall.percent),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
        ]);
        f.render_widget(Paragraph::new(stats_line), rows[0]);

        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(color).bg(Color::Black))
            .percent(overall.percent.min(100) as u16)
            .label(format!("{}%", overall.percent));
        f.render_widget(gauge, rows[1]);
    }

    fn render_checklist(&self, f: &mut Frame, area: Rect) {
        let roadmap = self.tracker.roadmap();
        let dashboard = self.tracker.dashboard();
        let text_width = area.width.saturating_sub(14) as usize;

        let items: Vec<ListItem> = self
            .visible_rows()
            .into_iter()
            .map(|row| match row {
                Row::Phase(index) => {
                    let title = roadmap
                        .phase(index)
                        .map(|phase| phase.title.as_str())
                        .unwrap_or_default();
                    let stats = dashboard.phase(index).copied().unwrap_or_default();
                    let color = view_style::progress_color(stats.percent);
                    let arrow = if self.collapsed.contains(&index) { "▸ " } else { "▾ " };
                    let title_width = text_width.saturating_sub(PHASE_BAR_WIDTH + 12);

                    ListItem::new(Line::from(vec![
                        Span::styled(arrow, Style::default().fg(color)),
                        Span::styled(
                            ui_helpers::truncate_label(title, title_width),
                            Style::default()
                                .fg(Color::White)
                                .add_modifier(Modifier::BOLD),
                        ),
                        Span::raw("  "),
                        Span::styled(
                            ui_helpers::progress_bar(stats.percent, PHASE_BAR_WIDTH),
                            Style::default().fg(color),
                        ),
                        Span::styled(
                            format!(" {:>3}% ({}/{})", stats.percent, stats.completed, stats.total),
                            Style::default().fg(color),
                        ),
                    ]))
                }
                Row::Month { phase, month } => {
                    let title = roadmap
                        .phase(phase)
                        .and_then(|phase| phase.months.get(month))
                        .map(|month| month.title.as_str())
                        .unwrap_or_default();
                    ListItem::new(Line::from(Span::styled(
                        format!("   {}", ui_helpers::truncate_label(title, text_width)),
                        Style::default()
                            .fg(Color::Gray)
                            .add_modifier(Modifier::ITALIC),
                    )))
                }
                Row::Task(id) => {
                    let Some(task) = roadmap.task(&id) else {
                        return ListItem::new(Line::from(""));
                    };
                    let mut spans = vec![
                        Span::raw("      "),
                        view_style::checkbox_span(task.completed),
                        Span::styled(
                            ui_helpers::truncate_label(&task.text, text_width),
                            view_style::task_text_style(task.completed),
                        ),
                    ];
                    if task.kind.is_milestone() {
                        spans.push(Span::styled(" ★", Style::default().fg(MILESTONE_COLOR)));
                    }
                    ListItem::new(Line::from(spans))
                }
            })
            .collect();

        let mut list_state = ListState::default();
        list_state.select(Some(self.selected_index));

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(Color::DarkGray)),
            )
            .highlight_style(Style::default().bg(Color::Rgb(40, 44, 52)));

        f.render_stateful_widget(list, area, &mut list_state);
    }

    fn render_footer(&self, f: &mut Frame, area: Rect) {
        let mut lines = Vec::new();

        if let Some(notification) = &self.notification {
            let (text, color) = match notification.kind {
                NoticeKind::Info => (format!(" ✔ {}", notification.message), Color::Green),
                NoticeKind::Failure => (format!(" {}", notification.message), Color::Red),
            };
            lines.push(Line::from(Span::styled(
                text,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )));
        } else {
            lines.push(Line::from(
                [
                    ("space", "toggle"),
                    ("s", "save"),
                    ("e", "export"),
                    ("r", "report"),
                    ("?", "help"),
                    ("q", "quit"),
                ]
                .into_iter()
                .flat_map(|(key, label)| view_style::key_hint_span(key, label))
                .collect::<Vec<_>>(),
            ));
        }

        if self.show_help {
            lines.push(Line::from(
                [
                    ("↑↓/jk", "move"),
                    ("tab", "next phase"),
                    ("c", "collapse phase"),
                    ("x", "reset all"),
                ]
                .into_iter()
                .flat_map(|(key, label)| view_style::key_hint_span(key, label))
                .collect::<Vec<_>>(),
            ));
        }

        f.render_widget(Paragraph::new(lines), area);
    }
}
