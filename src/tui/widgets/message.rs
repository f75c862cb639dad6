use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use crate::tui::theme;

/// Full-screen notice for states where no board can be shown.
pub fn render(frame: &mut Frame, area: Rect, title: &str, message: &str) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(30), Constraint::Min(8), Constraint::Percentage(30)])
        .split(area);

    let lines: Vec<Line> = message
        .lines()
        .map(|l| Line::from(Span::styled(l.to_string(), theme::bold())))
        .collect();
    let paragraph = Paragraph::new(lines)
        .block(theme::panel(title))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, rows[1]);
}
