use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::schedule::LocalClock;
use crate::tui::theme;
use crate::utils::format::truncate_to_width;

/// Top bar: masjid name on the left, local time on the right.
pub fn render(frame: &mut Frame, area: Rect, masjid: Option<&str>, city: Option<&str>, clock: &LocalClock) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::gold().add_modifier(Modifier::BOLD))
        .style(theme::base());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(inner);

    let width = (halves[0].width as usize).saturating_sub(1);
    let mut name = vec![Span::styled(
        format!(" {}", truncate_to_width(masjid.unwrap_or("minbar"), width)),
        theme::gold().add_modifier(Modifier::BOLD),
    )];
    if let Some(city) = city {
        name.push(Span::styled("  ·  ", theme::dim()));
        name.push(Span::styled(city.to_string(), theme::dim()));
    }
    frame.render_widget(Paragraph::new(Line::from(name)), halves[0]);

    let time = Paragraph::new(Line::from(Span::styled(
        format!("{} ", clock.hhmmss()),
        theme::amber().add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Right);
    frame.render_widget(time, halves[1]);
}
