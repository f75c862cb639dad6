use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_big_text::{BigText, PixelSize};

use crate::schedule::LocalClock;
use crate::tui::theme;
use crate::utils::hijri::hijri_string;

pub fn render(frame: &mut Frame, area: Rect, clock: &LocalClock, hijri_offset: i32) {
    let block = theme::panel("Today");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(8), Constraint::Length(3), Constraint::Min(0)])
        .split(inner);

    let big = BigText::builder()
        .pixel_size(if inner.width >= 48 { PixelSize::Full } else { PixelSize::Quadrant })
        .style(theme::gold())
        .alignment(Alignment::Center)
        .lines(vec![Line::from(clock.hhmm())])
        .build();
    frame.render_widget(big, rows[1]);

    let gregorian = clock
        .date()
        .map(|d| d.format("%A, %-d %B %Y").to_string())
        .unwrap_or_else(|| clock.date_key());
    let hijri = clock
        .date()
        .and_then(|d| hijri_string(d, hijri_offset))
        .unwrap_or_default();

    let dates = Paragraph::new(vec![
        Line::from(Span::styled(gregorian, theme::bold())),
        Line::from(Span::styled(hijri, theme::amber())),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(dates, rows[2]);
}
