use ratatui::{
    layout::{Constraint, Rect},
    text::Span,
    widgets::{Cell, Row, Table},
    Frame,
};

use crate::models::{PrayerName, PrayerRow};
use crate::schedule::NextPrayer;
use crate::tui::theme;
use crate::utils::format::short_time;

pub fn render(frame: &mut Frame, area: Rect, rows: &[PrayerRow], next: Option<&NextPrayer>) {
    let header = Row::new(vec![
        Cell::from(Span::styled("Prayer", theme::dim())),
        Cell::from(Span::styled("Begins", theme::dim())),
        Cell::from(Span::styled("Jamaat", theme::dim())),
    ])
    .bottom_margin(1);

    let body: Vec<Row> = PrayerName::ALL
        .iter()
        .map(|name| {
            let row = rows.iter().find(|r| r.prayer == *name);
            let (start, jamaat) = match row {
                Some(r) => (short_time(&r.start_time), short_time(&r.jamaat_time)),
                None => ("--:--".to_string(), "--:--".to_string()),
            };
            let is_next = next.is_some_and(|n| n.prayer == *name);
            let style = if is_next { theme::next_row() } else { theme::bold() };
            let marker = if is_next { "▶ " } else { "  " };
            Row::new(vec![
                Cell::from(format!("{marker}{}", name.display_name())),
                Cell::from(start),
                Cell::from(jamaat),
            ])
            .style(style)
            .height(2)
        })
        .collect();

    let table = Table::new(
        body,
        [Constraint::Percentage(40), Constraint::Percentage(30), Constraint::Percentage(30)],
    )
    .header(header)
    .block(theme::panel("Prayer Times"));

    frame.render_widget(table, area);
}
