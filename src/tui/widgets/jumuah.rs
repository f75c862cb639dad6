use ratatui::{
    layout::{Constraint, Rect},
    text::Span,
    widgets::{Cell, Row, Table},
    Frame,
};

use crate::models::{JumuahRow, MAX_JUMUAH_SLOTS};
use crate::tui::theme;
use crate::utils::format::short_time;

pub fn render(frame: &mut Frame, area: Rect, slots: &[JumuahRow]) {
    let header = Row::new(vec![
        Cell::from(Span::styled("", theme::dim())),
        Cell::from(Span::styled("Khutbah", theme::dim())),
        Cell::from(Span::styled("Jamaat", theme::dim())),
        Cell::from(Span::styled("Language", theme::dim())),
    ])
    .bottom_margin(1);

    let rows: Vec<Row> = slots
        .iter()
        .take(MAX_JUMUAH_SLOTS)
        .map(|s| {
            let mut language = s.language.clone().unwrap_or_default();
            if let Some(notes) = &s.notes {
                language.push_str(&format!("  {notes}"));
            }
            Row::new(vec![
                Cell::from(Span::styled(format!("Slot {}", s.slot), theme::gold())),
                Cell::from(short_time(&s.khutbah_time)),
                Cell::from(short_time(&s.jamaat_time)),
                Cell::from(Span::styled(language, theme::dim())),
            ])
            .style(theme::bold())
            .height(2)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(8),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Min(10),
        ],
    )
    .header(header)
    .block(theme::panel("Jumu'ah"));
    frame.render_widget(table, area);
}
