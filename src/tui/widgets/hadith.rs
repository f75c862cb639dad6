use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use crate::display::Panel;
use crate::models::HadithSnapshot;
use crate::tui::theme;

pub fn render(frame: &mut Frame, area: Rect, panel: &Panel<HadithSnapshot>) {
    let lines = match panel {
        Panel::Loading => vec![Line::from(Span::styled("Loading…", theme::dim()))],
        Panel::Unavailable(_) => vec![Line::from(Span::styled("Hadith unavailable", theme::dim()))],
        Panel::Ready(h) => {
            let mut source = format!("{} #{}", h.collection, h.hadithnumber);
            if let Some(reference) = &h.reference {
                source.push_str(&format!("  ·  {reference}"));
            }
            if let Some(grade) = &h.grade {
                source.push_str(&format!("  ·  {grade}"));
            }
            vec![
                Line::from(Span::styled(h.text.clone(), theme::bold())),
                Line::from(""),
                Line::from(Span::styled(source, theme::amber())),
            ]
        }
    };

    let paragraph = Paragraph::new(lines)
        .block(theme::panel("Hadith of the Day"))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}
