use ratatui::{
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::schedule::NextPrayer;
use crate::tui::theme;

pub fn render(frame: &mut Frame, area: Rect, next: Option<&NextPrayer>, countdown: Option<&str>) {
    let content: Vec<Line> = match (next, countdown) {
        (Some(next), Some(countdown)) => {
            let fmt = |m: u32| format!("{:02}:{:02}", m / 60, m % 60);
            let when = if next.tomorrow { "tomorrow" } else { "today" };
            vec![
                Line::from(""),
                Line::from(Span::styled(
                    next.prayer.display_name().to_uppercase(),
                    theme::gold().add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(vec![
                    Span::styled("in  ", theme::dim()),
                    Span::styled(countdown.to_string(), theme::amber().add_modifier(Modifier::BOLD)),
                ]),
                Line::from(""),
                Line::from(Span::styled(
                    format!("begins {}  ·  jamaat {}  ({})", fmt(next.minutes), fmt(next.jamaat_minutes), when),
                    theme::dim(),
                )),
            ]
        }
        _ => vec![Line::from(""), Line::from(Span::styled("No prayer times for today", theme::dim()))],
    };

    let paragraph = Paragraph::new(content)
        .block(theme::panel("Next Prayer"))
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}
