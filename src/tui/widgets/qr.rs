use ratatui::{
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::tui::theme;

pub fn render(frame: &mut Frame, area: Rect, url: &str, masjid: Option<&str>) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            masjid.map(|m| format!("Stay connected with {m}")).unwrap_or_else(|| "Stay connected".into()),
            theme::dim(),
        )),
        Line::from(""),
        Line::from(Span::styled(url.to_string(), theme::gold().add_modifier(Modifier::BOLD | Modifier::UNDERLINED))),
    ];
    let paragraph = Paragraph::new(lines)
        .block(theme::panel("Visit Us"))
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}
