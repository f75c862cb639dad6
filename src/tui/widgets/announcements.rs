use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use crate::models::Announcement;
use crate::tui::theme;

pub fn render(frame: &mut Frame, area: Rect, items: &[Announcement]) {
    let mut lines = Vec::new();
    for a in items {
        let marker = if a.pinned { "📌 " } else { "• " };
        lines.push(Line::from(vec![
            Span::styled(marker, theme::amber()),
            Span::styled(a.title.clone(), theme::gold().add_modifier(Modifier::BOLD)),
            Span::styled(format!("  [{}]", a.category), theme::dim()),
        ]));
        if !a.body.is_empty() {
            lines.push(Line::from(Span::styled(format!("   {}", a.body), theme::bold())));
        }
        lines.push(Line::from(""));
    }

    let paragraph = Paragraph::new(lines)
        .block(theme::panel("Announcements"))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}
