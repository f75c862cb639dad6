use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{List, ListItem},
    Frame,
};

use crate::models::Masjid;
use crate::tui::theme;

pub fn render(frame: &mut Frame, area: Rect, masjids: &[Masjid], selected: usize) {
    let items: Vec<ListItem> = masjids
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let (marker, style) = if i == selected {
                ("▶ ", theme::next_row())
            } else {
                ("  ", theme::bold())
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{marker}{}", m.name), style),
                Span::styled(format!("  {}  ({})", m.city, m.id), theme::dim()),
            ]))
        })
        .collect();

    let list = List::new(items).block(theme::panel("Choose a masjid  [↑↓] move  [Enter] select"));
    frame.render_widget(list, area);
}
