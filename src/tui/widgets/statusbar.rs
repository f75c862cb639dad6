use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::tui::theme;
use crate::utils::format::progress_bar;

pub struct Status<'a> {
    pub slide: Option<&'a str>,
    pub position: (usize, usize),
    pub progress: f64,
    pub offline: bool,
    pub error: Option<&'a str>,
}

pub fn render(frame: &mut Frame, area: Rect, status: &Status) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(36)])
        .split(area);

    let mut left = Vec::new();
    if status.offline {
        left.push(Span::styled(" OFFLINE · showing cached data ", theme::offline_banner()));
        left.push(Span::raw(" "));
    } else if let Some(error) = status.error {
        left.push(Span::styled(format!(" {} ", error), theme::amber()));
    }
    if let Some(slide) = status.slide {
        let (index, total) = status.position;
        left.push(Span::styled(format!(" {slide} "), theme::gold()));
        left.push(Span::styled(format!("{}/{} ", index + 1, total), theme::dim()));
        let bar_width = (cols[0].width as usize).saturating_sub(slide.len() + 40).clamp(4, 40);
        left.push(Span::styled(progress_bar(status.progress, bar_width), theme::green()));
    }
    frame.render_widget(Paragraph::new(Line::from(left)), cols[0]);

    let hints = [("[←→]", " slide  "), ("[r]", " refresh  "), ("[q]", " quit")];
    let mut spans = Vec::new();
    for (key, label) in hints {
        spans.push(Span::styled(key, theme::gold()));
        spans.push(Span::styled(label, theme::dim()));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), cols[1]);
}
