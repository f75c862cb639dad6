use ratatui::{
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::display::Panel;
use crate::models::weather::describe_code;
use crate::models::WeatherSnapshot;
use crate::tui::theme;
use crate::utils::format::reading;

pub fn render(frame: &mut Frame, area: Rect, panel: &Panel<WeatherSnapshot>) {
    let lines = match panel {
        Panel::Loading => vec![Line::from(""), Line::from(Span::styled("Loading…", theme::dim()))],
        Panel::Unavailable(_) => vec![
            Line::from(""),
            Line::from(Span::styled("Weather unavailable", theme::dim())),
        ],
        Panel::Ready(snapshot) => snapshot_lines(snapshot),
    };
    let paragraph = Paragraph::new(lines)
        .block(theme::panel("Weather"))
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

fn snapshot_lines(snapshot: &WeatherSnapshot) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(snapshot.location.name.clone(), theme::dim())),
        Line::from(""),
    ];
    if let Some(current) = &snapshot.current {
        lines.push(Line::from(vec![
            Span::styled(reading(current.temperature, "°C"), theme::gold().add_modifier(Modifier::BOLD)),
            Span::styled(format!("  {}", describe_code(current.weathercode)), theme::bold()),
        ]));
        lines.push(Line::from(""));
    }
    for day in &snapshot.daily {
        let rain = match day.precip_prob_max {
            Some(p) => format!("{:.0}%", p),
            None => "--".to_string(),
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{:<12}", day.date), theme::dim()),
            Span::styled(
                format!("{:>5} / {:<5}", reading(day.tmax, "°"), reading(day.tmin, "°")),
                theme::bold(),
            ),
            Span::styled(format!("  {:<14}", describe_code(day.weathercode)), theme::amber()),
            Span::styled(format!("rain {rain}"), theme::dim()),
        ]));
    }
    lines
}
