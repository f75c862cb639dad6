use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// `"HH:MM:SS"` → `"HH:MM"`; anything unparseable renders as `--:--`.
pub fn short_time(s: &str) -> String {
    match crate::schedule::parse_minutes(s) {
        Some(m) => format!("{:02}:{:02}", m / 60, m % 60),
        None => "--:--".to_string(),
    }
}

/// Render an optional reading with a unit, `--` when absent.
pub fn reading(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{:.0}{}", v, unit),
        None => "--".to_string(),
    }
}

/// Cut `s` to at most `width` display columns, marking the cut with `…`.
pub fn truncate_to_width(s: &str, width: usize) -> String {
    if s.width() <= width {
        return s.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Create a simple ASCII progress bar
pub fn progress_bar(ratio: f64, width: usize) -> String {
    let ratio = ratio.clamp(0.0, 1.0);
    let filled_count = (ratio * width as f64).round() as usize;
    let empty_count = width.saturating_sub(filled_count);
    format!("{}{}", "█".repeat(filled_count), "░".repeat(empty_count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_time_drops_seconds() {
        assert_eq!(short_time("05:20:00"), "05:20");
        assert_eq!(short_time("bogus"), "--:--");
    }

    #[test]
    fn truncation_respects_wide_glyphs() {
        assert_eq!(truncate_to_width("Jumu'ah", 20), "Jumu'ah");
        assert_eq!(truncate_to_width("Announcement", 6), "Annou…");
        let cut = truncate_to_width("日本語テキスト", 5);
        assert!(cut.width() <= 5, "{cut}");
    }

    #[test]
    fn progress_bar_clamps() {
        assert_eq!(progress_bar(0.5, 4), "██░░");
        assert_eq!(progress_bar(3.0, 2), "██");
        assert_eq!(progress_bar(-1.0, 2), "░░");
    }
}
