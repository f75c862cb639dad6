use crate::models::{PrayerName, PrayerRow};
use crate::schedule::clock::{LocalClock, MINUTES_PER_DAY};

/// Minutes since midnight for `HH:MM` or `HH:MM:SS`. Anything else is `None`.
pub fn parse_minutes(s: &str) -> Option<u32> {
    let parts: Vec<&str> = s.trim().split(':').collect();
    if parts.len() < 2 || parts.len() > 3 {
        return None;
    }
    let hour: u32 = parts[0].parse().ok()?;
    let minute: u32 = parts[1].parse().ok()?;
    if let Some(sec) = parts.get(2) {
        let sec: u32 = sec.parse().ok()?;
        if sec > 59 {
            return None;
        }
    }
    if hour > 23 || minute > 59 {
        return None;
    }
    Some(hour * 60 + minute)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextPrayer {
    pub prayer: PrayerName,
    /// Start time of the prayer, minutes since local midnight.
    pub minutes: u32,
    pub jamaat_minutes: u32,
    /// Everything today has passed; `minutes` is today's fajr standing in
    /// for tomorrow's.
    pub tomorrow: bool,
}

impl NextPrayer {
    /// Minute the countdown runs to: the start time while it is still ahead,
    /// otherwise the jamaat that has not begun yet.
    pub fn target_minutes(&self, now_minutes: u32) -> u32 {
        if self.tomorrow || self.minutes >= now_minutes {
            self.minutes
        } else {
            self.jamaat_minutes
        }
    }
}

fn row_minutes(row: &PrayerRow) -> Option<(u32, u32)> {
    let jamaat = parse_minutes(&row.jamaat_time)?;
    let start = parse_minutes(&row.start_time).unwrap_or(jamaat);
    Some((start, jamaat))
}

fn find_row(rows: &[PrayerRow], name: PrayerName) -> Option<(u32, u32)> {
    rows.iter().filter(|r| r.prayer == name).find_map(row_minutes)
}

/// First prayer, in canonical order, whose jamaat has not yet passed.
/// When all have passed, fajr is returned flagged as tomorrow's.
pub fn next_prayer(rows: &[PrayerRow], clock: &LocalClock) -> Option<NextPrayer> {
    let now = clock.minutes_since_midnight();

    for name in PrayerName::ALL {
        if let Some((start, jamaat)) = find_row(rows, name) {
            if jamaat >= now {
                return Some(NextPrayer {
                    prayer: name,
                    minutes: start,
                    jamaat_minutes: jamaat,
                    tomorrow: false,
                });
            }
        }
    }

    let (start, jamaat) = find_row(rows, PrayerName::Fajr)?;
    Some(NextPrayer {
        prayer: PrayerName::Fajr,
        minutes: start,
        jamaat_minutes: jamaat,
        tomorrow: true,
    })
}

pub fn countdown_minutes(next: &NextPrayer, clock: &LocalClock) -> i64 {
    let now = clock.minutes_since_midnight();
    let diff = next.target_minutes(now) as i64 - now as i64;
    if diff < 0 { diff + MINUTES_PER_DAY } else { diff }
}

pub fn format_countdown(minutes: i64) -> String {
    if minutes < 60 {
        format!("{} min", minutes)
    } else {
        format!("{}h {}m", minutes / 60, minutes % 60)
    }
}

pub fn countdown(next: &NextPrayer, clock: &LocalClock) -> String {
    format_countdown(countdown_minutes(next, clock))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn row(prayer: PrayerName, start: &str, jamaat: &str) -> PrayerRow {
        PrayerRow {
            masjid_id: "m".into(),
            date: "2024-05-10".into(),
            prayer,
            start_time: start.into(),
            jamaat_time: jamaat.into(),
        }
    }

    fn day() -> Vec<PrayerRow> {
        vec![
            row(PrayerName::Fajr, "05:00:00", "05:20:00"),
            row(PrayerName::Dhuhr, "13:00:00", "13:15:00"),
            row(PrayerName::Asr, "16:00:00", "16:20:00"),
            row(PrayerName::Maghrib, "19:00:00", "19:05:00"),
            row(PrayerName::Isha, "20:30:00", "20:45:00"),
        ]
    }

    fn clock(hour: u32, minute: u32) -> LocalClock {
        LocalClock {
            year: 2024,
            month: 5,
            day: 10,
            hour,
            minute,
            second: 0,
            weekday: Weekday::Fri,
        }
    }

    #[test]
    fn parse_accepts_two_or_three_fields() {
        assert_eq!(parse_minutes("16:00:00"), Some(960));
        assert_eq!(parse_minutes("05:07"), Some(307));
        assert_eq!(parse_minutes("5"), None);
        assert_eq!(parse_minutes("1:2:3:4"), None);
        assert_eq!(parse_minutes("aa:10"), None);
        assert_eq!(parse_minutes("25:00"), None);
        assert_eq!(parse_minutes(""), None);
    }

    #[test]
    fn afternoon_resolves_to_asr() {
        let next = next_prayer(&day(), &clock(14, 0)).unwrap();
        assert_eq!(next.prayer, PrayerName::Asr);
        assert_eq!(next.minutes, 960);
        assert!(!next.tomorrow);
        assert_eq!(countdown(&next, &clock(14, 0)), "2h 0m");
    }

    #[test]
    fn after_isha_falls_back_to_fajr() {
        let now = clock(21, 0);
        let next = next_prayer(&day(), &now).unwrap();
        assert_eq!(next.prayer, PrayerName::Fajr);
        assert!(next.tomorrow);
        assert_eq!(next.minutes, 300);
        assert_eq!(countdown_minutes(&next, &now), 300 - 1260 + 1440);
        assert_eq!(countdown(&next, &now), "8h 0m");
    }

    #[test]
    fn between_start_and_jamaat_counts_to_jamaat() {
        let now = clock(16, 10);
        let next = next_prayer(&day(), &now).unwrap();
        assert_eq!(next.prayer, PrayerName::Asr);
        assert_eq!(countdown(&next, &now), "10 min");
    }

    #[test]
    fn jamaat_minute_itself_is_still_next() {
        let next = next_prayer(&day(), &clock(13, 15)).unwrap();
        assert_eq!(next.prayer, PrayerName::Dhuhr);
    }

    #[test]
    fn repeated_calls_agree() {
        let rows = day();
        let now = clock(18, 42);
        assert_eq!(next_prayer(&rows, &now), next_prayer(&rows, &now));
    }

    #[test]
    fn no_rows_means_no_next() {
        assert_eq!(next_prayer(&[], &clock(9, 0)), None);
    }

    #[test]
    fn missing_fajr_after_isha_means_no_next() {
        let rows: Vec<PrayerRow> = day().into_iter().filter(|r| r.prayer != PrayerName::Fajr).collect();
        assert_eq!(next_prayer(&rows, &clock(22, 0)), None);
    }

    #[test]
    fn malformed_row_is_skipped() {
        let mut rows = day();
        rows[2].jamaat_time = "16-20".into();
        let next = next_prayer(&rows, &clock(14, 0)).unwrap();
        assert_eq!(next.prayer, PrayerName::Maghrib);
    }

    #[test]
    fn countdown_format() {
        assert_eq!(format_countdown(0), "0 min");
        assert_eq!(format_countdown(59), "59 min");
        assert_eq!(format_countdown(60), "1h 0m");
        assert_eq!(format_countdown(135), "2h 15m");
    }
}
