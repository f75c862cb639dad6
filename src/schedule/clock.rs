use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Timelike, Utc, Weekday};
use chrono_tz::Tz;
use std::time::Duration;

pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Europe::Rome;

pub const MINUTES_PER_DAY: i64 = 1440;

/// The current instant broken down as wall-clock fields in one timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalClock {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub weekday: Weekday,
}

impl LocalClock {
    /// `"YYYY-MM-DD"`, the key prayer rows are stored under.
    pub fn date_key(&self) -> String {
        format!("{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }

    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }

    pub fn minutes_since_midnight(&self) -> u32 {
        self.hour * 60 + self.minute
    }

    pub fn is_friday(&self) -> bool {
        self.weekday == Weekday::Fri
    }

    pub fn hhmm(&self) -> String {
        format!("{:02}:{:02}", self.hour, self.minute)
    }

    pub fn hhmmss(&self) -> String {
        format!("{:02}:{:02}:{:02}", self.hour, self.minute, self.second)
    }
}

/// Resolve an IANA name, falling back to Europe/Rome when absent or unknown.
pub fn resolve_timezone(timezone: Option<&str>) -> Tz {
    match timezone.map(str::trim).filter(|s| !s.is_empty()) {
        Some(name) => name.parse::<Tz>().unwrap_or_else(|_| {
            log::warn!("Unknown timezone '{}', using {}", name, DEFAULT_TIMEZONE);
            DEFAULT_TIMEZONE
        }),
        None => DEFAULT_TIMEZONE,
    }
}

pub fn local_clock(timezone: Option<&str>, now: DateTime<Utc>) -> LocalClock {
    let local = now.with_timezone(&resolve_timezone(timezone));
    LocalClock {
        year: local.year(),
        month: local.month(),
        day: local.day(),
        hour: local.hour(),
        minute: local.minute(),
        second: local.second(),
        weekday: local.weekday(),
    }
}

/// Time left until the next whole wall-clock second.
pub fn next_tick_delay(now: DateTime<Utc>) -> Duration {
    let into_second = now.timestamp_subsec_millis().min(999) as u64;
    Duration::from_millis(1000 - into_second)
}

/// Time until the local date in `timezone` turns over, one second past
/// midnight so the new date is already current on wake.
pub fn until_next_midnight(timezone: Option<&str>, now: DateTime<Utc>) -> Duration {
    let tz = resolve_timezone(timezone);
    let midnight = now
        .with_timezone(&tz)
        .date_naive()
        .succ_opt()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .and_then(|local| tz.from_local_datetime(&local).earliest());
    match midnight {
        Some(at) => (at.with_timezone(&Utc) - now).to_std().unwrap_or_default() + Duration::from_secs(1),
        // Midnight skipped by a DST jump; look again within the hour.
        None => Duration::from_secs(3600),
    }
}
