use chrono::{DateTime, Utc};

use crate::models::{Announcement, BoardData, HadithSnapshot, JumuahRow, Masjid, PrayerRow, WeatherSnapshot};
use crate::schedule::{countdown, local_clock, next_prayer, LocalClock, NextPrayer};

/// A remotely loaded panel.
#[derive(Debug, Clone, PartialEq)]
pub enum Panel<T> {
    Loading,
    Ready(T),
    Unavailable(String),
}

impl<T> Panel<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Panel::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Panel::Loading)
    }
}

/// Everything the board knows about one masjid. Each update replaces what
/// it carries; whichever lands last wins.
#[derive(Debug, Clone)]
pub struct BoardState {
    pub masjid: Option<Masjid>,
    pub date: Option<String>,
    pub prayers: Vec<PrayerRow>,
    pub jumuah: Vec<JumuahRow>,
    pub announcements: Vec<Announcement>,
    pub weather: Panel<WeatherSnapshot>,
    pub hadith: Panel<HadithSnapshot>,
    /// The most recent board payload came from cache.
    pub offline: bool,
    pub revision: Option<u64>,
    pub last_error: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for BoardState {
    fn default() -> Self {
        Self {
            masjid: None,
            date: None,
            prayers: Vec::new(),
            jumuah: Vec::new(),
            announcements: Vec::new(),
            weather: Panel::Loading,
            hadith: Panel::Loading,
            offline: false,
            revision: None,
            last_error: None,
            updated_at: None,
        }
    }
}

impl BoardState {
    pub fn apply_board(&mut self, data: BoardData, offline: bool, now: DateTime<Utc>) {
        self.masjid = Some(data.masjid);
        self.date = Some(data.date);
        self.prayers = data.prayers;
        self.jumuah = data.jumuah;
        self.announcements = data.announcements;
        self.offline = offline;
        self.last_error = None;
        self.updated_at = Some(now);
    }

    pub fn is_loaded(&self) -> bool {
        self.masjid.is_some()
    }

    /// Timezone for the clock: explicit override, then the masjid's own.
    pub fn timezone<'a>(&'a self, override_tz: Option<&'a str>) -> Option<&'a str> {
        override_tz.or(self.masjid.as_ref().map(|m| m.timezone.as_str()))
    }

    /// Prayer rows for the local date in `view`; rows loaded for another
    /// day are withheld.
    pub fn prayers_for(&self, view: &BoardView) -> &[PrayerRow] {
        if view.stale_prayers { &[] } else { &self.prayers }
    }

    /// Values recomputed on every tick from the stored rows and `now`.
    pub fn view(&self, override_tz: Option<&str>, now: DateTime<Utc>) -> BoardView {
        let clock = local_clock(self.timezone(override_tz), now);
        let stale_prayers = self.date.as_deref().is_some_and(|date| date != clock.date_key());
        let rows: &[PrayerRow] = if stale_prayers { &[] } else { &self.prayers };
        let next = next_prayer(rows, &clock);
        let countdown = next.as_ref().map(|n| countdown(n, &clock));
        BoardView {
            clock,
            next,
            countdown,
            stale_prayers,
            announcements: crate::models::announcement::active_sorted(&self.announcements, now),
            is_friday: clock.is_friday(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BoardView {
    pub clock: LocalClock,
    pub next: Option<NextPrayer>,
    pub countdown: Option<String>,
    /// The stored rows belong to a different local date than the clock.
    pub stale_prayers: bool,
    pub announcements: Vec<Announcement>,
    pub is_friday: bool,
}
