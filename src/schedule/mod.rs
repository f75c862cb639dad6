pub mod calculator;
pub mod clock;
pub mod next;

pub use calculator::{JamaatOffsets, PrayerCalculator};
pub use clock::{local_clock, next_tick_delay, resolve_timezone, until_next_midnight, LocalClock, DEFAULT_TIMEZONE};
pub use next::{countdown, countdown_minutes, format_countdown, next_prayer, parse_minutes, NextPrayer};
