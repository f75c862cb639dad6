pub mod announcement;
pub mod hadith;
pub mod jumuah;
pub mod masjid;
pub mod prayer;
pub mod weather;

pub use announcement::Announcement;
pub use hadith::HadithSnapshot;
pub use jumuah::{JumuahRow, MAX_JUMUAH_SLOTS};
pub use masjid::Masjid;
pub use prayer::{PrayerName, PrayerRow};
pub use weather::{CurrentWeather, DailyWeather, WeatherLocation, WeatherSnapshot};

use serde::{Deserialize, Serialize};

/// Everything a board needs for one masjid on its current local date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardData {
    pub masjid: Masjid,
    pub date: String,
    pub prayers: Vec<PrayerRow>,
    pub jumuah: Vec<JumuahRow>,
    pub announcements: Vec<Announcement>,
}
