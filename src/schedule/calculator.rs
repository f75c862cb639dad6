use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use chrono_tz::Tz;
use salah::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::{PrayerName, PrayerRow};

/// Minutes between the start time and the congregation for each prayer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JamaatOffsets {
    #[serde(default = "default_fajr_offset")]
    pub fajr: i64,
    #[serde(default = "default_offset")]
    pub dhuhr: i64,
    #[serde(default = "default_offset")]
    pub asr: i64,
    #[serde(default = "default_maghrib_offset")]
    pub maghrib: i64,
    #[serde(default = "default_offset")]
    pub isha: i64,
}

fn default_fajr_offset() -> i64 {
    20
}
fn default_offset() -> i64 {
    15
}
fn default_maghrib_offset() -> i64 {
    5
}

impl Default for JamaatOffsets {
    fn default() -> Self {
        Self {
            fajr: default_fajr_offset(),
            dhuhr: default_offset(),
            asr: default_offset(),
            maghrib: default_maghrib_offset(),
            isha: default_offset(),
        }
    }
}

impl JamaatOffsets {
    fn for_prayer(&self, name: PrayerName) -> i64 {
        match name {
            PrayerName::Fajr => self.fajr,
            PrayerName::Dhuhr => self.dhuhr,
            PrayerName::Asr => self.asr,
            PrayerName::Maghrib => self.maghrib,
            PrayerName::Isha => self.isha,
        }
    }
}

/// Astronomical start times for a masjid's coordinates, used to seed the
/// store when a masjid has no published timetable.
pub struct PrayerCalculator {
    pub lat: f64,
    pub lng: f64,
    pub method_str: String,
    pub madhab_str: String,
    pub timezone: Tz,
}

impl PrayerCalculator {
    pub fn new(lat: f64, lng: f64, method: &str, madhab: &str, timezone: &str) -> Result<Self> {
        parse_method(method)?;
        parse_madhab(madhab)?;
        let timezone: Tz = timezone
            .parse()
            .map_err(|_| anyhow!("Invalid timezone: '{}'", timezone))?;
        Ok(Self {
            lat,
            lng,
            method_str: method.to_string(),
            madhab_str: madhab.to_string(),
            timezone,
        })
    }

    /// Rows for one date with start times rounded to the minute and jamaat
    /// shifted by `offsets`.
    pub fn rows_for(&self, masjid_id: &str, date: NaiveDate, offsets: &JamaatOffsets) -> Result<Vec<PrayerRow>> {
        let coords = Coordinates::new(self.lat, self.lng);
        let params = Configuration::with(parse_method(&self.method_str)?, parse_madhab(&self.madhab_str)?);

        let times = PrayerSchedule::new()
            .on(date)
            .for_location(coords)
            .with_configuration(params)
            .calculate()
            .map_err(|e| anyhow!("Prayer calculation failed: {}", e))?;

        let date_key = date.format("%Y-%m-%d").to_string();
        let rows = PrayerName::ALL
            .iter()
            .map(|&name| {
                let start = times.time(to_salah(name)).with_timezone(&self.timezone).time();
                let jamaat = start + chrono::Duration::minutes(offsets.for_prayer(name));
                PrayerRow {
                    masjid_id: masjid_id.to_string(),
                    date: date_key.clone(),
                    prayer: name,
                    start_time: start.format("%H:%M:00").to_string(),
                    jamaat_time: jamaat.format("%H:%M:00").to_string(),
                }
            })
            .collect();
        Ok(rows)
    }
}

fn to_salah(name: PrayerName) -> Prayer {
    match name {
        PrayerName::Fajr => Prayer::Fajr,
        PrayerName::Dhuhr => Prayer::Dhuhr,
        PrayerName::Asr => Prayer::Asr,
        PrayerName::Maghrib => Prayer::Maghrib,
        PrayerName::Isha => Prayer::Isha,
    }
}

fn parse_method(s: &str) -> Result<Method> {
    match s {
        "MuslimWorldLeague" => Ok(Method::MuslimWorldLeague),
        "Egyptian" => Ok(Method::Egyptian),
        "Karachi" => Ok(Method::Karachi),
        "UmmAlQura" => Ok(Method::UmmAlQura),
        "Dubai" => Ok(Method::Dubai),
        "MoonsightingCommittee" => Ok(Method::MoonsightingCommittee),
        "NorthAmerica" => Ok(Method::NorthAmerica),
        "Kuwait" => Ok(Method::Kuwait),
        "Qatar" => Ok(Method::Qatar),
        "Singapore" => Ok(Method::Singapore),
        "Tehran" => Ok(Method::Tehran),
        "Turkey" => Ok(Method::Turkey),
        "Other" => Ok(Method::Other),
        _ => Err(anyhow!("Unknown calculation method: '{}'", s)),
    }
}

fn parse_madhab(s: &str) -> Result<Madhab> {
    match s {
        "Hanafi" => Ok(Madhab::Hanafi),
        "Shafi" | "Shafi'i" => Ok(Madhab::Shafi),
        _ => Err(anyhow!("Unknown madhab: '{}'", s)),
    }
}
