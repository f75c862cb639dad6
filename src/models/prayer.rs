use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The five daily prayers, in the order they occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrayerName {
    Fajr,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

impl PrayerName {
    pub const ALL: [PrayerName; 5] = [
        PrayerName::Fajr,
        PrayerName::Dhuhr,
        PrayerName::Asr,
        PrayerName::Maghrib,
        PrayerName::Isha,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PrayerName::Fajr => "fajr",
            PrayerName::Dhuhr => "dhuhr",
            PrayerName::Asr => "asr",
            PrayerName::Maghrib => "maghrib",
            PrayerName::Isha => "isha",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PrayerName::Fajr => "Fajr",
            PrayerName::Dhuhr => "Dhuhr",
            PrayerName::Asr => "Asr",
            PrayerName::Maghrib => "Maghrib",
            PrayerName::Isha => "Isha",
        }
    }
}

impl std::fmt::Display for PrayerName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for PrayerName {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fajr" => Ok(PrayerName::Fajr),
            "dhuhr" | "zuhr" | "dhuhur" => Ok(PrayerName::Dhuhr),
            "asr" => Ok(PrayerName::Asr),
            "maghrib" => Ok(PrayerName::Maghrib),
            "isha" => Ok(PrayerName::Isha),
            _ => Err(anyhow::anyhow!("Unknown prayer name: {}", s)),
        }
    }
}

/// One prayer on one date for one masjid. Times are wall-clock `HH:MM:SS`
/// in the masjid's timezone and are kept as text; a malformed value only
/// disables that row in the schedule scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrayerRow {
    pub masjid_id: String,
    pub date: String,
    pub prayer: PrayerName,
    pub start_time: String,
    pub jamaat_time: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_spellings_of_dhuhr() {
        assert_eq!("Zuhr".parse::<PrayerName>().unwrap(), PrayerName::Dhuhr);
        assert_eq!("dhuhr".parse::<PrayerName>().unwrap(), PrayerName::Dhuhr);
        assert!("tahajjud".parse::<PrayerName>().is_err());
    }

    #[test]
    fn canonical_order_is_chronological() {
        let mut shuffled = vec![PrayerName::Isha, PrayerName::Fajr, PrayerName::Asr];
        shuffled.sort();
        assert_eq!(shuffled, vec![PrayerName::Fajr, PrayerName::Asr, PrayerName::Isha]);
    }
}
