use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherLocation {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub temperature: Option<f64>,
    pub weathercode: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyWeather {
    pub date: String,
    pub tmax: Option<f64>,
    pub tmin: Option<f64>,
    #[serde(rename = "precipProbMax")]
    pub precip_prob_max: Option<f64>,
    pub weathercode: Option<i64>,
}

/// What the weather proxy returns. Every numeric is optional and is
/// serialized as `null` when the upstream value was missing or not a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location: WeatherLocation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<CurrentWeather>,
    pub daily: Vec<DailyWeather>,
}

/// Short label for a WMO weather interpretation code.
pub fn describe_code(code: Option<i64>) -> &'static str {
    match code {
        Some(0) => "Clear",
        Some(1) => "Mainly clear",
        Some(2) => "Partly cloudy",
        Some(3) => "Overcast",
        Some(45 | 48) => "Fog",
        Some(51..=57) => "Drizzle",
        Some(61..=67) => "Rain",
        Some(71..=77) => "Snow",
        Some(80..=82) => "Showers",
        Some(85 | 86) => "Snow showers",
        Some(95..=99) => "Thunderstorm",
        Some(_) => "Unknown",
        None => "No data",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_numbers_serialize_as_null() {
        let day = DailyWeather {
            date: "2024-05-10".into(),
            tmax: None,
            tmin: Some(12.5),
            precip_prob_max: None,
            weathercode: Some(3),
        };
        let json = serde_json::to_value(&day).unwrap();
        assert!(json["tmax"].is_null());
        assert!(json["precipProbMax"].is_null());
        assert_eq!(json["tmin"], 12.5);
    }

    #[test]
    fn code_ranges() {
        assert_eq!(describe_code(Some(63)), "Rain");
        assert_eq!(describe_code(Some(96)), "Thunderstorm");
        assert_eq!(describe_code(None), "No data");
    }
}
