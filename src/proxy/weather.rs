use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;

use crate::config::ServerConfig;
use crate::models::{CurrentWeather, DailyWeather, WeatherLocation, WeatherSnapshot};
use crate::proxy::error::{ProxyError, ProxyResult, SchemaError};
use crate::proxy::upstream::Upstream;

pub const FORECAST_DAYS: u32 = 4;

#[derive(Debug, Default, Deserialize)]
pub struct WeatherQuery {
    pub city: Option<String>,
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub tz: Option<String>,
}

/// Finite JSON number, otherwise `None`. Strings, booleans and nulls are
/// never passed on as readings.
pub fn finite_number(value: &Value) -> Option<f64> {
    value.as_f64().filter(|v| v.is_finite())
}

fn integral(value: &Value) -> Option<i64> {
    finite_number(value).filter(|v| v.fract() == 0.0).map(|v| v as i64)
}

fn parse_coordinate(raw: Option<&str>) -> Option<f64> {
    raw?.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn endpoint(base: &str, params: &[(&str, String)]) -> ProxyResult<Url> {
    Url::parse_with_params(base, params)
        .map_err(|e| ProxyError::Internal(format!("Bad upstream url '{}': {}", base, e)))
}

/// Take the best geocoding match, or `None` when nothing matched.
pub fn parse_geocoding(payload: &Value) -> Result<Option<WeatherLocation>, SchemaError> {
    let Some(results) = payload.get("results") else {
        return Ok(None);
    };
    let results = results
        .as_array()
        .ok_or_else(|| SchemaError("geocoding results is not an array".into()))?;
    let Some(best) = results.first() else {
        return Ok(None);
    };
    let latitude = best.get("latitude").and_then(finite_number);
    let longitude = best.get("longitude").and_then(finite_number);
    match (latitude, longitude) {
        (Some(latitude), Some(longitude)) => Ok(Some(WeatherLocation {
            name: best
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            latitude,
            longitude,
        })),
        _ => Err(SchemaError("geocoding match lacks numeric coordinates".into())),
    }
}

fn series<'a>(daily: &'a Value, key: &str) -> Result<Option<&'a Vec<Value>>, SchemaError> {
    match daily.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => Ok(Some(items)),
        Some(_) => Err(SchemaError(format!("daily.{key} is not an array"))),
    }
}

fn at<F, T>(items: Option<&Vec<Value>>, i: usize, f: F) -> Option<T>
where
    F: Fn(&Value) -> Option<T>,
{
    items.and_then(|s| s.get(i)).and_then(f)
}

/// Validate an Open-Meteo forecast and reshape it. Structural problems are
/// errors; individual unusable readings become `None`.
pub fn parse_forecast(location: WeatherLocation, payload: &Value) -> Result<WeatherSnapshot, SchemaError> {
    if !payload.is_object() {
        return Err(SchemaError("forecast payload is not an object".into()));
    }

    let current = match payload.get("current").or_else(|| payload.get("current_weather")) {
        None | Some(Value::Null) => None,
        Some(c) if c.is_object() => Some(CurrentWeather {
            temperature: c
                .get("temperature_2m")
                .or_else(|| c.get("temperature"))
                .and_then(finite_number),
            weathercode: c
                .get("weather_code")
                .or_else(|| c.get("weathercode"))
                .and_then(integral),
        }),
        Some(_) => return Err(SchemaError("current is not an object".into())),
    };

    let daily = payload
        .get("daily")
        .filter(|d| d.is_object())
        .ok_or_else(|| SchemaError("daily block missing".into()))?;
    let dates = series(daily, "time")?.ok_or_else(|| SchemaError("daily.time missing".into()))?;
    let tmax = series(daily, "temperature_2m_max")?;
    let tmin = series(daily, "temperature_2m_min")?;
    let precip = series(daily, "precipitation_probability_max")?;
    let codes = match series(daily, "weather_code")? {
        Some(c) => Some(c),
        None => series(daily, "weathercode")?,
    };

    let mut days = Vec::with_capacity(dates.len());
    for (i, date) in dates.iter().enumerate() {
        let date = date
            .as_str()
            .ok_or_else(|| SchemaError(format!("daily.time[{i}] is not a string")))?;
        days.push(DailyWeather {
            date: date.to_string(),
            tmax: at(tmax, i, finite_number),
            tmin: at(tmin, i, finite_number),
            precip_prob_max: at(precip, i, finite_number),
            weathercode: at(codes, i, integral),
        });
    }

    Ok(WeatherSnapshot {
        location,
        current,
        daily: days,
    })
}

pub async fn lookup(upstream: &dyn Upstream, config: &ServerConfig, query: WeatherQuery) -> ProxyResult<WeatherSnapshot> {
    let tz = query
        .tz
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(crate::schedule::DEFAULT_TIMEZONE.name())
        .to_string();
    let city = query.city.as_deref().map(str::trim).filter(|s| !s.is_empty());

    let location = match (parse_coordinate(query.lat.as_deref()), parse_coordinate(query.lon.as_deref())) {
        (Some(latitude), Some(longitude)) => WeatherLocation {
            name: city
                .map(str::to_string)
                .unwrap_or_else(|| format!("{latitude:.2}, {longitude:.2}")),
            latitude,
            longitude,
        },
        _ => {
            let city = city.ok_or_else(|| ProxyError::BadRequest("Provide city or lat/lon".into()))?;
            let url = endpoint(
                &config.geocoding_url,
                &[
                    ("name", city.to_string()),
                    ("count", "1".into()),
                    ("language", "en".into()),
                    ("format", "json".into()),
                ],
            )?;
            let payload = upstream
                .get_json(&url)
                .await
                .map_err(|e| ProxyError::upstream("Geocoding failed", &e))?;
            parse_geocoding(&payload)?.ok_or_else(|| ProxyError::NotFound("City not found".into()))?
        }
    };

    let url = endpoint(
        &config.forecast_url,
        &[
            ("latitude", location.latitude.to_string()),
            ("longitude", location.longitude.to_string()),
            ("current", "temperature_2m,weather_code".into()),
            (
                "daily",
                "weather_code,temperature_2m_max,temperature_2m_min,precipitation_probability_max".into(),
            ),
            ("timezone", tz),
            ("forecast_days", FORECAST_DAYS.to_string()),
        ],
    )?;
    let payload = upstream
        .get_json(&url)
        .await
        .map_err(|e| ProxyError::upstream("Forecast failed", &e))?;

    Ok(parse_forecast(location, &payload)?)
}
