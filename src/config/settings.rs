use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::display::deck::SlideKind;
use crate::schedule::JamaatOffsets;

fn default_slide_seconds() -> u64 {
    12
}
fn default_server_url() -> String {
    "http://127.0.0.1:8787".to_string()
}
fn default_refresh_secs() -> u64 {
    300
}
fn default_watch_secs() -> u64 {
    15
}
fn default_slides() -> Vec<SlideKind> {
    SlideKind::ALL.to_vec()
}
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8787
}
fn default_geocoding_url() -> String {
    "https://geocoding-api.open-meteo.com/v1/search".to_string()
}
fn default_forecast_url() -> String {
    "https://api.open-meteo.com/v1/forecast".to_string()
}
fn default_hadith_primary() -> String {
    "https://cdn.jsdelivr.net/gh/fawazahmed0/hadith-api@1".to_string()
}
fn default_hadith_secondary() -> String {
    "https://raw.githubusercontent.com/fawazahmed0/hadith-api/1".to_string()
}
fn default_edition() -> String {
    "eng-bukhari".to_string()
}
fn default_hadith_max() -> u32 {
    7000
}
fn default_timezone() -> String {
    "Europe/Rome".to_string()
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_calc_method() -> String {
    "MuslimWorldLeague".to_string()
}
fn default_madhab() -> String {
    "Shafi".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default)]
    pub masjid_id: Option<String>,
    #[serde(default = "default_slide_seconds")]
    pub slide_seconds: u64,
    /// Overrides the masjid's own timezone.
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default = "default_slides")]
    pub slides: Vec<SlideKind>,
    #[serde(default = "default_server_url")]
    pub server_url: String,
    #[serde(default = "default_refresh_secs")]
    pub refresh_secs: u64,
    #[serde(default = "default_watch_secs")]
    pub watch_secs: u64,
    #[serde(default)]
    pub qr_url: Option<String>,
    #[serde(default)]
    pub hadith_edition: Option<String>,
    /// Days to add/subtract from the Hijri date for local moon sighting.
    #[serde(default)]
    pub hijri_offset: i32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            masjid_id: None,
            slide_seconds: default_slide_seconds(),
            timezone: None,
            slides: default_slides(),
            server_url: default_server_url(),
            refresh_secs: default_refresh_secs(),
            watch_secs: default_watch_secs(),
            qr_url: None,
            hadith_edition: None,
            hijri_offset: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_geocoding_url")]
    pub geocoding_url: String,
    #[serde(default = "default_forecast_url")]
    pub forecast_url: String,
    #[serde(default = "default_hadith_primary")]
    pub hadith_primary: String,
    #[serde(default = "default_hadith_secondary")]
    pub hadith_secondary: String,
    #[serde(default = "default_edition")]
    pub hadith_edition: String,
    /// Upper bound for hadith numbers drawn from the daily seed.
    #[serde(default = "default_hadith_max")]
    pub hadith_max_number: u32,
    /// Zone used to derive the default daily seed.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_timeout_secs")]
    pub upstream_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            geocoding_url: default_geocoding_url(),
            forecast_url: default_forecast_url(),
            hadith_primary: default_hadith_primary(),
            hadith_secondary: default_hadith_secondary(),
            hadith_edition: default_edition(),
            hadith_max_number: default_hadith_max(),
            timezone: default_timezone(),
            upstream_timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CacheConfig {
    /// Replaces the build tag in cache names; changing it drops old caches.
    #[serde(default)]
    pub version: Option<String>,
}

impl CacheConfig {
    pub fn version_tag(&self) -> String {
        self.version
            .clone()
            .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateConfig {
    #[serde(default = "default_calc_method")]
    pub calc_method: String,
    #[serde(default = "default_madhab")]
    pub madhab: String,
    #[serde(default)]
    pub jamaat: JamaatOffsets,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            calc_method: default_calc_method(),
            madhab: default_madhab(),
            jamaat: JamaatOffsets::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub generate: GenerateConfig,
}

impl AppConfig {
    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("", "", "minbar")
            .context("Could not determine project directories")
    }

    pub fn config_path() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn data_dir() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.data_dir().to_path_buf())
    }

    pub fn db_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("minbar.db"))
    }

    pub fn cache_db_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("offline-cache.db"))
    }

    pub fn log_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("display.log"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(&path).with_context(|| format!("Reading {:?}", path))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Parsing config.toml")
    }

    pub fn ensure_data_dir() -> Result<PathBuf> {
        let dir = Self::data_dir()?;
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config.display.slide_seconds, 12);
        assert_eq!(config.server.port, 8787);
        assert_eq!(config.display.slides, SlideKind::ALL.to_vec());
        assert_eq!(config.cache.version_tag(), env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [display]
            masjid_id = "rome-central"
            slides = ["clock", "prayers", "hadith"]

            [generate.jamaat]
            fajr = 30
            "#,
        )
        .unwrap();
        assert_eq!(config.display.masjid_id.as_deref(), Some("rome-central"));
        assert_eq!(
            config.display.slides,
            vec![SlideKind::Clock, SlideKind::Prayers, SlideKind::Hadith]
        );
        assert_eq!(config.display.refresh_secs, 300);
        assert_eq!(config.generate.jamaat.fajr, 30);
        assert_eq!(config.generate.jamaat.maghrib, 5);
    }
}
