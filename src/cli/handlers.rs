use anyhow::{anyhow, Context, Result};
use chrono::{Duration as Days, NaiveDate, Utc};
use reqwest::Url;
use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::cli::args::CacheCommands;
use crate::config::{AppConfig, ServerConfig};
use crate::db;
use crate::db::repository::{MasjidRepo, PrayerRepo};
use crate::db::seed;
use crate::display::rotation::clamp_duration;
use crate::display::{BoardLoader, Deck, LoaderOptions, RemoteClient, Slideshow};
use crate::offline::{CacheNames, CacheStorage, HttpFetcher, OfflineWorker, Request, SqliteCacheStorage};
use crate::proxy::ReqwestUpstream;
use crate::schedule::{countdown, local_clock, next_prayer, PrayerCalculator};
use crate::server::{self, AppState};
use crate::tui;
use crate::tui::app::App;
use crate::tui::events::EventHandler;
use crate::utils::format::short_time;

// ─── ANSI helpers ────────────────────────────────────────────────────────────

macro_rules! print_colored {
    ($color:expr, $($arg:tt)*) => {{
        print!("{}", $color);
        print!($($arg)*);
        print!("\x1b[0m");
    }};
}

macro_rules! println_colored {
    ($color:expr, $($arg:tt)*) => {{
        print!("{}", $color);
        print!($($arg)*);
        println!("\x1b[0m");
    }};
}

const GREEN: &str = "\x1b[32m";
const AMBER: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const GOLD: &str = "\x1b[38;2;196;160;68m";

fn open_store() -> Result<Connection> {
    AppConfig::ensure_data_dir()?;
    db::open(&AppConfig::db_path()?)
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Starting async runtime")
}

/// The display's offline worker, backed by the persistent cache file.
fn offline_worker(config: &AppConfig, server_url: &str) -> Result<Arc<OfflineWorker>> {
    AppConfig::ensure_data_dir()?;
    let origin = Url::parse(server_url).map_err(|e| anyhow!("Bad server URL '{}': {}", server_url, e))?;
    let storage = SqliteCacheStorage::open(&AppConfig::cache_db_path()?)?;
    let fetcher = HttpFetcher::new(Duration::from_secs(config.server.upstream_timeout_secs))?;
    Ok(Arc::new(OfflineWorker::new(
        Arc::new(fetcher),
        Arc::new(storage),
        origin,
        &config.cache.version_tag(),
    )))
}

// ─── Serve ───────────────────────────────────────────────────────────────────

pub fn handle_serve(config: &AppConfig, host: Option<String>, port: Option<u16>) -> Result<()> {
    let server_config = ServerConfig {
        host: host.unwrap_or_else(|| config.server.host.clone()),
        port: port.unwrap_or(config.server.port),
        ..config.server.clone()
    };
    let conn = open_store()?;
    let upstream = ReqwestUpstream::new(Duration::from_secs(server_config.upstream_timeout_secs))?;
    let state = AppState::new(conn, Arc::new(upstream), server_config);

    runtime()?.block_on(server::serve(state))
}

// ─── Display ─────────────────────────────────────────────────────────────────

pub struct DisplayArgs {
    pub masjid: Option<String>,
    pub duration: Option<u64>,
    pub tz: Option<String>,
    pub server: Option<String>,
}

pub fn handle_display(config: &AppConfig, args: DisplayArgs) -> Result<()> {
    let display = &config.display;
    let server_url = args.server.unwrap_or_else(|| display.server_url.clone());
    let masjid = args.masjid.or_else(|| display.masjid_id.clone());
    let tz_override = args.tz.or_else(|| display.timezone.clone());
    let duration = clamp_duration(Duration::from_secs(args.duration.unwrap_or(display.slide_seconds)));

    let runtime = runtime()?;
    let worker = offline_worker(config, &server_url)?;
    runtime.block_on(worker.start())?;
    log::info!("Display starting against {} (slides every {:?})", server_url, duration);

    let events = EventHandler::new();
    let options = LoaderOptions {
        tz_override: tz_override.clone(),
        hadith_edition: display.hadith_edition.clone(),
        refresh: Duration::from_secs(display.refresh_secs.max(1)),
        watch: Duration::from_secs(display.watch_secs.max(1)),
    };
    let loader = BoardLoader::new(
        RemoteClient::new(worker),
        events.sender(),
        runtime.handle().clone(),
        options,
    );

    let deck = Deck::new(&display.slides, display.qr_url.clone());
    let slideshow = Slideshow::new(deck, duration, tz_override, masjid, std::time::Instant::now());
    let app = App::new(slideshow, display.hijri_offset);

    let result = tui::app::run(app, events, loader);
    runtime.shutdown_timeout(Duration::from_secs(1));
    result
}

// ─── Times ───────────────────────────────────────────────────────────────────

pub fn handle_times(masjid_id: &str, tz: Option<&str>) -> Result<()> {
    let conn = open_store()?;
    let masjid = MasjidRepo::get(&conn, masjid_id)?
        .ok_or_else(|| anyhow!("Masjid '{}' not found", masjid_id))?;
    let clock = local_clock(tz.or(Some(masjid.timezone.as_str())), Utc::now());
    let rows = PrayerRepo::for_date(&conn, &masjid.id, &clock.date_key())?;

    println!();
    println_colored!(GOLD, "  Prayer Times — {} ({})", masjid.name, clock.date_key());
    println!();

    if rows.is_empty() {
        println_colored!(AMBER, "  No prayer times stored for today. Try `minbar generate --masjid {}`.", masjid.id);
        println!();
        return Ok(());
    }

    let next = next_prayer(&rows, &clock);
    println_colored!(DIM, "  {:<10}  {:<6}  {}", "", "Start", "Jamaat");
    for row in &rows {
        let line = format!(
            "  {:<10}  {:<6}  {}",
            row.prayer.display_name(),
            short_time(&row.start_time),
            short_time(&row.jamaat_time)
        );
        let is_next = next.as_ref().is_some_and(|n| n.prayer == row.prayer && !n.tomorrow);
        if is_next {
            println_colored!(BOLD, "{}", line);
        } else {
            println_colored!(DIM, "{}", line);
        }
    }

    if let Some(next) = next {
        println!();
        let when = if next.tomorrow { " (tomorrow)" } else { "" };
        println_colored!(AMBER, "  Next: {}{} in {}", next.prayer.display_name(), when, countdown(&next, &clock));
    }
    println!();
    Ok(())
}

// ─── Import ──────────────────────────────────────────────────────────────────

pub fn handle_import(file: &Path) -> Result<()> {
    let mut conn = open_store()?;
    let summary = seed::import_file(&mut conn, file)?;
    println_colored!(
        GREEN,
        "  ✓ Imported {} masjids, {} prayer rows, {} jumuah slots, {} announcements",
        summary.masjids,
        summary.prayers,
        summary.jumuah,
        summary.announcements
    );
    Ok(())
}

// ─── Generate ────────────────────────────────────────────────────────────────

pub fn handle_generate(config: &AppConfig, masjid_id: &str, days: u32, from: Option<&str>) -> Result<()> {
    let mut conn = open_store()?;
    let masjid = MasjidRepo::get(&conn, masjid_id)?
        .ok_or_else(|| anyhow!("Masjid '{}' not found", masjid_id))?;
    let (Some(lat), Some(lng)) = (masjid.latitude, masjid.longitude) else {
        return Err(anyhow!("Masjid '{}' has no coordinates; add latitude and longitude first", masjid.id));
    };

    let start = match from {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| format!("Bad --from date '{}'", s))?,
        None => local_clock(Some(masjid.timezone.as_str()), Utc::now())
            .date()
            .ok_or_else(|| anyhow!("Could not determine today's date"))?,
    };

    let calc = PrayerCalculator::new(
        lat,
        lng,
        &config.generate.calc_method,
        &config.generate.madhab,
        &masjid.timezone,
    )?;

    let tx = conn.transaction()?;
    let mut written = 0;
    for offset in 0..days {
        let date = start + Days::days(offset as i64);
        for row in calc.rows_for(&masjid.id, date, &config.generate.jamaat)? {
            PrayerRepo::upsert(&tx, &row)?;
            written += 1;
        }
    }
    tx.commit()?;

    println_colored!(
        GREEN,
        "  ✓ Wrote {} prayer rows for {} starting {}",
        written,
        masjid.name,
        start.format("%Y-%m-%d")
    );
    Ok(())
}

// ─── Masjids ─────────────────────────────────────────────────────────────────

pub fn handle_masjids() -> Result<()> {
    let conn = open_store()?;
    let masjids = MasjidRepo::list_public(&conn)?;
    println!();
    if masjids.is_empty() {
        println_colored!(AMBER, "  No public masjids. Import some with `minbar import <file>`.");
    } else {
        println_colored!(GOLD, "  Masjids ({})", masjids.len());
        println!();
        for m in &masjids {
            print_colored!(BOLD, "  {:<20}", m.id);
            println!("  {} — {} ", m.name, m.city);
        }
    }
    println!();
    Ok(())
}

// ─── Cache ───────────────────────────────────────────────────────────────────

pub fn handle_cache(config: &AppConfig, action: &CacheCommands) -> Result<()> {
    AppConfig::ensure_data_dir()?;
    let storage = SqliteCacheStorage::open(&AppConfig::cache_db_path()?)?;
    let current = CacheNames::for_version(&config.cache.version_tag());

    match action {
        CacheCommands::Status => {
            let keys = storage.keys()?;
            println!();
            if keys.is_empty() {
                println_colored!(DIM, "  No caches yet");
            }
            for name in &keys {
                let count = storage.entry_count(name)?;
                if *name == current.shell || *name == current.api {
                    println_colored!(GREEN, "  {:<28}  {:>4} entries", name, count);
                } else {
                    println_colored!(DIM, "  {:<28}  {:>4} entries  (stale)", name, count);
                }
            }
            println!();
        }
        CacheCommands::Clear => {
            let mut cleared = 0;
            for name in storage.keys()? {
                if storage.delete(&name)? {
                    cleared += 1;
                }
            }
            println_colored!(GREEN, "  ✓ Cleared {} caches", cleared);
        }
    }
    Ok(())
}

// ─── Fetch ───────────────────────────────────────────────────────────────────

pub fn handle_fetch(config: &AppConfig, path: &str, navigate: bool, server: Option<String>) -> Result<()> {
    let server_url = server.unwrap_or_else(|| config.display.server_url.clone());
    let worker = offline_worker(config, &server_url)?;
    let url = worker.url(path)?;
    let request = if navigate { Request::navigate(url) } else { Request::get(url) };

    let served = runtime()?.block_on(async {
        worker.start().await?;
        Ok::<_, anyhow::Error>(worker.fetch(&request).await?)
    })?;

    let color = if served.response.is_success() { GREEN } else { RED };
    println_colored!(color, "  {} ({:?})", served.response.status, served.source);
    if let Some(ct) = &served.response.content_type {
        println_colored!(DIM, "  {}", ct);
    }
    println!();
    println!("{}", String::from_utf8_lossy(&served.response.body));
    Ok(())
}
