use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::db::repository::{AnnouncementRepo, JumuahRepo, MasjidRepo, MetaRepo, PrayerRepo};
use crate::models::{BoardData, Masjid};
use crate::proxy::hadith::{self, HadithQuery};
use crate::proxy::weather::{self, WeatherQuery};
use crate::proxy::{ProxyError, ProxyResult};
use crate::schedule::local_clock;
use crate::server::state::AppState;

pub const WEATHER_CACHE_CONTROL: &str = "public, max-age=900, s-maxage=900, stale-while-revalidate=3600";
pub const HADITH_CACHE_CONTROL: &str = "public, max-age=21600, s-maxage=21600, stale-while-revalidate=86400";

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn get_weather(State(state): State<AppState>, Query(query): Query<WeatherQuery>) -> ProxyResult<Response> {
    let snapshot = weather::lookup(state.upstream.as_ref(), &state.config, query).await?;
    Ok(([(header::CACHE_CONTROL, WEATHER_CACHE_CONTROL)], Json(snapshot)).into_response())
}

async fn get_hadith(State(state): State<AppState>, Query(query): Query<HadithQuery>) -> ProxyResult<Response> {
    let today = local_clock(Some(&state.config.timezone), Utc::now()).date_key();
    let hadith = hadith::lookup(state.upstream.as_ref(), &state.config, query, today).await?;
    Ok(([(header::CACHE_CONTROL, HADITH_CACHE_CONTROL)], Json(hadith)).into_response())
}

async fn list_masjids(State(state): State<AppState>) -> ProxyResult<Json<Vec<Masjid>>> {
    Ok(Json(state.with_db(MasjidRepo::list_public)?))
}

#[derive(Debug, Default, Deserialize)]
struct TodayQuery {
    tz: Option<String>,
}

async fn board_today(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<TodayQuery>,
) -> ProxyResult<Json<BoardData>> {
    let now = Utc::now();
    let board = state.with_db(|conn| {
        let Some(masjid) = MasjidRepo::get_public(conn, &id)? else {
            return Ok(None);
        };
        let tz = query.tz.as_deref().filter(|t| !t.trim().is_empty()).unwrap_or(&masjid.timezone);
        let clock = local_clock(Some(tz), now);
        let date = clock
            .date()
            .ok_or_else(|| anyhow::anyhow!("Invalid local date {}", clock.date_key()))?;

        let prayers = PrayerRepo::for_date(conn, &masjid.id, &clock.date_key())?;
        let jumuah = JumuahRepo::active_on(conn, &masjid.id, date)?;
        let announcements = AnnouncementRepo::active_at(conn, &masjid.id, now)?;
        Ok(Some(BoardData {
            date: clock.date_key(),
            masjid,
            prayers,
            jumuah,
            announcements,
        }))
    })?;

    board
        .map(Json)
        .ok_or_else(|| ProxyError::NotFound(format!("Masjid '{}' not found", id)))
}

async fn revision(State(state): State<AppState>) -> ProxyResult<Json<serde_json::Value>> {
    let revision = state.with_db(MetaRepo::revision)?;
    Ok(Json(json!({ "revision": revision })))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/api/weather", get(get_weather))
        .route("/api/hadith", get(get_hadith))
        .route("/api/masjids", get(list_masjids))
        .route("/api/masjids/{id}/today", get(board_today))
        .route("/api/revision", get(revision))
}
