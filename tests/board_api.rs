mod common;

use axum::http::{header, StatusCode};
use chrono::Utc;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

use common::{get, StubUpstream};
use minbar::db::{self, seed};
use minbar::schedule::local_clock;
use minbar::server::routes::{HADITH_CACHE_CONTROL, WEATHER_CACHE_CONTROL};

fn write_seed(dir: &Path, name: &str, doc: &Value) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, doc.to_string()).unwrap();
    path
}

fn seeded_store() -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("minbar.db");
    let today = local_clock(Some("Europe/Rome"), Utc::now()).date_key();

    let doc = json!({
        "masjids": [
            {"id": "central", "name": "Central Masjid", "city": "Rome", "timezone": "Europe/Rome",
             "latitude": 41.9, "longitude": 12.5},
            {"id": "annex", "name": "Annex", "city": "Rome", "timezone": "Europe/Rome", "is_public": false}
        ],
        "prayers": [
            {"masjid_id": "central", "date": today, "prayer": "isha",
             "start_time": "21:10:00", "jamaat_time": "21:30:00"},
            {"masjid_id": "central", "date": today, "prayer": "fajr",
             "start_time": "04:20:00", "jamaat_time": "04:45:00"}
        ],
        "announcements": [
            {"masjid_id": "central", "title": "Eid prayer", "body": "Two jamaats this year", "pinned": true}
        ]
    });
    let file = write_seed(dir.path(), "seed.json", &doc);
    let mut conn = db::open(&db_path).unwrap();
    seed::import_file(&mut conn, &file).unwrap();
    (dir, db_path)
}

#[tokio::test]
async fn imported_board_is_served_in_canonical_order() {
    let (_dir, db_path) = seeded_store();
    let app = common::app(&db_path, Arc::new(StubUpstream::default()));

    let (status, _, body) = get(&app, "/api/masjids/central/today").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["masjid"]["name"], "Central Masjid");
    let prayers: Vec<&str> = body["prayers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["prayer"].as_str().unwrap())
        .collect();
    assert_eq!(prayers, vec!["fajr", "isha"]);
    assert_eq!(body["announcements"][0]["title"], "Eid prayer");
}

#[tokio::test]
async fn private_masjids_are_hidden_everywhere() {
    let (_dir, db_path) = seeded_store();
    let app = common::app(&db_path, Arc::new(StubUpstream::default()));

    let (_, _, list) = get(&app, "/api/masjids").await;
    let ids: Vec<&str> = list.as_array().unwrap().iter().map(|m| m["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["central"]);

    let (status, _, body) = get(&app, "/api/masjids/annex/today").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("annex"));
}

#[tokio::test]
async fn revision_moves_when_another_connection_writes() {
    let (dir, db_path) = seeded_store();
    let app = common::app(&db_path, Arc::new(StubUpstream::default()));

    let (_, _, before) = get(&app, "/api/revision").await;
    let before = before["revision"].as_u64().unwrap();

    let extra = write_seed(
        dir.path(),
        "extra.json",
        &json!({"announcements": [{"masjid_id": "central", "title": "Fundraiser"}]}),
    );
    let mut writer = db::open(&db_path).unwrap();
    seed::import_file(&mut writer, &extra).unwrap();

    let (_, _, after) = get(&app, "/api/revision").await;
    assert!(after["revision"].as_u64().unwrap() > before);
}

#[tokio::test]
async fn weather_geocodes_then_forecasts() {
    let (_dir, db_path) = seeded_store();
    let upstream = Arc::new(
        StubUpstream::default()
            .with(
                "/v1/search",
                json!({"results": [{"name": "Roma", "latitude": 41.89, "longitude": 12.48}]}),
            )
            .with(
                "/v1/forecast",
                json!({
                    "current": {"temperature_2m": 19.5, "weather_code": 1},
                    "daily": {
                        "time": ["2024-05-10"],
                        "temperature_2m_max": [23.0],
                        "temperature_2m_min": [12.0],
                        "precipitation_probability_max": [5],
                        "weather_code": [1]
                    }
                }),
            ),
    );
    let app = common::app(&db_path, upstream.clone());

    let (status, headers, body) = get(&app, "/api/weather?city=Rome&tz=Europe/Rome").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CACHE_CONTROL], WEATHER_CACHE_CONTROL);
    assert_eq!(body["location"]["name"], "Roma");
    assert_eq!(body["current"]["temperature"], 19.5);
    assert_eq!(body["daily"][0]["precipProbMax"], 5.0);

    let requested = upstream.requested();
    assert_eq!(requested.len(), 2);
    assert!(requested[0].starts_with("http://geo.test/v1/search"));
    assert!(requested[1].contains("latitude=41.89"));
}

#[tokio::test]
async fn unknown_city_is_not_found() {
    let (_dir, db_path) = seeded_store();
    let upstream = Arc::new(StubUpstream::default().with("/v1/search", json!({"results": []})));
    let app = common::app(&db_path, upstream);

    let (status, _, body) = get(&app, "/api/weather?city=Atlantis").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "City not found");
}

#[tokio::test]
async fn hadith_comes_from_the_primary_mirror_first() {
    let (_dir, db_path) = seeded_store();
    let upstream = Arc::new(StubUpstream::default().with(
        ".min.json",
        json!({
            "metadata": {"name": "Sahih al Bukhari"},
            "hadiths": [{"hadithnumber": 7, "text": "  Actions are judged by intentions. ",
                         "grades": [], "reference": {"book": 1, "hadith": 1}}]
        }),
    ));
    let app = common::app(&db_path, upstream.clone());

    let (status, headers, body) = get(&app, "/api/hadith?edition=eng-bukhari&seed=2024-05-10").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CACHE_CONTROL], HADITH_CACHE_CONTROL);
    assert_eq!(body["collection"], "Sahih al Bukhari");
    assert_eq!(body["text"], "Actions are judged by intentions.");
    assert_eq!(body["reference"], "Book 1, Hadith 1");
    assert!(body.get("grade").is_none());

    let requested = upstream.requested();
    assert_eq!(requested.len(), 1);
    assert!(requested[0].starts_with("http://primary.test/hadith/editions/eng-bukhari/"));
}

#[tokio::test]
async fn app_shell_is_served_for_precaching() {
    let (_dir, db_path) = seeded_store();
    let app = common::app(&db_path, Arc::new(StubUpstream::default()));

    for path in minbar::offline::SHELL_MANIFEST {
        let response = tower::ServiceExt::oneshot(
            app.clone(),
            axum::http::Request::builder().uri(*path).body(axum::body::Body::empty()).unwrap(),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{}", path);
    }
}
