use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::Deserialize;
use std::path::Path;

use crate::db::repository::{AnnouncementRepo, JumuahRepo, MasjidRepo, PrayerRepo};
use crate::models::{Announcement, JumuahRow, Masjid, PrayerRow};

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct SeedMasjid {
    #[serde(flatten)]
    pub masjid: Masjid,
    #[serde(default = "default_true")]
    pub is_public: bool,
}

#[derive(Debug, Deserialize)]
pub struct SeedAnnouncement {
    pub masjid_id: String,
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ends_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A JSON document describing any subset of the board tables.
#[derive(Debug, Default, Deserialize)]
pub struct SeedDocument {
    #[serde(default)]
    pub masjids: Vec<SeedMasjid>,
    #[serde(default)]
    pub prayers: Vec<PrayerRow>,
    #[serde(default)]
    pub jumuah: Vec<JumuahRow>,
    #[serde(default)]
    pub announcements: Vec<SeedAnnouncement>,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub masjids: usize,
    pub prayers: usize,
    pub jumuah: usize,
    pub announcements: usize,
}

/// Apply a seed document in a single transaction.
pub fn import(conn: &mut Connection, doc: &SeedDocument) -> Result<ImportSummary> {
    let tx = conn.transaction()?;
    let now = Utc::now();

    for m in &doc.masjids {
        MasjidRepo::upsert(&tx, &m.masjid, m.is_public)
            .with_context(|| format!("Importing masjid '{}'", m.masjid.id))?;
    }
    for p in &doc.prayers {
        PrayerRepo::upsert(&tx, p)
            .with_context(|| format!("Importing {} for {} on {}", p.prayer, p.masjid_id, p.date))?;
    }
    for j in &doc.jumuah {
        JumuahRepo::upsert(&tx, j)
            .with_context(|| format!("Importing jumu'ah slot {} for {}", j.slot, j.masjid_id))?;
    }
    for a in &doc.announcements {
        let announcement = Announcement {
            id: 0,
            masjid_id: a.masjid_id.clone(),
            title: a.title.clone(),
            body: a.body.clone(),
            category: a.category.clone().unwrap_or_else(|| "general".to_string()),
            pinned: a.pinned,
            starts_at: a.starts_at,
            ends_at: a.ends_at,
            created_at: a.created_at.unwrap_or(now),
        };
        AnnouncementRepo::insert(&tx, &announcement)
            .with_context(|| format!("Importing announcement '{}'", a.title))?;
    }

    tx.commit()?;
    Ok(ImportSummary {
        masjids: doc.masjids.len(),
        prayers: doc.prayers.len(),
        jumuah: doc.jumuah.len(),
        announcements: doc.announcements.len(),
    })
}

pub fn import_file(conn: &mut Connection, path: &Path) -> Result<ImportSummary> {
    let content = std::fs::read_to_string(path).with_context(|| format!("Reading {:?}", path))?;
    let doc: SeedDocument =
        serde_json::from_str(&content).with_context(|| format!("Parsing {:?}", path))?;
    import(conn, &doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use std::io::Write;

    const DOC: &str = r#"{
        "masjids": [
            {"id": "rome-central", "name": "Moschea di Roma", "city": "Rome",
             "timezone": "Europe/Rome", "latitude": 41.93, "longitude": 12.49},
            {"id": "hidden", "name": "Staff Room", "city": "Rome",
             "timezone": "Europe/Rome", "is_public": false}
        ],
        "prayers": [
            {"masjid_id": "rome-central", "date": "2024-05-10", "prayer": "fajr",
             "start_time": "04:30:00", "jamaat_time": "04:50:00"}
        ],
        "jumuah": [
            {"masjid_id": "rome-central", "slot": 1, "khutbah_time": "13:00:00",
             "jamaat_time": "13:30:00", "language": "it"}
        ],
        "announcements": [
            {"masjid_id": "rome-central", "title": "Iftar", "pinned": true}
        ]
    }"#;

    #[test]
    fn imports_a_file_in_one_go() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.json");
        std::fs::File::create(&path).unwrap().write_all(DOC.as_bytes()).unwrap();

        let mut conn = Connection::open(dir.path().join("minbar.db")).unwrap();
        run_migrations(&conn).unwrap();
        let summary = import_file(&mut conn, &path).unwrap();

        assert_eq!(
            summary,
            ImportSummary { masjids: 2, prayers: 1, jumuah: 1, announcements: 1 }
        );
        assert_eq!(MasjidRepo::list_public(&conn).unwrap().len(), 1);
        let active = AnnouncementRepo::active_at(&conn, "rome-central", Utc::now()).unwrap();
        assert_eq!(active[0].category, "general");
    }

    #[test]
    fn failed_import_leaves_store_untouched() {
        let mut conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn.execute_batch(
            "CREATE TRIGGER reject BEFORE INSERT ON announcements BEGIN SELECT RAISE(ABORT, 'no'); END;",
        )
        .unwrap();

        let doc: SeedDocument = serde_json::from_str(DOC).unwrap();
        assert!(import(&mut conn, &doc).is_err());
        assert!(MasjidRepo::get_public(&conn, "rome-central").unwrap().is_none());
    }
}
