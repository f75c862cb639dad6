use anyhow::{anyhow, Result};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::str::FromStr;

use crate::models::announcement::active_sorted;
use crate::models::{Announcement, JumuahRow, Masjid, PrayerName, PrayerRow, MAX_JUMUAH_SLOTS};

fn parse_instant(s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::InvalidParameterName(format!("Bad timestamp '{}': {}", s, e)))
}

fn parse_day(s: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| rusqlite::Error::InvalidParameterName(format!("Bad date '{}': {}", s, e)))
}

// ─── Masjid directory ───────────────────────────────────────────────────────

fn masjid_from_row(row: &Row<'_>) -> rusqlite::Result<Masjid> {
    Ok(Masjid {
        id: row.get(0)?,
        name: row.get(1)?,
        short_name: row.get(2)?,
        city: row.get(3)?,
        timezone: row.get(4)?,
        latitude: row.get(5)?,
        longitude: row.get(6)?,
    })
}

pub struct MasjidRepo;

impl MasjidRepo {
    /// Readers only ever see public masjids.
    pub fn list_public(conn: &Connection) -> Result<Vec<Masjid>> {
        let mut stmt = conn.prepare(
            "SELECT id, name, short_name, city, timezone, latitude, longitude
             FROM masjids WHERE is_public = 1 ORDER BY name",
        )?;
        let rows = stmt.query_map([], masjid_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn get_public(conn: &Connection, id: &str) -> Result<Option<Masjid>> {
        let masjid = conn
            .query_row(
                "SELECT id, name, short_name, city, timezone, latitude, longitude
                 FROM masjids WHERE id = ?1 AND is_public = 1",
                params![id],
                masjid_from_row,
            )
            .optional()?;
        Ok(masjid)
    }

    /// Operator lookup, ignoring visibility.
    pub fn get(conn: &Connection, id: &str) -> Result<Option<Masjid>> {
        let masjid = conn
            .query_row(
                "SELECT id, name, short_name, city, timezone, latitude, longitude
                 FROM masjids WHERE id = ?1",
                params![id],
                masjid_from_row,
            )
            .optional()?;
        Ok(masjid)
    }

    pub fn upsert(conn: &Connection, masjid: &Masjid, is_public: bool) -> Result<()> {
        conn.execute(
            "INSERT INTO masjids (id, name, short_name, city, timezone, latitude, longitude, is_public)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name, short_name = excluded.short_name, city = excluded.city,
                timezone = excluded.timezone, latitude = excluded.latitude,
                longitude = excluded.longitude, is_public = excluded.is_public",
            params![
                masjid.id,
                masjid.name,
                masjid.short_name,
                masjid.city,
                masjid.timezone,
                masjid.latitude,
                masjid.longitude,
                is_public as i32,
            ],
        )?;
        Ok(())
    }
}

// ─── Prayer times ───────────────────────────────────────────────────────────

pub struct PrayerRepo;

impl PrayerRepo {
    pub fn for_date(conn: &Connection, masjid_id: &str, date: &str) -> Result<Vec<PrayerRow>> {
        let mut stmt = conn.prepare(
            "SELECT masjid_id, date, prayer, start_time, jamaat_time
             FROM prayer_times WHERE masjid_id = ?1 AND date = ?2",
        )?;
        let rows = stmt.query_map(params![masjid_id, date], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut result = Vec::new();
        for r in rows {
            let (masjid_id, date, prayer, start_time, jamaat_time) = r?;
            result.push(PrayerRow {
                masjid_id,
                date,
                prayer: PrayerName::from_str(&prayer)?,
                start_time,
                jamaat_time,
            });
        }
        result.sort_by_key(|r| r.prayer);
        Ok(result)
    }

    pub fn upsert(conn: &Connection, row: &PrayerRow) -> Result<()> {
        conn.execute(
            "INSERT INTO prayer_times (masjid_id, date, prayer, start_time, jamaat_time)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(masjid_id, date, prayer) DO UPDATE SET
                start_time = excluded.start_time, jamaat_time = excluded.jamaat_time",
            params![row.masjid_id, row.date, row.prayer.as_str(), row.start_time, row.jamaat_time],
        )?;
        Ok(())
    }
}

// ─── Jumu'ah ────────────────────────────────────────────────────────────────

pub struct JumuahRepo;

impl JumuahRepo {
    /// Slots valid on `date`, by slot number, at most three.
    pub fn active_on(conn: &Connection, masjid_id: &str, date: NaiveDate) -> Result<Vec<JumuahRow>> {
        let mut stmt = conn.prepare(
            "SELECT masjid_id, slot, khutbah_time, jamaat_time, language, notes, valid_from, valid_until
             FROM jumuah_slots WHERE masjid_id = ?1 ORDER BY slot",
        )?;
        let rows = stmt.query_map(params![masjid_id], |row| {
            let valid_from: Option<String> = row.get(6)?;
            let valid_until: Option<String> = row.get(7)?;
            Ok(JumuahRow {
                masjid_id: row.get(0)?,
                slot: row.get(1)?,
                khutbah_time: row.get(2)?,
                jamaat_time: row.get(3)?,
                language: row.get(4)?,
                notes: row.get(5)?,
                valid_from: valid_from.as_deref().map(parse_day).transpose()?,
                valid_until: valid_until.as_deref().map(parse_day).transpose()?,
            })
        })?;

        let mut result = Vec::new();
        for r in rows {
            let slot = r?;
            if slot.is_valid_on(date) {
                result.push(slot);
            }
            if result.len() == MAX_JUMUAH_SLOTS {
                break;
            }
        }
        Ok(result)
    }

    pub fn upsert(conn: &Connection, row: &JumuahRow) -> Result<()> {
        conn.execute(
            "INSERT INTO jumuah_slots
                (masjid_id, slot, khutbah_time, jamaat_time, language, notes, valid_from, valid_until)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT(masjid_id, slot) DO UPDATE SET
                khutbah_time = excluded.khutbah_time, jamaat_time = excluded.jamaat_time,
                language = excluded.language, notes = excluded.notes,
                valid_from = excluded.valid_from, valid_until = excluded.valid_until",
            params![
                row.masjid_id,
                row.slot,
                row.khutbah_time,
                row.jamaat_time,
                row.language,
                row.notes,
                row.valid_from.map(|d| d.format("%Y-%m-%d").to_string()),
                row.valid_until.map(|d| d.format("%Y-%m-%d").to_string()),
            ],
        )?;
        Ok(())
    }
}

// ─── Announcements ──────────────────────────────────────────────────────────

pub struct AnnouncementRepo;

impl AnnouncementRepo {
    /// Visibility is decided against `now` at query time.
    pub fn active_at(conn: &Connection, masjid_id: &str, now: DateTime<Utc>) -> Result<Vec<Announcement>> {
        let mut stmt = conn.prepare(
            "SELECT id, masjid_id, title, body, category, pinned, starts_at, ends_at, created_at
             FROM announcements WHERE masjid_id = ?1",
        )?;
        let rows = stmt.query_map(params![masjid_id], |row| {
            let starts_at: Option<String> = row.get(6)?;
            let ends_at: Option<String> = row.get(7)?;
            let created_at: String = row.get(8)?;
            Ok(Announcement {
                id: row.get(0)?,
                masjid_id: row.get(1)?,
                title: row.get(2)?,
                body: row.get(3)?,
                category: row.get(4)?,
                pinned: row.get::<_, i32>(5)? != 0,
                starts_at: starts_at.as_deref().map(parse_instant).transpose()?,
                ends_at: ends_at.as_deref().map(parse_instant).transpose()?,
                created_at: parse_instant(&created_at)?,
            })
        })?;
        let all = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(active_sorted(&all, now))
    }

    /// Stores a new announcement; the given `id` is ignored.
    pub fn insert(conn: &Connection, a: &Announcement) -> Result<i64> {
        conn.execute(
            "INSERT INTO announcements
                (masjid_id, title, body, category, pinned, starts_at, ends_at, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                a.masjid_id,
                a.title,
                a.body,
                a.category,
                a.pinned as i32,
                a.starts_at.map(|t| t.to_rfc3339()),
                a.ends_at.map(|t| t.to_rfc3339()),
                a.created_at.to_rfc3339(),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }
}

// ─── Meta ───────────────────────────────────────────────────────────────────

pub struct MetaRepo;

impl MetaRepo {
    pub fn get(conn: &Connection, key: &str) -> Result<Option<String>> {
        let val = conn
            .query_row(
                "SELECT value FROM app_meta WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(val)
    }

    /// Counter bumped by triggers on every write to the board tables.
    pub fn revision(conn: &Connection) -> Result<u64> {
        let raw = Self::get(conn, "revision")?.ok_or_else(|| anyhow!("revision counter missing"))?;
        raw.parse::<u64>()
            .map_err(|e| anyhow!("Bad revision '{}': {}", raw, e))
    }
}
