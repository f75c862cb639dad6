use anyhow::Result;
use rusqlite::Connection;

/// Tables whose writes bump the board revision.
const WATCHED_TABLES: &[&str] = &["masjids", "prayer_times", "jumuah_slots", "announcements"];

pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch("
        CREATE TABLE IF NOT EXISTS masjids (
            id          TEXT PRIMARY KEY,
            name        TEXT NOT NULL,
            short_name  TEXT,
            city        TEXT NOT NULL DEFAULT '',
            timezone    TEXT NOT NULL DEFAULT 'Europe/Rome',
            latitude    REAL,
            longitude   REAL,
            is_public   INTEGER NOT NULL DEFAULT 1
        );

        CREATE TABLE IF NOT EXISTS prayer_times (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            masjid_id    TEXT NOT NULL REFERENCES masjids(id),
            date         TEXT NOT NULL,
            prayer       TEXT NOT NULL CHECK(prayer IN ('fajr','dhuhr','asr','maghrib','isha')),
            start_time   TEXT NOT NULL,
            jamaat_time  TEXT NOT NULL,
            UNIQUE(masjid_id, date, prayer)
        );

        CREATE TABLE IF NOT EXISTS jumuah_slots (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            masjid_id     TEXT NOT NULL REFERENCES masjids(id),
            slot          INTEGER NOT NULL,
            khutbah_time  TEXT NOT NULL,
            jamaat_time   TEXT NOT NULL,
            language      TEXT,
            notes         TEXT,
            valid_from    TEXT,
            valid_until   TEXT,
            UNIQUE(masjid_id, slot)
        );

        CREATE TABLE IF NOT EXISTS announcements (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            masjid_id   TEXT NOT NULL REFERENCES masjids(id),
            title       TEXT NOT NULL,
            body        TEXT NOT NULL DEFAULT '',
            category    TEXT NOT NULL DEFAULT 'general',
            pinned      INTEGER NOT NULL DEFAULT 0,
            starts_at   TEXT,
            ends_at     TEXT,
            created_at  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_prayer_times_day ON prayer_times(masjid_id, date);
        CREATE INDEX IF NOT EXISTS idx_announcements_masjid ON announcements(masjid_id);

        CREATE TABLE IF NOT EXISTS app_meta (
            key   TEXT PRIMARY KEY,
            value TEXT
        );

        INSERT OR IGNORE INTO app_meta (key, value) VALUES ('revision', '0');
    ")?;

    for table in WATCHED_TABLES {
        for (suffix, event) in [("ins", "INSERT"), ("upd", "UPDATE"), ("del", "DELETE")] {
            conn.execute_batch(&format!(
                "CREATE TRIGGER IF NOT EXISTS trg_{table}_{suffix} AFTER {event} ON {table}
                 BEGIN
                     UPDATE app_meta SET value = CAST(value AS INTEGER) + 1 WHERE key = 'revision';
                 END;"
            ))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();
        let rev: String = conn
            .query_row("SELECT value FROM app_meta WHERE key = 'revision'", [], |r| r.get(0))
            .unwrap();
        assert_eq!(rev, "0");
    }
}
