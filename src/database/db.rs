//! SQLite persistence for the catalog, schedule records and the simulated date
//!
//! Timestamps are stored as epoch milliseconds.

use super::store::RecordStore;
use crate::error::StoreResult;
use crate::models::{Catalog, Clock, RecordMap, ScheduleRecord, SystemClock, restore_item_ids};
use chrono::{DateTime, Duration, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::path::Path;
use tracing::{debug, info};

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) the database file and its tables
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let store = Self::with_connection(Connection::open(path)?)?;
        info!(path = %path.display(), "opened SQLite store");
        Ok(store)
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> StoreResult<Self> {
        init_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Adds an item to the catalog. Returns false if it was already there.
    pub fn add_item(&self, item_id: &str) -> StoreResult<bool> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO items (item_id) VALUES (?1)",
            params![item_id],
        )?;
        if inserted > 0 {
            debug!(item_id, "added item to catalog");
        }
        Ok(inserted > 0)
    }

    /// Loads the catalog in insertion order
    pub fn load_catalog(&self) -> StoreResult<Catalog> {
        let mut stmt = self
            .conn
            .prepare("SELECT item_id FROM items ORDER BY position ASC")?;
        let ids = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(ids.into_iter().collect())
    }

    /// Retrieves the simulated current date, starting it at wall-clock time
    pub fn current_date(&self) -> StoreResult<DateTime<Utc>> {
        self.current_date_seeded(&SystemClock)
    }

    /// Retrieves the simulated current date. The first call stores `seed`'s time.
    pub fn current_date_seeded(&self, seed: &dyn Clock) -> StoreResult<DateTime<Utc>> {
        let value: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM app_state WHERE key = 'current_date'",
                [],
                |row| row.get(0),
            )
            .optional()?;

        let millis = value.and_then(|v| v.parse::<i64>().ok());
        match millis.and_then(DateTime::from_timestamp_millis) {
            Some(date) => Ok(date),
            None => {
                let now = seed.now();
                self.set_current_date(now)?;
                debug!(date = %now, "seeded simulated date");
                Ok(now)
            }
        }
    }

    /// Advances the simulated date by 24 hours and returns the new date
    pub fn advance_day(&self) -> StoreResult<DateTime<Utc>> {
        let next_day = self.current_date()? + Duration::days(1);
        self.set_current_date(next_day)?;
        info!(date = %next_day, "advanced simulated date");
        Ok(next_day)
    }

    fn set_current_date(&self, date: DateTime<Utc>) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO app_state (key, value) VALUES ('current_date', ?1)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![date.timestamp_millis().to_string()],
        )?;
        Ok(())
    }
}

fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    // Catalog; position keeps insertion order
    conn.execute(
        "CREATE TABLE IF NOT EXISTS items (
            position INTEGER PRIMARY KEY AUTOINCREMENT,
            item_id TEXT NOT NULL UNIQUE
        )",
        (),
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS schedule_records (
            item_id TEXT PRIMARY KEY,
            ease_factor REAL NOT NULL DEFAULT 2.5,
            interval_days INTEGER NOT NULL DEFAULT 0,
            repetitions INTEGER NOT NULL DEFAULT 0,
            last_reviewed_at INTEGER NOT NULL,
            due_at INTEGER NOT NULL
        )",
        (),
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS app_state (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

fn millis_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let millis: i64 = row.get(idx)?;
    DateTime::from_timestamp_millis(millis)
        .ok_or(rusqlite::Error::IntegralValueOutOfRange(idx, millis))
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<(String, ScheduleRecord)> {
    let item_id: String = row.get(0)?;
    let record = ScheduleRecord {
        item_id: item_id.clone(),
        ease_factor: row.get(1)?,
        interval: row.get(2)?,
        repetitions: row.get(3)?,
        last_reviewed_at: millis_column(row, 4)?,
        due_at: millis_column(row, 5)?,
    };
    Ok((item_id, record))
}

const SELECT_RECORDS: &str = "SELECT item_id, ease_factor, interval_days, repetitions, last_reviewed_at, due_at
     FROM schedule_records";

impl RecordStore for SqliteStore {
    fn load_all_records(&self) -> StoreResult<RecordMap> {
        let mut stmt = self.conn.prepare(SELECT_RECORDS)?;
        let records = stmt
            .query_map([], record_from_row)?
            .collect::<rusqlite::Result<RecordMap>>()?;
        restore_item_ids(records)
    }

    fn save_record(&mut self, record: &ScheduleRecord) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO schedule_records
                (item_id, ease_factor, interval_days, repetitions, last_reviewed_at, due_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(item_id) DO UPDATE SET
                ease_factor = excluded.ease_factor,
                interval_days = excluded.interval_days,
                repetitions = excluded.repetitions,
                last_reviewed_at = excluded.last_reviewed_at,
                due_at = excluded.due_at",
            params![
                record.item_id,
                record.ease_factor,
                record.interval,
                record.repetitions,
                record.last_reviewed_at.timestamp_millis(),
                record.due_at.timestamp_millis(),
            ],
        )?;

        debug!(item_id = %record.item_id, interval = record.interval, "saved record");
        Ok(())
    }

    fn load_record(&self, item_id: &str) -> StoreResult<Option<ScheduleRecord>> {
        let record = self
            .conn
            .query_row(
                &format!("{SELECT_RECORDS} WHERE item_id = ?1"),
                params![item_id],
                record_from_row,
            )
            .optional()?;

        match record {
            Some((_, record)) => {
                record.validate()?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }
}
