//! Store handle and schema bootstrap.
//!
//! One sqlite connection behind a `parking_lot::Mutex`; every service
//! operation locks the handle for its full unit of work, so a logical
//! operation is never interleaved with another from the same process.
//! Cross-process consistency relies on sqlite transactions.

use std::path::Path;

use parking_lot::{Mutex, MutexGuard};
use rusqlite::Connection;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::errors::ServiceResult;

pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    /// Open (or create) a store at the given path.
    pub fn open(path: impl AsRef<Path>) -> ServiceResult<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn: Mutex::new(conn) };
        store.bootstrap()?;
        Ok(store)
    }

    /// An in-memory store, for tests and dry runs.
    pub fn open_in_memory() -> ServiceResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn: Mutex::new(conn) };
        store.bootstrap()?;
        Ok(store)
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock()
    }

    fn bootstrap(&self) -> ServiceResult<()> {
        let conn = self.lock();
        conn.execute_batch(
            r#"
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;
            PRAGMA foreign_keys=ON;

            CREATE TABLE IF NOT EXISTS innovation (
              id TEXT PRIMARY KEY,
              name TEXT NOT NULL,
              owner_id TEXT NOT NULL,
              status TEXT NOT NULL,
              previous_status TEXT,
              created_at TEXT NOT NULL,
              updated_at TEXT NOT NULL,
              submitted_at TEXT
            );

            CREATE TABLE IF NOT EXISTS innovation_document (
              innovation_id TEXT PRIMARY KEY REFERENCES innovation(id) ON DELETE CASCADE,
              version TEXT NOT NULL,
              document TEXT NOT NULL,
              is_snapshot INTEGER NOT NULL DEFAULT 0,
              updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS innovation_document_draft (
              innovation_id TEXT PRIMARY KEY REFERENCES innovation(id) ON DELETE CASCADE,
              version TEXT NOT NULL,
              document TEXT NOT NULL,
              updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS innovation_section (
              innovation_id TEXT NOT NULL REFERENCES innovation(id) ON DELETE CASCADE,
              section TEXT NOT NULL,
              status TEXT NOT NULL,
              submitted_at TEXT,
              updated_at TEXT NOT NULL,
              PRIMARY KEY (innovation_id, section)
            );

            CREATE TABLE IF NOT EXISTS innovation_support (
              id TEXT PRIMARY KEY,
              innovation_id TEXT NOT NULL REFERENCES innovation(id) ON DELETE CASCADE,
              organisation_unit TEXT NOT NULL,
              status TEXT NOT NULL,
              updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS innovation_share (
              innovation_id TEXT NOT NULL REFERENCES innovation(id) ON DELETE CASCADE,
              organisation_id TEXT NOT NULL,
              PRIMARY KEY (innovation_id, organisation_id)
            );

            CREATE TABLE IF NOT EXISTS innovation_export_request (
              id TEXT PRIMARY KEY,
              innovation_id TEXT NOT NULL REFERENCES innovation(id) ON DELETE CASCADE,
              organisation_id TEXT NOT NULL,
              created_by TEXT NOT NULL,
              status TEXT NOT NULL,
              request_reason TEXT NOT NULL,
              reject_reason TEXT,
              created_at TEXT NOT NULL,
              updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS activity_log (
              seq INTEGER PRIMARY KEY AUTOINCREMENT,
              innovation_id TEXT NOT NULL REFERENCES innovation(id) ON DELETE CASCADE,
              activity TEXT NOT NULL,
              params TEXT NOT NULL,
              created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS innovation_record_schema (
              id TEXT PRIMARY KEY,
              version_label TEXT NOT NULL UNIQUE,
              schema TEXT NOT NULL,
              digest TEXT NOT NULL,
              created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_activity_log_innovation
              ON activity_log(innovation_id, seq);
            CREATE INDEX IF NOT EXISTS idx_export_request_innovation
              ON innovation_export_request(innovation_id, status);
            "#,
        )?;
        Ok(())
    }
}

/// Current instant as RFC 3339 text, the store's timestamp format.
pub(crate) fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .expect("UTC timestamps always format")
}

/// Parse a stored RFC 3339 timestamp.
pub fn parse_timestamp(s: &str) -> Option<OffsetDateTime> {
    OffsetDateTime::parse(s, &Rfc3339).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bootstrap_is_idempotent() {
        let store = Store::open_in_memory().unwrap();
        store.bootstrap().unwrap();
        let conn = store.lock();
        let count: i64 = conn
            .query_row(
                "SELECT count(*) FROM sqlite_master WHERE type = 'table' AND name LIKE 'innovation%'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert!(count >= 6);
    }

    #[test]
    fn timestamps_round_trip() {
        let now = now_rfc3339();
        assert!(parse_timestamp(&now).is_some());
        assert!(parse_timestamp("not a timestamp").is_none());
    }
}
