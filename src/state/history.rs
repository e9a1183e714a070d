use rusqlite::{Connection, Result as SqlResult};
use std::path::PathBuf;

use super::data::ScanRecord;

/// The History catalog manages the SQLite scan database.
/// It stores one row per completed dispatch: the decoded payload, the
/// verdict (or error text) the dispatch produced, and when it happened.
pub struct History {
    conn: Connection,
    db_path: PathBuf,
}

impl History {
    /// Create a new History instance and initialize the database.
    ///
    /// The database file is created in the user's data directory:
    /// - Linux: ~/.local/share/qr-sentry/scan_history.db
    /// - macOS: ~/Library/Application Support/qr-sentry/scan_history.db
    /// - Windows: %APPDATA%\qr-sentry\scan_history.db
    pub fn open() -> SqlResult<Self> {
        let db_path = Self::get_db_path();

        // Ensure the parent directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .expect("Failed to create application data directory");
        }

        let conn = Connection::open(&db_path)?;

        println!("📁 Scan history at: {}", db_path.display());

        let history = History { conn, db_path };
        history.init_schema()?;

        Ok(history)
    }

    /// Get the path where the database should be stored
    fn get_db_path() -> PathBuf {
        let mut path = dirs::data_dir()
            .or_else(dirs::home_dir)
            .expect("Could not determine user data directory");

        path.push("qr-sentry");
        path.push("scan_history.db");
        path
    }

    /// Initialize the database schema.
    /// Creates the table and index if they don't exist.
    fn init_schema(&self) -> SqlResult<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS scans (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                payload         TEXT NOT NULL,
                verdict         TEXT NOT NULL,
                ok              INTEGER NOT NULL,
                scanned_at      INTEGER NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_scans_scanned_at
             ON scans(scanned_at DESC)",
            [],
        )?;

        Ok(())
    }

    /// Get a count of recorded scans
    pub fn scan_count(&self) -> SqlResult<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM scans", [], |row| row.get(0))
    }

    /// Record a completed dispatch.
    /// Returns the new record ID.
    pub fn record(&self, payload: &str, verdict: &str, ok: bool) -> SqlResult<i64> {
        let scanned_at = chrono::Utc::now().timestamp();

        self.conn.execute(
            "INSERT INTO scans (payload, verdict, ok, scanned_at) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![payload, verdict, ok, scanned_at],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    /// Get the most recent scans, newest first
    pub fn recent(&self, limit: usize) -> SqlResult<Vec<ScanRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, payload, verdict, ok, scanned_at FROM scans
             ORDER BY scanned_at DESC, id DESC LIMIT ?1",
        )?;

        let record_iter = stmt.query_map([limit], |row| {
            Ok(ScanRecord {
                id: row.get(0)?,
                payload: row.get(1)?,
                verdict: row.get(2)?,
                ok: row.get(3)?,
                scanned_at: row.get(4)?,
            })
        })?;

        let mut records = Vec::new();
        for record in record_iter {
            records.push(record?);
        }

        Ok(records)
    }
}

// Implement Debug for better error messages
impl std::fmt::Debug for History {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("History")
            .field("db_path", &self.db_path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn in_memory() -> History {
        let conn = Connection::open_in_memory().unwrap();
        let history = History {
            conn,
            db_path: PathBuf::from(":memory:"),
        };
        history.init_schema().unwrap();
        history
    }

    #[test]
    fn test_record_and_count() {
        let history = in_memory();
        assert_eq!(history.scan_count().unwrap(), 0);

        history
            .record("https://example.com", "This looks like a legitimate URL.", true)
            .unwrap();
        history
            .record("http://bad.example", "Error: unrecognized format", false)
            .unwrap();

        assert_eq!(history.scan_count().unwrap(), 2);
    }

    #[test]
    fn test_recent_is_newest_first_and_limited() {
        let history = in_memory();
        for i in 0..5 {
            history.record(&format!("payload-{i}"), "ok", true).unwrap();
        }

        let recent = history.recent(3).unwrap();
        assert_eq!(recent.len(), 3);
        // Same-second inserts fall back to id ordering
        assert_eq!(recent[0].payload, "payload-4");
        assert_eq!(recent[1].payload, "payload-3");
        assert_eq!(recent[2].payload, "payload-2");
    }

    #[test]
    fn test_ok_flag_roundtrip() {
        let history = in_memory();
        history.record("https://example.com", "fine", true).unwrap();
        history.record("http://bad.example", "Error: nope", false).unwrap();

        let recent = history.recent(10).unwrap();
        assert!(!recent[0].ok);
        assert!(recent[1].ok);
    }
}
