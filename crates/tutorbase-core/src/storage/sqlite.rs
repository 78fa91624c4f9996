use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::Connection;
use tracing::debug;

use crate::error::{Result, TutorbaseError};
use crate::model::{Location, Session, SessionStatus, SessionType};

/// SQLite-backed store for scheduled sessions.
///
/// Holds a single `Connection` behind `Arc<Mutex<>>` so the store can be
/// cloned into whatever surface consumes it. Sessions are mutated only
/// through full-record replacement; there are no partial updates.
pub struct SessionStore {
    conn: Arc<Mutex<Connection>>,
    path: PathBuf,
}

impl SessionStore {
    /// Open (or create) a file-backed SQLite database at `path`.
    ///
    /// Sets WAL journal mode, then creates the schema if it doesn't already
    /// exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = Connection::open(&path)
            .map_err(|e| TutorbaseError::Storage(format!("failed to open SQLite database: {e}")))?;

        Self::configure_and_init(conn, path)
    }

    /// Open an in-memory SQLite database (useful for tests).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| {
            TutorbaseError::Storage(format!("failed to open in-memory SQLite database: {e}"))
        })?;

        Self::configure_and_init(conn, PathBuf::from(":memory:"))
    }

    /// Return the path this database was opened with (`:memory:` for in-memory).
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn configure_and_init(conn: Connection, path: PathBuf) -> Result<Self> {
        conn.execute_batch("PRAGMA journal_mode = WAL;")
            .map_err(|e| TutorbaseError::Storage(format!("failed to set WAL mode: {e}")))?;

        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
            path,
        };

        store.create_tables()?;
        Ok(store)
    }

    /// Create the sessions table and indexes (idempotent).
    fn create_tables(&self) -> Result<()> {
        let conn = self.lock_conn()?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS sessions (
                id TEXT PRIMARY KEY,
                date TEXT NOT NULL,
                start_time TEXT NOT NULL,
                end_time TEXT NOT NULL,
                teacher_id TEXT NOT NULL,
                student_ids TEXT NOT NULL DEFAULT '[]',
                subject TEXT NOT NULL DEFAULT '',
                year_level TEXT,
                location TEXT NOT NULL DEFAULT 'centre',
                session_type TEXT NOT NULL DEFAULT 'one-to-one',
                status TEXT NOT NULL DEFAULT 'planned',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_sessions_date ON sessions(date);
            CREATE INDEX IF NOT EXISTS idx_sessions_teacher ON sessions(teacher_id, date);
            ",
        )
        .map_err(|e| TutorbaseError::Storage(format!("failed to create tables: {e}")))?;

        Ok(())
    }

    fn lock_conn(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| TutorbaseError::Storage(format!("failed to acquire database lock: {e}")))
    }

    /// Insert or fully replace a session record.
    pub fn save_session(&self, session: &Session) -> Result<()> {
        let student_ids = serde_json::to_string(&session.student_ids)?;
        let conn = self.lock_conn()?;

        conn.execute(
            "INSERT OR REPLACE INTO sessions
             (id, date, start_time, end_time, teacher_id, student_ids,
              subject, year_level, location, session_type, status,
              created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            rusqlite::params![
                session.id,
                session.date.to_string(),
                session.start_time,
                session.end_time,
                session.teacher_id,
                student_ids,
                session.subject,
                session.year_level,
                session.location.to_string(),
                session.session_type.to_string(),
                session.status.to_string(),
                session.created_at.to_rfc3339(),
                session.updated_at.to_rfc3339(),
            ],
        )
        .map_err(|e| TutorbaseError::Storage(format!("failed to save session: {e}")))?;

        debug!(id = %session.id, date = %session.date, "session saved");
        Ok(())
    }

    /// Fetch a single session by id.
    pub fn get_session(&self, id: &str) -> Result<Session> {
        let conn = self.lock_conn()?;

        let mut stmt = conn
            .prepare(&format!("SELECT {COLUMNS} FROM sessions WHERE id = ?1"))
            .map_err(|e| TutorbaseError::Storage(format!("failed to prepare query: {e}")))?;

        let mut rows = stmt
            .query_map([id], row_to_session)
            .map_err(|e| TutorbaseError::Storage(format!("failed to query session: {e}")))?;

        match rows.next() {
            Some(row) => {
                row.map_err(|e| TutorbaseError::Storage(format!("failed to read session: {e}")))
            }
            None => Err(TutorbaseError::NotFound(format!("session {id}"))),
        }
    }

    /// All sessions ordered by date, then start time.
    pub fn list_sessions(&self) -> Result<Vec<Session>> {
        self.query_sessions(
            &format!("SELECT {COLUMNS} FROM sessions ORDER BY date, start_time"),
            rusqlite::params![],
        )
    }

    /// Sessions scheduled on a given calendar date.
    pub fn sessions_on(&self, date: NaiveDate) -> Result<Vec<Session>> {
        self.query_sessions(
            &format!("SELECT {COLUMNS} FROM sessions WHERE date = ?1 ORDER BY start_time"),
            rusqlite::params![date.to_string()],
        )
    }

    /// Delete a session record outright.
    pub fn delete_session(&self, id: &str) -> Result<()> {
        let conn = self.lock_conn()?;

        let affected = conn
            .execute("DELETE FROM sessions WHERE id = ?1", [id])
            .map_err(|e| TutorbaseError::Storage(format!("failed to delete session: {e}")))?;

        if affected == 0 {
            return Err(TutorbaseError::NotFound(format!("session {id}")));
        }
        Ok(())
    }

    fn query_sessions<P: rusqlite::Params>(&self, sql: &str, params: P) -> Result<Vec<Session>> {
        let conn = self.lock_conn()?;

        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| TutorbaseError::Storage(format!("failed to prepare query: {e}")))?;

        let rows = stmt
            .query_map(params, row_to_session)
            .map_err(|e| TutorbaseError::Storage(format!("failed to query sessions: {e}")))?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| TutorbaseError::Storage(format!("failed to read sessions: {e}")))
    }
}

const COLUMNS: &str = "id, date, start_time, end_time, teacher_id, student_ids, \
     subject, year_level, location, session_type, status, created_at, updated_at";

fn row_to_session(row: &rusqlite::Row<'_>) -> rusqlite::Result<Session> {
    let student_ids: String = row.get(5)?;
    let location: String = row.get(8)?;
    let session_type: String = row.get(9)?;
    let status: String = row.get(10)?;
    let date: String = row.get(1)?;
    let created_at: String = row.get(11)?;
    let updated_at: String = row.get(12)?;

    Ok(Session {
        id: row.get(0)?,
        date: NaiveDate::from_str(&date).map_err(|e| field_err(1, e))?,
        start_time: row.get(2)?,
        end_time: row.get(3)?,
        teacher_id: row.get(4)?,
        student_ids: serde_json::from_str(&student_ids).map_err(|e| field_err(5, e))?,
        subject: row.get(6)?,
        year_level: row.get(7)?,
        location: Location::from_str(&location).map_err(|e| field_err(8, e))?,
        session_type: SessionType::from_str(&session_type).map_err(|e| field_err(9, e))?,
        status: SessionStatus::from_str(&status).map_err(|e| field_err(10, e))?,
        created_at: DateTime::parse_from_rfc3339(&created_at)
            .map_err(|e| field_err(11, e))?
            .with_timezone(&Utc),
        updated_at: DateTime::parse_from_rfc3339(&updated_at)
            .map_err(|e| field_err(12, e))?
            .with_timezone(&Utc),
    })
}

fn field_err<E: std::error::Error + Send + Sync + 'static>(
    index: usize,
    err: E,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        index,
        rusqlite::types::Type::Text,
        Box::new(err),
    )
}
