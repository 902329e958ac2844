mod schema;

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::Result;
use chrono::Utc;
use rusqlite::{Connection, Row, TransactionBehavior};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::feedback::{FeedbackSource, FeedbackStore, FeedbackTx};
use crate::models::*;

const FEEDBACK_COLUMNS: &str = "id, session_id, user_id, rating, comment, created_at";

/// SQLite-backed store for users, sessions and their feedback.
///
/// Clones share one connection. Every operation holds the connection lock for
/// its whole duration, which also serializes feedback submissions.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: PathBuf) -> Result<Self> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Database path has no parent directory"))?;
        std::fs::create_dir_all(parent)?;
        let conn = Connection::open(&path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        tracing::debug!("Opened database at {}", path.display());
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_default() -> Result<Self> {
        Self::open(Self::default_path()?)
    }

    pub fn default_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", "session-feedback")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        Ok(dirs.data_dir().join("session-feedback.db"))
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn migrate(&self) -> Result<()> {
        let conn = self.lock()?;
        schema::run_migrations(&conn)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow::anyhow!("database lock poisoned"))
    }

    // ============================================================
    // User operations
    // ============================================================

    pub fn get_all_users(&self) -> Result<Vec<User>> {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare("SELECT id, created_at, updated_at FROM users ORDER BY rowid")?;

        let users = stmt
            .query_map([], user_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(users)
    }

    pub fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        let conn = self.lock()?;
        Ok(find_user(&conn, id)?)
    }

    pub fn create_user(&self) -> Result<User> {
        let conn = self.lock()?;
        let id = Uuid::new_v4();
        let now = Utc::now();

        conn.execute(
            "INSERT INTO users (id, created_at, updated_at) VALUES (?, ?, ?)",
            (id.to_string(), now.to_rfc3339(), now.to_rfc3339()),
        )?;

        Ok(User {
            id,
            created_at: now,
            updated_at: now,
        })
    }

    /// Feedback written by the user is left in place.
    pub fn delete_user(&self, id: Uuid) -> Result<bool> {
        let conn = self.lock()?;
        let rows = conn.execute("DELETE FROM users WHERE id = ?", [id.to_string()])?;
        Ok(rows > 0)
    }

    // ============================================================
    // Session operations
    // ============================================================

    pub fn get_all_sessions(&self) -> Result<Vec<Session>> {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare("SELECT id, created_at, updated_at FROM sessions ORDER BY rowid")?;

        let sessions = stmt
            .query_map([], session_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(sessions)
    }

    pub fn get_session(&self, id: Uuid) -> Result<Option<Session>> {
        let conn = self.lock()?;
        Ok(find_session(&conn, id)?)
    }

    pub fn create_session(&self) -> Result<Session> {
        let conn = self.lock()?;
        let id = Uuid::new_v4();
        let now = Utc::now();

        conn.execute(
            "INSERT INTO sessions (id, created_at, updated_at) VALUES (?, ?, ?)",
            (id.to_string(), now.to_rfc3339(), now.to_rfc3339()),
        )?;

        Ok(Session {
            id,
            created_at: now,
            updated_at: now,
        })
    }

    /// Feedback left on the session is left in place.
    pub fn delete_session(&self, id: Uuid) -> Result<bool> {
        let conn = self.lock()?;
        let rows = conn.execute("DELETE FROM sessions WHERE id = ?", [id.to_string()])?;
        Ok(rows > 0)
    }

    // ============================================================
    // Session feedback operations
    // ============================================================

    pub fn get_feedback(&self, id: Uuid) -> Result<Option<SessionFeedback>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM session_feedback WHERE id = ?",
            FEEDBACK_COLUMNS
        ))?;

        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(feedback_from_row(row)?)),
            None => Ok(None),
        }
    }

    pub fn delete_feedback(&self, id: Uuid) -> Result<bool> {
        let conn = self.lock()?;
        let rows = conn.execute(
            "DELETE FROM session_feedback WHERE id = ?",
            [id.to_string()],
        )?;
        Ok(rows > 0)
    }

    fn query_feedback(
        &self,
        filter: &str,
        params: impl rusqlite::Params,
    ) -> AppResult<Vec<SessionFeedback>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM session_feedback {} ORDER BY rowid",
            FEEDBACK_COLUMNS, filter
        ))?;

        let feedback = stmt
            .query_map(params, feedback_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(feedback)
    }

    // ============================================================
    // Visit counter
    // ============================================================

    /// Increment the visit counter, creating it on first use.
    pub fn record_visit(&self) -> Result<Counter> {
        let conn = self.lock()?;
        let counter = conn.query_row(
            "INSERT INTO counters (id, visit) VALUES (1, 1)
             ON CONFLICT(id) DO UPDATE SET visit = visit + 1
             RETURNING id, visit",
            [],
            |row| {
                Ok(Counter {
                    id: row.get(0)?,
                    visit: row.get(1)?,
                })
            },
        )?;
        Ok(counter)
    }
}

impl FeedbackSource for Database {
    fn all_feedback(&self) -> AppResult<Vec<SessionFeedback>> {
        self.query_feedback("", [])
    }

    fn feedback_by_session(&self, session_id: &str) -> AppResult<Vec<SessionFeedback>> {
        self.query_feedback("WHERE session_id = ?", [session_id])
    }

    fn feedback_by_rating(&self, rating: i64) -> AppResult<Vec<SessionFeedback>> {
        self.query_feedback("WHERE rating = ?", [rating])
    }

    fn feedback_by_session_and_rating(
        &self,
        session_id: &str,
        rating: i64,
    ) -> AppResult<Vec<SessionFeedback>> {
        self.query_feedback(
            "WHERE session_id = ? AND rating = ?",
            rusqlite::params![session_id, rating],
        )
    }
}

impl FeedbackStore for Database {
    fn unit_of_work<T, F>(&self, work: F) -> AppResult<T>
    where
        F: FnOnce(&dyn FeedbackTx) -> AppResult<T>,
    {
        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        // Dropping `tx` on the error path rolls it back.
        let result = work(&*tx)?;
        tx.commit()?;
        Ok(result)
    }
}

impl FeedbackTx for Connection {
    fn feedback_exists(&self, session_id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let count: i64 = self.query_row(
            "SELECT COUNT(*) FROM session_feedback WHERE session_id = ? AND user_id = ?",
            (session_id.to_string(), user_id.to_string()),
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn find_session(&self, id: Uuid) -> AppResult<Option<Session>> {
        Ok(find_session(self, id)?)
    }

    fn find_user(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(find_user(self, id)?)
    }

    fn insert_feedback(&self, feedback: &SessionFeedback) -> AppResult<()> {
        let result = self.execute(
            "INSERT INTO session_feedback (id, session_id, user_id, rating, comment, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
            (
                feedback.id.to_string(),
                feedback.session_id.to_string(),
                feedback.user_id.to_string(),
                feedback.rating,
                &feedback.comment,
                feedback.created_at.to_rfc3339(),
            ),
        );

        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                Err(AppError::DuplicateSubmission)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn link_feedback(
        &self,
        session: &Session,
        user: &User,
        feedback: &SessionFeedback,
    ) -> AppResult<()> {
        let now = feedback.created_at.to_rfc3339();

        let rows = self.execute(
            "UPDATE sessions SET updated_at = ? WHERE id = ?",
            (&now, session.id.to_string()),
        )?;
        if rows == 0 {
            return Err(AppError::NotFound("Session"));
        }

        let rows = self.execute(
            "UPDATE users SET updated_at = ? WHERE id = ?",
            (&now, user.id.to_string()),
        )?;
        if rows == 0 {
            return Err(AppError::NotFound("User"));
        }

        Ok(())
    }
}

fn find_user(conn: &Connection, id: Uuid) -> rusqlite::Result<Option<User>> {
    let mut stmt = conn.prepare("SELECT id, created_at, updated_at FROM users WHERE id = ?")?;
    let mut rows = stmt.query([id.to_string()])?;
    match rows.next()? {
        Some(row) => Ok(Some(user_from_row(row)?)),
        None => Ok(None),
    }
}

fn find_session(conn: &Connection, id: Uuid) -> rusqlite::Result<Option<Session>> {
    let mut stmt = conn.prepare("SELECT id, created_at, updated_at FROM sessions WHERE id = ?")?;
    let mut rows = stmt.query([id.to_string()])?;
    match rows.next()? {
        Some(row) => Ok(Some(session_from_row(row)?)),
        None => Ok(None),
    }
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: parse_uuid(row.get::<_, String>(0)?),
        created_at: parse_datetime(row.get::<_, String>(1)?),
        updated_at: parse_datetime(row.get::<_, String>(2)?),
    })
}

fn session_from_row(row: &Row<'_>) -> rusqlite::Result<Session> {
    Ok(Session {
        id: parse_uuid(row.get::<_, String>(0)?),
        created_at: parse_datetime(row.get::<_, String>(1)?),
        updated_at: parse_datetime(row.get::<_, String>(2)?),
    })
}

fn feedback_from_row(row: &Row<'_>) -> rusqlite::Result<SessionFeedback> {
    Ok(SessionFeedback {
        id: parse_uuid(row.get::<_, String>(0)?),
        session_id: parse_uuid(row.get::<_, String>(1)?),
        user_id: parse_uuid(row.get::<_, String>(2)?),
        rating: row.get(3)?,
        comment: row.get(4)?,
        created_at: parse_datetime(row.get::<_, String>(5)?),
    })
}

fn parse_uuid(s: String) -> Uuid {
    Uuid::parse_str(&s).unwrap_or_else(|_| Uuid::nil())
}

fn parse_datetime(s: String) -> chrono::DateTime<Utc> {
    chrono::DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
