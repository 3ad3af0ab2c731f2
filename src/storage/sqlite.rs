//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the VideoStore trait.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{StorageError, StorageResult, VideoStore};
use crate::storage::{Video, VideoQuery};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::functions::FunctionFlags;
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// SQLite storage backend
///
/// The connection sits behind a mutex so one store can be shared by the
/// ingestion task and every request handler.
pub struct SqliteVideoStore {
    conn: Mutex<Connection>,
}

impl SqliteVideoStore {
    /// Opens or creates the database at `path` and ensures the schema exists
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteVideoStore)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        register_functions(&conn)?;
        initialize_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        register_functions(&conn)?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }
}

/// Registers `fold(text)`, a Unicode-aware lowercase
///
/// SQLite's own `lower()` only folds ASCII letters.
fn register_functions(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        "fold",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| Ok(ctx.get::<Option<String>>(0)?.map(|s| s.to_lowercase())),
    )
}

/// Renders a publish time in the stored text form
fn encode_publish_time(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn decode_publish_time(id: i64, value: String) -> StorageResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| StorageError::InvalidPublishTime { id, value })
}

impl VideoStore for SqliteVideoStore {
    fn insert(&self, video: &Video) -> StorageResult<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO videos (title, description, publish_time, thumbnail) VALUES (?1, ?2, ?3, ?4)",
            params![
                video.title,
                video.description,
                encode_publish_time(&video.publish_time),
                video.thumbnail_url
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn query(&self, query: &VideoQuery) -> StorageResult<Vec<Video>> {
        // instr() keeps '%' and '_' in user input literal
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, title, description, publish_time, thumbnail FROM videos
             WHERE (?1 IS NULL OR instr(fold(title), fold(?1)) > 0)
               AND (?2 IS NULL OR instr(fold(description), fold(?2)) > 0)
             ORDER BY publish_time DESC, id DESC",
        )?;

        let rows = stmt
            .query_map(params![query.title(), query.description()], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, title, description, publish_time, thumbnail_url)| {
                Ok(Video {
                    title,
                    description,
                    publish_time: decode_publish_time(id, publish_time)?,
                    thumbnail_url,
                })
            })
            .collect()
    }

    fn count(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn()?
            .query_row("SELECT COUNT(*) FROM videos", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}
