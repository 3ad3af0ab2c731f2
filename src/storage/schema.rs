//! Database schema definitions
//!
//! This module contains the SQL schema for the Video-Poller database.

/// SQL schema for the database
///
/// `publish_time` holds UTC RFC 3339 text with fixed nanosecond precision, so
/// lexical order matches chronological order and the index serves
/// newest-first scans.
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS videos (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    publish_time TEXT NOT NULL,
    thumbnail TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_videos_publish_time ON videos(publish_time);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
