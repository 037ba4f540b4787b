// Database service module
// SQLite connection and the todos schema

use anyhow::{Context, Result};
use rusqlite::Connection;

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open a database connection
    ///
    /// # Arguments
    /// * `path` - Path to the SQLite database file (or ":memory:" for in-memory)
    ///
    /// # Examples
    /// ```
    /// use week_scheduler::services::database::Database;
    /// let db = Database::new(":memory:").unwrap();
    /// ```
    pub fn new(path: &str) -> Result<Self> {
        let conn =
            Connection::open(path).context(format!("Failed to open database at {}", path))?;
        Ok(Self { conn })
    }

    /// Create the todos table if it does not exist.
    ///
    /// A todo is scheduled when all four schedule columns are set and
    /// unscheduled when all are NULL.
    pub fn initialize_schema(&self) -> Result<()> {
        self.conn
            .execute(
                "CREATE TABLE IF NOT EXISTS todos (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    title TEXT NOT NULL,
                    duration_minutes INTEGER CHECK (duration_minutes IS NULL OR duration_minutes > 0),
                    schedule_day INTEGER CHECK (schedule_day IS NULL OR schedule_day BETWEEN 0 AND 6),
                    start_minute INTEGER CHECK (start_minute IS NULL OR start_minute BETWEEN 0 AND 1440),
                    end_minute INTEGER CHECK (end_minute IS NULL OR end_minute BETWEEN 0 AND 1440),
                    schedule_date TEXT,
                    completed INTEGER NOT NULL DEFAULT 0,
                    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                    updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
                )",
                [],
            )
            .context("Failed to create todos table")?;

        ensure_column(
            &self.conn,
            "todos",
            "completed",
            "ALTER TABLE todos ADD COLUMN completed INTEGER NOT NULL DEFAULT 0",
        )?;

        self.conn
            .execute(
                "CREATE INDEX IF NOT EXISTS idx_todos_schedule_date ON todos(schedule_date)",
                [],
            )
            .context("Failed to create schedule date index")?;

        Ok(())
    }

    /// Get a reference to the database connection
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

/// Add a column to databases created before it existed.
fn ensure_column(conn: &Connection, table: &str, column: &str, ddl: &str) -> Result<()> {
    let exists: i32 = conn
        .query_row(
            "SELECT COUNT(*) FROM pragma_table_info(?1) WHERE name = ?2",
            [table, column],
            |row| row.get(0),
        )
        .context("Failed to inspect table info")?;
    if exists > 0 {
        return Ok(());
    }

    conn.execute(ddl, [])
        .with_context(|| format!("Failed to add {}.{}", table, column))?;
    Ok(())
}
