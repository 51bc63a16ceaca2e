//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::crawler::{Frontier, FrontierEntry};
use crate::state::{CrawlCounters, PageContent};
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{RunRecord, RunStatus};
use crate::ScrollError;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

/// State string of a pending frontier entry
const PENDING: &str = "pending";

const RUN_COLUMNS: &str = "id, started_at, finished_at, config_hash, status, \
     steps, successes, content_failures, page_failures";

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(ScrollError)` - Failed to open database
    pub fn new(path: &Path) -> Result<Self, ScrollError> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> Result<Self, ScrollError> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

fn run_from_row(row: &Row<'_>) -> rusqlite::Result<RunRecord> {
    Ok(RunRecord {
        id: row.get(0)?,
        started_at: row.get(1)?,
        finished_at: row.get(2)?,
        config_hash: row.get(3)?,
        status: RunStatus::from_db_string(&row.get::<_, String>(4)?).unwrap_or(RunStatus::Running),
        counters: CrawlCounters {
            steps: row.get(5)?,
            successes: row.get(6)?,
            content_failures: row.get(7)?,
            page_failures: row.get(8)?,
        },
    })
}

impl Storage for SqliteStorage {
    // ===== Run Management =====

    fn create_run(&mut self, config_hash: &str) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO runs (started_at, config_hash, status) VALUES (?1, ?2, ?3)",
            params![now, config_hash, RunStatus::Running.to_db_string()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM runs WHERE id = ?1", RUN_COLUMNS),
                params![run_id],
                run_from_row,
            )
            .optional()?
            .ok_or(StorageError::RunNotFound(run_id))
    }

    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>> {
        let run = self
            .conn
            .query_row(
                &format!("SELECT {} FROM runs ORDER BY id DESC LIMIT 1", RUN_COLUMNS),
                [],
                run_from_row,
            )
            .optional()?;

        Ok(run)
    }

    fn save_counters(&mut self, run_id: i64, counters: &CrawlCounters) -> StorageResult<()> {
        let updated = self.conn.execute(
            "UPDATE runs SET steps = ?1, successes = ?2, content_failures = ?3, page_failures = ?4
             WHERE id = ?5",
            params![
                counters.steps,
                counters.successes,
                counters.content_failures,
                counters.page_failures,
                run_id
            ],
        )?;

        if updated == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }
        Ok(())
    }

    fn complete_run(&mut self, run_id: i64, counters: &CrawlCounters) -> StorageResult<()> {
        self.save_counters(run_id, counters)?;
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "UPDATE runs SET status = ?1, finished_at = ?2 WHERE id = ?3",
            params![RunStatus::Completed.to_db_string(), now, run_id],
        )?;
        Ok(())
    }

    // ===== Frontier Snapshot =====

    fn save_frontier(&mut self, frontier: &Frontier) -> StorageResult<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM frontier_entries", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO frontier_entries (position, url, state, content) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for (position, entry) in frontier.iter().enumerate() {
                let (state, content) = match &entry.content {
                    None => (PENDING, None),
                    Some(content) => (content.to_db_string(), content.extracted()),
                };
                stmt.execute(params![position as i64, entry.url, state, content])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn load_frontier(&self) -> StorageResult<Frontier> {
        let mut stmt = self
            .conn
            .prepare("SELECT url, state, content FROM frontier_entries ORDER BY position ASC")?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut entries = Vec::with_capacity(rows.len());
        for (url, state, body) in rows {
            let content = if state == PENDING {
                None
            } else {
                match PageContent::from_db_parts(&state, body) {
                    Some(content) => Some(content),
                    None => return Err(StorageError::CorruptEntry { url, state }),
                }
            };
            entries.push(FrontierEntry { url, content });
        }

        Ok(Frontier::from_entries(entries))
    }

    fn clear_frontier(&mut self) -> StorageResult<()> {
        self.conn.execute("DELETE FROM frontier_entries", [])?;
        Ok(())
    }
}
