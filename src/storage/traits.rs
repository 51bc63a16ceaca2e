//! Storage traits and error types
//!
//! This module defines the trait interface for checkpoint backends and
//! associated error types.

use crate::crawler::Frontier;
use crate::state::CrawlCounters;
use crate::storage::RunRecord;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("Corrupt frontier entry for {url}: unknown state '{state}'")]
    CorruptEntry { url: String, state: String },

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for checkpoint backend implementations
///
/// A checkpoint holds the latest frontier snapshot and the crawl runs that
/// produced it, which is everything needed to resume an interrupted crawl.
pub trait Storage {
    // ===== Run Management =====

    /// Creates a new crawl run with zeroed counters
    ///
    /// # Arguments
    ///
    /// * `config_hash` - Hash of the configuration file
    ///
    /// # Returns
    ///
    /// The ID of the newly created run
    fn create_run(&mut self, config_hash: &str) -> StorageResult<i64>;

    /// Gets a run by ID
    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord>;

    /// Gets the most recently created run, if any
    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>>;

    /// Stores the current counters of a running crawl
    fn save_counters(&mut self, run_id: i64, counters: &CrawlCounters) -> StorageResult<()>;

    /// Marks a run as completed with its final counters
    fn complete_run(&mut self, run_id: i64, counters: &CrawlCounters) -> StorageResult<()>;

    // ===== Frontier Snapshot =====

    /// Replaces the stored frontier with `frontier`
    fn save_frontier(&mut self, frontier: &Frontier) -> StorageResult<()>;

    /// Loads the stored frontier (empty if none was saved)
    fn load_frontier(&self) -> StorageResult<Frontier>;

    /// Deletes the stored frontier
    fn clear_frontier(&mut self) -> StorageResult<()>;
}
