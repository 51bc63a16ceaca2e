//! Output handler traits and types
//!
//! This module defines the trait interface for page writers and the errors
//! raised while persisting the mirror.

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Persists the content of one mirrored page
#[async_trait]
pub trait PageWriter: Send + Sync {
    /// Writes `content` under a location derived from `canonical_url`
    ///
    /// Writing the same URL twice overwrites the earlier content.
    async fn write(&self, canonical_url: &str, content: &str) -> OutputResult<()>;
}
