//! File-per-page mirror writer
//!
//! Each mirrored page lands in `<pages-dir>/<stem>.html`, where the stem is
//! derived from the canonical URL by [`page_file_stem`]. Only extracted,
//! non-empty content is written; failure markers stay in the frontier and
//! the index.

use crate::crawler::Frontier;
use crate::output::traits::{OutputError, OutputResult, PageWriter};
use crate::url::page_file_stem;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Extension of mirrored page files
pub const PAGE_EXTENSION: &str = "html";

/// Path of the mirrored file for `canonical_url` inside `dir`
pub fn page_path(dir: &Path, canonical_url: &str) -> PathBuf {
    dir.join(format!("{}.{}", page_file_stem(canonical_url), PAGE_EXTENSION))
}

/// Writes mirrored pages into a directory
#[derive(Debug, Clone)]
pub struct FilePageWriter {
    dir: PathBuf,
}

impl FilePageWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Creates the target directory if needed
    pub async fn prepare(&self) -> OutputResult<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| OutputError::Write {
                path: self.dir.clone(),
                source,
            })
    }
}

#[async_trait]
impl PageWriter for FilePageWriter {
    async fn write(&self, canonical_url: &str, content: &str) -> OutputResult<()> {
        let path = page_path(&self.dir, canonical_url);
        tokio::fs::write(&path, content)
            .await
            .map_err(|source| OutputError::Write {
                path: path.clone(),
                source,
            })?;
        tracing::info!("Saved {} to {}", canonical_url, path.display());
        Ok(())
    }
}

/// Reads back the mirrored content of `canonical_url` from `dir`
pub async fn read_page(dir: &Path, canonical_url: &str) -> OutputResult<String> {
    Ok(tokio::fs::read_to_string(page_path(dir, canonical_url)).await?)
}

/// Outcome of persisting a frontier
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistSummary {
    /// Pages written
    pub written: usize,

    /// Canonical URLs whose write failed
    pub failed: Vec<String>,
}

/// Writes every visited page with extracted, non-empty content
///
/// A failed write is logged and recorded in the summary; the remaining
/// pages are still written.
pub async fn persist_frontier<W: PageWriter + ?Sized>(
    frontier: &Frontier,
    writer: &W,
) -> PersistSummary {
    let mut summary = PersistSummary::default();
    for entry in frontier.iter() {
        let Some(content) = entry.content.as_ref().and_then(|c| c.extracted()) else {
            continue;
        };
        if content.is_empty() {
            continue;
        }
        match writer.write(&entry.url, content).await {
            Ok(()) => summary.written += 1,
            Err(e) => {
                tracing::error!("Failed to save {}: {}", entry.url, e);
                summary.failed.push(entry.url.clone());
            }
        }
    }
    summary
}
