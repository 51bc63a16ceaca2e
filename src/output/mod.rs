//! Output module for the offline mirror
//!
//! This module handles:
//! - Writing one file per mirrored page
//! - Generating the markdown index of the mirror
//! - Recording crawl statistics

mod files;
mod markdown;
pub mod stats;
mod traits;

pub use files::{
    page_path, persist_frontier, read_page, FilePageWriter, PersistSummary, PAGE_EXTENSION,
};
pub use markdown::{format_index, write_index};
pub use stats::{load_statistics, print_statistics, print_summary, CrawlStatistics};
pub use traits::{OutputError, OutputResult, PageWriter};
