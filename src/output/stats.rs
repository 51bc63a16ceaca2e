//! Statistics generation from crawl database
//!
//! This module provides functionality for extracting and displaying
//! crawl statistics from the storage layer.

use crate::crawler::Frontier;
use crate::state::{CrawlCounters, PageContent};
use crate::storage::{RunRecord, Storage};
use crate::ScrollError;

/// Crawl statistics summary
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlStatistics {
    /// Counters of the latest run
    pub counters: CrawlCounters,

    /// Total number of entries in the frontier
    pub total_pages: usize,

    /// Entries not yet visited
    pub pending: usize,

    /// Visited entries holding extracted content
    pub extracted: usize,

    /// Visited entries whose content region never appeared
    pub content_failed: usize,

    /// Visited entries whose page never loaded
    pub page_failed: usize,

    /// Status of the latest run, if any
    pub run_status: Option<String>,

    /// Start time of the latest run, if any
    pub started_at: Option<String>,

    /// Finish time of the latest run, if it completed
    pub finished_at: Option<String>,
}

impl CrawlStatistics {
    /// Builds statistics from a frontier and the run it belongs to
    pub fn from_parts(frontier: &Frontier, run: Option<&RunRecord>) -> Self {
        let mut extracted = 0;
        let mut content_failed = 0;
        let mut page_failed = 0;
        for entry in frontier.iter() {
            match &entry.content {
                Some(PageContent::Extracted(_)) => extracted += 1,
                Some(PageContent::ContentLoadFailed) => content_failed += 1,
                Some(PageContent::PageLoadFailed) => page_failed += 1,
                None => {}
            }
        }

        Self {
            counters: run.map(|r| r.counters).unwrap_or_default(),
            total_pages: frontier.len(),
            pending: frontier.pending_count(),
            extracted,
            content_failed,
            page_failed,
            run_status: run.map(|r| r.status.to_db_string().to_string()),
            started_at: run.map(|r| r.started_at.clone()),
            finished_at: run.and_then(|r| r.finished_at.clone()),
        }
    }
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `storage` - The storage backend to query
///
/// # Returns
///
/// * `Ok(CrawlStatistics)` - Successfully loaded statistics
/// * `Err(ScrollError)` - Failed to query statistics
pub fn load_statistics(storage: &dyn Storage) -> Result<CrawlStatistics, ScrollError> {
    let run = storage.get_latest_run()?;
    let frontier = storage.load_frontier()?;
    Ok(CrawlStatistics::from_parts(&frontier, run.as_ref()))
}

fn percentage(count: usize, total: usize) -> f64 {
    if total > 0 {
        (count as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    if let Some(status) = &stats.run_status {
        println!("Latest Run:");
        println!("  Status: {}", status);
        if let Some(started) = &stats.started_at {
            println!("  Started: {}", started);
        }
        if let Some(finished) = &stats.finished_at {
            println!("  Finished: {}", finished);
        }
        println!();
    }

    println!("Counters:");
    println!("  Steps taken: {}", stats.counters.steps);
    println!("  Successes: {}", stats.counters.successes);
    println!("  Content failures: {}", stats.counters.content_failures);
    println!("  Page failures: {}", stats.counters.page_failures);
    println!("  Success rate: {:.1}%", stats.counters.success_rate());
    println!();

    println!("Frontier:");
    println!("  Total pages discovered: {}", stats.total_pages);
    for (label, count) in [
        ("Extracted", stats.extracted),
        ("Content load failed", stats.content_failed),
        ("Page load failed", stats.page_failed),
        ("Pending", stats.pending),
    ] {
        println!(
            "  {}: {} ({:.1}%)",
            label,
            count,
            percentage(count, stats.total_pages)
        );
    }
}

/// Prints the end-of-crawl summary
pub fn print_summary(counters: &CrawlCounters, frontier: &Frontier) {
    println!("\n=== Crawl Complete ===");
    println!("Steps taken: {}", counters.steps);
    println!("Pages discovered: {}", frontier.len());
    let visited = counters.visited() as usize;
    for (label, count) in [
        ("Pages mirrored", counters.successes),
        ("Content failures", counters.content_failures),
        ("Page failures", counters.page_failures),
    ] {
        println!(
            "{}: {} ({:.1}%)",
            label,
            count,
            percentage(count as usize, visited)
        );
    }
    println!("Still pending: {}", frontier.pending_count());
}
