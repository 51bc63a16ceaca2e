//! Crawler module for discovering and visiting pages
//!
//! This module contains the core crawling logic, including:
//! - The frontier of discovered pages and their visit status
//! - The page visitor that turns a rendered page into frontier updates
//! - The step-budgeted crawl driver
//! - Overall crawl coordination (resume, checkpoints, persistence)

mod coordinator;
mod driver;
mod frontier;
mod visitor;

pub use coordinator::{run_crawl, Coordinator};
pub use driver::{CrawlDriver, CrawlReport, CrawlSettings, CrawlState};
pub use frontier::{Frontier, FrontierEntry};
pub use visitor::{visit_page, VisitOutcome};

use crate::config::Config;
use crate::ScrollError;

/// Runs a complete mirror operation
///
/// This is the main entry point for mirroring a site. It will:
/// 1. Open the checkpoint database
/// 2. Resume the interrupted run or seed a new one
/// 3. Visit pages until the frontier is exhausted or the step budget is spent
/// 4. Write every mirrored page and the index
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `config_hash` - Hash of the configuration file, stored with the run
/// * `fresh` - Discard any interrupted run and start from the seed
pub async fn crawl(config: Config, config_hash: &str, fresh: bool) -> Result<CrawlReport, ScrollError> {
    run_crawl(config, config_hash, fresh).await
}
