//! Crawl driver - the step loop
//!
//! The driver is a two-state machine. While `Running`, each step picks the
//! earliest-discovered pending URL, renders it and hands the page to the
//! visitor. It becomes `Done` when no pending URL remains or when the step
//! budget is spent. The budget is checked before every render, so it is a
//! hard upper bound on visits and the only guard against endless crawls of
//! cyclic sites. Per-page failures are recorded in the frontier and never
//! end the crawl.

use crate::config::Config;
use crate::crawler::visitor::{visit_page, VisitOutcome};
use crate::crawler::Frontier;
use crate::render::{LinkStrategy, RenderedPage, Renderer};
use crate::state::{CrawlCounters, PageContent};
use std::time::Duration;

/// State of the crawl state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlState {
    Running,
    Done,
}

/// Settings the driver reads on every step
#[derive(Debug, Clone)]
pub struct CrawlSettings {
    /// Prefix trimmed from discovered links
    pub base_url: String,

    /// Prefix prepended to canonical URLs before rendering
    pub site_url: String,

    /// Step budget
    pub max_steps: u32,

    /// Pause between consecutive page loads
    pub visit_delay: Duration,

    pub link_strategy: LinkStrategy,
}

impl CrawlSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            base_url: config.site.base_url.clone(),
            site_url: config.site.site_url.clone(),
            max_steps: config.crawler.max_steps,
            visit_delay: Duration::from_millis(config.crawler.visit_delay_ms),
            link_strategy: LinkStrategy::from_config(&config.crawler),
        }
    }
}

/// Final state of a finished crawl
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub frontier: Frontier,
    pub counters: CrawlCounters,
}

/// Drives a crawl over a [`Renderer`]
pub struct CrawlDriver<R> {
    renderer: R,
    settings: CrawlSettings,
}

impl<R: Renderer> CrawlDriver<R> {
    pub fn new(renderer: R, settings: CrawlSettings) -> Self {
        Self { renderer, settings }
    }

    pub fn settings(&self) -> &CrawlSettings {
        &self.settings
    }

    /// Runs a fresh crawl over `frontier` until it is done
    pub async fn run(&self, frontier: Frontier) -> CrawlReport {
        self.run_from(frontier, CrawlCounters::new()).await
    }

    /// Continues a crawl with previously accumulated counters
    ///
    /// The step budget covers the steps already in `counters`.
    pub async fn run_from(&self, mut frontier: Frontier, mut counters: CrawlCounters) -> CrawlReport {
        while self.step(&mut frontier, &mut counters).await == CrawlState::Running {}
        CrawlReport { frontier, counters }
    }

    /// Performs one transition of the state machine
    ///
    /// Returns `Done` without touching the frontier when nothing is pending
    /// or the budget is exhausted. Otherwise visits one page and returns
    /// `Running`.
    pub async fn step(&self, frontier: &mut Frontier, counters: &mut CrawlCounters) -> CrawlState {
        let url = match frontier.next_pending() {
            Some(url) => url.to_string(),
            None => {
                tracing::info!(
                    "Finished crawling: no pending pages after {} steps",
                    counters.steps
                );
                return CrawlState::Done;
            }
        };

        if counters.steps >= self.settings.max_steps {
            tracing::info!(
                "Finished crawling: step budget of {} exhausted, {} pages still pending",
                self.settings.max_steps,
                frontier.pending_count()
            );
            return CrawlState::Done;
        }

        if counters.steps > 0 && !self.settings.visit_delay.is_zero() {
            tokio::time::sleep(self.settings.visit_delay).await;
        }

        counters.record_step();
        let full_url = format!("{}{}", self.settings.site_url, url);
        tracing::info!("Crawling {} (step {})", url, counters.steps);

        let outcome = match self.renderer.render(&full_url).await {
            Ok(page) => {
                let outcome = visit_page(
                    &page,
                    &url,
                    frontier,
                    &self.settings.base_url,
                    &self.settings.link_strategy,
                    counters,
                )
                .await;
                page.close().await;
                outcome
            }
            Err(e) => {
                if e.is_load_failure() {
                    tracing::error!("Failed to load the page {}: {}", full_url, e);
                } else {
                    tracing::error!(
                        "Render of {} failed, recording it as a load failure: {}",
                        full_url,
                        e
                    );
                }
                frontier.record_visit(&url, PageContent::PageLoadFailed);
                counters.record_page_failure();
                VisitOutcome::PageFailed
            }
        };

        tracing::debug!("{} -> {:?}", url, outcome);
        CrawlState::Running
    }
}
