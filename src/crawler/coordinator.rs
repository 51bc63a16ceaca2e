//! Crawler coordinator - main crawl orchestration logic
//!
//! This module wraps the crawl driver with everything a real run needs:
//! - Opening the checkpoint database
//! - Resuming an interrupted run or seeding a new one
//! - Checkpointing the frontier and counters while the crawl runs
//! - Writing the mirrored pages and the index when the crawl is done

use crate::config::Config;
use crate::crawler::driver::{CrawlDriver, CrawlReport, CrawlSettings, CrawlState};
use crate::crawler::Frontier;
use crate::output::{persist_frontier, write_index, FilePageWriter};
use crate::render::{HttpRenderer, Renderer};
use crate::state::CrawlCounters;
use crate::storage::{RunStatus, SqliteStorage, Storage};
use crate::ScrollError;
use std::path::Path;

/// Main crawler coordinator structure
pub struct Coordinator<R: Renderer> {
    config: Config,
    storage: SqliteStorage,
    driver: CrawlDriver<R>,
    frontier: Frontier,
    counters: CrawlCounters,
    run_id: i64,
}

impl Coordinator<HttpRenderer> {
    /// Creates a coordinator that renders pages over HTTP
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `config_hash` - Hash of the configuration file, stored with the run
    /// * `fresh` - Whether to start a fresh crawl (discards any interrupted run)
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(ScrollError)` - Failed to initialize
    pub fn new(config: Config, config_hash: &str, fresh: bool) -> Result<Self, ScrollError> {
        let renderer = HttpRenderer::new(&config)?;
        Self::with_renderer(config, config_hash, fresh, renderer)
    }
}

impl<R: Renderer> Coordinator<R> {
    /// Creates a coordinator over an arbitrary renderer
    pub fn with_renderer(
        config: Config,
        config_hash: &str,
        fresh: bool,
        renderer: R,
    ) -> Result<Self, ScrollError> {
        let mut storage = SqliteStorage::new(Path::new(&config.output.database_path))?;
        let seed = || Frontier::with_seed(&config.site.seed_path, &config.site.base_url);

        let (run_id, frontier, counters) = if fresh {
            tracing::info!("Starting fresh run");
            storage.clear_frontier()?;
            (storage.create_run(config_hash)?, seed(), CrawlCounters::new())
        } else {
            match storage.get_latest_run()? {
                Some(run) if run.status == RunStatus::Running => {
                    if run.config_hash != config_hash {
                        tracing::warn!(
                            "Configuration changed since run {} started, resuming anyway",
                            run.id
                        );
                    }
                    let mut frontier = storage.load_frontier()?;
                    if frontier.is_empty() {
                        frontier = seed();
                    }
                    tracing::info!(
                        "Resuming interrupted run {}: {} steps taken, {} pages pending",
                        run.id,
                        run.counters.steps,
                        frontier.pending_count()
                    );
                    (run.id, frontier, run.counters)
                }
                Some(_) => {
                    tracing::info!("Starting new run");
                    storage.clear_frontier()?;
                    (storage.create_run(config_hash)?, seed(), CrawlCounters::new())
                }
                None => {
                    tracing::info!("No previous runs found, starting new run");
                    (storage.create_run(config_hash)?, seed(), CrawlCounters::new())
                }
            }
        };

        storage.save_frontier(&frontier)?;

        let driver = CrawlDriver::new(renderer, CrawlSettings::from_config(&config));

        Ok(Self {
            config,
            storage,
            driver,
            frontier,
            counters,
            run_id,
        })
    }

    pub fn run_id(&self) -> i64 {
        self.run_id
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    pub fn counters(&self) -> &CrawlCounters {
        &self.counters
    }

    /// Runs the crawl to completion and writes the mirror
    ///
    /// The frontier and counters are checkpointed every `checkpoint-every`
    /// steps, so an interrupted process can be resumed from the database.
    pub async fn run(mut self) -> Result<CrawlReport, ScrollError> {
        tracing::info!("Starting crawl run {}", self.run_id);
        let start_time = std::time::Instant::now();
        let checkpoint_every = self.config.crawler.checkpoint_every.max(1);

        while self
            .driver
            .step(&mut self.frontier, &mut self.counters)
            .await
            == CrawlState::Running
        {
            if self.counters.steps % checkpoint_every == 0 {
                self.checkpoint()?;
                let elapsed = start_time.elapsed();
                tracing::info!(
                    "Progress: {} steps, {} pages pending, {:.2} pages/sec",
                    self.counters.steps,
                    self.frontier.pending_count(),
                    self.counters.steps as f64 / elapsed.as_secs_f64().max(f64::EPSILON)
                );
            }
        }

        self.checkpoint()?;

        let writer = FilePageWriter::new(&self.config.output.pages_dir);
        writer.prepare().await?;
        let persisted = persist_frontier(&self.frontier, &writer).await;
        if !persisted.failed.is_empty() {
            tracing::warn!(
                "{} pages could not be saved: {}",
                persisted.failed.len(),
                persisted.failed.join(", ")
            );
        }
        write_index(
            &self.frontier,
            &self.counters,
            writer.dir(),
            Path::new(&self.config.output.index_path),
        )
        .await?;

        self.storage.complete_run(self.run_id, &self.counters)?;

        tracing::info!(
            "Crawl completed: {} steps, {} pages written in {:?}",
            self.counters.steps,
            persisted.written,
            start_time.elapsed()
        );

        Ok(CrawlReport {
            frontier: self.frontier,
            counters: self.counters,
        })
    }

    fn checkpoint(&mut self) -> Result<(), ScrollError> {
        self.storage.save_frontier(&self.frontier)?;
        self.storage.save_counters(self.run_id, &self.counters)?;
        tracing::debug!("Checkpoint saved at step {}", self.counters.steps);
        Ok(())
    }
}

/// Runs a complete crawl over HTTP
///
/// # Example
///
/// ```no_run
/// use sumi_scroll::config::load_config_with_hash;
/// use sumi_scroll::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let (config, hash) = load_config_with_hash(Path::new("config.toml"))?;
/// run_crawl(config, &hash, false).await?;
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(
    config: Config,
    config_hash: &str,
    fresh: bool,
) -> Result<CrawlReport, ScrollError> {
    let coordinator = Coordinator::new(config, config_hash, fresh)?;
    coordinator.run().await
}
