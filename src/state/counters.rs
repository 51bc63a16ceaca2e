//! Run-scoped crawl statistics
//!
//! Counters are kept apart from the configuration: they start at zero for
//! each crawl (or at the stored values when resuming one), are bumped once
//! per visit outcome, and are read at completion for the summary.

/// Outcome counters of one crawl run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlCounters {
    /// Visits dispatched so far (checked against the step budget)
    pub steps: u32,

    /// Pages whose content was extracted
    pub successes: u32,

    /// Pages that rendered but whose content region never appeared
    pub content_failures: u32,

    /// Pages that failed to render
    pub page_failures: u32,
}

impl CrawlCounters {
    /// Creates zeroed counters
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_step(&mut self) {
        self.steps += 1;
    }

    pub fn record_success(&mut self) {
        self.successes += 1;
    }

    pub fn record_content_failure(&mut self) {
        self.content_failures += 1;
    }

    pub fn record_page_failure(&mut self) {
        self.page_failures += 1;
    }

    /// Total number of visit outcomes recorded
    pub fn visited(&self) -> u32 {
        self.successes + self.content_failures + self.page_failures
    }

    /// Total number of failed visits of either kind
    pub fn failures(&self) -> u32 {
        self.content_failures + self.page_failures
    }

    /// Share of visits that succeeded, in percent
    pub fn success_rate(&self) -> f64 {
        let visited = self.visited();
        if visited == 0 {
            0.0
        } else {
            (self.successes as f64 / visited as f64) * 100.0
        }
    }
}
