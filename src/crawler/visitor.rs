//! Page visitor
//!
//! Turns one rendered page into frontier updates: its on-site links become
//! pending entries and its main content (or a content-failure marker) is
//! recorded against its canonical URL. Link discovery does not depend on
//! whether content extraction succeeds.

use crate::crawler::Frontier;
use crate::render::{LinkStrategy, RenderedPage};
use crate::state::{CrawlCounters, PageContent};
use crate::url::belongs_to_site;

/// Outcome of a single page visit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitOutcome {
    /// Content was extracted
    Success,

    /// The page rendered but its content region never appeared
    ContentFailed,

    /// The page could not be rendered
    PageFailed,
}

/// Processes a rendered page
///
/// Extends `frontier` with the page's on-site links, records the page's
/// content at `url`, and bumps exactly one of the success or
/// content-failure counters. The page is left open; closing it is the
/// caller's job.
pub async fn visit_page<P: RenderedPage>(
    page: &P,
    url: &str,
    frontier: &mut Frontier,
    base_url: &str,
    strategy: &LinkStrategy,
    counters: &mut CrawlCounters,
) -> VisitOutcome {
    let links = page.links(strategy).await;
    let total_links = links.len();
    let on_site: Vec<String> = links
        .into_iter()
        .filter(|link| belongs_to_site(link, base_url))
        .collect();
    tracing::debug!(
        "{}: {} links, {} on site",
        url,
        total_links,
        on_site.len()
    );

    let discovered = frontier.extend(&on_site, base_url);
    if discovered > 0 {
        tracing::debug!("{} new pages discovered from {}", discovered, url);
    }

    let (content, outcome) = match page.main_content().await {
        Ok(content) => {
            counters.record_success();
            (PageContent::Extracted(content), VisitOutcome::Success)
        }
        Err(e) => {
            tracing::error!("Failed to load the content of {}: {}", url, e);
            counters.record_content_failure();
            (PageContent::ContentLoadFailed, VisitOutcome::ContentFailed)
        }
    };

    tracing::debug!("Assigning {} to {}", content, url);
    frontier.record_visit(url, content);
    outcome
}
