//! State tracking module for Sumi-Scroll
//!
//! This module defines what is recorded against each frontier entry and the
//! counters accumulated over a crawl run.
//!
//! # Components
//!
//! - `PageContent`: Extracted content or one of the two failure markers
//! - `CrawlCounters`: Steps taken and visit outcomes of a run

mod counters;
mod page_content;

pub use counters::CrawlCounters;
pub use page_content::{PageContent, CONTENT_LOAD_FAILED, PAGE_LOAD_FAILED};
