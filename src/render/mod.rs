//! Render module: the page-rendering collaborator
//!
//! The crawler never talks to a browser or an HTTP client directly. It asks
//! a [`Renderer`] for a page and then asks the resulting [`RenderedPage`]
//! for its outbound links and its main content. Any implementation that can
//! produce a DOM for a URL plugs in here; [`HttpRenderer`] treats the served
//! HTML as the rendered DOM.

mod http;
mod parser;

pub use http::{HttpRenderer, StaticPage};
pub use parser::{extract_hrefs, inner_html, resolve_link};

use crate::config::{CrawlerConfig, LinkStrategyKind};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors raised by the render collaborator
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Page load timed out after {timeout:?}: {url}")]
    LoadTimeout { url: String, timeout: Duration },

    #[error("Failed to load {url}: {reason}")]
    Load { url: String, reason: String },

    #[error("Content region '{selector}' did not appear within {timeout:?}: {url}")]
    ContentTimeout {
        url: String,
        selector: String,
        timeout: Duration,
    },

    #[error("Invalid selector: {0}")]
    Selector(String),
}

impl RenderError {
    /// Returns true if this error means the page itself could not be produced
    pub fn is_load_failure(&self) -> bool {
        matches!(self, Self::LoadTimeout { .. } | Self::Load { .. })
    }
}

/// How outbound links are discovered on a rendered page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkStrategy {
    /// Every anchor with an `href`
    AllAnchors,

    /// Only elements matching a navigation sidebar selector
    Sidebar { selector: String },
}

impl LinkStrategy {
    /// Builds the strategy selected by the crawler configuration
    pub fn from_config(config: &CrawlerConfig) -> Self {
        match config.link_strategy {
            LinkStrategyKind::AllAnchors => Self::AllAnchors,
            LinkStrategyKind::Sidebar => Self::Sidebar {
                selector: config.sidebar_selector.clone(),
            },
        }
    }

    /// CSS selector of the elements whose `href` is collected
    pub fn selector(&self) -> &str {
        match self {
            Self::AllAnchors => "a[href]",
            Self::Sidebar { selector } => selector,
        }
    }
}

/// Produces rendered pages for URLs
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Handle to a rendered page
    type Page: RenderedPage;

    /// Renders `url`
    ///
    /// Fails with a load error (usually [`RenderError::LoadTimeout`]) when
    /// the page does not become ready within the renderer's bound.
    async fn render(&self, url: &str) -> Result<Self::Page, RenderError>;
}

/// A page produced by a [`Renderer`]
///
/// `close` consumes the handle, so a page can only be closed once.
#[async_trait]
pub trait RenderedPage: Send {
    /// Raw link targets of every element matched by `strategy`
    async fn links(&self, strategy: &LinkStrategy) -> Vec<String>;

    /// The page's main content
    ///
    /// Fails with [`RenderError::ContentTimeout`] when the content region
    /// does not appear within its own bound, independent of page load.
    async fn main_content(&self) -> Result<String, RenderError>;

    /// Releases the resources held by the page
    async fn close(self);
}
