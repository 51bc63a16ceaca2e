//! Shared fixtures for the integration tests

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use sumi_scroll::config::{
    Config, CrawlerConfig, LinkStrategyKind, OutputConfig, SiteConfig, UserAgentConfig,
};
use sumi_scroll::render::{LinkStrategy, RenderError, RenderedPage, Renderer};

pub const BASE: &str = "https://docs.example.com";

/// Builds a test configuration rooted at `site_url` with outputs under `dir`
pub fn test_config(site_url: &str, dir: &Path, max_steps: u32) -> Config {
    Config {
        site: SiteConfig {
            base_url: site_url.to_string(),
            site_url: site_url.to_string(),
            seed_path: "/home".to_string(),
        },
        crawler: CrawlerConfig {
            max_steps,
            visit_delay_ms: 0,
            page_load_timeout_ms: 2000,
            content_timeout_ms: 300,
            link_strategy: LinkStrategyKind::AllAnchors,
            sidebar_selector: "a.sidebar-item".to_string(),
            content_selector: "div.markdown-body".to_string(),
            await_selectors: vec![],
            checkpoint_every: 2,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
        },
        output: OutputConfig {
            pages_dir: dir.join("pages").to_string_lossy().into_owned(),
            database_path: dir.join("crawl.db").to_string_lossy().into_owned(),
            index_path: dir.join("pages").join("index.md").to_string_lossy().into_owned(),
        },
    }
}

/// What the scripted renderer does for one URL
#[derive(Debug, Clone)]
pub enum Script {
    /// Renders with these raw links and this content
    Page { links: Vec<String>, content: String },

    /// Renders with these raw links but the content region never appears
    SlowContent { links: Vec<String> },

    /// Page load times out
    LoadTimeout,
}

impl Script {
    pub fn page(links: &[&str], content: &str) -> Self {
        Self::Page {
            links: links.iter().map(|l| l.to_string()).collect(),
            content: content.to_string(),
        }
    }

    pub fn slow(links: &[&str]) -> Self {
        Self::SlowContent {
            links: links.iter().map(|l| l.to_string()).collect(),
        }
    }
}

/// Renders full URLs from a fixed script; unknown URLs fail to load
#[derive(Clone, Default)]
pub struct ScriptedRenderer {
    scripts: Arc<HashMap<String, Script>>,
    renders: Arc<AtomicUsize>,
    closes: Arc<AtomicUsize>,
}

impl ScriptedRenderer {
    pub fn new(scripts: Vec<(&str, Script)>) -> Self {
        Self {
            scripts: Arc::new(
                scripts
                    .into_iter()
                    .map(|(url, script)| (url.to_string(), script))
                    .collect(),
            ),
            ..Self::default()
        }
    }

    pub fn renders(&self) -> usize {
        self.renders.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

pub struct ScriptedPage {
    url: String,
    links: Vec<String>,
    content: Option<String>,
    closes: Arc<AtomicUsize>,
}

#[async_trait]
impl Renderer for ScriptedRenderer {
    type Page = ScriptedPage;

    async fn render(&self, url: &str) -> Result<ScriptedPage, RenderError> {
        self.renders.fetch_add(1, Ordering::SeqCst);
        let (links, content) = match self.scripts.get(url) {
            Some(Script::Page { links, content }) => (links.clone(), Some(content.clone())),
            Some(Script::SlowContent { links }) => (links.clone(), None),
            Some(Script::LoadTimeout) | None => {
                return Err(RenderError::LoadTimeout {
                    url: url.to_string(),
                    timeout: Duration::from_millis(10),
                })
            }
        };
        Ok(ScriptedPage {
            url: url.to_string(),
            links,
            content,
            closes: Arc::clone(&self.closes),
        })
    }
}

#[async_trait]
impl RenderedPage for ScriptedPage {
    async fn links(&self, _strategy: &LinkStrategy) -> Vec<String> {
        self.links.clone()
    }

    async fn main_content(&self) -> Result<String, RenderError> {
        self.content.clone().ok_or_else(|| RenderError::ContentTimeout {
            url: self.url.clone(),
            selector: "div.markdown-body".to_string(),
            timeout: Duration::from_millis(10),
        })
    }

    async fn close(self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}
