use serde::Deserialize;

/// Main configuration structure for Sumi-Scroll
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// The documentation site being mirrored
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Prefix trimmed from discovered links; links without it are off-site
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Prefix prepended to a canonical URL to render it
    #[serde(rename = "site-url")]
    pub site_url: String,

    /// Canonical path of the first page to visit
    #[serde(rename = "seed-path")]
    pub seed_path: String,
}

/// Which links a rendered page contributes to the frontier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LinkStrategyKind {
    /// Every anchor on the page
    AllAnchors,
    /// Only anchors matching the sidebar selector
    Sidebar,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of page visits in one crawl
    #[serde(rename = "max-steps")]
    pub max_steps: u32,

    /// Delay between consecutive page loads (milliseconds)
    #[serde(rename = "visit-delay-ms", default = "default_visit_delay_ms")]
    pub visit_delay_ms: u64,

    /// Time allowed for a page to load (milliseconds)
    #[serde(
        rename = "page-load-timeout-ms",
        default = "default_page_load_timeout_ms"
    )]
    pub page_load_timeout_ms: u64,

    /// Time allowed for the main content region to appear (milliseconds)
    #[serde(rename = "content-timeout-ms", default = "default_content_timeout_ms")]
    pub content_timeout_ms: u64,

    #[serde(rename = "link-strategy", default = "default_link_strategy")]
    pub link_strategy: LinkStrategyKind,

    #[serde(rename = "sidebar-selector", default = "default_sidebar_selector")]
    pub sidebar_selector: String,

    /// Selector of the region holding a page's main content
    #[serde(rename = "content-selector", default = "default_content_selector")]
    pub content_selector: String,

    /// Selectors that must be present before a page counts as loaded
    #[serde(rename = "await-selectors", default)]
    pub await_selectors: Vec<String>,

    /// Number of steps between frontier checkpoints
    #[serde(rename = "checkpoint-every", default = "default_checkpoint_every")]
    pub checkpoint_every: u32,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{})",
            self.crawler_name, self.crawler_version, self.contact_url
        )
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving one file per mirrored page
    #[serde(rename = "pages-dir")]
    pub pages_dir: String,

    /// Path to the SQLite checkpoint database
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Path to the markdown index of the mirror
    #[serde(rename = "index-path")]
    pub index_path: String,
}

fn default_visit_delay_ms() -> u64 {
    2000
}

fn default_page_load_timeout_ms() -> u64 {
    30_000
}

fn default_content_timeout_ms() -> u64 {
    5000
}

fn default_link_strategy() -> LinkStrategyKind {
    LinkStrategyKind::AllAnchors
}

fn default_sidebar_selector() -> String {
    "a.sidebar-item".to_string()
}

fn default_content_selector() -> String {
    "div.markdown-body".to_string()
}

fn default_checkpoint_every() -> u32 {
    10
}
