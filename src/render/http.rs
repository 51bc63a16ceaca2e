//! HTTP-backed renderer
//!
//! The served HTML is taken as the rendered DOM. Page load is bounded by
//! `page-load-timeout-ms`. When the main-content region is missing, the
//! page is re-fetched until it shows up or `content-timeout-ms` elapses.

use crate::config::Config;
use crate::render::parser::{extract_hrefs, has_match, inner_html};
use crate::render::{LinkStrategy, RenderError, RenderedPage, Renderer};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Interval between re-fetches while waiting for the content region
const CONTENT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Renders pages by fetching them over HTTP
pub struct HttpRenderer {
    client: Client,
    page_load_timeout: Duration,
    content_timeout: Duration,
    content_selector: String,
    await_selectors: Vec<String>,
}

impl HttpRenderer {
    /// Builds a renderer from the crawl configuration
    ///
    /// # Example
    ///
    /// ```no_run
    /// use std::path::Path;
    /// use sumi_scroll::config::load_config;
    /// use sumi_scroll::render::HttpRenderer;
    ///
    /// let config = load_config(Path::new("config.toml")).unwrap();
    /// let renderer = HttpRenderer::new(&config).unwrap();
    /// ```
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(config.user_agent.header_value())
            .connect_timeout(Duration::from_secs(10))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            client,
            page_load_timeout: Duration::from_millis(config.crawler.page_load_timeout_ms),
            content_timeout: Duration::from_millis(config.crawler.content_timeout_ms),
            content_selector: config.crawler.content_selector.clone(),
            await_selectors: config.crawler.await_selectors.clone(),
        })
    }

    fn load_timeout(&self, url: &str) -> RenderError {
        RenderError::LoadTimeout {
            url: url.to_string(),
            timeout: self.page_load_timeout,
        }
    }
}

/// Fetches `url` and returns the final URL and body of a successful response
async fn fetch_html(client: &Client, url: &str) -> Result<(Url, String), RenderError> {
    let load_error = |reason: String| RenderError::Load {
        url: url.to_string(),
        reason,
    };

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| load_error(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(load_error(format!("HTTP {}", status.as_u16())));
    }

    let final_url = response.url().clone();
    let body = response
        .text()
        .await
        .map_err(|e| load_error(e.to_string()))?;

    Ok((final_url, body))
}

#[async_trait]
impl Renderer for HttpRenderer {
    type Page = StaticPage;

    async fn render(&self, url: &str) -> Result<StaticPage, RenderError> {
        let (final_url, html) =
            match tokio::time::timeout(self.page_load_timeout, fetch_html(&self.client, url)).await
            {
                Err(_) => return Err(self.load_timeout(url)),
                Ok(result) => result?,
            };

        for selector in &self.await_selectors {
            if !has_match(&html, selector)? {
                tracing::debug!("Awaited selector '{}' missing on {}", selector, url);
                return Err(self.load_timeout(url));
            }
        }

        Ok(StaticPage {
            client: self.client.clone(),
            url: final_url,
            html,
            content_selector: self.content_selector.clone(),
            content_timeout: self.content_timeout,
        })
    }
}

/// A fetched HTML document
pub struct StaticPage {
    client: Client,
    url: Url,
    html: String,
    content_selector: String,
    content_timeout: Duration,
}

impl StaticPage {
    async fn poll_for_content(&self) -> Result<String, RenderError> {
        loop {
            tokio::time::sleep(CONTENT_POLL_INTERVAL).await;

            let html = match fetch_html(&self.client, self.url.as_str()).await {
                Ok((_, html)) => html,
                Err(e) => {
                    tracing::trace!("Re-fetch while waiting for content failed: {}", e);
                    continue;
                }
            };

            if let Some(content) = inner_html(&html, &self.content_selector)? {
                return Ok(content);
            }
        }
    }
}

#[async_trait]
impl RenderedPage for StaticPage {
    async fn links(&self, strategy: &LinkStrategy) -> Vec<String> {
        match extract_hrefs(&self.html, &self.url, strategy.selector()) {
            Ok(links) => links,
            Err(e) => {
                tracing::warn!("Link extraction failed on {}: {}", self.url, e);
                Vec::new()
            }
        }
    }

    async fn main_content(&self) -> Result<String, RenderError> {
        if let Some(content) = inner_html(&self.html, &self.content_selector)? {
            return Ok(content);
        }

        match tokio::time::timeout(self.content_timeout, self.poll_for_content()).await {
            Ok(result) => result,
            Err(_) => Err(RenderError::ContentTimeout {
                url: self.url.to_string(),
                selector: self.content_selector.clone(),
                timeout: self.content_timeout,
            }),
        }
    }

    async fn close(self) {
        tracing::trace!("Closing page {}", self.url);
    }
}
