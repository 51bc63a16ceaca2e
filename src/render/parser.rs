//! DOM helpers for rendered HTML
//!
//! These functions parse a document on every call and return owned data, so
//! no parsed DOM is ever held across an await point.

use crate::render::RenderError;
use scraper::{Html, Selector};
use url::Url;

fn parse_selector(selector: &str) -> Result<Selector, RenderError> {
    Selector::parse(selector).map_err(|e| RenderError::Selector(format!("'{}': {:?}", selector, e)))
}

/// Collects the link targets of every element matching `selector`
///
/// Each `href` is resolved against `page_url` the way a browser exposes
/// `a.href`; unusable targets are dropped (see [`resolve_link`]).
///
/// # Example
///
/// ```
/// use sumi_scroll::render::extract_hrefs;
/// use url::Url;
///
/// let html = r#"<nav><a class="sidebar-item" href="/guide">Guide</a></nav><a href="/other">x</a>"#;
/// let page = Url::parse("https://docs.example.com/home").unwrap();
/// let links = extract_hrefs(html, &page, "a.sidebar-item").unwrap();
/// assert_eq!(links, vec!["https://docs.example.com/guide".to_string()]);
/// ```
pub fn extract_hrefs(html: &str, page_url: &Url, selector: &str) -> Result<Vec<String>, RenderError> {
    let selector = parse_selector(selector)?;
    let document = Html::parse_document(html);

    let links = document
        .select(&selector)
        .filter(|element| element.value().attr("download").is_none())
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, page_url))
        .collect();

    Ok(links)
}

/// Returns the inner HTML of the first element matching `selector`
pub fn inner_html(html: &str, selector: &str) -> Result<Option<String>, RenderError> {
    let selector = parse_selector(selector)?;
    let document = Html::parse_document(html);
    Ok(document.select(&selector).next().map(|element| element.inner_html()))
}

/// Returns true if at least one element matches `selector`
pub fn has_match(html: &str, selector: &str) -> Result<bool, RenderError> {
    let selector = parse_selector(selector)?;
    let document = Html::parse_document(html);
    let found = document.select(&selector).next().is_some();
    Ok(found)
}

/// Resolves a link href to an absolute URL
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - fragment-only anchors
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
///
/// Fragments are stripped from the resolved URL.
pub fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    // Same page anchors
    if href.starts_with('#') {
        return None;
    }

    let mut absolute_url = base_url.join(href).ok()?;
    if absolute_url.scheme() != "http" && absolute_url.scheme() != "https" {
        return None;
    }
    absolute_url.set_fragment(None);

    Some(absolute_url.to_string())
}
