//! Canonical URL derivation and link filtering
//!
//! Canonicalization is plain substring removal: the configured base URL is
//! cut out of a raw link and whatever remains is the frontier key. This is
//! not URL resolution. A link carrying the base URL inside a query
//! parameter, or spelling the host with different case, canonicalizes
//! "wrongly" (as a distinct page). Keys already persisted by earlier runs
//! depend on this exact behaviour, so it is kept as is.

/// Removes the first occurrence of `base_url` from `raw_link`
///
/// Links that don't contain `base_url` pass through unchanged.
///
/// # Examples
///
/// ```
/// use sumi_scroll::url::normalize;
///
/// assert_eq!(normalize("https://docs.example.com/guide", "https://docs.example.com"), "/guide");
/// assert_eq!(normalize("/guide", "https://docs.example.com"), "/guide");
/// ```
pub fn normalize(raw_link: &str, base_url: &str) -> String {
    if base_url.is_empty() {
        return raw_link.to_string();
    }
    raw_link.replacen(base_url, "", 1)
}

/// Returns true if `raw_link` points into the mirrored site
///
/// A link belongs to the site when it contains `base_url` anywhere.
pub fn belongs_to_site(raw_link: &str, base_url: &str) -> bool {
    raw_link.contains(base_url)
}

/// Returns true if the link is worth following
///
/// Filters empty links and bare one-character anchors such as `#` or `/`.
pub fn is_usable_link(raw_link: &str) -> bool {
    raw_link.chars().count() > 1
}
