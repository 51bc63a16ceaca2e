//! Content recorded against a visited page
//!
//! A frontier entry without a `PageContent` is pending. Once recorded, the
//! content is either the extracted main content of the page or one of two
//! failure markers.
use std::fmt;

/// Marker text for a page whose render failed
pub const PAGE_LOAD_FAILED: &str = "Failed to load the page";

/// Marker text for a page whose main content region never appeared
pub const CONTENT_LOAD_FAILED: &str = "Failed to load the content.";

/// Recorded outcome of visiting a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageContent {
    /// Main content extracted from the rendered page
    Extracted(String),

    /// The page could not be rendered in time
    PageLoadFailed,

    /// The page rendered but its content region never appeared
    ContentLoadFailed,
}

impl PageContent {
    /// Returns true if this is one of the failure markers
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::PageLoadFailed | Self::ContentLoadFailed)
    }

    /// Returns the extracted content, or None for failure markers
    pub fn extracted(&self) -> Option<&str> {
        match self {
            Self::Extracted(content) => Some(content),
            _ => None,
        }
    }

    /// Returns the text form of this content (failure markers use their marker text)
    pub fn as_str(&self) -> &str {
        match self {
            Self::Extracted(content) => content,
            Self::PageLoadFailed => PAGE_LOAD_FAILED,
            Self::ContentLoadFailed => CONTENT_LOAD_FAILED,
        }
    }

    /// Converts the content kind to a database string representation
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Extracted(_) => "extracted",
            Self::PageLoadFailed => "page_load_failed",
            Self::ContentLoadFailed => "content_load_failed",
        }
    }

    /// Rebuilds content from its database representation
    ///
    /// Returns None if `kind` doesn't match any known kind or if an
    /// extracted page has no stored body.
    pub fn from_db_parts(kind: &str, body: Option<String>) -> Option<Self> {
        match kind {
            "extracted" => body.map(Self::Extracted),
            "page_load_failed" => Some(Self::PageLoadFailed),
            "content_load_failed" => Some(Self::ContentLoadFailed),
            _ => None,
        }
    }
}

impl fmt::Display for PageContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Extracted(content) => write!(f, "{} bytes of content", content.len()),
            Self::PageLoadFailed => f.write_str(PAGE_LOAD_FAILED),
            Self::ContentLoadFailed => f.write_str(CONTENT_LOAD_FAILED),
        }
    }
}
