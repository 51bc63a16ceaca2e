//! The crawl frontier
//!
//! Maps every discovered canonical URL to its recorded content. An entry
//! without content is pending; an entry with content has been visited.
//! Entries keep their first-discovery order, and the next page to visit is
//! always the earliest-discovered pending one, which makes the traversal
//! breadth-first.

use crate::state::PageContent;
use crate::url::{belongs_to_site, is_usable_link, normalize};
use std::collections::HashMap;

/// A single frontier entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    /// Canonical URL of the page
    pub url: String,

    /// Recorded content, None while the page is pending
    pub content: Option<PageContent>,
}

impl FrontierEntry {
    pub fn is_pending(&self) -> bool {
        self.content.is_none()
    }
}

/// Insertion-ordered map from canonical URL to visit status
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frontier {
    entries: Vec<FrontierEntry>,
    index: HashMap<String, usize>,

    /// No entry before this position is pending
    cursor: usize,
}

impl Frontier {
    /// Creates an empty frontier
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a frontier holding only the seed page, pending
    ///
    /// The seed is canonicalized like any discovered link, so every key in
    /// the frontier is in canonical form.
    pub fn with_seed(seed: &str, base_url: &str) -> Self {
        let mut frontier = Self::new();
        frontier.insert_pending(normalize(seed, base_url));
        frontier
    }

    /// Rebuilds a frontier from stored entries, in the given order
    ///
    /// Duplicate URLs keep their first occurrence.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = FrontierEntry>,
    {
        let mut frontier = Self::new();
        for entry in entries {
            if frontier.index.contains_key(&entry.url) {
                continue;
            }
            frontier.index.insert(entry.url.clone(), frontier.entries.len());
            frontier.entries.push(entry);
        }
        frontier.advance_cursor();
        frontier
    }

    /// Returns the earliest-discovered pending URL
    ///
    /// Returns None when every entry has been visited. Repeated calls without
    /// an intervening mutation return the same URL.
    pub fn next_pending(&self) -> Option<&str> {
        self.entries[self.cursor..]
            .iter()
            .find(|entry| entry.is_pending())
            .map(|entry| entry.url.as_str())
    }

    /// Adds newly discovered links as pending entries
    ///
    /// Each raw link is canonicalized against `base_url`. Off-site links,
    /// unusable links, and links whose canonical URL is already known
    /// (pending or visited) are skipped: the first discovery wins.
    ///
    /// Returns the number of entries inserted.
    pub fn extend<I, S>(&mut self, links: I, base_url: &str) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let before = self.entries.len();

        for link in links {
            let raw = link.as_ref();
            if !belongs_to_site(raw, base_url) || !is_usable_link(raw) {
                tracing::trace!("Skipping link {}", raw);
                continue;
            }

            let canonical = normalize(raw, base_url);
            if !self.index.contains_key(&canonical) {
                self.insert_pending(canonical);
            }
        }

        let inserted = self.entries.len() - before;
        tracing::debug!(
            "Frontier extended by {} entries ({} visited of {})",
            inserted,
            self.visited_count(),
            self.len()
        );
        inserted
    }

    /// Records the content of a visited page
    ///
    /// A pending entry becomes visited; a visited entry has its content
    /// replaced; an unknown URL is inserted directly as visited.
    pub fn record_visit(&mut self, url: &str, content: PageContent) {
        match self.index.get(url) {
            Some(&position) => self.entries[position].content = Some(content),
            None => {
                self.index.insert(url.to_string(), self.entries.len());
                self.entries.push(FrontierEntry {
                    url: url.to_string(),
                    content: Some(content),
                });
            }
        }
        self.advance_cursor();
    }

    /// Looks up an entry by canonical URL
    pub fn get(&self, url: &str) -> Option<&FrontierEntry> {
        self.index.get(url).map(|&position| &self.entries[position])
    }

    pub fn contains(&self, url: &str) -> bool {
        self.index.contains_key(url)
    }

    /// Returns true if `url` is known and not yet visited
    pub fn is_pending(&self, url: &str) -> bool {
        self.get(url).is_some_and(FrontierEntry::is_pending)
    }

    /// Iterates over the entries in discovery order
    pub fn iter(&self) -> impl Iterator<Item = &FrontierEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_pending()).count()
    }

    pub fn visited_count(&self) -> usize {
        self.len() - self.pending_count()
    }

    fn insert_pending(&mut self, url: String) {
        self.index.insert(url.clone(), self.entries.len());
        self.entries.push(FrontierEntry { url, content: None });
    }

    fn advance_cursor(&mut self) {
        while self.cursor < self.entries.len() && !self.entries[self.cursor].is_pending() {
            self.cursor += 1;
        }
    }
}
