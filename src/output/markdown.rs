//! Markdown index of the offline mirror
//!
//! The index lists every mirrored page with a link to its file, followed by
//! the pages that failed and the pages left pending when the crawl stopped.

use crate::crawler::Frontier;
use crate::output::files::page_path;
use crate::output::traits::OutputResult;
use crate::state::{CrawlCounters, PageContent};
use std::path::{Path, PathBuf};

/// Writes the markdown index of the mirror
///
/// # Arguments
///
/// * `frontier` - The final frontier of the crawl
/// * `counters` - The final counters of the crawl
/// * `pages_dir` - Directory holding the mirrored pages
/// * `index_path` - Where the index should be written
pub async fn write_index(
    frontier: &Frontier,
    counters: &CrawlCounters,
    pages_dir: &Path,
    index_path: &Path,
) -> OutputResult<()> {
    let markdown = format_index(frontier, counters, &link_base(pages_dir, index_path));
    if let Some(parent) = index_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(index_path, markdown).await?;
    tracing::info!("Index written to {}", index_path.display());
    Ok(())
}

/// Directory prefix used for page links in the index
///
/// Links are bare file names when the index sits inside the pages directory.
fn link_base(pages_dir: &Path, index_path: &Path) -> PathBuf {
    match index_path.parent() {
        Some(parent) if parent == pages_dir => PathBuf::new(),
        _ => pages_dir.to_path_buf(),
    }
}

/// Formats the mirror index as markdown
pub fn format_index(frontier: &Frontier, counters: &CrawlCounters, link_base: &Path) -> String {
    let mut md = String::new();

    md.push_str("# Sumi-Scroll Mirror Index\n\n");

    md.push_str("## Crawl Summary\n\n");
    md.push_str(&format!("- **Steps**: {}\n", counters.steps));
    md.push_str(&format!("- **Pages Discovered**: {}\n", frontier.len()));
    md.push_str(&format!("- **Successful**: {}\n", counters.successes));
    md.push_str(&format!(
        "- **Content Failures**: {}\n",
        counters.content_failures
    ));
    md.push_str(&format!("- **Page Failures**: {}\n", counters.page_failures));
    md.push_str(&format!(
        "- **Success Rate**: {:.2}%\n\n",
        counters.success_rate()
    ));

    let mirrored: Vec<_> = frontier
        .iter()
        .filter(|entry| {
            entry
                .content
                .as_ref()
                .and_then(PageContent::extracted)
                .is_some_and(|content| !content.is_empty())
        })
        .collect();
    md.push_str(&format!("## Pages ({})\n\n", mirrored.len()));
    for entry in mirrored {
        let target = page_path(link_base, &entry.url);
        md.push_str(&format!(
            "- [{}](<{}>)\n",
            escape_label(display_url(&entry.url)),
            target.display()
        ));
    }
    md.push('\n');

    let failed: Vec<_> = frontier
        .iter()
        .filter(|entry| entry.content.as_ref().is_some_and(PageContent::is_failure))
        .collect();
    if !failed.is_empty() {
        md.push_str(&format!("## Failed Pages ({})\n\n", failed.len()));
        for entry in failed {
            if let Some(content) = &entry.content {
                md.push_str(&format!(
                    "- `{}`: {}\n",
                    display_url(&entry.url),
                    content.as_str()
                ));
            }
        }
        md.push('\n');
    }

    let pending: Vec<_> = frontier.iter().filter(|entry| entry.is_pending()).collect();
    if !pending.is_empty() {
        md.push_str(&format!("## Not Yet Visited ({})\n\n", pending.len()));
        for entry in pending {
            md.push_str(&format!("- `{}`\n", display_url(&entry.url)));
        }
        md.push('\n');
    }

    md
}

/// Escapes the characters that would end a markdown link label early
fn escape_label(label: &str) -> String {
    let mut escaped = String::with_capacity(label.len());
    for c in label.chars() {
        if matches!(c, '\\' | '[' | ']') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn display_url(url: &str) -> &str {
    if url.is_empty() {
        "/"
    } else {
        url
    }
}
