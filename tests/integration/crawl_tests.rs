//! Integration tests for the crawl loop
//!
//! These tests drive the crawler over a scripted renderer, so every
//! scenario is deterministic and needs no network.

use crate::common::{test_config, Script, ScriptedRenderer, BASE};
use std::time::Duration;
use sumi_scroll::crawler::{Coordinator, CrawlDriver, CrawlSettings, Frontier};
use sumi_scroll::output::{persist_frontier, read_page, FilePageWriter};
use sumi_scroll::render::LinkStrategy;
use sumi_scroll::state::{CrawlCounters, PageContent};
use sumi_scroll::storage::{RunStatus, SqliteStorage, Storage};
use tempfile::TempDir;

fn settings(max_steps: u32) -> CrawlSettings {
    CrawlSettings {
        base_url: BASE.to_string(),
        site_url: BASE.to_string(),
        max_steps,
        visit_delay: Duration::ZERO,
        link_strategy: LinkStrategy::AllAnchors,
    }
}

#[tokio::test]
async fn test_off_site_links_are_filtered() {
    let renderer = ScriptedRenderer::new(vec![(
        "https://docs.example.com/home",
        Script::page(
            &["https://docs.example.com/guide", "https://other.com/x"],
            "<h1>Home</h1>",
        ),
    )]);
    let driver = CrawlDriver::new(renderer, settings(1));

    let report = driver.run(Frontier::with_seed("/home", BASE)).await;

    assert_eq!(report.frontier.len(), 2);
    assert_eq!(
        report.frontier.get("/home").unwrap().content,
        Some(PageContent::Extracted("<h1>Home</h1>".to_string()))
    );
    assert!(report.frontier.is_pending("/guide"));
    assert!(!report.frontier.contains("/x"));
    assert!(!report.frontier.contains("https://other.com/x"));
}

#[tokio::test]
async fn test_load_timeout_is_recorded_and_crawl_continues() {
    let renderer = ScriptedRenderer::new(vec![
        (
            "https://docs.example.com/home",
            Script::page(
                &["https://docs.example.com/broken", "https://docs.example.com/next"],
                "home",
            ),
        ),
        ("https://docs.example.com/broken", Script::LoadTimeout),
        ("https://docs.example.com/next", Script::page(&[], "next")),
    ]);
    let probe = renderer.clone();
    let driver = CrawlDriver::new(renderer, settings(10));

    let report = driver.run(Frontier::with_seed("/home", BASE)).await;

    assert_eq!(
        report.frontier.get("/broken").unwrap().content,
        Some(PageContent::PageLoadFailed)
    );
    assert_eq!(report.counters.page_failures, 1);
    assert_eq!(report.counters.successes, 2);
    assert!(!report.frontier.is_pending("/next"));
    assert_eq!(probe.renders(), 3);
    assert_eq!(probe.closes(), 2);
}

#[tokio::test]
async fn test_content_timeout_still_discovers_links() {
    let renderer = ScriptedRenderer::new(vec![(
        "https://docs.example.com/slow",
        Script::slow(&["https://docs.example.com/a", "https://docs.example.com/b"]),
    )]);
    let probe = renderer.clone();
    let driver = CrawlDriver::new(renderer, settings(1));

    let report = driver.run(Frontier::with_seed("/slow", BASE)).await;

    assert_eq!(
        report.frontier.get("/slow").unwrap().content,
        Some(PageContent::ContentLoadFailed)
    );
    assert!(report.frontier.is_pending("/a"));
    assert!(report.frontier.is_pending("/b"));
    assert_eq!(report.counters.content_failures, 1);
    assert_eq!(report.counters.successes, 0);
    assert_eq!(probe.closes(), 1);
}

#[tokio::test]
async fn test_cyclic_site_terminates() {
    let renderer = ScriptedRenderer::new(vec![
        (
            "https://docs.example.com/a",
            Script::page(&["https://docs.example.com/b"], "a"),
        ),
        (
            "https://docs.example.com/b",
            Script::page(&["https://docs.example.com/a"], "b"),
        ),
    ]);
    let probe = renderer.clone();
    let driver = CrawlDriver::new(renderer, settings(100));

    let report = driver.run(Frontier::with_seed("/a", BASE)).await;

    assert_eq!(report.counters.steps, 2);
    assert_eq!(probe.renders(), 2);
    assert_eq!(report.frontier.pending_count(), 0);
}

#[tokio::test]
async fn test_zero_budget_returns_initial_frontier() {
    let renderer = ScriptedRenderer::new(vec![(
        "https://docs.example.com/home",
        Script::page(&["https://docs.example.com/guide"], "home"),
    )]);
    let probe = renderer.clone();
    let driver = CrawlDriver::new(renderer, settings(0));
    let seed = Frontier::with_seed("/home", BASE);

    let report = driver.run(seed.clone()).await;

    assert_eq!(report.frontier, seed);
    assert_eq!(report.counters, CrawlCounters::new());
    assert_eq!(probe.renders(), 0);
}

#[tokio::test]
async fn test_breadth_first_order_under_budget() {
    let renderer = ScriptedRenderer::new(vec![
        (
            "https://docs.example.com/home",
            Script::page(
                &["https://docs.example.com/a", "https://docs.example.com/b"],
                "home",
            ),
        ),
        (
            "https://docs.example.com/a",
            Script::page(&["https://docs.example.com/a/deep"], "a"),
        ),
        ("https://docs.example.com/b", Script::page(&[], "b")),
    ]);
    let driver = CrawlDriver::new(renderer, settings(3));

    let report = driver.run(Frontier::with_seed("/home", BASE)).await;

    assert_eq!(report.counters.steps, 3);
    assert!(!report.frontier.is_pending("/b"));
    assert!(report.frontier.is_pending("/a/deep"));
}

#[tokio::test]
async fn test_persisted_pages_round_trip() {
    let contents = [
        ("/home", "<h1>Home</h1>"),
        ("/guide/intro", "<p>Intro &amp; ünïcödé</p>"),
    ];
    let renderer = ScriptedRenderer::new(vec![
        (
            "https://docs.example.com/home",
            Script::page(
                &[
                    "https://docs.example.com/guide/intro",
                    "https://docs.example.com/broken",
                ],
                contents[0].1,
            ),
        ),
        (
            "https://docs.example.com/guide/intro",
            Script::page(&[], contents[1].1),
        ),
    ]);
    let driver = CrawlDriver::new(renderer, settings(10));
    let report = driver.run(Frontier::with_seed("/home", BASE)).await;

    let dir = TempDir::new().unwrap();
    let writer = FilePageWriter::new(dir.path());
    let persisted = persist_frontier(&report.frontier, &writer).await;

    assert_eq!(persisted.written, 2);
    assert!(persisted.failed.is_empty());
    for (url, content) in contents {
        assert_eq!(read_page(dir.path(), url).await.unwrap(), content);
    }
    assert!(read_page(dir.path(), "/broken").await.is_err());
}

#[tokio::test]
async fn test_coordinator_end_to_end() {
    let dir = TempDir::new().unwrap();
    let config = test_config(BASE, dir.path(), 10);
    let renderer = ScriptedRenderer::new(vec![
        (
            "https://docs.example.com/home",
            Script::page(&["https://docs.example.com/guide"], "<h1>Home</h1>"),
        ),
        ("https://docs.example.com/guide", Script::page(&[], "<h1>Guide</h1>")),
    ]);

    let coordinator = Coordinator::with_renderer(config, "hash", true, renderer).unwrap();
    let run_id = coordinator.run_id();
    let report = coordinator.run().await.unwrap();

    assert_eq!(report.counters.successes, 2);
    let pages = dir.path().join("pages");
    assert_eq!(read_page(&pages, "/guide").await.unwrap(), "<h1>Guide</h1>");

    let index = std::fs::read_to_string(pages.join("index.md")).unwrap();
    assert!(index.contains("[/home](<_2Fhome.html>)"));
    assert!(index.contains("[/guide](<_2Fguide.html>)"));

    let storage = SqliteStorage::new(&dir.path().join("crawl.db")).unwrap();
    let run = storage.get_run(run_id).unwrap();
    assert_eq!(run.status, RunStatus::Completed);
    assert_eq!(storage.load_frontier().unwrap(), report.frontier);
}

#[tokio::test]
async fn test_coordinator_budget_spans_resumed_run() {
    let dir = TempDir::new().unwrap();
    let chain = ScriptedRenderer::new(vec![
        ("https://docs.example.com/home", Script::page(&["https://docs.example.com/p1"], "home")),
        ("https://docs.example.com/p1", Script::page(&["https://docs.example.com/p2"], "p1")),
        ("https://docs.example.com/p2", Script::page(&["https://docs.example.com/p3"], "p2")),
        ("https://docs.example.com/p3", Script::page(&[], "p3")),
    ]);

    // An interrupted run that already spent two of its three steps
    {
        let mut storage = SqliteStorage::new(&dir.path().join("crawl.db")).unwrap();
        let run_id = storage.create_run("hash").unwrap();
        let mut frontier = Frontier::with_seed("/home", BASE);
        frontier.extend(["https://docs.example.com/p1"], BASE);
        frontier.record_visit("/home", PageContent::Extracted("home".to_string()));
        frontier.extend(["https://docs.example.com/p2"], BASE);
        frontier.record_visit("/p1", PageContent::Extracted("p1".to_string()));
        storage.save_frontier(&frontier).unwrap();
        let counters = CrawlCounters {
            steps: 2,
            successes: 2,
            content_failures: 0,
            page_failures: 0,
        };
        storage.save_counters(run_id, &counters).unwrap();
    }

    let probe = chain.clone();
    let coordinator =
        Coordinator::with_renderer(test_config(BASE, dir.path(), 3), "hash", false, chain)
            .unwrap();
    let report = coordinator.run().await.unwrap();

    assert_eq!(probe.renders(), 1);
    assert_eq!(report.counters.steps, 3);
    assert!(!report.frontier.is_pending("/p2"));
    assert!(report.frontier.is_pending("/p3"));
}
