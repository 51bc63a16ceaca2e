//! Integration tests for the HTTP renderer
//!
//! These tests use wiremock to serve documentation pages and run the
//! renderer and the full crawl cycle against them.

use crate::common::test_config;
use std::time::Duration;
use sumi_scroll::crawler::run_crawl;
use sumi_scroll::output::read_page;
use sumi_scroll::render::{HttpRenderer, LinkStrategy, RenderError, RenderedPage, Renderer};
use sumi_scroll::state::PageContent;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn doc_page(nav: &str, body: Option<&str>) -> String {
    let content = body
        .map(|b| format!(r#"<div class="markdown-body">{}</div>"#, b))
        .unwrap_or_default();
    format!(
        r#"<html><head><title>Docs</title></head><body><nav>{}</nav>{}</body></html>"#,
        nav, content
    )
}

async fn serve(server: &MockServer, route: &str, html: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_string(html),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_render_extracts_links_and_content() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/home",
        doc_page(
            r##"<a href="/guide#setup">Guide</a><a href="https://other.com/x">Other</a><a href="mailto:team@example.com">Mail</a><a href="#top">Top</a>"##,
            Some("<h1>Home</h1>"),
        ),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let config = test_config(&server.uri(), dir.path(), 10);
    let renderer = HttpRenderer::new(&config).unwrap();

    let page = renderer
        .render(&format!("{}/home", server.uri()))
        .await
        .unwrap();
    let links = page.links(&LinkStrategy::AllAnchors).await;
    let content = page.main_content().await.unwrap();
    page.close().await;

    assert_eq!(
        links,
        vec![
            format!("{}/guide", server.uri()),
            "https://other.com/x".to_string(),
        ]
    );
    assert_eq!(content, "<h1>Home</h1>");
}

#[tokio::test]
async fn test_render_sends_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/home"))
        .and(header(
            "user-agent",
            "TestBot/1.0.0 (+https://example.com/contact)",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string(doc_page("", Some("ok"))))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let renderer = HttpRenderer::new(&test_config(&server.uri(), dir.path(), 10)).unwrap();

    assert!(renderer
        .render(&format!("{}/home", server.uri()))
        .await
        .is_ok());
}

#[tokio::test]
async fn test_render_http_error_is_load_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let renderer = HttpRenderer::new(&test_config(&server.uri(), dir.path(), 10)).unwrap();

    let err = match renderer.render(&format!("{}/missing", server.uri())).await {
        Err(e) => e,
        Ok(_) => panic!("404 should not render"),
    };
    assert!(err.is_load_failure());
    assert!(matches!(err, RenderError::Load { ref reason, .. } if reason == "HTTP 404"));
}

#[tokio::test]
async fn test_slow_response_is_load_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(doc_page("", Some("late")))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut config = test_config(&server.uri(), dir.path(), 10);
    config.crawler.page_load_timeout_ms = 200;
    let renderer = HttpRenderer::new(&config).unwrap();

    let result = renderer.render(&format!("{}/slow", server.uri())).await;
    assert!(matches!(result, Err(RenderError::LoadTimeout { .. })));
}

#[tokio::test]
async fn test_missing_await_selector_is_load_failure() {
    let server = MockServer::start().await;
    serve(&server, "/home", doc_page("", Some("<p>Body</p>"))).await;

    let dir = TempDir::new().unwrap();
    let mut config = test_config(&server.uri(), dir.path(), 10);
    config.crawler.await_selectors = vec!["aside.toc".to_string()];
    let renderer = HttpRenderer::new(&config).unwrap();

    let result = renderer.render(&format!("{}/home", server.uri())).await;
    assert!(matches!(result, Err(RenderError::LoadTimeout { .. })));
}

#[tokio::test]
async fn test_missing_content_region_times_out() {
    let server = MockServer::start().await;
    serve(&server, "/empty", doc_page(r#"<a href="/a">A</a>"#, None)).await;

    let dir = TempDir::new().unwrap();
    let renderer = HttpRenderer::new(&test_config(&server.uri(), dir.path(), 10)).unwrap();

    let page = renderer
        .render(&format!("{}/empty", server.uri()))
        .await
        .unwrap();
    let links = page.links(&LinkStrategy::AllAnchors).await;
    let result = page.main_content().await;
    page.close().await;

    assert_eq!(links.len(), 1);
    assert!(matches!(result, Err(RenderError::ContentTimeout { .. })));
}

#[tokio::test]
async fn test_content_appearing_later_is_extracted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lazy"))
        .respond_with(ResponseTemplate::new(200).set_body_string(doc_page("", None)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    serve(&server, "/lazy", doc_page("", Some("<p>Loaded</p>"))).await;

    let dir = TempDir::new().unwrap();
    let mut config = test_config(&server.uri(), dir.path(), 10);
    config.crawler.content_timeout_ms = 2000;
    let renderer = HttpRenderer::new(&config).unwrap();

    let page = renderer
        .render(&format!("{}/lazy", server.uri()))
        .await
        .unwrap();
    let content = page.main_content().await.unwrap();
    page.close().await;

    assert_eq!(content, "<p>Loaded</p>");
}

#[tokio::test]
async fn test_sidebar_strategy_limits_links() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/home",
        doc_page(
            r#"<a class="sidebar-item" href="/guide">Guide</a><a href="/footer">Footer</a>"#,
            Some("home"),
        ),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let renderer = HttpRenderer::new(&test_config(&server.uri(), dir.path(), 10)).unwrap();
    let page = renderer
        .render(&format!("{}/home", server.uri()))
        .await
        .unwrap();

    let links = page
        .links(&LinkStrategy::Sidebar {
            selector: "a.sidebar-item".to_string(),
        })
        .await;
    page.close().await;

    assert_eq!(links, vec![format!("{}/guide", server.uri())]);
}

#[tokio::test]
async fn test_full_crawl_over_http() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/home",
        doc_page(
            r#"<a href="/guide">Guide</a><a href="/broken">Broken</a><a href="https://other.com/x">Other</a>"#,
            Some("<h1>Home</h1>"),
        ),
    )
    .await;
    serve(
        &server,
        "/guide",
        doc_page(r#"<a href="/home">Home</a>"#, Some("<h1>Guide</h1>")),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = test_config(&server.uri(), dir.path(), 10);
    let report = run_crawl(config, "hash", true).await.unwrap();

    assert_eq!(report.counters.steps, 3);
    assert_eq!(report.counters.successes, 2);
    assert_eq!(report.counters.page_failures, 1);
    assert_eq!(
        report.frontier.get("/broken").unwrap().content,
        Some(PageContent::PageLoadFailed)
    );
    assert!(!report.frontier.contains("https://other.com/x"));

    let pages = dir.path().join("pages");
    assert_eq!(read_page(&pages, "/home").await.unwrap(), "<h1>Home</h1>");
    assert_eq!(read_page(&pages, "/guide").await.unwrap(), "<h1>Guide</h1>");
}
