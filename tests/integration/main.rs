//! Integration tests for Sumi-Scroll
//!
//! `crawl_tests` drives the crawler over a scripted renderer; `http_tests`
//! uses wiremock to serve pages to the HTTP renderer end-to-end.

mod common;
mod crawl_tests;
mod http_tests;
