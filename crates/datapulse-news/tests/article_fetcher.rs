//! Integration tests for `HttpArticleFetcher` against a local `wiremock` server.

use chrono::{TimeZone, Utc};
use datapulse_news::{build_http_client, ArticleFetcher, HttpArticleFetcher, NewsConfig, NewsError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ARTICLE_HTML: &str = r#"<!doctype html>
<html>
<head>
  <title>Ignored | Site</title>
  <meta property="og:title" content="Factory orders climb for third month">
  <meta property="article:published_time" content="2024-06-01T09:15:00Z">
</head>
<body>
  <nav><a href="/">Home</a></nav>
  <p>Factory orders climbed for a third straight month in May.</p>
  <p>Economists said factory demand remained strong despite higher rates.</p>
</body>
</html>"#;

fn fetcher(max_retries: u32) -> HttpArticleFetcher {
    let config = NewsConfig {
        request_timeout_secs: 5,
        max_retries,
        retry_backoff_base_ms: 0,
        ..NewsConfig::default()
    };
    let client = build_http_client(&config).expect("failed to build test client");
    HttpArticleFetcher::new(client, &config)
}

#[tokio::test]
async fn fetches_and_extracts_article() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/story"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ARTICLE_HTML))
        .mount(&server)
        .await;

    let article = fetcher(0)
        .fetch(&format!("{}/story", server.uri()))
        .await
        .expect("article fetched");

    assert_eq!(article.title, "Factory orders climb for third month");
    assert!(article.text.starts_with("Factory orders climbed"));
    assert!(article.text.contains("higher rates"));
    assert!(article.keywords.contains("factory"));
    assert_eq!(
        article.published_date,
        Some(Utc.with_ymd_and_hms(2024, 6, 1, 9, 15, 0).unwrap())
    );
    assert!(!article.summary.is_empty());
}

#[tokio::test]
async fn page_without_text_is_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/empty"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body></body></html>"))
        .mount(&server)
        .await;

    let result = fetcher(0).fetch(&format!("{}/empty", server.uri())).await;
    assert!(
        matches!(result, Err(NewsError::Parse { .. })),
        "expected Parse error, got: {result:?}"
    );
}

#[tokio::test]
async fn not_found_is_unexpected_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let result = fetcher(2).fetch(&format!("{}/gone", server.uri())).await;
    assert!(
        matches!(result, Err(NewsError::UnexpectedStatus { status: 404, .. })),
        "expected UnexpectedStatus 404, got: {result:?}"
    );
}

#[tokio::test]
async fn server_error_is_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ARTICLE_HTML))
        .mount(&server)
        .await;

    let article = fetcher(1)
        .fetch(&format!("{}/flaky", server.uri()))
        .await
        .expect("retry recovers");
    assert_eq!(article.title, "Factory orders climb for third month");
}

#[tokio::test]
async fn malformed_url_is_rejected_without_request() {
    let result = fetcher(0).fetch("not a url").await;
    assert!(
        matches!(result, Err(NewsError::InvalidUrl { .. })),
        "expected InvalidUrl, got: {result:?}"
    );
}
