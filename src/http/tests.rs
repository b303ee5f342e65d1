//! Tests for the HTTP page source module

use super::*;
use crate::pagination::OffsetPaginator;
use crate::types::BackoffType;
use crate::window::HarvestWindow;
use std::time::Duration;
use test_case::test_case;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn source_config(base_url: &str) -> HttpSourceConfig {
    HttpSourceConfig::new(
        format!("{base_url}/rest/json/cves/2.0"),
        OffsetPaginator::new("startIndex", "resultsPerPage", 2000),
    )
}

fn window() -> HarvestWindow {
    HarvestWindow::new(2021, 2).unwrap()
}

// ============================================================================
// Config Tests
// ============================================================================

#[test]
fn test_http_source_config_defaults() {
    let config = source_config("http://localhost");
    assert_eq!(config.start_param, "pubStartDate");
    assert_eq!(config.end_param, "pubEndDate");
    assert_eq!(config.api_key_header, "apiKey");
    assert!(config.api_key.is_none());
    assert!(config.extra_args.is_empty());
    assert!(config.throttle.is_none());
    assert_eq!(config.timeout, Duration::from_secs(60));
}

#[test]
fn test_http_source_config_builder() {
    let config = source_config("http://localhost")
        .with_bound_params("from", "to")
        .with_api_key_header("X-Key")
        .with_api_key(Some("secret".to_string()))
        .with_extra_args(vec![ExtraArg::flag("noRejected")])
        .with_timeout(Duration::from_secs(5))
        .with_throttle(Some(RateLimiterConfig::per_second(3)))
        .with_user_agent("test-agent/1.0");

    assert_eq!(config.start_param, "from");
    assert_eq!(config.end_param, "to");
    assert_eq!(config.api_key_header, "X-Key");
    assert_eq!(config.api_key.as_deref(), Some("secret"));
    assert_eq!(config.extra_args.len(), 1);
    assert_eq!(config.timeout, Duration::from_secs(5));
    assert_eq!(config.throttle, Some(RateLimiterConfig::per_second(3)));
    assert_eq!(config.user_agent, "test-agent/1.0");
}

#[test]
fn test_invalid_base_url() {
    let config = HttpSourceConfig::new("not a url", OffsetPaginator::new("o", "l", 1));
    assert!(HttpPageSource::new(config).is_err());
}

// ============================================================================
// Extra Argument Tests
// ============================================================================

#[test_case("keywordSearch=linux", ExtraArg::pair("keywordSearch", "linux") ; "pair")]
#[test_case("noRejected", ExtraArg::flag("noRejected") ; "flag")]
#[test_case(" cvssV3Severity=HIGH ", ExtraArg::pair("cvssV3Severity", "HIGH") ; "trimmed")]
#[test_case("cpeName=cpe:2.3:o:linux:*", ExtraArg::pair("cpeName", "cpe:2.3:o:linux:*") ; "cpe value")]
fn test_extra_arg_parse(input: &str, expected: ExtraArg) {
    assert_eq!(input.parse::<ExtraArg>().unwrap(), expected);
}

#[test_case("a b" ; "space")]
#[test_case("a&b=c" ; "ampersand")]
#[test_case("=value" ; "empty key")]
#[test_case("" ; "empty")]
fn test_extra_arg_rejected(input: &str) {
    assert!(input.parse::<ExtraArg>().is_err());
}

#[test]
fn test_extra_arg_display() {
    assert_eq!(ExtraArg::pair("a", "b").to_string(), "a=b");
    assert_eq!(ExtraArg::flag("hasKev").to_string(), "hasKev");
}

// ============================================================================
// Backoff Tests
// ============================================================================

#[test_case(BackoffType::Constant, 0, 2 ; "constant first")]
#[test_case(BackoffType::Constant, 5, 2 ; "constant later")]
#[test_case(BackoffType::Linear, 0, 2 ; "linear first")]
#[test_case(BackoffType::Linear, 2, 6 ; "linear third")]
#[test_case(BackoffType::Exponential, 3, 16 ; "exponential fourth")]
#[test_case(BackoffType::Exponential, 10, 60 ; "exponential capped")]
fn test_calculate_backoff(backoff_type: BackoffType, attempt: u32, expected_secs: u64) {
    let delay = calculate_backoff(
        backoff_type,
        Duration::from_secs(2),
        Duration::from_secs(60),
        attempt,
    );
    assert_eq!(delay, Duration::from_secs(expected_secs));
}

// ============================================================================
// Page Source Tests
// ============================================================================

#[test]
fn test_page_url_query_order() {
    let config = source_config("http://localhost:9999").with_extra_args(vec![
        ExtraArg::pair("keywordSearch", "kernel"),
        ExtraArg::flag("noRejected"),
    ]);
    let source = HttpPageSource::new(config).unwrap();
    let url = source.page_url(&window(), 4000);

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    let keys: Vec<&str> = pairs.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(
        keys,
        vec![
            "keywordSearch",
            "noRejected",
            "pubStartDate",
            "pubEndDate",
            "resultsPerPage",
            "startIndex"
        ]
    );
    assert_eq!(pairs[2].1, "2021-02-01T00:00:00");
    assert_eq!(pairs[3].1, "2021-02-28T23:59:59");
    assert_eq!(pairs[5].1, "4000");
}

#[tokio::test]
async fn test_fetch_sends_window_params() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/json/cves/2.0"))
        .and(query_param("pubStartDate", "2021-02-01T00:00:00"))
        .and(query_param("pubEndDate", "2021-02-28T23:59:59"))
        .and(query_param("resultsPerPage", "2000"))
        .and(query_param("startIndex", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "totalResults": 0,
            "vulnerabilities": []
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let source = HttpPageSource::new(source_config(&mock_server.uri())).unwrap();
    let response = source.fetch(&window(), 0).await.unwrap();

    assert_eq!(response.status, 200);
    assert!(response.body.contains("totalResults"));
    assert_eq!(source.paginator().page_size, 2000);
}

#[tokio::test]
async fn test_fetch_sends_api_key_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(header("apiKey", "secret123"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = source_config(&mock_server.uri()).with_api_key(Some("secret123".to_string()));
    let source = HttpPageSource::new(config).unwrap();

    assert_eq!(source.fetch(&window(), 0).await.unwrap().status, 200);
}

#[tokio::test]
async fn test_fetch_without_key_omits_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .mount(&mock_server)
        .await;

    let source = HttpPageSource::new(source_config(&mock_server.uri())).unwrap();
    source.fetch(&window(), 0).await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("apiKey").is_none());
}

#[tokio::test]
async fn test_fetch_reports_error_statuses() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("startIndex", "0"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("startIndex", "2000"))
        .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
        .mount(&mock_server)
        .await;

    let source = HttpPageSource::new(source_config(&mock_server.uri())).unwrap();

    assert_eq!(source.fetch(&window(), 0).await.unwrap().status, 403);
    let response = source.fetch(&window(), 2000).await.unwrap();
    assert_eq!(response, RawResponse::new(503, "busy"));
}

#[tokio::test]
async fn test_fetch_does_not_follow_redirects() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/json/cves/2.0"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/elsewhere"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/elsewhere"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let source = HttpPageSource::new(source_config(&mock_server.uri())).unwrap();
    assert_eq!(source.fetch(&window(), 0).await.unwrap().status, 302);
}

#[tokio::test]
async fn test_fetch_connection_refused_is_error() {
    let config = source_config("http://127.0.0.1:1").with_timeout(Duration::from_secs(2));
    let source = HttpPageSource::new(config).unwrap();

    let err = source.fetch(&window(), 0).await.unwrap_err();
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_fetch_with_throttle() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(3)
        .mount(&mock_server)
        .await;

    let config = source_config(&mock_server.uri())
        .with_throttle(Some(RateLimiterConfig::per_second(100)));
    let source = HttpPageSource::new(config).unwrap();
    assert!(source.has_rate_limiter());

    for offset in [0, 2000, 4000] {
        assert_eq!(source.fetch(&window(), offset).await.unwrap().status, 200);
    }
}
