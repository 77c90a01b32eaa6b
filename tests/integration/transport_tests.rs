//! Transport tests against a wiremock server

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use std::time::Duration;
use stealth_harvest::crawler::{FetchRequest, HeaderProfile, HttpTransport, RenderTransport, Transport};
use stealth_harvest::TransportError;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn request(url: String, headers: HeaderMap) -> FetchRequest {
    FetchRequest {
        url,
        headers,
        proxy: None,
        timeout: Duration::from_secs(5),
    }
}

#[tokio::test]
async fn test_http_transport_fetches_body_with_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/article"))
        .and(header("user-agent", "TestAgent/1.0"))
        .and(header("sec-fetch-mode", "navigate"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><title>Hello</title></html>")
                .insert_header("content-type", "text/html"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut headers = HeaderProfile::default().build();
    headers.insert(USER_AGENT, HeaderValue::from_static("TestAgent/1.0"));

    let transport = HttpTransport::new(&[]).expect("Failed to build transport");
    let response = transport
        .fetch(request(format!("{}/article", mock_server.uri()), headers))
        .await
        .expect("Fetch failed");

    assert_eq!(response.body, "<html><title>Hello</title></html>");
    assert!(response.elapsed < Duration::from_secs(5));
}

#[tokio::test]
async fn test_http_transport_rejects_error_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/limited"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&mock_server)
        .await;

    let transport = HttpTransport::new(&[]).expect("Failed to build transport");
    let result = transport
        .fetch(request(format!("{}/limited", mock_server.uri()), HeaderMap::new()))
        .await;

    match result {
        Err(TransportError::Status { status, url }) => {
            assert_eq!(status, 429);
            assert!(url.ends_with("/limited"));
        }
        other => panic!("Expected a status error, got {:?}", other.map(|r| r.body)),
    }
}

#[tokio::test]
async fn test_http_transport_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&mock_server)
        .await;

    let transport = HttpTransport::new(&[]).expect("Failed to build transport");
    let mut slow = request(format!("{}/slow", mock_server.uri()), HeaderMap::new());
    slow.timeout = Duration::from_millis(200);

    let result = transport.fetch(slow).await;
    assert!(matches!(result, Err(TransportError::Timeout { .. })));
}

#[tokio::test]
async fn test_render_transport_calls_render_service() {
    let mock_server = MockServer::start().await;
    let target = "https://example.com/spa";

    Mock::given(method("GET"))
        .and(path("/render"))
        .and(query_param("url", target))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><p>Rendered</p></html>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let endpoint = url::Url::parse(&format!("{}/render", mock_server.uri())).unwrap();
    let transport = RenderTransport::new(endpoint).expect("Failed to build transport");
    let response = transport
        .fetch(request(target.to_string(), HeaderMap::new()))
        .await
        .expect("Render failed");

    assert_eq!(response.body, "<html><p>Rendered</p></html>");
    assert_eq!(transport.name(), "browser");
}

#[tokio::test]
async fn test_render_service_failure_is_render_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/render"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&mock_server)
        .await;

    let endpoint = url::Url::parse(&format!("{}/render", mock_server.uri())).unwrap();
    let transport = RenderTransport::new(endpoint).expect("Failed to build transport");
    let result = transport
        .fetch(request("https://example.com/".to_string(), HeaderMap::new()))
        .await;

    assert!(matches!(result, Err(TransportError::Render { .. })));
}
