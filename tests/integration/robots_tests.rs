//! Robots.txt gate tests against a wiremock server

use stealth_harvest::robots::{PolicyGate, RobotsGate};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_robots_gate_respects_disallow() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Fetched once and cached for the rest of the session
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /admin"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let gate = RobotsGate::new("TestBot").expect("Failed to build gate");

    assert!(gate.allows(&format!("{}/", base_url)).await);
    assert!(gate.allows(&format!("{}/articles/1", base_url)).await);
    assert!(!gate.allows(&format!("{}/admin", base_url)).await);
    assert!(!gate.allows(&format!("{}/admin/users", base_url)).await);
    assert_eq!(gate.cached_origins().await, 1);
}

#[tokio::test]
async fn test_missing_robots_allows_everything() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let gate = RobotsGate::new("TestBot").expect("Failed to build gate");
    assert!(gate.allows(&format!("{}/admin", mock_server.uri())).await);
}

#[tokio::test]
async fn test_unreachable_robots_allows_everything() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    drop(mock_server);

    let gate = RobotsGate::new("TestBot").expect("Failed to build gate");
    assert!(gate.allows(&format!("{}/anything", base_url)).await);
}
