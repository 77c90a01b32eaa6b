//! End-to-end scrape tests
//!
//! These tests use wiremock to serve a small site and run whole batches
//! through the orchestrator, then write the outputs.

use stealth_harvest::config::Config;
use stealth_harvest::crawler::{scrape, Orchestrator, ScrapeSession};
use stealth_harvest::output::{JsonOutput, OutputHandler, SqliteOutput};
use stealth_harvest::HarvestError;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ARTICLE: &str = r#"<html>
<head>
    <title>Integration article</title>
    <meta name="description" content="An article served by the mock server">
    <script type="application/ld+json">{"@type": "Article"}</script>
</head>
<body>
    <h1>Integration article</h1>
    <p>The first paragraph has enough words to count as content.</p>
    <p>The second paragraph adds more words so the page scores well.</p>
    <a href="/next">Next article</a>
    <img src="/hero.png" alt="Hero">
</body>
</html>"#;

/// Creates a config tuned for fast tests: short pacing, two quick attempts
fn create_test_config(respect_robots: bool) -> Config {
    let mut config = Config::default();
    config.session.request_timeout = 5;
    config.session.respect_robots = respect_robots;
    config.retry.max_attempts = 2;
    config.retry.base_delay = 0.0;
    config.rate_limit.base_delay = 0.01;
    config.rate_limit.min_delay = 0.0;
    config.rate_limit.max_delay = 0.1;
    config.user_agent.agents = vec!["TestBot/1.0".to_string()];
    config
}

async fn mount_page(server: &MockServer, page_path: &str, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(status)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_batch_with_failure_and_skip() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /private"))
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/one", 200, ARTICLE).await;
    mount_page(&mock_server, "/two", 500, "oops").await;
    mount_page(&mock_server, "/three", 200, ARTICLE).await;
    mount_page(&mock_server, "/private/page", 200, ARTICLE).await;

    let urls: Vec<String> = ["/one", "/two", "/three", "/private/page"]
        .iter()
        .map(|p| format!("{}{}", base_url, p))
        .collect();

    let config = create_test_config(true);
    let report = scrape(&config, &urls).await.expect("Scrape failed");

    assert_eq!(report.total_urls, 4);
    assert_eq!(report.pages.len(), 2);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.skipped, vec![format!("{}/private/page", base_url)]);
    assert!(report.errors[0].url.ends_with("/two"));
    assert!(report.errors[0].reason.contains("500"));

    let page = &report.pages[0];
    assert_eq!(page.content.title, "Integration article");
    assert_eq!(page.content.meta_description, "An article served by the mock server");
    assert_eq!(page.content.headings.len(), 1);
    assert_eq!(page.content.links.len(), 1);
    assert_eq!(page.content.images.len(), 1);
    assert_eq!(page.content.structured_data.len(), 1);
    assert!(page.validation.is_valid);
    assert_eq!(report.pages[0].content.content_hash, report.pages[1].content.content_hash);

    // Skipped URLs are not counted as requests
    assert_eq!(report.metrics.total_requests, 3);
    assert_eq!(report.metrics.successful_requests, 2);
    assert!(report.metrics.alerts.is_empty());

    // Both attempts for /two reached the server
    let requests = mock_server.received_requests().await.unwrap_or_default();
    let two_hits = requests.iter().filter(|r| r.url.path() == "/two").count();
    assert_eq!(two_hits, 2);
    assert!(!requests.iter().any(|r| r.url.path() == "/private/page"));

    // Outputs
    let dir = TempDir::new().unwrap();
    let json_path = dir.path().join("results.json");
    JsonOutput::new(&json_path).write_report(&report).unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(json["metadata"]["total_items"], 2);
    assert_eq!(json["data"].as_array().unwrap().len(), 2);

    let sqlite = SqliteOutput::new(&dir.path().join("results.db")).unwrap();
    sqlite.write_report(&report).unwrap();
    assert_eq!(sqlite.count_runs().unwrap(), 1);
}

#[tokio::test]
async fn test_robots_ignored_by_default() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /"))
        .expect(0)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/page", 200, ARTICLE).await;

    let config = create_test_config(false);
    let report = scrape(&config, &[format!("{}/page", mock_server.uri())])
        .await
        .expect("Scrape failed");

    assert_eq!(report.pages.len(), 1);
    assert!(report.skipped.is_empty());
}

#[tokio::test]
async fn test_empty_body_is_recorded_as_failure() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/empty", 200, "").await;

    let config = create_test_config(false);
    let orchestrator = Orchestrator::from_config(&config).expect("Failed to build orchestrator");
    let mut session = ScrapeSession::from_config(&config);

    let report = orchestrator
        .run(&mut session, &[format!("{}/empty", mock_server.uri())])
        .await;

    assert!(report.pages.is_empty());
    assert_eq!(report.errors.len(), 1);
    assert_eq!(session.metrics.total_requests(), 1);
    assert_eq!(session.metrics.success_rate(), 0.0);
}

#[tokio::test]
async fn test_empty_url_list_is_an_error() {
    let config = create_test_config(false);
    let result = scrape(&config, &[]).await;
    assert!(matches!(result, Err(HarvestError::NoUrls)));
}
