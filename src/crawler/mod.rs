//! Crawler module for fetching and processing pages
//!
//! This module contains the core scraping logic, including:
//! - Transports with per-proxy HTTP clients
//! - Browser-like headers with user-agent rotation
//! - Adaptive pacing and bounded retry
//! - HTML parsing and content extraction
//! - The per-URL state machine and batch loop

mod fetcher;
mod headers;
mod orchestrator;
mod parser;
mod rate;
mod retry;

pub use fetcher::{
    build_http_client, build_transport, FetchRequest, FetchResponse, HttpTransport,
    RenderTransport, Transport,
};
pub use headers::HeaderProfile;
pub use orchestrator::{Orchestrator, ScrapeSession, UrlOutcome};
pub use parser::{content_hash, extract_page, parse_document};
pub use rate::RateController;
pub use retry::{RetryExecutor, RetryPolicy};

use crate::config::Config;
use crate::output::ScrapeReport;
use crate::HarvestError;

/// Runs a complete scrape of `urls` with a fresh session
///
/// This is the main entry point for a batch. It will:
/// 1. Build the transport and policy gate named in the config
/// 2. Create a session with fresh proxy, pacing, retry and metrics state
/// 3. Drive every URL through the state machine
///
/// # Arguments
///
/// * `config` - The harvester configuration
/// * `urls` - URLs to scrape, in order
///
/// # Returns
///
/// * `Ok(ScrapeReport)` - The batch ran; individual URLs may still have failed
/// * `Err(HarvestError)` - No URLs, or the transport could not be built
pub async fn scrape(config: &Config, urls: &[String]) -> Result<ScrapeReport, HarvestError> {
    if urls.is_empty() {
        return Err(HarvestError::NoUrls);
    }

    let orchestrator = Orchestrator::from_config(config)?;
    let mut session = ScrapeSession::from_config(config);
    Ok(orchestrator.run(&mut session, urls).await)
}
