//! Stealth-Harvest: an adaptive, self-pacing content harvester
//!
//! This crate fetches pages from a list of URLs under hostile network
//! conditions. It tracks proxy health, adapts its request pacing, retries
//! failed fetches with backoff, scores extracted content for quality and
//! derives operational alerts from rolling metrics.

pub mod config;
pub mod crawler;
pub mod metrics;
pub mod output;
pub mod page;
pub mod proxy;
pub mod quality;
pub mod robots;
pub mod state;

use thiserror::Error;

/// Main error type for Stealth-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Document for {url} could not be parsed")]
    Parse { url: String },

    #[error("URL rejected by policy gate: {url}")]
    PolicyRejection { url: String },

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::PageState,
        to: state::PageState,
    },

    #[error("No URLs to scrape")]
    NoUrls,
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Failures of a single fetch attempt
///
/// Every variant is treated as retryable by the retry executor.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Render service failed for {url}: {message}")]
    Render { url: String, message: String },

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(reqwest::Error),
}

impl TransportError {
    /// Classifies a reqwest error raised while fetching `url`
    pub fn from_reqwest(url: &str, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            TransportError::Timeout {
                url: url.to_string(),
            }
        } else {
            TransportError::Http {
                url: url.to_string(),
                source: error,
            }
        }
    }
}

/// Result type alias for a single transport attempt
pub type TransportResult<T> = std::result::Result<T, TransportError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Orchestrator, ScrapeSession, UrlOutcome};
pub use metrics::{Alert, MetricsRecorder, MetricsSnapshot};
pub use page::{ErrorRecord, ExtractedPage, PageContent};
pub use proxy::ProxyPool;
pub use quality::{validate, ValidationResult};
pub use state::PageState;
