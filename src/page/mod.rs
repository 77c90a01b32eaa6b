//! Page data produced by the scraping pipeline
//!
//! `PageContent` is what extraction pulls out of a parsed document.
//! `ExtractedPage` pairs it with the quality verdict and is the only form a
//! page leaves the pipeline in. `ErrorRecord` describes a URL that failed.

use crate::quality::ValidationResult;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A heading (`<h1>`..`<h6>`) found on a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heading {
    pub level: u8,
    pub text: String,
}

/// An anchor with both an href and visible text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    /// The href exactly as written in the document (trimmed)
    pub url: String,
    pub text: String,
}

/// An image reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Image {
    pub src: String,
    pub alt: String,
}

/// Structured content pulled out of a single document
///
/// Missing fields are empty strings or empty lists, never absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PageContent {
    pub url: String,
    pub title: String,
    pub meta_description: String,
    pub headings: Vec<Heading>,
    pub paragraphs: Vec<String>,
    pub links: Vec<Link>,
    pub images: Vec<Image>,
    /// Parsed JSON-LD blocks
    pub structured_data: Vec<serde_json::Value>,
    /// SHA-256 hex digest of the paragraphs joined by a space
    pub content_hash: String,
}

/// A successfully scraped page together with its quality verdict
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedPage {
    #[serde(flatten)]
    pub content: PageContent,
    pub validation: ValidationResult,
}

impl ExtractedPage {
    pub fn url(&self) -> &str {
        &self.content.url
    }

    pub fn quality_score(&self) -> u32 {
        self.validation.quality_score
    }
}

/// A URL that ended in failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorRecord {
    pub url: String,
    pub reason: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorRecord {
    /// Creates a record stamped with the current time
    pub fn new(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            reason: reason.into(),
            timestamp: Utc::now(),
        }
    }
}
