//! Output handler traits and types
//!
//! This module defines the trait interface for output handlers and the
//! report they persist.

use crate::metrics::MetricsSnapshot;
use crate::page::{ErrorRecord, ExtractedPage};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Everything a finished batch produced
#[derive(Debug, Clone)]
pub struct ScrapeReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// Number of URLs the batch was given
    pub total_urls: usize,

    /// Pages that reached `Recorded`, in processing order
    pub pages: Vec<ExtractedPage>,

    /// One record per failed URL
    pub errors: Vec<ErrorRecord>,

    /// URLs denied by the policy gate
    pub skipped: Vec<String>,

    /// Metrics as they stood when the batch ended
    pub metrics: MetricsSnapshot,
}

impl ScrapeReport {
    /// Number of URLs that reached a terminal state
    pub fn processed(&self) -> usize {
        self.pages.len() + self.errors.len() + self.skipped.len()
    }

    /// URLs never started because the batch was stopped early
    pub fn unprocessed(&self) -> usize {
        self.total_urls.saturating_sub(self.processed())
    }

    pub fn duration_seconds(&self) -> f64 {
        (self.finished_at - self.started_at).num_milliseconds() as f64 / 1000.0
    }

    /// Pages whose quality verdict is valid
    pub fn valid_pages(&self) -> usize {
        self.pages.iter().filter(|p| p.validation.is_valid).count()
    }
}

/// Trait for output handlers
///
/// Handlers persist a finished report. Each call writes the whole report.
pub trait OutputHandler {
    /// Writes `report` to the handler's destination
    ///
    /// # Arguments
    ///
    /// * `report` - The finished batch report
    fn write_report(&self, report: &ScrapeReport) -> OutputResult<()>;

    /// Short name used in logs
    fn name(&self) -> &'static str;
}
