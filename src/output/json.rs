//! JSON file output

use crate::metrics::MetricsSnapshot;
use crate::output::traits::{OutputHandler, OutputResult, ScrapeReport};
use crate::page::{ErrorRecord, ExtractedPage};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Serialize)]
struct JsonDocument<'a> {
    metadata: JsonMetadata<'a>,
    data: &'a [ExtractedPage],
}

#[derive(Serialize)]
struct JsonMetadata<'a> {
    scraped_at: DateTime<Utc>,
    total_items: usize,
    total_urls: usize,
    performance_metrics: &'a MetricsSnapshot,
    alerts: Vec<&'static str>,
    errors: &'a [ErrorRecord],
    skipped: &'a [String],
}

impl<'a> From<&'a ScrapeReport> for JsonDocument<'a> {
    fn from(report: &'a ScrapeReport) -> Self {
        Self {
            metadata: JsonMetadata {
                scraped_at: report.finished_at,
                total_items: report.pages.len(),
                total_urls: report.total_urls,
                performance_metrics: &report.metrics,
                alerts: report.metrics.alerts.iter().map(|a| a.message()).collect(),
                errors: &report.errors,
                skipped: &report.skipped,
            },
            data: &report.pages,
        }
    }
}

/// Writes the report as one pretty-printed JSON document
///
/// The file is replaced on every write.
pub struct JsonOutput {
    path: PathBuf,
}

impl JsonOutput {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OutputHandler for JsonOutput {
    fn write_report(&self, report: &ScrapeReport) -> OutputResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = File::create(&self.path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &JsonDocument::from(report))?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        tracing::info!(
            "Wrote {} pages to {}",
            report.pages.len(),
            self.path.display()
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "json"
    }
}
