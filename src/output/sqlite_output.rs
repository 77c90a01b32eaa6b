//! SQLite export of finished reports
//!
//! Each report becomes one row in `runs` plus its pages, their quality
//! issues and the failed URLs, all written in a single transaction.

use crate::output::schema::initialize_schema;
use crate::output::traits::{OutputHandler, OutputResult, ScrapeReport};
use rusqlite::{params, Connection};
use std::path::Path;

/// SQLite-based output handler
pub struct SqliteOutput {
    conn: Connection,
}

impl SqliteOutput {
    /// Opens (or creates) the export database at `path`
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteOutput)` - Database opened and schema in place
    /// * `Err(OutputError)` - Failed to open the database
    pub fn new(path: &Path) -> OutputResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> OutputResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Number of runs stored so far
    pub fn count_runs(&self) -> OutputResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM runs", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

impl OutputHandler for SqliteOutput {
    fn write_report(&self, report: &ScrapeReport) -> OutputResult<()> {
        let tx = self.conn.unchecked_transaction()?;

        let alerts = report
            .metrics
            .alerts
            .iter()
            .map(|a| a.message())
            .collect::<Vec<_>>()
            .join("; ");

        tx.execute(
            "INSERT INTO runs (
                started_at, finished_at, total_urls, skipped_urls,
                total_requests, successful_requests, failed_requests,
                success_rate, average_response_time, average_quality_score, alerts
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                report.started_at.to_rfc3339(),
                report.finished_at.to_rfc3339(),
                report.total_urls as i64,
                report.skipped.len() as i64,
                report.metrics.total_requests as i64,
                report.metrics.successful_requests as i64,
                report.metrics.failed_requests as i64,
                report.metrics.success_rate,
                report.metrics.average_response_time,
                report.metrics.average_quality_score,
                alerts,
            ],
        )?;
        let run_id = tx.last_insert_rowid();

        {
            let mut insert_page = tx.prepare(
                "INSERT INTO pages (
                    run_id, url, title, meta_description, content_hash, quality_score,
                    is_valid, content_length, paragraph_count, link_count, image_count,
                    content_json
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            )?;
            let mut insert_issue =
                tx.prepare("INSERT INTO page_issues (page_id, issue) VALUES (?1, ?2)")?;

            for page in &report.pages {
                let content_json = serde_json::to_string(&page.content)?;
                insert_page.execute(params![
                    run_id,
                    page.content.url,
                    page.content.title,
                    page.content.meta_description,
                    page.content.content_hash,
                    page.validation.quality_score,
                    page.validation.is_valid,
                    page.validation.content_length as i64,
                    page.validation.paragraph_count as i64,
                    page.content.links.len() as i64,
                    page.content.images.len() as i64,
                    content_json,
                ])?;
                let page_id = tx.last_insert_rowid();

                for issue in &page.validation.issues {
                    insert_issue.execute(params![page_id, issue.message()])?;
                }
            }

            let mut insert_error = tx.prepare(
                "INSERT INTO scrape_errors (run_id, url, reason, occurred_at)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for error in &report.errors {
                insert_error.execute(params![
                    run_id,
                    error.url,
                    error.reason,
                    error.timestamp.to_rfc3339()
                ])?;
            }
        }

        tx.commit()?;

        tracing::info!(
            "Stored run {} ({} pages, {} errors)",
            run_id,
            report.pages.len(),
            report.errors.len()
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "sqlite"
    }
}
