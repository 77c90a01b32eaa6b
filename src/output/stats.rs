//! Console summary of a finished batch

use crate::output::traits::ScrapeReport;
use std::fmt::Write;

/// Maximum number of error lines shown in the console summary
const MAX_ERRORS_SHOWN: usize = 10;

/// Formats a report as the human-readable summary printed after a batch
pub fn format_report(report: &ScrapeReport) -> String {
    let metrics = &report.metrics;
    let mut out = String::new();

    let _ = writeln!(out, "=== Scrape Report ===\n");

    let _ = writeln!(out, "Overview:");
    let _ = writeln!(out, "  URLs in batch: {}", report.total_urls);
    let _ = writeln!(
        out,
        "  Pages recorded: {} ({} valid)",
        report.pages.len(),
        report.valid_pages()
    );
    let _ = writeln!(out, "  Failed: {}", report.errors.len());
    let _ = writeln!(out, "  Skipped: {}", report.skipped.len());
    if report.unprocessed() > 0 {
        let _ = writeln!(out, "  Not started: {}", report.unprocessed());
    }
    let _ = writeln!(out, "  Duration: {:.1}s", report.duration_seconds());
    let _ = writeln!(out);

    let _ = writeln!(out, "Performance:");
    let _ = writeln!(
        out,
        "  Success rate: {:.1}% ({} / {} requests)",
        metrics.success_rate * 100.0,
        metrics.successful_requests,
        metrics.total_requests
    );
    let _ = writeln!(
        out,
        "  Average response time: {:.2}s",
        metrics.average_response_time
    );
    let _ = writeln!(
        out,
        "  Average quality score: {:.1}",
        metrics.average_quality_score
    );
    let _ = writeln!(out);

    if !metrics.alerts.is_empty() {
        let _ = writeln!(out, "Alerts:");
        for alert in &metrics.alerts {
            let _ = writeln!(out, "  ! {}", alert);
        }
        let _ = writeln!(out);
    }

    if !report.errors.is_empty() {
        let _ = writeln!(out, "Errors ({}):", report.errors.len());
        for error in report.errors.iter().take(MAX_ERRORS_SHOWN) {
            let _ = writeln!(out, "  - {}: {}", error.url, error.reason);
        }
        if report.errors.len() > MAX_ERRORS_SHOWN {
            let _ = writeln!(
                out,
                "  ... and {} more",
                report.errors.len() - MAX_ERRORS_SHOWN
            );
        }
    }

    out
}

/// Prints the report summary to stdout
pub fn print_report(report: &ScrapeReport) {
    print!("{}", format_report(report));
}
