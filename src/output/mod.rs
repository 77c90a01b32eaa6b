//! Output module for persisting and summarizing scrape reports
//!
//! This module handles:
//! - Writing the JSON results file
//! - Exporting reports to SQLite
//! - Printing the console summary

mod json;
mod schema;
mod sqlite_output;
pub mod stats;
mod traits;

pub use json::JsonOutput;
pub use sqlite_output::SqliteOutput;
pub use stats::{format_report, print_report};
pub use traits::{OutputError, OutputHandler, OutputResult, ScrapeReport};

use crate::config::OutputConfig;
use std::path::Path;

/// Builds the handlers enabled in the output configuration
///
/// JSON output is always enabled; SQLite only when `database-path` is set.
pub fn build_handlers(config: &OutputConfig) -> OutputResult<Vec<Box<dyn OutputHandler>>> {
    let mut handlers: Vec<Box<dyn OutputHandler>> = vec![Box::new(JsonOutput::new(&config.json_path))];

    if let Some(database_path) = &config.database_path {
        handlers.push(Box::new(SqliteOutput::new(Path::new(database_path))?));
    }

    Ok(handlers)
}
