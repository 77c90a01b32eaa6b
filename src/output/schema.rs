//! SQLite schema for exported reports

/// SQL schema for the export database
pub const SCHEMA_SQL: &str = r#"
-- One row per finished batch
CREATE TABLE IF NOT EXISTS runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    started_at TEXT NOT NULL,
    finished_at TEXT NOT NULL,
    total_urls INTEGER NOT NULL,
    skipped_urls INTEGER NOT NULL,
    total_requests INTEGER NOT NULL,
    successful_requests INTEGER NOT NULL,
    failed_requests INTEGER NOT NULL,
    success_rate REAL NOT NULL,
    average_response_time REAL NOT NULL,
    average_quality_score REAL NOT NULL,
    alerts TEXT NOT NULL
);

-- Recorded pages
CREATE TABLE IF NOT EXISTS pages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    run_id INTEGER NOT NULL REFERENCES runs(id),
    url TEXT NOT NULL,
    title TEXT NOT NULL,
    meta_description TEXT NOT NULL,
    content_hash TEXT NOT NULL,
    quality_score INTEGER NOT NULL,
    is_valid INTEGER NOT NULL,
    content_length INTEGER NOT NULL,
    paragraph_count INTEGER NOT NULL,
    link_count INTEGER NOT NULL,
    image_count INTEGER NOT NULL,
    content_json TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_pages_run ON pages(run_id);
CREATE INDEX IF NOT EXISTS idx_pages_url ON pages(url);
CREATE INDEX IF NOT EXISTS idx_pages_hash ON pages(content_hash);

-- Quality issues per page
CREATE TABLE IF NOT EXISTS page_issues (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    page_id INTEGER NOT NULL REFERENCES pages(id),
    issue TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_page_issues_page ON page_issues(page_id);

-- Failed URLs
CREATE TABLE IF NOT EXISTS scrape_errors (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    run_id INTEGER NOT NULL REFERENCES runs(id),
    url TEXT NOT NULL,
    reason TEXT NOT NULL,
    occurred_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_scrape_errors_run ON scrape_errors(run_id);
"#;

/// Initializes the export schema
///
/// Safe to call on a database that already has it.
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
