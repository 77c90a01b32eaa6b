//! Metrics module
//!
//! Tracks request counters and rolling averages for a scraping session and
//! derives operational alerts from them.

mod recorder;
mod snapshot;

pub use recorder::{MetricsRecorder, RollingWindow, WINDOW_CAPACITY};
pub use snapshot::{Alert, MetricsSnapshot};
