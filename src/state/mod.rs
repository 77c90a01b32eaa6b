//! State module for tracking a URL's progress through the pipeline
//!
//! # Components
//!
//! - `PageState`: start, fetching, parsing, extracting, validating and the
//!   three terminal outcomes (recorded, failed, skipped)

mod page_state;

pub use page_state::PageState;
