//! Content quality module
//!
//! Scores extracted pages so that thin pages and block/challenge pages can be
//! told apart from real content. Low quality is a property of the data, never
//! an error.

mod validator;

pub use validator::{validate, QualityIssue, ValidationResult, SUSPICIOUS_KEYWORDS, VALID_THRESHOLD};
