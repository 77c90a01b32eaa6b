/// Per-URL state definitions for the scraping pipeline
///
/// Every URL starts in `Start` and moves forward through the pipeline until
/// it reaches one of the terminal states.
use crate::HarvestError;
use serde::Serialize;
use std::fmt;

/// Represents the current state of a URL in the scraping pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageState {
    // ===== Active States =====
    /// URL has been taken from the batch but nothing has happened yet
    Start,

    /// Transport call (with retries) is in flight
    Fetching,

    /// Response body is being turned into a document
    Parsing,

    /// Structured data is being pulled out of the document
    Extracting,

    /// Extracted content is being scored
    Validating,

    // ===== Terminal States =====
    /// Page was extracted, scored and recorded
    Recorded,

    /// Fetch or parse failed; a failure was recorded
    Failed,

    /// Policy gate denied the URL; nothing was recorded
    Skipped,
}

impl PageState {
    /// Returns true if this is a terminal state (no further processing needed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Recorded | Self::Failed | Self::Skipped)
    }

    /// Returns true if this is an active state (URL is still in the pipeline)
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    /// Returns true if this represents a successful completion
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Recorded)
    }

    /// Checks whether the pipeline allows moving from `self` to `next`
    ///
    /// `Failed` is reachable from `Fetching` (retries exhausted) and from
    /// `Parsing` (no document). `Skipped` is only reachable from `Start`.
    pub fn can_transition_to(&self, next: PageState) -> bool {
        matches!(
            (self, next),
            (Self::Start, Self::Fetching)
                | (Self::Start, Self::Skipped)
                | (Self::Fetching, Self::Parsing)
                | (Self::Fetching, Self::Failed)
                | (Self::Parsing, Self::Extracting)
                | (Self::Parsing, Self::Failed)
                | (Self::Extracting, Self::Validating)
                | (Self::Validating, Self::Recorded)
        )
    }

    /// Moves to `next`, rejecting transitions the pipeline does not allow
    pub fn advance(self, next: PageState) -> Result<PageState, HarvestError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(HarvestError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    /// Returns the stable string form used in logs and exports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Fetching => "fetching",
            Self::Parsing => "parsing",
            Self::Extracting => "extracting",
            Self::Validating => "validating",
            Self::Recorded => "recorded",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        }
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
