//! Heuristic content quality scoring
//!
//! Scoring is a pure function of the extracted content. It never fails and
//! never performs I/O.

use crate::page::PageContent;
use serde::Serialize;
use std::fmt;

/// Phrases that suggest the page is a block or challenge page
pub const SUSPICIOUS_KEYWORDS: [&str; 8] = [
    "captcha",
    "robot",
    "blocked",
    "access denied",
    "forbidden",
    "rate limit",
    "too many requests",
    "bot detection",
];

const TITLE_POINTS: i32 = 20;
const RICH_CONTENT_POINTS: i32 = 30;
const SOME_CONTENT_POINTS: i32 = 15;
const LINK_POINTS: i32 = 10;
const BOT_PAGE_PENALTY: i32 = 50;

/// Scores above this are considered valid
pub const VALID_THRESHOLD: u32 = 40;

/// A problem found while scoring a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityIssue {
    MissingTitle,
    NoMeaningfulContent,
    PossibleBotDetection,
}

impl QualityIssue {
    pub fn message(&self) -> &'static str {
        match self {
            Self::MissingTitle => "Missing or short title",
            Self::NoMeaningfulContent => "No meaningful content found",
            Self::PossibleBotDetection => "Possible bot detection page",
        }
    }
}

impl fmt::Display for QualityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Quality verdict for one page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    /// Non-negative heuristic score
    pub quality_score: u32,

    /// `quality_score > 40`
    pub is_valid: bool,

    pub issues: Vec<QualityIssue>,

    /// Total characters across all paragraphs
    pub content_length: usize,

    pub paragraph_count: usize,
}

impl ValidationResult {
    pub fn has_issue(&self, issue: QualityIssue) -> bool {
        self.issues.contains(&issue)
    }
}

/// Scores extracted page content
///
/// | Check | Effect |
/// |-------|--------|
/// | trimmed title longer than 5 chars | +20, else `MissingTitle` |
/// | more than 3 paragraphs and more than 500 chars | +30 |
/// | otherwise at least 1 paragraph and more than 100 chars | +15 |
/// | otherwise | `NoMeaningfulContent` |
/// | at least one link | +10 |
/// | paragraph text contains a suspicious keyword | -50, `PossibleBotDetection` |
///
/// The final score is clamped at zero.
pub fn validate(page: &PageContent) -> ValidationResult {
    let mut score: i32 = 0;
    let mut issues = Vec::new();

    if page.title.trim().chars().count() > 5 {
        score += TITLE_POINTS;
    } else {
        issues.push(QualityIssue::MissingTitle);
    }

    let paragraph_count = page.paragraphs.len();
    let content_length: usize = page.paragraphs.iter().map(|p| p.chars().count()).sum();

    if paragraph_count > 3 && content_length > 500 {
        score += RICH_CONTENT_POINTS;
    } else if paragraph_count > 0 && content_length > 100 {
        score += SOME_CONTENT_POINTS;
    } else {
        issues.push(QualityIssue::NoMeaningfulContent);
    }

    if !page.links.is_empty() {
        score += LINK_POINTS;
    }

    if looks_like_bot_page(&page.paragraphs) {
        score -= BOT_PAGE_PENALTY;
        issues.push(QualityIssue::PossibleBotDetection);
    }

    let quality_score = score.max(0) as u32;

    ValidationResult {
        quality_score,
        is_valid: quality_score > VALID_THRESHOLD,
        issues,
        content_length,
        paragraph_count,
    }
}

/// Case-insensitive substring scan of the joined paragraph text
fn looks_like_bot_page(paragraphs: &[String]) -> bool {
    let text = paragraphs.join(" ").to_lowercase();
    SUSPICIOUS_KEYWORDS
        .iter()
        .any(|keyword| text.contains(keyword))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::Link;

    fn link(url: &str) -> Link {
        Link {
            url: url.to_string(),
            text: "link".to_string(),
        }
    }

    fn rich_page() -> PageContent {
        PageContent {
            url: "https://example.com/".to_string(),
            title: "Hello World".to_string(),
            paragraphs: vec!["a".repeat(150); 4],
            links: vec![link("/one"), link("/two")],
            ..Default::default()
        }
    }

    #[test]
    fn test_rich_page_scores_sixty() {
        let result = validate(&rich_page());
        assert_eq!(result.content_length, 600);
        assert_eq!(result.paragraph_count, 4);
        assert_eq!(result.quality_score, 60);
        assert!(result.is_valid);
        assert!(result.issues.is_empty());
    }

    #[test]
    fn test_captcha_page_is_penalised() {
        let mut page = rich_page();
        page.paragraphs[2] = format!("Please solve the CAPTCHA {}", "a".repeat(125));
        assert_eq!(page.paragraphs[2].chars().count(), 150);

        let result = validate(&page);
        assert_eq!(result.quality_score, 10);
        assert!(!result.is_valid);
        assert!(result.has_issue(QualityIssue::PossibleBotDetection));
    }

    #[test]
    fn test_empty_page_scores_zero() {
        let result = validate(&PageContent::default());
        assert_eq!(result.quality_score, 0);
        assert!(!result.is_valid);
        assert!(result.has_issue(QualityIssue::MissingTitle));
        assert!(result.has_issue(QualityIssue::NoMeaningfulContent));
    }

    #[test]
    fn test_short_title_is_an_issue() {
        let mut page = rich_page();
        page.title = "  Hi   ".to_string();
        let result = validate(&page);
        assert_eq!(result.quality_score, 40);
        assert!(!result.is_valid);
        assert!(result.has_issue(QualityIssue::MissingTitle));
    }

    #[test]
    fn test_some_content_scores_fifteen() {
        let page = PageContent {
            paragraphs: vec!["b".repeat(120)],
            ..Default::default()
        };
        let result = validate(&page);
        assert_eq!(result.quality_score, 15);
        assert!(!result.has_issue(QualityIssue::NoMeaningfulContent));
    }

    #[test]
    fn test_many_short_paragraphs_are_not_rich() {
        let page = PageContent {
            title: "A decent title".to_string(),
            paragraphs: vec!["c".repeat(30); 5],
            ..Default::default()
        };
        let result = validate(&page);
        // 150 chars over five paragraphs only earns the smaller bonus
        assert_eq!(result.quality_score, 35);
    }

    #[test]
    fn test_score_never_negative() {
        let page = PageContent {
            paragraphs: vec!["Access Denied".to_string()],
            ..Default::default()
        };
        let result = validate(&page);
        assert_eq!(result.quality_score, 0);
        assert!(result.has_issue(QualityIssue::PossibleBotDetection));
    }

    #[test]
    fn test_keyword_in_title_is_ignored() {
        let mut page = rich_page();
        page.title = "Robot Wars Fan Page".to_string();
        assert_eq!(validate(&page).quality_score, 60);
    }

    #[test]
    fn test_issue_messages() {
        assert_eq!(
            QualityIssue::PossibleBotDetection.to_string(),
            "Possible bot detection page"
        );
        assert_eq!(QualityIssue::MissingTitle.to_string(), "Missing or short title");
    }
}
