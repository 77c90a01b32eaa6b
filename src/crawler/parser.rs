//! HTML parsing and content extraction
//!
//! Parsing turns a response body into a document and only fails when there
//! is nothing to parse. Extraction is best effort: anything missing becomes
//! an empty string or an empty list.

use crate::page::{Heading, Image, Link, PageContent};
use scraper::{ElementRef, Html, Selector};
use sha2::{Digest, Sha256};

/// Paragraphs with this many characters or fewer are dropped
const MIN_PARAGRAPH_CHARS: usize = 10;

/// Parses a response body into a document
///
/// # Returns
///
/// * `Some(Html)` - The parsed document
/// * `None` - The body is empty or whitespace only
pub fn parse_document(body: &str) -> Option<Html> {
    if body.trim().is_empty() {
        return None;
    }
    Some(Html::parse_document(body))
}

/// Extracts structured content from a parsed document
///
/// # Extraction Rules
///
/// | Field | Source |
/// |-------|--------|
/// | title | first `<title>`, trimmed |
/// | meta_description | `<meta name="description" content>` |
/// | headings | `<h1>`..`<h6>`, grouped by level |
/// | paragraphs | `<p>` text longer than 10 characters |
/// | links | `<a href>` with non-empty href and text |
/// | images | `<img src>` with non-empty src |
/// | structured_data | `<script type="application/ld+json">` bodies that parse as JSON |
///
/// # Example
///
/// ```
/// use stealth_harvest::crawler::{extract_page, parse_document};
///
/// let html = r#"<html><head><title>Test</title></head><body><p>Some paragraph text.</p></body></html>"#;
/// let document = parse_document(html).unwrap();
/// let page = extract_page(&document, "https://example.com/");
/// assert_eq!(page.title, "Test");
/// assert_eq!(page.paragraphs.len(), 1);
/// ```
pub fn extract_page(document: &Html, url: &str) -> PageContent {
    let paragraphs = extract_paragraphs(document);
    let content_hash = content_hash(&paragraphs);

    PageContent {
        url: url.to_string(),
        title: extract_title(document),
        meta_description: extract_meta_description(document),
        headings: extract_headings(document),
        paragraphs,
        links: extract_links(document),
        images: extract_images(document),
        structured_data: extract_structured_data(document),
        content_hash,
    }
}

/// SHA-256 hex digest of the paragraphs joined by a single space
pub fn content_hash(paragraphs: &[String]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(paragraphs.join(" ").as_bytes());
    hex::encode(hasher.finalize())
}

fn selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(selector) => Some(selector),
        Err(_) => {
            tracing::error!("Invalid selector: {}", css);
            None
        }
    }
}

fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn extract_title(document: &Html) -> String {
    let Some(title_selector) = selector("title") else {
        return String::new();
    };

    document
        .select(&title_selector)
        .next()
        .map(|element| element_text(&element))
        .unwrap_or_default()
}

fn extract_meta_description(document: &Html) -> String {
    let Some(meta_selector) = selector(r#"meta[name="description"]"#) else {
        return String::new();
    };

    document
        .select(&meta_selector)
        .next()
        .and_then(|element| element.value().attr("content"))
        .map(|content| content.trim().to_string())
        .unwrap_or_default()
}

fn extract_headings(document: &Html) -> Vec<Heading> {
    let mut headings = Vec::new();

    for level in 1..=6u8 {
        let Some(heading_selector) = selector(&format!("h{}", level)) else {
            continue;
        };
        for element in document.select(&heading_selector) {
            headings.push(Heading {
                level,
                text: element_text(&element),
            });
        }
    }

    headings
}

fn extract_paragraphs(document: &Html) -> Vec<String> {
    let Some(p_selector) = selector("p") else {
        return Vec::new();
    };

    document
        .select(&p_selector)
        .map(|element| element_text(&element))
        .filter(|text| text.chars().count() > MIN_PARAGRAPH_CHARS)
        .collect()
}

fn extract_links(document: &Html) -> Vec<Link> {
    let Some(a_selector) = selector("a[href]") else {
        return Vec::new();
    };

    document
        .select(&a_selector)
        .filter_map(|element| {
            let href = element.value().attr("href")?.trim();
            let text = element_text(&element);
            if href.is_empty() || text.is_empty() {
                return None;
            }
            Some(Link {
                url: href.to_string(),
                text,
            })
        })
        .collect()
}

fn extract_images(document: &Html) -> Vec<Image> {
    let Some(img_selector) = selector("img") else {
        return Vec::new();
    };

    document
        .select(&img_selector)
        .filter_map(|element| {
            let src = element.value().attr("src").unwrap_or("").trim();
            if src.is_empty() {
                return None;
            }
            Some(Image {
                src: src.to_string(),
                alt: element.value().attr("alt").unwrap_or("").trim().to_string(),
            })
        })
        .collect()
}

fn extract_structured_data(document: &Html) -> Vec<serde_json::Value> {
    let Some(script_selector) = selector(r#"script[type="application/ld+json"]"#) else {
        return Vec::new();
    };

    document
        .select(&script_selector)
        .filter_map(|element| {
            let raw = element.text().collect::<String>();
            match serde_json::from_str(&raw) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::debug!("Skipping invalid JSON-LD block: {}", e);
                    None
                }
            }
        })
        .collect()
}
