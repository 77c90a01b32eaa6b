//! Integration tests against mock HTTP servers

mod robots_tests;
mod scrape_tests;
mod transport_tests;
