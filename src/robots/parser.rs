//! Robots.txt rules backed by the robotstxt crate

use robotstxt::DefaultMatcher;

/// Rules from one origin's robots.txt
#[derive(Debug, Clone)]
pub struct RobotsRules {
    /// Raw robots.txt body
    content: String,
    /// Set when the file could not be fetched
    allow_all: bool,
}

impl RobotsRules {
    /// Wraps the raw body of a robots.txt file
    pub fn from_content(content: &str) -> Self {
        Self {
            content: content.to_string(),
            allow_all: false,
        }
    }

    /// Rules that allow every URL
    ///
    /// Used whenever robots.txt is missing or unreachable.
    pub fn allow_all() -> Self {
        Self {
            content: String::new(),
            allow_all: true,
        }
    }

    pub fn is_allow_all(&self) -> bool {
        self.allow_all
    }

    /// Checks whether `user_agent` may fetch `url`
    ///
    /// # Arguments
    ///
    /// * `url` - Absolute URL or path to check
    /// * `user_agent` - Agent the rules are evaluated for
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        if self.allow_all || self.content.trim().is_empty() {
            return true;
        }

        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&self.content, user_agent, url)
    }
}
