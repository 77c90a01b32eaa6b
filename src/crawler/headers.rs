//! Browser-like request headers with user-agent rotation

use crate::config::UserAgentConfig;
use rand::seq::SliceRandom;
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, CACHE_CONTROL,
    CONNECTION, UPGRADE_INSECURE_REQUESTS, USER_AGENT,
};

const STATIC_HEADERS: [(HeaderName, &str); 6] = [
    (
        ACCEPT,
        "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,image/apng,*/*;q=0.8",
    ),
    (ACCEPT_LANGUAGE, "en-US,en;q=0.9"),
    (ACCEPT_ENCODING, "gzip, deflate, br"),
    (CONNECTION, "keep-alive"),
    (UPGRADE_INSECURE_REQUESTS, "1"),
    (CACHE_CONTROL, "max-age=0"),
];

const FETCH_METADATA: [(&str, &str); 3] = [
    ("sec-fetch-dest", "document"),
    ("sec-fetch-mode", "navigate"),
    ("sec-fetch-site", "none"),
];

/// Produces a fresh header set for every attempt
#[derive(Debug, Clone)]
pub struct HeaderProfile {
    agents: Vec<HeaderValue>,
}

impl HeaderProfile {
    /// Builds a profile from the configured agents
    ///
    /// Agents that are not valid header values are dropped with a warning.
    pub fn new(config: &UserAgentConfig) -> Self {
        let agents = config
            .agents
            .iter()
            .filter_map(|agent| match HeaderValue::from_str(agent) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!("Ignoring user agent that is not a valid header: {}", agent);
                    None
                }
            })
            .collect();
        Self { agents }
    }

    /// Returns browser-like headers with a randomly chosen `User-Agent`
    pub fn build(&self) -> HeaderMap {
        let mut headers = HeaderMap::with_capacity(STATIC_HEADERS.len() + FETCH_METADATA.len() + 1);

        if let Some(agent) = self.agents.choose(&mut rand::thread_rng()) {
            headers.insert(USER_AGENT, agent.clone());
        }

        for (name, value) in STATIC_HEADERS {
            headers.insert(name, HeaderValue::from_static(value));
        }
        for (name, value) in FETCH_METADATA {
            headers.insert(
                HeaderName::from_static(name),
                HeaderValue::from_static(value),
            );
        }

        headers
    }

    /// The first usable agent, used for robots.txt fetching and matching
    pub fn user_agent(&self) -> Option<&str> {
        self.agents.first().and_then(|agent| agent.to_str().ok())
    }
}

impl Default for HeaderProfile {
    fn default() -> Self {
        Self::new(&UserAgentConfig::default())
    }
}
