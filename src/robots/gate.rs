//! Policy gates consulted before a URL is fetched

use crate::config::Config;
use crate::crawler::{build_http_client, HeaderProfile};
use crate::robots::{CachedRobots, RobotsRules};
use crate::{HarvestError, TransportError};
use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use url::Url;

/// Timeout for a single robots.txt fetch
const ROBOTS_TIMEOUT: Duration = Duration::from_secs(10);

/// Decides whether a URL may be fetched at all
///
/// A denied URL is skipped, not failed.
#[async_trait]
pub trait PolicyGate: Send + Sync {
    async fn allows(&self, url: &str) -> bool;
}

/// Gate that allows every URL
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

#[async_trait]
impl PolicyGate for AllowAll {
    async fn allows(&self, _url: &str) -> bool {
        true
    }
}

/// Gate that honours each origin's robots.txt
///
/// Rules are fetched once per origin and refreshed after 24 hours. Any
/// failure to obtain them allows the URL.
pub struct RobotsGate {
    client: Client,
    user_agent: String,
    /// Product token matched against `User-agent` lines
    agent_token: String,
    cache: Mutex<HashMap<String, CachedRobots>>,
}

impl RobotsGate {
    pub fn new(user_agent: impl Into<String>) -> Result<Self, TransportError> {
        let client = build_http_client(None).map_err(TransportError::ClientBuild)?;
        let user_agent = user_agent.into();
        Ok(Self {
            client,
            agent_token: product_token(&user_agent),
            user_agent,
            cache: Mutex::new(HashMap::new()),
        })
    }

    /// Number of origins with cached rules
    pub async fn cached_origins(&self) -> usize {
        self.cache.lock().await.len()
    }

    async fn fetch_rules(&self, robots_url: &str) -> RobotsRules {
        let response = self
            .client
            .get(robots_url)
            .header(USER_AGENT, &self.user_agent)
            .timeout(ROBOTS_TIMEOUT)
            .send()
            .await;

        let response = match response {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!("Failed to fetch {}: {}", robots_url, e);
                return RobotsRules::allow_all();
            }
        };

        if !response.status().is_success() {
            tracing::debug!("{} answered {}", robots_url, response.status());
            return RobotsRules::allow_all();
        }

        match response.text().await {
            Ok(body) => RobotsRules::from_content(&body),
            Err(e) => {
                tracing::debug!("Failed to read {}: {}", robots_url, e);
                RobotsRules::allow_all()
            }
        }
    }

    async fn rules_for(&self, origin: &str) -> RobotsRules {
        {
            let cache = self.cache.lock().await;
            if let Some(cached) = cache.get(origin) {
                if !cached.is_stale() {
                    return cached.rules.clone();
                }
            }
        }

        let robots_url = format!("{}/robots.txt", origin);
        tracing::debug!("Fetching {}", robots_url);
        let rules = self.fetch_rules(&robots_url).await;

        self.cache
            .lock()
            .await
            .insert(origin.to_string(), CachedRobots::new(rules.clone()));
        rules
    }
}

#[async_trait]
impl PolicyGate for RobotsGate {
    async fn allows(&self, url: &str) -> bool {
        let Some(origin) = origin_of(url) else {
            tracing::debug!("No origin for {}, allowing", url);
            return true;
        };

        let rules = self.rules_for(&origin).await;
        let allowed = rules.is_allowed(url, &self.agent_token);
        if !allowed {
            tracing::info!("Disallowed by robots.txt: {}", url);
        }
        allowed
    }
}

/// Leading product name of a user agent, e.g. `Mozilla` for `Mozilla/5.0 (...)`
///
/// Robots.txt groups are keyed by this token, not the full header value.
pub fn product_token(user_agent: &str) -> String {
    let token: String = user_agent
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_alphabetic() || *c == '-' || *c == '_')
        .collect();
    if token.is_empty() {
        "*".to_string()
    } else {
        token
    }
}

/// Returns `scheme://host[:port]` for `url`, if it has one
pub fn origin_of(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let origin = parsed.origin();
    if !origin.is_tuple() {
        return None;
    }
    Some(origin.ascii_serialization())
}

/// Builds the gate selected by `session.respect-robots`
pub fn build_gate(config: &Config) -> Result<Box<dyn PolicyGate>, HarvestError> {
    if !config.session.respect_robots {
        return Ok(Box::new(AllowAll));
    }

    Ok(Box::new(RobotsGate::new(robots_agent(config))?))
}

/// The agent robots.txt is fetched and matched as
///
/// Only agents usable as a `User-Agent` header are considered.
fn robots_agent(config: &Config) -> String {
    HeaderProfile::new(&config.user_agent)
        .user_agent()
        .unwrap_or("*")
        .to_string()
}
