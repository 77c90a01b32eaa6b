use serde::Deserialize;

/// Main configuration structure for Stealth-Harvest
///
/// Every section has defaults, so an empty file is a valid configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub session: SessionConfig,
    pub retry: RetryConfig,
    #[serde(rename = "rate-limit")]
    pub rate_limit: RateLimitConfig,
    pub proxies: ProxyConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Which transport fetches pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Plain HTTP requests
    #[default]
    Http,

    /// Pages rendered by an external headless-browser service
    Browser,
}

/// Session inputs and transport selection
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SessionConfig {
    /// URLs to scrape, in order
    pub urls: Vec<String>,

    pub transport: TransportKind,

    /// Render service endpoint, required for the browser transport
    pub render_endpoint: Option<String>,

    /// Per-request timeout (seconds)
    pub request_timeout: u64,

    /// Consult robots.txt before fetching
    pub respect_robots: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            urls: Vec::new(),
            transport: TransportKind::Http,
            render_endpoint: None,
            request_timeout: 30,
            respect_robots: false,
        }
    }
}

/// Retry behaviour for a single URL
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RetryConfig {
    /// Total attempts per URL, including the first
    pub max_attempts: u32,

    /// Backoff base (seconds)
    pub base_delay: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: 1.0,
        }
    }
}

/// Bounds for the adaptive pacing delay (seconds)
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RateLimitConfig {
    pub base_delay: f64,
    pub min_delay: f64,
    pub max_delay: f64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            base_delay: 1.0,
            min_delay: 0.5,
            max_delay: 10.0,
        }
    }
}

/// Egress proxies
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Proxy URLs; empty means direct connections
    pub addresses: Vec<String>,
}

/// User agents rotated across requests
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    pub agents: Vec<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            agents: vec![
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36".to_string(),
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36".to_string(),
                "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36".to_string(),
            ],
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Path of the JSON results file
    pub json_path: String,

    /// Optional SQLite export
    pub database_path: Option<String>,

    /// Print a summary to stdout when the batch ends
    pub print_report: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            json_path: "results.json".to_string(),
            database_path: None,
            print_report: true,
        }
    }
}
