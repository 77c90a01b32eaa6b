use crate::config::types::{
    Config, OutputConfig, ProxyConfig, RateLimitConfig, RetryConfig, SessionConfig,
    TransportKind, UserAgentConfig,
};
use crate::ConfigError;
use reqwest::header::HeaderValue;
use url::Url;

/// Upper bound for any single pacing or backoff delay (one day)
const MAX_DELAY_SECONDS: f64 = 86_400.0;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_session_config(&config.session)?;
    validate_retry_config(&config.retry)?;
    validate_rate_limit_config(&config.rate_limit)?;
    validate_proxy_config(&config.proxies)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the session section
fn validate_session_config(config: &SessionConfig) -> Result<(), ConfigError> {
    for url in &config.urls {
        validate_target_url(url)?;
    }

    if config.request_timeout == 0 {
        return Err(ConfigError::Validation(
            "request_timeout must be at least 1 second".to_string(),
        ));
    }

    match (config.transport, &config.render_endpoint) {
        (TransportKind::Browser, None) => {
            return Err(ConfigError::Validation(
                "render_endpoint is required when transport = \"browser\"".to_string(),
            ));
        }
        (TransportKind::Browser, Some(endpoint)) => {
            Url::parse(endpoint).map_err(|e| {
                ConfigError::InvalidUrl(format!("Invalid render_endpoint '{}': {}", endpoint, e))
            })?;
        }
        (TransportKind::Http, _) => {}
    }

    Ok(())
}

/// Validates a URL to be scraped (config file, CLI or URL list)
pub fn validate_target_url(url: &str) -> Result<(), ConfigError> {
    let parsed = Url::parse(url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid URL '{}': {}", url, e)))?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "URL '{}' must use http or https",
            url
        )));
    }

    Ok(())
}

/// Validates retry configuration
fn validate_retry_config(config: &RetryConfig) -> Result<(), ConfigError> {
    if config.max_attempts < 1 {
        return Err(ConfigError::Validation(format!(
            "max_attempts must be >= 1, got {}",
            config.max_attempts
        )));
    }

    if !config.base_delay.is_finite() || config.base_delay < 0.0 {
        return Err(ConfigError::Validation(format!(
            "retry base_delay must be a non-negative number, got {}",
            config.base_delay
        )));
    }

    // Longest backoff the executor can sleep, before jitter
    let doublings = config.max_attempts.saturating_sub(1).min(30) as i32;
    let longest_backoff = config.base_delay * 2f64.powi(doublings);
    if longest_backoff > MAX_DELAY_SECONDS {
        return Err(ConfigError::Validation(format!(
            "retry backoff can reach {}s, more than the {}s limit",
            longest_backoff, MAX_DELAY_SECONDS
        )));
    }

    Ok(())
}

/// Validates pacing bounds: 0 <= min <= base <= max <= one day, base > 0
fn validate_rate_limit_config(config: &RateLimitConfig) -> Result<(), ConfigError> {
    let values = [config.min_delay, config.base_delay, config.max_delay];
    if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
        return Err(ConfigError::Validation(
            "rate-limit delays must be non-negative numbers".to_string(),
        ));
    }

    if config.base_delay <= 0.0 {
        return Err(ConfigError::Validation(format!(
            "rate-limit base_delay must be > 0, got {}",
            config.base_delay
        )));
    }

    if config.max_delay > MAX_DELAY_SECONDS {
        return Err(ConfigError::Validation(format!(
            "max_delay must be at most {}s, got {}",
            MAX_DELAY_SECONDS, config.max_delay
        )));
    }

    if config.min_delay > config.base_delay || config.base_delay > config.max_delay {
        return Err(ConfigError::Validation(format!(
            "rate-limit delays must satisfy min <= base <= max, got {} / {} / {}",
            config.min_delay, config.base_delay, config.max_delay
        )));
    }

    Ok(())
}

/// Validates proxy addresses
fn validate_proxy_config(config: &ProxyConfig) -> Result<(), ConfigError> {
    for address in &config.addresses {
        Url::parse(address).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid proxy address '{}': {}", address, e))
        })?;
    }
    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.agents.is_empty() {
        return Err(ConfigError::Validation(
            "at least one user agent is required".to_string(),
        ));
    }

    if config.agents.iter().any(|agent| agent.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "user agents cannot be empty".to_string(),
        ));
    }

    if let Some(agent) = config
        .agents
        .iter()
        .find(|agent| HeaderValue::from_str(agent).is_err())
    {
        return Err(ConfigError::Validation(format!(
            "user agent {:?} is not a valid header value",
            agent
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.json_path.is_empty() {
        return Err(ConfigError::Validation(
            "json_path cannot be empty".to_string(),
        ));
    }

    if matches!(&config.database_path, Some(path) if path.is_empty()) {
        return Err(ConfigError::Validation(
            "database_path cannot be empty when set".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_target_url() {
        assert!(validate_target_url("https://example.com/page").is_ok());
        assert!(validate_target_url("http://localhost:8080/").is_ok());

        assert!(validate_target_url("").is_err());
        assert!(validate_target_url("not a url").is_err());
        assert!(validate_target_url("ftp://example.com/file").is_err());
    }

    #[test]
    fn test_browser_transport_needs_endpoint() {
        let mut config = Config::default();
        config.session.transport = TransportKind::Browser;
        assert!(validate(&config).is_err());

        config.session.render_endpoint = Some("http://localhost:3000/render".to_string());
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_rate_limit_ordering() {
        let mut config = Config::default();
        config.rate_limit = RateLimitConfig {
            base_delay: 0.2,
            min_delay: 0.5,
            max_delay: 10.0,
        };
        assert!(validate(&config).is_err());

        config.rate_limit = RateLimitConfig {
            base_delay: 1.0,
            min_delay: 0.0,
            max_delay: 0.0,
        };
        assert!(validate(&config).is_err());

        config.rate_limit = RateLimitConfig {
            base_delay: 0.0,
            min_delay: 0.0,
            max_delay: 1.0,
        };
        assert!(validate(&config).is_err());

        config.rate_limit = RateLimitConfig {
            base_delay: f64::NAN,
            min_delay: 0.0,
            max_delay: 1.0,
        };
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_huge_delays_are_rejected() {
        let config = crate::config::parse_config(
            "[rate-limit]\nbase-delay = 1e20\nmin-delay = 0.5\nmax-delay = 1e20\n",
        );
        assert!(matches!(config, Err(ConfigError::Validation(_))));

        let config = crate::config::parse_config("[retry]\nbase-delay = 1e20\n");
        assert!(matches!(config, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_retry_backoff_is_bounded() {
        let mut config = Config::default();
        config.retry.base_delay = 1.0;
        config.retry.max_attempts = 17;
        assert!(validate(&config).is_ok());

        config.retry.max_attempts = 18;
        assert!(validate(&config).is_err());

        // Doublings stop at 30, so attempt count alone cannot overflow
        config.retry.base_delay = 0.00001;
        config.retry.max_attempts = u32::MAX;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_retry_needs_an_attempt() {
        let mut config = Config::default();
        config.retry.max_attempts = 0;
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_invalid_proxy_address() {
        let mut config = Config::default();
        config.proxies.addresses = vec!["::nope::".to_string()];
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_empty_user_agents() {
        let mut config = Config::default();
        config.user_agent.agents.clear();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_user_agent_must_be_a_header_value() {
        let mut config = Config::default();
        config.user_agent.agents = vec!["Good/1.0".to_string(), "bad\nagent".to_string()];
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));

        config.user_agent.agents = vec!["Good/1.0".to_string()];
        assert!(validate(&config).is_ok());
    }
}
