//! Configuration module for Stealth-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use stealth_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Pacing starts at {}s", config.rate_limit.base_delay);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, OutputConfig, ProxyConfig, RateLimitConfig, RetryConfig, SessionConfig,
    TransportKind, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{
    compute_config_hash, load_config, load_config_with_hash, load_url_list, parse_config,
};
pub use validation::{validate, validate_target_url};
