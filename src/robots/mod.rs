//! Robots.txt handling module
//!
//! This module provides the policy gates checked before each fetch,
//! including a robots.txt gate with a per-origin cache.

mod cache;
mod gate;
mod parser;

pub use cache::{CachedRobots, MAX_AGE_HOURS};
pub use gate::{build_gate, origin_of, product_token, AllowAll, PolicyGate, RobotsGate};
pub use parser::RobotsRules;
