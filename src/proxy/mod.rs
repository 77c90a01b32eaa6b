//! Proxy pool module
//!
//! Keeps a health score per configured egress proxy and picks the best
//! candidate for each attempt. Health rises slowly on success (+5) and falls
//! sharply on failure (-20), so a degrading proxy drops out of the preferred
//! set after a few failures and has to earn its way back.

mod pool;

pub use pool::{
    ProxyPool, ProxyRecord, FAILURE_PENALTY, HEALTHY_THRESHOLD, INITIAL_HEALTH, SUCCESS_REWARD,
};
