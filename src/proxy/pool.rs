//! Proxy health tracking and selection

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;

/// Health a proxy starts the session with
pub const INITIAL_HEALTH: u8 = 100;

/// Health gained per successful request
pub const SUCCESS_REWARD: u8 = 5;

/// Health lost per failed request
pub const FAILURE_PENALTY: u8 = 20;

/// Proxies above this health are preferred
pub const HEALTHY_THRESHOLD: u8 = 50;

/// Per-proxy health and performance record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProxyRecord {
    /// Proxy address (e.g. "http://10.0.0.1:8080")
    pub address: String,

    /// Reliability estimate in 0..=100
    pub health: u8,

    /// Response time of the last successful request through this proxy (seconds)
    pub last_response_time: f64,

    /// When this proxy was last handed out
    pub last_used: Option<DateTime<Utc>>,

    pub success_count: u64,
    pub failure_count: u64,
}

impl ProxyRecord {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            health: INITIAL_HEALTH,
            last_response_time: 0.0,
            last_used: None,
            success_count: 0,
            failure_count: 0,
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.health > HEALTHY_THRESHOLD
    }

    pub fn is_dead(&self) -> bool {
        self.health == 0
    }

    /// Selection order: fastest, then healthiest, then least recently used
    fn preference(&self, other: &Self) -> Ordering {
        self.last_response_time
            .total_cmp(&other.last_response_time)
            .then_with(|| other.health.cmp(&self.health))
            .then_with(|| self.last_used.cmp(&other.last_used))
    }
}

/// Pool of egress proxies for one session
///
/// Records are created once per configured address and are never removed;
/// dead proxies are only excluded from selection.
#[derive(Debug, Clone, Default)]
pub struct ProxyPool {
    records: Vec<ProxyRecord>,
}

impl ProxyPool {
    /// Creates a pool with one fresh record per address
    ///
    /// Duplicate addresses are collapsed into a single record.
    pub fn new<I, S>(addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut records: Vec<ProxyRecord> = Vec::new();
        for address in addresses {
            let address = address.into();
            if records.iter().any(|r| r.address == address) {
                tracing::debug!("Ignoring duplicate proxy address {}", address);
                continue;
            }
            records.push(ProxyRecord::new(address));
        }
        Self { records }
    }

    /// Picks the best proxy and marks it as used now
    ///
    /// Candidates are the proxies with health above 50; if there are none,
    /// any proxy with health above 0. Returns `None` if the pool is empty or
    /// every proxy is dead.
    pub fn select_best(&mut self) -> Option<String> {
        let has_healthy = self.records.iter().any(ProxyRecord::is_healthy);

        let best = self
            .records
            .iter_mut()
            .filter(|r| {
                if has_healthy {
                    r.is_healthy()
                } else {
                    !r.is_dead()
                }
            })
            .min_by(|a, b| a.preference(b))?;

        best.last_used = Some(Utc::now());
        tracing::trace!(
            "Selected proxy {} (health {}, {:.3}s)",
            best.address,
            best.health,
            best.last_response_time
        );
        Some(best.address.clone())
    }

    /// Applies the result of a request made through `address`
    ///
    /// Success adds 5 health (capped at 100) and stores the response time;
    /// failure removes 20 health (floored at 0). Unknown addresses are ignored.
    pub fn record_outcome(&mut self, address: &str, success: bool, response_time: f64) {
        let Some(record) = self.records.iter_mut().find(|r| r.address == address) else {
            tracing::debug!("Outcome for unknown proxy {} ignored", address);
            return;
        };

        if success {
            record.health = record.health.saturating_add(SUCCESS_REWARD).min(100);
            record.last_response_time = response_time;
            record.success_count += 1;
        } else {
            record.health = record.health.saturating_sub(FAILURE_PENALTY);
            record.failure_count += 1;
            if record.is_dead() {
                tracing::warn!("Proxy {} is out of health and will no longer be used", address);
            }
        }
    }

    pub fn get(&self, address: &str) -> Option<&ProxyRecord> {
        self.records.iter().find(|r| r.address == address)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of proxies that can still be selected
    pub fn available(&self) -> usize {
        self.records.iter().filter(|r| !r.is_dead()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(addresses: &[&str]) -> ProxyPool {
        ProxyPool::new(addresses.iter().copied())
    }

    #[test]
    fn test_empty_pool_selects_nothing() {
        let mut pool = ProxyPool::default();
        assert!(pool.is_empty());
        assert_eq!(pool.select_best(), None);
    }

    #[test]
    fn test_duplicate_addresses_collapse() {
        let pool = pool(&["http://a:1", "http://a:1", "http://b:1"]);
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_failure_costs_twenty() {
        let mut pool = pool(&["http://a:1"]);
        pool.record_outcome("http://a:1", false, 0.0);
        let record = pool.get("http://a:1").unwrap();
        assert_eq!(record.health, 80);
        assert_eq!(record.failure_count, 1);
    }

    #[test]
    fn test_success_earns_five_capped() {
        let mut pool = pool(&["http://a:1"]);
        pool.record_outcome("http://a:1", true, 0.4);
        let record = pool.get("http://a:1").unwrap();
        assert_eq!(record.health, 100);
        assert_eq!(record.success_count, 1);
        assert_eq!(record.last_response_time, 0.4);

        pool.record_outcome("http://a:1", false, 0.0);
        pool.record_outcome("http://a:1", true, 0.2);
        assert_eq!(pool.get("http://a:1").unwrap().health, 85);
    }

    #[test]
    fn test_health_floors_at_zero() {
        let mut pool = pool(&["http://a:1"]);
        for _ in 0..7 {
            pool.record_outcome("http://a:1", false, 0.0);
        }
        assert_eq!(pool.get("http://a:1").unwrap().health, 0);
        assert_eq!(pool.available(), 0);
    }

    #[test]
    fn test_failure_keeps_last_response_time() {
        let mut pool = pool(&["http://a:1"]);
        pool.record_outcome("http://a:1", true, 1.5);
        pool.record_outcome("http://a:1", false, 9.0);
        assert_eq!(pool.get("http://a:1").unwrap().last_response_time, 1.5);
    }

    #[test]
    fn test_prefers_fastest_healthy_proxy() {
        let mut pool = pool(&["http://slow:1", "http://fast:1"]);
        pool.record_outcome("http://slow:1", true, 2.0);
        pool.record_outcome("http://fast:1", true, 0.5);
        assert_eq!(pool.select_best().as_deref(), Some("http://fast:1"));
    }

    #[test]
    fn test_equal_speed_prefers_healthier() {
        let mut pool = pool(&["http://a:1", "http://b:1"]);
        pool.record_outcome("http://a:1", false, 0.0);
        assert_eq!(pool.select_best().as_deref(), Some("http://b:1"));
    }

    #[test]
    fn test_ties_rotate_least_recently_used() {
        let mut pool = pool(&["http://a:1", "http://b:1", "http://c:1"]);
        let first = pool.select_best().unwrap();
        let second = pool.select_best().unwrap();
        let third = pool.select_best().unwrap();
        assert_ne!(first, second);
        assert_ne!(second, third);
        assert_ne!(first, third);
    }

    #[test]
    fn test_falls_back_to_unhealthy_but_alive() {
        let mut pool = pool(&["http://a:1", "http://b:1"]);
        // a -> 40, b -> 0
        for _ in 0..3 {
            pool.record_outcome("http://a:1", false, 0.0);
        }
        for _ in 0..5 {
            pool.record_outcome("http://b:1", false, 0.0);
        }
        assert_eq!(pool.select_best().as_deref(), Some("http://a:1"));
    }

    #[test]
    fn test_unhealthy_fast_proxy_loses_to_healthy_slow_one() {
        let mut pool = pool(&["http://fast:1", "http://slow:1"]);
        pool.record_outcome("http://fast:1", true, 0.1);
        pool.record_outcome("http://slow:1", true, 3.0);
        for _ in 0..3 {
            pool.record_outcome("http://fast:1", false, 0.0);
        }
        assert_eq!(pool.select_best().as_deref(), Some("http://slow:1"));
    }

    #[test]
    fn test_never_selects_dead_proxy_while_one_is_alive() {
        let mut pool = pool(&["http://dead:1", "http://alive:1"]);
        for _ in 0..5 {
            pool.record_outcome("http://dead:1", false, 0.0);
        }
        for _ in 0..4 {
            pool.record_outcome("http://alive:1", false, 0.0);
        }
        // alive sits at 20, dead at 0
        for _ in 0..10 {
            assert_eq!(pool.select_best().as_deref(), Some("http://alive:1"));
        }
    }

    #[test]
    fn test_all_dead_selects_nothing() {
        let mut pool = pool(&["http://a:1"]);
        for _ in 0..5 {
            pool.record_outcome("http://a:1", false, 0.0);
        }
        assert_eq!(pool.select_best(), None);
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_selection_marks_last_used() {
        let mut pool = pool(&["http://a:1"]);
        assert!(pool.get("http://a:1").unwrap().last_used.is_none());
        pool.select_best();
        assert!(pool.get("http://a:1").unwrap().last_used.is_some());
    }

    #[test]
    fn test_unknown_address_is_ignored() {
        let mut pool = pool(&["http://a:1"]);
        pool.record_outcome("http://nope:1", false, 0.0);
        assert_eq!(pool.get("http://a:1").unwrap().health, 100);
    }
}
