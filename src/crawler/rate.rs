//! Adaptive pacing between requests
//!
//! The controller slows down multiplicatively on failure and speeds up
//! multiplicatively only after a run of more than five consecutive successes.
//! The delay handed to the caller carries ±20% jitter; the stored delay does
//! not.

use crate::config::RateLimitConfig;
use rand::Rng;
use std::time::Duration;

const SPEED_UP_FACTOR: f64 = 0.9;
const SLOW_DOWN_FACTOR: f64 = 1.5;
const SPEED_UP_AFTER: u32 = 5;
const JITTER_MIN: f64 = 0.8;
const JITTER_MAX: f64 = 1.2;

/// Adaptive inter-request delay
///
/// Invariant: `min_delay <= current_delay <= max_delay`.
#[derive(Debug, Clone, PartialEq)]
pub struct RateController {
    base_delay: f64,
    current_delay: f64,
    min_delay: f64,
    max_delay: f64,
    consecutive_successes: u32,
    consecutive_failures: u32,
}

impl RateController {
    /// Creates a controller starting at `base_delay` seconds
    ///
    /// Bounds are normalised so that `min <= max`, and the starting delay is
    /// clamped into them. A zero starting delay never grows, so failures do
    /// not slow a controller built that way.
    pub fn new(base_delay: f64, min_delay: f64, max_delay: f64) -> Self {
        let min_delay = min_delay.max(0.0);
        let max_delay = max_delay.max(min_delay);
        let current_delay = base_delay.clamp(min_delay, max_delay);

        Self {
            base_delay,
            current_delay,
            min_delay,
            max_delay,
            consecutive_successes: 0,
            consecutive_failures: 0,
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.base_delay, config.min_delay, config.max_delay)
    }

    /// Feeds one outcome into the controller and returns the unjittered delay
    pub fn adjust(&mut self, success: bool) -> f64 {
        if success {
            self.consecutive_successes += 1;
            self.consecutive_failures = 0;

            if self.consecutive_successes > SPEED_UP_AFTER {
                self.current_delay = (self.current_delay * SPEED_UP_FACTOR).max(self.min_delay);
            }
        } else {
            self.consecutive_failures += 1;
            self.consecutive_successes = 0;
            self.current_delay = (self.current_delay * SLOW_DOWN_FACTOR).min(self.max_delay);
        }

        self.current_delay
    }

    /// Feeds one outcome into the controller and returns the jittered delay
    pub fn next_delay(&mut self, success: bool) -> Duration {
        let delay = self.adjust(success);
        let jitter = rand::thread_rng().gen_range(JITTER_MIN..=JITTER_MAX);
        let jittered = delay * jitter;

        tracing::trace!(
            "Pacing: current {:.3}s, jittered {:.3}s (successes {}, failures {})",
            delay,
            jittered,
            self.consecutive_successes,
            self.consecutive_failures
        );

        Duration::try_from_secs_f64(jittered).unwrap_or(Duration::MAX)
    }

    pub fn base_delay(&self) -> f64 {
        self.base_delay
    }

    pub fn current_delay(&self) -> f64 {
        self.current_delay
    }

    pub fn min_delay(&self) -> f64 {
        self.min_delay
    }

    pub fn max_delay(&self) -> f64 {
        self.max_delay
    }

    pub fn consecutive_successes(&self) -> u32 {
        self.consecutive_successes
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }
}

impl Default for RateController {
    fn default() -> Self {
        Self::from_config(&RateLimitConfig::default())
    }
}
