//! Rolling-window request metrics and alert derivation

use crate::metrics::snapshot::{Alert, MetricsSnapshot};
use std::collections::VecDeque;

/// Number of samples kept in each rolling window
pub const WINDOW_CAPACITY: usize = 100;

const LOW_SUCCESS_RATE: f64 = 0.8;
const LOW_SUCCESS_MIN_REQUESTS: u64 = 10;
const HIGH_RESPONSE_TIME_SECS: f64 = 10.0;
const LOW_QUALITY_SCORE: f64 = 50.0;
const LOW_QUALITY_MIN_SAMPLES: usize = 5;

/// Fixed-capacity FIFO of recent observations
#[derive(Debug, Clone)]
pub struct RollingWindow {
    samples: VecDeque<f64>,
    capacity: usize,
}

impl RollingWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends a sample, evicting the oldest one once full
    pub fn push(&mut self, value: f64) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(value);
    }

    pub fn mean(&self) -> Option<f64> {
        if self.samples.is_empty() {
            None
        } else {
            Some(self.samples.iter().sum::<f64>() / self.samples.len() as f64)
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn oldest(&self) -> Option<f64> {
        self.samples.front().copied()
    }
}

/// Session-scoped request metrics
///
/// Counters are cumulative for the session. Averages are taken over the live
/// rolling windows. Alerts are recomputed after every record and replace the
/// previous set.
#[derive(Debug, Clone)]
pub struct MetricsRecorder {
    total_requests: u64,
    successful_requests: u64,
    failed_requests: u64,
    response_times: RollingWindow,
    quality_scores: RollingWindow,
    success_rate: f64,
    average_response_time: f64,
    average_quality_score: f64,
    alerts: Vec<Alert>,
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self {
            total_requests: 0,
            successful_requests: 0,
            failed_requests: 0,
            response_times: RollingWindow::new(WINDOW_CAPACITY),
            quality_scores: RollingWindow::new(WINDOW_CAPACITY),
            success_rate: 0.0,
            average_response_time: 0.0,
            average_quality_score: 0.0,
            alerts: Vec::new(),
        }
    }
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the outcome of one URL
    ///
    /// # Arguments
    ///
    /// * `url` - The URL the outcome belongs to (used for logging only)
    /// * `success` - Whether the URL produced a page
    /// * `response_time` - Transport time in seconds (0 when the fetch never succeeded)
    /// * `quality_score` - The page's quality score, if one was computed
    pub fn record(&mut self, url: &str, success: bool, response_time: f64, quality_score: Option<u32>) {
        self.total_requests += 1;
        if success {
            self.successful_requests += 1;
        } else {
            self.failed_requests += 1;
        }

        self.response_times.push(response_time);
        if let Some(score) = quality_score {
            self.quality_scores.push(f64::from(score));
        }

        self.update_aggregates();

        let previous = std::mem::take(&mut self.alerts);
        self.alerts = self.derive_alerts();
        if self.alerts != previous {
            for alert in &self.alerts {
                tracing::warn!("{} (after {})", alert, url);
            }
        }

        tracing::trace!(
            "Recorded {} success={} time={:.3}s quality={:?}",
            url,
            success,
            response_time,
            quality_score
        );
    }

    fn update_aggregates(&mut self) {
        if self.total_requests > 0 {
            self.success_rate = self.successful_requests as f64 / self.total_requests as f64;
        }
        if let Some(mean) = self.response_times.mean() {
            self.average_response_time = mean;
        }
        if let Some(mean) = self.quality_scores.mean() {
            self.average_quality_score = mean;
        }
    }

    /// Derives the alert set from the current aggregates
    pub fn derive_alerts(&self) -> Vec<Alert> {
        let mut alerts = Vec::new();

        if self.success_rate < LOW_SUCCESS_RATE && self.total_requests > LOW_SUCCESS_MIN_REQUESTS {
            alerts.push(Alert::LowSuccessRate);
        }

        if self.average_response_time > HIGH_RESPONSE_TIME_SECS {
            alerts.push(Alert::HighResponseTimes);
        }

        if self.average_quality_score < LOW_QUALITY_SCORE
            && self.quality_scores.len() >= LOW_QUALITY_MIN_SAMPLES
        {
            alerts.push(Alert::LowDataQuality);
        }

        alerts
    }

    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    pub fn total_requests(&self) -> u64 {
        self.total_requests
    }

    pub fn success_rate(&self) -> f64 {
        self.success_rate
    }

    pub fn average_response_time(&self) -> f64 {
        self.average_response_time
    }

    pub fn average_quality_score(&self) -> f64 {
        self.average_quality_score
    }

    pub fn response_times(&self) -> &RollingWindow {
        &self.response_times
    }

    pub fn quality_scores(&self) -> &RollingWindow {
        &self.quality_scores
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            total_requests: self.total_requests,
            successful_requests: self.successful_requests,
            failed_requests: self.failed_requests,
            success_rate: self.success_rate,
            average_response_time: self.average_response_time,
            average_quality_score: self.average_quality_score,
            response_time_samples: self.response_times.len(),
            quality_score_samples: self.quality_scores.len(),
            alerts: self.alerts.clone(),
        }
    }
}
