use serde::Serialize;
use std::fmt;

/// Operational alert derived from the current metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Alert {
    LowSuccessRate,
    HighResponseTimes,
    LowDataQuality,
}

impl Alert {
    pub fn message(&self) -> &'static str {
        match self {
            Self::LowSuccessRate => "Low success rate detected",
            Self::HighResponseTimes => "High response times detected",
            Self::LowDataQuality => "Low data quality detected",
        }
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub success_rate: f64,
    pub average_response_time: f64,
    pub average_quality_score: f64,
    pub response_time_samples: usize,
    pub quality_score_samples: usize,
    pub alerts: Vec<Alert>,
}
