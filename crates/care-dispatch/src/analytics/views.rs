use chrono::NaiveDate;
use serde::Serialize;

use super::period::ReportPeriod;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyMetrics {
    pub total_requests: usize,
    pub completed_requests: usize,
    pub completion_rate: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_response_hours: Option<f32>,
    pub provider_utilization: f32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyVolumeEntry {
    pub month: String,
    pub requests: usize,
    pub completed: usize,
}

/// Mean response time of the requests created in one ISO week.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseTimeEntry {
    /// ISO week label, `YYYY-Www`.
    pub week: String,
    pub week_start: NaiveDate,
    pub requests: usize,
    pub avg_response_hours: Option<f32>,
}

/// Key metrics of the window against the window of equal length before it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodComparison {
    pub previous_window_start: NaiveDate,
    pub previous_window_end: NaiveDate,
    pub previous_total_requests: usize,
    /// Percent change in request volume; absent when the previous window is empty.
    pub total_requests_change_pct: Option<f32>,
    /// Difference in completion rate, in percentage points.
    pub completion_rate_change_pts: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_response_hours_change: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacilityUsageEntry {
    pub facility: String,
    pub requests: usize,
    pub share_pct: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderPerformanceEntry {
    pub provider: String,
    pub specialty: String,
    pub completed_requests: usize,
    pub open_requests: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_response_hours: Option<f32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsReport {
    pub period: ReportPeriod,
    pub period_label: &'static str,
    pub location: String,
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
    pub key_metrics: KeyMetrics,
    pub period_change: PeriodComparison,
    pub monthly_volume: Vec<MonthlyVolumeEntry>,
    pub response_time_trend: Vec<ResponseTimeEntry>,
    pub facility_usage: Vec<FacilityUsageEntry>,
    pub provider_performance: Vec<ProviderPerformanceEntry>,
}
