//! Reporting view: key metrics with their change against the previous window,
//! monthly volume, weekly response times, facility usage and provider
//! performance over a look-back window.

pub mod period;
mod report;
pub mod views;

pub use period::ReportPeriod;
pub use report::{AnalyticsQuery, OTHER_FACILITIES, TOP_FACILITIES};
pub use views::{
    AnalyticsReport, FacilityUsageEntry, KeyMetrics, MonthlyVolumeEntry, PeriodComparison,
    ProviderPerformanceEntry, ResponseTimeEntry,
};
