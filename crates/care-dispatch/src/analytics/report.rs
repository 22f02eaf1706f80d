use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, Duration, NaiveDate};
use serde::Deserialize;

use super::period::ReportPeriod;
use super::views::{
    AnalyticsReport, FacilityUsageEntry, KeyMetrics, MonthlyVolumeEntry, PeriodComparison,
    ProviderPerformanceEntry, ResponseTimeEntry,
};
use crate::dispatch::domain::Provider;
use crate::overview::average_response_hours;
use crate::requests::domain::{Request, RequestStatus};
use crate::requests::filter::Selector;

/// Facilities listed individually before the remainder is folded together.
pub const TOP_FACILITIES: usize = 4;
pub const OTHER_FACILITIES: &str = "Others";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AnalyticsQuery {
    pub period: ReportPeriod,
    pub location: Selector,
}

impl AnalyticsQuery {
    pub fn new(period: ReportPeriod, location: Selector) -> Self {
        Self { period, location }
    }

    fn includes(&self, request: &Request, today: NaiveDate) -> bool {
        self.period.contains(today, request.created_on())
            && self.location.accepts(&request.location)
    }

    fn window<'r>(&self, requests: &'r [Request], today: NaiveDate) -> Vec<&'r Request> {
        requests
            .iter()
            .filter(|request| self.includes(request, today))
            .collect()
    }
}

#[derive(Debug, Default)]
struct MonthTally {
    requests: usize,
    completed: usize,
}

impl AnalyticsReport {
    pub fn build(
        requests: &[Request],
        providers: &[Provider],
        query: &AnalyticsQuery,
        today: NaiveDate,
    ) -> Self {
        let window = query.window(requests, today);
        let window_start = query.period.window_start(today);
        let key_metrics = key_metrics(&window, providers);
        let period_change = period_change(requests, providers, query, today, &key_metrics);

        Self {
            period: query.period,
            period_label: query.period.label(),
            location: query.location.to_string(),
            window_start,
            window_end: today,
            key_metrics,
            period_change,
            monthly_volume: monthly_volume(&window),
            response_time_trend: response_time_trend(&window, window_start, today),
            facility_usage: facility_usage(&window),
            provider_performance: provider_performance(&window, providers),
        }
    }
}

fn is_completed(request: &Request) -> bool {
    request.status == RequestStatus::Completed
}

fn key_metrics(window: &[&Request], providers: &[Provider]) -> KeyMetrics {
    let total_requests = window.len();
    let completed_requests = window.iter().filter(|request| is_completed(request)).count();
    let completion_rate = if total_requests == 0 {
        0.0
    } else {
        completed_requests as f32 / total_requests as f32
    };

    let engaged = providers
        .iter()
        .filter(|provider| {
            window
                .iter()
                .any(|request| request.provider == provider.name && !is_completed(request))
        })
        .count();
    let provider_utilization = if providers.is_empty() {
        0.0
    } else {
        engaged as f32 / providers.len() as f32
    };

    KeyMetrics {
        total_requests,
        completed_requests,
        completion_rate,
        avg_response_hours: average_response_hours(window.iter().copied()),
        provider_utilization,
    }
}

fn period_change(
    requests: &[Request],
    providers: &[Provider],
    query: &AnalyticsQuery,
    today: NaiveDate,
    current: &KeyMetrics,
) -> PeriodComparison {
    let previous_end = query.period.previous_window_end(today);
    let previous = key_metrics(&query.window(requests, previous_end), providers);

    let total_requests_change_pct = (previous.total_requests > 0).then(|| {
        let before = previous.total_requests as f32;
        (current.total_requests as f32 - before) * 100.0 / before
    });
    let avg_response_hours_change = current
        .avg_response_hours
        .zip(previous.avg_response_hours)
        .map(|(now, before)| now - before);

    PeriodComparison {
        previous_window_start: query.period.window_start(previous_end),
        previous_window_end: previous_end,
        previous_total_requests: previous.total_requests,
        total_requests_change_pct,
        completion_rate_change_pts: (current.completion_rate - previous.completion_rate) * 100.0,
        avg_response_hours_change,
    }
}

fn monthly_volume(window: &[&Request]) -> Vec<MonthlyVolumeEntry> {
    let mut months: BTreeMap<String, MonthTally> = BTreeMap::new();
    for request in window {
        let tally = months
            .entry(request.created.format("%Y-%m").to_string())
            .or_default();
        tally.requests += 1;
        if is_completed(request) {
            tally.completed += 1;
        }
    }

    months
        .into_iter()
        .map(|(month, tally)| MonthlyVolumeEntry {
            month,
            requests: tally.requests,
            completed: tally.completed,
        })
        .collect()
}

/// Monday of the ISO week holding `day`.
fn week_start(day: NaiveDate) -> NaiveDate {
    let offset = Duration::days(i64::from(day.weekday().num_days_from_monday()));
    day.checked_sub_signed(offset).unwrap_or(NaiveDate::MIN)
}

/// One entry per ISO week touching the window, empty weeks included.
fn response_time_trend(
    window: &[&Request],
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<ResponseTimeEntry> {
    let mut weeks: BTreeMap<NaiveDate, Vec<&Request>> = BTreeMap::new();
    let mut monday = week_start(start);
    while monday <= end {
        weeks.insert(monday, Vec::new());
        match monday.checked_add_signed(Duration::days(7)) {
            Some(next) => monday = next,
            None => break,
        }
    }
    for request in window.iter().copied() {
        weeks
            .entry(week_start(request.created_on()))
            .or_default()
            .push(request);
    }

    weeks
        .into_iter()
        .map(|(monday, created)| ResponseTimeEntry {
            week: monday.format("%G-W%V").to_string(),
            week_start: monday,
            requests: created.len(),
            avg_response_hours: average_response_hours(created.iter().copied()),
        })
        .collect()
}

fn facility_usage(window: &[&Request]) -> Vec<FacilityUsageEntry> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for request in window {
        *counts.entry(request.facility.as_str()).or_default() += 1;
    }

    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let total = window.len();
    let share = |requests: usize| requests as f32 * 100.0 / total as f32;

    let mut entries: Vec<FacilityUsageEntry> = ranked
        .iter()
        .take(TOP_FACILITIES)
        .map(|(facility, requests)| FacilityUsageEntry {
            facility: (*facility).to_string(),
            requests: *requests,
            share_pct: share(*requests),
        })
        .collect();

    let others: usize = ranked.iter().skip(TOP_FACILITIES).map(|(_, count)| count).sum();
    if others > 0 {
        entries.push(FacilityUsageEntry {
            facility: OTHER_FACILITIES.to_string(),
            requests: others,
            share_pct: share(others),
        });
    }

    entries
}

fn provider_performance(
    window: &[&Request],
    providers: &[Provider],
) -> Vec<ProviderPerformanceEntry> {
    let mut entries: Vec<ProviderPerformanceEntry> = providers
        .iter()
        .map(|provider| {
            let handled: Vec<&Request> = window
                .iter()
                .copied()
                .filter(|request| request.provider == provider.name)
                .collect();
            let completed_requests = handled
                .iter()
                .filter(|request| is_completed(request))
                .count();

            ProviderPerformanceEntry {
                provider: provider.name.clone(),
                specialty: provider.specialty.clone(),
                completed_requests,
                open_requests: handled.len() - completed_requests,
                avg_response_hours: average_response_hours(handled.iter().copied()),
            }
        })
        .collect();

    entries.sort_by(|a, b| {
        b.completed_requests
            .cmp(&a.completed_requests)
            .then_with(|| a.provider.cmp(&b.provider))
    });
    entries
}
