use crate::infra::{load_requests, parse_date};
use care_dispatch::analytics::{AnalyticsQuery, AnalyticsReport, ReportPeriod};
use care_dispatch::config::AppConfig;
use care_dispatch::error::AppError;
use care_dispatch::overview::{OverviewSnapshot, DEFAULT_RECENT_LIMIT};
use care_dispatch::requests::{
    write_csv, FilterCriteria, Request, RequestIndex, Selector, WILDCARD,
};
use care_dispatch::sample::sample_providers;
use chrono::{Local, NaiveDate};
use clap::Args;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct RequestListArgs {
    /// Case-insensitive text matched against request id and facility
    #[arg(long, default_value = "")]
    pub(crate) search: String,
    /// Status to keep (pending, assigned, in-progress, completed) or "all"
    #[arg(long, default_value = WILDCARD)]
    pub(crate) status: String,
    /// Exact location to keep or "all"
    #[arg(long, default_value = WILDCARD)]
    pub(crate) location: String,
    /// Exact provider name to keep or "all"
    #[arg(long, default_value = WILDCARD)]
    pub(crate) provider: String,
    /// Earliest creation date to keep (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) date_from: Option<NaiveDate>,
    /// Latest creation date to keep (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) date_to: Option<NaiveDate>,
    /// Request export to load instead of the built-in sample set
    #[arg(long)]
    pub(crate) requests_csv: Option<PathBuf>,
    /// Write the matching requests to this CSV file
    #[arg(long)]
    pub(crate) export: Option<PathBuf>,
}

impl RequestListArgs {
    fn criteria(&self) -> FilterCriteria {
        FilterCriteria::default()
            .with_search(self.search.clone())
            .with_status(self.status.as_str())
            .with_location(self.location.as_str())
            .with_provider(self.provider.as_str())
            .with_date_range(self.date_from, self.date_to)
    }
}

#[derive(Args, Debug)]
pub(crate) struct OverviewArgs {
    /// Number of recent requests to list
    #[arg(long, default_value_t = DEFAULT_RECENT_LIMIT)]
    pub(crate) recent: usize,
    /// Request export to load instead of the built-in sample set
    #[arg(long)]
    pub(crate) requests_csv: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Look-back window: 7days, 30days, 90days or 1year
    #[arg(long, default_value = "30days")]
    pub(crate) period: ReportPeriod,
    /// Exact location to report on or "all"
    #[arg(long, default_value = WILDCARD)]
    pub(crate) location: String,
    /// Last day of the window (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Request export to load instead of the built-in sample set
    #[arg(long)]
    pub(crate) requests_csv: Option<PathBuf>,
}

fn resolve_requests(flag: Option<PathBuf>) -> Result<Vec<Request>, AppError> {
    let path = match flag {
        Some(path) => Some(path),
        None => AppConfig::load()?.records.requests_csv,
    };
    load_requests(path.as_deref())
}

pub(crate) fn run_request_list(args: RequestListArgs) -> Result<(), AppError> {
    let criteria = args.criteria();
    let index = RequestIndex::new(resolve_requests(args.requests_csv.clone())?);
    let matched: Vec<Request> = index.query(&criteria).into_iter().cloned().collect();

    render_request_list(&matched, index.len());

    if let Some(path) = args.export {
        let file = File::create(&path)?;
        write_csv(BufWriter::new(file), &matched)?;
        println!("\nExported {} request(s) to {}", matched.len(), path.display());
    }

    Ok(())
}

pub(crate) fn run_overview(args: OverviewArgs) -> Result<(), AppError> {
    let requests = resolve_requests(args.requests_csv)?;
    let snapshot = OverviewSnapshot::build(&requests, &sample_providers(), args.recent);
    render_overview(&snapshot);
    Ok(())
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let requests = resolve_requests(args.requests_csv)?;
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let query = AnalyticsQuery::new(args.period, Selector::from(args.location));
    let report = AnalyticsReport::build(&requests, &sample_providers(), &query, today);
    render_report(&report);
    Ok(())
}

fn render_request_list(requests: &[Request], total: usize) {
    println!("Support requests ({} of {})", requests.len(), total);
    if requests.is_empty() {
        println!("  No requests match the current filters.");
        return;
    }

    for request in requests {
        println!(
            "- {} | {} ({}) | {} | {} | {} priority | created {}",
            request.id,
            request.facility,
            request.location,
            request.provider,
            request.status.label(),
            request.priority.label(),
            request.created.format("%Y-%m-%d %H:%M"),
        );
    }
}

fn render_overview(snapshot: &OverviewSnapshot) {
    println!("Dispatch overview");
    println!(
        "- {} total requests | {} pending | {} providers available",
        snapshot.total_requests, snapshot.pending_requests, snapshot.active_providers
    );
    match snapshot.avg_response_hours {
        Some(hours) => println!("- Average response time: {:.1}h", hours),
        None => println!("- Average response time: n/a"),
    }

    println!("Recent requests:");
    for request in &snapshot.recent_requests {
        println!(
            "  - {} {} | {} | {}",
            request.id,
            request.facility,
            request.request_type,
            request.status.label()
        );
    }
}

fn render_report(report: &AnalyticsReport) {
    println!(
        "Reports & analytics: {} ({} to {}), location {}",
        report.period_label, report.window_start, report.window_end, report.location
    );

    let metrics = &report.key_metrics;
    println!(
        "- {} requests | {:.0}% completed | {:.0}% provider utilization",
        metrics.total_requests,
        metrics.completion_rate * 100.0,
        metrics.provider_utilization * 100.0
    );
    if let Some(hours) = metrics.avg_response_hours {
        println!("- Average response time: {:.1}h", hours);
    }

    let change = &report.period_change;
    let volume = change
        .total_requests_change_pct
        .map(|pct| format!("{pct:+.1}% requests"))
        .unwrap_or_else(|| "no earlier requests".to_string());
    println!(
        "- vs {} to {}: {} | {:+.1} pts completion",
        change.previous_window_start,
        change.previous_window_end,
        volume,
        change.completion_rate_change_pts
    );

    if !report.monthly_volume.is_empty() {
        println!("Monthly volume:");
        for entry in &report.monthly_volume {
            println!(
                "  - {}: {} requests, {} completed",
                entry.month, entry.requests, entry.completed
            );
        }
    }

    if !report.response_time_trend.is_empty() {
        println!("Weekly response time:");
        for entry in &report.response_time_trend {
            match entry.avg_response_hours {
                Some(hours) => println!(
                    "  - {}: {:.1}h over {} requests",
                    entry.week, hours, entry.requests
                ),
                None => println!("  - {}: no requests", entry.week),
            }
        }
    }

    if !report.facility_usage.is_empty() {
        println!("Facility usage:");
        for entry in &report.facility_usage {
            println!(
                "  - {}: {} ({:.1}%)",
                entry.facility, entry.requests, entry.share_pct
            );
        }
    }

    println!("Provider performance:");
    for entry in &report.provider_performance {
        let response = entry
            .avg_response_hours
            .map(|hours| format!("{hours:.1}h avg"))
            .unwrap_or_else(|| "no responses".to_string());
        println!(
            "  - {} ({}): {} completed, {} open, {}",
            entry.provider,
            entry.specialty,
            entry.completed_requests,
            entry.open_requests,
            response
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use care_dispatch::requests::CsvRequestSource;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_csv(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos())
            .unwrap_or_default();
        std::env::temp_dir().join(format!("care-dispatch-{name}-{nanos}.csv"))
    }

    #[test]
    fn list_args_default_to_wildcards() {
        let args = RequestListArgs {
            status: WILDCARD.to_string(),
            location: WILDCARD.to_string(),
            provider: WILDCARD.to_string(),
            ..RequestListArgs::default()
        };
        assert!(args.criteria().is_unconstrained());
    }

    #[test]
    fn request_list_exports_matches() {
        let source = temp_csv("source");
        let export = temp_csv("export");
        let mut seed = Vec::new();
        write_csv(&mut seed, &care_dispatch::sample::sample_requests()).expect("seed csv");
        std::fs::write(&source, seed).expect("write seed");

        let args = RequestListArgs {
            status: "pending".to_string(),
            location: WILDCARD.to_string(),
            provider: WILDCARD.to_string(),
            requests_csv: Some(source.clone()),
            export: Some(export.clone()),
            ..RequestListArgs::default()
        };
        run_request_list(args).expect("command succeeds");

        let exported = CsvRequestSource::from_path(&export).expect("export parses");
        let ids: Vec<_> = exported.iter().map(|request| request.id.as_str()).collect();
        assert_eq!(ids, ["REQ-001", "REQ-004", "REQ-007"]);

        let _ = std::fs::remove_file(source);
        let _ = std::fs::remove_file(export);
    }
}
