use crate::infra::{
    parse_optional_date, AppState, InMemoryProviderRepository, InMemoryRequestRepository, Records,
};
use axum::extract::Query;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Extension;
use axum::Json;
use care_dispatch::analytics::{AnalyticsQuery, AnalyticsReport, ReportPeriod};
use care_dispatch::dispatch::{dispatch_router, DispatchDesk, ProviderRepository};
use care_dispatch::error::AppError;
use care_dispatch::notify::Notifier;
use care_dispatch::overview::{OverviewSnapshot, DEFAULT_RECENT_LIMIT};
use care_dispatch::requests::{
    filter_requests, to_csv_string, FilterCriteria, Request, RequestRepository, Selector,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

pub(crate) type InMemoryDesk<N> =
    DispatchDesk<InMemoryRequestRepository, InMemoryProviderRepository, N>;

/// Query string accepted by the request list and its CSV export.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RequestListQuery {
    pub(crate) search: Option<String>,
    pub(crate) status: Option<String>,
    pub(crate) location: Option<String>,
    pub(crate) provider: Option<String>,
    pub(crate) date_from: Option<String>,
    pub(crate) date_to: Option<String>,
}

impl RequestListQuery {
    pub(crate) fn into_criteria(self) -> Result<FilterCriteria, AppError> {
        let date_from = parse_optional_date("date_from", self.date_from.as_deref())?;
        let date_to = parse_optional_date("date_to", self.date_to.as_deref())?;

        Ok(FilterCriteria::default()
            .with_search(self.search.unwrap_or_default())
            .with_status(selector(self.status))
            .with_location(selector(self.location))
            .with_provider(selector(self.provider))
            .with_date_range(date_from, date_to))
    }
}

fn selector(raw: Option<String>) -> Selector {
    match raw {
        Some(value) if !value.is_empty() => Selector::from(value),
        _ => Selector::All,
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct RequestListResponse {
    pub(crate) total: usize,
    pub(crate) requests: Vec<Request>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct OverviewQuery {
    pub(crate) recent: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ReportQuery {
    pub(crate) period: Option<String>,
    pub(crate) location: Option<String>,
    pub(crate) today: Option<String>,
}

pub(crate) fn with_dispatch_routes<N>(desk: Arc<InMemoryDesk<N>>) -> axum::Router
where
    N: Notifier + 'static,
{
    dispatch_router(desk)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/requests", get(list_requests_endpoint))
        .route("/api/v1/requests/export", get(export_requests_endpoint))
        .route("/api/v1/overview", get(overview_endpoint))
        .route("/api/v1/reports", get(report_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

fn filtered_requests(
    records: &Records,
    query: RequestListQuery,
) -> Result<Vec<Request>, AppError> {
    let criteria = query.into_criteria()?;
    let requests = records.requests.list()?;
    Ok(filter_requests(&requests, &criteria))
}

pub(crate) async fn list_requests_endpoint(
    Extension(records): Extension<Records>,
    Query(query): Query<RequestListQuery>,
) -> Result<Json<RequestListResponse>, AppError> {
    let requests = filtered_requests(&records, query)?;
    Ok(Json(RequestListResponse {
        total: requests.len(),
        requests,
    }))
}

pub(crate) async fn export_requests_endpoint(
    Extension(records): Extension<Records>,
    Query(query): Query<RequestListQuery>,
) -> Result<Response, AppError> {
    let requests = filtered_requests(&records, query)?;
    let body = to_csv_string(&requests)?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"requests.csv\"",
            ),
        ],
        body,
    )
        .into_response())
}

pub(crate) async fn overview_endpoint(
    Extension(records): Extension<Records>,
    Query(query): Query<OverviewQuery>,
) -> Result<Json<OverviewSnapshot>, AppError> {
    let requests = records.requests.list()?;
    let providers = records.providers.list()?;
    let recent = query.recent.unwrap_or(DEFAULT_RECENT_LIMIT);
    Ok(Json(OverviewSnapshot::build(&requests, &providers, recent)))
}

pub(crate) async fn report_endpoint(
    Extension(records): Extension<Records>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<AnalyticsReport>, AppError> {
    let period = match query.period.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => raw
            .parse::<ReportPeriod>()
            .map_err(|err| AppError::InvalidQuery(err.to_string()))?,
        _ => ReportPeriod::default(),
    };
    let today = parse_optional_date("today", query.today.as_deref())?
        .unwrap_or_else(|| Local::now().date_naive());

    let requests = records.requests.list()?;
    let providers = records.providers.list()?;
    let analytics = AnalyticsQuery::new(period, selector(query.location));
    Ok(Json(AnalyticsReport::build(
        &requests,
        &providers,
        &analytics,
        today,
    )))
}
