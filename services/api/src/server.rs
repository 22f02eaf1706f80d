use crate::cli::ServeArgs;
use crate::infra::{load_records, AppState};
use crate::routes::with_dispatch_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use care_dispatch::config::AppConfig;
use care_dispatch::dispatch::DispatchDesk;
use care_dispatch::error::AppError;
use care_dispatch::notify::TracingNotifier;
use care_dispatch::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(path) = args.requests_csv.take() {
        config.records.requests_csv = Some(path);
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let records = load_records(config.records.requests_csv.as_deref())?;
    let desk = Arc::new(DispatchDesk::new(
        records.requests.clone(),
        records.providers.clone(),
        Arc::new(TracingNotifier),
        config.dispatch,
    ));

    let app = with_dispatch_routes(desk)
        .layer(Extension(records))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        auto_matching = config.dispatch.auto_matching_enabled,
        "care dispatch service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
