use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{ProviderId, ReassignmentSelection};
use super::repository::ProviderRepository;
use super::service::{DispatchDesk, DispatchError};
use super::settings::DispatchSettings;
use crate::notify::Notifier;
use crate::requests::repository::{RepositoryError, RequestRepository};

type SharedDesk<R, P, N> = Arc<DispatchDesk<R, P, N>>;

/// Router builder exposing the manual control panel over HTTP.
pub fn dispatch_router<R, P, N>(desk: SharedDesk<R, P, N>) -> Router
where
    R: RequestRepository + 'static,
    P: ProviderRepository + 'static,
    N: Notifier + 'static,
{
    Router::new()
        .route("/api/v1/dispatch/pending", get(pending_handler::<R, P, N>))
        .route(
            "/api/v1/dispatch/providers",
            get(providers_handler::<R, P, N>),
        )
        .route(
            "/api/v1/dispatch/providers/:provider_id/availability",
            put(availability_handler::<R, P, N>),
        )
        .route(
            "/api/v1/dispatch/reassign",
            post(reassign_handler::<R, P, N>),
        )
        .route(
            "/api/v1/dispatch/auto-matching",
            put(auto_matching_handler::<R, P, N>),
        )
        .route(
            "/api/v1/dispatch/settings",
            get(settings_handler::<R, P, N>).put(save_settings_handler::<R, P, N>),
        )
        .with_state(desk)
}

#[derive(Debug, Deserialize)]
pub(crate) struct AvailabilityUpdate {
    pub(crate) available: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AutoMatchingUpdate {
    pub(crate) enabled: bool,
}

pub(crate) async fn pending_handler<R, P, N>(State(desk): State<SharedDesk<R, P, N>>) -> Response
where
    R: RequestRepository + 'static,
    P: ProviderRepository + 'static,
    N: Notifier + 'static,
{
    match desk.pending_requests() {
        Ok(requests) => {
            let payload = json!({ "total": requests.len(), "requests": requests });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn providers_handler<R, P, N>(
    State(desk): State<SharedDesk<R, P, N>>,
) -> Response
where
    R: RequestRepository + 'static,
    P: ProviderRepository + 'static,
    N: Notifier + 'static,
{
    match desk.providers() {
        Ok(providers) => (StatusCode::OK, axum::Json(providers)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn reassign_handler<R, P, N>(
    State(desk): State<SharedDesk<R, P, N>>,
    axum::Json(selection): axum::Json<ReassignmentSelection>,
) -> Response
where
    R: RequestRepository + 'static,
    P: ProviderRepository + 'static,
    N: Notifier + 'static,
{
    match desk.reassign(selection) {
        Ok(assignment) => (StatusCode::ACCEPTED, axum::Json(assignment)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn availability_handler<R, P, N>(
    State(desk): State<SharedDesk<R, P, N>>,
    Path(provider_id): Path<String>,
    axum::Json(update): axum::Json<AvailabilityUpdate>,
) -> Response
where
    R: RequestRepository + 'static,
    P: ProviderRepository + 'static,
    N: Notifier + 'static,
{
    let id = ProviderId(provider_id);
    match desk.set_provider_availability(&id, update.available) {
        Ok(provider) => (StatusCode::OK, axum::Json(provider)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn auto_matching_handler<R, P, N>(
    State(desk): State<SharedDesk<R, P, N>>,
    axum::Json(update): axum::Json<AutoMatchingUpdate>,
) -> Response
where
    R: RequestRepository + 'static,
    P: ProviderRepository + 'static,
    N: Notifier + 'static,
{
    match desk.set_auto_matching(update.enabled) {
        Ok(settings) => (StatusCode::OK, axum::Json(settings)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn settings_handler<R, P, N>(State(desk): State<SharedDesk<R, P, N>>) -> Response
where
    R: RequestRepository + 'static,
    P: ProviderRepository + 'static,
    N: Notifier + 'static,
{
    (StatusCode::OK, axum::Json(desk.settings())).into_response()
}

pub(crate) async fn save_settings_handler<R, P, N>(
    State(desk): State<SharedDesk<R, P, N>>,
    axum::Json(settings): axum::Json<DispatchSettings>,
) -> Response
where
    R: RequestRepository + 'static,
    P: ProviderRepository + 'static,
    N: Notifier + 'static,
{
    match desk.save_settings(settings) {
        Ok(settings) => (StatusCode::OK, axum::Json(settings)).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: DispatchError) -> Response {
    let status = match &err {
        DispatchError::SelectionRequired
        | DispatchError::RequestClosed(_)
        | DispatchError::ProviderUnavailable { .. }
        | DispatchError::InvalidSettings(_) => StatusCode::UNPROCESSABLE_ENTITY,
        DispatchError::UnknownRequest(_)
        | DispatchError::UnknownProvider(_)
        | DispatchError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        DispatchError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({
        "error": err.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
