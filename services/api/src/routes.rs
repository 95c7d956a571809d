use crate::infra::{AppState, PlacementServices};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use placement_cell::analysis::analysis_router;
use placement_cell::applications::applications_router;
use placement_cell::community::community_router;
use placement_cell::directory::directory_router;
use placement_cell::notify::notify_router;
use placement_cell::records::records_router;
use placement_cell::recruiting::recruiting_router;
use serde_json::json;

pub(crate) fn with_api_routes(services: &PlacementServices) -> axum::Router {
    directory_router(services.directory.clone())
        .merge(records_router(services.records.clone()))
        .merge(notify_router(services.notices.clone()))
        .merge(recruiting_router(services.recruiting.clone()))
        .merge(applications_router(services.applications.clone()))
        .merge(community_router(services.community.clone()))
        .merge(analysis_router(services.analysis.clone()))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
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
