use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::json;

use crate::directory::UserId;
use crate::recruiting::CompanyId;
use crate::storage::RepositoryError;

use super::service::{AnalysisService, AnalysisServiceError};

pub fn analysis_router(service: Arc<AnalysisService>) -> Router {
    Router::new()
        .route(
            "/api/v1/analysis/students/:user_id",
            get(student_analysis_handler),
        )
        .route(
            "/api/v1/analysis/companies/:company_id",
            get(company_analysis_handler),
        )
        .route(
            "/api/v1/analysis/placements/export",
            get(placements_export_handler),
        )
        .with_state(service)
}

fn error_response(err: AnalysisServiceError) -> Response {
    let status = match &err {
        AnalysisServiceError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
        AnalysisServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        AnalysisServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        AnalysisServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, axum::Json(json!({ "error": err.to_string() }))).into_response()
}

pub(crate) async fn student_analysis_handler(
    State(service): State<Arc<AnalysisService>>,
    Path(user_id): Path<String>,
) -> Response {
    match service.student_analysis(&UserId(user_id)) {
        Ok(analysis) => (StatusCode::OK, axum::Json(analysis)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn company_analysis_handler(
    State(service): State<Arc<AnalysisService>>,
    Path(company_id): Path<String>,
) -> Response {
    match service.company_analysis(&CompanyId(company_id)) {
        Ok(analysis) => (StatusCode::OK, axum::Json(analysis)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn placements_export_handler(
    State(service): State<Arc<AnalysisService>>,
) -> Response {
    match service.placements_export() {
        Ok(report) => {
            let headers = [
                (header::CONTENT_TYPE, "text/csv".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"placements.csv\"".to_string(),
                ),
            ];
            (StatusCode::OK, headers, report).into_response()
        }
        Err(err) => error_response(err),
    }
}
