use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use crate::directory::UserId;
use crate::storage::RepositoryError;

use super::domain::{NewPerformance, NewResume, PerformanceUpdate, ResumeId, ResumeUpdate};
use super::repository::RecordsRepository;
use super::service::{RecordsService, RecordsServiceError};

pub fn records_router<R>(service: Arc<RecordsService<R>>) -> Router
where
    R: RecordsRepository + 'static,
{
    Router::new()
        .route("/api/v1/resumes", post(add_resume_handler::<R>))
        .route(
            "/api/v1/resumes/student/:user_id",
            get(resumes_for_student_handler::<R>),
        )
        .route(
            "/api/v1/resumes/:resume_id",
            get(get_resume_handler::<R>)
                .put(update_resume_handler::<R>)
                .delete(delete_resume_handler::<R>),
        )
        .route(
            "/api/v1/resumes/:resume_id/download",
            get(download_resume_handler::<R>),
        )
        .route(
            "/api/v1/performance",
            post(upsert_performance_handler::<R>).get(list_performances_handler::<R>),
        )
        .route(
            "/api/v1/performance/:user_id",
            get(get_performance_handler::<R>)
                .put(update_performance_handler::<R>)
                .delete(delete_performance_handler::<R>),
        )
        .with_state(service)
}

fn error_response(err: RecordsServiceError) -> Response {
    let status = match &err {
        RecordsServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        RecordsServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        RecordsServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({
        "error": err.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn add_resume_handler<R>(
    State(service): State<Arc<RecordsService<R>>>,
    axum::Json(new_resume): axum::Json<NewResume>,
) -> Response
where
    R: RecordsRepository + 'static,
{
    match service.add_resume(new_resume) {
        Ok(resume) => (StatusCode::CREATED, axum::Json(resume)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn get_resume_handler<R>(
    State(service): State<Arc<RecordsService<R>>>,
    Path(resume_id): Path<String>,
) -> Response
where
    R: RecordsRepository + 'static,
{
    match service.get_resume(&ResumeId(resume_id)) {
        Ok(resume) => (StatusCode::OK, axum::Json(resume)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn resumes_for_student_handler<R>(
    State(service): State<Arc<RecordsService<R>>>,
    Path(user_id): Path<String>,
) -> Response
where
    R: RecordsRepository + 'static,
{
    match service.resumes_for_student(&UserId(user_id)) {
        Ok(resumes) => (StatusCode::OK, axum::Json(resumes)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn update_resume_handler<R>(
    State(service): State<Arc<RecordsService<R>>>,
    Path(resume_id): Path<String>,
    axum::Json(update): axum::Json<ResumeUpdate>,
) -> Response
where
    R: RecordsRepository + 'static,
{
    match service.update_resume(&ResumeId(resume_id), update) {
        Ok(resume) => (StatusCode::OK, axum::Json(resume)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn delete_resume_handler<R>(
    State(service): State<Arc<RecordsService<R>>>,
    Path(resume_id): Path<String>,
) -> Response
where
    R: RecordsRepository + 'static,
{
    match service.delete_resume(&ResumeId(resume_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn download_resume_handler<R>(
    State(service): State<Arc<RecordsService<R>>>,
    Path(resume_id): Path<String>,
) -> Response
where
    R: RecordsRepository + 'static,
{
    match service.download_resume(&ResumeId(resume_id)) {
        Ok(download) => {
            let headers = [
                (header::CONTENT_TYPE, download.content_type.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", download.filename),
                ),
            ];
            (StatusCode::OK, headers, download.body).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn upsert_performance_handler<R>(
    State(service): State<Arc<RecordsService<R>>>,
    axum::Json(new_performance): axum::Json<NewPerformance>,
) -> Response
where
    R: RecordsRepository + 'static,
{
    match service.upsert_performance(new_performance) {
        Ok(performance) => (StatusCode::CREATED, axum::Json(performance)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn list_performances_handler<R>(
    State(service): State<Arc<RecordsService<R>>>,
) -> Response
where
    R: RecordsRepository + 'static,
{
    match service.list_performances() {
        Ok(performances) => (StatusCode::OK, axum::Json(performances)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn get_performance_handler<R>(
    State(service): State<Arc<RecordsService<R>>>,
    Path(user_id): Path<String>,
) -> Response
where
    R: RecordsRepository + 'static,
{
    match service.performance_for_student(&UserId(user_id)) {
        Ok(performance) => (StatusCode::OK, axum::Json(performance)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn update_performance_handler<R>(
    State(service): State<Arc<RecordsService<R>>>,
    Path(user_id): Path<String>,
    axum::Json(update): axum::Json<PerformanceUpdate>,
) -> Response
where
    R: RecordsRepository + 'static,
{
    match service.update_performance(&UserId(user_id), update) {
        Ok(performance) => (StatusCode::OK, axum::Json(performance)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn delete_performance_handler<R>(
    State(service): State<Arc<RecordsService<R>>>,
    Path(user_id): Path<String>,
) -> Response
where
    R: RecordsRepository + 'static,
{
    match service.delete_performance(&UserId(user_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}
