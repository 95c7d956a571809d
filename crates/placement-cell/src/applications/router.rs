use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde_json::json;

use crate::directory::UserId;
use crate::recruiting::{DriveId, JobId};
use crate::storage::RepositoryError;

use super::domain::{
    ApplicationFormId, ApplicationFormUpdate, DriveFormUpdate, JobApplicationId,
    NewApplicationForm, NewDriveForm, NewJobApplication, PrefillRequest, StatusChange,
};
use super::repository::ApplicationsRepository;
use super::service::{ApplicationsService, ApplicationsServiceError};

pub fn applications_router<R>(service: Arc<ApplicationsService<R>>) -> Router
where
    R: ApplicationsRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/applications",
            post(submit_application_handler::<R>).get(list_applications_handler::<R>),
        )
        .route(
            "/api/v1/applications/student/:user_id",
            get(applications_for_student_handler::<R>),
        )
        .route(
            "/api/v1/applications/job/:job_id",
            get(applications_for_job_handler::<R>),
        )
        .route(
            "/api/v1/applications/:application_id",
            get(get_application_handler::<R>).delete(delete_application_handler::<R>),
        )
        .route(
            "/api/v1/applications/:application_id/status",
            put(set_application_status_handler::<R>),
        )
        .route("/api/v1/application-forms", post(add_form_handler::<R>))
        .route(
            "/api/v1/application-forms/application/:application_id",
            get(form_for_application_handler::<R>),
        )
        .route(
            "/api/v1/application-forms/:form_id",
            get(get_form_handler::<R>)
                .put(update_form_handler::<R>)
                .delete(delete_form_handler::<R>),
        )
        .route("/api/v1/drive-forms", post(upsert_drive_form_handler::<R>))
        .route("/api/v1/drive-forms/prefill", post(prefill_handler::<R>))
        .route(
            "/api/v1/drive-forms/:drive_id",
            get(get_drive_form_handler::<R>)
                .put(update_drive_form_handler::<R>)
                .delete(delete_drive_form_handler::<R>),
        )
        .with_state(service)
}

fn error_response(err: ApplicationsServiceError) -> Response {
    let status = match &err {
        ApplicationsServiceError::AlreadyApplied => StatusCode::CONFLICT,
        ApplicationsServiceError::ResumeMissing => StatusCode::UNPROCESSABLE_ENTITY,
        ApplicationsServiceError::Prefill(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ApplicationsServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ApplicationsServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        ApplicationsServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({
        "error": err.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn submit_application_handler<R>(
    State(service): State<Arc<ApplicationsService<R>>>,
    axum::Json(new_application): axum::Json<NewJobApplication>,
) -> Response
where
    R: ApplicationsRepository + 'static,
{
    match service.submit_application(new_application) {
        Ok(application) => (StatusCode::CREATED, axum::Json(application)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn list_applications_handler<R>(
    State(service): State<Arc<ApplicationsService<R>>>,
) -> Response
where
    R: ApplicationsRepository + 'static,
{
    match service.list_applications() {
        Ok(applications) => (StatusCode::OK, axum::Json(applications)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn applications_for_student_handler<R>(
    State(service): State<Arc<ApplicationsService<R>>>,
    Path(user_id): Path<String>,
) -> Response
where
    R: ApplicationsRepository + 'static,
{
    match service.applications_for_student(&UserId(user_id)) {
        Ok(applications) => (StatusCode::OK, axum::Json(applications)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn applications_for_job_handler<R>(
    State(service): State<Arc<ApplicationsService<R>>>,
    Path(job_id): Path<String>,
) -> Response
where
    R: ApplicationsRepository + 'static,
{
    match service.applications_for_job(&JobId(job_id)) {
        Ok(applications) => (StatusCode::OK, axum::Json(applications)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn get_application_handler<R>(
    State(service): State<Arc<ApplicationsService<R>>>,
    Path(application_id): Path<String>,
) -> Response
where
    R: ApplicationsRepository + 'static,
{
    match service.get_application(&JobApplicationId(application_id)) {
        Ok(application) => (StatusCode::OK, axum::Json(application)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn delete_application_handler<R>(
    State(service): State<Arc<ApplicationsService<R>>>,
    Path(application_id): Path<String>,
) -> Response
where
    R: ApplicationsRepository + 'static,
{
    match service.delete_application(&JobApplicationId(application_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn set_application_status_handler<R>(
    State(service): State<Arc<ApplicationsService<R>>>,
    Path(application_id): Path<String>,
    axum::Json(change): axum::Json<StatusChange>,
) -> Response
where
    R: ApplicationsRepository + 'static,
{
    match service.set_application_status(&JobApplicationId(application_id), change.status) {
        Ok(application) => (StatusCode::OK, axum::Json(application)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn add_form_handler<R>(
    State(service): State<Arc<ApplicationsService<R>>>,
    axum::Json(new_form): axum::Json<NewApplicationForm>,
) -> Response
where
    R: ApplicationsRepository + 'static,
{
    match service.add_form(new_form) {
        Ok(form) => (StatusCode::CREATED, axum::Json(form)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn form_for_application_handler<R>(
    State(service): State<Arc<ApplicationsService<R>>>,
    Path(application_id): Path<String>,
) -> Response
where
    R: ApplicationsRepository + 'static,
{
    match service.form_for_application(&JobApplicationId(application_id)) {
        Ok(form) => (StatusCode::OK, axum::Json(form)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn get_form_handler<R>(
    State(service): State<Arc<ApplicationsService<R>>>,
    Path(form_id): Path<String>,
) -> Response
where
    R: ApplicationsRepository + 'static,
{
    match service.get_form(&ApplicationFormId(form_id)) {
        Ok(form) => (StatusCode::OK, axum::Json(form)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn update_form_handler<R>(
    State(service): State<Arc<ApplicationsService<R>>>,
    Path(form_id): Path<String>,
    axum::Json(update): axum::Json<ApplicationFormUpdate>,
) -> Response
where
    R: ApplicationsRepository + 'static,
{
    match service.update_form(&ApplicationFormId(form_id), update) {
        Ok(form) => (StatusCode::OK, axum::Json(form)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn delete_form_handler<R>(
    State(service): State<Arc<ApplicationsService<R>>>,
    Path(form_id): Path<String>,
) -> Response
where
    R: ApplicationsRepository + 'static,
{
    match service.delete_form(&ApplicationFormId(form_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn upsert_drive_form_handler<R>(
    State(service): State<Arc<ApplicationsService<R>>>,
    axum::Json(new_form): axum::Json<NewDriveForm>,
) -> Response
where
    R: ApplicationsRepository + 'static,
{
    match service.upsert_drive_form(new_form) {
        Ok(form) => (StatusCode::CREATED, axum::Json(form)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn prefill_handler<R>(
    State(service): State<Arc<ApplicationsService<R>>>,
    axum::Json(request): axum::Json<PrefillRequest>,
) -> Response
where
    R: ApplicationsRepository + 'static,
{
    match service.prefill_for_student(&request.student_id, &request.form_url, &request.form_html) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn get_drive_form_handler<R>(
    State(service): State<Arc<ApplicationsService<R>>>,
    Path(drive_id): Path<String>,
) -> Response
where
    R: ApplicationsRepository + 'static,
{
    match service.drive_form_for_drive(&DriveId(drive_id)) {
        Ok(form) => (StatusCode::OK, axum::Json(form)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn update_drive_form_handler<R>(
    State(service): State<Arc<ApplicationsService<R>>>,
    Path(drive_id): Path<String>,
    axum::Json(update): axum::Json<DriveFormUpdate>,
) -> Response
where
    R: ApplicationsRepository + 'static,
{
    match service.update_drive_form(&DriveId(drive_id), update) {
        Ok(form) => (StatusCode::OK, axum::Json(form)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn delete_drive_form_handler<R>(
    State(service): State<Arc<ApplicationsService<R>>>,
    Path(drive_id): Path<String>,
) -> Response
where
    R: ApplicationsRepository + 'static,
{
    match service.delete_drive_form(&DriveId(drive_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}
