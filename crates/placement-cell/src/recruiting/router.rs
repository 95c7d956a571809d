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

use crate::directory::UserId;
use crate::storage::RepositoryError;

use super::domain::{
    CompanyId, CompanyUpdate, DriveId, DriveUpdate, JobId, JobUpdate, NewCompany, NewDrive, NewJob,
    NewRequirement, RequirementId, RequirementUpdate,
};
use super::repository::RecruitingRepository;
use super::service::{RecruitingService, RecruitingServiceError};

/// Router builder for companies, drives, jobs, and requirements.
pub fn recruiting_router<R>(service: Arc<RecruitingService<R>>) -> Router
where
    R: RecruitingRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/companies",
            post(add_company_handler::<R>).get(list_companies_handler::<R>),
        )
        .route(
            "/api/v1/companies/:company_id",
            get(get_company_handler::<R>)
                .put(update_company_handler::<R>)
                .delete(delete_company_handler::<R>),
        )
        .route(
            "/api/v1/drives",
            post(add_drive_handler::<R>).get(list_drives_handler::<R>),
        )
        .route(
            "/api/v1/drives/:drive_id",
            get(get_drive_handler::<R>)
                .put(update_drive_handler::<R>)
                .delete(delete_drive_handler::<R>),
        )
        .route(
            "/api/v1/drives/:drive_id/expanded",
            get(expand_drive_handler::<R>),
        )
        .route(
            "/api/v1/drives/:drive_id/publish",
            post(publish_drive_handler::<R>),
        )
        .route("/api/v1/drives/:drive_id/jobs", get(jobs_by_drive_handler::<R>))
        .route(
            "/api/v1/jobs",
            post(add_job_handler::<R>).get(list_jobs_handler::<R>),
        )
        .route(
            "/api/v1/jobs/:job_id",
            get(get_job_handler::<R>)
                .put(update_job_handler::<R>)
                .delete(delete_job_handler::<R>),
        )
        .route(
            "/api/v1/jobs/:job_id/eligible-students",
            get(eligible_students_handler::<R>)
                .put(set_eligible_students_handler::<R>)
                .post(refresh_eligible_students_handler::<R>),
        )
        .route("/api/v1/jobs/:job_id/stages", put(update_stages_handler::<R>))
        .route(
            "/api/v1/jobs/:job_id/selected",
            put(confirm_selected_handler::<R>),
        )
        .route("/api/v1/jobs/:job_id/apply", post(apply_to_job_handler::<R>))
        .route(
            "/api/v1/jobs/:job_id/requirement",
            get(requirement_for_job_handler::<R>),
        )
        .route("/api/v1/requirements", post(upsert_requirement_handler::<R>))
        .route(
            "/api/v1/requirements/:requirement_id",
            get(get_requirement_handler::<R>)
                .put(update_requirement_handler::<R>)
                .delete(delete_requirement_handler::<R>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub struct StudentListPayload {
    pub students: Vec<String>,
}

impl StudentListPayload {
    fn into_ids(self) -> Vec<UserId> {
        self.students.into_iter().map(UserId).collect()
    }
}

#[derive(Debug, Deserialize)]
pub struct StageListPayload {
    pub stages: Vec<Vec<String>>,
}

impl StageListPayload {
    fn into_ids(self) -> Vec<Vec<UserId>> {
        self.stages
            .into_iter()
            .map(|stage| stage.into_iter().map(UserId).collect())
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub struct ApplyPayload {
    pub student_id: String,
}

fn error_response(err: RecruitingServiceError) -> Response {
    let status = match &err {
        RecruitingServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        RecruitingServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        RecruitingServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({
        "error": err.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn add_company_handler<R>(
    State(service): State<Arc<RecruitingService<R>>>,
    axum::Json(new_company): axum::Json<NewCompany>,
) -> Response
where
    R: RecruitingRepository + 'static,
{
    match service.add_company(new_company) {
        Ok(company) => (StatusCode::CREATED, axum::Json(company)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn list_companies_handler<R>(
    State(service): State<Arc<RecruitingService<R>>>,
) -> Response
where
    R: RecruitingRepository + 'static,
{
    match service.list_companies() {
        Ok(companies) => (StatusCode::OK, axum::Json(companies)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn get_company_handler<R>(
    State(service): State<Arc<RecruitingService<R>>>,
    Path(company_id): Path<String>,
) -> Response
where
    R: RecruitingRepository + 'static,
{
    match service.get_company(&CompanyId(company_id)) {
        Ok(company) => (StatusCode::OK, axum::Json(company)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn update_company_handler<R>(
    State(service): State<Arc<RecruitingService<R>>>,
    Path(company_id): Path<String>,
    axum::Json(update): axum::Json<CompanyUpdate>,
) -> Response
where
    R: RecruitingRepository + 'static,
{
    match service.update_company(&CompanyId(company_id), update) {
        Ok(company) => (StatusCode::OK, axum::Json(company)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn delete_company_handler<R>(
    State(service): State<Arc<RecruitingService<R>>>,
    Path(company_id): Path<String>,
) -> Response
where
    R: RecruitingRepository + 'static,
{
    match service.delete_company(&CompanyId(company_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn add_drive_handler<R>(
    State(service): State<Arc<RecruitingService<R>>>,
    axum::Json(new_drive): axum::Json<NewDrive>,
) -> Response
where
    R: RecruitingRepository + 'static,
{
    match service.add_drive(new_drive) {
        Ok(drive) => (StatusCode::CREATED, axum::Json(drive)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn list_drives_handler<R>(
    State(service): State<Arc<RecruitingService<R>>>,
) -> Response
where
    R: RecruitingRepository + 'static,
{
    match service.list_drives() {
        Ok(drives) => (StatusCode::OK, axum::Json(drives)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn get_drive_handler<R>(
    State(service): State<Arc<RecruitingService<R>>>,
    Path(drive_id): Path<String>,
) -> Response
where
    R: RecruitingRepository + 'static,
{
    match service.get_drive(&DriveId(drive_id)) {
        Ok(drive) => (StatusCode::OK, axum::Json(drive)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn expand_drive_handler<R>(
    State(service): State<Arc<RecruitingService<R>>>,
    Path(drive_id): Path<String>,
) -> Response
where
    R: RecruitingRepository + 'static,
{
    match service.expand_drive(&DriveId(drive_id)) {
        Ok(detail) => (StatusCode::OK, axum::Json(detail)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn publish_drive_handler<R>(
    State(service): State<Arc<RecruitingService<R>>>,
    Path(drive_id): Path<String>,
) -> Response
where
    R: RecruitingRepository + 'static,
{
    match service.publish_drive(&DriveId(drive_id)) {
        Ok(drive) => (StatusCode::OK, axum::Json(drive)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn jobs_by_drive_handler<R>(
    State(service): State<Arc<RecruitingService<R>>>,
    Path(drive_id): Path<String>,
) -> Response
where
    R: RecruitingRepository + 'static,
{
    match service.jobs_by_drive(&DriveId(drive_id)) {
        Ok(jobs) => (StatusCode::OK, axum::Json(jobs)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn update_drive_handler<R>(
    State(service): State<Arc<RecruitingService<R>>>,
    Path(drive_id): Path<String>,
    axum::Json(update): axum::Json<DriveUpdate>,
) -> Response
where
    R: RecruitingRepository + 'static,
{
    match service.update_drive(&DriveId(drive_id), update) {
        Ok(drive) => (StatusCode::OK, axum::Json(drive)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn delete_drive_handler<R>(
    State(service): State<Arc<RecruitingService<R>>>,
    Path(drive_id): Path<String>,
) -> Response
where
    R: RecruitingRepository + 'static,
{
    match service.delete_drive(&DriveId(drive_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn add_job_handler<R>(
    State(service): State<Arc<RecruitingService<R>>>,
    axum::Json(new_job): axum::Json<NewJob>,
) -> Response
where
    R: RecruitingRepository + 'static,
{
    match service.add_job(new_job) {
        Ok(job) => (StatusCode::CREATED, axum::Json(job)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn list_jobs_handler<R>(
    State(service): State<Arc<RecruitingService<R>>>,
) -> Response
where
    R: RecruitingRepository + 'static,
{
    match service.list_jobs() {
        Ok(jobs) => (StatusCode::OK, axum::Json(jobs)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn get_job_handler<R>(
    State(service): State<Arc<RecruitingService<R>>>,
    Path(job_id): Path<String>,
) -> Response
where
    R: RecruitingRepository + 'static,
{
    match service.get_job(&JobId(job_id)) {
        Ok(job) => (StatusCode::OK, axum::Json(job)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn update_job_handler<R>(
    State(service): State<Arc<RecruitingService<R>>>,
    Path(job_id): Path<String>,
    axum::Json(update): axum::Json<JobUpdate>,
) -> Response
where
    R: RecruitingRepository + 'static,
{
    match service.update_job(&JobId(job_id), update) {
        Ok(job) => (StatusCode::OK, axum::Json(job)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn delete_job_handler<R>(
    State(service): State<Arc<RecruitingService<R>>>,
    Path(job_id): Path<String>,
) -> Response
where
    R: RecruitingRepository + 'static,
{
    match service.delete_job(&JobId(job_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn eligible_students_handler<R>(
    State(service): State<Arc<RecruitingService<R>>>,
    Path(job_id): Path<String>,
) -> Response
where
    R: RecruitingRepository + 'static,
{
    match service.eligible_students(&JobId(job_id)) {
        Ok(students) => (StatusCode::OK, axum::Json(students)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn set_eligible_students_handler<R>(
    State(service): State<Arc<RecruitingService<R>>>,
    Path(job_id): Path<String>,
    axum::Json(payload): axum::Json<StudentListPayload>,
) -> Response
where
    R: RecruitingRepository + 'static,
{
    match service.set_eligible_students(&JobId(job_id), payload.into_ids()) {
        Ok(job) => (StatusCode::OK, axum::Json(job)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn refresh_eligible_students_handler<R>(
    State(service): State<Arc<RecruitingService<R>>>,
    Path(job_id): Path<String>,
) -> Response
where
    R: RecruitingRepository + 'static,
{
    match service.refresh_eligible_students(&JobId(job_id)) {
        Ok(job) => (StatusCode::OK, axum::Json(job)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn update_stages_handler<R>(
    State(service): State<Arc<RecruitingService<R>>>,
    Path(job_id): Path<String>,
    axum::Json(payload): axum::Json<StageListPayload>,
) -> Response
where
    R: RecruitingRepository + 'static,
{
    match service.update_stage_students(&JobId(job_id), payload.into_ids()) {
        Ok(job) => (StatusCode::OK, axum::Json(job)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn confirm_selected_handler<R>(
    State(service): State<Arc<RecruitingService<R>>>,
    Path(job_id): Path<String>,
    axum::Json(payload): axum::Json<StudentListPayload>,
) -> Response
where
    R: RecruitingRepository + 'static,
{
    match service.confirm_selected_students(&JobId(job_id), payload.into_ids()) {
        Ok(job) => (StatusCode::OK, axum::Json(job)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn apply_to_job_handler<R>(
    State(service): State<Arc<RecruitingService<R>>>,
    Path(job_id): Path<String>,
    axum::Json(payload): axum::Json<ApplyPayload>,
) -> Response
where
    R: RecruitingRepository + 'static,
{
    match service.apply_to_job(&JobId(job_id), &UserId(payload.student_id)) {
        Ok(job) => (StatusCode::OK, axum::Json(job)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn requirement_for_job_handler<R>(
    State(service): State<Arc<RecruitingService<R>>>,
    Path(job_id): Path<String>,
) -> Response
where
    R: RecruitingRepository + 'static,
{
    match service.requirement_for_job(&JobId(job_id)) {
        Ok(requirement) => (StatusCode::OK, axum::Json(requirement)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn upsert_requirement_handler<R>(
    State(service): State<Arc<RecruitingService<R>>>,
    axum::Json(new_requirement): axum::Json<NewRequirement>,
) -> Response
where
    R: RecruitingRepository + 'static,
{
    match service.upsert_requirement(new_requirement) {
        Ok(requirement) => (StatusCode::CREATED, axum::Json(requirement)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn get_requirement_handler<R>(
    State(service): State<Arc<RecruitingService<R>>>,
    Path(requirement_id): Path<String>,
) -> Response
where
    R: RecruitingRepository + 'static,
{
    match service.get_requirement(&RequirementId(requirement_id)) {
        Ok(requirement) => (StatusCode::OK, axum::Json(requirement)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn update_requirement_handler<R>(
    State(service): State<Arc<RecruitingService<R>>>,
    Path(requirement_id): Path<String>,
    axum::Json(update): axum::Json<RequirementUpdate>,
) -> Response
where
    R: RecruitingRepository + 'static,
{
    match service.update_requirement(&RequirementId(requirement_id), update) {
        Ok(requirement) => (StatusCode::OK, axum::Json(requirement)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn delete_requirement_handler<R>(
    State(service): State<Arc<RecruitingService<R>>>,
    Path(requirement_id): Path<String>,
) -> Response
where
    R: RecruitingRepository + 'static,
{
    match service.delete_requirement(&RequirementId(requirement_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}
