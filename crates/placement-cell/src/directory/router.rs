use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::storage::RepositoryError;

use super::domain::{
    AlumniUpdate, CommunityPermissions, FacultyUpdate, NewAlumni, NewFaculty, NewStudent, NewUser,
    StudentUpdate, UserId, UserUpdate,
};
use super::mail::MailGateway;
use super::repository::DirectoryRepository;
use super::service::{DirectoryService, DirectoryServiceError};

/// Router builder exposing the account directory and the role satellites.
pub fn directory_router<R, M>(service: Arc<DirectoryService<R, M>>) -> Router
where
    R: DirectoryRepository + 'static,
    M: MailGateway + 'static,
{
    Router::new()
        .route("/api/v1/auth/login", post(login_handler::<R, M>))
        .route(
            "/api/v1/auth/reset-password",
            post(reset_password_handler::<R, M>),
        )
        .route(
            "/api/v1/users",
            post(add_user_handler::<R, M>).get(list_users_handler::<R, M>),
        )
        .route("/api/v1/users/search", get(search_users_handler::<R, M>))
        .route(
            "/api/v1/users/:user_id",
            get(get_user_handler::<R, M>)
                .put(update_user_handler::<R, M>)
                .delete(delete_user_handler::<R, M>),
        )
        .route(
            "/api/v1/users/:user_id/permissions",
            put(update_permissions_handler::<R, M>),
        )
        .route(
            "/api/v1/users/:user_id/restrictions",
            post(apply_restrictions_handler::<R, M>).delete(lift_restrictions_handler::<R, M>),
        )
        .route(
            "/api/v1/students",
            post(add_student_handler::<R, M>).get(list_students_handler::<R, M>),
        )
        .route(
            "/api/v1/students/:user_id",
            get(get_student_handler::<R, M>)
                .put(update_student_handler::<R, M>)
                .delete(delete_student_handler::<R, M>),
        )
        .route(
            "/api/v1/students/:user_id/migrate-to-alumni",
            post(migrate_student_handler::<R, M>),
        )
        .route(
            "/api/v1/faculty",
            post(add_faculty_handler::<R, M>).get(list_faculty_handler::<R, M>),
        )
        .route(
            "/api/v1/faculty/:user_id",
            get(get_faculty_handler::<R, M>)
                .put(update_faculty_handler::<R, M>)
                .delete(delete_faculty_handler::<R, M>),
        )
        .route(
            "/api/v1/alumni",
            post(add_alumni_handler::<R, M>).get(list_alumni_handler::<R, M>),
        )
        .route(
            "/api/v1/alumni/:user_id",
            get(get_alumni_handler::<R, M>)
                .put(update_alumni_handler::<R, M>)
                .delete(delete_alumni_handler::<R, M>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
pub struct RestrictionRequest {
    #[serde(default)]
    pub days: Option<i64>,
}

fn error_response(err: DirectoryServiceError) -> Response {
    let status = match &err {
        DirectoryServiceError::DuplicateEmail => StatusCode::CONFLICT,
        DirectoryServiceError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        DirectoryServiceError::InactiveAccount => StatusCode::FORBIDDEN,
        DirectoryServiceError::NotAStudent | DirectoryServiceError::Query(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        DirectoryServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        DirectoryServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({
        "error": err.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn login_handler<R, M>(
    State(service): State<Arc<DirectoryService<R, M>>>,
    axum::Json(request): axum::Json<LoginRequest>,
) -> Response
where
    R: DirectoryRepository + 'static,
    M: MailGateway + 'static,
{
    match service.login(&request.email, &request.password) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn reset_password_handler<R, M>(
    State(service): State<Arc<DirectoryService<R, M>>>,
    axum::Json(request): axum::Json<ResetPasswordRequest>,
) -> Response
where
    R: DirectoryRepository + 'static,
    M: MailGateway + 'static,
{
    match service.reset_password(&request.email, &request.new_password) {
        Ok(account) => (StatusCode::OK, axum::Json(account)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn add_user_handler<R, M>(
    State(service): State<Arc<DirectoryService<R, M>>>,
    axum::Json(new_user): axum::Json<NewUser>,
) -> Response
where
    R: DirectoryRepository + 'static,
    M: MailGateway + 'static,
{
    match service.add_user(new_user) {
        Ok(account) => (StatusCode::CREATED, axum::Json(account)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn list_users_handler<R, M>(
    State(service): State<Arc<DirectoryService<R, M>>>,
) -> Response
where
    R: DirectoryRepository + 'static,
    M: MailGateway + 'static,
{
    match service.list_users() {
        Ok(accounts) => (StatusCode::OK, axum::Json(accounts)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn search_users_handler<R, M>(
    State(service): State<Arc<DirectoryService<R, M>>>,
    Query(query): Query<SearchQuery>,
) -> Response
where
    R: DirectoryRepository + 'static,
    M: MailGateway + 'static,
{
    let acting_user = UserId(query.user_id);
    match service.search_users(&query.q, &acting_user) {
        Ok(matches) => (StatusCode::OK, axum::Json(matches)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn get_user_handler<R, M>(
    State(service): State<Arc<DirectoryService<R, M>>>,
    Path(user_id): Path<String>,
) -> Response
where
    R: DirectoryRepository + 'static,
    M: MailGateway + 'static,
{
    match service.get_user(&UserId(user_id)) {
        Ok(account) => (StatusCode::OK, axum::Json(account)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn update_user_handler<R, M>(
    State(service): State<Arc<DirectoryService<R, M>>>,
    Path(user_id): Path<String>,
    axum::Json(update): axum::Json<UserUpdate>,
) -> Response
where
    R: DirectoryRepository + 'static,
    M: MailGateway + 'static,
{
    match service.update_user(&UserId(user_id), update) {
        Ok(account) => (StatusCode::OK, axum::Json(account)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn delete_user_handler<R, M>(
    State(service): State<Arc<DirectoryService<R, M>>>,
    Path(user_id): Path<String>,
) -> Response
where
    R: DirectoryRepository + 'static,
    M: MailGateway + 'static,
{
    match service.delete_user(&UserId(user_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn update_permissions_handler<R, M>(
    State(service): State<Arc<DirectoryService<R, M>>>,
    Path(user_id): Path<String>,
    axum::Json(permissions): axum::Json<CommunityPermissions>,
) -> Response
where
    R: DirectoryRepository + 'static,
    M: MailGateway + 'static,
{
    match service.update_permissions(&UserId(user_id), permissions) {
        Ok(account) => (StatusCode::OK, axum::Json(account)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn apply_restrictions_handler<R, M>(
    State(service): State<Arc<DirectoryService<R, M>>>,
    Path(user_id): Path<String>,
    axum::Json(request): axum::Json<RestrictionRequest>,
) -> Response
where
    R: DirectoryRepository + 'static,
    M: MailGateway + 'static,
{
    match service.apply_restrictions(&UserId(user_id), request.days) {
        Ok(account) => (StatusCode::OK, axum::Json(account)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn lift_restrictions_handler<R, M>(
    State(service): State<Arc<DirectoryService<R, M>>>,
    Path(user_id): Path<String>,
) -> Response
where
    R: DirectoryRepository + 'static,
    M: MailGateway + 'static,
{
    match service.lift_restrictions(&UserId(user_id)) {
        Ok(account) => (StatusCode::OK, axum::Json(account)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn add_student_handler<R, M>(
    State(service): State<Arc<DirectoryService<R, M>>>,
    axum::Json(new_student): axum::Json<NewStudent>,
) -> Response
where
    R: DirectoryRepository + 'static,
    M: MailGateway + 'static,
{
    match service.add_student(new_student) {
        Ok(registration) => (StatusCode::CREATED, axum::Json(registration)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn list_students_handler<R, M>(
    State(service): State<Arc<DirectoryService<R, M>>>,
) -> Response
where
    R: DirectoryRepository + 'static,
    M: MailGateway + 'static,
{
    match service.list_students() {
        Ok(profiles) => (StatusCode::OK, axum::Json(profiles)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn get_student_handler<R, M>(
    State(service): State<Arc<DirectoryService<R, M>>>,
    Path(user_id): Path<String>,
) -> Response
where
    R: DirectoryRepository + 'static,
    M: MailGateway + 'static,
{
    match service.get_student(&UserId(user_id)) {
        Ok(profile) => (StatusCode::OK, axum::Json(profile)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn update_student_handler<R, M>(
    State(service): State<Arc<DirectoryService<R, M>>>,
    Path(user_id): Path<String>,
    axum::Json(update): axum::Json<StudentUpdate>,
) -> Response
where
    R: DirectoryRepository + 'static,
    M: MailGateway + 'static,
{
    match service.update_student(&UserId(user_id), update) {
        Ok(profile) => (StatusCode::OK, axum::Json(profile)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn delete_student_handler<R, M>(
    State(service): State<Arc<DirectoryService<R, M>>>,
    Path(user_id): Path<String>,
) -> Response
where
    R: DirectoryRepository + 'static,
    M: MailGateway + 'static,
{
    match service.delete_student(&UserId(user_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn migrate_student_handler<R, M>(
    State(service): State<Arc<DirectoryService<R, M>>>,
    Path(user_id): Path<String>,
) -> Response
where
    R: DirectoryRepository + 'static,
    M: MailGateway + 'static,
{
    match service.migrate_student_to_alumni(&UserId(user_id)) {
        Ok(migration) => (StatusCode::OK, axum::Json(migration)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn add_faculty_handler<R, M>(
    State(service): State<Arc<DirectoryService<R, M>>>,
    axum::Json(new_faculty): axum::Json<NewFaculty>,
) -> Response
where
    R: DirectoryRepository + 'static,
    M: MailGateway + 'static,
{
    match service.add_faculty(new_faculty) {
        Ok(registration) => (StatusCode::CREATED, axum::Json(registration)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn list_faculty_handler<R, M>(
    State(service): State<Arc<DirectoryService<R, M>>>,
) -> Response
where
    R: DirectoryRepository + 'static,
    M: MailGateway + 'static,
{
    match service.list_faculty() {
        Ok(profiles) => (StatusCode::OK, axum::Json(profiles)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn get_faculty_handler<R, M>(
    State(service): State<Arc<DirectoryService<R, M>>>,
    Path(user_id): Path<String>,
) -> Response
where
    R: DirectoryRepository + 'static,
    M: MailGateway + 'static,
{
    match service.get_faculty(&UserId(user_id)) {
        Ok(profile) => (StatusCode::OK, axum::Json(profile)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn update_faculty_handler<R, M>(
    State(service): State<Arc<DirectoryService<R, M>>>,
    Path(user_id): Path<String>,
    axum::Json(update): axum::Json<FacultyUpdate>,
) -> Response
where
    R: DirectoryRepository + 'static,
    M: MailGateway + 'static,
{
    match service.update_faculty(&UserId(user_id), update) {
        Ok(profile) => (StatusCode::OK, axum::Json(profile)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn delete_faculty_handler<R, M>(
    State(service): State<Arc<DirectoryService<R, M>>>,
    Path(user_id): Path<String>,
) -> Response
where
    R: DirectoryRepository + 'static,
    M: MailGateway + 'static,
{
    match service.delete_faculty(&UserId(user_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn add_alumni_handler<R, M>(
    State(service): State<Arc<DirectoryService<R, M>>>,
    axum::Json(new_alumni): axum::Json<NewAlumni>,
) -> Response
where
    R: DirectoryRepository + 'static,
    M: MailGateway + 'static,
{
    match service.add_alumni(new_alumni) {
        Ok(registration) => (StatusCode::CREATED, axum::Json(registration)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn list_alumni_handler<R, M>(
    State(service): State<Arc<DirectoryService<R, M>>>,
) -> Response
where
    R: DirectoryRepository + 'static,
    M: MailGateway + 'static,
{
    match service.list_alumni() {
        Ok(profiles) => (StatusCode::OK, axum::Json(profiles)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn get_alumni_handler<R, M>(
    State(service): State<Arc<DirectoryService<R, M>>>,
    Path(user_id): Path<String>,
) -> Response
where
    R: DirectoryRepository + 'static,
    M: MailGateway + 'static,
{
    match service.get_alumni(&UserId(user_id)) {
        Ok(profile) => (StatusCode::OK, axum::Json(profile)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn update_alumni_handler<R, M>(
    State(service): State<Arc<DirectoryService<R, M>>>,
    Path(user_id): Path<String>,
    axum::Json(update): axum::Json<AlumniUpdate>,
) -> Response
where
    R: DirectoryRepository + 'static,
    M: MailGateway + 'static,
{
    match service.update_alumni(&UserId(user_id), update) {
        Ok(profile) => (StatusCode::OK, axum::Json(profile)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn delete_alumni_handler<R, M>(
    State(service): State<Arc<DirectoryService<R, M>>>,
    Path(user_id): Path<String>,
) -> Response
where
    R: DirectoryRepository + 'static,
    M: MailGateway + 'static,
{
    match service.delete_alumni(&UserId(user_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}
