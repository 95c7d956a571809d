use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::directory::UserId;
use crate::storage::RepositoryError;

use super::domain::{NewNotice, NewReminder, NoticeId, NoticeUpdate, ReminderId};
use super::repository::NotifyRepository;
use super::service::{NotifyService, NotifyServiceError};

pub fn notify_router<R>(service: Arc<NotifyService<R>>) -> Router
where
    R: NotifyRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/notices",
            post(add_notice_handler::<R>).get(list_notices_handler::<R>),
        )
        .route(
            "/api/v1/notices/:notice_id",
            get(get_notice_handler::<R>)
                .put(update_notice_handler::<R>)
                .delete(delete_notice_handler::<R>),
        )
        .route(
            "/api/v1/reminders",
            post(add_reminder_handler::<R>).get(list_reminders_handler::<R>),
        )
        .route(
            "/api/v1/reminders/student/:user_id",
            get(reminders_for_student_handler::<R>),
        )
        .route(
            "/api/v1/reminders/:reminder_id",
            get(get_reminder_handler::<R>).delete(delete_reminder_handler::<R>),
        )
        .route(
            "/api/v1/reminders/:reminder_id/read",
            post(mark_reminder_read_handler::<R>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub struct ReadReceipt {
    pub student_id: String,
}

fn error_response(err: NotifyServiceError) -> Response {
    let status = match &err {
        NotifyServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        NotifyServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        NotifyServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({
        "error": err.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn add_notice_handler<R>(
    State(service): State<Arc<NotifyService<R>>>,
    axum::Json(new_notice): axum::Json<NewNotice>,
) -> Response
where
    R: NotifyRepository + 'static,
{
    match service.add_notice(new_notice) {
        Ok(notice) => (StatusCode::CREATED, axum::Json(notice)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn list_notices_handler<R>(
    State(service): State<Arc<NotifyService<R>>>,
) -> Response
where
    R: NotifyRepository + 'static,
{
    match service.list_notices() {
        Ok(notices) => (StatusCode::OK, axum::Json(notices)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn get_notice_handler<R>(
    State(service): State<Arc<NotifyService<R>>>,
    Path(notice_id): Path<String>,
) -> Response
where
    R: NotifyRepository + 'static,
{
    match service.get_notice(&NoticeId(notice_id)) {
        Ok(notice) => (StatusCode::OK, axum::Json(notice)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn update_notice_handler<R>(
    State(service): State<Arc<NotifyService<R>>>,
    Path(notice_id): Path<String>,
    axum::Json(update): axum::Json<NoticeUpdate>,
) -> Response
where
    R: NotifyRepository + 'static,
{
    match service.update_notice(&NoticeId(notice_id), update) {
        Ok(notice) => (StatusCode::OK, axum::Json(notice)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn delete_notice_handler<R>(
    State(service): State<Arc<NotifyService<R>>>,
    Path(notice_id): Path<String>,
) -> Response
where
    R: NotifyRepository + 'static,
{
    match service.delete_notice(&NoticeId(notice_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn add_reminder_handler<R>(
    State(service): State<Arc<NotifyService<R>>>,
    axum::Json(new_reminder): axum::Json<NewReminder>,
) -> Response
where
    R: NotifyRepository + 'static,
{
    match service.add_reminder(new_reminder) {
        Ok(reminder) => (StatusCode::CREATED, axum::Json(reminder)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn list_reminders_handler<R>(
    State(service): State<Arc<NotifyService<R>>>,
) -> Response
where
    R: NotifyRepository + 'static,
{
    match service.list_reminders() {
        Ok(reminders) => (StatusCode::OK, axum::Json(reminders)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn reminders_for_student_handler<R>(
    State(service): State<Arc<NotifyService<R>>>,
    Path(user_id): Path<String>,
) -> Response
where
    R: NotifyRepository + 'static,
{
    match service.reminders_for_student(&UserId(user_id)) {
        Ok(reminders) => (StatusCode::OK, axum::Json(reminders)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn get_reminder_handler<R>(
    State(service): State<Arc<NotifyService<R>>>,
    Path(reminder_id): Path<String>,
) -> Response
where
    R: NotifyRepository + 'static,
{
    match service.get_reminder(&ReminderId(reminder_id)) {
        Ok(reminder) => (StatusCode::OK, axum::Json(reminder)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn mark_reminder_read_handler<R>(
    State(service): State<Arc<NotifyService<R>>>,
    Path(reminder_id): Path<String>,
    axum::Json(receipt): axum::Json<ReadReceipt>,
) -> Response
where
    R: NotifyRepository + 'static,
{
    match service.mark_reminder_read(&ReminderId(reminder_id), &UserId(receipt.student_id)) {
        Ok(reminder) => (StatusCode::OK, axum::Json(reminder)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn delete_reminder_handler<R>(
    State(service): State<Arc<NotifyService<R>>>,
    Path(reminder_id): Path<String>,
) -> Response
where
    R: NotifyRepository + 'static,
{
    match service.delete_reminder(&ReminderId(reminder_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}
