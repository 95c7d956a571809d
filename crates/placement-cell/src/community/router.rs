use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::directory::UserId;
use crate::storage::RepositoryError;

use super::domain::{
    CommentId, ConversationId, ConversationRequest, ModerationAction, NewComment, NewMessage,
    NewPost, NewReport, PostId, ReportId, ReportResolution, ReportStatus, VoteRequest,
};
use super::repository::CommunityRepository;
use super::service::{CommunityService, CommunityServiceError};

pub fn community_router<R>(service: Arc<CommunityService<R>>) -> Router
where
    R: CommunityRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/community/posts",
            post(create_post_handler::<R>).get(list_posts_handler::<R>),
        )
        .route(
            "/api/v1/community/posts/:post_id",
            get(get_post_handler::<R>).delete(delete_post_handler::<R>),
        )
        .route(
            "/api/v1/community/posts/:post_id/votes",
            put(vote_handler::<R>).get(vote_status_handler::<R>),
        )
        .route(
            "/api/v1/community/posts/:post_id/comments",
            post(add_comment_handler::<R>).get(list_comments_handler::<R>),
        )
        .route(
            "/api/v1/community/comments/:comment_id",
            delete(delete_comment_handler::<R>),
        )
        .route(
            "/api/v1/community/reports",
            post(create_report_handler::<R>).get(list_reports_handler::<R>),
        )
        .route(
            "/api/v1/community/reports/:report_id",
            put(resolve_report_handler::<R>),
        )
        .route(
            "/api/v1/community/moderation/pending",
            get(pending_posts_handler::<R>),
        )
        .route(
            "/api/v1/community/moderation/posts/:post_id/approve",
            put(approve_post_handler::<R>),
        )
        .route(
            "/api/v1/community/moderation/posts/:post_id",
            delete(reject_post_handler::<R>),
        )
        .route(
            "/api/v1/community/conversations",
            post(open_conversation_handler::<R>).get(list_conversations_handler::<R>),
        )
        .route(
            "/api/v1/community/conversations/:conversation_id/messages",
            post(send_message_handler::<R>).get(list_messages_handler::<R>),
        )
        .with_state(service)
}

/// Optional viewer for feed reads; absent means an anonymous, non-admin
/// view.
#[derive(Debug, Deserialize)]
pub struct ViewerQuery {
    pub viewer_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ActorQuery {
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ReportsQuery {
    pub user_id: String,
    pub status: Option<ReportStatus>,
}

fn error_response(err: CommunityServiceError) -> Response {
    let status = match &err {
        CommunityServiceError::PostingBlocked
        | CommunityServiceError::CommentingBlocked
        | CommunityServiceError::MessagingBlocked
        | CommunityServiceError::NotAuthor
        | CommunityServiceError::AdminRequired
        | CommunityServiceError::NotParticipant => StatusCode::FORBIDDEN,
        CommunityServiceError::SelfConversation | CommunityServiceError::InvalidResolution => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        CommunityServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        CommunityServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        CommunityServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({
        "error": err.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}

fn viewer_of(query: &ViewerQuery) -> Option<UserId> {
    query.viewer_id.clone().map(UserId)
}

pub(crate) async fn create_post_handler<R>(
    State(service): State<Arc<CommunityService<R>>>,
    axum::Json(new_post): axum::Json<NewPost>,
) -> Response
where
    R: CommunityRepository + 'static,
{
    match service.create_post(new_post) {
        Ok(created) => (StatusCode::CREATED, axum::Json(created)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn list_posts_handler<R>(
    State(service): State<Arc<CommunityService<R>>>,
    Query(query): Query<ViewerQuery>,
) -> Response
where
    R: CommunityRepository + 'static,
{
    match service.list_posts(viewer_of(&query).as_ref()) {
        Ok(posts) => (StatusCode::OK, axum::Json(posts)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn get_post_handler<R>(
    State(service): State<Arc<CommunityService<R>>>,
    Path(post_id): Path<String>,
    Query(query): Query<ViewerQuery>,
) -> Response
where
    R: CommunityRepository + 'static,
{
    match service.get_post(&PostId(post_id), viewer_of(&query).as_ref()) {
        Ok(found) => (StatusCode::OK, axum::Json(found)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn delete_post_handler<R>(
    State(service): State<Arc<CommunityService<R>>>,
    Path(post_id): Path<String>,
    Query(query): Query<ActorQuery>,
) -> Response
where
    R: CommunityRepository + 'static,
{
    match service.delete_post(&PostId(post_id), &UserId(query.user_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn vote_handler<R>(
    State(service): State<Arc<CommunityService<R>>>,
    Path(post_id): Path<String>,
    axum::Json(request): axum::Json<VoteRequest>,
) -> Response
where
    R: CommunityRepository + 'static,
{
    match service.vote(&PostId(post_id), &request.user_id) {
        Ok(result) => (StatusCode::OK, axum::Json(result)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn vote_status_handler<R>(
    State(service): State<Arc<CommunityService<R>>>,
    Path(post_id): Path<String>,
    Query(query): Query<ActorQuery>,
) -> Response
where
    R: CommunityRepository + 'static,
{
    match service.vote_status(&PostId(post_id), &UserId(query.user_id)) {
        Ok(status) => (StatusCode::OK, axum::Json(status)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn add_comment_handler<R>(
    State(service): State<Arc<CommunityService<R>>>,
    Path(post_id): Path<String>,
    axum::Json(new_comment): axum::Json<NewComment>,
) -> Response
where
    R: CommunityRepository + 'static,
{
    match service.add_comment(&PostId(post_id), new_comment) {
        Ok(created) => (StatusCode::CREATED, axum::Json(created)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn list_comments_handler<R>(
    State(service): State<Arc<CommunityService<R>>>,
    Path(post_id): Path<String>,
    Query(query): Query<ViewerQuery>,
) -> Response
where
    R: CommunityRepository + 'static,
{
    match service.comments_for_post(&PostId(post_id), viewer_of(&query).as_ref()) {
        Ok(comments) => (StatusCode::OK, axum::Json(comments)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn delete_comment_handler<R>(
    State(service): State<Arc<CommunityService<R>>>,
    Path(comment_id): Path<String>,
    Query(query): Query<ActorQuery>,
) -> Response
where
    R: CommunityRepository + 'static,
{
    match service.delete_comment(&CommentId(comment_id), &UserId(query.user_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn create_report_handler<R>(
    State(service): State<Arc<CommunityService<R>>>,
    axum::Json(new_report): axum::Json<NewReport>,
) -> Response
where
    R: CommunityRepository + 'static,
{
    match service.report(new_report) {
        Ok(created) => (StatusCode::CREATED, axum::Json(created)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn list_reports_handler<R>(
    State(service): State<Arc<CommunityService<R>>>,
    Query(query): Query<ReportsQuery>,
) -> Response
where
    R: CommunityRepository + 'static,
{
    match service.list_reports(&UserId(query.user_id), query.status) {
        Ok(reports) => (StatusCode::OK, axum::Json(reports)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn resolve_report_handler<R>(
    State(service): State<Arc<CommunityService<R>>>,
    Path(report_id): Path<String>,
    axum::Json(resolution): axum::Json<ReportResolution>,
) -> Response
where
    R: CommunityRepository + 'static,
{
    match service.resolve_report(&ReportId(report_id), &resolution.user_id, resolution.status) {
        Ok(resolved) => (StatusCode::OK, axum::Json(resolved)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn pending_posts_handler<R>(
    State(service): State<Arc<CommunityService<R>>>,
    Query(query): Query<ActorQuery>,
) -> Response
where
    R: CommunityRepository + 'static,
{
    match service.pending_posts(&UserId(query.user_id)) {
        Ok(posts) => (StatusCode::OK, axum::Json(posts)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn approve_post_handler<R>(
    State(service): State<Arc<CommunityService<R>>>,
    Path(post_id): Path<String>,
    axum::Json(action): axum::Json<ModerationAction>,
) -> Response
where
    R: CommunityRepository + 'static,
{
    match service.approve_post(&PostId(post_id), &action.user_id) {
        Ok(approved) => (StatusCode::OK, axum::Json(approved)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn reject_post_handler<R>(
    State(service): State<Arc<CommunityService<R>>>,
    Path(post_id): Path<String>,
    Query(query): Query<ActorQuery>,
) -> Response
where
    R: CommunityRepository + 'static,
{
    match service.reject_post(&PostId(post_id), &UserId(query.user_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn open_conversation_handler<R>(
    State(service): State<Arc<CommunityService<R>>>,
    axum::Json(request): axum::Json<ConversationRequest>,
) -> Response
where
    R: CommunityRepository + 'static,
{
    match service.find_or_create_conversation(&request.user_id, &request.peer_id) {
        Ok(conversation) => (StatusCode::OK, axum::Json(conversation)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn list_conversations_handler<R>(
    State(service): State<Arc<CommunityService<R>>>,
    Query(query): Query<ActorQuery>,
) -> Response
where
    R: CommunityRepository + 'static,
{
    match service.conversations_for_user(&UserId(query.user_id)) {
        Ok(conversations) => (StatusCode::OK, axum::Json(conversations)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn send_message_handler<R>(
    State(service): State<Arc<CommunityService<R>>>,
    Path(conversation_id): Path<String>,
    axum::Json(new_message): axum::Json<NewMessage>,
) -> Response
where
    R: CommunityRepository + 'static,
{
    match service.send_message(&ConversationId(conversation_id), new_message) {
        Ok(sent) => (StatusCode::CREATED, axum::Json(sent)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn list_messages_handler<R>(
    State(service): State<Arc<CommunityService<R>>>,
    Path(conversation_id): Path<String>,
    Query(query): Query<ActorQuery>,
) -> Response
where
    R: CommunityRepository + 'static,
{
    let conversation_id = ConversationId(conversation_id);
    match service.messages_for_conversation(&conversation_id, &UserId(query.user_id)) {
        Ok(messages) => (StatusCode::OK, axum::Json(messages)).into_response(),
        Err(err) => error_response(err),
    }
}
