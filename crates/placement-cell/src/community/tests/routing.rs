use super::common::*;
use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use crate::community::{NewReport, ReportItemType};

async fn post_json(
    router: axum::Router,
    uri: &str,
    body: serde_json::Value,
) -> axum::response::Response {
    router
        .oneshot(
            axum::http::Request::post(uri)
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
        )
        .await
        .expect("route executes")
}

async fn put_json(
    router: axum::Router,
    uri: &str,
    body: serde_json::Value,
) -> axum::response::Response {
    router
        .oneshot(
            axum::http::Request::put(uri)
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
        )
        .await
        .expect("route executes")
}

async fn get(router: axum::Router, uri: &str) -> axum::response::Response {
    router
        .oneshot(
            axum::http::Request::get(uri)
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes")
}

#[tokio::test]
async fn post_creation_route_returns_created() {
    let (service, directory) = build_service();
    let member = seed_member(&directory, "usr-400001");

    let response = post_json(
        router_with_service(service),
        "/api/v1/community/posts",
        serde_json::to_value(text_post(&member, "Hiring season notes")).unwrap(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert!(payload
        .get("id")
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default()
        .starts_with("pst-"));
    assert_eq!(payload.get("is_approved"), Some(&json!(false)));
}

#[tokio::test]
async fn silenced_author_route_is_forbidden() {
    let (service, directory) = build_service();
    let silenced = seed_silenced(&directory, "usr-400002");

    let response = post_json(
        router_with_service(service),
        "/api/v1/community/posts",
        serde_json::to_value(text_post(&silenced, "Blocked")).unwrap(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn feed_route_respects_the_viewer() {
    let (service, directory) = build_service();
    let admin = seed_admin(&directory, "usr-400003");
    let member = seed_member(&directory, "usr-400004");
    service
        .create_post(text_post(&member, "Pending"))
        .expect("post stored");
    service
        .create_post(text_post(&admin, "Approved"))
        .expect("post stored");

    let response = get(
        router_with_service(service.clone()),
        "/api/v1/community/posts",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload.as_array().map(Vec::len), Some(1));

    let response = get(
        router_with_service(service),
        &format!("/api/v1/community/posts?viewer_id={}", admin.0),
    )
    .await;
    let payload = read_json_body(response).await;
    assert_eq!(payload.as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn vote_route_toggles() {
    let (service, directory) = build_service();
    let admin = seed_admin(&directory, "usr-400005");
    let member = seed_member(&directory, "usr-400006");
    let post = service
        .create_post(text_post(&admin, "Upvotes welcome"))
        .expect("post stored");
    let uri = format!("/api/v1/community/posts/{}/votes", post.id.0);

    let response = put_json(
        router_with_service(service.clone()),
        &uri,
        json!({"user_id": member.0}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("count"), Some(&json!(1)));
    assert_eq!(payload.get("voted"), Some(&json!(true)));

    let response = put_json(
        router_with_service(service),
        &uri,
        json!({"user_id": member.0}),
    )
    .await;
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("count"), Some(&json!(0)));
    assert_eq!(payload.get("voted"), Some(&json!(false)));
}

#[tokio::test]
async fn moderation_routes_gate_on_admin() {
    let (service, directory) = build_service();
    let admin = seed_admin(&directory, "usr-400007");
    let member = seed_member(&directory, "usr-400008");
    let post = service
        .create_post(text_post(&member, "Pending"))
        .expect("post stored");

    let response = get(
        router_with_service(service.clone()),
        &format!("/api/v1/community/moderation/pending?user_id={}", member.0),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = get(
        router_with_service(service.clone()),
        &format!("/api/v1/community/moderation/pending?user_id={}", admin.0),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload.as_array().map(Vec::len), Some(1));

    let response = put_json(
        router_with_service(service),
        &format!(
            "/api/v1/community/moderation/posts/{}/approve",
            post.id.0
        ),
        json!({"user_id": admin.0}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("is_approved"), Some(&json!(true)));
}

#[tokio::test]
async fn report_resolution_route_validates_status() {
    let (service, directory) = build_service();
    let admin = seed_admin(&directory, "usr-400009");
    let member = seed_member(&directory, "usr-400010");
    let report = service
        .report(NewReport {
            reporter_id: member.clone(),
            item_type: ReportItemType::User,
            item_id: member.0.clone(),
            reason: None,
        })
        .expect("report stored");
    let uri = format!("/api/v1/community/reports/{}", report.id.0);

    let response = put_json(
        router_with_service(service.clone()),
        &uri,
        json!({"user_id": admin.0, "status": "pending"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = put_json(
        router_with_service(service),
        &uri,
        json!({"user_id": admin.0, "status": "resolved"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("status"), Some(&json!("resolved")));
}

#[tokio::test]
async fn conversation_and_message_routes_round_trip() {
    let (service, directory) = build_service();
    let riya = seed_member(&directory, "usr-400011");
    let arun = seed_member(&directory, "usr-400012");

    let response = post_json(
        router_with_service(service.clone()),
        "/api/v1/community/conversations",
        json!({"user_id": riya.0, "peer_id": arun.0}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let thread_id = payload
        .get("id")
        .and_then(serde_json::Value::as_str)
        .expect("thread id")
        .to_string();
    assert!(thread_id.starts_with("cnv-"));

    let response = post_json(
        router_with_service(service.clone()),
        &format!("/api/v1/community/conversations/{thread_id}/messages"),
        json!({"sender_id": riya.0, "body": "Any update on the drive?"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = get(
        router_with_service(service.clone()),
        &format!(
            "/api/v1/community/conversations/{thread_id}/messages?user_id={}",
            arun.0
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload.as_array().map(Vec::len), Some(1));

    let response = get(
        router_with_service(service),
        &format!("/api/v1/community/conversations?user_id={}", riya.0),
    )
    .await;
    let payload = read_json_body(response).await;
    let threads = payload.as_array().expect("thread list");
    assert_eq!(threads.len(), 1);
    assert_eq!(
        threads[0].get("last_message_preview"),
        Some(&json!("Any update on the drive?"))
    );
}
