use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;

use crate::community::{
    community_router, CommunityService, InMemoryCommunityRepository, NewPost, PostKind,
};
use crate::directory::{
    CommunityPermissions, DirectoryRepository, InMemoryDirectoryRepository, UserAccount, UserId,
    UserRole, UserStatus,
};

pub(super) type TestService = CommunityService<InMemoryCommunityRepository>;

pub(super) fn build_service() -> (Arc<TestService>, Arc<InMemoryDirectoryRepository>) {
    let directory = Arc::new(InMemoryDirectoryRepository::default());
    let service = Arc::new(CommunityService::new(
        Arc::new(InMemoryCommunityRepository::default()),
        directory.clone(),
    ));
    (service, directory)
}

pub(super) fn seed_account(
    directory: &InMemoryDirectoryRepository,
    id: &str,
    role: UserRole,
    permissions: CommunityPermissions,
) -> UserId {
    let user = UserId(id.to_string());
    let now = Utc::now();
    directory
        .insert_user(UserAccount {
            id: user.clone(),
            first_name: "Riya".to_string(),
            middle_name: None,
            last_name: "Menon".to_string(),
            email: format!("{id}@college.edu"),
            phone: None,
            role,
            status: UserStatus::Active,
            permissions,
            restricted_until: None,
            password_hash: String::new(),
            created_at: now,
            updated_at: now,
        })
        .expect("account stored");
    user
}

pub(super) fn seed_member(directory: &InMemoryDirectoryRepository, id: &str) -> UserId {
    seed_account(directory, id, UserRole::Student, CommunityPermissions::default())
}

pub(super) fn seed_admin(directory: &InMemoryDirectoryRepository, id: &str) -> UserId {
    seed_account(directory, id, UserRole::Admin, CommunityPermissions::default())
}

/// An account with every community flag revoked.
pub(super) fn seed_silenced(directory: &InMemoryDirectoryRepository, id: &str) -> UserId {
    seed_account(
        directory,
        id,
        UserRole::Student,
        CommunityPermissions {
            can_post: false,
            can_comment: false,
            can_message: false,
        },
    )
}

pub(super) fn text_post(author: &UserId, title: &str) -> NewPost {
    NewPost {
        author_id: author.clone(),
        title: title.to_string(),
        body: "Walk-in drive details inside.".to_string(),
        kind: PostKind::Text,
    }
}

pub(super) fn router_with_service(service: Arc<TestService>) -> axum::Router {
    community_router(service)
}

pub(super) async fn read_json_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
