use crate::community::{CommunityServiceError, NewComment};
use crate::storage::RepositoryError;

use super::common::{
    build_service, seed_admin, seed_member, seed_silenced, text_post,
};

#[test]
fn admin_posts_skip_the_approval_queue() {
    let (service, directory) = build_service();
    let admin = seed_admin(&directory, "usr-100001");
    let member = seed_member(&directory, "usr-100002");

    let admin_post = service
        .create_post(text_post(&admin, "Placement portal downtime"))
        .expect("post stored");
    let member_post = service
        .create_post(text_post(&member, "Interview experience at Techcorp"))
        .expect("post stored");

    assert!(admin_post.id.0.starts_with("pst-"));
    assert!(admin_post.is_approved);
    assert!(!member_post.is_approved);
    assert_eq!(member_post.comment_count, 0);
    assert!(member_post.upvoter_ids.is_empty());
}

#[test]
fn posting_requires_the_flag() {
    let (service, directory) = build_service();
    let silenced = seed_silenced(&directory, "usr-100003");

    let err = service
        .create_post(text_post(&silenced, "Blocked"))
        .expect_err("flag revoked");

    assert!(matches!(err, CommunityServiceError::PostingBlocked));
}

#[test]
fn feed_hides_pending_posts_from_members() {
    let (service, directory) = build_service();
    let admin = seed_admin(&directory, "usr-100004");
    let member = seed_member(&directory, "usr-100005");
    service
        .create_post(text_post(&member, "Waiting for approval"))
        .expect("post stored");
    let approved = service
        .create_post(text_post(&admin, "Approved announcement"))
        .expect("post stored");

    let member_view = service.list_posts(Some(&member)).expect("feed listed");
    assert_eq!(member_view.len(), 1);
    assert_eq!(member_view[0].id, approved.id);

    let anonymous_view = service.list_posts(None).expect("feed listed");
    assert_eq!(anonymous_view.len(), 1);

    let admin_view = service.list_posts(Some(&admin)).expect("feed listed");
    assert_eq!(admin_view.len(), 2);
    assert_eq!(admin_view[0].id, approved.id, "newest first");
}

#[test]
fn pending_posts_read_like_missing_ones() {
    let (service, directory) = build_service();
    let admin = seed_admin(&directory, "usr-100006");
    let member = seed_member(&directory, "usr-100007");
    let pending = service
        .create_post(text_post(&member, "Waiting for approval"))
        .expect("post stored");

    let err = service
        .get_post(&pending.id, Some(&member))
        .expect_err("hidden from the author too");
    assert!(matches!(
        err,
        CommunityServiceError::Repository(RepositoryError::NotFound)
    ));

    let seen = service
        .get_post(&pending.id, Some(&admin))
        .expect("admin sees it");
    assert_eq!(seen.id, pending.id);
}

#[test]
fn vote_toggles_membership() {
    let (service, directory) = build_service();
    let admin = seed_admin(&directory, "usr-100008");
    let member = seed_member(&directory, "usr-100009");
    let post = service
        .create_post(text_post(&admin, "Upvote this"))
        .expect("post stored");

    let first = service.vote(&post.id, &member).expect("vote lands");
    assert_eq!(first.count, 1);
    assert!(first.voted);
    assert!(service
        .vote_status(&post.id, &member)
        .expect("status read")
        .has_voted);

    let second = service.vote(&post.id, &member).expect("vote withdrawn");
    assert_eq!(second.count, 0);
    assert!(!second.voted);
    assert!(!service
        .vote_status(&post.id, &member)
        .expect("status read")
        .has_voted);
}

#[test]
fn comments_track_the_count() {
    let (service, directory) = build_service();
    let admin = seed_admin(&directory, "usr-100010");
    let member = seed_member(&directory, "usr-100011");
    let post = service
        .create_post(text_post(&admin, "Ask me anything"))
        .expect("post stored");

    let comment = service
        .add_comment(
            &post.id,
            NewComment {
                author_id: member.clone(),
                body: "What was the aptitude cutoff?".to_string(),
            },
        )
        .expect("comment stored");
    assert!(comment.id.0.starts_with("cmt-"));
    assert_eq!(
        service
            .get_post(&post.id, Some(&member))
            .expect("post read")
            .comment_count,
        1
    );

    service
        .delete_comment(&comment.id, &member)
        .expect("author removes own comment");
    assert_eq!(
        service
            .get_post(&post.id, Some(&member))
            .expect("post read")
            .comment_count,
        0
    );
}

#[test]
fn commenting_requires_the_flag() {
    let (service, directory) = build_service();
    let admin = seed_admin(&directory, "usr-100012");
    let silenced = seed_silenced(&directory, "usr-100013");
    let post = service
        .create_post(text_post(&admin, "Open thread"))
        .expect("post stored");

    let err = service
        .add_comment(
            &post.id,
            NewComment {
                author_id: silenced,
                body: "blocked".to_string(),
            },
        )
        .expect_err("flag revoked");

    assert!(matches!(err, CommunityServiceError::CommentingBlocked));
}

#[test]
fn removal_is_author_or_admin_only() {
    let (service, directory) = build_service();
    let admin = seed_admin(&directory, "usr-100014");
    let author = seed_member(&directory, "usr-100015");
    let bystander = seed_member(&directory, "usr-100016");
    let post = service
        .create_post(text_post(&author, "Delete me"))
        .expect("post stored");
    service.approve_post(&post.id, &admin).expect("approved");
    let comment = service
        .add_comment(
            &post.id,
            NewComment {
                author_id: author.clone(),
                body: "bump".to_string(),
            },
        )
        .expect("comment stored");

    let err = service
        .delete_post(&post.id, &bystander)
        .expect_err("not the author");
    assert!(matches!(err, CommunityServiceError::NotAuthor));
    let err = service
        .delete_comment(&comment.id, &bystander)
        .expect_err("not the author");
    assert!(matches!(err, CommunityServiceError::NotAuthor));

    service.delete_post(&post.id, &admin).expect("admin removes");
    let err = service
        .comments_for_post(&post.id, Some(&admin))
        .expect_err("comments went with the post");
    assert!(matches!(
        err,
        CommunityServiceError::Repository(RepositoryError::NotFound)
    ));
}
