use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;

use crate::directory::{DirectoryRepository, UserAccount, UserId, UserRole};
use crate::storage::RepositoryError;

use super::domain::{
    Comment, CommentId, Conversation, ConversationId, DirectMessage, MessageId, NewComment,
    NewMessage, NewPost, NewReport, Post, PostId, Report, ReportId, ReportItemType, ReportListing,
    ReportStatus, VoteResult, VoteStatus,
};
use super::repository::CommunityRepository;

static POST_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static COMMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static REPORT_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static CONVERSATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static MESSAGE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_post_id() -> PostId {
    let id = POST_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    PostId(format!("pst-{id:06}"))
}

fn next_comment_id() -> CommentId {
    let id = COMMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    CommentId(format!("cmt-{id:06}"))
}

fn next_report_id() -> ReportId {
    let id = REPORT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ReportId(format!("rpt-{id:06}"))
}

fn next_conversation_id() -> ConversationId {
    let id = CONVERSATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ConversationId(format!("cnv-{id:06}"))
}

fn next_message_id() -> MessageId {
    let id = MESSAGE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    MessageId(format!("msg-{id:06}"))
}

const PREVIEW_LENGTH: usize = 50;

fn preview_of(body: &str) -> String {
    if body.chars().count() > PREVIEW_LENGTH {
        let head: String = body.chars().take(PREVIEW_LENGTH).collect();
        format!("{head}...")
    } else {
        body.to_string()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CommunityServiceError {
    #[error("account is not allowed to post")]
    PostingBlocked,
    #[error("account is not allowed to comment")]
    CommentingBlocked,
    #[error("account is not allowed to send messages")]
    MessagingBlocked,
    #[error("only the author or an administrator can remove this")]
    NotAuthor,
    #[error("administrator role required")]
    AdminRequired,
    #[error("a conversation needs two distinct participants")]
    SelfConversation,
    #[error("account does not participate in this conversation")]
    NotParticipant,
    #[error("a report can only be resolved or dismissed")]
    InvalidResolution,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Community feed, moderation, and direct messages. Permission flags and
/// the admin role are resolved through the directory on every call, so a
/// revoked flag takes effect immediately.
pub struct CommunityService<R> {
    repository: Arc<R>,
    directory: Arc<dyn DirectoryRepository>,
}

impl<R> CommunityService<R>
where
    R: CommunityRepository + 'static,
{
    pub fn new(repository: Arc<R>, directory: Arc<dyn DirectoryRepository>) -> Self {
        Self { repository, directory }
    }

    pub fn repository(&self) -> Arc<R> {
        Arc::clone(&self.repository)
    }

    pub fn create_post(&self, new_post: NewPost) -> Result<Post, CommunityServiceError> {
        let author = self.account(&new_post.author_id)?;
        if !author.permissions.can_post {
            return Err(CommunityServiceError::PostingBlocked);
        }
        let now = Utc::now();
        let post = Post {
            id: next_post_id(),
            author_id: new_post.author_id,
            title: new_post.title,
            body: new_post.body,
            kind: new_post.kind,
            is_approved: matches!(author.role, UserRole::Admin),
            upvoter_ids: Vec::new(),
            comment_count: 0,
            created_at: now,
            updated_at: now,
        };
        Ok(self.repository.insert_post(post)?)
    }

    /// Feed listing, newest first. Admins see the full feed including
    /// posts still waiting for approval.
    pub fn list_posts(&self, viewer: Option<&UserId>) -> Result<Vec<Post>, CommunityServiceError> {
        let admin = self.is_admin(viewer)?;
        let mut posts = self.repository.list_posts()?;
        if !admin {
            posts.retain(|post| post.is_approved);
        }
        posts.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(posts)
    }

    pub fn get_post(
        &self,
        id: &PostId,
        viewer: Option<&UserId>,
    ) -> Result<Post, CommunityServiceError> {
        self.visible_post(id, viewer)
    }

    /// Removes a post and its comments. Allowed for the author and for
    /// admins only.
    pub fn delete_post(&self, id: &PostId, acting: &UserId) -> Result<(), CommunityServiceError> {
        let post = self.post(id)?;
        let account = self.account(acting)?;
        if post.author_id != *acting && !matches!(account.role, UserRole::Admin) {
            return Err(CommunityServiceError::NotAuthor);
        }
        self.repository.delete_comments_by_post(id)?;
        Ok(self.repository.delete_post(id)?)
    }

    /// Toggles the caller's upvote and reports the new tally.
    pub fn vote(
        &self,
        post_id: &PostId,
        user_id: &UserId,
    ) -> Result<VoteResult, CommunityServiceError> {
        self.account(user_id)?;
        let mut post = self.visible_post(post_id, Some(user_id))?;
        let voted = match post.upvoter_ids.iter().position(|voter| voter == user_id) {
            Some(index) => {
                post.upvoter_ids.remove(index);
                false
            }
            None => {
                post.upvoter_ids.push(user_id.clone());
                true
            }
        };
        post.updated_at = Utc::now();
        let count = post.upvoter_ids.len();
        self.repository.update_post(post)?;
        Ok(VoteResult { count, voted })
    }

    pub fn vote_status(
        &self,
        post_id: &PostId,
        user_id: &UserId,
    ) -> Result<VoteStatus, CommunityServiceError> {
        let post = self.visible_post(post_id, Some(user_id))?;
        Ok(VoteStatus {
            has_voted: post.upvoter_ids.contains(user_id),
        })
    }

    pub fn add_comment(
        &self,
        post_id: &PostId,
        new_comment: NewComment,
    ) -> Result<Comment, CommunityServiceError> {
        let author = self.account(&new_comment.author_id)?;
        if !author.permissions.can_comment {
            return Err(CommunityServiceError::CommentingBlocked);
        }
        let mut post = self.visible_post(post_id, Some(&new_comment.author_id))?;
        let comment = Comment {
            id: next_comment_id(),
            post_id: post_id.clone(),
            author_id: new_comment.author_id,
            body: new_comment.body,
            created_at: Utc::now(),
        };
        let comment = self.repository.insert_comment(comment)?;
        post.comment_count += 1;
        post.updated_at = comment.created_at;
        self.repository.update_post(post)?;
        Ok(comment)
    }

    pub fn comments_for_post(
        &self,
        post_id: &PostId,
        viewer: Option<&UserId>,
    ) -> Result<Vec<Comment>, CommunityServiceError> {
        self.visible_post(post_id, viewer)?;
        Ok(self.repository.comments_by_post(post_id)?)
    }

    pub fn delete_comment(
        &self,
        id: &CommentId,
        acting: &UserId,
    ) -> Result<(), CommunityServiceError> {
        let comment = self
            .repository
            .fetch_comment(id)?
            .ok_or(CommunityServiceError::Repository(RepositoryError::NotFound))?;
        let account = self.account(acting)?;
        if comment.author_id != *acting && !matches!(account.role, UserRole::Admin) {
            return Err(CommunityServiceError::NotAuthor);
        }
        self.repository.delete_comment(id)?;
        // The parent post may already be gone if a delete raced this call.
        if let Some(mut post) = self.repository.fetch_post(&comment.post_id)? {
            post.comment_count = post.comment_count.saturating_sub(1);
            post.updated_at = Utc::now();
            self.repository.update_post(post)?;
        }
        Ok(())
    }

    pub fn report(&self, new_report: NewReport) -> Result<Report, CommunityServiceError> {
        self.account(&new_report.reporter_id)?;
        let now = Utc::now();
        let report = Report {
            id: next_report_id(),
            reporter_id: new_report.reporter_id,
            item_type: new_report.item_type,
            item_id: new_report.item_id,
            reason: new_report.reason,
            status: ReportStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        Ok(self.repository.insert_report(report)?)
    }

    /// Admin queue of reports, oldest first. Each entry resolves the
    /// account it targets so moderation can act without a second lookup.
    pub fn list_reports(
        &self,
        acting: &UserId,
        status: Option<ReportStatus>,
    ) -> Result<Vec<ReportListing>, CommunityServiceError> {
        self.require_admin(acting)?;
        let mut reports = self.repository.list_reports()?;
        if let Some(status) = status {
            reports.retain(|report| report.status == status);
        }
        reports.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        reports
            .into_iter()
            .map(|report| {
                let target_user_id = self.report_target(&report)?;
                Ok(ReportListing {
                    report,
                    target_user_id,
                })
            })
            .collect()
    }

    pub fn resolve_report(
        &self,
        id: &ReportId,
        acting: &UserId,
        status: ReportStatus,
    ) -> Result<Report, CommunityServiceError> {
        self.require_admin(acting)?;
        if status == ReportStatus::Pending {
            return Err(CommunityServiceError::InvalidResolution);
        }
        let mut report = self
            .repository
            .fetch_report(id)?
            .ok_or(CommunityServiceError::Repository(RepositoryError::NotFound))?;
        report.status = status;
        report.updated_at = Utc::now();
        self.repository.update_report(report.clone())?;
        Ok(report)
    }

    /// Posts waiting for approval, oldest first.
    pub fn pending_posts(&self, acting: &UserId) -> Result<Vec<Post>, CommunityServiceError> {
        self.require_admin(acting)?;
        let mut posts = self.repository.list_posts()?;
        posts.retain(|post| !post.is_approved);
        posts.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(posts)
    }

    pub fn approve_post(
        &self,
        id: &PostId,
        acting: &UserId,
    ) -> Result<Post, CommunityServiceError> {
        self.require_admin(acting)?;
        let mut post = self.post(id)?;
        post.is_approved = true;
        post.updated_at = Utc::now();
        self.repository.update_post(post.clone())?;
        Ok(post)
    }

    /// Rejection removes the post outright, comments included.
    pub fn reject_post(&self, id: &PostId, acting: &UserId) -> Result<(), CommunityServiceError> {
        self.require_admin(acting)?;
        self.post(id)?;
        self.repository.delete_comments_by_post(id)?;
        Ok(self.repository.delete_post(id)?)
    }

    /// Returns the thread between two users, creating it on first
    /// contact. The pair is stored sorted so the lookup is symmetric.
    pub fn find_or_create_conversation(
        &self,
        user_id: &UserId,
        peer_id: &UserId,
    ) -> Result<Conversation, CommunityServiceError> {
        if user_id == peer_id {
            return Err(CommunityServiceError::SelfConversation);
        }
        self.account(user_id)?;
        self.account(peer_id)?;
        let mut pair = [user_id.clone(), peer_id.clone()];
        pair.sort();
        if let Some(existing) = self.repository.conversation_for_pair(&pair)? {
            return Ok(existing);
        }
        let conversation = Conversation {
            id: next_conversation_id(),
            participant_ids: pair,
            last_message_at: None,
            last_message_preview: None,
            created_at: Utc::now(),
        };
        Ok(self.repository.insert_conversation(conversation)?)
    }

    /// A user's threads, most recently active first. Threads that never
    /// carried a message sort last.
    pub fn conversations_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Conversation>, CommunityServiceError> {
        self.account(user_id)?;
        let mut conversations = self.repository.conversations_by_user(user_id)?;
        conversations.sort_by(|a, b| {
            b.last_message_at
                .cmp(&a.last_message_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(conversations)
    }

    pub fn send_message(
        &self,
        conversation_id: &ConversationId,
        new_message: NewMessage,
    ) -> Result<DirectMessage, CommunityServiceError> {
        let mut conversation = self.conversation(conversation_id)?;
        if !conversation.participant_ids.contains(&new_message.sender_id) {
            return Err(CommunityServiceError::NotParticipant);
        }
        let sender = self.account(&new_message.sender_id)?;
        if !sender.permissions.can_message {
            return Err(CommunityServiceError::MessagingBlocked);
        }
        let message = DirectMessage {
            id: next_message_id(),
            conversation_id: conversation_id.clone(),
            sender_id: new_message.sender_id,
            body: new_message.body,
            sent_at: Utc::now(),
        };
        let message = self.repository.insert_message(message)?;
        conversation.last_message_at = Some(message.sent_at);
        conversation.last_message_preview = Some(preview_of(&message.body));
        self.repository.update_conversation(conversation)?;
        Ok(message)
    }

    /// Thread contents, oldest first, participants only.
    pub fn messages_for_conversation(
        &self,
        conversation_id: &ConversationId,
        user_id: &UserId,
    ) -> Result<Vec<DirectMessage>, CommunityServiceError> {
        let conversation = self.conversation(conversation_id)?;
        if !conversation.participant_ids.contains(user_id) {
            return Err(CommunityServiceError::NotParticipant);
        }
        Ok(self.repository.messages_by_conversation(conversation_id)?)
    }

    fn account(&self, user_id: &UserId) -> Result<UserAccount, CommunityServiceError> {
        self.directory
            .fetch_user(user_id)?
            .ok_or(CommunityServiceError::Repository(RepositoryError::NotFound))
    }

    fn require_admin(&self, user_id: &UserId) -> Result<UserAccount, CommunityServiceError> {
        let account = self.account(user_id)?;
        if !matches!(account.role, UserRole::Admin) {
            return Err(CommunityServiceError::AdminRequired);
        }
        Ok(account)
    }

    fn is_admin(&self, viewer: Option<&UserId>) -> Result<bool, CommunityServiceError> {
        match viewer {
            Some(user_id) => Ok(matches!(self.account(user_id)?.role, UserRole::Admin)),
            None => Ok(false),
        }
    }

    fn post(&self, id: &PostId) -> Result<Post, CommunityServiceError> {
        self.repository
            .fetch_post(id)?
            .ok_or(CommunityServiceError::Repository(RepositoryError::NotFound))
    }

    /// Unapproved posts stay invisible to everyone but admins, so from
    /// the outside a pending post and a missing post look the same.
    fn visible_post(
        &self,
        id: &PostId,
        viewer: Option<&UserId>,
    ) -> Result<Post, CommunityServiceError> {
        let post = self.post(id)?;
        if !post.is_approved && !self.is_admin(viewer)? {
            return Err(CommunityServiceError::Repository(RepositoryError::NotFound));
        }
        Ok(post)
    }

    fn conversation(
        &self,
        id: &ConversationId,
    ) -> Result<Conversation, CommunityServiceError> {
        self.repository
            .fetch_conversation(id)?
            .ok_or(CommunityServiceError::Repository(RepositoryError::NotFound))
    }

    fn report_target(&self, report: &Report) -> Result<Option<UserId>, CommunityServiceError> {
        Ok(match report.item_type {
            ReportItemType::User => Some(UserId(report.item_id.clone())),
            ReportItemType::Post => self
                .repository
                .fetch_post(&PostId(report.item_id.clone()))?
                .map(|post| post.author_id),
            ReportItemType::Comment => self
                .repository
                .fetch_comment(&CommentId(report.item_id.clone()))?
                .map(|comment| comment.author_id),
        })
    }
}
