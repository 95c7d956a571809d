use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use crate::directory::UserId;
use crate::storage::RepositoryError;

use super::domain::{
    Comment, CommentId, Conversation, ConversationId, DirectMessage, MessageId, Post, PostId,
    Report, ReportId,
};

/// Persistence boundary for the community feed, reports, and direct
/// messages.
pub trait CommunityRepository: Send + Sync {
    fn insert_post(&self, post: Post) -> Result<Post, RepositoryError>;
    fn update_post(&self, post: Post) -> Result<(), RepositoryError>;
    fn fetch_post(&self, id: &PostId) -> Result<Option<Post>, RepositoryError>;
    fn list_posts(&self) -> Result<Vec<Post>, RepositoryError>;
    fn delete_post(&self, id: &PostId) -> Result<(), RepositoryError>;

    fn insert_comment(&self, comment: Comment) -> Result<Comment, RepositoryError>;
    fn fetch_comment(&self, id: &CommentId) -> Result<Option<Comment>, RepositoryError>;
    fn comments_by_post(&self, post_id: &PostId) -> Result<Vec<Comment>, RepositoryError>;
    fn delete_comment(&self, id: &CommentId) -> Result<(), RepositoryError>;
    fn delete_comments_by_post(&self, post_id: &PostId) -> Result<(), RepositoryError>;

    fn insert_report(&self, report: Report) -> Result<Report, RepositoryError>;
    fn update_report(&self, report: Report) -> Result<(), RepositoryError>;
    fn fetch_report(&self, id: &ReportId) -> Result<Option<Report>, RepositoryError>;
    fn list_reports(&self) -> Result<Vec<Report>, RepositoryError>;

    fn insert_conversation(
        &self,
        conversation: Conversation,
    ) -> Result<Conversation, RepositoryError>;
    fn update_conversation(&self, conversation: Conversation) -> Result<(), RepositoryError>;
    fn fetch_conversation(
        &self,
        id: &ConversationId,
    ) -> Result<Option<Conversation>, RepositoryError>;
    fn conversation_for_pair(
        &self,
        pair: &[UserId; 2],
    ) -> Result<Option<Conversation>, RepositoryError>;
    fn conversations_by_user(&self, user_id: &UserId)
        -> Result<Vec<Conversation>, RepositoryError>;

    fn insert_message(&self, message: DirectMessage) -> Result<DirectMessage, RepositoryError>;
    fn messages_by_conversation(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<Vec<DirectMessage>, RepositoryError>;
}

/// Default in-memory store; ordered maps keep listings in creation order.
#[derive(Default, Clone)]
pub struct InMemoryCommunityRepository {
    posts: Arc<Mutex<BTreeMap<PostId, Post>>>,
    comments: Arc<Mutex<BTreeMap<CommentId, Comment>>>,
    reports: Arc<Mutex<BTreeMap<ReportId, Report>>>,
    conversations: Arc<Mutex<BTreeMap<ConversationId, Conversation>>>,
    messages: Arc<Mutex<BTreeMap<MessageId, DirectMessage>>>,
}

impl CommunityRepository for InMemoryCommunityRepository {
    fn insert_post(&self, post: Post) -> Result<Post, RepositoryError> {
        let mut guard = self.posts.lock().expect("repository mutex poisoned");
        if guard.contains_key(&post.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(post.id.clone(), post.clone());
        Ok(post)
    }

    fn update_post(&self, post: Post) -> Result<(), RepositoryError> {
        let mut guard = self.posts.lock().expect("repository mutex poisoned");
        if !guard.contains_key(&post.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(post.id.clone(), post);
        Ok(())
    }

    fn fetch_post(&self, id: &PostId) -> Result<Option<Post>, RepositoryError> {
        let guard = self.posts.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list_posts(&self) -> Result<Vec<Post>, RepositoryError> {
        let guard = self.posts.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn delete_post(&self, id: &PostId) -> Result<(), RepositoryError> {
        let mut guard = self.posts.lock().expect("repository mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }

    fn insert_comment(&self, comment: Comment) -> Result<Comment, RepositoryError> {
        let mut guard = self.comments.lock().expect("repository mutex poisoned");
        if guard.contains_key(&comment.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(comment.id.clone(), comment.clone());
        Ok(comment)
    }

    fn fetch_comment(&self, id: &CommentId) -> Result<Option<Comment>, RepositoryError> {
        let guard = self.comments.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn comments_by_post(&self, post_id: &PostId) -> Result<Vec<Comment>, RepositoryError> {
        let guard = self.comments.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|comment| &comment.post_id == post_id)
            .cloned()
            .collect())
    }

    fn delete_comment(&self, id: &CommentId) -> Result<(), RepositoryError> {
        let mut guard = self.comments.lock().expect("repository mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }

    fn delete_comments_by_post(&self, post_id: &PostId) -> Result<(), RepositoryError> {
        let mut guard = self.comments.lock().expect("repository mutex poisoned");
        guard.retain(|_, comment| &comment.post_id != post_id);
        Ok(())
    }

    fn insert_report(&self, report: Report) -> Result<Report, RepositoryError> {
        let mut guard = self.reports.lock().expect("repository mutex poisoned");
        if guard.contains_key(&report.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(report.id.clone(), report.clone());
        Ok(report)
    }

    fn update_report(&self, report: Report) -> Result<(), RepositoryError> {
        let mut guard = self.reports.lock().expect("repository mutex poisoned");
        if !guard.contains_key(&report.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(report.id.clone(), report);
        Ok(())
    }

    fn fetch_report(&self, id: &ReportId) -> Result<Option<Report>, RepositoryError> {
        let guard = self.reports.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list_reports(&self) -> Result<Vec<Report>, RepositoryError> {
        let guard = self.reports.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn insert_conversation(
        &self,
        conversation: Conversation,
    ) -> Result<Conversation, RepositoryError> {
        let mut guard = self.conversations.lock().expect("repository mutex poisoned");
        if guard.contains_key(&conversation.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(conversation.id.clone(), conversation.clone());
        Ok(conversation)
    }

    fn update_conversation(&self, conversation: Conversation) -> Result<(), RepositoryError> {
        let mut guard = self.conversations.lock().expect("repository mutex poisoned");
        if !guard.contains_key(&conversation.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(conversation.id.clone(), conversation);
        Ok(())
    }

    fn fetch_conversation(
        &self,
        id: &ConversationId,
    ) -> Result<Option<Conversation>, RepositoryError> {
        let guard = self.conversations.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn conversation_for_pair(
        &self,
        pair: &[UserId; 2],
    ) -> Result<Option<Conversation>, RepositoryError> {
        let guard = self.conversations.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .find(|conversation| &conversation.participant_ids == pair)
            .cloned())
    }

    fn conversations_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Conversation>, RepositoryError> {
        let guard = self.conversations.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|conversation| conversation.participant_ids.contains(user_id))
            .cloned()
            .collect())
    }

    fn insert_message(&self, message: DirectMessage) -> Result<DirectMessage, RepositoryError> {
        let mut guard = self.messages.lock().expect("repository mutex poisoned");
        if guard.contains_key(&message.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(message.id.clone(), message.clone());
        Ok(message)
    }

    fn messages_by_conversation(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<Vec<DirectMessage>, RepositoryError> {
        let guard = self.messages.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|message| &message.conversation_id == conversation_id)
            .cloned()
            .collect())
    }
}
