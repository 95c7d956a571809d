//! Community feed with moderated posts, reports, and direct messages.
//! Posting rights hang off the directory's per-account permission flags,
//! and everything admin-only re-checks the role at call time.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Comment, CommentId, Conversation, ConversationId, ConversationRequest, DirectMessage,
    MessageId, ModerationAction, NewComment, NewMessage, NewPost, NewReport, Post, PostId,
    PostKind, Report, ReportId, ReportItemType, ReportListing, ReportResolution, ReportStatus,
    VoteRequest, VoteResult, VoteStatus,
};
pub use repository::{CommunityRepository, InMemoryCommunityRepository};
pub use router::community_router;
pub use service::{CommunityService, CommunityServiceError};
