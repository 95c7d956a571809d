use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::directory::UserId;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NoticeId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReminderId(pub String);

/// Broadcast announcement, optionally linked to the drive or job that
/// triggered it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub id: NoticeId,
    pub title: String,
    pub content: String,
    pub author: Option<UserId>,
    pub job_id: Option<String>,
    pub drive_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewNotice {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub author: Option<UserId>,
    #[serde(default)]
    pub job_id: Option<String>,
    #[serde(default)]
    pub drive_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoticeUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Targeted reminder. `recipient_ids` of `None` means everyone; students
/// mark themselves into `read_by`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: ReminderId,
    pub title: String,
    pub message: String,
    pub sender_id: UserId,
    pub recipient_ids: Option<Vec<UserId>>,
    pub job_id: Option<String>,
    pub drive_id: Option<String>,
    pub read_by: Vec<UserId>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewReminder {
    pub title: String,
    pub message: String,
    pub sender_id: UserId,
    #[serde(default)]
    pub recipient_ids: Option<Vec<UserId>>,
    #[serde(default)]
    pub job_id: Option<String>,
    #[serde(default)]
    pub drive_id: Option<String>,
}
