use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;

use crate::directory::UserId;
use crate::storage::RepositoryError;

use super::domain::{
    NewNotice, NewReminder, Notice, NoticeId, NoticeUpdate, Reminder, ReminderId,
};
use super::repository::NotifyRepository;

static NOTICE_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static REMINDER_SEQUENCE: AtomicU64 = AtomicU64::new(1);

pub(crate) fn next_notice_id() -> NoticeId {
    let id = NOTICE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    NoticeId(format!("ntc-{id:06}"))
}

fn next_reminder_id() -> ReminderId {
    let id = REMINDER_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ReminderId(format!("rem-{id:06}"))
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Notices and reminders. Notices are broadcast; reminders are targeted
/// and track who has read them.
pub struct NotifyService<R> {
    repository: Arc<R>,
}

impl<R> NotifyService<R>
where
    R: NotifyRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> Arc<R> {
        Arc::clone(&self.repository)
    }

    pub fn add_notice(&self, new_notice: NewNotice) -> Result<Notice, NotifyServiceError> {
        let now = Utc::now();
        let notice = Notice {
            id: next_notice_id(),
            title: new_notice.title,
            content: new_notice.content,
            author: new_notice.author,
            job_id: new_notice.job_id,
            drive_id: new_notice.drive_id,
            created_at: now,
            updated_at: now,
        };
        Ok(self.repository.insert_notice(notice)?)
    }

    pub fn get_notice(&self, id: &NoticeId) -> Result<Notice, NotifyServiceError> {
        self.repository
            .fetch_notice(id)?
            .ok_or(NotifyServiceError::Repository(RepositoryError::NotFound))
    }

    pub fn list_notices(&self) -> Result<Vec<Notice>, NotifyServiceError> {
        Ok(self.repository.list_notices()?)
    }

    pub fn update_notice(
        &self,
        id: &NoticeId,
        update: NoticeUpdate,
    ) -> Result<Notice, NotifyServiceError> {
        let mut notice = self.get_notice(id)?;
        if let Some(title) = update.title {
            notice.title = title;
        }
        if let Some(content) = update.content {
            notice.content = content;
        }
        notice.updated_at = Utc::now();
        self.repository.update_notice(notice.clone())?;
        Ok(notice)
    }

    pub fn delete_notice(&self, id: &NoticeId) -> Result<(), NotifyServiceError> {
        Ok(self.repository.delete_notice(id)?)
    }

    pub fn add_reminder(&self, new_reminder: NewReminder) -> Result<Reminder, NotifyServiceError> {
        let reminder = Reminder {
            id: next_reminder_id(),
            title: new_reminder.title,
            message: new_reminder.message,
            sender_id: new_reminder.sender_id,
            recipient_ids: new_reminder.recipient_ids,
            job_id: new_reminder.job_id,
            drive_id: new_reminder.drive_id,
            read_by: Vec::new(),
            created_at: Utc::now(),
        };
        Ok(self.repository.insert_reminder(reminder)?)
    }

    pub fn get_reminder(&self, id: &ReminderId) -> Result<Reminder, NotifyServiceError> {
        self.repository
            .fetch_reminder(id)?
            .ok_or(NotifyServiceError::Repository(RepositoryError::NotFound))
    }

    pub fn list_reminders(&self) -> Result<Vec<Reminder>, NotifyServiceError> {
        Ok(self.repository.list_reminders()?)
    }

    /// Reminders addressed to the student plus every broadcast one,
    /// newest first.
    pub fn reminders_for_student(
        &self,
        student: &UserId,
    ) -> Result<Vec<Reminder>, NotifyServiceError> {
        let mut reminders: Vec<Reminder> = self
            .repository
            .list_reminders()?
            .into_iter()
            .filter(|reminder| match &reminder.recipient_ids {
                Some(recipients) => recipients.contains(student),
                None => true,
            })
            .collect();
        reminders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reminders)
    }

    pub fn mark_reminder_read(
        &self,
        id: &ReminderId,
        student: &UserId,
    ) -> Result<Reminder, NotifyServiceError> {
        let mut reminder = self.get_reminder(id)?;
        if !reminder.read_by.contains(student) {
            reminder.read_by.push(student.clone());
            self.repository.update_reminder(reminder.clone())?;
        }
        Ok(reminder)
    }

    pub fn delete_reminder(&self, id: &ReminderId) -> Result<(), NotifyServiceError> {
        Ok(self.repository.delete_reminder(id)?)
    }
}
