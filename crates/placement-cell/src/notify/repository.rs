use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use crate::storage::RepositoryError;

use super::domain::{Notice, NoticeId, Reminder, ReminderId};

pub trait NotifyRepository: Send + Sync {
    fn insert_notice(&self, notice: Notice) -> Result<Notice, RepositoryError>;
    fn update_notice(&self, notice: Notice) -> Result<(), RepositoryError>;
    fn fetch_notice(&self, id: &NoticeId) -> Result<Option<Notice>, RepositoryError>;
    fn list_notices(&self) -> Result<Vec<Notice>, RepositoryError>;
    fn delete_notice(&self, id: &NoticeId) -> Result<(), RepositoryError>;

    fn insert_reminder(&self, reminder: Reminder) -> Result<Reminder, RepositoryError>;
    fn update_reminder(&self, reminder: Reminder) -> Result<(), RepositoryError>;
    fn fetch_reminder(&self, id: &ReminderId) -> Result<Option<Reminder>, RepositoryError>;
    fn list_reminders(&self) -> Result<Vec<Reminder>, RepositoryError>;
    fn delete_reminder(&self, id: &ReminderId) -> Result<(), RepositoryError>;
}

#[derive(Default, Clone)]
pub struct InMemoryNotifyRepository {
    notices: Arc<Mutex<BTreeMap<NoticeId, Notice>>>,
    reminders: Arc<Mutex<BTreeMap<ReminderId, Reminder>>>,
}

impl NotifyRepository for InMemoryNotifyRepository {
    fn insert_notice(&self, notice: Notice) -> Result<Notice, RepositoryError> {
        let mut guard = self.notices.lock().expect("repository mutex poisoned");
        if guard.contains_key(&notice.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(notice.id.clone(), notice.clone());
        Ok(notice)
    }

    fn update_notice(&self, notice: Notice) -> Result<(), RepositoryError> {
        let mut guard = self.notices.lock().expect("repository mutex poisoned");
        if guard.contains_key(&notice.id) {
            guard.insert(notice.id.clone(), notice);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch_notice(&self, id: &NoticeId) -> Result<Option<Notice>, RepositoryError> {
        let guard = self.notices.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list_notices(&self) -> Result<Vec<Notice>, RepositoryError> {
        let guard = self.notices.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn delete_notice(&self, id: &NoticeId) -> Result<(), RepositoryError> {
        let mut guard = self.notices.lock().expect("repository mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }

    fn insert_reminder(&self, reminder: Reminder) -> Result<Reminder, RepositoryError> {
        let mut guard = self.reminders.lock().expect("repository mutex poisoned");
        if guard.contains_key(&reminder.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(reminder.id.clone(), reminder.clone());
        Ok(reminder)
    }

    fn update_reminder(&self, reminder: Reminder) -> Result<(), RepositoryError> {
        let mut guard = self.reminders.lock().expect("repository mutex poisoned");
        if guard.contains_key(&reminder.id) {
            guard.insert(reminder.id.clone(), reminder);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch_reminder(&self, id: &ReminderId) -> Result<Option<Reminder>, RepositoryError> {
        let guard = self.reminders.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list_reminders(&self) -> Result<Vec<Reminder>, RepositoryError> {
        let guard = self.reminders.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn delete_reminder(&self, id: &ReminderId) -> Result<(), RepositoryError> {
        let mut guard = self.reminders.lock().expect("repository mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }
}
