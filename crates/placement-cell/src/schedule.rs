//! Restriction lift timers. One tokio task per restricted account; arming a
//! user again replaces that user's pending task, and timers are rebuilt from
//! the store on boot so a restart never strands an expired restriction.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;

use crate::directory::{DirectoryRepository, RestrictionPlanner, UserId};
use crate::storage::RepositoryError;

pub struct RestrictionScheduler {
    directory: Arc<dyn DirectoryRepository>,
    tasks: Arc<Mutex<HashMap<UserId, JoinHandle<()>>>>,
}

impl RestrictionScheduler {
    pub fn new(directory: Arc<dyn DirectoryRepository>) -> Self {
        Self {
            directory,
            tasks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Arms a timer for every account still carrying a lift deadline.
    /// Deadlines already in the past lift on the spot. Returns how many
    /// timers were armed.
    pub fn rearm_from_store(&self) -> Result<usize, RepositoryError> {
        let restricted = self.directory.restricted_users()?;
        let mut armed = 0usize;
        for account in restricted {
            if let Some(until) = account.restricted_until {
                self.schedule_lift(&account.id, until);
                armed += 1;
            }
        }
        Ok(armed)
    }
}

impl RestrictionPlanner for RestrictionScheduler {
    fn schedule_lift(&self, user: &UserId, at: DateTime<Utc>) {
        // A negative delta means the deadline passed while we were down.
        let wait = (at - Utc::now()).to_std().unwrap_or(Duration::ZERO);
        let directory = Arc::clone(&self.directory);
        let tasks = Arc::clone(&self.tasks);
        let user_id = user.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(wait).await;
            match directory.lift_restrictions(&user_id) {
                Ok(_) => tracing::debug!(user = %user_id.0, "restriction lifted"),
                Err(err) => {
                    tracing::warn!(user = %user_id.0, error = %err, "restriction lift failed")
                }
            }
            tasks
                .lock()
                .expect("scheduler mutex poisoned")
                .remove(&user_id);
        });
        let mut guard = self.tasks.lock().expect("scheduler mutex poisoned");
        if let Some(previous) = guard.insert(user.clone(), handle) {
            previous.abort();
        }
    }

    fn cancel(&self, user: &UserId) {
        let mut guard = self.tasks.lock().expect("scheduler mutex poisoned");
        if let Some(handle) = guard.remove(user) {
            handle.abort();
        }
    }
}
