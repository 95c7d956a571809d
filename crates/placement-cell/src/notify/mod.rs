//! Notices and reminders.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{
    NewNotice, NewReminder, Notice, NoticeId, NoticeUpdate, Reminder, ReminderId,
};
pub use repository::{InMemoryNotifyRepository, NotifyRepository};
pub use router::notify_router;
pub use service::{NotifyService, NotifyServiceError};

pub(crate) use service::next_notice_id;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::directory::UserId;

    fn service() -> NotifyService<InMemoryNotifyRepository> {
        NotifyService::new(Arc::new(InMemoryNotifyRepository::default()))
    }

    fn reminder_to(recipients: Option<Vec<UserId>>) -> NewReminder {
        NewReminder {
            title: "Aptitude test".to_string(),
            message: "Report to lab 2 by 9am".to_string(),
            sender_id: UserId("usr-000001".to_string()),
            recipient_ids: recipients,
            job_id: None,
            drive_id: None,
        }
    }

    #[test]
    fn notices_round_trip_through_crud() {
        let service = service();
        let notice = service
            .add_notice(NewNotice {
                title: "Campus drive".to_string(),
                content: "Registrations open".to_string(),
                author: None,
                job_id: None,
                drive_id: None,
            })
            .expect("create succeeds");
        assert!(notice.id.0.starts_with("ntc-"));

        let updated = service
            .update_notice(
                &notice.id,
                NoticeUpdate {
                    content: Some("Registrations close Friday".to_string()),
                    ..Default::default()
                },
            )
            .expect("update succeeds");
        assert_eq!(updated.title, "Campus drive");
        assert_eq!(updated.content, "Registrations close Friday");

        service.delete_notice(&notice.id).expect("delete succeeds");
        assert!(service.get_notice(&notice.id).is_err());
    }

    #[test]
    fn broadcast_reminders_reach_every_student() {
        let service = service();
        let ria = UserId("usr-000010".to_string());
        let ben = UserId("usr-000011".to_string());

        service
            .add_reminder(reminder_to(None))
            .expect("broadcast created");
        service
            .add_reminder(reminder_to(Some(vec![ria.clone()])))
            .expect("targeted created");

        assert_eq!(service.reminders_for_student(&ria).expect("list").len(), 2);
        assert_eq!(service.reminders_for_student(&ben).expect("list").len(), 1);
    }

    #[test]
    fn newest_reminder_comes_first() {
        let service = service();
        service.add_reminder(reminder_to(None)).expect("first");
        let mut second = reminder_to(None);
        second.title = "Mock interview".to_string();
        let latest = service.add_reminder(second).expect("second");

        let student = UserId("usr-000010".to_string());
        let reminders = service.reminders_for_student(&student).expect("list");
        assert_eq!(reminders[0].id, latest.id);
    }

    #[test]
    fn read_receipts_are_set_semantics() {
        let service = service();
        let reminder = service.add_reminder(reminder_to(None)).expect("created");
        let ria = UserId("usr-000010".to_string());

        service
            .mark_reminder_read(&reminder.id, &ria)
            .expect("first read");
        let again = service
            .mark_reminder_read(&reminder.id, &ria)
            .expect("second read");

        assert_eq!(again.read_by, vec![ria]);
    }
}
