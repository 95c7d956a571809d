use std::sync::{Arc, Mutex};

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

use crate::config::AuthConfig;
use crate::directory::mail::{MailError, MailGateway, OutboundMail};
use crate::directory::{
    directory_router, DirectoryService, InMemoryDirectoryRepository, NewFaculty, NewStudent,
    NewUser, Program, RestrictionPlanner, UserAccount, UserId, UserRole,
};

pub(super) fn auth_config() -> AuthConfig {
    AuthConfig {
        token_secret: "directory-test-secret".to_string(),
        token_ttl_minutes: 30,
    }
}

#[derive(Default, Clone)]
pub(super) struct RecordingMail {
    messages: Arc<Mutex<Vec<OutboundMail>>>,
}

impl RecordingMail {
    pub(super) fn messages(&self) -> Vec<OutboundMail> {
        self.messages.lock().expect("mail mutex poisoned").clone()
    }
}

impl MailGateway for RecordingMail {
    fn send(&self, mail: OutboundMail) -> Result<(), MailError> {
        self.messages
            .lock()
            .expect("mail mutex poisoned")
            .push(mail);
        Ok(())
    }
}

#[derive(Default)]
pub(super) struct RecordingPlanner {
    scheduled: Mutex<Vec<(UserId, DateTime<Utc>)>>,
    cancelled: Mutex<Vec<UserId>>,
}

impl RecordingPlanner {
    pub(super) fn scheduled(&self) -> Vec<(UserId, DateTime<Utc>)> {
        self.scheduled
            .lock()
            .expect("planner mutex poisoned")
            .clone()
    }

    pub(super) fn cancelled(&self) -> Vec<UserId> {
        self.cancelled
            .lock()
            .expect("planner mutex poisoned")
            .clone()
    }
}

impl RestrictionPlanner for RecordingPlanner {
    fn schedule_lift(&self, user: &UserId, at: DateTime<Utc>) {
        self.scheduled
            .lock()
            .expect("planner mutex poisoned")
            .push((user.clone(), at));
    }

    fn cancel(&self, user: &UserId) {
        self.cancelled
            .lock()
            .expect("planner mutex poisoned")
            .push(user.clone());
    }
}

pub(super) type TestService = DirectoryService<InMemoryDirectoryRepository, RecordingMail>;

pub(super) fn build_service() -> (
    Arc<TestService>,
    Arc<InMemoryDirectoryRepository>,
    Arc<RecordingMail>,
    Arc<RecordingPlanner>,
) {
    let repository = Arc::new(InMemoryDirectoryRepository::default());
    let mail = Arc::new(RecordingMail::default());
    let planner = Arc::new(RecordingPlanner::default());
    let service = Arc::new(DirectoryService::new(
        repository.clone(),
        mail.clone(),
        planner.clone(),
        &auth_config(),
    ));
    (service, repository, mail, planner)
}

pub(super) fn new_user(first: &str, last: &str, email: &str, role: UserRole) -> NewUser {
    NewUser {
        first_name: first.to_string(),
        middle_name: None,
        last_name: last.to_string(),
        email: email.to_string(),
        phone: Some("9876500000".to_string()),
        role,
    }
}

pub(super) fn new_student(first: &str, last: &str, email: &str) -> NewStudent {
    NewStudent {
        first_name: first.to_string(),
        middle_name: None,
        last_name: last.to_string(),
        email: email.to_string(),
        phone: Some("9876500001".to_string()),
        register_number: "PC23MCA001".to_string(),
        program: Program::Mca,
        join_date: NaiveDate::from_ymd_opt(2023, 7, 15).expect("valid date"),
    }
}

pub(super) fn new_faculty(first: &str, last: &str, email: &str) -> NewFaculty {
    NewFaculty {
        first_name: first.to_string(),
        middle_name: None,
        last_name: last.to_string(),
        email: email.to_string(),
        phone: None,
        department: "Computer Applications".to_string(),
        designation: "Assistant Professor".to_string(),
    }
}

/// Pulls the generated temporary password out of the welcome mail body.
pub(super) fn temp_password(mail: &OutboundMail) -> String {
    mail.body
        .split("temporary password ")
        .nth(1)
        .and_then(|rest| rest.split_whitespace().next())
        .expect("welcome mail carries the password")
        .to_string()
}

/// Registers an account and completes the password reset so it can log in.
pub(super) fn activated_user(
    service: &TestService,
    first: &str,
    last: &str,
    email: &str,
    role: UserRole,
) -> UserAccount {
    service
        .add_user(new_user(first, last, email, role))
        .expect("registration succeeds");
    service
        .reset_password(email, "s3cret-pass")
        .expect("reset succeeds")
}

pub(super) fn router_with_service(service: Arc<TestService>) -> axum::Router {
    directory_router(service)
}

pub(super) async fn read_json_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
