use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde_json::Value;

use crate::applications::{
    applications_router, ApplicationsService, InMemoryApplicationsRepository, NewJobApplication,
};
use crate::directory::{
    CommunityPermissions, DirectoryRepository, InMemoryDirectoryRepository, Program,
    StudentProfile, StudentStatus, UserAccount, UserId, UserRole, UserStatus,
};
use crate::notify::InMemoryNotifyRepository;
use crate::records::{
    CurrentStatus, InMemoryRecordsRepository, PerformanceId, RecordsRepository, ResumeId,
    StudentPerformance,
};
use crate::recruiting::{
    DriveId, InMemoryRecruitingRepository, JobId, JobType, NewCompany, NewDrive, NewJob,
    RecruitingService,
};

pub(super) type TestService = ApplicationsService<InMemoryApplicationsRepository>;
pub(super) type TestBoard = RecruitingService<InMemoryRecruitingRepository>;

pub(super) fn build_service() -> (
    Arc<TestService>,
    Arc<TestBoard>,
    Arc<InMemoryDirectoryRepository>,
    Arc<InMemoryRecordsRepository>,
) {
    let directory = Arc::new(InMemoryDirectoryRepository::default());
    let records = Arc::new(InMemoryRecordsRepository::default());
    let notices = Arc::new(InMemoryNotifyRepository::default());
    let board = Arc::new(RecruitingService::new(
        Arc::new(InMemoryRecruitingRepository::default()),
        directory.clone(),
        records.clone(),
        notices,
    ));
    let service = Arc::new(ApplicationsService::new(
        Arc::new(InMemoryApplicationsRepository::default()),
        board.clone(),
        directory.clone(),
        records.clone(),
    ));
    (service, board, directory, records)
}

/// Seeds one company, one drive, and one job to apply against.
pub(super) fn seed_job(board: &TestBoard) -> (DriveId, JobId) {
    let company = board
        .add_company(NewCompany {
            name: "Techcorp".to_string(),
            branch: "Kochi".to_string(),
            site: None,
            contact_email: None,
            contact_phone: None,
            avg_salary: Some(650_000.0),
        })
        .expect("company stored");
    let drive = board
        .add_drive(NewDrive {
            title: "Winter 2026".to_string(),
            description: None,
            location: None,
            drive_date: NaiveDate::from_ymd_opt(2026, 1, 20),
            application_deadline: NaiveDate::from_ymd_opt(2026, 1, 10),
            stages: vec!["aptitude".to_string(), "interview".to_string()],
            form_link: None,
        })
        .expect("drive stored");
    let job = board
        .add_job(NewJob {
            drive_id: drive.id.clone(),
            company_id: company.id,
            title: "Backend Engineer".to_string(),
            description: None,
            location: None,
            job_type: JobType::FullTime,
            salary: Some(700_000.0),
            salary_range: None,
            form_link: None,
        })
        .expect("job stored");
    (drive.id, job.id)
}

/// Seeds an active student account plus its profile record.
pub(super) fn seed_student(
    directory: &InMemoryDirectoryRepository,
    id: &str,
    first: &str,
    last: &str,
) -> UserId {
    let user = UserId(id.to_string());
    let now = Utc::now();
    directory
        .insert_user(UserAccount {
            id: user.clone(),
            first_name: first.to_string(),
            middle_name: None,
            last_name: last.to_string(),
            email: format!("{id}@college.edu"),
            phone: Some("9876512345".to_string()),
            role: UserRole::Student,
            status: UserStatus::Active,
            permissions: CommunityPermissions::default(),
            restricted_until: None,
            password_hash: String::new(),
            created_at: now,
            updated_at: now,
        })
        .expect("account stored");
    directory
        .insert_student(StudentProfile {
            id: user.clone(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: format!("{id}@college.edu"),
            register_number: "PC23MCA042".to_string(),
            program: Program::Mca,
            join_date: NaiveDate::from_ymd_opt(2023, 7, 15).expect("valid date"),
            status: StudentStatus::Active,
        })
        .expect("student stored");
    user
}

pub(super) fn seed_performance(records: &InMemoryRecordsRepository, student: &UserId) {
    let now = Utc::now();
    records
        .insert_performance(StudentPerformance {
            id: PerformanceId(format!("prf-{}", student.0)),
            student_id: student.clone(),
            semester: 3,
            tenth_cgpa: Some(9.1),
            twelth_cgpa: Some(8.7),
            degree_cgpa: Some(8.2),
            mca_cgpa: vec![7.8, 8.1],
            skills: vec!["Rust".to_string(), "SQL".to_string()],
            current_status: CurrentStatus::Studying,
            certification_files: Vec::new(),
            linkedin_url: Some("https://linkedin.com/in/riya".to_string()),
            created_at: now,
            updated_at: now,
        })
        .expect("performance stored");
}

/// Submission pointing at a saved resume, the common case.
pub(super) fn saved_resume_application(job: &JobId, student: &UserId) -> NewJobApplication {
    NewJobApplication {
        job_id: job.clone(),
        student_id: student.clone(),
        uploaded_resume: None,
        saved_resume_id: Some(ResumeId("res-000001".to_string())),
        additional_answers: BTreeMap::new(),
    }
}

pub(super) fn router_with_service(service: Arc<TestService>) -> axum::Router {
    applications_router(service)
}

pub(super) async fn read_json_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
