use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde_json::Value;

use crate::analysis::{analysis_router, AnalysisService};
use crate::directory::{
    CommunityPermissions, DirectoryRepository, InMemoryDirectoryRepository, Program,
    StudentProfile, StudentStatus, UserAccount, UserId, UserRole, UserStatus,
};
use crate::recruiting::{
    Company, CompanyId, Drive, DriveId, InMemoryRecruitingRepository, Job, JobId, JobType,
    RecruitingRepository,
};

pub(super) fn build_service() -> (
    Arc<AnalysisService>,
    Arc<InMemoryRecruitingRepository>,
    Arc<InMemoryDirectoryRepository>,
) {
    let recruiting = Arc::new(InMemoryRecruitingRepository::default());
    let directory = Arc::new(InMemoryDirectoryRepository::default());
    let service = Arc::new(AnalysisService::new(recruiting.clone(), directory.clone()));
    (service, recruiting, directory)
}

/// Seeds a bare account with no student profile attached.
pub(super) fn seed_account(
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
            phone: None,
            role: UserRole::Student,
            status: UserStatus::Active,
            permissions: CommunityPermissions::default(),
            restricted_until: None,
            password_hash: String::new(),
            created_at: now,
            updated_at: now,
        })
        .expect("account stored");
    user
}

/// Seeds an active account plus the student profile the reports read.
pub(super) fn seed_student(
    directory: &InMemoryDirectoryRepository,
    id: &str,
    first: &str,
    last: &str,
) -> UserId {
    let user = seed_account(directory, id, first, last);
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

pub(super) fn seed_company(
    recruiting: &InMemoryRecruitingRepository,
    id: &str,
    name: &str,
) -> CompanyId {
    let now = Utc::now();
    let company_id = CompanyId(id.to_string());
    recruiting
        .insert_company(Company {
            id: company_id.clone(),
            name: name.to_string(),
            branch: "Kochi".to_string(),
            site: None,
            contact_email: None,
            contact_phone: None,
            avg_salary: None,
            placed_students: Vec::new(),
            created_at: now,
            updated_at: now,
        })
        .expect("company stored");
    company_id
}

pub(super) fn seed_drive(
    recruiting: &InMemoryRecruitingRepository,
    id: &str,
    title: &str,
) -> DriveId {
    let now = Utc::now();
    let drive_id = DriveId(id.to_string());
    recruiting
        .insert_drive(Drive {
            id: drive_id.clone(),
            title: title.to_string(),
            description: None,
            location: None,
            drive_date: NaiveDate::from_ymd_opt(2026, 1, 20),
            application_deadline: None,
            stages: vec!["aptitude".to_string(), "interview".to_string()],
            form_link: None,
            published: true,
            applied_students: Vec::new(),
            eligible_students: Vec::new(),
            selected_students: Vec::new(),
            stage_students: Vec::new(),
            created_at: now,
            updated_at: now,
        })
        .expect("drive stored");
    drive_id
}

/// Job row with empty rosters; tests fill in the lists they care about
/// before inserting it.
pub(super) fn job_row(
    id: &str,
    drive: &DriveId,
    company: &CompanyId,
    title: &str,
    salary: Option<f64>,
) -> Job {
    let now = Utc::now();
    Job {
        id: JobId(id.to_string()),
        drive_id: drive.clone(),
        company_id: company.clone(),
        title: title.to_string(),
        description: None,
        location: None,
        job_type: JobType::FullTime,
        salary,
        salary_range: None,
        form_link: None,
        applied_students: Vec::new(),
        eligible_students: Vec::new(),
        selected_students: Vec::new(),
        stage_students: Vec::new(),
        created_at: now,
        updated_at: now,
    }
}

pub(super) fn router_with_service(service: Arc<AnalysisService>) -> axum::Router {
    analysis_router(service)
}

pub(super) async fn read_json_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
