use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde_json::Value;

use crate::directory::{
    DirectoryRepository, InMemoryDirectoryRepository, Program, StudentProfile, StudentStatus,
    UserId,
};
use crate::notify::InMemoryNotifyRepository;
use crate::records::{
    CurrentStatus, InMemoryRecordsRepository, PerformanceId, RecordsRepository,
    StudentPerformance,
};
use crate::recruiting::{
    recruiting_router, CompanyId, DriveId, InMemoryRecruitingRepository, JobId, JobType,
    NewCompany, NewDrive, NewJob, NewRequirement, RecruitingService,
};

pub(super) type TestService = RecruitingService<InMemoryRecruitingRepository>;

pub(super) fn build_service() -> (
    Arc<TestService>,
    Arc<InMemoryDirectoryRepository>,
    Arc<InMemoryRecordsRepository>,
    Arc<InMemoryNotifyRepository>,
) {
    let repository = Arc::new(InMemoryRecruitingRepository::default());
    let directory = Arc::new(InMemoryDirectoryRepository::default());
    let records = Arc::new(InMemoryRecordsRepository::default());
    let notices = Arc::new(InMemoryNotifyRepository::default());
    let service = Arc::new(RecruitingService::new(
        repository,
        directory.clone(),
        records.clone(),
        notices.clone(),
    ));
    (service, directory, records, notices)
}

/// Seeds an active MCA student joining in July of the given year.
pub(super) fn seed_student(
    directory: &InMemoryDirectoryRepository,
    id: &str,
    join_year: i32,
) -> UserId {
    let user = UserId(id.to_string());
    directory
        .insert_student(StudentProfile {
            id: user.clone(),
            first_name: "Student".to_string(),
            last_name: id.to_string(),
            email: format!("{id}@college.edu"),
            register_number: format!("PC{}MCA{}", join_year % 100, id),
            program: Program::Mca,
            join_date: NaiveDate::from_ymd_opt(join_year, 7, 15).expect("valid date"),
            status: StudentStatus::Active,
        })
        .expect("student stored");
    user
}

pub(super) fn seed_performance(
    records: &InMemoryRecordsRepository,
    student: &UserId,
    degree_cgpa: Option<f64>,
    mca_cgpa: &[f64],
) {
    let now = Utc::now();
    records
        .insert_performance(StudentPerformance {
            id: PerformanceId(format!("prf-{}", student.0)),
            student_id: student.clone(),
            semester: 3,
            tenth_cgpa: Some(9.0),
            twelth_cgpa: Some(8.5),
            degree_cgpa,
            mca_cgpa: mca_cgpa.to_vec(),
            skills: Vec::new(),
            current_status: CurrentStatus::Studying,
            certification_files: Vec::new(),
            linkedin_url: None,
            created_at: now,
            updated_at: now,
        })
        .expect("performance stored");
}

pub(super) fn new_company(name: &str) -> NewCompany {
    NewCompany {
        name: name.to_string(),
        branch: "Kochi".to_string(),
        site: None,
        contact_email: Some(format!("talent@{}.example", name.to_ascii_lowercase())),
        contact_phone: None,
        avg_salary: Some(650_000.0),
    }
}

pub(super) fn new_drive(title: &str) -> NewDrive {
    NewDrive {
        title: title.to_string(),
        description: Some("Campus placement drive".to_string()),
        location: Some("Main auditorium".to_string()),
        drive_date: NaiveDate::from_ymd_opt(2026, 1, 20),
        application_deadline: NaiveDate::from_ymd_opt(2026, 1, 10),
        stages: vec!["aptitude".to_string(), "interview".to_string()],
        form_link: None,
    }
}

pub(super) fn new_job(drive: &DriveId, company: &CompanyId, title: &str) -> NewJob {
    NewJob {
        drive_id: drive.clone(),
        company_id: company.clone(),
        title: title.to_string(),
        description: None,
        location: None,
        job_type: JobType::FullTime,
        salary: Some(700_000.0),
        salary_range: None,
        form_link: None,
    }
}

/// Requirement with no thresholds; tests tighten the fields they exercise.
pub(super) fn open_requirement(job: &JobId) -> NewRequirement {
    NewRequirement {
        job_id: job.clone(),
        experience_required: 0,
        sslc_cgpa: None,
        plustwo_cgpa: None,
        degree_cgpa: None,
        mca_cgpa: None,
        passout_year: None,
        skills_required: Vec::new(),
        required_certifications: Vec::new(),
        language_requirements: Vec::new(),
        additional_criteria: None,
    }
}

pub(super) fn router_with_service(service: Arc<TestService>) -> axum::Router {
    recruiting_router(service)
}

pub(super) async fn read_json_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
