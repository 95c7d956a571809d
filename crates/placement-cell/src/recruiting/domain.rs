use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::directory::UserId;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CompanyId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DriveId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JobId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequirementId(pub String);

/// Recruiting partner. `placed_students` accumulates across drives as
/// selections are confirmed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    pub branch: String,
    pub site: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub avg_salary: Option<f64>,
    pub placed_students: Vec<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCompany {
    pub name: String,
    pub branch: String,
    #[serde(default)]
    pub site: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub avg_salary: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyUpdate {
    pub name: Option<String>,
    pub branch: Option<String>,
    pub site: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub avg_salary: Option<f64>,
}

/// Recruitment drive. The five student lists mirror the ones on its jobs
/// and are refreshed by aggregation whenever a job list changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drive {
    pub id: DriveId,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub drive_date: Option<NaiveDate>,
    pub application_deadline: Option<NaiveDate>,
    pub stages: Vec<String>,
    pub form_link: Option<String>,
    pub published: bool,
    pub applied_students: Vec<UserId>,
    pub eligible_students: Vec<UserId>,
    pub selected_students: Vec<UserId>,
    pub stage_students: Vec<Vec<UserId>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDrive {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub drive_date: Option<NaiveDate>,
    #[serde(default)]
    pub application_deadline: Option<NaiveDate>,
    #[serde(default)]
    pub stages: Vec<String>,
    #[serde(default)]
    pub form_link: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DriveUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub drive_date: Option<NaiveDate>,
    pub application_deadline: Option<NaiveDate>,
    pub stages: Option<Vec<String>>,
    pub form_link: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobType {
    FullTime,
    PartTime,
    Contract,
    Remote,
}

impl JobType {
    pub const fn label(self) -> &'static str {
        match self {
            JobType::FullTime => "full-time",
            JobType::PartTime => "part-time",
            JobType::Contract => "contract",
            JobType::Remote => "remote",
        }
    }
}

impl Default for JobType {
    fn default() -> Self {
        JobType::FullTime
    }
}

/// A single opening inside a drive. `salary_range` is `(min, max)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub drive_id: DriveId,
    pub company_id: CompanyId,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub job_type: JobType,
    pub salary: Option<f64>,
    pub salary_range: Option<(u32, u32)>,
    pub form_link: Option<String>,
    pub applied_students: Vec<UserId>,
    pub eligible_students: Vec<UserId>,
    pub selected_students: Vec<UserId>,
    pub stage_students: Vec<Vec<UserId>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewJob {
    pub drive_id: DriveId,
    pub company_id: CompanyId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub job_type: JobType,
    #[serde(default)]
    pub salary: Option<f64>,
    #[serde(default)]
    pub salary_range: Option<(u32, u32)>,
    #[serde(default)]
    pub form_link: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<JobType>,
    pub salary: Option<f64>,
    pub salary_range: Option<(u32, u32)>,
    pub form_link: Option<String>,
}

/// Eligibility thresholds for one job. Every threshold is optional; the
/// `mca_cgpa` list tracks semester cut-offs and only its last entry is
/// compared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Requirement {
    pub id: RequirementId,
    pub job_id: JobId,
    pub experience_required: u32,
    pub sslc_cgpa: Option<f64>,
    pub plustwo_cgpa: Option<f64>,
    pub degree_cgpa: Option<f64>,
    pub mca_cgpa: Option<Vec<f64>>,
    pub passout_year: Option<i32>,
    pub skills_required: Vec<String>,
    pub required_certifications: Vec<String>,
    pub language_requirements: Vec<String>,
    pub additional_criteria: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRequirement {
    pub job_id: JobId,
    #[serde(default)]
    pub experience_required: u32,
    #[serde(default)]
    pub sslc_cgpa: Option<f64>,
    #[serde(default)]
    pub plustwo_cgpa: Option<f64>,
    #[serde(default)]
    pub degree_cgpa: Option<f64>,
    #[serde(default)]
    pub mca_cgpa: Option<Vec<f64>>,
    #[serde(default)]
    pub passout_year: Option<i32>,
    #[serde(default)]
    pub skills_required: Vec<String>,
    #[serde(default)]
    pub required_certifications: Vec<String>,
    #[serde(default)]
    pub language_requirements: Vec<String>,
    #[serde(default)]
    pub additional_criteria: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequirementUpdate {
    pub experience_required: Option<u32>,
    pub sslc_cgpa: Option<f64>,
    pub plustwo_cgpa: Option<f64>,
    pub degree_cgpa: Option<f64>,
    pub mca_cgpa: Option<Vec<f64>>,
    pub passout_year: Option<i32>,
    pub skills_required: Option<Vec<String>>,
    pub required_certifications: Option<Vec<String>>,
    pub language_requirements: Option<Vec<String>>,
    pub additional_criteria: Option<String>,
}

/// Expanded drive view: the drive plus each job with its requirement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobDetail {
    pub job: Job,
    pub requirement: Option<Requirement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriveDetail {
    pub drive: Drive,
    pub jobs: Vec<JobDetail>,
}
