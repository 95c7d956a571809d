use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::directory::UserId;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResumeId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PerformanceId(pub String);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Education {
    pub institute: String,
    pub university: String,
    pub course: String,
    #[serde(default)]
    pub gpa: Option<f64>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkExperience {
    pub company: String,
    pub job_title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Certificate {
    pub title: String,
    pub institute: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub issued_on: Option<NaiveDate>,
}

/// A student-authored resume document. Students can keep several, one per
/// kind of role they apply to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resume {
    pub id: ResumeId,
    pub student_id: UserId,
    pub title: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub objective: Option<String>,
    pub email: String,
    pub alt_email: Option<String>,
    pub phone: Option<String>,
    pub alt_phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub achievements: Vec<String>,
    pub skills: Vec<String>,
    pub education: Vec<Education>,
    pub projects: Vec<Project>,
    pub work_experience: Vec<WorkExperience>,
    pub certificates: Vec<Certificate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resume {
    pub fn full_name(&self) -> String {
        match self.middle_name.as_deref().filter(|name| !name.is_empty()) {
            Some(middle) => format!("{} {} {}", self.first_name, middle, self.last_name),
            None => format!("{} {}", self.first_name, self.last_name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewResume {
    pub student_id: UserId,
    pub title: String,
    pub first_name: String,
    #[serde(default)]
    pub middle_name: Option<String>,
    pub last_name: String,
    #[serde(default)]
    pub objective: Option<String>,
    pub email: String,
    #[serde(default)]
    pub alt_email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub alt_phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub achievements: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub work_experience: Vec<WorkExperience>,
    #[serde(default)]
    pub certificates: Vec<Certificate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeUpdate {
    pub title: Option<String>,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub objective: Option<String>,
    pub email: Option<String>,
    pub alt_email: Option<String>,
    pub phone: Option<String>,
    pub alt_phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub achievements: Option<Vec<String>>,
    pub skills: Option<Vec<String>>,
    pub education: Option<Vec<Education>>,
    pub projects: Option<Vec<Project>>,
    pub work_experience: Option<Vec<WorkExperience>>,
    pub certificates: Option<Vec<Certificate>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurrentStatus {
    #[default]
    Studying,
    Working,
    Others,
}

/// Pointer to a previously uploaded document. The bytes live outside this
/// service; only the reference travels with the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileReference {
    pub filename: String,
    pub filepath: String,
    #[serde(default)]
    pub mime_type: Option<String>,
}

/// Academic track record, at most one per student. `mca_cgpa` is the
/// per-semester history in order; the latest entry is what eligibility
/// thresholds compare against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentPerformance {
    pub id: PerformanceId,
    pub student_id: UserId,
    pub semester: u32,
    pub tenth_cgpa: Option<f64>,
    pub twelth_cgpa: Option<f64>,
    pub degree_cgpa: Option<f64>,
    pub mca_cgpa: Vec<f64>,
    pub skills: Vec<String>,
    pub current_status: CurrentStatus,
    pub certification_files: Vec<FileReference>,
    pub linkedin_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPerformance {
    pub student_id: UserId,
    pub semester: u32,
    #[serde(default)]
    pub tenth_cgpa: Option<f64>,
    #[serde(default)]
    pub twelth_cgpa: Option<f64>,
    #[serde(default)]
    pub degree_cgpa: Option<f64>,
    #[serde(default)]
    pub mca_cgpa: Vec<f64>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub current_status: CurrentStatus,
    #[serde(default)]
    pub certification_files: Vec<FileReference>,
    #[serde(default)]
    pub linkedin_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceUpdate {
    pub semester: Option<u32>,
    pub tenth_cgpa: Option<f64>,
    pub twelth_cgpa: Option<f64>,
    pub degree_cgpa: Option<f64>,
    pub mca_cgpa: Option<Vec<f64>>,
    pub skills: Option<Vec<String>>,
    pub current_status: Option<CurrentStatus>,
    pub certification_files: Option<Vec<FileReference>>,
    pub linkedin_url: Option<String>,
}
