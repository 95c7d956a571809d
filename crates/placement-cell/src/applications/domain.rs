use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::directory::UserId;
use crate::records::{FileReference, ResumeId};
use crate::recruiting::{DriveId, JobId};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JobApplicationId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ApplicationFormId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DriveFormId(pub String);

/// Pipeline position of one application. Each transition out of `Applied`
/// stamps its own date column exactly once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    #[default]
    Applied,
    Shortlisted,
    Rejected,
    Placed,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "applied",
            ApplicationStatus::Shortlisted => "shortlisted",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Placed => "placed",
        }
    }
}

/// One student's application to one job. Carries either an uploaded file
/// reference or a pointer to a saved resume; the service rejects submissions
/// with neither.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobApplication {
    pub id: JobApplicationId,
    pub job_id: JobId,
    pub drive_id: DriveId,
    pub student_id: UserId,
    pub status: ApplicationStatus,
    #[serde(default)]
    pub uploaded_resume: Option<FileReference>,
    #[serde(default)]
    pub saved_resume_id: Option<ResumeId>,
    #[serde(default)]
    pub additional_answers: BTreeMap<String, String>,
    pub applied_date: DateTime<Utc>,
    #[serde(default)]
    pub shortlisted_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub rejected_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub placed_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Submission payload. The drive is resolved from the job, never trusted
/// from the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewJobApplication {
    pub job_id: JobId,
    pub student_id: UserId,
    #[serde(default)]
    pub uploaded_resume: Option<FileReference>,
    #[serde(default)]
    pub saved_resume_id: Option<ResumeId>,
    #[serde(default)]
    pub additional_answers: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    pub status: ApplicationStatus,
}

/// Answer sheet for the standard fields. Everything is free text exactly as
/// the student typed it; the owning drive's toggle set decides which of
/// these a student was shown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardAnswers {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub middle_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub admission_number: Option<String>,
    #[serde(default)]
    pub register_number: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub alt_email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub alt_phone: Option<String>,
    #[serde(default)]
    pub program: Option<String>,
    #[serde(default)]
    pub tenth_cgpa: Option<String>,
    #[serde(default)]
    pub twelth_cgpa: Option<String>,
    #[serde(default)]
    pub degree_cgpa: Option<String>,
    #[serde(default)]
    pub mca_cgpa: Option<String>,
    #[serde(default)]
    pub skills: Option<String>,
    #[serde(default)]
    pub current_status: Option<String>,
    #[serde(default)]
    pub linkedin_url: Option<String>,
}

/// Filled form attached to an application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationForm {
    pub id: ApplicationFormId,
    pub application_id: JobApplicationId,
    pub answers: StandardAnswers,
    #[serde(default)]
    pub additional_answers: BTreeMap<String, String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewApplicationForm {
    pub application_id: JobApplicationId,
    #[serde(default)]
    pub answers: StandardAnswers,
    #[serde(default)]
    pub additional_answers: BTreeMap<String, String>,
}

/// Resubmission payload; an absent block leaves the stored one untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicationFormUpdate {
    pub answers: Option<StandardAnswers>,
    pub additional_answers: Option<BTreeMap<String, String>>,
}

fn enabled() -> bool {
    true
}

/// Which standard fields a drive's form puts in front of the student.
/// Defaults mirror the usual recruiter sheet: identity, contact, academics
/// on; the long tail of address and alternate-contact fields off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardFieldToggles {
    #[serde(default = "enabled")]
    pub include_first_name: bool,
    #[serde(default)]
    pub include_middle_name: bool,
    #[serde(default = "enabled")]
    pub include_last_name: bool,
    #[serde(default)]
    pub include_address: bool,
    #[serde(default)]
    pub include_city: bool,
    #[serde(default)]
    pub include_state: bool,
    #[serde(default)]
    pub include_gender: bool,
    #[serde(default)]
    pub include_admission_number: bool,
    #[serde(default = "enabled")]
    pub include_register_number: bool,
    #[serde(default = "enabled")]
    pub include_email: bool,
    #[serde(default)]
    pub include_alt_email: bool,
    #[serde(default = "enabled")]
    pub include_phone: bool,
    #[serde(default)]
    pub include_alt_phone: bool,
    #[serde(default = "enabled")]
    pub include_program: bool,
    #[serde(default = "enabled")]
    pub include_tenth_cgpa: bool,
    #[serde(default = "enabled")]
    pub include_twelth_cgpa: bool,
    #[serde(default = "enabled")]
    pub include_degree_cgpa: bool,
    #[serde(default = "enabled")]
    pub include_mca_cgpa: bool,
    #[serde(default = "enabled")]
    pub include_skills: bool,
    #[serde(default)]
    pub include_current_status: bool,
    #[serde(default = "enabled")]
    pub include_linkedin_url: bool,
}

impl Default for StandardFieldToggles {
    fn default() -> Self {
        Self {
            include_first_name: true,
            include_middle_name: false,
            include_last_name: true,
            include_address: false,
            include_city: false,
            include_state: false,
            include_gender: false,
            include_admission_number: false,
            include_register_number: true,
            include_email: true,
            include_alt_email: false,
            include_phone: true,
            include_alt_phone: false,
            include_program: true,
            include_tenth_cgpa: true,
            include_twelth_cgpa: true,
            include_degree_cgpa: true,
            include_mca_cgpa: true,
            include_skills: true,
            include_current_status: false,
            include_linkedin_url: true,
        }
    }
}

/// Per-drive form template, at most one per drive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriveForm {
    pub id: DriveFormId,
    pub drive_id: DriveId,
    pub fields: StandardFieldToggles,
    #[serde(default)]
    pub additional_field_labels: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDriveForm {
    pub drive_id: DriveId,
    #[serde(default)]
    pub fields: StandardFieldToggles,
    #[serde(default)]
    pub additional_field_labels: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DriveFormUpdate {
    pub fields: Option<StandardFieldToggles>,
    pub additional_field_labels: Option<Vec<String>>,
}

/// Payload for the prefill endpoint. The caller saves the hosted form's
/// HTML and ships it here; the service never fetches anything itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrefillRequest {
    pub student_id: UserId,
    pub form_url: String,
    pub form_html: String,
}
