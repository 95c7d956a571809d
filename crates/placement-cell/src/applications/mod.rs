//! Job applications, per-drive form templates, and hosted-form prefill.
//! Submissions fan out to the recruiting pipeline so the job's applicant
//! roster and the application store never drift apart.

pub mod domain;
pub mod prefill;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicationForm, ApplicationFormId, ApplicationFormUpdate, ApplicationStatus, DriveForm,
    DriveFormId, DriveFormUpdate, JobApplication, JobApplicationId, NewApplicationForm,
    NewDriveForm, NewJobApplication, PrefillRequest, StandardAnswers, StandardFieldToggles,
    StatusChange,
};
pub use prefill::{FormField, PrefillError, PrefillOutcome, StudentSnapshot};
pub use repository::{ApplicationsRepository, InMemoryApplicationsRepository};
pub use router::applications_router;
pub use service::{ApplicationsService, ApplicationsServiceError, JobBoard};
