//! Recruiting pipeline: companies, drives, jobs, and per-job requirements.
//! Eligibility is computed against the student roster and performance
//! records; job-level lists aggregate up to the owning drive.

pub mod domain;
pub mod eligibility;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Company, CompanyId, CompanyUpdate, Drive, DriveDetail, DriveId, DriveUpdate, Job, JobDetail,
    JobId, JobType, JobUpdate, NewCompany, NewDrive, NewJob, NewRequirement, Requirement,
    RequirementId, RequirementUpdate,
};
pub use repository::{InMemoryRecruitingRepository, RecruitingRepository};
pub use router::recruiting_router;
pub use service::{RecruitingService, RecruitingServiceError};
