use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use crate::storage::RepositoryError;

use super::domain::{
    Company, CompanyId, Drive, DriveId, Job, JobId, Requirement, RequirementId,
};

/// Storage abstraction for companies, drives, jobs, and requirements.
pub trait RecruitingRepository: Send + Sync {
    fn insert_company(&self, company: Company) -> Result<Company, RepositoryError>;
    fn update_company(&self, company: Company) -> Result<(), RepositoryError>;
    fn fetch_company(&self, id: &CompanyId) -> Result<Option<Company>, RepositoryError>;
    fn list_companies(&self) -> Result<Vec<Company>, RepositoryError>;
    fn delete_company(&self, id: &CompanyId) -> Result<(), RepositoryError>;

    fn insert_drive(&self, drive: Drive) -> Result<Drive, RepositoryError>;
    fn update_drive(&self, drive: Drive) -> Result<(), RepositoryError>;
    fn fetch_drive(&self, id: &DriveId) -> Result<Option<Drive>, RepositoryError>;
    fn list_drives(&self) -> Result<Vec<Drive>, RepositoryError>;
    fn delete_drive(&self, id: &DriveId) -> Result<(), RepositoryError>;

    fn insert_job(&self, job: Job) -> Result<Job, RepositoryError>;
    fn update_job(&self, job: Job) -> Result<(), RepositoryError>;
    fn fetch_job(&self, id: &JobId) -> Result<Option<Job>, RepositoryError>;
    fn list_jobs(&self) -> Result<Vec<Job>, RepositoryError>;
    fn jobs_by_drive(&self, drive_id: &DriveId) -> Result<Vec<Job>, RepositoryError>;
    fn delete_job(&self, id: &JobId) -> Result<(), RepositoryError>;

    fn insert_requirement(&self, requirement: Requirement) -> Result<Requirement, RepositoryError>;
    fn update_requirement(&self, requirement: Requirement) -> Result<(), RepositoryError>;
    fn fetch_requirement(&self, id: &RequirementId)
        -> Result<Option<Requirement>, RepositoryError>;
    fn requirement_by_job(&self, job_id: &JobId) -> Result<Option<Requirement>, RepositoryError>;
    fn delete_requirement(&self, id: &RequirementId) -> Result<(), RepositoryError>;
}

/// Default in-memory store; ordered maps keep listings in creation order.
#[derive(Default, Clone)]
pub struct InMemoryRecruitingRepository {
    companies: Arc<Mutex<BTreeMap<CompanyId, Company>>>,
    drives: Arc<Mutex<BTreeMap<DriveId, Drive>>>,
    jobs: Arc<Mutex<BTreeMap<JobId, Job>>>,
    requirements: Arc<Mutex<BTreeMap<RequirementId, Requirement>>>,
}

impl RecruitingRepository for InMemoryRecruitingRepository {
    fn insert_company(&self, company: Company) -> Result<Company, RepositoryError> {
        let mut guard = self.companies.lock().expect("repository mutex poisoned");
        if guard.contains_key(&company.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(company.id.clone(), company.clone());
        Ok(company)
    }

    fn update_company(&self, company: Company) -> Result<(), RepositoryError> {
        let mut guard = self.companies.lock().expect("repository mutex poisoned");
        if guard.contains_key(&company.id) {
            guard.insert(company.id.clone(), company);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch_company(&self, id: &CompanyId) -> Result<Option<Company>, RepositoryError> {
        let guard = self.companies.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list_companies(&self) -> Result<Vec<Company>, RepositoryError> {
        let guard = self.companies.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn delete_company(&self, id: &CompanyId) -> Result<(), RepositoryError> {
        let mut guard = self.companies.lock().expect("repository mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }

    fn insert_drive(&self, drive: Drive) -> Result<Drive, RepositoryError> {
        let mut guard = self.drives.lock().expect("repository mutex poisoned");
        if guard.contains_key(&drive.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(drive.id.clone(), drive.clone());
        Ok(drive)
    }

    fn update_drive(&self, drive: Drive) -> Result<(), RepositoryError> {
        let mut guard = self.drives.lock().expect("repository mutex poisoned");
        if guard.contains_key(&drive.id) {
            guard.insert(drive.id.clone(), drive);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch_drive(&self, id: &DriveId) -> Result<Option<Drive>, RepositoryError> {
        let guard = self.drives.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list_drives(&self) -> Result<Vec<Drive>, RepositoryError> {
        let guard = self.drives.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn delete_drive(&self, id: &DriveId) -> Result<(), RepositoryError> {
        let mut guard = self.drives.lock().expect("repository mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }

    fn insert_job(&self, job: Job) -> Result<Job, RepositoryError> {
        let mut guard = self.jobs.lock().expect("repository mutex poisoned");
        if guard.contains_key(&job.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(job.id.clone(), job.clone());
        Ok(job)
    }

    fn update_job(&self, job: Job) -> Result<(), RepositoryError> {
        let mut guard = self.jobs.lock().expect("repository mutex poisoned");
        if guard.contains_key(&job.id) {
            guard.insert(job.id.clone(), job);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch_job(&self, id: &JobId) -> Result<Option<Job>, RepositoryError> {
        let guard = self.jobs.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list_jobs(&self) -> Result<Vec<Job>, RepositoryError> {
        let guard = self.jobs.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn jobs_by_drive(&self, drive_id: &DriveId) -> Result<Vec<Job>, RepositoryError> {
        let guard = self.jobs.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|job| &job.drive_id == drive_id)
            .cloned()
            .collect())
    }

    fn delete_job(&self, id: &JobId) -> Result<(), RepositoryError> {
        let mut guard = self.jobs.lock().expect("repository mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }

    fn insert_requirement(&self, requirement: Requirement) -> Result<Requirement, RepositoryError> {
        let mut guard = self.requirements.lock().expect("repository mutex poisoned");
        if guard.contains_key(&requirement.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(requirement.id.clone(), requirement.clone());
        Ok(requirement)
    }

    fn update_requirement(&self, requirement: Requirement) -> Result<(), RepositoryError> {
        let mut guard = self.requirements.lock().expect("repository mutex poisoned");
        if guard.contains_key(&requirement.id) {
            guard.insert(requirement.id.clone(), requirement);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch_requirement(
        &self,
        id: &RequirementId,
    ) -> Result<Option<Requirement>, RepositoryError> {
        let guard = self.requirements.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn requirement_by_job(&self, job_id: &JobId) -> Result<Option<Requirement>, RepositoryError> {
        let guard = self.requirements.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .find(|requirement| &requirement.job_id == job_id)
            .cloned())
    }

    fn delete_requirement(&self, id: &RequirementId) -> Result<(), RepositoryError> {
        let mut guard = self.requirements.lock().expect("repository mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }
}
