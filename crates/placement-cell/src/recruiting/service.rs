use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;

use crate::directory::{DirectoryRepository, UserId};
use crate::notify::{self, Notice, NotifyRepository};
use crate::records::{RecordsRepository, StudentPerformance};
use crate::storage::RepositoryError;

use super::domain::{
    Company, CompanyId, CompanyUpdate, Drive, DriveDetail, DriveId, DriveUpdate, Job, JobDetail,
    JobId, JobUpdate, NewCompany, NewDrive, NewJob, NewRequirement, Requirement, RequirementId,
    RequirementUpdate,
};
use super::eligibility;
use super::repository::RecruitingRepository;

static COMPANY_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static DRIVE_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static JOB_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static REQUIREMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_company_id() -> CompanyId {
    let id = COMPANY_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    CompanyId(format!("cmp-{id:06}"))
}

fn next_drive_id() -> DriveId {
    let id = DRIVE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    DriveId(format!("drv-{id:06}"))
}

fn next_job_id() -> JobId {
    let id = JOB_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    JobId(format!("job-{id:06}"))
}

fn next_requirement_id() -> RequirementId {
    let id = REQUIREMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    RequirementId(format!("req-{id:06}"))
}

#[derive(Debug, thiserror::Error)]
pub enum RecruitingServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Companies, drives, jobs, requirements, and the eligibility pipeline.
/// Job-level list changes fan out to the owning drive by aggregation.
pub struct RecruitingService<R> {
    repository: Arc<R>,
    directory: Arc<dyn DirectoryRepository>,
    records: Arc<dyn RecordsRepository>,
    notices: Arc<dyn NotifyRepository>,
}

impl<R> RecruitingService<R>
where
    R: RecruitingRepository + 'static,
{
    pub fn new(
        repository: Arc<R>,
        directory: Arc<dyn DirectoryRepository>,
        records: Arc<dyn RecordsRepository>,
        notices: Arc<dyn NotifyRepository>,
    ) -> Self {
        Self {
            repository,
            directory,
            records,
            notices,
        }
    }

    pub fn repository(&self) -> Arc<R> {
        Arc::clone(&self.repository)
    }

    pub fn add_company(&self, new_company: NewCompany) -> Result<Company, RecruitingServiceError> {
        let now = Utc::now();
        let company = Company {
            id: next_company_id(),
            name: new_company.name,
            branch: new_company.branch,
            site: new_company.site,
            contact_email: new_company.contact_email,
            contact_phone: new_company.contact_phone,
            avg_salary: new_company.avg_salary,
            placed_students: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        Ok(self.repository.insert_company(company)?)
    }

    pub fn get_company(&self, id: &CompanyId) -> Result<Company, RecruitingServiceError> {
        self.repository
            .fetch_company(id)?
            .ok_or(RecruitingServiceError::Repository(RepositoryError::NotFound))
    }

    pub fn list_companies(&self) -> Result<Vec<Company>, RecruitingServiceError> {
        Ok(self.repository.list_companies()?)
    }

    pub fn update_company(
        &self,
        id: &CompanyId,
        update: CompanyUpdate,
    ) -> Result<Company, RecruitingServiceError> {
        let mut company = self.get_company(id)?;
        if let Some(name) = update.name {
            company.name = name;
        }
        if let Some(branch) = update.branch {
            company.branch = branch;
        }
        if let Some(site) = update.site {
            company.site = Some(site);
        }
        if let Some(contact_email) = update.contact_email {
            company.contact_email = Some(contact_email);
        }
        if let Some(contact_phone) = update.contact_phone {
            company.contact_phone = Some(contact_phone);
        }
        if let Some(avg_salary) = update.avg_salary {
            company.avg_salary = Some(avg_salary);
        }
        company.updated_at = Utc::now();
        self.repository.update_company(company.clone())?;
        Ok(company)
    }

    pub fn delete_company(&self, id: &CompanyId) -> Result<(), RecruitingServiceError> {
        Ok(self.repository.delete_company(id)?)
    }

    pub fn add_drive(&self, new_drive: NewDrive) -> Result<Drive, RecruitingServiceError> {
        let now = Utc::now();
        let drive = Drive {
            id: next_drive_id(),
            title: new_drive.title,
            description: new_drive.description,
            location: new_drive.location,
            drive_date: new_drive.drive_date,
            application_deadline: new_drive.application_deadline,
            stages: new_drive.stages,
            form_link: new_drive.form_link,
            published: false,
            applied_students: Vec::new(),
            eligible_students: Vec::new(),
            selected_students: Vec::new(),
            stage_students: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        Ok(self.repository.insert_drive(drive)?)
    }

    pub fn get_drive(&self, id: &DriveId) -> Result<Drive, RecruitingServiceError> {
        self.repository
            .fetch_drive(id)?
            .ok_or(RecruitingServiceError::Repository(RepositoryError::NotFound))
    }

    /// Expanded view: the drive plus every job under it with its requirement.
    pub fn expand_drive(&self, id: &DriveId) -> Result<DriveDetail, RecruitingServiceError> {
        let drive = self.get_drive(id)?;
        let mut jobs = Vec::new();
        for job in self.repository.jobs_by_drive(id)? {
            let requirement = self.repository.requirement_by_job(&job.id)?;
            jobs.push(JobDetail { job, requirement });
        }
        Ok(DriveDetail { drive, jobs })
    }

    pub fn list_drives(&self) -> Result<Vec<Drive>, RecruitingServiceError> {
        Ok(self.repository.list_drives()?)
    }

    pub fn update_drive(
        &self,
        id: &DriveId,
        update: DriveUpdate,
    ) -> Result<Drive, RecruitingServiceError> {
        let mut drive = self.get_drive(id)?;
        if let Some(title) = update.title {
            drive.title = title;
        }
        if let Some(description) = update.description {
            drive.description = Some(description);
        }
        if let Some(location) = update.location {
            drive.location = Some(location);
        }
        if let Some(drive_date) = update.drive_date {
            drive.drive_date = Some(drive_date);
        }
        if let Some(application_deadline) = update.application_deadline {
            drive.application_deadline = Some(application_deadline);
        }
        if let Some(stages) = update.stages {
            drive.stages = stages;
        }
        if let Some(form_link) = update.form_link {
            drive.form_link = Some(form_link);
        }
        drive.updated_at = Utc::now();
        self.repository.update_drive(drive.clone())?;
        Ok(drive)
    }

    pub fn publish_drive(&self, id: &DriveId) -> Result<Drive, RecruitingServiceError> {
        let mut drive = self.get_drive(id)?;
        drive.published = true;
        drive.updated_at = Utc::now();
        self.repository.update_drive(drive.clone())?;
        Ok(drive)
    }

    /// Deleting a drive removes its jobs and their requirements.
    pub fn delete_drive(&self, id: &DriveId) -> Result<(), RecruitingServiceError> {
        self.get_drive(id)?;
        for job in self.repository.jobs_by_drive(id)? {
            self.remove_job_records(&job.id)?;
        }
        Ok(self.repository.delete_drive(id)?)
    }

    pub fn add_job(&self, new_job: NewJob) -> Result<Job, RecruitingServiceError> {
        let drive = self.get_drive(&new_job.drive_id)?;
        self.get_company(&new_job.company_id)?;
        let now = Utc::now();
        let job = Job {
            id: next_job_id(),
            drive_id: new_job.drive_id,
            company_id: new_job.company_id,
            title: new_job.title,
            description: new_job.description,
            location: new_job.location,
            job_type: new_job.job_type,
            salary: new_job.salary,
            salary_range: new_job.salary_range,
            form_link: new_job.form_link,
            applied_students: Vec::new(),
            eligible_students: Vec::new(),
            selected_students: Vec::new(),
            stage_students: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        let stored = self.repository.insert_job(job)?;
        self.announce_job(&stored, &drive)?;
        Ok(stored)
    }

    fn announce_job(&self, job: &Job, drive: &Drive) -> Result<(), RecruitingServiceError> {
        let now = Utc::now();
        let notice = Notice {
            id: notify::next_notice_id(),
            title: format!("New job: {}", job.title),
            content: format!(
                "A new job '{}' has been posted under drive '{}'. Check the jobs section for \
                 details.",
                job.title, drive.title
            ),
            author: None,
            job_id: Some(job.id.0.clone()),
            drive_id: Some(drive.id.0.clone()),
            created_at: now,
            updated_at: now,
        };
        self.notices.insert_notice(notice)?;
        Ok(())
    }

    pub fn get_job(&self, id: &JobId) -> Result<Job, RecruitingServiceError> {
        self.repository
            .fetch_job(id)?
            .ok_or(RecruitingServiceError::Repository(RepositoryError::NotFound))
    }

    pub fn list_jobs(&self) -> Result<Vec<Job>, RecruitingServiceError> {
        Ok(self.repository.list_jobs()?)
    }

    pub fn jobs_by_drive(&self, drive_id: &DriveId) -> Result<Vec<Job>, RecruitingServiceError> {
        self.get_drive(drive_id)?;
        Ok(self.repository.jobs_by_drive(drive_id)?)
    }

    pub fn update_job(&self, id: &JobId, update: JobUpdate) -> Result<Job, RecruitingServiceError> {
        let mut job = self.get_job(id)?;
        if let Some(title) = update.title {
            job.title = title;
        }
        if let Some(description) = update.description {
            job.description = Some(description);
        }
        if let Some(location) = update.location {
            job.location = Some(location);
        }
        if let Some(job_type) = update.job_type {
            job.job_type = job_type;
        }
        if let Some(salary) = update.salary {
            job.salary = Some(salary);
        }
        if let Some(salary_range) = update.salary_range {
            job.salary_range = Some(salary_range);
        }
        if let Some(form_link) = update.form_link {
            job.form_link = Some(form_link);
        }
        job.updated_at = Utc::now();
        self.repository.update_job(job.clone())?;
        Ok(job)
    }

    /// Deleting a job also deletes its requirement.
    pub fn delete_job(&self, id: &JobId) -> Result<(), RecruitingServiceError> {
        self.get_job(id)?;
        self.remove_job_records(id)
    }

    fn remove_job_records(&self, id: &JobId) -> Result<(), RecruitingServiceError> {
        if let Some(requirement) = self.repository.requirement_by_job(id)? {
            self.repository.delete_requirement(&requirement.id)?;
        }
        Ok(self.repository.delete_job(id)?)
    }

    /// One requirement per job: a second submission overwrites the first.
    pub fn upsert_requirement(
        &self,
        new_requirement: NewRequirement,
    ) -> Result<Requirement, RecruitingServiceError> {
        self.get_job(&new_requirement.job_id)?;
        let now = Utc::now();
        match self.repository.requirement_by_job(&new_requirement.job_id)? {
            Some(existing) => {
                let requirement = Requirement {
                    id: existing.id,
                    job_id: existing.job_id,
                    experience_required: new_requirement.experience_required,
                    sslc_cgpa: new_requirement.sslc_cgpa,
                    plustwo_cgpa: new_requirement.plustwo_cgpa,
                    degree_cgpa: new_requirement.degree_cgpa,
                    mca_cgpa: new_requirement.mca_cgpa,
                    passout_year: new_requirement.passout_year,
                    skills_required: new_requirement.skills_required,
                    required_certifications: new_requirement.required_certifications,
                    language_requirements: new_requirement.language_requirements,
                    additional_criteria: new_requirement.additional_criteria,
                    created_at: existing.created_at,
                    updated_at: now,
                };
                self.repository.update_requirement(requirement.clone())?;
                Ok(requirement)
            }
            None => {
                let requirement = Requirement {
                    id: next_requirement_id(),
                    job_id: new_requirement.job_id,
                    experience_required: new_requirement.experience_required,
                    sslc_cgpa: new_requirement.sslc_cgpa,
                    plustwo_cgpa: new_requirement.plustwo_cgpa,
                    degree_cgpa: new_requirement.degree_cgpa,
                    mca_cgpa: new_requirement.mca_cgpa,
                    passout_year: new_requirement.passout_year,
                    skills_required: new_requirement.skills_required,
                    required_certifications: new_requirement.required_certifications,
                    language_requirements: new_requirement.language_requirements,
                    additional_criteria: new_requirement.additional_criteria,
                    created_at: now,
                    updated_at: now,
                };
                Ok(self.repository.insert_requirement(requirement)?)
            }
        }
    }

    pub fn get_requirement(
        &self,
        id: &RequirementId,
    ) -> Result<Requirement, RecruitingServiceError> {
        self.repository
            .fetch_requirement(id)?
            .ok_or(RecruitingServiceError::Repository(RepositoryError::NotFound))
    }

    pub fn requirement_for_job(
        &self,
        job_id: &JobId,
    ) -> Result<Requirement, RecruitingServiceError> {
        self.get_job(job_id)?;
        self.repository
            .requirement_by_job(job_id)?
            .ok_or(RecruitingServiceError::Repository(RepositoryError::NotFound))
    }

    pub fn update_requirement(
        &self,
        id: &RequirementId,
        update: RequirementUpdate,
    ) -> Result<Requirement, RecruitingServiceError> {
        let mut requirement = self.get_requirement(id)?;
        if let Some(experience_required) = update.experience_required {
            requirement.experience_required = experience_required;
        }
        if let Some(sslc_cgpa) = update.sslc_cgpa {
            requirement.sslc_cgpa = Some(sslc_cgpa);
        }
        if let Some(plustwo_cgpa) = update.plustwo_cgpa {
            requirement.plustwo_cgpa = Some(plustwo_cgpa);
        }
        if let Some(degree_cgpa) = update.degree_cgpa {
            requirement.degree_cgpa = Some(degree_cgpa);
        }
        if let Some(mca_cgpa) = update.mca_cgpa {
            requirement.mca_cgpa = Some(mca_cgpa);
        }
        if let Some(passout_year) = update.passout_year {
            requirement.passout_year = Some(passout_year);
        }
        if let Some(skills_required) = update.skills_required {
            requirement.skills_required = skills_required;
        }
        if let Some(required_certifications) = update.required_certifications {
            requirement.required_certifications = required_certifications;
        }
        if let Some(language_requirements) = update.language_requirements {
            requirement.language_requirements = language_requirements;
        }
        if let Some(additional_criteria) = update.additional_criteria {
            requirement.additional_criteria = Some(additional_criteria);
        }
        requirement.updated_at = Utc::now();
        self.repository.update_requirement(requirement.clone())?;
        Ok(requirement)
    }

    pub fn delete_requirement(&self, id: &RequirementId) -> Result<(), RecruitingServiceError> {
        Ok(self.repository.delete_requirement(id)?)
    }

    /// Evaluates the roster against the job's requirement without storing
    /// anything. No requirement means nobody qualifies.
    pub fn eligible_students(&self, job_id: &JobId) -> Result<Vec<UserId>, RecruitingServiceError> {
        self.get_job(job_id)?;
        let Some(requirement) = self.repository.requirement_by_job(job_id)? else {
            return Ok(Vec::new());
        };
        let students = self.directory.list_students()?;
        let performances: HashMap<UserId, StudentPerformance> = self
            .records
            .list_performances()?
            .into_iter()
            .map(|performance| (performance.student_id.clone(), performance))
            .collect();
        Ok(eligibility::eligible_students(
            &requirement,
            &students,
            &performances,
        ))
    }

    /// Stores an eligibility list on the job and refreshes the drive union.
    pub fn set_eligible_students(
        &self,
        job_id: &JobId,
        students: Vec<UserId>,
    ) -> Result<Job, RecruitingServiceError> {
        let mut job = self.get_job(job_id)?;
        job.eligible_students = students;
        job.updated_at = Utc::now();
        self.repository.update_job(job.clone())?;
        self.refresh_drive_eligibility(&job.drive_id)?;
        Ok(job)
    }

    /// Recomputes and stores in one step.
    pub fn refresh_eligible_students(
        &self,
        job_id: &JobId,
    ) -> Result<Job, RecruitingServiceError> {
        let students = self.eligible_students(job_id)?;
        self.set_eligible_students(job_id, students)
    }

    fn refresh_drive_eligibility(&self, drive_id: &DriveId) -> Result<(), RecruitingServiceError> {
        let jobs = self.repository.jobs_by_drive(drive_id)?;
        if jobs.is_empty() {
            return Ok(());
        }
        let mut drive = self.get_drive(drive_id)?;
        drive.eligible_students = dedup_union(jobs.iter().map(|job| &job.eligible_students));
        drive.updated_at = Utc::now();
        self.repository.update_drive(drive)?;
        Ok(())
    }

    /// Stores per-stage shortlists on the job and rebuilds the drive's
    /// stage lists from every job under it.
    pub fn update_stage_students(
        &self,
        job_id: &JobId,
        stage_students: Vec<Vec<UserId>>,
    ) -> Result<Job, RecruitingServiceError> {
        let mut job = self.get_job(job_id)?;
        job.stage_students = stage_students;
        job.updated_at = Utc::now();
        self.repository.update_job(job.clone())?;

        let jobs = self.repository.jobs_by_drive(&job.drive_id)?;
        if !jobs.is_empty() {
            let mut drive = self.get_drive(&job.drive_id)?;
            drive.stage_students = stage_union(&jobs);
            drive.updated_at = Utc::now();
            self.repository.update_drive(drive)?;
        }
        Ok(job)
    }

    /// Final selections: stored on the job, appended to the company's
    /// placement record, and folded into the drive's flat union.
    pub fn confirm_selected_students(
        &self,
        job_id: &JobId,
        students: Vec<UserId>,
    ) -> Result<Job, RecruitingServiceError> {
        let mut job = self.get_job(job_id)?;
        job.selected_students = students.clone();
        job.updated_at = Utc::now();
        self.repository.update_job(job.clone())?;

        if let Some(mut company) = self.repository.fetch_company(&job.company_id)? {
            let mut changed = false;
            for student in &students {
                if !company.placed_students.contains(student) {
                    company.placed_students.push(student.clone());
                    changed = true;
                }
            }
            if changed {
                company.updated_at = Utc::now();
                self.repository.update_company(company)?;
            }
        }

        let jobs = self.repository.jobs_by_drive(&job.drive_id)?;
        if !jobs.is_empty() {
            let mut drive = self.get_drive(&job.drive_id)?;
            drive.selected_students = dedup_union(jobs.iter().map(|job| &job.selected_students));
            drive.updated_at = Utc::now();
            self.repository.update_drive(drive)?;
        }
        Ok(job)
    }

    /// Set-adds the student on both the job and its drive.
    pub fn apply_to_job(
        &self,
        job_id: &JobId,
        student: &UserId,
    ) -> Result<Job, RecruitingServiceError> {
        let mut job = self.get_job(job_id)?;
        if !job.applied_students.contains(student) {
            job.applied_students.push(student.clone());
            job.updated_at = Utc::now();
            self.repository.update_job(job.clone())?;
        }
        let mut drive = self.get_drive(&job.drive_id)?;
        if !drive.applied_students.contains(student) {
            drive.applied_students.push(student.clone());
            drive.updated_at = Utc::now();
            self.repository.update_drive(drive)?;
        }
        Ok(job)
    }
}

/// Order-preserving union without duplicates.
pub(super) fn dedup_union<'a, I>(lists: I) -> Vec<UserId>
where
    I: Iterator<Item = &'a Vec<UserId>>,
{
    let mut union = Vec::new();
    for list in lists {
        for student in list {
            if !union.contains(student) {
                union.push(student.clone());
            }
        }
    }
    union
}

/// Per-index union sized to the longest stage list among the jobs.
pub(super) fn stage_union(jobs: &[Job]) -> Vec<Vec<UserId>> {
    let max_stages = jobs
        .iter()
        .map(|job| job.stage_students.len())
        .max()
        .unwrap_or(0);
    let mut aggregated = vec![Vec::new(); max_stages];
    for job in jobs {
        for (index, stage) in job.stage_students.iter().enumerate() {
            for student in stage {
                if !aggregated[index].contains(student) {
                    aggregated[index].push(student.clone());
                }
            }
        }
    }
    aggregated
}
