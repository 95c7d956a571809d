use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;

use crate::directory::{DirectoryRepository, UserId};
use crate::records::RecordsRepository;
use crate::recruiting::{
    DriveId, JobId, RecruitingRepository, RecruitingService, RecruitingServiceError,
};
use crate::storage::RepositoryError;

use super::domain::{
    ApplicationForm, ApplicationFormId, ApplicationFormUpdate, ApplicationStatus, DriveForm,
    DriveFormId, DriveFormUpdate, JobApplication, JobApplicationId, NewApplicationForm,
    NewDriveForm, NewJobApplication,
};
use super::prefill::{self, PrefillError, PrefillOutcome, StudentSnapshot};
use super::repository::ApplicationsRepository;

static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static FORM_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static DRIVE_FORM_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_application_id() -> JobApplicationId {
    let id = APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    JobApplicationId(format!("app-{id:06}"))
}

fn next_form_id() -> ApplicationFormId {
    let id = FORM_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicationFormId(format!("frm-{id:06}"))
}

fn next_drive_form_id() -> DriveFormId {
    let id = DRIVE_FORM_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    DriveFormId(format!("dfm-{id:06}"))
}

/// Bridge into the recruiting pipeline. Submitting an application must land
/// the student on the job's applicant roster without this module owning job
/// storage.
pub trait JobBoard: Send + Sync {
    /// Puts the student on the job's (and its drive's) applicant list and
    /// reports which drive the job belongs to.
    fn record_application(
        &self,
        job_id: &JobId,
        student_id: &UserId,
    ) -> Result<DriveId, RepositoryError>;
}

impl<R> JobBoard for RecruitingService<R>
where
    R: RecruitingRepository + 'static,
{
    fn record_application(
        &self,
        job_id: &JobId,
        student_id: &UserId,
    ) -> Result<DriveId, RepositoryError> {
        match self.apply_to_job(job_id, student_id) {
            Ok(job) => Ok(job.drive_id),
            Err(RecruitingServiceError::Repository(err)) => Err(err),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApplicationsServiceError {
    #[error("student has already applied to this job")]
    AlreadyApplied,
    #[error("an uploaded file or a saved resume reference is required")]
    ResumeMissing,
    #[error(transparent)]
    Prefill(#[from] PrefillError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Job applications, their filled forms, and per-drive form templates.
pub struct ApplicationsService<R> {
    repository: Arc<R>,
    job_board: Arc<dyn JobBoard>,
    directory: Arc<dyn DirectoryRepository>,
    records: Arc<dyn RecordsRepository>,
}

impl<R> ApplicationsService<R>
where
    R: ApplicationsRepository + 'static,
{
    pub fn new(
        repository: Arc<R>,
        job_board: Arc<dyn JobBoard>,
        directory: Arc<dyn DirectoryRepository>,
        records: Arc<dyn RecordsRepository>,
    ) -> Self {
        Self {
            repository,
            job_board,
            directory,
            records,
        }
    }

    pub fn repository(&self) -> Arc<R> {
        Arc::clone(&self.repository)
    }

    /// Takes one application in. Duplicates and resume-less submissions are
    /// rejected before the recruiting roster is touched.
    pub fn submit_application(
        &self,
        new_application: NewJobApplication,
    ) -> Result<JobApplication, ApplicationsServiceError> {
        if self
            .repository
            .application_for_student(&new_application.job_id, &new_application.student_id)?
            .is_some()
        {
            return Err(ApplicationsServiceError::AlreadyApplied);
        }
        if new_application.uploaded_resume.is_none() && new_application.saved_resume_id.is_none() {
            return Err(ApplicationsServiceError::ResumeMissing);
        }
        let drive_id = self
            .job_board
            .record_application(&new_application.job_id, &new_application.student_id)?;
        let now = Utc::now();
        let application = JobApplication {
            id: next_application_id(),
            job_id: new_application.job_id,
            drive_id,
            student_id: new_application.student_id,
            status: ApplicationStatus::Applied,
            uploaded_resume: new_application.uploaded_resume,
            saved_resume_id: new_application.saved_resume_id,
            additional_answers: new_application.additional_answers,
            applied_date: now,
            shortlisted_date: None,
            rejected_date: None,
            placed_date: None,
            created_at: now,
            updated_at: now,
        };
        Ok(self.repository.insert_application(application)?)
    }

    pub fn get_application(
        &self,
        id: &JobApplicationId,
    ) -> Result<JobApplication, ApplicationsServiceError> {
        self.repository
            .fetch_application(id)?
            .ok_or(ApplicationsServiceError::Repository(
                RepositoryError::NotFound,
            ))
    }

    pub fn list_applications(&self) -> Result<Vec<JobApplication>, ApplicationsServiceError> {
        Ok(self.repository.list_applications()?)
    }

    pub fn applications_for_student(
        &self,
        student_id: &UserId,
    ) -> Result<Vec<JobApplication>, ApplicationsServiceError> {
        Ok(self.repository.applications_by_student(student_id)?)
    }

    pub fn applications_for_job(
        &self,
        job_id: &JobId,
    ) -> Result<Vec<JobApplication>, ApplicationsServiceError> {
        Ok(self.repository.applications_by_job(job_id)?)
    }

    /// Moves an application along the pipeline. The first transition into
    /// each terminal-ish state stamps its date column; revisiting a state
    /// later never rewrites the stamp.
    pub fn set_application_status(
        &self,
        id: &JobApplicationId,
        status: ApplicationStatus,
    ) -> Result<JobApplication, ApplicationsServiceError> {
        let mut application = self.get_application(id)?;
        let now = Utc::now();
        match status {
            ApplicationStatus::Shortlisted if application.shortlisted_date.is_none() => {
                application.shortlisted_date = Some(now);
            }
            ApplicationStatus::Rejected if application.rejected_date.is_none() => {
                application.rejected_date = Some(now);
            }
            ApplicationStatus::Placed if application.placed_date.is_none() => {
                application.placed_date = Some(now);
            }
            _ => {}
        }
        application.status = status;
        application.updated_at = now;
        self.repository.update_application(application.clone())?;
        Ok(application)
    }

    pub fn delete_application(
        &self,
        id: &JobApplicationId,
    ) -> Result<(), ApplicationsServiceError> {
        Ok(self.repository.delete_application(id)?)
    }

    pub fn add_form(
        &self,
        new_form: NewApplicationForm,
    ) -> Result<ApplicationForm, ApplicationsServiceError> {
        self.get_application(&new_form.application_id)?;
        let now = Utc::now();
        let form = ApplicationForm {
            id: next_form_id(),
            application_id: new_form.application_id,
            answers: new_form.answers,
            additional_answers: new_form.additional_answers,
            created_at: now,
            updated_at: now,
        };
        Ok(self.repository.insert_form(form)?)
    }

    pub fn get_form(
        &self,
        id: &ApplicationFormId,
    ) -> Result<ApplicationForm, ApplicationsServiceError> {
        self.repository
            .fetch_form(id)?
            .ok_or(ApplicationsServiceError::Repository(
                RepositoryError::NotFound,
            ))
    }

    pub fn form_for_application(
        &self,
        application_id: &JobApplicationId,
    ) -> Result<ApplicationForm, ApplicationsServiceError> {
        self.repository
            .form_for_application(application_id)?
            .ok_or(ApplicationsServiceError::Repository(
                RepositoryError::NotFound,
            ))
    }

    pub fn update_form(
        &self,
        id: &ApplicationFormId,
        update: ApplicationFormUpdate,
    ) -> Result<ApplicationForm, ApplicationsServiceError> {
        let mut form = self.get_form(id)?;
        apply_form_update(&mut form, update);
        form.updated_at = Utc::now();
        self.repository.update_form(form.clone())?;
        Ok(form)
    }

    pub fn delete_form(&self, id: &ApplicationFormId) -> Result<(), ApplicationsServiceError> {
        Ok(self.repository.delete_form(id)?)
    }

    /// Creates or replaces the drive's form template. A replaced template
    /// keeps its id and creation time.
    pub fn upsert_drive_form(
        &self,
        new_form: NewDriveForm,
    ) -> Result<DriveForm, ApplicationsServiceError> {
        let now = Utc::now();
        match self.repository.drive_form_for_drive(&new_form.drive_id)? {
            Some(existing) => {
                let form = DriveForm {
                    id: existing.id,
                    drive_id: new_form.drive_id,
                    fields: new_form.fields,
                    additional_field_labels: new_form.additional_field_labels,
                    created_at: existing.created_at,
                    updated_at: now,
                };
                self.repository.update_drive_form(form.clone())?;
                Ok(form)
            }
            None => {
                let form = DriveForm {
                    id: next_drive_form_id(),
                    drive_id: new_form.drive_id,
                    fields: new_form.fields,
                    additional_field_labels: new_form.additional_field_labels,
                    created_at: now,
                    updated_at: now,
                };
                Ok(self.repository.insert_drive_form(form)?)
            }
        }
    }

    pub fn drive_form_for_drive(
        &self,
        drive_id: &DriveId,
    ) -> Result<DriveForm, ApplicationsServiceError> {
        self.repository
            .drive_form_for_drive(drive_id)?
            .ok_or(ApplicationsServiceError::Repository(
                RepositoryError::NotFound,
            ))
    }

    pub fn update_drive_form(
        &self,
        drive_id: &DriveId,
        update: DriveFormUpdate,
    ) -> Result<DriveForm, ApplicationsServiceError> {
        let mut form = self.drive_form_for_drive(drive_id)?;
        if let Some(fields) = update.fields {
            form.fields = fields;
        }
        if let Some(labels) = update.additional_field_labels {
            form.additional_field_labels = labels;
        }
        form.updated_at = Utc::now();
        self.repository.update_drive_form(form.clone())?;
        Ok(form)
    }

    pub fn delete_drive_form(&self, drive_id: &DriveId) -> Result<(), ApplicationsServiceError> {
        let form = self.drive_form_for_drive(drive_id)?;
        Ok(self.repository.delete_drive_form(&form.id)?)
    }

    /// Builds a prefilled `viewform` link for one student from the saved
    /// HTML of a hosted form.
    pub fn prefill_for_student(
        &self,
        student_id: &UserId,
        form_url: &str,
        form_html: &str,
    ) -> Result<PrefillOutcome, ApplicationsServiceError> {
        let snapshot = self.snapshot_for(student_id)?;
        Ok(prefill::prefill_form(form_url, form_html, &snapshot)?)
    }

    /// Gathers the account, student profile, and performance record into
    /// one matchable snapshot. Only the account is mandatory.
    fn snapshot_for(
        &self,
        student_id: &UserId,
    ) -> Result<StudentSnapshot, ApplicationsServiceError> {
        let account = self
            .directory
            .fetch_user(student_id)?
            .ok_or(ApplicationsServiceError::Repository(
                RepositoryError::NotFound,
            ))?;
        let profile = self.directory.fetch_student(student_id)?;
        let performance = self.records.performance_by_student(student_id)?;
        Ok(StudentSnapshot {
            first_name: account.first_name,
            last_name: account.last_name,
            email: Some(account.email),
            phone: account.phone,
            register_number: profile
                .as_ref()
                .map(|profile| profile.register_number.clone()),
            program: profile
                .as_ref()
                .map(|profile| profile.program.label().to_string()),
            semester: performance.as_ref().map(|performance| performance.semester),
            skills: performance
                .as_ref()
                .map(|performance| performance.skills.clone())
                .unwrap_or_default(),
            tenth_cgpa: performance
                .as_ref()
                .and_then(|performance| performance.tenth_cgpa),
            twelth_cgpa: performance
                .as_ref()
                .and_then(|performance| performance.twelth_cgpa),
            degree_cgpa: performance
                .as_ref()
                .and_then(|performance| performance.degree_cgpa),
            linkedin_url: performance
                .as_ref()
                .and_then(|performance| performance.linkedin_url.clone()),
        })
    }
}

fn apply_form_update(form: &mut ApplicationForm, update: ApplicationFormUpdate) {
    if let Some(answers) = update.answers {
        form.answers = answers;
    }
    if let Some(additional_answers) = update.additional_answers {
        form.additional_answers = additional_answers;
    }
}
