use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use crate::directory::UserId;
use crate::recruiting::{DriveId, JobId};
use crate::storage::RepositoryError;

use super::domain::{
    ApplicationForm, ApplicationFormId, DriveForm, DriveFormId, JobApplication, JobApplicationId,
};

/// Storage abstraction for applications, filled forms, and per-drive form
/// templates.
pub trait ApplicationsRepository: Send + Sync {
    fn insert_application(
        &self,
        application: JobApplication,
    ) -> Result<JobApplication, RepositoryError>;
    fn update_application(&self, application: JobApplication) -> Result<(), RepositoryError>;
    fn fetch_application(
        &self,
        id: &JobApplicationId,
    ) -> Result<Option<JobApplication>, RepositoryError>;
    fn application_for_student(
        &self,
        job_id: &JobId,
        student_id: &UserId,
    ) -> Result<Option<JobApplication>, RepositoryError>;
    fn applications_by_student(
        &self,
        student_id: &UserId,
    ) -> Result<Vec<JobApplication>, RepositoryError>;
    fn applications_by_job(&self, job_id: &JobId) -> Result<Vec<JobApplication>, RepositoryError>;
    fn list_applications(&self) -> Result<Vec<JobApplication>, RepositoryError>;
    fn delete_application(&self, id: &JobApplicationId) -> Result<(), RepositoryError>;

    fn insert_form(&self, form: ApplicationForm) -> Result<ApplicationForm, RepositoryError>;
    fn update_form(&self, form: ApplicationForm) -> Result<(), RepositoryError>;
    fn fetch_form(&self, id: &ApplicationFormId)
        -> Result<Option<ApplicationForm>, RepositoryError>;
    fn form_for_application(
        &self,
        application_id: &JobApplicationId,
    ) -> Result<Option<ApplicationForm>, RepositoryError>;
    fn delete_form(&self, id: &ApplicationFormId) -> Result<(), RepositoryError>;

    fn insert_drive_form(&self, form: DriveForm) -> Result<DriveForm, RepositoryError>;
    fn update_drive_form(&self, form: DriveForm) -> Result<(), RepositoryError>;
    fn fetch_drive_form(&self, id: &DriveFormId) -> Result<Option<DriveForm>, RepositoryError>;
    fn drive_form_for_drive(
        &self,
        drive_id: &DriveId,
    ) -> Result<Option<DriveForm>, RepositoryError>;
    fn delete_drive_form(&self, id: &DriveFormId) -> Result<(), RepositoryError>;
}

/// Default in-memory store; ordered maps keep listings in creation order.
#[derive(Default, Clone)]
pub struct InMemoryApplicationsRepository {
    applications: Arc<Mutex<BTreeMap<JobApplicationId, JobApplication>>>,
    forms: Arc<Mutex<BTreeMap<ApplicationFormId, ApplicationForm>>>,
    drive_forms: Arc<Mutex<BTreeMap<DriveFormId, DriveForm>>>,
}

impl ApplicationsRepository for InMemoryApplicationsRepository {
    fn insert_application(
        &self,
        application: JobApplication,
    ) -> Result<JobApplication, RepositoryError> {
        let mut guard = self.applications.lock().expect("repository mutex poisoned");
        if guard.contains_key(&application.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(application.id.clone(), application.clone());
        Ok(application)
    }

    fn update_application(&self, application: JobApplication) -> Result<(), RepositoryError> {
        let mut guard = self.applications.lock().expect("repository mutex poisoned");
        if guard.contains_key(&application.id) {
            guard.insert(application.id.clone(), application);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch_application(
        &self,
        id: &JobApplicationId,
    ) -> Result<Option<JobApplication>, RepositoryError> {
        let guard = self.applications.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn application_for_student(
        &self,
        job_id: &JobId,
        student_id: &UserId,
    ) -> Result<Option<JobApplication>, RepositoryError> {
        let guard = self.applications.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .find(|application| {
                &application.job_id == job_id && &application.student_id == student_id
            })
            .cloned())
    }

    fn applications_by_student(
        &self,
        student_id: &UserId,
    ) -> Result<Vec<JobApplication>, RepositoryError> {
        let guard = self.applications.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|application| &application.student_id == student_id)
            .cloned()
            .collect())
    }

    fn applications_by_job(&self, job_id: &JobId) -> Result<Vec<JobApplication>, RepositoryError> {
        let guard = self.applications.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|application| &application.job_id == job_id)
            .cloned()
            .collect())
    }

    fn list_applications(&self) -> Result<Vec<JobApplication>, RepositoryError> {
        let guard = self.applications.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn delete_application(&self, id: &JobApplicationId) -> Result<(), RepositoryError> {
        let mut guard = self.applications.lock().expect("repository mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }

    fn insert_form(&self, form: ApplicationForm) -> Result<ApplicationForm, RepositoryError> {
        let mut guard = self.forms.lock().expect("repository mutex poisoned");
        if guard.contains_key(&form.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(form.id.clone(), form.clone());
        Ok(form)
    }

    fn update_form(&self, form: ApplicationForm) -> Result<(), RepositoryError> {
        let mut guard = self.forms.lock().expect("repository mutex poisoned");
        if guard.contains_key(&form.id) {
            guard.insert(form.id.clone(), form);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch_form(
        &self,
        id: &ApplicationFormId,
    ) -> Result<Option<ApplicationForm>, RepositoryError> {
        let guard = self.forms.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn form_for_application(
        &self,
        application_id: &JobApplicationId,
    ) -> Result<Option<ApplicationForm>, RepositoryError> {
        let guard = self.forms.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .find(|form| &form.application_id == application_id)
            .cloned())
    }

    fn delete_form(&self, id: &ApplicationFormId) -> Result<(), RepositoryError> {
        let mut guard = self.forms.lock().expect("repository mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }

    fn insert_drive_form(&self, form: DriveForm) -> Result<DriveForm, RepositoryError> {
        let mut guard = self.drive_forms.lock().expect("repository mutex poisoned");
        if guard.contains_key(&form.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(form.id.clone(), form.clone());
        Ok(form)
    }

    fn update_drive_form(&self, form: DriveForm) -> Result<(), RepositoryError> {
        let mut guard = self.drive_forms.lock().expect("repository mutex poisoned");
        if guard.contains_key(&form.id) {
            guard.insert(form.id.clone(), form);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch_drive_form(&self, id: &DriveFormId) -> Result<Option<DriveForm>, RepositoryError> {
        let guard = self.drive_forms.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn drive_form_for_drive(
        &self,
        drive_id: &DriveId,
    ) -> Result<Option<DriveForm>, RepositoryError> {
        let guard = self.drive_forms.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .find(|form| &form.drive_id == drive_id)
            .cloned())
    }

    fn delete_drive_form(&self, id: &DriveFormId) -> Result<(), RepositoryError> {
        let mut guard = self.drive_forms.lock().expect("repository mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }
}
