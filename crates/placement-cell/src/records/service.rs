use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use mime::Mime;

use crate::directory::UserId;
use crate::storage::RepositoryError;

use super::domain::{
    NewPerformance, NewResume, PerformanceId, PerformanceUpdate, Resume, ResumeId, ResumeUpdate,
    StudentPerformance,
};
use super::render::render_resume;
use super::repository::RecordsRepository;

static RESUME_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static PERFORMANCE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_resume_id() -> ResumeId {
    let id = RESUME_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ResumeId(format!("res-{id:06}"))
}

fn next_performance_id() -> PerformanceId {
    let id = PERFORMANCE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    PerformanceId(format!("prf-{id:06}"))
}

#[derive(Debug, thiserror::Error)]
pub enum RecordsServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Rendered resume ready to serve as a file download.
#[derive(Debug, Clone)]
pub struct ResumeDownload {
    pub filename: String,
    pub content_type: Mime,
    pub body: String,
}

/// Resumes and academic performance records. One performance record per
/// student; resumes are unbounded per student.
pub struct RecordsService<R> {
    repository: Arc<R>,
}

impl<R> RecordsService<R>
where
    R: RecordsRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> Arc<R> {
        Arc::clone(&self.repository)
    }

    pub fn add_resume(&self, new_resume: NewResume) -> Result<Resume, RecordsServiceError> {
        let now = Utc::now();
        let resume = Resume {
            id: next_resume_id(),
            student_id: new_resume.student_id,
            title: new_resume.title,
            first_name: new_resume.first_name,
            middle_name: new_resume.middle_name,
            last_name: new_resume.last_name,
            objective: new_resume.objective,
            email: new_resume.email,
            alt_email: new_resume.alt_email,
            phone: new_resume.phone,
            alt_phone: new_resume.alt_phone,
            address: new_resume.address,
            city: new_resume.city,
            state: new_resume.state,
            linkedin: new_resume.linkedin,
            github: new_resume.github,
            achievements: new_resume.achievements,
            skills: new_resume.skills,
            education: new_resume.education,
            projects: new_resume.projects,
            work_experience: new_resume.work_experience,
            certificates: new_resume.certificates,
            created_at: now,
            updated_at: now,
        };
        Ok(self.repository.insert_resume(resume)?)
    }

    pub fn get_resume(&self, id: &ResumeId) -> Result<Resume, RecordsServiceError> {
        self.repository
            .fetch_resume(id)?
            .ok_or(RecordsServiceError::Repository(RepositoryError::NotFound))
    }

    pub fn resumes_for_student(
        &self,
        student: &UserId,
    ) -> Result<Vec<Resume>, RecordsServiceError> {
        Ok(self.repository.resumes_by_student(student)?)
    }

    pub fn update_resume(
        &self,
        id: &ResumeId,
        update: ResumeUpdate,
    ) -> Result<Resume, RecordsServiceError> {
        let mut resume = self.get_resume(id)?;
        apply_resume_update(&mut resume, update);
        resume.updated_at = Utc::now();
        self.repository.update_resume(resume.clone())?;
        Ok(resume)
    }

    pub fn delete_resume(&self, id: &ResumeId) -> Result<(), RecordsServiceError> {
        Ok(self.repository.delete_resume(id)?)
    }

    /// Renders the resume into a printable document and names the file
    /// after the moment of download.
    pub fn download_resume(&self, id: &ResumeId) -> Result<ResumeDownload, RecordsServiceError> {
        let resume = self.get_resume(id)?;
        let body = render_resume(&resume);
        let filename = format!("resume_{}.html", Utc::now().format("%Y%m%d_%H%M%S"));
        Ok(ResumeDownload {
            filename,
            content_type: mime::TEXT_HTML_UTF_8,
            body,
        })
    }

    /// Creates the student's performance record, or overwrites the existing
    /// one in place. The record id and creation time survive an overwrite.
    pub fn upsert_performance(
        &self,
        new_performance: NewPerformance,
    ) -> Result<StudentPerformance, RecordsServiceError> {
        let now = Utc::now();
        match self
            .repository
            .performance_by_student(&new_performance.student_id)?
        {
            Some(existing) => {
                let performance = StudentPerformance {
                    id: existing.id,
                    student_id: new_performance.student_id,
                    semester: new_performance.semester,
                    tenth_cgpa: new_performance.tenth_cgpa,
                    twelth_cgpa: new_performance.twelth_cgpa,
                    degree_cgpa: new_performance.degree_cgpa,
                    mca_cgpa: new_performance.mca_cgpa,
                    skills: new_performance.skills,
                    current_status: new_performance.current_status,
                    certification_files: new_performance.certification_files,
                    linkedin_url: new_performance.linkedin_url,
                    created_at: existing.created_at,
                    updated_at: now,
                };
                self.repository.update_performance(performance.clone())?;
                Ok(performance)
            }
            None => {
                let performance = StudentPerformance {
                    id: next_performance_id(),
                    student_id: new_performance.student_id,
                    semester: new_performance.semester,
                    tenth_cgpa: new_performance.tenth_cgpa,
                    twelth_cgpa: new_performance.twelth_cgpa,
                    degree_cgpa: new_performance.degree_cgpa,
                    mca_cgpa: new_performance.mca_cgpa,
                    skills: new_performance.skills,
                    current_status: new_performance.current_status,
                    certification_files: new_performance.certification_files,
                    linkedin_url: new_performance.linkedin_url,
                    created_at: now,
                    updated_at: now,
                };
                Ok(self.repository.insert_performance(performance)?)
            }
        }
    }

    pub fn performance_for_student(
        &self,
        student: &UserId,
    ) -> Result<StudentPerformance, RecordsServiceError> {
        self.repository
            .performance_by_student(student)?
            .ok_or(RecordsServiceError::Repository(RepositoryError::NotFound))
    }

    pub fn list_performances(&self) -> Result<Vec<StudentPerformance>, RecordsServiceError> {
        Ok(self.repository.list_performances()?)
    }

    pub fn update_performance(
        &self,
        student: &UserId,
        update: PerformanceUpdate,
    ) -> Result<StudentPerformance, RecordsServiceError> {
        let mut performance = self.performance_for_student(student)?;
        apply_performance_update(&mut performance, update);
        performance.updated_at = Utc::now();
        self.repository.update_performance(performance.clone())?;
        Ok(performance)
    }

    pub fn delete_performance(&self, student: &UserId) -> Result<(), RecordsServiceError> {
        let performance = self.performance_for_student(student)?;
        Ok(self.repository.delete_performance(&performance.id)?)
    }
}

fn apply_resume_update(resume: &mut Resume, update: ResumeUpdate) {
    if let Some(title) = update.title {
        resume.title = title;
    }
    if let Some(first_name) = update.first_name {
        resume.first_name = first_name;
    }
    if let Some(middle_name) = update.middle_name {
        resume.middle_name = Some(middle_name);
    }
    if let Some(last_name) = update.last_name {
        resume.last_name = last_name;
    }
    if let Some(objective) = update.objective {
        resume.objective = Some(objective);
    }
    if let Some(email) = update.email {
        resume.email = email;
    }
    if let Some(alt_email) = update.alt_email {
        resume.alt_email = Some(alt_email);
    }
    if let Some(phone) = update.phone {
        resume.phone = Some(phone);
    }
    if let Some(alt_phone) = update.alt_phone {
        resume.alt_phone = Some(alt_phone);
    }
    if let Some(address) = update.address {
        resume.address = Some(address);
    }
    if let Some(city) = update.city {
        resume.city = Some(city);
    }
    if let Some(state) = update.state {
        resume.state = Some(state);
    }
    if let Some(linkedin) = update.linkedin {
        resume.linkedin = Some(linkedin);
    }
    if let Some(github) = update.github {
        resume.github = Some(github);
    }
    if let Some(achievements) = update.achievements {
        resume.achievements = achievements;
    }
    if let Some(skills) = update.skills {
        resume.skills = skills;
    }
    if let Some(education) = update.education {
        resume.education = education;
    }
    if let Some(projects) = update.projects {
        resume.projects = projects;
    }
    if let Some(work_experience) = update.work_experience {
        resume.work_experience = work_experience;
    }
    if let Some(certificates) = update.certificates {
        resume.certificates = certificates;
    }
}

fn apply_performance_update(performance: &mut StudentPerformance, update: PerformanceUpdate) {
    if let Some(semester) = update.semester {
        performance.semester = semester;
    }
    if let Some(tenth_cgpa) = update.tenth_cgpa {
        performance.tenth_cgpa = Some(tenth_cgpa);
    }
    if let Some(twelth_cgpa) = update.twelth_cgpa {
        performance.twelth_cgpa = Some(twelth_cgpa);
    }
    if let Some(degree_cgpa) = update.degree_cgpa {
        performance.degree_cgpa = Some(degree_cgpa);
    }
    if let Some(mca_cgpa) = update.mca_cgpa {
        performance.mca_cgpa = mca_cgpa;
    }
    if let Some(skills) = update.skills {
        performance.skills = skills;
    }
    if let Some(current_status) = update.current_status {
        performance.current_status = current_status;
    }
    if let Some(certification_files) = update.certification_files {
        performance.certification_files = certification_files;
    }
    if let Some(linkedin_url) = update.linkedin_url {
        performance.linkedin_url = Some(linkedin_url);
    }
}
