use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;

use crate::directory::{DirectoryRepository, UserId};
use crate::recruiting::{CompanyId, Job, RecruitingRepository};
use crate::storage::RepositoryError;

use super::domain::{CompanyAnalysis, PlacementDetail, StudentAnalysis};

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AnalysisServiceError {
    #[error("placement export could not be written: {0}")]
    Export(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Read-only aggregations over the recruiting and directory stores. Nothing
/// here mutates; every figure is recomputed from the job rosters on demand.
pub struct AnalysisService {
    recruiting: Arc<dyn RecruitingRepository>,
    directory: Arc<dyn DirectoryRepository>,
}

impl AnalysisService {
    pub fn new(
        recruiting: Arc<dyn RecruitingRepository>,
        directory: Arc<dyn DirectoryRepository>,
    ) -> Self {
        Self { recruiting, directory }
    }

    pub fn student_analysis(
        &self,
        student_id: &UserId,
    ) -> Result<StudentAnalysis, AnalysisServiceError> {
        self.directory
            .fetch_student(student_id)?
            .ok_or(AnalysisServiceError::Repository(RepositoryError::NotFound))?;

        let mut jobs_applied = 0usize;
        let mut jobs_eligible = 0usize;
        let mut jobs_selected = 0usize;
        let mut drives = BTreeSet::new();
        let mut placements = Vec::new();

        for job in self.recruiting.list_jobs()? {
            if job.applied_students.contains(student_id) {
                jobs_applied += 1;
                drives.insert(job.drive_id.clone());
            }
            if job.eligible_students.contains(student_id) {
                jobs_eligible += 1;
            }
            if job.selected_students.contains(student_id) {
                jobs_selected += 1;
                placements.push(self.placement_detail(&job)?);
            }
        }

        Ok(StudentAnalysis {
            student_id: student_id.clone(),
            drives_applied: drives.len(),
            jobs_applied,
            jobs_eligible,
            jobs_selected,
            eligibility_rate: ratio(jobs_eligible, jobs_applied),
            selection_rate: ratio(jobs_selected, jobs_eligible),
            placement_rate: ratio(jobs_selected, jobs_applied),
            placements,
        })
    }

    pub fn company_analysis(
        &self,
        company_id: &CompanyId,
    ) -> Result<CompanyAnalysis, AnalysisServiceError> {
        let company = self
            .recruiting
            .fetch_company(company_id)?
            .ok_or(AnalysisServiceError::Repository(RepositoryError::NotFound))?;

        let mut drives = BTreeSet::new();
        let mut jobs_posted = 0usize;
        let mut applicants = BTreeSet::new();
        let mut selected = BTreeSet::new();
        let mut salaries = Vec::new();

        for job in self.recruiting.list_jobs()? {
            if job.company_id != *company_id {
                continue;
            }
            jobs_posted += 1;
            drives.insert(job.drive_id.clone());
            applicants.extend(job.applied_students.iter().cloned());
            selected.extend(job.selected_students.iter().cloned());
            if let Some(salary) = job.salary {
                salaries.push(salary);
            }
        }

        let avg_salary = if salaries.is_empty() {
            None
        } else {
            Some(salaries.iter().sum::<f64>() / salaries.len() as f64)
        };

        Ok(CompanyAnalysis {
            company_id: company.id,
            company_name: company.name,
            drives_participated: drives.len(),
            jobs_posted,
            total_applicants: applicants.len(),
            total_selected: selected.len(),
            avg_salary,
            placed_students: company.placed_students,
        })
    }

    /// CSV rendition of every confirmed placement, one row per selected
    /// student per job, in job order. The header row is written even when
    /// nothing has been placed yet.
    pub fn placements_export(&self) -> Result<String, AnalysisServiceError> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        writer
            .write_record([
                "student_id",
                "student_name",
                "program",
                "company",
                "job_title",
                "salary",
            ])
            .map_err(|err| AnalysisServiceError::Export(err.to_string()))?;

        for job in self.recruiting.list_jobs()? {
            if job.selected_students.is_empty() {
                continue;
            }
            let company_name = self
                .recruiting
                .fetch_company(&job.company_id)?
                .map(|company| company.name)
                .unwrap_or_default();
            for student_id in &job.selected_students {
                let (student_name, program) = self.student_identity(student_id)?;
                writer
                    .serialize(PlacementRow {
                        student_id: student_id.0.clone(),
                        student_name,
                        program,
                        company: company_name.clone(),
                        job_title: job.title.clone(),
                        salary: job.salary,
                    })
                    .map_err(|err| AnalysisServiceError::Export(err.to_string()))?;
            }
        }

        let bytes = writer
            .into_inner()
            .map_err(|err| AnalysisServiceError::Export(err.to_string()))?;
        String::from_utf8(bytes).map_err(|err| AnalysisServiceError::Export(err.to_string()))
    }

    fn placement_detail(&self, job: &Job) -> Result<PlacementDetail, AnalysisServiceError> {
        // A job can momentarily outlive its company during a cascade delete.
        let company_name = self
            .recruiting
            .fetch_company(&job.company_id)?
            .map(|company| company.name)
            .unwrap_or_default();
        Ok(PlacementDetail {
            job_id: job.id.clone(),
            job_title: job.title.clone(),
            company_id: job.company_id.clone(),
            company_name,
            salary: job.salary,
        })
    }

    fn student_identity(&self, id: &UserId) -> Result<(String, String), AnalysisServiceError> {
        if let Some(student) = self.directory.fetch_student(id)? {
            return Ok((
                format!("{} {}", student.first_name, student.last_name),
                student.program.label().to_string(),
            ));
        }
        // Accounts without a student profile still show up by name.
        if let Some(account) = self.directory.fetch_user(id)? {
            return Ok((
                format!("{} {}", account.first_name, account.last_name),
                String::new(),
            ));
        }
        Ok((String::new(), String::new()))
    }
}

#[derive(Debug, Serialize)]
struct PlacementRow {
    student_id: String,
    student_name: String,
    program: String,
    company: String,
    job_title: String,
    salary: Option<f64>,
}
