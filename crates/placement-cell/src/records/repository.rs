use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use crate::directory::UserId;
use crate::storage::RepositoryError;

use super::domain::{PerformanceId, Resume, ResumeId, StudentPerformance};

/// Storage abstraction for resumes and performance records.
pub trait RecordsRepository: Send + Sync {
    fn insert_resume(&self, resume: Resume) -> Result<Resume, RepositoryError>;
    fn update_resume(&self, resume: Resume) -> Result<(), RepositoryError>;
    fn fetch_resume(&self, id: &ResumeId) -> Result<Option<Resume>, RepositoryError>;
    fn resumes_by_student(&self, student_id: &UserId) -> Result<Vec<Resume>, RepositoryError>;
    fn delete_resume(&self, id: &ResumeId) -> Result<(), RepositoryError>;

    fn insert_performance(
        &self,
        performance: StudentPerformance,
    ) -> Result<StudentPerformance, RepositoryError>;
    fn update_performance(&self, performance: StudentPerformance) -> Result<(), RepositoryError>;
    fn fetch_performance(
        &self,
        id: &PerformanceId,
    ) -> Result<Option<StudentPerformance>, RepositoryError>;
    fn performance_by_student(
        &self,
        student_id: &UserId,
    ) -> Result<Option<StudentPerformance>, RepositoryError>;
    fn list_performances(&self) -> Result<Vec<StudentPerformance>, RepositoryError>;
    fn delete_performance(&self, id: &PerformanceId) -> Result<(), RepositoryError>;
}

/// Default in-memory store; ordered maps keep listings in creation order.
#[derive(Default, Clone)]
pub struct InMemoryRecordsRepository {
    resumes: Arc<Mutex<BTreeMap<ResumeId, Resume>>>,
    performances: Arc<Mutex<BTreeMap<PerformanceId, StudentPerformance>>>,
}

impl RecordsRepository for InMemoryRecordsRepository {
    fn insert_resume(&self, resume: Resume) -> Result<Resume, RepositoryError> {
        let mut guard = self.resumes.lock().expect("repository mutex poisoned");
        if guard.contains_key(&resume.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(resume.id.clone(), resume.clone());
        Ok(resume)
    }

    fn update_resume(&self, resume: Resume) -> Result<(), RepositoryError> {
        let mut guard = self.resumes.lock().expect("repository mutex poisoned");
        if guard.contains_key(&resume.id) {
            guard.insert(resume.id.clone(), resume);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch_resume(&self, id: &ResumeId) -> Result<Option<Resume>, RepositoryError> {
        let guard = self.resumes.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn resumes_by_student(&self, student_id: &UserId) -> Result<Vec<Resume>, RepositoryError> {
        let guard = self.resumes.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|resume| &resume.student_id == student_id)
            .cloned()
            .collect())
    }

    fn delete_resume(&self, id: &ResumeId) -> Result<(), RepositoryError> {
        let mut guard = self.resumes.lock().expect("repository mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }

    fn insert_performance(
        &self,
        performance: StudentPerformance,
    ) -> Result<StudentPerformance, RepositoryError> {
        let mut guard = self.performances.lock().expect("repository mutex poisoned");
        if guard.contains_key(&performance.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(performance.id.clone(), performance.clone());
        Ok(performance)
    }

    fn update_performance(&self, performance: StudentPerformance) -> Result<(), RepositoryError> {
        let mut guard = self.performances.lock().expect("repository mutex poisoned");
        if guard.contains_key(&performance.id) {
            guard.insert(performance.id.clone(), performance);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch_performance(
        &self,
        id: &PerformanceId,
    ) -> Result<Option<StudentPerformance>, RepositoryError> {
        let guard = self.performances.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn performance_by_student(
        &self,
        student_id: &UserId,
    ) -> Result<Option<StudentPerformance>, RepositoryError> {
        let guard = self.performances.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .find(|performance| &performance.student_id == student_id)
            .cloned())
    }

    fn list_performances(&self) -> Result<Vec<StudentPerformance>, RepositoryError> {
        let guard = self.performances.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn delete_performance(&self, id: &PerformanceId) -> Result<(), RepositoryError> {
        let mut guard = self.performances.lock().expect("repository mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }
}
