//! Student records: resumes with a printable rendition, and the academic
//! performance history the eligibility rules read.

pub mod domain;
pub mod render;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{
    Certificate, CurrentStatus, Education, FileReference, NewPerformance, NewResume,
    PerformanceId, PerformanceUpdate, Project, Resume, ResumeId, ResumeUpdate,
    StudentPerformance, WorkExperience,
};
pub use render::render_resume;
pub use repository::{InMemoryRecordsRepository, RecordsRepository};
pub use router::records_router;
pub use service::{RecordsService, RecordsServiceError, ResumeDownload};
