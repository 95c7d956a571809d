use serde::Serialize;

use crate::directory::UserId;
use crate::recruiting::{CompanyId, JobId};

/// Per-student placement funnel: how many jobs the student applied to,
/// cleared eligibility for, and was picked in, plus the derived ratios.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentAnalysis {
    pub student_id: UserId,
    pub drives_applied: usize,
    pub jobs_applied: usize,
    pub jobs_eligible: usize,
    pub jobs_selected: usize,
    pub eligibility_rate: f64,
    pub selection_rate: f64,
    pub placement_rate: f64,
    pub placements: Vec<PlacementDetail>,
}

/// One confirmed selection with enough context for an offer listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacementDetail {
    pub job_id: JobId,
    pub job_title: String,
    pub company_id: CompanyId,
    pub company_name: String,
    pub salary: Option<f64>,
}

/// Recruitment footprint of a single company across every drive it joined.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyAnalysis {
    pub company_id: CompanyId,
    pub company_name: String,
    pub drives_participated: usize,
    pub jobs_posted: usize,
    pub total_applicants: usize,
    pub total_selected: usize,
    pub avg_salary: Option<f64>,
    pub placed_students: Vec<UserId>,
}
