//! Placement statistics computed on demand from the job rosters, plus a
//! downloadable CSV report of confirmed placements.

pub mod domain;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{CompanyAnalysis, PlacementDetail, StudentAnalysis};
pub use router::analysis_router;
pub use service::{AnalysisService, AnalysisServiceError};
