//! Pure eligibility checks. Kept free of storage so the rules can be tested
//! with plain values.

use std::collections::HashMap;

use chrono::Datelike;

use crate::directory::{StudentProfile, UserId};
use crate::records::StudentPerformance;

use super::domain::Requirement;

/// Year the student leaves campus, derived from the join date and the
/// nominal programme duration.
pub fn passout_year(profile: &StudentProfile) -> i32 {
    profile.join_date.year() + profile.program.duration_years()
}

/// Applies every threshold the requirement sets. Later batches than the
/// requirement's passout year are excluded; earlier ones pass. A student
/// without a performance record fails as soon as any CGPA threshold is set.
pub fn meets_requirement(
    requirement: &Requirement,
    profile: &StudentProfile,
    performance: Option<&StudentPerformance>,
) -> bool {
    if let Some(cutoff) = requirement.passout_year {
        if passout_year(profile) > cutoff {
            return false;
        }
    }

    // Only the latest semester cut-off counts.
    let mca_threshold = requirement
        .mca_cgpa
        .as_ref()
        .and_then(|tiers| tiers.last().copied());
    let needs_performance = requirement.sslc_cgpa.is_some()
        || requirement.plustwo_cgpa.is_some()
        || requirement.degree_cgpa.is_some()
        || mca_threshold.is_some();
    let Some(performance) = performance else {
        return !needs_performance;
    };

    if let Some(threshold) = requirement.sslc_cgpa {
        if !clears(performance.tenth_cgpa, threshold) {
            return false;
        }
    }
    if let Some(threshold) = requirement.plustwo_cgpa {
        if !clears(performance.twelth_cgpa, threshold) {
            return false;
        }
    }
    if let Some(threshold) = requirement.degree_cgpa {
        if !clears(performance.degree_cgpa, threshold) {
            return false;
        }
    }
    if let Some(threshold) = mca_threshold {
        match performance.mca_cgpa.last() {
            Some(latest) if *latest >= threshold => {}
            _ => return false,
        }
    }
    true
}

fn clears(value: Option<f64>, threshold: f64) -> bool {
    value.is_some_and(|value| value >= threshold)
}

/// Filters the roster, preserving its order.
pub fn eligible_students(
    requirement: &Requirement,
    students: &[StudentProfile],
    performances: &HashMap<UserId, StudentPerformance>,
) -> Vec<UserId> {
    students
        .iter()
        .filter(|profile| meets_requirement(requirement, profile, performances.get(&profile.id)))
        .map(|profile| profile.id.clone())
        .collect()
}
