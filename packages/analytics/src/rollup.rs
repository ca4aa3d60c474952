//! Group-by counts, recency windows, and ratios over a report snapshot.

use chrono::{DateTime, Utc};
use coastwatch_analytics_models::{HazardCount, RecencyWindow, SafetyLevel, StatusCount};
use coastwatch_database_models::Report;
use coastwatch_hazard_models::{HazardType, ReportStatus};

/// Counts reports per status. Statuses with no reports are omitted.
#[must_use]
pub fn count_by_status(reports: &[Report]) -> Vec<StatusCount> {
    ReportStatus::all()
        .iter()
        .map(|&status| StatusCount {
            status,
            count: count_where(reports, |r| r.status == status),
        })
        .filter(|c| c.count > 0)
        .collect()
}

/// Counts reports per hazard type. Hazards with no reports are omitted.
#[must_use]
pub fn count_by_hazard(reports: &[Report]) -> Vec<HazardCount> {
    HazardType::all()
        .iter()
        .map(|&hazard_type| HazardCount {
            hazard_type,
            count: count_where(reports, |r| r.hazard_type == hazard_type),
        })
        .filter(|c| c.count > 0)
        .collect()
}

/// Counts reports created inside `window` ending at `now`.
#[must_use]
pub fn count_in_window(reports: &[Report], window: RecencyWindow, now: DateTime<Utc>) -> u64 {
    count_where(reports, |r| window.contains(r.created_at, now))
}

/// Counts reports matching `predicate`.
#[must_use]
pub fn count_where(reports: &[Report], predicate: impl Fn(&Report) -> bool) -> u64 {
    reports.iter().filter(|&r| predicate(r)).count() as u64
}

/// `verified / total` as a percentage rounded half up. Zero when `total`
/// is zero.
#[must_use]
pub fn accuracy_percent(verified: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }

    let verified = verified.min(total);
    let rounded = (verified * 200 + total) / (total * 2);

    u8::try_from(rounded).unwrap_or(100)
}

/// Rates recent report volume.
#[must_use]
pub const fn safety_level(recent_reports: u64) -> SafetyLevel {
    SafetyLevel::from_recent_count(recent_reports)
}
