#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregation result types for dashboards and the hazard map.
//!
//! Every type here is a plain serializable value produced by
//! `coastwatch_analytics`. Counts are unordered unless noted.

use chrono::{DateTime, Datelike as _, NaiveDate, TimeDelta, Utc};
use coastwatch_hazard_models::{HazardType, ReportStatus};
use coastwatch_spatial::{HeatBounds, HeatPoint};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Number of reports in one status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    /// Status being counted.
    pub status: ReportStatus,
    /// Reports currently in that status.
    pub count: u64,
}

/// Number of reports of one hazard type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HazardCount {
    /// Hazard being counted.
    pub hazard_type: HazardType,
    /// Reports of that hazard.
    pub count: u64,
}

/// Reviewer dashboard rollups over the full report set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    /// Total reports.
    pub totals: u64,
    /// Counts per status, only for statuses that occur.
    pub by_status: Vec<StatusCount>,
    /// Counts per hazard type, only for hazards that occur.
    pub by_hazard: Vec<HazardCount>,
}

/// Per-principal submission statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    /// Reports the principal has submitted.
    pub total_reports: u64,
    /// Of those, reports currently `verified`.
    pub verified_reports: u64,
    /// Reports submitted in the current calendar month (UTC).
    pub this_month_reports: u64,
    /// `verified / total` as a rounded percentage; 0 with no reports.
    pub accuracy: u8,
}

/// Officer dashboard counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficerSummary {
    /// All reports.
    pub total_reports: u64,
    /// Reports still awaiting an analyst (`submitted` + `in_review`).
    pub pending_validation: u64,
    /// Reports an analyst has verified.
    pub active_incidents: u64,
    /// Same population as `active_incidents`.
    pub verified_reports: u64,
    /// Tsunami and cyclone reports in any status.
    pub urgent_reports: u64,
}

/// Coarse safety rating derived from recent report volume.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SafetyLevel {
    /// No recent reports.
    Safe,
    /// A few recent reports.
    Caution,
    /// More than five recent reports.
    Warning,
    /// More than ten recent reports.
    Danger,
}

impl SafetyLevel {
    /// Rates a count of recent reports.
    #[must_use]
    pub const fn from_recent_count(count: u64) -> Self {
        match count {
            0 => Self::Safe,
            1..=5 => Self::Caution,
            6..=10 => Self::Warning,
            _ => Self::Danger,
        }
    }
}

/// Safety picture around an observer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunitySafety {
    /// Reports within the radius of the observer.
    pub nearby_incidents: u64,
    /// Radius used, in kilometers.
    pub radius_km: f64,
    /// Reports created in the trailing seven days, anywhere.
    pub recent_reports: u64,
    /// Rating derived from `recent_reports`.
    pub safety_level: SafetyLevel,
}

/// Heat-map points with their bounding rectangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapView {
    /// One weighted point per located report.
    pub points: Vec<HeatPoint>,
    /// Bounds of `points`; absent when there are none.
    pub bounds: Option<HeatBounds>,
}

/// Trailing time window over `created_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "days")]
pub enum RecencyWindow {
    /// From midnight UTC on the first of the current month.
    ThisMonth,
    /// The last `n` days up to now.
    LastDays(u32),
}

impl RecencyWindow {
    /// Inclusive start of the window relative to `now`.
    #[must_use]
    pub fn start(self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Self::ThisMonth => NaiveDate::from_ymd_opt(now.year(), now.month(), 1)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map_or(now, |d| d.and_utc()),
            Self::LastDays(days) => now - TimeDelta::days(i64::from(days)),
        }
    }

    /// Whether `at` falls inside the window ending at `now`.
    #[must_use]
    pub fn contains(self, at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        at >= self.start(now) && at <= now
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;

    use super::*;

    #[test]
    fn safety_level_thresholds() {
        assert_eq!(SafetyLevel::from_recent_count(0), SafetyLevel::Safe);
        assert_eq!(SafetyLevel::from_recent_count(1), SafetyLevel::Caution);
        assert_eq!(SafetyLevel::from_recent_count(5), SafetyLevel::Caution);
        assert_eq!(SafetyLevel::from_recent_count(6), SafetyLevel::Warning);
        assert_eq!(SafetyLevel::from_recent_count(10), SafetyLevel::Warning);
        assert_eq!(SafetyLevel::from_recent_count(11), SafetyLevel::Danger);
        assert_eq!(SafetyLevel::Danger.to_string(), "danger");
    }

    #[test]
    fn this_month_starts_on_the_first() {
        let now = Utc.with_ymd_and_hms(2024, 3, 17, 15, 30, 0).unwrap();
        let start = RecencyWindow::ThisMonth.start(now);
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());

        let feb = Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 59).unwrap();
        assert!(!RecencyWindow::ThisMonth.contains(feb, now));
        assert!(RecencyWindow::ThisMonth.contains(start, now));
    }

    #[test]
    fn last_days_is_a_trailing_window() {
        let now = Utc.with_ymd_and_hms(2024, 3, 17, 12, 0, 0).unwrap();
        let window = RecencyWindow::LastDays(7);

        assert_eq!(
            window.start(now),
            Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap()
        );
        assert!(window.contains(now - TimeDelta::days(6), now));
        assert!(!window.contains(now - TimeDelta::days(8), now));
        assert!(!window.contains(now + TimeDelta::hours(1), now));
    }

    #[test]
    fn metrics_serialize_camel_case() {
        let metrics = DashboardMetrics {
            totals: 2,
            by_status: vec![StatusCount {
                status: ReportStatus::InReview,
                count: 2,
            }],
            by_hazard: vec![HazardCount {
                hazard_type: HazardType::HighWave,
                count: 2,
            }],
        };

        let json = serde_json::to_value(&metrics).unwrap();
        assert_eq!(json["byStatus"][0]["status"], "in_review");
        assert_eq!(json["byHazard"][0]["hazardType"], "high_wave");
    }
}
