#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Stored record types and store query definitions.
//!
//! These types represent the logical shapes of reports, alerts, and
//! principals as held by a report store, independent of the storage
//! engine. They are distinct from the HTTP payload types in
//! `coastwatch_server_models`.

use std::cmp::Ordering;

use chrono::{DateTime, TimeDelta, Utc};
use coastwatch_hazard_models::{AlertSeverity, HazardType, ReportStatus, Role};
use serde::{Deserialize, Serialize};

/// A WGS84 latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl Coordinates {
    /// Creates a coordinate pair.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A hazard report as held by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Opaque identifier assigned by the store.
    pub id: String,
    /// Principal that submitted the report.
    pub reporter_id: String,
    /// Role of the submitter at creation time.
    pub role_at_submission: Role,
    /// Hazard category.
    pub hazard_type: HazardType,
    /// Free-text description.
    pub description: Option<String>,
    /// Latitude (WGS84). Present only together with `longitude`.
    pub latitude: Option<f64>,
    /// Longitude (WGS84). Present only together with `latitude`.
    pub longitude: Option<f64>,
    /// Human-readable place name.
    pub location_name: Option<String>,
    /// Opaque pointer to attached media, stored verbatim.
    pub media_ref: Option<String>,
    /// Verification status.
    pub status: ReportStatus,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Time of the most recent status change (equals `created_at` until
    /// the first one).
    pub updated_at: DateTime<Utc>,
}

impl Report {
    /// Returns the report's location if both coordinates are present.
    #[must_use]
    pub const fn coordinates(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates::new(latitude, longitude)),
            _ => None,
        }
    }
}

/// A validated report ready for insertion. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReport {
    /// Principal that submitted the report.
    pub reporter_id: String,
    /// Role of the submitter.
    pub role_at_submission: Role,
    /// Hazard category.
    pub hazard_type: HazardType,
    /// Free-text description.
    pub description: Option<String>,
    /// Validated location.
    pub coordinates: Option<Coordinates>,
    /// Human-readable place name.
    pub location_name: Option<String>,
    /// Opaque media pointer.
    pub media_ref: Option<String>,
    /// Initial status.
    pub status: ReportStatus,
    /// Creation time; also used as the initial `updated_at`.
    pub created_at: DateTime<Utc>,
}

impl NewReport {
    /// Attaches the store-assigned id, producing the stored record.
    #[must_use]
    pub fn into_report(self, id: String) -> Report {
        Report {
            id,
            reporter_id: self.reporter_id,
            role_at_submission: self.role_at_submission,
            hazard_type: self.hazard_type,
            description: self.description,
            latitude: self.coordinates.map(|c| c.latitude),
            longitude: self.coordinates.map(|c| c.longitude),
            location_name: self.location_name,
            media_ref: self.media_ref,
            status: self.status,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}

/// A coordinate as submitted by a client: either a JSON number or the
/// text of a form field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CoordinateInput {
    /// Numeric value.
    Number(f64),
    /// Unparsed text.
    Text(String),
}

impl CoordinateInput {
    /// Whether the input carries no value (empty or whitespace text).
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Number(_) => false,
            Self::Text(text) => text.trim().is_empty(),
        }
    }

    /// Interprets the input as a finite number.
    #[must_use]
    pub fn to_finite(&self) -> Option<f64> {
        let value = match self {
            Self::Number(value) => *value,
            Self::Text(text) => text.trim().parse().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

/// Unvalidated report submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDraft {
    /// Hazard label (canonical name or form label).
    pub hazard_type: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
    /// Latitude as submitted.
    pub latitude: Option<CoordinateInput>,
    /// Longitude as submitted.
    pub longitude: Option<CoordinateInput>,
    /// Human-readable place name.
    pub location_name: Option<String>,
    /// Opaque media pointer from upload handling.
    pub media_ref: Option<String>,
}

/// A public safety alert issued by an officer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    /// Opaque identifier assigned by the store.
    pub id: String,
    /// Report the alert was issued from.
    pub source_report_id: String,
    /// Alert category (e.g. `"tsunami_warning"`).
    pub alert_type: String,
    /// Severity level.
    pub severity: AlertSeverity,
    /// Public message.
    pub message: String,
    /// Description of the affected area.
    pub affected_area: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Officer that issued the alert.
    pub created_by_officer_id: String,
}

/// A validated alert ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAlert {
    /// Report the alert was issued from.
    pub source_report_id: String,
    /// Alert category.
    pub alert_type: String,
    /// Severity level.
    pub severity: AlertSeverity,
    /// Public message.
    pub message: String,
    /// Description of the affected area.
    pub affected_area: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Officer that issued the alert.
    pub created_by_officer_id: String,
}

impl NewAlert {
    /// Attaches the store-assigned id, producing the stored record.
    #[must_use]
    pub fn into_alert(self, id: String) -> Alert {
        Alert {
            id,
            source_report_id: self.source_report_id,
            alert_type: self.alert_type,
            severity: self.severity,
            message: self.message,
            affected_area: self.affected_area,
            created_at: self.created_at,
            created_by_officer_id: self.created_by_officer_id,
        }
    }
}

/// An authenticated principal, supplied by the identity layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    /// Stable identifier.
    pub id: String,
    /// Role granted to this principal.
    pub role: Role,
    /// Display name.
    pub name: String,
    /// Home location label.
    #[serde(default)]
    pub location: Option<String>,
}

/// Conjunctive filter over stored reports. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportFilter {
    /// Exact report id.
    pub id: Option<String>,
    /// Allowed statuses.
    pub statuses: Vec<ReportStatus>,
    /// Exact reporter id.
    pub reporter_id: Option<String>,
    /// Inclusive lower bound on `created_at`.
    pub created_since: Option<DateTime<Utc>>,
}

impl ReportFilter {
    /// Matches a single report by id.
    #[must_use]
    pub fn by_id(id: &str) -> Self {
        Self {
            id: Some(id.to_string()),
            ..Self::default()
        }
    }

    /// Matches reports in any of the given statuses.
    #[must_use]
    pub fn with_statuses(statuses: &[ReportStatus]) -> Self {
        Self {
            statuses: statuses.to_vec(),
            ..Self::default()
        }
    }

    /// Matches reports submitted by the given principal.
    #[must_use]
    pub fn by_reporter(reporter_id: &str) -> Self {
        Self {
            reporter_id: Some(reporter_id.to_string()),
            ..Self::default()
        }
    }

    /// Whether the report satisfies every populated field.
    #[must_use]
    pub fn matches(&self, report: &Report) -> bool {
        self.id.as_ref().is_none_or(|id| *id == report.id)
            && (self.statuses.is_empty() || self.statuses.contains(&report.status))
            && self
                .reporter_id
                .as_ref()
                .is_none_or(|reporter| *reporter == report.reporter_id)
            && self
                .created_since
                .is_none_or(|since| report.created_at >= since)
    }
}

/// Timestamp a scan is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Order by creation time.
    CreatedAt,
    /// Order by last status change.
    UpdatedAt,
}

/// Scan direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Oldest first.
    Ascending,
    /// Newest first.
    Descending,
}

/// Ordering applied to a report scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportSort {
    /// Timestamp to order by.
    pub key: SortKey,
    /// Direction.
    pub order: SortOrder,
}

impl ReportSort {
    /// Oldest `created_at` first.
    pub const OLDEST_CREATED: Self = Self {
        key: SortKey::CreatedAt,
        order: SortOrder::Ascending,
    };

    /// Newest `created_at` first.
    pub const NEWEST_CREATED: Self = Self {
        key: SortKey::CreatedAt,
        order: SortOrder::Descending,
    };

    /// Oldest `updated_at` first.
    pub const OLDEST_UPDATED: Self = Self {
        key: SortKey::UpdatedAt,
        order: SortOrder::Ascending,
    };

    /// Compares two reports under this ordering. Equal timestamps fall
    /// back to the report id so scans are deterministic.
    #[must_use]
    pub fn compare(&self, a: &Report, b: &Report) -> Ordering {
        let ordering = match self.key {
            SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
            SortKey::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        }
        .then_with(|| a.id.cmp(&b.id));

        match self.order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    }
}

/// Status change applied by an atomic find-and-modify.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportPatch {
    /// New status.
    pub status: ReportStatus,
    /// Wall-clock time of the change.
    pub touched_at: DateTime<Utc>,
}

impl ReportPatch {
    /// Applies the patch in place.
    ///
    /// `updated_at` always moves strictly forward: if the clock has not
    /// advanced past the stored value, the stored value is bumped by one
    /// microsecond instead.
    pub fn apply(&self, report: &mut Report) {
        report.status = self.status;
        report.updated_at = if self.touched_at > report.updated_at {
            self.touched_at
        } else {
            report
                .updated_at
                .checked_add_signed(TimeDelta::microseconds(1))
                .unwrap_or(self.touched_at)
        };
    }
}
