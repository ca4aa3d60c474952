#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Coastal hazard taxonomy and the small closed vocabularies shared by
//! every coastwatch crate.
//!
//! This crate defines the canonical hazard categories that citizen reports
//! are normalized into, the report verification statuses, the principal
//! roles, and the severity levels attached to public alerts.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Category of an observed ocean or coastal hazard.
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
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum HazardType {
    /// Coastal or riverine flooding
    Flood,
    /// Tsunami waves
    Tsunami,
    /// Abnormally high waves or swell
    #[serde(alias = "high_waves")]
    #[strum(to_string = "high_wave", serialize = "high_waves")]
    HighWave,
    /// Storm-driven rise in sea level
    #[serde(alias = "swell_surge")]
    #[strum(to_string = "storm_surge", serialize = "swell_surge")]
    StormSurge,
    /// Erosion or damage of the shoreline
    #[serde(alias = "erosion", alias = "coastal_damage")]
    #[strum(
        to_string = "coastal_erosion",
        serialize = "erosion",
        serialize = "coastal_damage"
    )]
    CoastalErosion,
    /// Oil or chemical spill at sea
    OilSpill,
    /// Rip currents
    RipCurrent,
    /// Cyclone or severe tropical storm
    Cyclone,
}

impl HazardType {
    /// Parses a hazard type from a submitted label.
    ///
    /// Accepts the canonical `snake_case` names as well as the human
    /// labels used by submission forms (e.g. `"High Waves"`). Matching is
    /// case-insensitive and treats spaces and hyphens as underscores.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownHazardError`] if the label does not name a known
    /// hazard.
    pub fn from_label(label: &str) -> Result<Self, UnknownHazardError> {
        let normalized: String = label
            .trim()
            .chars()
            .map(|c| match c {
                ' ' | '-' => '_',
                c => c.to_ascii_lowercase(),
            })
            .collect();

        normalized.parse().map_err(|_| UnknownHazardError {
            label: label.to_string(),
        })
    }

    /// Base heat-map intensity before verification weighting.
    #[must_use]
    pub const fn base_intensity(self) -> f64 {
        match self {
            Self::Tsunami | Self::Cyclone => 3.0,
            Self::HighWave | Self::OilSpill => 2.0,
            Self::RipCurrent | Self::CoastalErosion => 1.5,
            Self::Flood | Self::StormSurge => 1.0,
        }
    }

    /// Whether reports of this hazard belong in the officer's urgent queue.
    #[must_use]
    pub const fn is_urgent(self) -> bool {
        matches!(self, Self::Tsunami | Self::Cyclone)
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Flood,
            Self::Tsunami,
            Self::HighWave,
            Self::StormSurge,
            Self::CoastalErosion,
            Self::OilSpill,
            Self::RipCurrent,
            Self::Cyclone,
        ]
    }
}

/// Error returned when a hazard label does not match any [`HazardType`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownHazardError {
    /// The label that failed to parse.
    pub label: String,
}

impl std::fmt::Display for UnknownHazardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unrecognized hazard type '{}'", self.label)
    }
}

impl std::error::Error for UnknownHazardError {}

/// Verification status of a hazard report.
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
pub enum ReportStatus {
    /// Freshly submitted, awaiting analyst triage
    Submitted,
    /// Picked up for review but not yet decided
    InReview,
    /// Accepted by a reviewer
    Verified,
    /// Dismissed by a reviewer
    Rejected,
}

impl ReportStatus {
    /// Parses a status from its `snake_case` name.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidStatusError`] for anything other than the four
    /// enumerated values.
    pub fn from_name(name: &str) -> Result<Self, InvalidStatusError> {
        name.trim().parse().map_err(|_| InvalidStatusError {
            value: name.to_string(),
        })
    }

    /// Whether a report in this status is waiting on an analyst.
    #[must_use]
    pub const fn awaits_analyst(self) -> bool {
        matches!(self, Self::Submitted | Self::InReview)
    }

    /// Whether this status ends the two-stage pipeline.
    ///
    /// Terminal reports can only move again through the generic status
    /// override.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Verified | Self::Rejected)
    }

    /// Maps a reviewer verdict onto the resulting status.
    #[must_use]
    pub const fn from_verdict(verified: bool) -> Self {
        if verified {
            Self::Verified
        } else {
            Self::Rejected
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Submitted,
            Self::InReview,
            Self::Verified,
            Self::Rejected,
        ]
    }
}

/// Error returned when a status name is not one of the [`ReportStatus`]
/// values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidStatusError {
    /// The rejected input.
    pub value: String,
}

impl std::fmt::Display for InvalidStatusError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid status '{}': expected one of submitted, in_review, verified, rejected",
            self.value
        )
    }
}

impl std::error::Error for InvalidStatusError {}

/// Role carried by an authenticated principal.
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
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Role {
    /// Member of the public submitting reports
    Citizen,
    /// Final-pass reviewer who may issue alerts
    Officer,
    /// First-pass reviewer
    Analyst,
}

impl Role {
    /// Parses a role name, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidRoleError`] if the name is not a known role.
    pub fn from_name(name: &str) -> Result<Self, InvalidRoleError> {
        name.trim().parse().map_err(|_| InvalidRoleError {
            value: name.to_string(),
        })
    }
}

/// Error returned when a role name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidRoleError {
    /// The rejected input.
    pub value: String,
}

impl std::fmt::Display for InvalidRoleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid role '{}'", self.value)
    }
}

impl std::error::Error for InvalidRoleError {}

/// Severity of a public safety alert.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
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
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum AlertSeverity {
    /// Advisory only
    Low,
    /// Default level when an officer does not choose one
    #[default]
    Medium,
    /// Take precautions
    High,
    /// Immediate action required
    Critical,
}

impl AlertSeverity {
    /// Resolves an optional severity name, defaulting to
    /// [`AlertSeverity::Medium`] when absent or blank.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidSeverityError`] if a non-blank name is not one of
    /// `low`, `medium`, `high`, `critical`.
    pub fn resolve(name: Option<&str>) -> Result<Self, InvalidSeverityError> {
        match name.map(str::trim) {
            None | Some("") => Ok(Self::default()),
            Some(value) => value.parse().map_err(|_| InvalidSeverityError {
                value: value.to_string(),
            }),
        }
    }
}

/// Error returned when an alert severity name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidSeverityError {
    /// The rejected input.
    pub value: String,
}

impl std::fmt::Display for InvalidSeverityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid severity '{}': expected low, medium, high, or critical",
            self.value
        )
    }
}

impl std::error::Error for InvalidSeverityError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hazard_labels_and_aliases_parse() {
        assert_eq!(HazardType::from_label("tsunami"), Ok(HazardType::Tsunami));
        assert_eq!(HazardType::from_label("Flood"), Ok(HazardType::Flood));
        assert_eq!(
            HazardType::from_label("High Waves"),
            Ok(HazardType::HighWave)
        );
        assert_eq!(
            HazardType::from_label("Swell Surge"),
            Ok(HazardType::StormSurge)
        );
        assert_eq!(
            HazardType::from_label("erosion"),
            Ok(HazardType::CoastalErosion)
        );
        assert_eq!(
            HazardType::from_label("coastal-damage"),
            Ok(HazardType::CoastalErosion)
        );
        assert_eq!(
            HazardType::from_label(" oil_spill "),
            Ok(HazardType::OilSpill)
        );
        assert!(HazardType::from_label("volcano").is_err());
        assert!(HazardType::from_label("").is_err());
    }

    #[test]
    fn hazard_display_is_canonical_name() {
        for hazard in HazardType::all() {
            let name = hazard.to_string();
            assert_eq!(HazardType::from_label(&name), Ok(*hazard));
        }
        assert_eq!(HazardType::HighWave.to_string(), "high_wave");
        assert_eq!(HazardType::CoastalErosion.as_ref(), "coastal_erosion");
    }

    #[test]
    fn base_intensity_tiers() {
        assert!((HazardType::Tsunami.base_intensity() - 3.0).abs() < f64::EPSILON);
        assert!((HazardType::Cyclone.base_intensity() - 3.0).abs() < f64::EPSILON);
        assert!((HazardType::HighWave.base_intensity() - 2.0).abs() < f64::EPSILON);
        assert!((HazardType::OilSpill.base_intensity() - 2.0).abs() < f64::EPSILON);
        assert!((HazardType::RipCurrent.base_intensity() - 1.5).abs() < f64::EPSILON);
        assert!((HazardType::CoastalErosion.base_intensity() - 1.5).abs() < f64::EPSILON);
        assert!((HazardType::Flood.base_intensity() - 1.0).abs() < f64::EPSILON);
        assert!((HazardType::StormSurge.base_intensity() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn status_names() {
        for status in ReportStatus::all() {
            assert_eq!(ReportStatus::from_name(status.as_ref()), Ok(*status));
        }
        assert_eq!(ReportStatus::InReview.to_string(), "in_review");
        assert!(ReportStatus::from_name("archived").is_err());
        assert!(ReportStatus::Submitted.awaits_analyst());
        assert!(ReportStatus::InReview.awaits_analyst());
        assert!(ReportStatus::Verified.is_terminal());
        assert!(!ReportStatus::InReview.is_terminal());
        assert_eq!(ReportStatus::from_verdict(false), ReportStatus::Rejected);
    }

    #[test]
    fn severity_defaults_to_medium() {
        assert_eq!(AlertSeverity::resolve(None), Ok(AlertSeverity::Medium));
        assert_eq!(AlertSeverity::resolve(Some("  ")), Ok(AlertSeverity::Medium));
        assert_eq!(
            AlertSeverity::resolve(Some("CRITICAL")),
            Ok(AlertSeverity::Critical)
        );
        assert!(AlertSeverity::resolve(Some("extreme")).is_err());
    }

    #[test]
    fn role_names() {
        assert_eq!(Role::from_name("Analyst"), Ok(Role::Analyst));
        assert_eq!(Role::Officer.to_string(), "officer");
        assert!(Role::from_name("admin").is_err());
    }
}
