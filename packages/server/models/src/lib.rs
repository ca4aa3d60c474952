#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the coastwatch server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the store record types so the wire contract can evolve on its own.
//! Report submissions deserialize straight into
//! [`coastwatch_database_models::ReportDraft`].

use coastwatch_verification::alert::AlertRequest;
use coastwatch_verification::lifecycle::{AnalystDecision, OfficerDecision};
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// Error body returned with every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Human-readable reason.
    pub error: String,
}

impl ApiError {
    /// Wraps a message.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Body of `PATCH /api/reports/{id}/status`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdateRequest {
    /// One of `submitted`, `in_review`, `verified`, `rejected`.
    pub status: String,
}

/// Body of `POST /api/verification/analyst/verify/{id}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalystVerifyRequest {
    /// Verdict.
    pub verified: bool,
    /// Reviewer notes.
    #[serde(default)]
    pub notes: Option<String>,
}

impl From<AnalystVerifyRequest> for AnalystDecision {
    fn from(value: AnalystVerifyRequest) -> Self {
        Self {
            verified: value.verified,
            notes: value.notes,
        }
    }
}

/// Body of `POST /api/verification/officer/verify/{id}`.
///
/// Alert fields are flat on the request and only read when
/// `generateAlert` is set.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficerVerifyRequest {
    /// Verdict.
    pub verified: bool,
    /// Reviewer notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Whether to issue an alert alongside a verification.
    #[serde(default)]
    pub generate_alert: bool,
    /// Alert category.
    #[serde(default)]
    pub alert_type: Option<String>,
    /// Alert severity name.
    #[serde(default)]
    pub severity: Option<String>,
    /// Public alert message.
    #[serde(default)]
    pub alert_message: Option<String>,
    /// Affected area description.
    #[serde(default)]
    pub affected_area: Option<String>,
}

impl From<OfficerVerifyRequest> for OfficerDecision {
    fn from(value: OfficerVerifyRequest) -> Self {
        let alert = value.generate_alert.then(|| AlertRequest {
            alert_type: value.alert_type.unwrap_or_default(),
            severity: value.severity,
            message: value.alert_message.unwrap_or_default(),
            affected_area: value.affected_area.unwrap_or_default(),
        });

        Self {
            verified: value.verified,
            notes: value.notes,
            alert,
        }
    }
}

/// Query parameters for `GET /api/verification/alerts`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertQueryParams {
    /// Restrict to alerts issued from this report.
    pub report_id: Option<String>,
}

/// Query parameters for `GET /api/map/nearby`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyQueryParams {
    /// Observer latitude.
    pub lat: f64,
    /// Observer longitude.
    pub lng: f64,
    /// Search radius; defaults to 50 km.
    pub radius_km: Option<f64>,
}

/// Query parameters for `GET /api/map/safety`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafetyQueryParams {
    /// Observer latitude.
    pub lat: f64,
    /// Observer longitude.
    pub lng: f64,
}

/// Response of `GET /api/map/nearby`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiNearby {
    /// Reports within the radius.
    pub count: u64,
    /// Radius applied, in kilometers.
    pub radius_km: f64,
}
