//! Report lifecycle manager.
//!
//! Owns the report state machine:
//!
//! | From                  | Event                       | To                    |
//! |-----------------------|-----------------------------|-----------------------|
//! | (new)                 | citizen/officer submission  | `submitted`           |
//! | `submitted`/`in_review` | analyst approve / reject  | `verified`/`rejected` |
//! | `verified`            | officer approve / reject    | `verified`/`rejected` |
//! | any                   | status override             | any                   |
//!
//! Decisions match the report by id only, so a decision on a report in
//! any other state still lands and the last write wins. The override path
//! is the sole way to reopen a terminal report and never emits alerts.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use coastwatch_database::Store;
use coastwatch_database_models::{
    Alert, CoordinateInput, Coordinates, NewReport, Principal, Report, ReportDraft, ReportFilter,
    ReportPatch,
};
use coastwatch_hazard_models::{HazardType, ReportStatus};
use serde::{Deserialize, Serialize};

use crate::VerificationError;
use crate::alert::{AlertEmitter, AlertRequest};
use crate::authz::{Operation, authorize};

/// An analyst's first-pass verdict.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalystDecision {
    /// `true` to verify, `false` to reject.
    pub verified: bool,
    /// Reviewer notes. Logged, not persisted.
    #[serde(default)]
    pub notes: Option<String>,
}

/// An officer's final verdict.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficerDecision {
    /// `true` to verify, `false` to reject.
    pub verified: bool,
    /// Reviewer notes. Logged, not persisted.
    #[serde(default)]
    pub notes: Option<String>,
    /// Alert to issue alongside a verification.
    #[serde(default)]
    pub alert: Option<AlertRequest>,
}

/// Result of an officer decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficerOutcome {
    /// The report after the transition.
    pub report: Report,
    /// The alert created by this call, if any.
    pub alert: Option<Alert>,
}

/// Applies role-gated status transitions to stored reports.
#[derive(Clone)]
pub struct ReportLifecycle {
    store: Arc<dyn Store>,
    alerts: AlertEmitter,
}

impl ReportLifecycle {
    /// Creates a lifecycle manager over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn Store>) -> Self {
        let alerts = AlertEmitter::new(store.clone());
        Self { store, alerts }
    }

    /// Validates a draft and stores it as a new `submitted` report.
    ///
    /// # Errors
    ///
    /// * [`VerificationError::Authorization`] unless the actor is a citizen
    ///   or officer.
    /// * [`VerificationError::Validation`] for a missing or unknown hazard
    ///   type or bad coordinates. Nothing is stored in that case.
    /// * [`VerificationError::Store`] if the insert fails.
    pub async fn submit(
        &self,
        actor: &Principal,
        draft: ReportDraft,
    ) -> Result<Report, VerificationError> {
        authorize(actor, Operation::SubmitReport)?;

        let report = validate_draft(actor, draft, Utc::now())?;
        let id = self.store.insert_report(report.clone()).await?;

        log::info!(
            "Report {id} ({}) submitted by {} {}",
            report.hazard_type,
            report.role_at_submission,
            report.reporter_id
        );

        Ok(report.into_report(id))
    }

    /// Records an analyst's verdict: `verified` or `rejected`.
    ///
    /// # Errors
    ///
    /// * [`VerificationError::Authorization`] unless the actor is an
    ///   analyst.
    /// * [`VerificationError::NotFound`] if the report does not exist.
    /// * [`VerificationError::Store`] if the write fails.
    pub async fn analyst_decide(
        &self,
        actor: &Principal,
        report_id: &str,
        decision: AnalystDecision,
    ) -> Result<Report, VerificationError> {
        authorize(actor, Operation::AnalystDecide)?;

        let status = ReportStatus::from_verdict(decision.verified);
        let report = self.transition(report_id, status).await?;

        log::info!(
            "Analyst {} marked report {report_id} {status}{}",
            actor.id,
            notes_suffix(decision.notes.as_deref())
        );

        Ok(report)
    }

    /// Records an officer's verdict and, on verification, issues the
    /// requested alert.
    ///
    /// Any alert request is validated before anything is written, whatever
    /// the verdict, so an incomplete request leaves both the report and the
    /// alert collection untouched. A rejecting decision never issues an
    /// alert. On verification the alert is inserted first and the status
    /// write is the commit point. Every successful call with a request
    /// creates a new alert, including repeated calls on the same report.
    ///
    /// # Errors
    ///
    /// * [`VerificationError::Authorization`] unless the actor is an
    ///   officer.
    /// * [`VerificationError::Validation`] if the decision carries an
    ///   incomplete alert request or unknown severity.
    /// * [`VerificationError::NotFound`] if the report does not exist.
    /// * [`VerificationError::Store`] if a read or write fails. If the alert
    ///   insert fails, the report keeps its previous status and `updatedAt`
    ///   and no alert is stored. If the status write fails after the alert
    ///   was inserted, the alert remains and the report is unchanged.
    pub async fn officer_decide(
        &self,
        actor: &Principal,
        report_id: &str,
        decision: OfficerDecision,
    ) -> Result<OfficerOutcome, VerificationError> {
        authorize(actor, Operation::OfficerDecide)?;

        let alert_spec = decision
            .alert
            .as_ref()
            .map(AlertRequest::validate)
            .transpose()?;
        let alert_spec = match alert_spec {
            Some(_) if !decision.verified => {
                log::debug!("Not issuing alert for rejected report {report_id}");
                None
            }
            spec => spec,
        };

        let current = self
            .store
            .find_report(report_id)
            .await?
            .ok_or_else(|| VerificationError::NotFound {
                id: report_id.to_string(),
            })?;

        let alert = match alert_spec {
            Some(spec) => Some(self.alerts.emit(&current, spec, &actor.id).await?),
            None => None,
        };

        let status = ReportStatus::from_verdict(decision.verified);
        let report = self.transition(report_id, status).await?;

        log::info!(
            "Officer {} marked report {report_id} {status}{}",
            actor.id,
            notes_suffix(decision.notes.as_deref())
        );

        Ok(OfficerOutcome { report, alert })
    }

    /// Generic status override for reviewer dashboards. Any of the four
    /// statuses may be set from any state; no alert is ever emitted.
    ///
    /// # Errors
    ///
    /// * [`VerificationError::Authorization`] unless the actor is an
    ///   officer or analyst.
    /// * [`VerificationError::Validation`] if `status` is not one of the
    ///   four status names.
    /// * [`VerificationError::NotFound`] if the report does not exist.
    /// * [`VerificationError::Store`] if the write fails.
    pub async fn set_status(
        &self,
        actor: &Principal,
        report_id: &str,
        status: &str,
    ) -> Result<Report, VerificationError> {
        authorize(actor, Operation::SetStatus)?;

        let status = ReportStatus::from_name(status)
            .map_err(|e| VerificationError::validation(e.to_string()))?;
        let report = self.transition(report_id, status).await?;

        log::info!(
            "{} {} set report {report_id} to {status}",
            actor.role,
            actor.id
        );

        Ok(report)
    }

    async fn transition(
        &self,
        report_id: &str,
        status: ReportStatus,
    ) -> Result<Report, VerificationError> {
        let patch = ReportPatch {
            status,
            touched_at: Utc::now(),
        };

        let report = self
            .store
            .find_one_and_update_report(&ReportFilter::by_id(report_id), patch)
            .await?
            .ok_or_else(|| VerificationError::NotFound {
                id: report_id.to_string(),
            })?;

        Ok(report)
    }
}

fn notes_suffix(notes: Option<&str>) -> String {
    notes
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(|n| format!(" (notes: {n})"))
        .unwrap_or_default()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_coordinate(
    name: &str,
    input: Option<&CoordinateInput>,
    range: f64,
) -> Result<Option<f64>, VerificationError> {
    let Some(input) = input.filter(|i| !i.is_blank()) else {
        return Ok(None);
    };

    let value = input
        .to_finite()
        .ok_or_else(|| VerificationError::validation(format!("{name} must be a finite number")))?;

    if value.abs() > range {
        return Err(VerificationError::validation(format!(
            "{name} {value} is outside [-{range}, {range}]"
        )));
    }

    Ok(Some(value))
}

fn validate_draft(
    actor: &Principal,
    draft: ReportDraft,
    now: DateTime<Utc>,
) -> Result<NewReport, VerificationError> {
    let label = non_blank(draft.hazard_type)
        .ok_or_else(|| VerificationError::validation("hazard type is required"))?;
    let hazard_type =
        HazardType::from_label(&label).map_err(|e| VerificationError::validation(e.to_string()))?;

    let latitude = parse_coordinate("latitude", draft.latitude.as_ref(), 90.0)?;
    let longitude = parse_coordinate("longitude", draft.longitude.as_ref(), 180.0)?;
    let coordinates = match (latitude, longitude) {
        (Some(latitude), Some(longitude)) => Some(Coordinates::new(latitude, longitude)),
        (None, None) => None,
        _ => {
            return Err(VerificationError::validation(
                "latitude and longitude must be provided together",
            ));
        }
    };

    Ok(NewReport {
        reporter_id: actor.id.clone(),
        role_at_submission: actor.role,
        hazard_type,
        description: non_blank(draft.description),
        coordinates,
        location_name: non_blank(draft.location_name),
        media_ref: draft.media_ref.filter(|m| !m.is_empty()),
        status: ReportStatus::Submitted,
        created_at: now,
    })
}
