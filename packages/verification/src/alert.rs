//! Alert emission policy.
//!
//! An officer who verifies a report may attach an [`AlertRequest`]. A
//! request is all-or-nothing: type, message, and affected area must all be
//! present, and the severity must be a known level (defaulting to
//! `medium`). Each accepted request produces exactly one new [`Alert`];
//! earlier alerts for the same report are not consulted.

use std::sync::Arc;

use chrono::Utc;
use coastwatch_database::Store;
use coastwatch_database_models::{Alert, NewAlert, Principal, Report};
use coastwatch_hazard_models::AlertSeverity;
use serde::{Deserialize, Serialize};

use crate::VerificationError;
use crate::authz::{Operation, authorize};

/// Alert fields as submitted by an officer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertRequest {
    /// Alert category (e.g. `"tsunami_warning"`).
    #[serde(default)]
    pub alert_type: String,
    /// Severity name; `None` or blank means `medium`.
    #[serde(default)]
    pub severity: Option<String>,
    /// Public message.
    #[serde(default)]
    pub message: String,
    /// Description of the affected area.
    #[serde(default)]
    pub affected_area: String,
}

/// An [`AlertRequest`] that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertSpec {
    /// Alert category.
    pub alert_type: String,
    /// Resolved severity.
    pub severity: AlertSeverity,
    /// Public message.
    pub message: String,
    /// Description of the affected area.
    pub affected_area: String,
}

impl AlertRequest {
    /// Checks completeness and resolves the severity.
    ///
    /// # Errors
    ///
    /// Returns [`VerificationError::Validation`] naming every blank field,
    /// or the unrecognized severity.
    pub fn validate(&self) -> Result<AlertSpec, VerificationError> {
        let missing: Vec<&str> = [
            ("alertType", &self.alert_type),
            ("message", &self.message),
            ("affectedArea", &self.affected_area),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if !missing.is_empty() {
            return Err(VerificationError::validation(format!(
                "incomplete alert request: missing {}",
                missing.join(", ")
            )));
        }

        let severity = AlertSeverity::resolve(self.severity.as_deref())
            .map_err(|e| VerificationError::validation(e.to_string()))?;

        Ok(AlertSpec {
            alert_type: self.alert_type.trim().to_string(),
            severity,
            message: self.message.trim().to_string(),
            affected_area: self.affected_area.trim().to_string(),
        })
    }
}

/// Creates and lists alert records.
#[derive(Clone)]
pub struct AlertEmitter {
    store: Arc<dyn Store>,
}

impl AlertEmitter {
    /// Creates an emitter over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Validates `request` and persists one alert for `report`.
    ///
    /// # Errors
    ///
    /// Returns [`VerificationError::Validation`] for an incomplete request
    /// or bad severity, and [`VerificationError::Store`] if the insert
    /// fails.
    pub async fn create_alert(
        &self,
        report: &Report,
        request: &AlertRequest,
        officer_id: &str,
    ) -> Result<Alert, VerificationError> {
        let spec = request.validate()?;
        self.emit(report, spec, officer_id).await
    }

    /// Persists an already-validated alert.
    ///
    /// # Errors
    ///
    /// Returns [`VerificationError::Store`] if the insert fails.
    pub async fn emit(
        &self,
        report: &Report,
        spec: AlertSpec,
        officer_id: &str,
    ) -> Result<Alert, VerificationError> {
        let alert = NewAlert {
            source_report_id: report.id.clone(),
            alert_type: spec.alert_type,
            severity: spec.severity,
            message: spec.message,
            affected_area: spec.affected_area,
            created_at: Utc::now(),
            created_by_officer_id: officer_id.to_string(),
        };

        let id = self.store.insert_alert(alert.clone()).await?;
        log::info!(
            "Officer {officer_id} issued {} alert {id} ({}) for report {}",
            alert.severity,
            alert.alert_type,
            report.id
        );

        Ok(alert.into_alert(id))
    }

    /// Lists alerts newest first, optionally for one source report.
    ///
    /// # Errors
    ///
    /// Returns [`VerificationError::Store`] if the store cannot be read.
    pub async fn list_alerts(
        &self,
        actor: &Principal,
        source_report_id: Option<&str>,
    ) -> Result<Vec<Alert>, VerificationError> {
        authorize(actor, Operation::ListAlerts)?;
        Ok(self.store.find_alerts(source_report_id, None).await?)
    }
}
