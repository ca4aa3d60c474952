//! Analyst and officer work queues.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use coastwatch_database::Store;
use coastwatch_database_models::{Principal, Report, ReportFilter, ReportSort};
use coastwatch_hazard_models::ReportStatus;
use serde::{Deserialize, Serialize};

use crate::VerificationError;
use crate::authz::{Operation, authorize};

/// Maximum number of reports returned by a queue read.
pub const QUEUE_PAGE_SIZE: usize = 100;

/// A queued report enriched with its reporter's public details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueEntry {
    #[serde(flatten)]
    pub report: Report,
    /// Reporter display name, if the principal is known.
    pub reporter_name: Option<String>,
    /// Reporter home location, if known.
    pub reporter_location: Option<String>,
}

/// Read-only views over reports awaiting review.
#[derive(Clone)]
pub struct VerificationQueue {
    store: Arc<dyn Store>,
}

impl VerificationQueue {
    #[must_use]
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Reports in `submitted` or `in_review`, oldest submission first.
    ///
    /// # Errors
    ///
    /// * [`VerificationError::Authorization`] unless the actor is an
    ///   analyst.
    /// * [`VerificationError::Store`] if the store cannot be read.
    pub async fn pending_for_analyst(
        &self,
        actor: &Principal,
    ) -> Result<Vec<QueueEntry>, VerificationError> {
        authorize(actor, Operation::ViewAnalystQueue)?;

        let filter = ReportFilter::with_statuses(&[ReportStatus::Submitted, ReportStatus::InReview]);
        let reports = self
            .store
            .find_reports(&filter, Some(ReportSort::OLDEST_CREATED), Some(QUEUE_PAGE_SIZE))
            .await?;

        log::debug!("Analyst queue holds {} report(s)", reports.len());
        self.enrich(reports).await
    }

    /// Analyst-verified reports, least recently updated first.
    ///
    /// # Errors
    ///
    /// * [`VerificationError::Authorization`] unless the actor is an
    ///   officer.
    /// * [`VerificationError::Store`] if the store cannot be read.
    pub async fn pending_for_officer(
        &self,
        actor: &Principal,
    ) -> Result<Vec<QueueEntry>, VerificationError> {
        authorize(actor, Operation::ViewOfficerQueue)?;

        let filter = ReportFilter::with_statuses(&[ReportStatus::Verified]);
        let reports = self
            .store
            .find_reports(&filter, Some(ReportSort::OLDEST_UPDATED), Some(QUEUE_PAGE_SIZE))
            .await?;

        log::debug!("Officer queue holds {} report(s)", reports.len());
        self.enrich(reports).await
    }

    async fn enrich(&self, reports: Vec<Report>) -> Result<Vec<QueueEntry>, VerificationError> {
        let ids: Vec<String> = reports
            .iter()
            .map(|r| r.reporter_id.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let principals: HashMap<String, Principal> = if ids.is_empty() {
            HashMap::new()
        } else {
            self.store
                .find_principals(&ids)
                .await?
                .into_iter()
                .map(|p| (p.id.clone(), p))
                .collect()
        };

        Ok(reports
            .into_iter()
            .map(|report| {
                let reporter = principals.get(&report.reporter_id);
                QueueEntry {
                    reporter_name: reporter.map(|p| p.name.clone()),
                    reporter_location: reporter.and_then(|p| p.location.clone()),
                    report,
                }
            })
            .collect())
    }
}
