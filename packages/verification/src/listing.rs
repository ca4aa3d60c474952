//! Report listings for dashboards and profiles.

use std::sync::Arc;

use coastwatch_database::Store;
use coastwatch_database_models::{Principal, Report, ReportFilter, ReportSort};

use crate::VerificationError;
use crate::authz::{Operation, authorize};

/// Newest-first report listings.
#[derive(Clone)]
pub struct ReportListing {
    store: Arc<dyn Store>,
}

impl ReportListing {
    #[must_use]
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Reports submitted by `reporter_id`, newest first. Anyone may list
    /// their own reports; listing someone else's requires a reviewer role.
    ///
    /// # Errors
    ///
    /// * [`VerificationError::Authorization`] if a citizen asks for another
    ///   principal's reports.
    /// * [`VerificationError::Store`] if the store cannot be read.
    pub async fn for_reporter(
        &self,
        actor: &Principal,
        reporter_id: &str,
    ) -> Result<Vec<Report>, VerificationError> {
        if actor.id != reporter_id {
            authorize(actor, Operation::ListOthersReports)?;
        }

        Ok(self
            .store
            .find_reports(
                &ReportFilter::by_reporter(reporter_id),
                Some(ReportSort::NEWEST_CREATED),
                None,
            )
            .await?)
    }

    /// Every stored report, newest first.
    ///
    /// # Errors
    ///
    /// * [`VerificationError::Authorization`] unless the actor is an
    ///   officer or analyst.
    /// * [`VerificationError::Store`] if the store cannot be read.
    pub async fn all(&self, actor: &Principal) -> Result<Vec<Report>, VerificationError> {
        authorize(actor, Operation::ListAllReports)?;

        Ok(self
            .store
            .find_reports(&ReportFilter::default(), Some(ReportSort::NEWEST_CREATED), None)
            .await?)
    }
}
