//! Fixtures shared by this crate's unit tests.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use coastwatch_database::memory::MemoryStore;
use coastwatch_database::{AlertStore, DbError, PrincipalDirectory, ReportStore};
use coastwatch_database_models::{
    Alert, NewAlert, NewReport, Principal, Report, ReportFilter, ReportPatch, ReportSort,
};
use coastwatch_hazard_models::{HazardType, ReportStatus, Role};

pub fn principal(id: &str, role: Role) -> Principal {
    Principal {
        id: id.to_string(),
        role,
        name: format!("{role} {id}"),
        location: None,
    }
}

pub fn store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::new())
}

pub async fn seeded_report(store: &MemoryStore, hazard: HazardType) -> Report {
    let report = NewReport {
        reporter_id: "citizen-1".to_string(),
        role_at_submission: Role::Citizen,
        hazard_type: hazard,
        description: None,
        coordinates: None,
        location_name: None,
        media_ref: None,
        status: ReportStatus::Submitted,
        created_at: Utc::now(),
    };
    let id = store.insert_report(report.clone()).await.unwrap();
    report.into_report(id)
}

/// Delegates to a [`MemoryStore`] but reports every status write as
/// contended.
pub struct ContendedStore(pub MemoryStore);

#[async_trait]
impl ReportStore for ContendedStore {
    async fn insert_report(&self, report: NewReport) -> Result<String, DbError> {
        self.0.insert_report(report).await
    }

    async fn find_report(&self, id: &str) -> Result<Option<Report>, DbError> {
        self.0.find_report(id).await
    }

    async fn find_reports(
        &self,
        filter: &ReportFilter,
        sort: Option<ReportSort>,
        limit: Option<usize>,
    ) -> Result<Vec<Report>, DbError> {
        self.0.find_reports(filter, sort, limit).await
    }

    async fn find_one_and_update_report(
        &self,
        filter: &ReportFilter,
        _patch: ReportPatch,
    ) -> Result<Option<Report>, DbError> {
        Err(DbError::Conflict {
            collection: "reports",
            id: filter.id.clone().unwrap_or_default(),
        })
    }
}

#[async_trait]
impl AlertStore for ContendedStore {
    async fn insert_alert(&self, alert: NewAlert) -> Result<String, DbError> {
        self.0.insert_alert(alert).await
    }

    async fn find_alerts(
        &self,
        source_report_id: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<Alert>, DbError> {
        self.0.find_alerts(source_report_id, limit).await
    }
}

#[async_trait]
impl PrincipalDirectory for ContendedStore {
    async fn find_principals(&self, ids: &[String]) -> Result<Vec<Principal>, DbError> {
        self.0.find_principals(ids).await
    }
}

/// Delegates to a [`MemoryStore`] but fails every alert insert.
pub struct AlertOutageStore(pub MemoryStore);

#[async_trait]
impl ReportStore for AlertOutageStore {
    async fn insert_report(&self, report: NewReport) -> Result<String, DbError> {
        self.0.insert_report(report).await
    }

    async fn find_report(&self, id: &str) -> Result<Option<Report>, DbError> {
        self.0.find_report(id).await
    }

    async fn find_reports(
        &self,
        filter: &ReportFilter,
        sort: Option<ReportSort>,
        limit: Option<usize>,
    ) -> Result<Vec<Report>, DbError> {
        self.0.find_reports(filter, sort, limit).await
    }

    async fn find_one_and_update_report(
        &self,
        filter: &ReportFilter,
        patch: ReportPatch,
    ) -> Result<Option<Report>, DbError> {
        self.0.find_one_and_update_report(filter, patch).await
    }
}

#[async_trait]
impl AlertStore for AlertOutageStore {
    async fn insert_alert(&self, _alert: NewAlert) -> Result<String, DbError> {
        Err(DbError::Unavailable {
            message: "alerts collection offline".to_string(),
        })
    }

    async fn find_alerts(
        &self,
        source_report_id: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<Alert>, DbError> {
        self.0.find_alerts(source_report_id, limit).await
    }
}

#[async_trait]
impl PrincipalDirectory for AlertOutageStore {
    async fn find_principals(&self, ids: &[String]) -> Result<Vec<Principal>, DbError> {
        self.0.find_principals(ids).await
    }
}
