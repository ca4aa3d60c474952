//! In-memory implementation of the store traits.
//!
//! Each collection sits behind its own `tokio` [`RwLock`]. Reads take a
//! shared lock for the duration of one scan; a find-and-modify holds the
//! write lock for its single read-patch-return step, which is what makes
//! it atomic. No lock is ever held across calls.

use std::collections::BTreeMap;

use async_trait::async_trait;
use coastwatch_database_models::{
    Alert, NewAlert, NewReport, Principal, Report, ReportFilter, ReportPatch, ReportSort,
};
use tokio::sync::RwLock;

use crate::snapshot::Snapshot;
use crate::{AlertStore, DbError, PrincipalDirectory, ReportStore};

/// Process-local store for reports, alerts, and principals.
#[derive(Debug, Default)]
pub struct MemoryStore {
    reports: RwLock<BTreeMap<String, Report>>,
    alerts: RwLock<Vec<Alert>>,
    principals: RwLock<BTreeMap<String, Principal>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated from a snapshot.
    ///
    /// Duplicate report ids keep the last occurrence.
    #[must_use]
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let mut reports = BTreeMap::new();
        for report in snapshot.reports {
            if let Some(previous) = reports.insert(report.id.clone(), report) {
                log::warn!("Duplicate report {} in snapshot, keeping the later entry", previous.id);
            }
        }

        Self {
            reports: RwLock::new(reports),
            alerts: RwLock::new(snapshot.alerts),
            principals: RwLock::new(BTreeMap::new()),
        }
    }

    /// Adds principals to the directory, replacing any with the same id.
    #[must_use]
    pub fn with_principals(self, principals: impl IntoIterator<Item = Principal>) -> Self {
        let mut map = self.principals.into_inner();
        for principal in principals {
            map.insert(principal.id.clone(), principal);
        }
        Self {
            principals: RwLock::new(map),
            ..self
        }
    }

    /// Copies the current reports and alerts into a [`Snapshot`].
    pub async fn snapshot(&self) -> Snapshot {
        let reports = self.reports.read().await.values().cloned().collect();
        let alerts = self.alerts.read().await.clone();
        Snapshot { reports, alerts }
    }

    /// Number of stored reports.
    pub async fn report_count(&self) -> usize {
        self.reports.read().await.len()
    }

    /// Number of stored alerts.
    pub async fn alert_count(&self) -> usize {
        self.alerts.read().await.len()
    }
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[async_trait]
impl ReportStore for MemoryStore {
    async fn insert_report(&self, report: NewReport) -> Result<String, DbError> {
        let id = new_id();
        self.reports
            .write()
            .await
            .insert(id.clone(), report.into_report(id.clone()));
        Ok(id)
    }

    async fn find_report(&self, id: &str) -> Result<Option<Report>, DbError> {
        Ok(self.reports.read().await.get(id).cloned())
    }

    async fn find_reports(
        &self,
        filter: &ReportFilter,
        sort: Option<ReportSort>,
        limit: Option<usize>,
    ) -> Result<Vec<Report>, DbError> {
        let mut rows: Vec<Report> = self
            .reports
            .read()
            .await
            .values()
            .filter(|report| filter.matches(report))
            .cloned()
            .collect();

        if let Some(sort) = sort {
            rows.sort_by(|a, b| sort.compare(a, b));
        }
        if let Some(limit) = limit {
            rows.truncate(limit);
        }

        Ok(rows)
    }

    async fn find_one_and_update_report(
        &self,
        filter: &ReportFilter,
        patch: ReportPatch,
    ) -> Result<Option<Report>, DbError> {
        let mut reports = self.reports.write().await;

        let target = match &filter.id {
            Some(id) => reports.get_mut(id).filter(|report| filter.matches(report)),
            None => reports.values_mut().find(|report| filter.matches(report)),
        };

        Ok(target.map(|report| {
            patch.apply(report);
            report.clone()
        }))
    }
}

#[async_trait]
impl AlertStore for MemoryStore {
    async fn insert_alert(&self, alert: NewAlert) -> Result<String, DbError> {
        let id = new_id();
        self.alerts.write().await.push(alert.into_alert(id.clone()));
        Ok(id)
    }

    async fn find_alerts(
        &self,
        source_report_id: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<Alert>, DbError> {
        let alerts = self.alerts.read().await;
        let rows = alerts
            .iter()
            .rev()
            .filter(|alert| source_report_id.is_none_or(|id| alert.source_report_id == id))
            .take(limit.unwrap_or(usize::MAX))
            .cloned()
            .collect();
        Ok(rows)
    }
}

#[async_trait]
impl PrincipalDirectory for MemoryStore {
    async fn find_principals(&self, ids: &[String]) -> Result<Vec<Principal>, DbError> {
        let principals = self.principals.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| principals.get(id))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeDelta, Utc};
    use coastwatch_database_models::Coordinates;
    use coastwatch_hazard_models::{AlertSeverity, HazardType, ReportStatus, Role};

    use super::*;

    fn draft(hazard: HazardType, created_at: DateTime<Utc>) -> NewReport {
        NewReport {
            reporter_id: "citizen-1".to_string(),
            role_at_submission: Role::Citizen,
            hazard_type: hazard,
            description: None,
            coordinates: Some(Coordinates::new(9.93, 76.25)),
            location_name: None,
            media_ref: None,
            status: ReportStatus::Submitted,
            created_at,
        }
    }

    #[tokio::test]
    async fn insert_assigns_distinct_ids() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let a = store.insert_report(draft(HazardType::Flood, now)).await.unwrap();
        let b = store.insert_report(draft(HazardType::Flood, now)).await.unwrap();

        assert_ne!(a, b);
        assert_eq!(store.report_count().await, 2);

        let found = store.find_report(&a).await.unwrap().unwrap();
        assert_eq!(found.id, a);
        assert_eq!(found.status, ReportStatus::Submitted);
        assert!(store.find_report("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn find_sorts_and_limits() {
        let store = MemoryStore::new();
        let base = Utc::now();
        for offset in [30, 10, 20] {
            store
                .insert_report(draft(
                    HazardType::Tsunami,
                    base + TimeDelta::seconds(offset),
                ))
                .await
                .unwrap();
        }

        let rows = store
            .find_reports(
                &ReportFilter::default(),
                Some(ReportSort::OLDEST_CREATED),
                Some(2),
            )
            .await
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].created_at, base + TimeDelta::seconds(10));
        assert_eq!(rows[1].created_at, base + TimeDelta::seconds(20));
    }

    #[tokio::test]
    async fn find_one_and_update_returns_post_image() {
        let store = MemoryStore::new();
        let created = Utc::now();
        let id = store
            .insert_report(draft(HazardType::Cyclone, created))
            .await
            .unwrap();

        let updated = store
            .find_one_and_update_report(
                &ReportFilter::by_id(&id),
                ReportPatch {
                    status: ReportStatus::Verified,
                    touched_at: created + TimeDelta::seconds(1),
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.status, ReportStatus::Verified);
        assert!(updated.updated_at > updated.created_at);

        let stored = store.find_report(&id).await.unwrap().unwrap();
        assert_eq!(stored, updated);
    }

    #[tokio::test]
    async fn find_one_and_update_misses_return_none() {
        let store = MemoryStore::new();
        let id = store
            .insert_report(draft(HazardType::Flood, Utc::now()))
            .await
            .unwrap();
        let patch = ReportPatch {
            status: ReportStatus::Rejected,
            touched_at: Utc::now(),
        };

        let missing = store
            .find_one_and_update_report(&ReportFilter::by_id("nope"), patch)
            .await
            .unwrap();
        assert!(missing.is_none());

        let wrong_status = ReportFilter {
            id: Some(id.clone()),
            statuses: vec![ReportStatus::Verified],
            ..ReportFilter::default()
        };
        let skipped = store
            .find_one_and_update_report(&wrong_status, patch)
            .await
            .unwrap();
        assert!(skipped.is_none());
        assert_eq!(
            store.find_report(&id).await.unwrap().unwrap().status,
            ReportStatus::Submitted
        );
    }

    #[tokio::test]
    async fn alerts_list_newest_first() {
        let store = MemoryStore::new();
        for (report, alert_type) in [("r1", "surge_watch"), ("r2", "tsunami_warning"), ("r1", "surge_warning")] {
            store
                .insert_alert(NewAlert {
                    source_report_id: report.to_string(),
                    alert_type: alert_type.to_string(),
                    severity: AlertSeverity::High,
                    message: "Stay away from the shore".to_string(),
                    affected_area: "Marina".to_string(),
                    created_at: Utc::now(),
                    created_by_officer_id: "officer-1".to_string(),
                })
                .await
                .unwrap();
        }

        let all = store.find_alerts(None, None).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].alert_type, "surge_warning");

        let for_r1 = store.find_alerts(Some("r1"), Some(1)).await.unwrap();
        assert_eq!(for_r1.len(), 1);
        assert_eq!(for_r1[0].alert_type, "surge_warning");
    }

    #[tokio::test]
    async fn principals_skip_unknown_ids() {
        let store = MemoryStore::new().with_principals([Principal {
            id: "citizen-1".to_string(),
            role: Role::Citizen,
            name: "Asha".to_string(),
            location: Some("Kochi".to_string()),
        }]);

        let found = store
            .find_principals(&["citizen-1".to_string(), "ghost".to_string()])
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Asha");
    }

    #[tokio::test]
    async fn snapshot_round_trips_through_store() {
        let store = MemoryStore::new();
        store
            .insert_report(draft(HazardType::OilSpill, Utc::now()))
            .await
            .unwrap();

        let restored = MemoryStore::from_snapshot(store.snapshot().await);
        assert_eq!(restored.report_count().await, 1);
        assert_eq!(restored.snapshot().await, store.snapshot().await);
    }
}
