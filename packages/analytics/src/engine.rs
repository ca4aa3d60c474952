//! Store-backed aggregation views for the map and dashboards.
//!
//! Each view reads one unsynchronized snapshot of the report collection and
//! never blocks writers.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use coastwatch_analytics_models::{
    CommunitySafety, DashboardMetrics, HeatmapView, OfficerSummary, RecencyWindow, UserStats,
};
use coastwatch_database::Store;
use coastwatch_database_models::{Coordinates, Principal, Report, ReportFilter};
use coastwatch_hazard_models::ReportStatus;
use coastwatch_spatial::{DEFAULT_NEARBY_RADIUS_KM, heat_bounds, heat_points, nearby_incident_count};
use coastwatch_verification::Operation;
use coastwatch_verification::authz::authorize;

use crate::AnalyticsError;
use crate::rollup::{
    accuracy_percent, count_by_hazard, count_by_status, count_in_window, count_where, safety_level,
};

/// Trailing window used for the community safety rating.
pub const SAFETY_WINDOW: RecencyWindow = RecencyWindow::LastDays(7);

/// Builds aggregation views over a report store.
#[derive(Clone)]
pub struct AggregationEngine {
    store: Arc<dyn Store>,
}

impl AggregationEngine {
    #[must_use]
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    async fn snapshot(&self, filter: &ReportFilter) -> Result<Vec<Report>, AnalyticsError> {
        let reports = self.store.find_reports(filter, None, None).await?;
        log::debug!("Aggregating over {} report(s)", reports.len());
        Ok(reports)
    }

    /// Weighted heat points for every located report, with their bounds.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::Store`] if the store cannot be read.
    pub async fn heatmap(&self) -> Result<HeatmapView, AnalyticsError> {
        let reports = self.snapshot(&ReportFilter::default()).await?;
        let points = heat_points(&reports);
        let bounds = heat_bounds(&points);

        Ok(HeatmapView { points, bounds })
    }

    /// Number of reports within `radius_km` (default 50 km) of `observer`.
    ///
    /// # Errors
    ///
    /// * [`AnalyticsError::InvalidQuery`] for an out-of-range observer or a
    ///   negative or non-finite radius.
    /// * [`AnalyticsError::Store`] if the store cannot be read.
    pub async fn nearby_incidents(
        &self,
        observer: Coordinates,
        radius_km: Option<f64>,
    ) -> Result<u64, AnalyticsError> {
        validate_observer(observer)?;
        let radius_km = validate_radius(radius_km)?;

        let reports = self.snapshot(&ReportFilter::default()).await?;
        Ok(nearby_incident_count(&reports, observer, radius_km) as u64)
    }

    /// Nearby count plus a rating from the last seven days of reports.
    ///
    /// # Errors
    ///
    /// Same as [`Self::nearby_incidents`].
    pub async fn community_safety(
        &self,
        observer: Coordinates,
    ) -> Result<CommunitySafety, AnalyticsError> {
        self.community_safety_at(observer, Utc::now()).await
    }

    /// [`Self::community_safety`] evaluated at a fixed instant.
    ///
    /// # Errors
    ///
    /// Same as [`Self::nearby_incidents`].
    pub async fn community_safety_at(
        &self,
        observer: Coordinates,
        now: DateTime<Utc>,
    ) -> Result<CommunitySafety, AnalyticsError> {
        validate_observer(observer)?;

        let reports = self.snapshot(&ReportFilter::default()).await?;
        let nearby_incidents =
            nearby_incident_count(&reports, observer, DEFAULT_NEARBY_RADIUS_KM) as u64;
        let recent_reports = count_in_window(&reports, SAFETY_WINDOW, now);

        Ok(CommunitySafety {
            nearby_incidents,
            radius_km: DEFAULT_NEARBY_RADIUS_KM,
            recent_reports,
            safety_level: safety_level(recent_reports),
        })
    }

    /// Totals by status and by hazard type over every report.
    ///
    /// # Errors
    ///
    /// * [`AnalyticsError::Verification`] unless the actor is an officer or
    ///   analyst.
    /// * [`AnalyticsError::Store`] if the store cannot be read.
    pub async fn metrics(&self, actor: &Principal) -> Result<DashboardMetrics, AnalyticsError> {
        authorize(actor, Operation::ViewMetrics)?;

        let reports = self.snapshot(&ReportFilter::default()).await?;

        Ok(DashboardMetrics {
            totals: reports.len() as u64,
            by_status: count_by_status(&reports),
            by_hazard: count_by_hazard(&reports),
        })
    }

    /// Officer dashboard counters.
    ///
    /// # Errors
    ///
    /// * [`AnalyticsError::Verification`] unless the actor is an officer.
    /// * [`AnalyticsError::Store`] if the store cannot be read.
    pub async fn officer_summary(
        &self,
        actor: &Principal,
    ) -> Result<OfficerSummary, AnalyticsError> {
        authorize(actor, Operation::ViewOfficerSummary)?;

        let reports = self.snapshot(&ReportFilter::default()).await?;
        let verified = count_where(&reports, |r| r.status == ReportStatus::Verified);

        Ok(OfficerSummary {
            total_reports: reports.len() as u64,
            pending_validation: count_where(&reports, |r| r.status.awaits_analyst()),
            active_incidents: verified,
            verified_reports: verified,
            urgent_reports: count_where(&reports, |r| r.hazard_type.is_urgent()),
        })
    }

    /// Submission statistics for the calling principal.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::Store`] if the store cannot be read.
    pub async fn user_stats(&self, actor: &Principal) -> Result<UserStats, AnalyticsError> {
        self.user_stats_at(actor, Utc::now()).await
    }

    /// [`Self::user_stats`] evaluated at a fixed instant.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::Store`] if the store cannot be read.
    pub async fn user_stats_at(
        &self,
        actor: &Principal,
        now: DateTime<Utc>,
    ) -> Result<UserStats, AnalyticsError> {
        let reports = self.snapshot(&ReportFilter::by_reporter(&actor.id)).await?;

        let total_reports = reports.len() as u64;
        let verified_reports = count_where(&reports, |r| r.status == ReportStatus::Verified);

        Ok(UserStats {
            total_reports,
            verified_reports,
            this_month_reports: count_in_window(&reports, RecencyWindow::ThisMonth, now),
            accuracy: accuracy_percent(verified_reports, total_reports),
        })
    }
}

fn validate_observer(observer: Coordinates) -> Result<(), AnalyticsError> {
    let Coordinates {
        latitude,
        longitude,
    } = observer;

    if !latitude.is_finite() || latitude.abs() > 90.0 {
        return Err(AnalyticsError::InvalidQuery {
            message: format!("latitude {latitude} is outside [-90, 90]"),
        });
    }
    if !longitude.is_finite() || longitude.abs() > 180.0 {
        return Err(AnalyticsError::InvalidQuery {
            message: format!("longitude {longitude} is outside [-180, 180]"),
        });
    }

    Ok(())
}

fn validate_radius(radius_km: Option<f64>) -> Result<f64, AnalyticsError> {
    match radius_km {
        None => Ok(DEFAULT_NEARBY_RADIUS_KM),
        Some(r) if r.is_finite() && r >= 0.0 => Ok(r),
        Some(r) => Err(AnalyticsError::InvalidQuery {
            message: format!("radius {r} must be a non-negative number of kilometers"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeDelta, TimeZone as _};
    use coastwatch_analytics_models::SafetyLevel;
    use coastwatch_database::ReportStore;
    use coastwatch_database::memory::MemoryStore;
    use coastwatch_database_models::{NewReport, ReportPatch};
    use coastwatch_hazard_models::{HazardType, Role};
    use coastwatch_verification::VerificationError;

    use super::*;

    const CHENNAI: Coordinates = Coordinates::new(13.0827, 80.2707);
    const DELHI: Coordinates = Coordinates::new(28.7041, 77.1025);

    fn principal(id: &str, role: Role) -> Principal {
        Principal {
            id: id.to_string(),
            role,
            name: id.to_string(),
            location: None,
        }
    }

    async fn insert(
        store: &MemoryStore,
        reporter: &str,
        hazard_type: HazardType,
        status: ReportStatus,
        coordinates: Option<Coordinates>,
        created_at: DateTime<Utc>,
    ) -> String {
        store
            .insert_report(NewReport {
                reporter_id: reporter.to_string(),
                role_at_submission: Role::Citizen,
                hazard_type,
                description: None,
                coordinates,
                location_name: None,
                media_ref: None,
                status,
                created_at,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn heatmap_weights_and_bounds_located_reports() {
        let store = Arc::new(MemoryStore::new());
        let now = Utc::now();
        insert(&store, "c1", HazardType::Tsunami, ReportStatus::Verified, Some(CHENNAI), now).await;
        insert(&store, "c1", HazardType::Flood, ReportStatus::Submitted, Some(DELHI), now).await;
        insert(&store, "c1", HazardType::Cyclone, ReportStatus::Submitted, None, now).await;

        let view = AggregationEngine::new(store).heatmap().await.unwrap();

        assert_eq!(view.points.len(), 2);
        let mut intensities: Vec<f64> = view.points.iter().map(|p| p.intensity).collect();
        intensities.sort_by(f64::total_cmp);
        assert!((intensities[0] - 1.0).abs() < f64::EPSILON);
        assert!((intensities[1] - 4.5).abs() < f64::EPSILON);

        let bounds = view.bounds.unwrap();
        assert!((bounds.south - CHENNAI.latitude).abs() < 1e-9);
        assert!((bounds.north - DELHI.latitude).abs() < 1e-9);
    }

    #[tokio::test]
    async fn empty_heatmap_has_no_bounds() {
        let view = AggregationEngine::new(Arc::new(MemoryStore::new()))
            .heatmap()
            .await
            .unwrap();
        assert!(view.points.is_empty());
        assert!(view.bounds.is_none());
    }

    #[tokio::test]
    async fn nearby_counts_use_the_default_radius() {
        let store = Arc::new(MemoryStore::new());
        let now = Utc::now();
        insert(&store, "c1", HazardType::Flood, ReportStatus::Submitted, Some(CHENNAI), now).await;
        let engine = AggregationEngine::new(store);

        assert_eq!(engine.nearby_incidents(DELHI, None).await.unwrap(), 0);
        assert_eq!(engine.nearby_incidents(CHENNAI, None).await.unwrap(), 1);
        assert_eq!(engine.nearby_incidents(DELHI, Some(2000.0)).await.unwrap(), 1);

        assert!(matches!(
            engine.nearby_incidents(DELHI, Some(-1.0)).await,
            Err(AnalyticsError::InvalidQuery { .. })
        ));
        assert!(matches!(
            engine
                .nearby_incidents(Coordinates::new(95.0, 0.0), None)
                .await,
            Err(AnalyticsError::InvalidQuery { .. })
        ));
    }

    #[tokio::test]
    async fn community_safety_rates_recent_volume() {
        let store = Arc::new(MemoryStore::new());
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        for _ in 0..6 {
            insert(
                &store,
                "c1",
                HazardType::HighWave,
                ReportStatus::Submitted,
                Some(CHENNAI),
                now - TimeDelta::days(1),
            )
            .await;
        }
        insert(
            &store,
            "c1",
            HazardType::HighWave,
            ReportStatus::Submitted,
            None,
            now - TimeDelta::days(30),
        )
        .await;

        let safety = AggregationEngine::new(store)
            .community_safety_at(CHENNAI, now)
            .await
            .unwrap();

        assert_eq!(safety.nearby_incidents, 6);
        assert_eq!(safety.recent_reports, 6);
        assert_eq!(safety.safety_level, SafetyLevel::Warning);
    }

    #[tokio::test]
    async fn metrics_count_every_report_and_require_reviewer() {
        let store = Arc::new(MemoryStore::new());
        let now = Utc::now();
        insert(&store, "c1", HazardType::Flood, ReportStatus::Submitted, None, now).await;
        insert(&store, "c1", HazardType::Flood, ReportStatus::Rejected, Some(CHENNAI), now).await;
        let engine = AggregationEngine::new(store);

        let metrics = engine.metrics(&principal("a1", Role::Analyst)).await.unwrap();
        assert_eq!(metrics.totals, 2);
        assert_eq!(metrics.by_status.len(), 2);
        assert_eq!(metrics.by_hazard.len(), 1);
        assert_eq!(metrics.by_hazard[0].count, 2);

        assert!(matches!(
            engine.metrics(&principal("c1", Role::Citizen)).await,
            Err(AnalyticsError::Verification(VerificationError::Authorization { .. }))
        ));
    }

    #[tokio::test]
    async fn officer_summary_counts_pipeline_stages() {
        let store = Arc::new(MemoryStore::new());
        let now = Utc::now();
        insert(&store, "c1", HazardType::Tsunami, ReportStatus::Submitted, None, now).await;
        insert(&store, "c1", HazardType::Flood, ReportStatus::InReview, None, now).await;
        insert(&store, "c1", HazardType::Cyclone, ReportStatus::Verified, None, now).await;
        insert(&store, "c1", HazardType::OilSpill, ReportStatus::Rejected, None, now).await;
        let engine = AggregationEngine::new(store);

        let summary = engine
            .officer_summary(&principal("o1", Role::Officer))
            .await
            .unwrap();

        assert_eq!(
            summary,
            OfficerSummary {
                total_reports: 4,
                pending_validation: 2,
                active_incidents: 1,
                verified_reports: 1,
                urgent_reports: 2,
            }
        );

        assert!(
            engine
                .officer_summary(&principal("a1", Role::Analyst))
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn user_stats_cover_only_the_callers_reports() {
        let store = Arc::new(MemoryStore::new());
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        let last_month = now - TimeDelta::days(30);

        let mut ids = Vec::new();
        for created_at in [now, now, now, last_month] {
            ids.push(
                insert(&store, "c1", HazardType::Flood, ReportStatus::Submitted, None, created_at)
                    .await,
            );
        }
        insert(&store, "c2", HazardType::Flood, ReportStatus::Verified, None, now).await;

        for id in &ids[..3] {
            store
                .find_one_and_update_report(
                    &ReportFilter::by_id(id),
                    ReportPatch {
                        status: ReportStatus::Verified,
                        touched_at: now,
                    },
                )
                .await
                .unwrap();
        }

        let engine = AggregationEngine::new(store);
        let stats = engine
            .user_stats_at(&principal("c1", Role::Citizen), now)
            .await
            .unwrap();

        assert_eq!(
            stats,
            UserStats {
                total_reports: 4,
                verified_reports: 3,
                this_month_reports: 3,
                accuracy: 75,
            }
        );

        let empty = engine
            .user_stats_at(&principal("nobody", Role::Citizen), now)
            .await
            .unwrap();
        assert_eq!(empty.accuracy, 0);
        assert_eq!(empty.total_reports, 0);
    }
}
