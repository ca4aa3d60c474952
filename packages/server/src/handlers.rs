//! HTTP handler functions for the coastwatch API.

use actix_web::{HttpRequest, HttpResponse, web};
use coastwatch_analytics::AnalyticsError;
use coastwatch_database::DbError;
use coastwatch_database_models::{Coordinates, Principal, ReportDraft};
use coastwatch_hazard_models::Role;
use coastwatch_server_models::{
    AlertQueryParams, AnalystVerifyRequest, ApiError, ApiHealth, ApiNearby, NearbyQueryParams,
    OfficerVerifyRequest, SafetyQueryParams, StatusUpdateRequest,
};
use coastwatch_spatial::DEFAULT_NEARBY_RADIUS_KM;
use coastwatch_verification::VerificationError;

use crate::AppState;

const PRINCIPAL_ID: &str = "X-Principal-Id";
const PRINCIPAL_ROLE: &str = "X-Principal-Role";
const PRINCIPAL_NAME: &str = "X-Principal-Name";
const PRINCIPAL_LOCATION: &str = "X-Principal-Location";

fn header<'a>(req: &'a HttpRequest, name: &str) -> Option<&'a str> {
    req.headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Reads the caller's identity from the gateway headers. Anything missing
/// or unparsable is a 401.
fn principal(req: &HttpRequest) -> Result<Principal, HttpResponse> {
    let unauthorized = |reason: String| {
        log::debug!("Rejecting unauthenticated request to {}: {reason}", req.path());
        HttpResponse::Unauthorized().json(ApiError::new(reason))
    };

    let id = header(req, PRINCIPAL_ID)
        .ok_or_else(|| unauthorized(format!("missing {PRINCIPAL_ID} header")))?;
    let role = header(req, PRINCIPAL_ROLE)
        .ok_or_else(|| unauthorized(format!("missing {PRINCIPAL_ROLE} header")))?;
    let role = Role::from_name(role).map_err(|e| unauthorized(e.to_string()))?;
    let name = header(req, PRINCIPAL_NAME)
        .ok_or_else(|| unauthorized(format!("missing {PRINCIPAL_NAME} header")))?;

    Ok(Principal {
        id: id.to_string(),
        role,
        name: name.to_string(),
        location: header(req, PRINCIPAL_LOCATION).map(str::to_string),
    })
}

fn store_error(e: &DbError) -> HttpResponse {
    if let DbError::Conflict { .. } = e {
        return HttpResponse::Conflict().json(ApiError::new(e.to_string()));
    }

    log::error!("Store failure: {e}");
    HttpResponse::InternalServerError().json(ApiError::new("Store failure"))
}

fn verification_error(e: &VerificationError) -> HttpResponse {
    let body = ApiError::new(e.to_string());
    match e {
        VerificationError::Validation { .. } => HttpResponse::BadRequest().json(body),
        VerificationError::Authorization { .. } => HttpResponse::Forbidden().json(body),
        VerificationError::NotFound { .. } => HttpResponse::NotFound().json(body),
        VerificationError::Store(e) => store_error(e),
    }
}

fn analytics_error(e: &AnalyticsError) -> HttpResponse {
    match e {
        AnalyticsError::Verification(e) => verification_error(e),
        AnalyticsError::Store(e) => store_error(e),
        AnalyticsError::InvalidQuery { .. } => {
            HttpResponse::BadRequest().json(ApiError::new(e.to_string()))
        }
    }
}

macro_rules! authenticate {
    ($req:expr) => {
        match principal(&$req) {
            Ok(principal) => principal,
            Err(response) => return response,
        }
    };
}

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `POST /api/reports`
///
/// Submits a new hazard report. Responds 201 with the stored record.
pub async fn submit_report(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<ReportDraft>,
) -> HttpResponse {
    let actor = authenticate!(req);

    match state.lifecycle.submit(&actor, body.into_inner()).await {
        Ok(report) => HttpResponse::Created().json(report),
        Err(e) => verification_error(&e),
    }
}

/// `GET /api/reports`
pub async fn list_reports(state: web::Data<AppState>, req: HttpRequest) -> HttpResponse {
    let actor = authenticate!(req);

    match state.listing.all(&actor).await {
        Ok(reports) => HttpResponse::Ok().json(reports),
        Err(e) => verification_error(&e),
    }
}

/// `GET /api/reports/user/{id}`
pub async fn user_reports(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> HttpResponse {
    let actor = authenticate!(req);

    match state.listing.for_reporter(&actor, &path).await {
        Ok(reports) => HttpResponse::Ok().json(reports),
        Err(e) => verification_error(&e),
    }
}

/// `PATCH /api/reports/{id}/status`
pub async fn set_status(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Json<StatusUpdateRequest>,
) -> HttpResponse {
    let actor = authenticate!(req);

    match state.lifecycle.set_status(&actor, &path, &body.status).await {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(e) => verification_error(&e),
    }
}

/// `GET /api/verification/analyst/pending`
pub async fn analyst_pending(state: web::Data<AppState>, req: HttpRequest) -> HttpResponse {
    let actor = authenticate!(req);

    match state.queue.pending_for_analyst(&actor).await {
        Ok(entries) => HttpResponse::Ok().json(entries),
        Err(e) => verification_error(&e),
    }
}

/// `POST /api/verification/analyst/verify/{id}`
pub async fn analyst_verify(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Json<AnalystVerifyRequest>,
) -> HttpResponse {
    let actor = authenticate!(req);

    match state
        .lifecycle
        .analyst_decide(&actor, &path, body.into_inner().into())
        .await
    {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(e) => verification_error(&e),
    }
}

/// `GET /api/verification/officer/pending`
pub async fn officer_pending(state: web::Data<AppState>, req: HttpRequest) -> HttpResponse {
    let actor = authenticate!(req);

    match state.queue.pending_for_officer(&actor).await {
        Ok(entries) => HttpResponse::Ok().json(entries),
        Err(e) => verification_error(&e),
    }
}

/// `POST /api/verification/officer/verify/{id}`
///
/// Responds with the updated report and the alert issued by this call, if
/// any.
pub async fn officer_verify(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Json<OfficerVerifyRequest>,
) -> HttpResponse {
    let actor = authenticate!(req);

    match state
        .lifecycle
        .officer_decide(&actor, &path, body.into_inner().into())
        .await
    {
        Ok(outcome) => HttpResponse::Ok().json(outcome),
        Err(e) => verification_error(&e),
    }
}

/// `GET /api/verification/alerts`
pub async fn alerts(
    state: web::Data<AppState>,
    req: HttpRequest,
    params: web::Query<AlertQueryParams>,
) -> HttpResponse {
    let actor = authenticate!(req);

    match state
        .alerts
        .list_alerts(&actor, params.report_id.as_deref())
        .await
    {
        Ok(alerts) => HttpResponse::Ok().json(alerts),
        Err(e) => verification_error(&e),
    }
}

/// `GET /api/map/heatmap`
pub async fn heatmap(state: web::Data<AppState>) -> HttpResponse {
    match state.analytics.heatmap().await {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(e) => analytics_error(&e),
    }
}

/// `GET /api/map/nearby?lat&lng&radiusKm`
pub async fn nearby(
    state: web::Data<AppState>,
    params: web::Query<NearbyQueryParams>,
) -> HttpResponse {
    let observer = Coordinates::new(params.lat, params.lng);

    match state
        .analytics
        .nearby_incidents(observer, params.radius_km)
        .await
    {
        Ok(count) => HttpResponse::Ok().json(ApiNearby {
            count,
            radius_km: params.radius_km.unwrap_or(DEFAULT_NEARBY_RADIUS_KM),
        }),
        Err(e) => analytics_error(&e),
    }
}

/// `GET /api/map/safety?lat&lng`
pub async fn safety(
    state: web::Data<AppState>,
    params: web::Query<SafetyQueryParams>,
) -> HttpResponse {
    let observer = Coordinates::new(params.lat, params.lng);

    match state.analytics.community_safety(observer).await {
        Ok(safety) => HttpResponse::Ok().json(safety),
        Err(e) => analytics_error(&e),
    }
}

/// `GET /api/admin/metrics`
pub async fn metrics(state: web::Data<AppState>, req: HttpRequest) -> HttpResponse {
    let actor = authenticate!(req);

    match state.analytics.metrics(&actor).await {
        Ok(metrics) => HttpResponse::Ok().json(metrics),
        Err(e) => analytics_error(&e),
    }
}

/// `GET /api/officer/summary`
pub async fn officer_summary(state: web::Data<AppState>, req: HttpRequest) -> HttpResponse {
    let actor = authenticate!(req);

    match state.analytics.officer_summary(&actor).await {
        Ok(summary) => HttpResponse::Ok().json(summary),
        Err(e) => analytics_error(&e),
    }
}

/// `GET /api/profile/stats`
pub async fn profile_stats(state: web::Data<AppState>, req: HttpRequest) -> HttpResponse {
    let actor = authenticate!(req);

    match state.analytics.user_stats(&actor).await {
        Ok(stats) => HttpResponse::Ok().json(stats),
        Err(e) => analytics_error(&e),
    }
}
