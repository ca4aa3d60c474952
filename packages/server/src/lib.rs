#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for coastwatch.
//!
//! A thin HTTP adapter over the verification core and the aggregation
//! engine. Caller identity arrives in `X-Principal-*` headers set by an
//! upstream gateway. The store is opened from its snapshot at startup and
//! flushed back at shutdown.

pub mod config;
mod handlers;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use coastwatch_analytics::engine::AggregationEngine;
use coastwatch_database::{Store, db};
use coastwatch_verification::alert::AlertEmitter;
use coastwatch_verification::lifecycle::ReportLifecycle;
use coastwatch_verification::listing::ReportListing;
use coastwatch_verification::queue::VerificationQueue;

pub use config::ServerConfig;

/// Shared application state.
pub struct AppState {
    /// Status transitions and submissions.
    pub lifecycle: ReportLifecycle,
    /// Analyst and officer work queues.
    pub queue: VerificationQueue,
    /// Report listings.
    pub listing: ReportListing,
    /// Alert listing.
    pub alerts: AlertEmitter,
    /// Map and dashboard aggregations.
    pub analytics: AggregationEngine,
}

impl AppState {
    /// Wires every component to the same store.
    #[must_use]
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            lifecycle: ReportLifecycle::new(store.clone()),
            queue: VerificationQueue::new(store.clone()),
            listing: ReportListing::new(store.clone()),
            alerts: AlertEmitter::new(store.clone()),
            analytics: AggregationEngine::new(store),
        }
    }
}

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/reports", web::post().to(handlers::submit_report))
            .route("/reports", web::get().to(handlers::list_reports))
            .route("/reports/user/{id}", web::get().to(handlers::user_reports))
            .route("/reports/{id}/status", web::patch().to(handlers::set_status))
            .route(
                "/verification/analyst/pending",
                web::get().to(handlers::analyst_pending),
            )
            .route(
                "/verification/analyst/verify/{id}",
                web::post().to(handlers::analyst_verify),
            )
            .route(
                "/verification/officer/pending",
                web::get().to(handlers::officer_pending),
            )
            .route(
                "/verification/officer/verify/{id}",
                web::post().to(handlers::officer_verify),
            )
            .route("/verification/alerts", web::get().to(handlers::alerts))
            .route("/map/heatmap", web::get().to(handlers::heatmap))
            .route("/map/nearby", web::get().to(handlers::nearby))
            .route("/map/safety", web::get().to(handlers::safety))
            .route("/admin/metrics", web::get().to(handlers::metrics))
            .route("/officer/summary", web::get().to(handlers::officer_summary))
            .route("/profile/stats", web::get().to(handlers::profile_stats)),
    );
}

/// Starts the coastwatch API server.
///
/// Opens the store (restoring the configured snapshot), serves until the
/// server is stopped, then writes the snapshot back. This is a regular
/// async function; the caller provides the runtime (e.g. via
/// `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the store cannot be opened or
/// flushed, or if the HTTP server fails to bind or encounters a runtime
/// error.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let config = ServerConfig::from_env();

    log::info!("Opening report store...");
    let store = Arc::new(db::open(&config.store).await.map_err(std::io::Error::other)?);

    let state = web::Data::new(AppState::new(store.clone()));

    log::info!("Starting server on {}:{}", config.bind_addr, config.port);

    let served = HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((config.bind_addr.as_str(), config.port))?
    .run()
    .await;

    log::info!("Server stopped, flushing report store...");
    db::close(&store, &config.store)
        .await
        .map_err(std::io::Error::other)?;

    served
}
