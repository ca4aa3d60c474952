#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Per-report geospatial computations for the hazard map.
//!
//! Turns geotagged reports into weighted heat points, measures great-circle
//! distances with the haversine formula, and counts reports around an
//! observer. Every function is a linear scan over the reports it is given;
//! there is no spatial index. Reports without both coordinates are skipped
//! everywhere in this crate.

use coastwatch_database_models::{Coordinates, Report};
use coastwatch_hazard_models::{HazardType, ReportStatus};
use geo::{BoundingRect, MultiPoint, Point};
use serde::{Deserialize, Serialize};

/// Mean Earth radius used for great-circle distances.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Radius used for nearby-incident counts when the caller gives none.
pub const DEFAULT_NEARBY_RADIUS_KM: f64 = 50.0;

/// Intensity multiplier applied to verified reports.
pub const VERIFIED_MULTIPLIER: f64 = 1.5;

/// One weighted point on the heat map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatPoint {
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Rendering weight.
    pub intensity: f64,
}

/// Bounding rectangle around a set of heat points, for fitting a viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatBounds {
    /// Western longitude boundary.
    pub west: f64,
    /// Southern latitude boundary.
    pub south: f64,
    /// Eastern longitude boundary.
    pub east: f64,
    /// Northern latitude boundary.
    pub north: f64,
}

/// Great-circle distance between two points in kilometers.
#[must_use]
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lng = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos()
            * b.latitude.to_radians().cos()
            * (d_lng / 2.0).sin().powi(2);

    EARTH_RADIUS_KM * 2.0 * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Heat weight of a report with the given hazard and status.
#[must_use]
pub fn heat_intensity(hazard: HazardType, status: ReportStatus) -> f64 {
    let base = hazard.base_intensity();
    if status == ReportStatus::Verified {
        base * VERIFIED_MULTIPLIER
    } else {
        base
    }
}

/// Emits one [`HeatPoint`] per geotagged report, in input order.
#[must_use]
pub fn heat_points(reports: &[Report]) -> Vec<HeatPoint> {
    reports
        .iter()
        .filter_map(|report| {
            report.coordinates().map(|c| HeatPoint {
                latitude: c.latitude,
                longitude: c.longitude,
                intensity: heat_intensity(report.hazard_type, report.status),
            })
        })
        .collect()
}

/// Smallest rectangle containing every point, or `None` for no points.
#[must_use]
pub fn heat_bounds(points: &[HeatPoint]) -> Option<HeatBounds> {
    let multi: MultiPoint<f64> = points
        .iter()
        .map(|p| Point::new(p.longitude, p.latitude))
        .collect();

    multi.bounding_rect().map(|rect| HeatBounds {
        west: rect.min().x,
        south: rect.min().y,
        east: rect.max().x,
        north: rect.max().y,
    })
}

/// Counts geotagged reports within `radius_km` of `observer`, inclusive.
#[must_use]
pub fn nearby_incident_count(reports: &[Report], observer: Coordinates, radius_km: f64) -> usize {
    let count = reports
        .iter()
        .filter_map(Report::coordinates)
        .filter(|c| haversine_km(observer, *c) <= radius_km)
        .count();

    log::debug!(
        "{count} of {} reports within {radius_km} km of ({}, {})",
        reports.len(),
        observer.latitude,
        observer.longitude
    );

    count
}
