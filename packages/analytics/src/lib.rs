#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geospatial aggregation engine.
//!
//! [`rollup`] holds the pure counting functions over a slice of reports.
//! [`engine::AggregationEngine`] reads a snapshot from the store and feeds
//! it through those functions and `coastwatch_spatial` to build the map
//! and dashboard views. Aggregations never fail on missing optional
//! fields; reports without coordinates are simply left out of spatial
//! output.

pub mod engine;
pub mod rollup;

use coastwatch_database::DbError;
use coastwatch_verification::VerificationError;
use thiserror::Error;

/// Errors that can occur during analytics operations.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// The caller may not read this view.
    #[error(transparent)]
    Verification(#[from] VerificationError),

    /// The store could not be read.
    #[error(transparent)]
    Store(#[from] DbError),

    /// Query parameters are out of range.
    #[error("Invalid query: {message}")]
    InvalidQuery {
        /// Description of what went wrong.
        message: String,
    },
}
