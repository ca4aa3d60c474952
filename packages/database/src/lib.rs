#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Report store abstraction and its in-memory implementation.
//!
//! The verification core only talks to storage through the [`ReportStore`],
//! [`AlertStore`], and [`PrincipalDirectory`] traits. [`memory::MemoryStore`]
//! implements all three behind `tokio` locks and can be persisted to a JSON
//! [`snapshot::Snapshot`] between process runs.

pub mod db;
pub mod memory;
pub mod snapshot;

use async_trait::async_trait;
use coastwatch_database_models::{
    Alert, NewAlert, NewReport, Principal, Report, ReportFilter, ReportPatch, ReportSort,
};

/// Errors that can occur during store operations.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A concurrent writer replaced the record first. Only raised by stores
    /// that detect write contention; the in-memory store never does.
    #[error("Write conflict on {collection} record {id}")]
    Conflict {
        /// Collection holding the record.
        collection: &'static str,
        /// Record id.
        id: String,
    },

    /// The backing store could not serve the request.
    #[error("Store unavailable: {message}")]
    Unavailable {
        /// Description of what went wrong.
        message: String,
    },

    /// I/O error while reading or writing persisted state.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Persisted state could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Document store holding hazard reports.
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Inserts a report and returns its assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the store rejects the write.
    async fn insert_report(&self, report: NewReport) -> Result<String, DbError>;

    /// Point lookup by id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the store cannot be read.
    async fn find_report(&self, id: &str) -> Result<Option<Report>, DbError>;

    /// Filtered, optionally sorted and limited scan.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the store cannot be read.
    async fn find_reports(
        &self,
        filter: &ReportFilter,
        sort: Option<ReportSort>,
        limit: Option<usize>,
    ) -> Result<Vec<Report>, DbError>;

    /// Atomically applies `patch` to the first report matching `filter` and
    /// returns the post-update record, or `None` if nothing matched.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the write fails, including
    /// [`DbError::Conflict`] from stores that detect contention.
    async fn find_one_and_update_report(
        &self,
        filter: &ReportFilter,
        patch: ReportPatch,
    ) -> Result<Option<Report>, DbError>;
}

/// Append-only collection of issued alerts.
#[async_trait]
pub trait AlertStore: Send + Sync {
    /// Inserts an alert and returns its assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the store rejects the write.
    async fn insert_alert(&self, alert: NewAlert) -> Result<String, DbError>;

    /// Lists alerts newest first, optionally restricted to one source
    /// report.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the store cannot be read.
    async fn find_alerts(
        &self,
        source_report_id: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<Alert>, DbError>;
}

/// Read-only view of principals, used for reporter enrichment.
#[async_trait]
pub trait PrincipalDirectory: Send + Sync {
    /// Returns the principals whose ids appear in `ids`. Unknown ids are
    /// skipped.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the directory cannot be read.
    async fn find_principals(&self, ids: &[String]) -> Result<Vec<Principal>, DbError>;
}

/// Everything the verification core needs from storage.
pub trait Store: ReportStore + AlertStore + PrincipalDirectory {}

impl<T: ReportStore + AlertStore + PrincipalDirectory + ?Sized> Store for T {}
